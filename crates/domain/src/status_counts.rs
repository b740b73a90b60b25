use crate::{AppointmentSnapshot, AppointmentStatus};
use std::collections::HashMap;

/// Number of appointments per status, shown by the home dashboards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusCounts {
    pub total: usize,
    counts: HashMap<AppointmentStatus, usize>,
}

impl StatusCounts {
    pub fn from_snapshots(appointments: &[AppointmentSnapshot]) -> Self {
        let mut counts = HashMap::new();
        for appointment in appointments {
            *counts.entry(appointment.status).or_insert(0) += 1;
        }
        Self {
            total: appointments.len(),
            counts,
        }
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Appointments that still have to be seen by the doctor
    pub fn waiting(&self) -> usize {
        self.count(AppointmentStatus::Upcoming)
            + self.count(AppointmentStatus::Arrived)
            + self.count(AppointmentStatus::NextInQueue)
    }
}
