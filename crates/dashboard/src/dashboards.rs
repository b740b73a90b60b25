use crate::error::WatchError;
use crate::view::{RenderMode, ViewOptions};
use clinic_queue_domain::{AppointmentStatus, TriggerPredicate};
use std::str::FromStr;

/// The dashboards of the clinic front-end that watch an appointment queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardKind {
    /// The doctor's list of today's appointments
    DoctorAppointmentList,
    /// The secretary's list of the appointments of the doctor they assist
    SecretaryMyAppointment,
    /// Counters on the doctor's home page
    DoctorHome,
    /// Counters on the secretary's home page
    SecretaryHome,
}

impl DashboardKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DoctorAppointmentList => "doctor-appointments",
            Self::SecretaryMyAppointment => "secretary-appointments",
            Self::DoctorHome => "doctor-home",
            Self::SecretaryHome => "secretary-home",
        }
    }

    /// Doctors are told when a patient is next in the queue, secretaries
    /// when the doctor has taken a patient in
    pub fn trigger(&self) -> TriggerPredicate {
        match self {
            Self::DoctorAppointmentList | Self::DoctorHome => {
                TriggerPredicate::status(AppointmentStatus::NextInQueue)
            }
            Self::SecretaryMyAppointment | Self::SecretaryHome => {
                TriggerPredicate::status(AppointmentStatus::InProgress)
            }
        }
    }

    pub fn view_options(&self) -> ViewOptions {
        match self {
            Self::DoctorAppointmentList => ViewOptions {
                render: RenderMode::List,
                excluded: vec![AppointmentStatus::Cancelled, AppointmentStatus::Processed],
                chronological: true,
            },
            Self::SecretaryMyAppointment => ViewOptions {
                render: RenderMode::List,
                excluded: vec![AppointmentStatus::Cancelled],
                chronological: true,
            },
            Self::DoctorHome | Self::SecretaryHome => ViewOptions {
                render: RenderMode::Counts,
                excluded: Vec::new(),
                chronological: false,
            },
        }
    }
}

impl FromStr for DashboardKind {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "doctor-appointments" => Ok(Self::DoctorAppointmentList),
            "secretary-appointments" => Ok(Self::SecretaryMyAppointment),
            "doctor-home" => Ok(Self::DoctorHome),
            "secretary-home" => Ok(Self::SecretaryHome),
            _ => Err(WatchError::UnknownDashboard(s.to_string())),
        }
    }
}
