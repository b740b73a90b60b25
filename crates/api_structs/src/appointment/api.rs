use crate::dtos::AppointmentDTO;
use clinic_queue_domain::AppointmentSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsResponse {
    pub appointments: Vec<AppointmentDTO>,
}

impl AppointmentsResponse {
    pub fn new(appointments: &[AppointmentSnapshot]) -> Self {
        Self {
            appointments: appointments.iter().map(AppointmentDTO::new).collect(),
        }
    }

    /// Fails on the first record that cannot be represented as a snapshot
    pub fn into_snapshots(self) -> anyhow::Result<Vec<AppointmentSnapshot>> {
        self.appointments
            .into_iter()
            .map(AppointmentDTO::into_snapshot)
            .collect()
    }
}

pub mod get_doctor_appointments {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// `YYYY-MM-DD`. All of the doctor's appointments are returned when absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
    }

    pub type APIResponse = AppointmentsResponse;
}
