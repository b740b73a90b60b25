mod appointment;
mod base;
mod status;

use appointment::AppointmentClient;
pub use appointment::GetDoctorAppointmentsInput;
pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use clinic_queue_api_structs::dtos::*;
pub use clinic_queue_api_structs::AppointmentsResponse;
pub use clinic_queue_domain::{AppointmentSnapshot, AppointmentStatus, ID};
use status::StatusClient;
use std::sync::Arc;

/// Clinic API SDK
///
/// The SDK contains methods for reading the appointment queue from the
/// clinic REST API.
#[derive(Clone)]
pub struct ClinicSDK {
    pub appointment: AppointmentClient,
    pub status: StatusClient,
}

impl ClinicSDK {
    pub fn new(address: String, api_key: Option<String>) -> Self {
        let mut base = BaseClient::new(address);
        if let Some(api_key) = api_key {
            base.set_api_key(api_key);
        }
        let base = Arc::new(base);
        let appointment = AppointmentClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            appointment,
            status,
        }
    }
}
