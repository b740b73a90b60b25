use super::IAppointmentQuery;
use chrono::NaiveDate;
use clinic_queue_domain::{AppointmentSnapshot, ID};
use clinic_queue_sdk::{ClinicSDK, GetDoctorAppointmentsInput};

/// Queries the clinic REST API
pub struct SdkAppointmentQuery {
    sdk: ClinicSDK,
}

impl SdkAppointmentQuery {
    pub fn new(sdk: ClinicSDK) -> Self {
        Self { sdk }
    }
}

#[async_trait::async_trait]
impl IAppointmentQuery for SdkAppointmentQuery {
    async fn find_by_doctor(
        &self,
        doctor_id: ID,
        date: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AppointmentSnapshot>> {
        let res = self
            .sdk
            .appointment
            .get_by_doctor(GetDoctorAppointmentsInput { doctor_id, date })
            .await?;
        res.into_snapshots()
    }
}
