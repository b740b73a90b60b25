use crate::shared::usecase::UseCase;
use chrono::NaiveDate;
use clinic_queue_domain::{AppointmentSnapshot, ID};
use clinic_queue_infra::ClinicContext;
use thiserror::Error;

/// Reads the current appointment queue of a doctor on a given date
#[derive(Debug)]
pub struct FetchDoctorAppointmentsUseCase {
    pub doctor_id: ID,
    pub date: NaiveDate,
}

#[derive(Error, Debug)]
pub enum UseCaseErrors {
    #[error("Unable to fetch the appointments of doctor: {doctor_id}. Reason: {reason}")]
    QueryFailed { doctor_id: ID, reason: String },
}

#[async_trait::async_trait]
impl UseCase for FetchDoctorAppointmentsUseCase {
    type Response = Vec<AppointmentSnapshot>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &ClinicContext) -> Result<Self::Response, Self::Errors> {
        ctx.services
            .appointments
            .find_by_doctor(self.doctor_id, Some(self.date))
            .await
            .map_err(|e| UseCaseErrors::QueryFailed {
                doctor_id: self.doctor_id,
                reason: format!("{:#}", e),
            })
    }
}
