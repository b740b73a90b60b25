use crate::{APIResponse, BaseClient};
use clinic_queue_api_structs::*;
use clinic_queue_domain::{format_date, ID};
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppointmentClient {
    base: Arc<BaseClient>,
}

pub struct GetDoctorAppointmentsInput {
    pub doctor_id: ID,
    /// Only appointments on this date. All appointments when `None`.
    pub date: Option<NaiveDate>,
}

impl AppointmentClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get_by_doctor(
        &self,
        input: GetDoctorAppointmentsInput,
    ) -> APIResponse<get_doctor_appointments::APIResponse> {
        let query = get_doctor_appointments::QueryParams {
            date: input.date.as_ref().map(format_date),
        };
        self.base
            .get_with_query(
                format!("appointments/doctor/{}", input.doctor_id),
                &query,
                StatusCode::OK,
            )
            .await
    }
}
