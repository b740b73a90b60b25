mod inmemory;
mod sdk;

use chrono::NaiveDate;
use clinic_queue_domain::{AppointmentSnapshot, ID};

pub use inmemory::InMemoryAppointmentQuery;
pub use sdk::SdkAppointmentQuery;

/// Reads the appointment queue of a doctor from wherever it lives
#[async_trait::async_trait]
pub trait IAppointmentQuery: Send + Sync {
    /// The appointments booked with `doctor_id`, only those on `date` when given
    async fn find_by_doctor(
        &self,
        doctor_id: ID,
        date: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AppointmentSnapshot>>;
}
