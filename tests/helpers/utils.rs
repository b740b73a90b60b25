use chrono::{NaiveDate, NaiveTime};
use clinic_queue_api_structs::AppointmentsResponse;
use clinic_queue_domain::{AppointmentSnapshot, AppointmentStatus, TimeSlot, ID};

pub const DOCTOR_ID: i64 = 42;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
}

pub fn appointment(id: i64, status: AppointmentStatus, start: &str) -> AppointmentSnapshot {
    let start = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
    AppointmentSnapshot {
        id: ID::new(id),
        status,
        slot: TimeSlot::new(today(), start, start + chrono::Duration::minutes(15)),
        doctor_id: ID::new(DOCTOR_ID),
        patient_id: ID::new(100 + id),
    }
}

/// Body of the doctor appointments endpoint
pub fn appointments_body(appointments: &[AppointmentSnapshot]) -> String {
    serde_json::to_string(&AppointmentsResponse::new(appointments)).unwrap()
}
