use clinic_queue_domain::{
    parse_clock_time, AppointmentSnapshot, AppointmentStatus, TimeSlot, ID,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDTO {
    pub id: ID,
    pub status: AppointmentStatus,
    pub date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    /// `HH:MM` or `HH:MM:SS`
    pub end_time: String,
    pub doctor_id: ID,
    pub patient_id: ID,
}

impl AppointmentDTO {
    pub fn new(appointment: &AppointmentSnapshot) -> Self {
        Self {
            id: appointment.id,
            status: appointment.status,
            date: appointment.slot.date,
            start_time: appointment.slot.start_time.format("%H:%M").to_string(),
            end_time: appointment.slot.end_time.format("%H:%M").to_string(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
        }
    }

    pub fn into_snapshot(self) -> anyhow::Result<AppointmentSnapshot> {
        let start_time = parse_clock_time(&self.start_time).map_err(|_| {
            anyhow::Error::msg(format!(
                "Appointment: {} has a malformed start time: {}",
                self.id, self.start_time
            ))
        })?;
        let end_time = parse_clock_time(&self.end_time).map_err(|_| {
            anyhow::Error::msg(format!(
                "Appointment: {} has a malformed end time: {}",
                self.id, self.end_time
            ))
        })?;

        Ok(AppointmentSnapshot {
            id: self.id,
            status: self.status,
            slot: TimeSlot::new(self.date, start_time, end_time),
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
        })
    }
}
