use crate::shared::entity::{Entity, ID};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use tracing::warn;

/// Status label of an `Appointment` as reported by the clinic API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Upcoming,
    Arrived,
    NextInQueue,
    InProgress,
    Processed,
    Cancelled,
    /// Any label this client does not know about. It is displayed
    /// but never treated as a trigger status.
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        Self::Upcoming,
        Self::Arrived,
        Self::NextInQueue,
        Self::InProgress,
        Self::Processed,
        Self::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Arrived => "Arrived",
            Self::NextInQueue => "NextInQueue",
            Self::InProgress => "InProgress",
            Self::Processed => "Processed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The slot an `Appointment` occupies in a doctor's day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }
}

/// A point in time view of one appointment as it was returned by the
/// clinic API. Snapshots are never mutated locally, every poll replaces
/// the previous ones.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentSnapshot {
    /// Stable across polls
    pub id: ID,
    pub status: AppointmentStatus,
    pub slot: TimeSlot,
    /// The doctor the appointment is booked with. Not owned by this client.
    pub doctor_id: ID,
    /// The patient the appointment is booked for. Not owned by this client.
    pub patient_id: ID,
}

impl AppointmentSnapshot {
    pub fn is_on(&self, date: &NaiveDate) -> bool {
        self.slot.date == *date
    }
}

impl Entity for AppointmentSnapshot {
    fn id(&self) -> ID {
        self.id
    }
}

/// Ids are expected to be unique within one response. If the API
/// breaks that promise the first occurrence is kept.
pub fn dedup_by_id(appointments: Vec<AppointmentSnapshot>) -> Vec<AppointmentSnapshot> {
    let mut seen = HashSet::with_capacity(appointments.len());
    appointments
        .into_iter()
        .filter(|appointment| {
            let first = seen.insert(appointment.id());
            if !first {
                warn!(
                    "Appointment: {} was returned more than once in the same response, ignoring the duplicate",
                    appointment.id
                );
            }
            first
        })
        .collect()
}

/// Chronological order for display. The sort is stable so appointments
/// starting at the same time keep the order the API returned them in.
pub fn sort_by_start_time(appointments: &mut [AppointmentSnapshot]) {
    appointments.sort_by_key(|appointment| appointment.slot.start_time);
}
