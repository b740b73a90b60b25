mod appointment;
pub mod change_detection;
mod date;
mod shared;
mod status_counts;

pub use appointment::{
    dedup_by_id, sort_by_start_time, AppointmentSnapshot, AppointmentStatus, TimeSlot,
};
pub use change_detection::{detect_new_triggers, Detection, TriggerBaseline, TriggerPredicate};
pub use date::{format_date, parse_clock_time, parse_date};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use status_counts::StatusCounts;
