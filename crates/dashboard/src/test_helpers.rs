use chrono::{NaiveDate, NaiveTime};
use clinic_queue_domain::{AppointmentSnapshot, AppointmentStatus, TimeSlot, ID};
use clinic_queue_infra::{
    ClinicContext, Config, InMemoryAppointmentQuery, Locale, NotificationSound,
    RecordingAudioCueProvider, RecordingToaster, Services, StaticTimeSys,
};
use std::sync::Arc;
use std::time::Duration;

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
}

/// Appointment with doctor 42 on `date()`
pub fn appointment(id: i64, status: AppointmentStatus, start: &str) -> AppointmentSnapshot {
    let start = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
    AppointmentSnapshot {
        id: ID::new(id),
        status,
        slot: TimeSlot::new(date(), start, start + chrono::Duration::minutes(15)),
        doctor_id: ID::new(42),
        patient_id: ID::new(100 + id),
    }
}

fn config() -> Config {
    Config {
        api_address: "http://localhost:5000/api/v1".into(),
        api_key: None,
        doctor_id: Some(ID::new(42)),
        dashboard: "doctor-appointments".into(),
        poll_interval: Duration::from_secs(5),
        notification_sound: NotificationSound::Silent,
        locale: Locale::En,
        selected_date: None,
    }
}

pub fn context_with(query: Arc<InMemoryAppointmentQuery>) -> ClinicContext {
    TestContext::with_query(query).ctx
}

/// Context with in memory collaborators that remember how they were used
pub struct TestContext {
    pub ctx: ClinicContext,
    pub query: Arc<InMemoryAppointmentQuery>,
    pub audio: RecordingAudioCueProvider,
    pub toaster: RecordingToaster,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_query(Arc::new(InMemoryAppointmentQuery::new()))
    }

    pub fn with_query(query: Arc<InMemoryAppointmentQuery>) -> Self {
        let audio = RecordingAudioCueProvider::new();
        let toaster = RecordingToaster::new();
        let ctx = ClinicContext {
            services: Services {
                appointments: query.clone(),
                audio: Arc::new(audio.clone()),
                toaster: Arc::new(toaster.clone()),
            },
            config: config(),
            // 2021-03-01T10:00:00Z
            sys: Arc::new(StaticTimeSys {
                timestamp_millis: 1614592800000,
            }),
        };
        Self {
            ctx,
            query,
            audio,
            toaster,
        }
    }
}
