use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Messages the dashboards can show to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    FetchAppointmentsFailed,
    DoctorNotResolved,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchAppointmentsFailed => "fetch_appointments_failed",
            Self::DoctorNotResolved => "doctor_not_resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locale {
    En,
    Ar,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(s.to_string()),
        }
    }
}

pub fn translate(key: MessageKey, locale: Locale) -> &'static str {
    match (locale, key) {
        (Locale::En, MessageKey::FetchAppointmentsFailed) => "Fetch appointments failed",
        (Locale::En, MessageKey::DoctorNotResolved) => {
            "Could not find the doctor for the current session"
        }
        (Locale::Ar, MessageKey::FetchAppointmentsFailed) => "فشل في جلب المواعيد",
        (Locale::Ar, MessageKey::DoctorNotResolved) => "تعذر العثور على الطبيب للجلسة الحالية",
    }
}

/// Surfaces a transient message to the user
pub trait IToaster: Send + Sync {
    fn show(&self, key: MessageKey);
}

/// Prints the translated message on the terminal
pub struct TerminalToaster {
    locale: Locale,
}

impl TerminalToaster {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl IToaster for TerminalToaster {
    fn show(&self, key: MessageKey) {
        let message = translate(key, self.locale);
        warn!(message_key = key.as_str(), "{}", message);
        eprintln!("! {}", message);
    }
}

/// Keeps every shown message, used when testing dashboards
#[derive(Clone, Default)]
pub struct RecordingToaster {
    shown: Arc<Mutex<Vec<MessageKey>>>,
}

impl RecordingToaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<MessageKey> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl IToaster for RecordingToaster {
    fn show(&self, key: MessageKey) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(key);
        }
    }
}
