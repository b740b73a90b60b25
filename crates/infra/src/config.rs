use crate::services::{Locale, NotificationSound};
use chrono::NaiveDate;
use clinic_queue_domain::{parse_date, ID};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the clinic REST API, e.g. `https://clinic.example.com/api/v1`
    pub api_address: String,
    /// Sent in the `x-api-key` header when present
    pub api_key: Option<String>,
    /// The doctor whose queue is watched. Resolved from the session by the
    /// surrounding application, here it is given through the environment.
    pub doctor_id: Option<ID>,
    /// Which dashboard to run, see `DashboardKind` for the accepted names
    pub dashboard: String,
    /// How often the appointment queue is fetched
    pub poll_interval: Duration,
    pub notification_sound: NotificationSound,
    /// Language of the messages shown to the user
    pub locale: Locale,
    /// Date filter of the dashboard. `None` means today.
    pub selected_date: Option<NaiveDate>,
}

const DEFAULT_API_ADDRESS: &str = "http://localhost:5000/api/v1";
const DEFAULT_DASHBOARD: &str = "doctor-appointments";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

impl Config {
    pub fn new() -> Self {
        let api_address =
            std::env::var("CLINIC_API_URL").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into());
        let api_key = std::env::var("CLINIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let doctor_id = match std::env::var("DOCTOR_ID") {
            Ok(id) => match id.parse::<ID>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("The given DOCTOR_ID is not valid: {}", e);
                    None
                }
            },
            Err(_) => {
                info!("Did not find DOCTOR_ID environment variable.");
                None
            }
        };

        let dashboard = std::env::var("DASHBOARD").unwrap_or_else(|_| DEFAULT_DASHBOARD.into());

        let poll_interval = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_SECS.to_string());
        let poll_interval = match poll_interval.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given POLL_INTERVAL_SECS: {} is not valid, falling back to the default interval: {}.",
                    poll_interval, DEFAULT_POLL_INTERVAL_SECS
                );
                DEFAULT_POLL_INTERVAL_SECS
            }
        };

        let notification_sound = match std::env::var("NOTIFICATION_SOUND") {
            Ok(sound) => sound.parse::<NotificationSound>().unwrap_or_else(|_| {
                warn!(
                    "The given NOTIFICATION_SOUND: {} is not valid, falling back to the terminal bell.",
                    sound
                );
                NotificationSound::Bell
            }),
            Err(_) => NotificationSound::Bell,
        };

        let locale = match std::env::var("LOCALE") {
            Ok(locale) => locale.parse::<Locale>().unwrap_or_else(|_| {
                warn!(
                    "The given LOCALE: {} is not supported, falling back to english.",
                    locale
                );
                Locale::En
            }),
            Err(_) => Locale::En,
        };

        let selected_date = match std::env::var("SELECTED_DATE") {
            Ok(date) => match parse_date(&date) {
                Ok(date) => Some(date),
                Err(_) => {
                    warn!(
                        "The given SELECTED_DATE: {} is not a valid date, showing today instead.",
                        date
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            api_address,
            api_key,
            doctor_id,
            dashboard,
            poll_interval: Duration::from_secs(poll_interval),
            notification_sound,
            locale,
            selected_date,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
