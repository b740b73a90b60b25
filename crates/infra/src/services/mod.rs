mod appointment_query;
mod audio;
mod toast;

pub use appointment_query::{IAppointmentQuery, InMemoryAppointmentQuery, SdkAppointmentQuery};
pub use audio::{
    AudioCueProvider, CueEvent, IAudioCue, IAudioCueProvider, NotificationSound, PlaybackError,
    RecordingAudioCueProvider, SilentCue, TerminalBellCue,
};
pub use toast::{translate, IToaster, Locale, MessageKey, RecordingToaster, TerminalToaster};

use crate::Config;
use clinic_queue_sdk::ClinicSDK;
use std::sync::Arc;

/// The collaborators the dashboards talk to
#[derive(Clone)]
pub struct Services {
    pub appointments: Arc<dyn IAppointmentQuery>,
    pub audio: Arc<dyn IAudioCueProvider>,
    pub toaster: Arc<dyn IToaster>,
}

impl Services {
    pub fn create_real(config: &Config) -> Self {
        let sdk = ClinicSDK::new(config.api_address.clone(), config.api_key.clone());
        Self {
            appointments: Arc::new(SdkAppointmentQuery::new(sdk)),
            audio: Arc::new(AudioCueProvider::new(config.notification_sound)),
            toaster: Arc::new(TerminalToaster::new(config.locale)),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            appointments: Arc::new(InMemoryAppointmentQuery::new()),
            audio: Arc::new(AudioCueProvider::new(NotificationSound::Silent)),
            toaster: Arc::new(RecordingToaster::new()),
        }
    }
}
