use std::io::Write;
use std::str::FromStr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("The output device refused playback: {0}")]
    Device(#[from] std::io::Error),
    #[error("Playback is blocked by the platform")]
    Blocked,
    #[error("The audio cue has already been released")]
    Released,
}

/// A short sound held by one dashboard while it is active.
///
/// `rewind` + `play` restarts the sound from the beginning, nothing is
/// ever queued.
pub trait IAudioCue: Send {
    fn rewind(&mut self);
    fn play(&mut self) -> Result<(), PlaybackError>;
    /// Stops playback and releases the underlying output. Called when the
    /// dashboard is deactivated.
    fn stop(&mut self);
}

/// Hands out a fresh `IAudioCue` every time a dashboard is activated
pub trait IAudioCueProvider: Send + Sync {
    fn acquire(&self) -> Box<dyn IAudioCue>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationSound {
    /// The terminal bell character
    Bell,
    Silent,
}

impl FromStr for NotificationSound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bell" => Ok(Self::Bell),
            "silent" | "none" | "off" => Ok(Self::Silent),
            _ => Err(s.to_string()),
        }
    }
}

/// Rings the terminal bell on stderr
pub struct TerminalBellCue {
    released: bool,
}

impl TerminalBellCue {
    pub fn new() -> Self {
        Self { released: false }
    }
}

impl Default for TerminalBellCue {
    fn default() -> Self {
        Self::new()
    }
}

impl IAudioCue for TerminalBellCue {
    // The bell has no playback position
    fn rewind(&mut self) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::Released);
        }
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        self.released = true;
    }
}

pub struct SilentCue;

impl IAudioCue for SilentCue {
    fn rewind(&mut self) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

pub struct AudioCueProvider {
    sound: NotificationSound,
}

impl AudioCueProvider {
    pub fn new(sound: NotificationSound) -> Self {
        Self { sound }
    }
}

impl IAudioCueProvider for AudioCueProvider {
    fn acquire(&self) -> Box<dyn IAudioCue> {
        match self.sound {
            NotificationSound::Bell => Box::new(TerminalBellCue::new()),
            NotificationSound::Silent => Box::new(SilentCue),
        }
    }
}

/// What happened to the cues handed out by a `RecordingAudioCueProvider`
#[derive(Debug, Clone, PartialEq)]
pub enum CueEvent {
    Rewind,
    Play,
    Stop,
}

/// Cue provider remembering every call made to its cues. Playback can be
/// made to fail to emulate platforms blocking autoplay.
#[derive(Clone, Default)]
pub struct RecordingAudioCueProvider {
    events: Arc<Mutex<Vec<CueEvent>>>,
    acquired: Arc<AtomicUsize>,
    blocked: bool,
}

impl RecordingAudioCueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocked() -> Self {
        Self {
            blocked: true,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<CueEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn play_count(&self) -> usize {
        self.events()
            .into_iter()
            .filter(|e| *e == CueEvent::Play)
            .count()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

struct RecordingCue {
    events: Arc<Mutex<Vec<CueEvent>>>,
    blocked: bool,
}

impl RecordingCue {
    fn record(&self, event: CueEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl IAudioCue for RecordingCue {
    fn rewind(&mut self) {
        self.record(CueEvent::Rewind);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.record(CueEvent::Play);
        if self.blocked {
            return Err(PlaybackError::Blocked);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.record(CueEvent::Stop);
    }
}

impl IAudioCueProvider for RecordingAudioCueProvider {
    fn acquire(&self) -> Box<dyn IAudioCue> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Box::new(RecordingCue {
            events: self.events.clone(),
            blocked: self.blocked,
        })
    }
}
