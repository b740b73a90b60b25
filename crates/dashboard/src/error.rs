use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("No doctor could be resolved for the current session, the dashboard will not poll")]
    MissingSubject,
    #[error("Invalid poll interval: {0:?}. The interval must be greater than zero")]
    InvalidInterval(Duration),
    #[error("Unknown dashboard: `{0}`")]
    UnknownDashboard(String),
}
