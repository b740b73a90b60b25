mod config;
mod services;
mod system;

pub use config::Config;
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct ClinicContext {
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl ClinicContext {
    fn create(config: Config) -> Self {
        Self {
            services: Services::create_real(&config),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context backed by in memory collaborators, mostly useful for tests
    pub fn create_inmemory(config: Config) -> Self {
        Self {
            services: Services::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> ClinicContext {
    ClinicContext::create(Config::new())
}
