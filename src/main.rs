mod telemetry;

use clinic_queue_dashboard::{DashboardKind, QueueWatcher, TerminalViewSink, WatchOptions};
use clinic_queue_infra::setup_context;
use clinic_queue_sdk::ClinicSDK;
use telemetry::{get_subscriber, init_subscriber};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("clinic_queue".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context();

    let sdk = ClinicSDK::new(
        context.config.api_address.clone(),
        context.config.api_key.clone(),
    );
    match sdk.status.check_health().await {
        Ok(res) => info!("Clinic api at {} is up: {}", context.config.api_address, res.message),
        // Polling keeps retrying, a down api only means toasts until it is back
        Err(e) => warn!(
            "Clinic api at {} is not reachable: {}",
            context.config.api_address, e
        ),
    }

    let kind = match context.config.dashboard.parse::<DashboardKind>() {
        Ok(kind) => kind,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut options = WatchOptions::for_dashboard(
        kind,
        context.config.doctor_id,
        context.config.poll_interval,
    );
    options.selected_date = context.config.selected_date;

    let handle = match QueueWatcher::activate(
        &context,
        options,
        Box::new(TerminalViewSink::new(kind.name())),
    ) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Unable to start the dashboard: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for the shutdown signal: {}", e);
    }
    info!("Shutting down the {} dashboard", kind.name());
    handle.deactivate().await;
}
