mod appointments;
mod dashboards;
mod error;
mod notifier;
mod poller;
mod shared;
mod view;
mod watcher;

pub use appointments::fetch_doctor_appointments::{FetchDoctorAppointmentsUseCase, UseCaseErrors};
pub use dashboards::DashboardKind;
pub use error::WatchError;
pub use notifier::Notifier;
pub use poller::{DateSelection, PollHandle, PollStream, PollTick, Poller, TickPolicy};
pub use shared::usecase::{execute, UseCase};
pub use view::{
    DashboardView, IViewSink, RecordingViewSink, RenderMode, TerminalViewSink, ViewOptions,
    ViewUpdater,
};
pub use watcher::{QueueWatcher, TickOutcome, WatchOptions, WatcherHandle};

#[cfg(test)]
mod test_helpers;
