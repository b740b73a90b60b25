use clinic_queue_domain::{sort_by_start_time, AppointmentSnapshot, AppointmentStatus, StatusCounts};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    /// One row per appointment
    List,
    /// Number of appointments per status
    Counts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub render: RenderMode,
    /// Appointments in these statuses are not displayed
    pub excluded: Vec<AppointmentStatus>,
    /// Display the list ordered by start time
    pub chronological: bool,
}

/// What a dashboard currently displays
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// Nothing has been fetched yet
    Loading,
    List(Vec<AppointmentSnapshot>),
    Counts(StatusCounts),
}

impl DashboardView {
    pub fn appointments(&self) -> &[AppointmentSnapshot] {
        match self {
            Self::List(appointments) => appointments,
            _ => &[],
        }
    }
}

/// Whatever presents a dashboard to the user
pub trait IViewSink: Send {
    /// Called after every replacement of the displayed state
    fn refresh(&mut self, view: &DashboardView);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replaces the displayed state of one dashboard with the latest poll
pub struct ViewUpdater {
    options: ViewOptions,
    current: Arc<Mutex<DashboardView>>,
    sink: Box<dyn IViewSink>,
}

impl ViewUpdater {
    pub fn new(options: ViewOptions, sink: Box<dyn IViewSink>) -> Self {
        Self {
            options,
            current: Arc::new(Mutex::new(DashboardView::Loading)),
            sink,
        }
    }

    /// Shared read access to the displayed state
    pub fn current(&self) -> Arc<Mutex<DashboardView>> {
        self.current.clone()
    }

    /// The previous state is dropped entirely, nothing is merged
    pub fn update(&mut self, appointments: Vec<AppointmentSnapshot>) {
        let view = self.build(appointments);
        *lock(&self.current) = view.clone();
        self.sink.refresh(&view);
    }

    fn build(&self, appointments: Vec<AppointmentSnapshot>) -> DashboardView {
        let mut appointments = appointments
            .into_iter()
            .filter(|appointment| !self.options.excluded.contains(&appointment.status))
            .collect::<Vec<_>>();

        match self.options.render {
            RenderMode::Counts => DashboardView::Counts(StatusCounts::from_snapshots(&appointments)),
            RenderMode::List => {
                if self.options.chronological {
                    sort_by_start_time(&mut appointments);
                }
                DashboardView::List(appointments)
            }
        }
    }
}

/// Keeps every refreshed view
#[derive(Clone, Default)]
pub struct RecordingViewSink {
    refreshed: Arc<Mutex<Vec<DashboardView>>>,
}

impl RecordingViewSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshed(&self) -> Vec<DashboardView> {
        lock(&self.refreshed).clone()
    }

    pub fn last(&self) -> Option<DashboardView> {
        lock(&self.refreshed).last().cloned()
    }
}

impl IViewSink for RecordingViewSink {
    fn refresh(&mut self, view: &DashboardView) {
        lock(&self.refreshed).push(view.clone());
    }
}

/// Prints the dashboard on stdout
pub struct TerminalViewSink {
    title: String,
}

impl TerminalViewSink {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl IViewSink for TerminalViewSink {
    fn refresh(&mut self, view: &DashboardView) {
        println!("== {} ==", self.title);
        match view {
            DashboardView::Loading => println!("Loading ..."),
            DashboardView::List(appointments) if appointments.is_empty() => {
                println!("No appointments")
            }
            DashboardView::List(appointments) => {
                for appointment in appointments {
                    println!(
                        "#{:<6} {}-{}  patient {:<8} {}",
                        appointment.id,
                        appointment.slot.start_time.format("%H:%M"),
                        appointment.slot.end_time.format("%H:%M"),
                        appointment.patient_id,
                        appointment.status
                    );
                }
            }
            DashboardView::Counts(counts) => {
                println!("Total: {}  Waiting: {}", counts.total, counts.waiting());
                for status in AppointmentStatus::ALL.iter() {
                    println!("{:<12} {}", status.label(), counts.count(*status));
                }
            }
        }
    }
}
