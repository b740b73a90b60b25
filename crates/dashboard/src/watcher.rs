use crate::dashboards::DashboardKind;
use crate::error::WatchError;
use crate::notifier::Notifier;
use crate::poller::{DateSelection, PollHandle, PollStream, PollTick, Poller, TickPolicy};
use crate::view::{DashboardView, IViewSink, ViewOptions, ViewUpdater};
use chrono::NaiveDate;
use clinic_queue_domain::{dedup_by_id, TriggerBaseline, TriggerPredicate, ID};
use clinic_queue_infra::{ClinicContext, IToaster, MessageKey};
use futures::StreamExt;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

/// Everything that differs between the dashboards watching a queue
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Used in logs
    pub name: String,
    /// The doctor whose queue is watched. Watching refuses to start without one.
    pub doctor_id: Option<ID>,
    pub interval: Duration,
    pub trigger: TriggerPredicate,
    pub view: ViewOptions,
    /// Defaults to today
    pub selected_date: Option<NaiveDate>,
    pub tick_policy: TickPolicy,
}

impl WatchOptions {
    pub fn for_dashboard(kind: DashboardKind, doctor_id: Option<ID>, interval: Duration) -> Self {
        Self {
            name: kind.name().to_string(),
            doctor_id,
            interval,
            trigger: kind.trigger(),
            view: kind.view_options(),
            selected_date: None,
            tick_policy: TickPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Applied {
        /// Appointments that entered the trigger status with this tick
        new_triggers: BTreeSet<ID>,
        notified: bool,
    },
    /// The fetch failed and the user was told so
    Failed,
    /// Older than what is displayed, or fetched for another date selection
    Discarded,
}

/// The per dashboard polling state. Applies poll ticks one by one.
pub(crate) struct TickProcessor {
    trigger: TriggerPredicate,
    baseline: TriggerBaseline,
    baseline_generation: Option<u64>,
    last_applied: u64,
    selection: watch::Receiver<DateSelection>,
    notifier: Notifier,
    view: ViewUpdater,
    toaster: Arc<dyn IToaster>,
}

impl TickProcessor {
    pub fn new(
        trigger: TriggerPredicate,
        selection: watch::Receiver<DateSelection>,
        notifier: Notifier,
        view: ViewUpdater,
        toaster: Arc<dyn IToaster>,
    ) -> Self {
        Self {
            trigger,
            baseline: TriggerBaseline::new(),
            baseline_generation: None,
            last_applied: 0,
            selection,
            notifier,
            view,
            toaster,
        }
    }

    pub fn apply(&mut self, tick: PollTick) -> TickOutcome {
        let PollTick {
            seq,
            date,
            generation,
            result,
        } = tick;

        if seq <= self.last_applied {
            debug!(
                "Discarding poll tick {}, tick {} is already displayed",
                seq, self.last_applied
            );
            return TickOutcome::Discarded;
        }
        let selection = *self.selection.borrow();
        if generation != selection.generation {
            debug!(
                "Discarding poll tick {} fetched for {}, the date selection changed to {}",
                seq, date, selection.date
            );
            return TickOutcome::Discarded;
        }

        let appointments = match result {
            Ok(appointments) => appointments,
            Err(e) => {
                error!("Poll tick {} failed: {}", seq, e);
                self.toaster.show(MessageKey::FetchAppointmentsFailed);
                return TickOutcome::Failed;
            }
        };
        self.last_applied = seq;

        if self.baseline_generation != Some(generation) {
            self.baseline.reset();
            self.baseline_generation = Some(generation);
        }

        let appointments = dedup_by_id(appointments)
            .into_iter()
            .filter(|appointment| appointment.is_on(&date))
            .collect::<Vec<_>>();

        let detection = self.baseline.observe(&appointments, &self.trigger);
        if detection.has_new() {
            info!(
                "Appointments entered {:?}: {:?}",
                self.trigger.statuses(),
                detection.new_ids
            );
        }
        let notified = self.notifier.notify(detection.has_new());
        self.view.update(appointments);

        TickOutcome::Applied {
            new_triggers: detection.new_ids,
            notified,
        }
    }
}

/// Watches the appointment queue of one doctor for one dashboard:
/// poll, detect, notify and update the view.
pub struct QueueWatcher;

impl QueueWatcher {
    /// Starts watching. Fails without polling when no doctor is given or
    /// the interval is zero.
    pub fn activate(
        ctx: &ClinicContext,
        options: WatchOptions,
        sink: Box<dyn IViewSink>,
    ) -> Result<WatcherHandle, WatchError> {
        let doctor_id = match options.doctor_id {
            Some(id) => id,
            None => {
                error!("Dashboard: {} has no doctor to watch", options.name);
                ctx.services.toaster.show(MessageKey::DoctorNotResolved);
                return Err(WatchError::MissingSubject);
            }
        };

        let selected_date = options.selected_date.unwrap_or_else(|| ctx.sys.today());
        let (date_tx, date_rx) = watch::channel(DateSelection::new(selected_date));

        let poller = Poller::new(
            ctx.clone(),
            doctor_id,
            options.interval,
            options.tick_policy,
            date_rx.clone(),
        )?;

        let notifier = Notifier::new(ctx.services.audio.acquire());
        let view = ViewUpdater::new(options.view, sink);
        let current_view = view.current();
        let processor = TickProcessor::new(
            options.trigger,
            date_rx,
            notifier,
            view,
            ctx.services.toaster.clone(),
        );

        let (stream, poll) = poller.subscribe();
        info!(
            "Watching the appointments of doctor: {} on {} every {:?}",
            doctor_id, selected_date, options.interval
        );
        let span = info_span!("dashboard", name = %options.name, doctor_id = %doctor_id);
        let task = tokio::spawn(run(stream, processor).instrument(span));

        Ok(WatcherHandle {
            poll,
            selected_date: date_tx,
            view: current_view,
            task,
        })
    }
}

async fn run(mut stream: PollStream, mut processor: TickProcessor) {
    while let Some(tick) = stream.next().await {
        // Cancelled while the tick was handed out
        if stream.is_cancelled() {
            break;
        }
        processor.apply(tick);
    }
    debug!("Poll sequence ended");
}

/// Controls an active dashboard. Dropping it deactivates the dashboard.
pub struct WatcherHandle {
    poll: PollHandle,
    selected_date: watch::Sender<DateSelection>,
    view: Arc<Mutex<DashboardView>>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Changes the date filter. The next poll for that date is a new
    /// baseline and does not notify, even when switching back to a date
    /// shown before. Selecting the displayed date again changes nothing.
    pub fn select_date(&self, date: NaiveDate) {
        let current = *self.selected_date.borrow();
        if current.date == date {
            return;
        }
        self.selected_date.send_replace(current.select(date));
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date.borrow().date
    }

    /// What the dashboard currently displays
    pub fn view(&self) -> DashboardView {
        self.view
            .lock()
            .map(|view| view.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn is_active(&self) -> bool {
        !self.poll.is_cancelled()
    }

    /// Stops polling immediately. Responses still in flight are never displayed.
    pub fn cancel(&self) {
        self.poll.cancel();
    }

    /// Cancels and waits until the notification cue has been released
    pub async fn deactivate(self) {
        let WatcherHandle { poll, task, .. } = self;
        poll.cancel();
        if let Err(e) = task.await {
            if e.is_panic() {
                error!("Dashboard task panicked: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::fetch_doctor_appointments::UseCaseErrors;
    use crate::test_helpers::{appointment, date, TestContext};
    use crate::view::RecordingViewSink;
    use clinic_queue_domain::{AppointmentSnapshot, AppointmentStatus};
    use clinic_queue_infra::{CueEvent, IAudioCueProvider, RecordingAudioCueProvider, RecordingToaster};
    use tokio::time::{pause, sleep};

    struct Harness {
        processor: TickProcessor,
        date_tx: watch::Sender<DateSelection>,
        audio: RecordingAudioCueProvider,
        toaster: RecordingToaster,
        sink: RecordingViewSink,
    }

    fn harness() -> Harness {
        let (date_tx, date_rx) = watch::channel(DateSelection::new(date()));
        let audio = RecordingAudioCueProvider::new();
        let toaster = RecordingToaster::new();
        let sink = RecordingViewSink::new();
        let processor = TickProcessor::new(
            DashboardKind::DoctorAppointmentList.trigger(),
            date_rx,
            Notifier::new(audio.acquire()),
            ViewUpdater::new(
                DashboardKind::DoctorAppointmentList.view_options(),
                Box::new(sink.clone()),
            ),
            Arc::new(toaster.clone()),
        );
        Harness {
            processor,
            date_tx,
            audio,
            toaster,
            sink,
        }
    }

    impl Harness {
        fn select(&self, date: NaiveDate) -> u64 {
            let next = self.date_tx.borrow().select(date);
            self.date_tx.send_replace(next);
            next.generation
        }
    }

    fn ok(seq: u64, appointments: Vec<AppointmentSnapshot>) -> PollTick {
        PollTick {
            seq,
            date: date(),
            generation: 0,
            result: Ok(appointments),
        }
    }

    fn failed(seq: u64) -> PollTick {
        PollTick {
            seq,
            date: date(),
            generation: 0,
            result: Err(UseCaseErrors::QueryFailed {
                doctor_id: ID::new(42),
                reason: "network down".into(),
            }),
        }
    }

    fn ids(set: &[i64]) -> BTreeSet<ID> {
        set.iter().map(|id| ID::new(*id)).collect()
    }

    #[test]
    fn first_tick_is_a_silent_baseline() {
        let mut h = harness();
        let outcome = h.processor.apply(ok(
            1,
            vec![
                appointment(1, AppointmentStatus::NextInQueue, "09:00"),
                appointment(2, AppointmentStatus::NextInQueue, "09:15"),
            ],
        ));
        assert_eq!(
            outcome,
            TickOutcome::Applied {
                new_triggers: BTreeSet::new(),
                notified: false
            }
        );
        assert_eq!(h.audio.play_count(), 0);
        assert_eq!(h.sink.last().unwrap().appointments().len(), 2);
    }

    #[test]
    fn entering_the_trigger_status_notifies_once() {
        let mut h = harness();
        h.processor
            .apply(ok(1, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));
        let outcome = h.processor.apply(ok(
            2,
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        ));
        assert_eq!(
            outcome,
            TickOutcome::Applied {
                new_triggers: ids(&[1]),
                notified: true
            }
        );
        // Still next in queue, nothing new
        h.processor.apply(ok(
            3,
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        ));
        assert_eq!(h.audio.play_count(), 1);
    }

    #[test]
    fn failed_ticks_toast_and_keep_the_display() {
        let mut h = harness();
        h.processor
            .apply(ok(1, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));
        assert_eq!(h.processor.apply(failed(2)), TickOutcome::Failed);
        assert_eq!(h.toaster.shown(), vec![MessageKey::FetchAppointmentsFailed]);
        assert_eq!(h.sink.refreshed().len(), 1);

        // Polling carries on after a failure
        let outcome = h.processor.apply(ok(
            3,
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        ));
        assert!(matches!(outcome, TickOutcome::Applied { notified: true, .. }));
    }

    #[test]
    fn late_responses_of_older_ticks_are_discarded() {
        let mut h = harness();
        h.processor
            .apply(ok(2, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));
        let outcome = h.processor.apply(ok(
            1,
            vec![appointment(9, AppointmentStatus::NextInQueue, "08:00")],
        ));
        assert_eq!(outcome, TickOutcome::Discarded);
        assert_eq!(h.sink.last().unwrap().appointments()[0].id, ID::new(1));
        assert_eq!(h.audio.play_count(), 0);
    }

    #[test]
    fn changing_the_date_establishes_a_new_baseline() {
        let mut h = harness();
        h.processor
            .apply(ok(1, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));

        let tomorrow = date().succ_opt().unwrap();
        let generation = h.select(tomorrow);

        // Fetched before the date changed
        assert_eq!(
            h.processor.apply(ok(2, Vec::new())),
            TickOutcome::Discarded
        );

        let mut next_day = appointment(5, AppointmentStatus::NextInQueue, "09:00");
        next_day.slot.date = tomorrow;
        let outcome = h.processor.apply(PollTick {
            seq: 3,
            date: tomorrow,
            generation,
            result: Ok(vec![next_day]),
        });
        assert_eq!(
            outcome,
            TickOutcome::Applied {
                new_triggers: BTreeSet::new(),
                notified: false
            }
        );
        assert_eq!(h.sink.last().unwrap().appointments()[0].id, ID::new(5));
    }

    #[test]
    fn switching_back_to_a_date_establishes_a_new_baseline() {
        let mut h = harness();
        h.processor
            .apply(ok(1, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));

        h.select(date().succ_opt().unwrap());
        let generation = h.select(date());
        assert_eq!(generation, 2);

        let outcome = h.processor.apply(PollTick {
            seq: 2,
            date: date(),
            generation,
            result: Ok(vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")]),
        });
        assert_eq!(
            outcome,
            TickOutcome::Applied {
                new_triggers: BTreeSet::new(),
                notified: false
            }
        );
        assert_eq!(h.audio.play_count(), 0);

        // The next change on the same date is detected again
        let outcome = h.processor.apply(PollTick {
            seq: 3,
            date: date(),
            generation,
            result: Ok(vec![
                appointment(1, AppointmentStatus::NextInQueue, "09:00"),
                appointment(2, AppointmentStatus::NextInQueue, "09:15"),
            ]),
        });
        assert!(matches!(outcome, TickOutcome::Applied { notified: true, .. }));
    }

    #[test]
    fn ticks_of_an_earlier_selection_of_the_same_date_are_discarded() {
        let mut h = harness();
        h.processor
            .apply(ok(1, vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]));

        h.select(date().succ_opt().unwrap());
        h.select(date());

        // Issued for the first selection of the date, answered after the switch back
        let outcome = h.processor.apply(ok(
            2,
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        ));
        assert_eq!(outcome, TickOutcome::Discarded);
        assert_eq!(h.sink.refreshed().len(), 1);
        assert_eq!(h.audio.play_count(), 0);
    }

    #[test]
    fn appointments_of_other_dates_are_not_displayed() {
        let mut h = harness();
        let mut other_day = appointment(2, AppointmentStatus::Upcoming, "09:00");
        other_day.slot.date = date().succ_opt().unwrap();
        h.processor.apply(ok(
            1,
            vec![appointment(1, AppointmentStatus::Upcoming, "10:00"), other_day],
        ));
        assert_eq!(h.sink.last().unwrap().appointments().len(), 1);
    }

    #[test]
    fn blocked_playback_does_not_interrupt_processing() {
        let (_date_tx, date_rx) = watch::channel(DateSelection::new(date()));
        let audio = RecordingAudioCueProvider::blocked();
        let toaster = RecordingToaster::new();
        let sink = RecordingViewSink::new();
        let mut processor = TickProcessor::new(
            DashboardKind::DoctorAppointmentList.trigger(),
            date_rx,
            Notifier::new(audio.acquire()),
            ViewUpdater::new(
                DashboardKind::DoctorAppointmentList.view_options(),
                Box::new(sink.clone()),
            ),
            Arc::new(toaster.clone()),
        );
        processor.apply(ok(1, Vec::new()));
        let outcome = processor.apply(ok(
            2,
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        ));
        assert!(matches!(outcome, TickOutcome::Applied { notified: false, .. }));
        assert_eq!(audio.play_count(), 1);
        assert!(toaster.shown().is_empty());
        assert_eq!(sink.refreshed().len(), 2);
    }

    #[tokio::test]
    async fn it_refuses_to_start_without_a_doctor() {
        let t = TestContext::new();
        let options = WatchOptions::for_dashboard(
            DashboardKind::DoctorHome,
            None,
            Duration::from_secs(5),
        );
        let res = QueueWatcher::activate(&t.ctx, options, Box::new(RecordingViewSink::new()));
        assert!(matches!(res, Err(WatchError::MissingSubject)));
        assert_eq!(t.toaster.shown(), vec![MessageKey::DoctorNotResolved]);
        assert_eq!(t.query.calls(), 0);
        assert_eq!(t.audio.acquired_count(), 0);
    }

    #[tokio::test]
    async fn it_refuses_a_zero_interval() {
        let t = TestContext::new();
        let options = WatchOptions::for_dashboard(
            DashboardKind::DoctorHome,
            Some(ID::new(42)),
            Duration::from_secs(0),
        );
        let res = QueueWatcher::activate(&t.ctx, options, Box::new(RecordingViewSink::new()));
        assert!(matches!(res, Err(WatchError::InvalidInterval(_))));
    }

    #[tokio::test]
    async fn deactivation_releases_the_cue_and_discards_late_responses() {
        pause();
        let t = TestContext::new();
        t.query.push_response(vec![appointment(1, AppointmentStatus::Upcoming, "09:00")]);
        t.query.push_delayed_response(
            Duration::from_secs(3),
            vec![appointment(1, AppointmentStatus::NextInQueue, "09:00")],
        );
        let sink = RecordingViewSink::new();
        let mut options = WatchOptions::for_dashboard(
            DashboardKind::DoctorAppointmentList,
            Some(ID::new(42)),
            Duration::from_secs(5),
        );
        options.selected_date = Some(date());
        let handle = QueueWatcher::activate(&t.ctx, options, Box::new(sink.clone())).unwrap();

        // Tick 2 is issued at 5s and would answer at 8s
        sleep(Duration::from_secs(6)).await;
        assert_eq!(t.query.calls(), 2);
        assert!(handle.is_active());
        handle.deactivate().await;
        sleep(Duration::from_secs(10)).await;

        assert_eq!(sink.refreshed().len(), 1);
        assert_eq!(t.audio.play_count(), 0);
        assert_eq!(t.audio.events().last(), Some(&CueEvent::Stop));
        assert_eq!(t.query.calls(), 2);
    }

    #[tokio::test]
    async fn selected_date_changes_reach_the_poller() {
        pause();
        let t = TestContext::new();
        let mut options = WatchOptions::for_dashboard(
            DashboardKind::SecretaryMyAppointment,
            Some(ID::new(42)),
            Duration::from_secs(5),
        );
        options.selected_date = Some(date());
        let handle = QueueWatcher::activate(&t.ctx, options, Box::new(RecordingViewSink::new())).unwrap();
        assert_eq!(handle.selected_date(), date());

        let mut tomorrow_appointment = appointment(3, AppointmentStatus::InProgress, "09:00");
        let tomorrow = date().succ_opt().unwrap();
        tomorrow_appointment.slot.date = tomorrow;
        t.query.insert(&tomorrow_appointment);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.view(), DashboardView::List(Vec::new()));

        handle.select_date(tomorrow);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.view().appointments().len(), 1);
        // New baseline for the new date
        assert_eq!(t.audio.play_count(), 0);
        handle.cancel();
        assert!(!handle.is_active());
    }

    #[tokio::test]
    async fn round_trip_through_another_date_does_not_notify() {
        pause();
        let t = TestContext::new();
        t.query.insert(&appointment(1, AppointmentStatus::Upcoming, "09:00"));
        let mut options = WatchOptions::for_dashboard(
            DashboardKind::DoctorAppointmentList,
            Some(ID::new(42)),
            Duration::from_secs(5),
        );
        options.selected_date = Some(date());
        let handle = QueueWatcher::activate(&t.ctx, options, Box::new(RecordingViewSink::new())).unwrap();
        sleep(Duration::from_secs(1)).await;

        t.query.save(&appointment(1, AppointmentStatus::NextInQueue, "09:00"));
        handle.select_date(date().succ_opt().unwrap());
        handle.select_date(date());
        sleep(Duration::from_secs(5)).await;

        assert_eq!(handle.selected_date(), date());
        assert_eq!(
            handle.view().appointments()[0].status,
            AppointmentStatus::NextInQueue
        );
        assert_eq!(t.audio.play_count(), 0);
        handle.deactivate().await;
    }
}
