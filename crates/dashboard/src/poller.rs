//! Repeating fetch of a doctor's appointment queue.
//!
//! Ticks fire on a fixed interval whether or not the previous fetch has
//! completed. Every tick is numbered, so consumers can tell a late response
//! of an older tick from a fresh one.

use crate::appointments::fetch_doctor_appointments::{
    FetchDoctorAppointmentsUseCase, UseCaseErrors,
};
use crate::error::WatchError;
use crate::shared::usecase::execute;
use chrono::NaiveDate;
use clinic_queue_domain::{AppointmentSnapshot, ID};
use clinic_queue_infra::ClinicContext;
use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// What happens to a tick firing while an earlier fetch is still running
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickPolicy {
    /// The tick is skipped
    SingleFlight,
    /// The tick issues its own fetch. Responses may arrive out of order.
    Overlapping,
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self::SingleFlight
    }
}

/// The date a dashboard filters on. Every change of the date starts a new
/// generation, so selecting A, then B, then A again is told apart from
/// never leaving A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateSelection {
    pub generation: u64,
    pub date: NaiveDate,
}

impl DateSelection {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            generation: 0,
            date,
        }
    }

    pub fn select(&self, date: NaiveDate) -> Self {
        Self {
            generation: self.generation + 1,
            date,
        }
    }
}

/// The outcome of one poll tick
#[derive(Debug)]
pub struct PollTick {
    /// Strictly increasing per subscription, starting at 1
    pub seq: u64,
    /// The date the appointments were fetched for
    pub date: NaiveDate,
    /// Generation of the date selection the fetch was issued for
    pub generation: u64,
    pub result: Result<Vec<AppointmentSnapshot>, UseCaseErrors>,
}

pub struct Poller {
    ctx: ClinicContext,
    doctor_id: ID,
    period: Duration,
    policy: TickPolicy,
    selection: watch::Receiver<DateSelection>,
}

impl Poller {
    pub fn new(
        ctx: ClinicContext,
        doctor_id: ID,
        period: Duration,
        policy: TickPolicy,
        selection: watch::Receiver<DateSelection>,
    ) -> Result<Self, WatchError> {
        if period == Duration::from_secs(0) {
            return Err(WatchError::InvalidInterval(period));
        }
        Ok(Self {
            ctx,
            doctor_id,
            period,
            policy,
            selection,
        })
    }

    /// Starts a new sequence of ticks. The first tick fires immediately.
    ///
    /// Subscribing again after a cancellation starts over with a fresh
    /// sequence.
    pub fn subscribe(&self) -> (PollStream, PollHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(poll_loop(
            self.ctx.clone(),
            self.doctor_id,
            self.period,
            self.policy,
            self.selection.clone(),
            tx,
            cancel_rx.clone(),
        ));

        let stream = PollStream {
            rx,
            cancelled: cancel_rx,
        };
        let handle = PollHandle { cancel_tx, task };
        (stream, handle)
    }
}

async fn poll_loop(
    ctx: ClinicContext,
    doctor_id: ID,
    period: Duration,
    policy: TickPolicy,
    selection: watch::Receiver<DateSelection>,
    tx: mpsc::UnboundedSender<PollTick>,
    cancelled: watch::Receiver<bool>,
) {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wait_for_cancel(cancelled.clone()) => break,
        }

        seq += 1;
        if policy == TickPolicy::SingleFlight && in_flight.load(Ordering::SeqCst) > 0 {
            debug!(
                "Skipping poll tick {} for doctor: {}, previous fetch still running",
                seq, doctor_id
            );
            continue;
        }

        let tick_selection = *selection.borrow();
        in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(fetch_tick(
            ctx.clone(),
            doctor_id,
            seq,
            tick_selection,
            in_flight.clone(),
            tx.clone(),
            cancelled.clone(),
        ));
    }
}

async fn fetch_tick(
    ctx: ClinicContext,
    doctor_id: ID,
    seq: u64,
    selection: DateSelection,
    in_flight: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<PollTick>,
    cancelled: watch::Receiver<bool>,
) {
    let usecase = FetchDoctorAppointmentsUseCase {
        doctor_id,
        date: selection.date,
    };
    tokio::select! {
        result = execute(usecase, &ctx) => {
            in_flight.fetch_sub(1, Ordering::SeqCst);
            if *cancelled.borrow() {
                debug!("Discarding poll tick {} for doctor: {}, polling was cancelled", seq, doctor_id);
                return;
            }
            // The receiver is gone when the consumer stopped listening
            let _ = tx.send(PollTick {
                seq,
                date: selection.date,
                generation: selection.generation,
                result,
            });
        }
        _ = wait_for_cancel(cancelled.clone()) => {
            in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Resolves once cancellation was requested or the handle is gone
async fn wait_for_cancel(mut cancelled: watch::Receiver<bool>) {
    loop {
        if *cancelled.borrow() {
            return;
        }
        if cancelled.changed().await.is_err() {
            return;
        }
    }
}

/// The lazily produced, infinite sequence of poll ticks. Ends only when
/// the subscription is cancelled.
pub struct PollStream {
    rx: mpsc::UnboundedReceiver<PollTick>,
    cancelled: watch::Receiver<bool>,
}

impl PollStream {
    /// Ticks already handed out before a cancellation must not be applied
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

impl Stream for PollStream {
    type Item = PollTick;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if *self.cancelled.borrow() {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            // Responses racing with the cancellation are dropped here
            Poll::Ready(Some(_)) if *self.cancelled.borrow() => Poll::Ready(None),
            other => other,
        }
    }
}

/// Cancels the subscription when told to or when dropped
pub struct PollHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops issuing fetches immediately. Results of fetches still in
    /// flight are discarded.
    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
