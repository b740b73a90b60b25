//! Detection of appointments entering a trigger status between two polls.
//!
//! Only the *appearance* of an id in the trigger status is reported. An
//! appointment that enters and leaves the trigger status between two polls
//! is never seen and therefore never reported.

use crate::{AppointmentSnapshot, AppointmentStatus, ID};
use std::collections::BTreeSet;

/// The statuses whose appearance should be announced
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPredicate {
    statuses: Vec<AppointmentStatus>,
}

impl TriggerPredicate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self::any_of(&[status])
    }

    pub fn any_of(statuses: &[AppointmentStatus]) -> Self {
        Self {
            statuses: statuses
                .iter()
                .copied()
                .filter(|s| *s != AppointmentStatus::Unknown)
                .collect(),
        }
    }

    pub fn matches(&self, appointment: &AppointmentSnapshot) -> bool {
        self.statuses.contains(&appointment.status)
    }

    pub fn statuses(&self) -> &[AppointmentStatus] {
        &self.statuses
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detection {
    /// Ids in the trigger status now that were not in it at the previous poll
    pub new_ids: BTreeSet<ID>,
    /// Ids in the trigger status now. This is the `previous` set of the next poll.
    pub carried: BTreeSet<ID>,
}

impl Detection {
    pub fn has_new(&self) -> bool {
        !self.new_ids.is_empty()
    }
}

/// Diffs the current trigger ids against the previous ones.
///
/// Without a `previous` set there is nothing to compare against, so the
/// current set only becomes the baseline and nothing is reported.
pub fn detect_new_triggers(
    current: &[AppointmentSnapshot],
    previous: Option<&BTreeSet<ID>>,
    trigger: &TriggerPredicate,
) -> Detection {
    let carried = current
        .iter()
        .filter(|appointment| trigger.matches(appointment))
        .map(|appointment| appointment.id)
        .collect::<BTreeSet<_>>();

    let new_ids = match previous {
        Some(previous) => carried.difference(previous).copied().collect(),
        None => BTreeSet::new(),
    };

    Detection { new_ids, carried }
}

/// The trigger ids observed at the last applied poll of one dashboard.
/// Starts without a baseline.
#[derive(Debug, Clone, Default)]
pub struct TriggerBaseline {
    known: Option<BTreeSet<ID>>,
}

impl TriggerBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_established(&self) -> bool {
        self.known.is_some()
    }

    pub fn known(&self) -> Option<&BTreeSet<ID>> {
        self.known.as_ref()
    }

    /// Next applied poll only establishes a new baseline
    pub fn reset(&mut self) {
        self.known = None;
    }

    /// Compares `current` with the baseline and carries the current trigger
    /// ids forward as the new baseline.
    pub fn observe(
        &mut self,
        current: &[AppointmentSnapshot],
        trigger: &TriggerPredicate,
    ) -> Detection {
        let detection = detect_new_triggers(current, self.known.as_ref(), trigger);
        self.known = Some(detection.carried.clone());
        detection
    }
}
