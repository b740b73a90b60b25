use super::IAppointmentQuery;
use chrono::NaiveDate;
use clinic_queue_domain::{AppointmentSnapshot, ID};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

struct ScriptedResponse {
    latency: Duration,
    result: Result<Vec<AppointmentSnapshot>, String>,
}

/// Appointment queue kept in memory.
///
/// Scripted responses are handed out first, one per query, in the order
/// they were pushed. Once the script is exhausted the stored appointments
/// are queried instead.
pub struct InMemoryAppointmentQuery {
    appointments: Mutex<Vec<AppointmentSnapshot>>,
    script: Mutex<VecDeque<ScriptedResponse>>,
    calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryAppointmentQuery {
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, appointment: &AppointmentSnapshot) {
        lock(&self.appointments).push(appointment.clone());
    }

    /// Replaces the stored appointment with the same id
    pub fn save(&self, appointment: &AppointmentSnapshot) {
        let mut appointments = lock(&self.appointments);
        for stored in appointments.iter_mut() {
            if stored.id == appointment.id {
                *stored = appointment.clone();
            }
        }
    }

    pub fn push_response(&self, appointments: Vec<AppointmentSnapshot>) {
        self.push_delayed_response(Duration::from_millis(0), appointments);
    }

    pub fn push_delayed_response(&self, latency: Duration, appointments: Vec<AppointmentSnapshot>) {
        lock(&self.script).push_back(ScriptedResponse {
            latency,
            result: Ok(appointments),
        });
    }

    pub fn push_failure(&self, reason: &str) {
        lock(&self.script).push_back(ScriptedResponse {
            latency: Duration::from_millis(0),
            result: Err(reason.to_string()),
        });
    }

    /// Number of queries made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryAppointmentQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IAppointmentQuery for InMemoryAppointmentQuery {
    async fn find_by_doctor(
        &self,
        doctor_id: ID,
        date: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AppointmentSnapshot>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = lock(&self.script).pop_front();
        if let Some(scripted) = scripted {
            if scripted.latency > Duration::from_millis(0) {
                tokio::time::sleep(scripted.latency).await;
            }
            return scripted.result.map_err(anyhow::Error::msg);
        }

        let appointments = lock(&self.appointments)
            .iter()
            .filter(|appointment| appointment.doctor_id == doctor_id)
            .filter(|appointment| match &date {
                Some(date) => appointment.is_on(date),
                None => true,
            })
            .cloned()
            .collect();
        Ok(appointments)
    }
}
