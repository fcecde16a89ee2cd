use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::persistence::{StatePatch, StateStore};
use crate::schedule::{ScheduleDay, ScheduleSummary, Scheduler, SchedulerConfig};
use crate::task::{DevTask, Stream, Task, UniversityTask};
use crate::task_validation::{TaskValidationError, validate_dev_task, validate_university_task};

/// Everything the planner remembers between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    #[serde(with = "tagged_queue")]
    pub uni_queue: Vec<UniversityTask>,
    #[serde(with = "tagged_queue")]
    pub dev_queue: Vec<DevTask>,
    pub schedule: Vec<ScheduleDay>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

/// Writes queued tasks with their `"type"` tag, the same shape they take
/// inside schedule days. Reading accepts records with or without it.
mod tagged_queue {
    use super::Task;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<T, S>(queue: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Clone + Into<Task>,
        S: Serializer,
    {
        serializer.collect_seq(queue.iter().cloned().map(Into::<Task>::into))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer)
    }
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            uni_queue: Vec::new(),
            dev_queue: Vec::new(),
            schedule: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    #[error("task {0} is already queued")]
    DuplicateId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total_tasks: usize,
    pub queued_uni: usize,
    pub queued_dev: usize,
}

/// Result of [`DualStreamPlanner::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub summary: ScheduleSummary,
    /// Tasks left in the queues because the day limit was reached.
    pub carried_over: usize,
    pub unschedulable: Vec<Task>,
    pub truncated: bool,
}

/// Hook run after every successful change to the planner state.
pub trait StateObserver: Send + Sync {
    fn state_changed(&self, state: &PlannerState);

    /// Called by [`DualStreamPlanner::reset_all`] instead of `state_changed`.
    fn cleared(&self) {}
}

/// Saves the full snapshot to a [`StateStore`] on every change.
pub struct PersistOnChange<S> {
    store: S,
}

impl<S: StateStore> PersistOnChange<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> StateObserver for PersistOnChange<S>
where
    S: StateStore + Send + Sync,
{
    fn state_changed(&self, state: &PlannerState) {
        if let Err(err) = self.store.save(StatePatch::full(state)) {
            warn!(error = %err, "failed to persist planner state");
        }
    }

    fn cleared(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted planner state");
        }
    }
}

/// Single owner of the two task queues and the last generated schedule.
///
/// All mutation goes through `&mut self`; callers sharing a planner across
/// threads wrap it in a lock.
pub struct DualStreamPlanner {
    state: PlannerState,
    scheduler: Scheduler,
    observers: Vec<Box<dyn StateObserver>>,
}

impl Default for DualStreamPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DualStreamPlanner {
    pub fn new() -> Self {
        Self::from_state(PlannerState::default())
    }

    pub fn from_state(state: PlannerState) -> Self {
        Self {
            state,
            scheduler: Scheduler::default(),
            observers: Vec::new(),
        }
    }

    /// Builds a planner from whatever `store` holds; bad data gives an empty planner.
    pub fn restore<S: StateStore>(store: &S) -> Self {
        Self::from_state(store.load())
    }

    pub fn with_scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = Scheduler::new(config);
        self
    }

    pub fn observe(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn uni_queue(&self) -> &[UniversityTask] {
        &self.state.uni_queue
    }

    pub fn dev_queue(&self) -> &[DevTask] {
        &self.state.dev_queue
    }

    pub fn schedule(&self) -> &[ScheduleDay] {
        &self.state.schedule
    }

    pub fn scheduler_config(&self) -> &SchedulerConfig {
        self.scheduler.config()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            total_tasks: self.state.uni_queue.len() + self.state.dev_queue.len(),
            queued_uni: self.state.uni_queue.len(),
            queued_dev: self.state.dev_queue.len(),
        }
    }

    pub fn add_university_task(&mut self, task: UniversityTask) -> Result<String, PlannerError> {
        validate_university_task(&task)?;
        self.ensure_unique(&task.id)?;
        let id = task.id.clone();
        self.state.uni_queue.push(task);
        self.notify();
        Ok(id)
    }

    pub fn add_dev_task(&mut self, task: DevTask) -> Result<String, PlannerError> {
        validate_dev_task(&task)?;
        self.ensure_unique(&task.id)?;
        let id = task.id.clone();
        self.state.dev_queue.push(task);
        self.notify();
        Ok(id)
    }

    pub fn add_task(&mut self, task: Task) -> Result<String, PlannerError> {
        match task {
            Task::University(task) => self.add_university_task(task),
            Task::Dev(task) => self.add_dev_task(task),
        }
    }

    /// Drops the queued task with `id` from `stream`. Returns `false` when
    /// nothing matched; the order of the other tasks is kept.
    pub fn remove_task(&mut self, id: &str, stream: Stream) -> bool {
        let removed = match stream {
            Stream::University => {
                let before = self.state.uni_queue.len();
                self.state.uni_queue.retain(|task| task.id != id);
                before != self.state.uni_queue.len()
            }
            Stream::Dev => {
                let before = self.state.dev_queue.len();
                self.state.dev_queue.retain(|task| task.id != id);
                before != self.state.dev_queue.len()
            }
        };
        if removed {
            self.notify();
        }
        removed
    }

    /// Like [`remove_task`](Self::remove_task) but searches both queues.
    pub fn remove_task_any(&mut self, id: &str) -> Option<Stream> {
        [Stream::University, Stream::Dev]
            .into_iter()
            .find(|stream| self.remove_task(id, *stream))
    }

    /// Schedules both queues from the day after `reference`, replacing the
    /// previous schedule. Scheduled tasks leave their queues.
    pub fn merge(&mut self, reference: NaiveDate) -> MergeReport {
        if self.state.uni_queue.is_empty() && self.state.dev_queue.is_empty() {
            self.state.schedule.clear();
            self.notify();
            return MergeReport::default();
        }

        let outcome = self
            .scheduler
            .plan(&self.state.uni_queue, &self.state.dev_queue, reference);

        let summary = ScheduleSummary::from_days(&outcome.days);
        let carried_over = outcome.remaining_uni.len() + outcome.remaining_dev.len();
        info!(
            days = summary.days,
            tasks = summary.tasks,
            carried_over,
            "merged task streams"
        );

        self.state.schedule = outcome.days;
        self.state.uni_queue = outcome.remaining_uni;
        self.state.dev_queue = outcome.remaining_dev;
        self.notify();

        MergeReport {
            summary,
            carried_over,
            unschedulable: outcome.unschedulable,
            truncated: outcome.truncated,
        }
    }

    /// Replaces the whole state, e.g. after an explicit import.
    pub fn replace_state(&mut self, state: PlannerState) {
        self.state = state;
        self.notify();
    }

    /// Empties both queues and the schedule and clears persisted state.
    pub fn reset_all(&mut self) {
        self.state = PlannerState::default();
        for observer in &self.observers {
            observer.cleared();
        }
    }

    /// Ids only need to be unique among queued tasks; the schedule is a
    /// separate snapshot and may already hold a task with the same id.
    fn ensure_unique(&self, id: &str) -> Result<(), PlannerError> {
        let queued = self.state.uni_queue.iter().any(|task| task.id == id)
            || self.state.dev_queue.iter().any(|task| task.id == id);
        if queued {
            return Err(PlannerError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn notify(&mut self) {
        self.state.last_updated = Utc::now();
        for observer in &self.observers {
            observer.state_changed(&self.state);
        }
    }
}
