use crate::queue::PlannerState;
use crate::schedule::ScheduleDay;
use crate::task::{DevTask, EnergyCost, UniversityTask};
use crate::task_validation::{validate_dev_task, validate_task, validate_university_task};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Key under which the planner snapshot is stored.
pub const STORAGE_KEY: &str = "dual-stream-planner-state";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Partial update merged into the last persisted snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub uni_queue: Option<Vec<UniversityTask>>,
    pub dev_queue: Option<Vec<DevTask>>,
    pub schedule: Option<Vec<ScheduleDay>>,
}

impl StatePatch {
    pub fn full(state: &PlannerState) -> Self {
        Self {
            uni_queue: Some(state.uni_queue.clone()),
            dev_queue: Some(state.dev_queue.clone()),
            schedule: Some(state.schedule.clone()),
        }
    }

    pub fn schedule_only(schedule: Vec<ScheduleDay>) -> Self {
        Self {
            schedule: Some(schedule),
            ..Self::default()
        }
    }

    pub fn apply_to(self, state: &mut PlannerState) {
        if let Some(uni_queue) = self.uni_queue {
            state.uni_queue = uni_queue;
        }
        if let Some(dev_queue) = self.dev_queue {
            state.dev_queue = dev_queue;
        }
        if let Some(schedule) = self.schedule {
            state.schedule = schedule;
        }
    }
}

/// Opaque blob storage for the planner snapshot.
///
/// Implementors only move strings around; decoding, merging and the
/// fall-back-to-defaults behavior live in the provided methods.
pub trait StateStore {
    fn read_blob(&self) -> PersistenceResult<Option<String>>;
    fn write_blob(&self, blob: &str) -> PersistenceResult<()>;
    fn remove_blob(&self) -> PersistenceResult<()>;

    /// Loads the stored snapshot. Missing, unreadable or malformed data yields
    /// an empty state.
    fn load(&self) -> PlannerState {
        match self.read_blob() {
            Ok(Some(blob)) => match serde_json::from_str::<PlannerState>(&blob) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "stored planner state is malformed; using defaults");
                    PlannerState::default()
                }
            },
            Ok(None) => PlannerState::default(),
            Err(err) => {
                warn!(error = %err, "failed to read planner state; using defaults");
                PlannerState::default()
            }
        }
    }

    fn save(&self, patch: StatePatch) -> PersistenceResult<()> {
        let mut state = self.load();
        patch.apply_to(&mut state);
        state.last_updated = Utc::now();
        let blob = serde_json::to_string_pretty(&state)?;
        self.write_blob(&blob)
    }

    fn clear(&self) -> PersistenceResult<()> {
        self.remove_blob()
    }

    /// Timestamp of the last save, if a readable snapshot exists.
    fn last_updated(&self) -> Option<DateTime<Utc>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Stamp {
            last_updated: DateTime<Utc>,
        }

        let blob = self.read_blob().ok()??;
        serde_json::from_str::<Stamp>(&blob)
            .ok()
            .map(|stamp| stamp.last_updated)
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn read_blob(&self) -> PersistenceResult<Option<String>> {
        (**self).read_blob()
    }

    fn write_blob(&self, blob: &str) -> PersistenceResult<()> {
        (**self).write_blob(blob)
    }

    fn remove_blob(&self) -> PersistenceResult<()> {
        (**self).remove_blob()
    }
}

/// In-process store, mostly useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn read_blob(&self) -> PersistenceResult<Option<String>> {
        Ok(self.blob.lock().clone())
    }

    fn write_blob(&self, blob: &str) -> PersistenceResult<()> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }

    fn remove_blob(&self) -> PersistenceResult<()> {
        self.blob.lock().take();
        Ok(())
    }
}

fn check_unique<'a>(
    seen: &mut HashSet<&'a str>,
    id: &'a str,
    scope: &str,
) -> PersistenceResult<()> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(PersistenceError::InvalidData(format!(
            "duplicate task id {id} in {scope}"
        )))
    }
}

/// Checks a snapshot before it is imported: every task must be well-formed,
/// ids are unique across both queues and unique across the schedule. A queued
/// id may reappear in the schedule, since the queues are free to reuse ids
/// once their tasks have been merged.
pub fn validate_state(state: &PlannerState) -> PersistenceResult<()> {
    let mut queued = HashSet::new();
    for task in &state.uni_queue {
        validate_university_task(task)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        check_unique(&mut queued, &task.id, "queues")?;
    }
    for task in &state.dev_queue {
        validate_dev_task(task).map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        check_unique(&mut queued, &task.id, "queues")?;
    }

    let mut scheduled = HashSet::new();
    for day in &state.schedule {
        for task in &day.tasks {
            validate_task(task).map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
            check_unique(&mut scheduled, task.id(), "schedule")?;
        }
        let expected: u32 = day.tasks.iter().map(|task| task.energy_cost()).sum();
        if expected != day.energy_points {
            return Err(PersistenceError::InvalidData(format!(
                "{} records {} energy points but its tasks cost {}",
                day.id, day.energy_points, expected
            )));
        }
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonFileStateStore, load_state_from_json, save_schedule_to_csv, save_state_to_json};
