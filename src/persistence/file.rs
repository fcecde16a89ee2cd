use super::{PersistenceError, PersistenceResult, StateStore, validate_state};
use crate::queue::PlannerState;
use crate::schedule::ScheduleDay;
use crate::task::{EnergyCost, Task};
use serde::Serialize;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the planner snapshot as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStateStore {
    fn read_blob(&self) -> PersistenceResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_blob(&self, blob: &str) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Staged write, then rename over the target.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, blob)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn remove_blob(&self) -> PersistenceResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Writes a validated snapshot for explicit export.
pub fn save_state_to_json<P: AsRef<Path>>(state: &PlannerState, path: P) -> PersistenceResult<()> {
    validate_state(state)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, state)?;
    Ok(())
}

/// Reads a snapshot for explicit import. Unlike [`StateStore::load`], problems
/// are reported instead of replaced with defaults.
pub fn load_state_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<PlannerState> {
    let file = File::open(path)?;
    let state: PlannerState = serde_json::from_reader(file)?;
    validate_state(&state)?;
    Ok(state)
}

#[derive(Debug, Serialize)]
struct ScheduleCsvRecord {
    day_id: String,
    date: String,
    day: String,
    stream: String,
    task_id: String,
    title: String,
    detail: String,
    energy_cost: u32,
    day_energy: u32,
}

impl ScheduleCsvRecord {
    fn new(day: &ScheduleDay, task: &Task) -> Self {
        let detail = match task {
            Task::University(task) => format!("{}h", task.duration),
            Task::Dev(task) => task.tech_stack.join(";"),
        };
        Self {
            day_id: day.id.clone(),
            date: day.date.format("%Y-%m-%d").to_string(),
            day: day.day.clone(),
            stream: task.stream().to_string(),
            task_id: task.id().to_string(),
            title: task.title(),
            detail,
            energy_cost: task.energy_cost(),
            day_energy: day.energy_points,
        }
    }
}

/// Exports one row per scheduled task, in schedule order.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &[ScheduleDay],
    path: P,
) -> PersistenceResult<()> {
    if schedule.iter().any(|day| day.tasks.is_empty()) {
        return Err(PersistenceError::InvalidData(
            "schedule contains a day without tasks".into(),
        ));
    }
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for day in schedule {
        for task in &day.tasks {
            writer.serialize(ScheduleCsvRecord::new(day, task))?;
        }
    }
    writer.flush()?;
    Ok(())
}
