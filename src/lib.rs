pub mod calendar;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod id;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;
pub mod persistence;
pub mod queue;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use config::ServiceConfig;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStateStore;
pub use persistence::{
    JsonFileStateStore, MemoryStateStore, PersistenceError, STORAGE_KEY, StatePatch, StateStore,
    load_state_from_json, save_schedule_to_csv, save_state_to_json, validate_state,
};
pub use queue::{
    DualStreamPlanner, MergeReport, PersistOnChange, PlannerError, PlannerState, QueueStats,
    StateObserver,
};
pub use schedule::{
    MAX_ENERGY_PER_DAY, MAX_SCHEDULE_DAYS, OversizedPolicy, ScheduleDay, ScheduleOutcome,
    ScheduleSummary, Scheduler, SchedulerConfig, generate_schedule,
};
pub use task::{
    DevTask, EnergyCost, Stream, TECH_STACK_OPTIONS, Task, UNI_WEIGHT_MULTIPLIER, UniversityTask,
};
pub use task_validation::TaskValidationError;
