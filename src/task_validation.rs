use crate::task::{
    DevTask, MAX_COMPLEXITY, MAX_DURATION_HOURS, MIN_COMPLEXITY, MIN_DURATION_HOURS, Task,
    UniversityTask,
};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("task {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
    #[error("task {id} has duration {value}h (must be between 1 and 4)")]
    DurationOutOfRange { id: String, value: u32 },
    #[error("task {id} has complexity {value} (must be between 1 and 9)")]
    ComplexityOutOfRange { id: String, value: u32 },
    #[error("task {id} has no tech stack selected")]
    EmptyTechStack { id: String },
    #[error("task {id} lists tech stack tag '{tag}' more than once")]
    DuplicateTag { id: String, tag: String },
    #[error("task has an empty id")]
    MissingId,
}

fn require_text(id: &str, field: &'static str, value: &str) -> Result<(), TaskValidationError> {
    if value.trim().is_empty() {
        return Err(TaskValidationError::EmptyField {
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

pub fn validate_university_task(task: &UniversityTask) -> Result<(), TaskValidationError> {
    if task.id.trim().is_empty() {
        return Err(TaskValidationError::MissingId);
    }
    require_text(&task.id, "subject", &task.subject)?;
    require_text(&task.id, "topic", &task.topic)?;

    if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&task.duration) {
        return Err(TaskValidationError::DurationOutOfRange {
            id: task.id.clone(),
            value: task.duration,
        });
    }
    Ok(())
}

pub fn validate_dev_task(task: &DevTask) -> Result<(), TaskValidationError> {
    if task.id.trim().is_empty() {
        return Err(TaskValidationError::MissingId);
    }
    require_text(&task.id, "project", &task.project)?;

    if !(MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&task.complexity) {
        return Err(TaskValidationError::ComplexityOutOfRange {
            id: task.id.clone(),
            value: task.complexity,
        });
    }

    if task.tech_stack.is_empty() {
        return Err(TaskValidationError::EmptyTechStack {
            id: task.id.clone(),
        });
    }
    let mut seen = HashSet::with_capacity(task.tech_stack.len());
    for tag in &task.tech_stack {
        require_text(&task.id, "tech stack tag", tag)?;
        if !seen.insert(tag.trim().to_ascii_lowercase()) {
            return Err(TaskValidationError::DuplicateTag {
                id: task.id.clone(),
                tag: tag.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    match task {
        Task::University(task) => validate_university_task(task),
        Task::Dev(task) => validate_dev_task(task),
    }
}
