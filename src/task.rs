use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::id::generate_id;

/// Energy weight applied to each hour of a university task.
pub const UNI_WEIGHT_MULTIPLIER: u32 = 2;

pub const MIN_DURATION_HOURS: u32 = 1;
pub const MAX_DURATION_HOURS: u32 = 4;
pub const MIN_COMPLEXITY: u32 = 1;
pub const MAX_COMPLEXITY: u32 = 9;

/// Tags offered when creating a dev task.
pub const TECH_STACK_OPTIONS: [&str; 12] = [
    "React",
    "Next.js",
    "TypeScript",
    "Node.js",
    "Python",
    "Go",
    "Rust",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "Docker",
    "AWS",
];

/// Workload weight of a task, consumed against the daily capacity.
pub trait EnergyCost {
    fn energy_cost(&self) -> u32;
}

/// One of the two independent task queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    University,
    Dev,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::University => "university",
            Stream::Dev => "dev",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stream {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "university" | "uni" => Ok(Stream::University),
            "dev" => Ok(Stream::Dev),
            other => Err(format!("unknown stream '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityTask {
    pub id: String,
    pub subject: String,
    pub topic: String,
    /// Study time in whole hours.
    pub duration: u32,
}

impl UniversityTask {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, duration: u32) -> Self {
        Self::with_id(generate_id(), subject, topic, duration)
    }

    pub fn with_id(
        id: impl Into<String>,
        subject: impl Into<String>,
        topic: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            topic: topic.into(),
            duration,
        }
    }
}

impl EnergyCost for UniversityTask {
    fn energy_cost(&self) -> u32 {
        self.duration.saturating_mul(UNI_WEIGHT_MULTIPLIER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevTask {
    pub id: String,
    pub project: String,
    pub tech_stack: Vec<String>,
    pub complexity: u32,
}

impl DevTask {
    pub fn new(project: impl Into<String>, tech_stack: Vec<String>, complexity: u32) -> Self {
        Self::with_id(generate_id(), project, tech_stack, complexity)
    }

    pub fn with_id(
        id: impl Into<String>,
        project: impl Into<String>,
        tech_stack: Vec<String>,
        complexity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            project: project.into(),
            tech_stack,
            complexity,
        }
    }
}

impl EnergyCost for DevTask {
    // Complexity maps one-to-one onto energy points.
    fn energy_cost(&self) -> u32 {
        self.complexity
    }
}

/// A task from either stream, tagged with `"type"` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task {
    University(UniversityTask),
    Dev(DevTask),
}

impl Task {
    pub fn id(&self) -> &str {
        match self {
            Task::University(task) => &task.id,
            Task::Dev(task) => &task.id,
        }
    }

    pub fn stream(&self) -> Stream {
        match self {
            Task::University(_) => Stream::University,
            Task::Dev(_) => Stream::Dev,
        }
    }

    /// Short human label: `subject: topic` or the project name.
    pub fn title(&self) -> String {
        match self {
            Task::University(task) => format!("{}: {}", task.subject, task.topic),
            Task::Dev(task) => task.project.clone(),
        }
    }
}

impl EnergyCost for Task {
    fn energy_cost(&self) -> u32 {
        match self {
            Task::University(task) => task.energy_cost(),
            Task::Dev(task) => task.energy_cost(),
        }
    }
}

impl From<UniversityTask> for Task {
    fn from(task: UniversityTask) -> Self {
        Task::University(task)
    }
}

impl From<DevTask> for Task {
    fn from(task: DevTask) -> Self {
        Task::Dev(task)
    }
}

/// Parses a comma separated tag list, dropping empty entries.
pub fn parse_tech_stack(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn university_cost_doubles_duration() {
        let task = UniversityTask::with_id("u1", "Math", "Limits", 3);
        assert_eq!(task.energy_cost(), 6);
        assert_eq!(Task::from(task).energy_cost(), 6);
    }

    #[test]
    fn dev_cost_is_complexity() {
        let task = DevTask::with_id("d1", "api", vec!["Rust".into()], 7);
        assert_eq!(task.energy_cost(), 7);
    }

    #[test]
    fn task_serializes_with_type_tag() {
        let task = Task::from(DevTask::with_id("d1", "api", vec!["Go".into()], 2));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "dev");
        assert_eq!(json["techStack"][0], "Go");

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn new_tasks_get_distinct_ids() {
        let a = UniversityTask::new("Math", "Sets", 1);
        let b = UniversityTask::new("Math", "Sets", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn stream_parses_aliases() {
        assert_eq!("uni".parse::<Stream>().unwrap(), Stream::University);
        assert_eq!(" Dev ".parse::<Stream>().unwrap(), Stream::Dev);
        assert!("ops".parse::<Stream>().is_err());
    }

    #[test]
    fn tech_stack_parsing_skips_blanks() {
        assert_eq!(parse_tech_stack("Rust, ,Go,"), vec!["Rust", "Go"]);
    }
}
