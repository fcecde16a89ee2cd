use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::calendar::{date_for_offset, day_id, weekday_name};
use crate::task::{DevTask, EnergyCost, Stream, Task, UniversityTask};

/// Energy points a day may hold when it carries more than one task.
pub const MAX_ENERGY_PER_DAY: u32 = 10;

/// Day offsets examined before generation stops with a partial schedule.
pub const MAX_SCHEDULE_DAYS: u32 = 30;

/// A calendar day and the tasks assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub id: String,
    pub date: NaiveDate,
    /// Weekday name, e.g. `"Tuesday"`.
    pub day: String,
    pub is_today: bool,
    pub tasks: Vec<Task>,
    pub energy_points: u32,
}

impl ScheduleDay {
    fn open(reference: NaiveDate, offset: u32) -> Self {
        let date = date_for_offset(reference, offset);
        Self {
            id: day_id(offset),
            date,
            day: weekday_name(date).to_string(),
            is_today: date == reference,
            tasks: Vec::new(),
            energy_points: 0,
        }
    }

    fn assign(&mut self, task: Task) {
        self.energy_points = self.energy_points.saturating_add(task.energy_cost());
        self.tasks.push(task);
    }

    pub fn count_for(&self, stream: Stream) -> usize {
        self.tasks.iter().filter(|t| t.stream() == stream).count()
    }
}

/// What to do with a task whose own cost is above the daily capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizedPolicy {
    /// Give the task a day of its own.
    #[default]
    PlaceAlone,
    /// Leave it out of the schedule and report it.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub max_energy_per_day: u32,
    pub max_days: u32,
    #[serde(default)]
    pub oversized: OversizedPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_energy_per_day: MAX_ENERGY_PER_DAY,
            max_days: MAX_SCHEDULE_DAYS,
            oversized: OversizedPolicy::PlaceAlone,
        }
    }
}

/// Full result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleOutcome {
    pub days: Vec<ScheduleDay>,
    /// Tasks not reached before the day guard tripped, in queue order.
    pub remaining_uni: Vec<UniversityTask>,
    pub remaining_dev: Vec<DevTask>,
    /// Oversized tasks dropped under [`OversizedPolicy::Reject`].
    pub unschedulable: Vec<Task>,
    pub truncated: bool,
}

impl ScheduleOutcome {
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.unschedulable.is_empty()
    }
}

#[derive(Debug, Default)]
struct Pending {
    uni: VecDeque<UniversityTask>,
    dev: VecDeque<DevTask>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.uni.is_empty() && self.dev.is_empty()
    }
}

/// Moves the head of `queue` onto `day` if it fits the remaining capacity.
fn try_place<T>(queue: &mut VecDeque<T>, day: &mut ScheduleDay, capacity: u32) -> bool
where
    T: EnergyCost + Into<Task>,
{
    let fits = queue
        .front()
        .is_some_and(|head| day.energy_points.saturating_add(head.energy_cost()) <= capacity);
    if !fits {
        return false;
    }
    match queue.pop_front() {
        Some(task) => {
            day.assign(task.into());
            true
        }
        None => false,
    }
}

fn pop_oversized<T>(queue: &mut VecDeque<T>, capacity: u32) -> Option<Task>
where
    T: EnergyCost + Into<Task>,
{
    if queue.front()?.energy_cost() > capacity {
        queue.pop_front().map(Into::into)
    } else {
        None
    }
}

/// Greedy "zipper" scheduler merging the university and dev queues into days.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Builds the schedule starting the day after `reference`.
    ///
    /// Neither input is modified. Days are emitted in date order and only
    /// when they received at least one task.
    pub fn plan(
        &self,
        uni_queue: &[UniversityTask],
        dev_queue: &[DevTask],
        reference: NaiveDate,
    ) -> ScheduleOutcome {
        let mut pending = Pending {
            uni: uni_queue.iter().cloned().collect(),
            dev: dev_queue.iter().cloned().collect(),
        };
        let mut outcome = ScheduleOutcome::default();
        let mut offset = 1;

        while !pending.is_empty() {
            if offset > self.config.max_days {
                warn!(
                    max_days = self.config.max_days,
                    remaining_uni = pending.uni.len(),
                    remaining_dev = pending.dev.len(),
                    "schedule generation exceeded the day limit; returning partial schedule"
                );
                outcome.truncated = true;
                break;
            }

            let (rest, day, rejected) = self.schedule_day(pending, reference, offset);
            pending = rest;
            outcome.unschedulable.extend(rejected);

            if !day.tasks.is_empty() {
                debug!(
                    day = %day.id,
                    date = %day.date,
                    tasks = day.tasks.len(),
                    energy = day.energy_points,
                    "scheduled day"
                );
                outcome.days.push(day);
            }
            offset += 1;
        }

        outcome.remaining_uni = pending.uni.into_iter().collect();
        outcome.remaining_dev = pending.dev.into_iter().collect();
        outcome
    }

    fn schedule_day(
        &self,
        mut pending: Pending,
        reference: NaiveDate,
        offset: u32,
    ) -> (Pending, ScheduleDay, Vec<Task>) {
        let capacity = self.config.max_energy_per_day;
        let mut day = ScheduleDay::open(reference, offset);
        let mut rejected = Vec::new();

        match self.config.oversized {
            OversizedPolicy::PlaceAlone => {
                let oversized = pop_oversized(&mut pending.uni, capacity)
                    .or_else(|| pop_oversized(&mut pending.dev, capacity));
                if let Some(task) = oversized {
                    warn!(
                        task = task.id(),
                        cost = task.energy_cost(),
                        capacity,
                        "task exceeds daily capacity; placing it alone"
                    );
                    day.assign(task);
                    return (pending, day, rejected);
                }
            }
            OversizedPolicy::Reject => {
                while let Some(task) = pop_oversized(&mut pending.uni, capacity)
                    .or_else(|| pop_oversized(&mut pending.dev, capacity))
                {
                    warn!(
                        task = task.id(),
                        cost = task.energy_cost(),
                        capacity,
                        "task exceeds daily capacity; leaving it unscheduled"
                    );
                    rejected.push(task);
                }
            }
        }

        // Blend: one task from each stream before either can dominate.
        try_place(&mut pending.uni, &mut day, capacity);
        try_place(&mut pending.dev, &mut day, capacity);

        // Fill: alternate streams until a whole round places nothing.
        loop {
            let placed_uni = try_place(&mut pending.uni, &mut day, capacity);
            let placed_dev = try_place(&mut pending.dev, &mut day, capacity);
            if !placed_uni && !placed_dev {
                break;
            }
        }

        (pending, day, rejected)
    }
}

/// Schedules both queues with the default capacity and day limit.
pub fn generate_schedule(
    uni_queue: &[UniversityTask],
    dev_queue: &[DevTask],
    reference: NaiveDate,
) -> Vec<ScheduleDay> {
    Scheduler::default().plan(uni_queue, dev_queue, reference).days
}

/// Totals over a generated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub days: usize,
    pub tasks: usize,
    pub energy_points: u32,
    pub university_tasks: usize,
    pub dev_tasks: usize,
}

impl ScheduleSummary {
    pub fn from_days(days: &[ScheduleDay]) -> Self {
        days.iter().fold(Self::default(), |mut acc, day| {
            acc.days += 1;
            acc.tasks += day.tasks.len();
            acc.energy_points = acc.energy_points.saturating_add(day.energy_points);
            acc.university_tasks += day.count_for(Stream::University);
            acc.dev_tasks += day.count_for(Stream::Dev);
            acc
        })
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "days={}, tasks={} (university={}, dev={}), energy={}",
            self.days, self.tasks, self.university_tasks, self.dev_tasks, self.energy_points
        )
    }
}
