use chrono::NaiveDate;
use dual_stream_planner::{
    DevTask, EnergyCost, OversizedPolicy, ScheduleDay, ScheduleSummary, Scheduler,
    SchedulerConfig, Stream, UniversityTask, generate_schedule,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn uni(id: &str, duration: u32) -> UniversityTask {
    UniversityTask::with_id(id, "Calculus", "Integrals", duration)
}

fn dev(id: &str, complexity: u32) -> DevTask {
    DevTask::with_id(id, "planner", vec!["Rust".into()], complexity)
}

fn ids(day: &ScheduleDay) -> Vec<&str> {
    day.tasks.iter().map(|t| t.id()).collect()
}

#[test]
fn single_university_task_fills_one_day() {
    let days = generate_schedule(&[uni("u1", 2)], &[], d(2025, 1, 6));

    assert_eq!(days.len(), 1);
    let day = &days[0];
    assert_eq!(day.id, "day-1");
    assert_eq!(day.date, d(2025, 1, 7));
    assert_eq!(day.day, "Tuesday");
    assert!(!day.is_today);
    assert_eq!(ids(day), vec!["u1"]);
    assert_eq!(day.energy_points, 4);
}

#[test]
fn dev_task_that_does_not_fit_moves_to_next_day() {
    let days = generate_schedule(&[uni("u1", 4)], &[dev("d1", 9)], d(2025, 1, 6));

    assert_eq!(days.len(), 2);
    assert_eq!(ids(&days[0]), vec!["u1"]);
    assert_eq!(days[0].energy_points, 8);
    assert_eq!(ids(&days[1]), vec!["d1"]);
    assert_eq!(days[1].energy_points, 9);
    assert_eq!(days[1].date, d(2025, 1, 8));
    assert_eq!(days[1].id, "day-2");
}

#[test]
fn empty_queues_produce_no_days() {
    assert!(generate_schedule(&[], &[], d(2025, 1, 6)).is_empty());
}

#[test]
fn ten_short_university_tasks_split_into_two_full_days() {
    let queue: Vec<_> = (0..10).map(|i| uni(&format!("u{i}"), 1)).collect();
    let days = generate_schedule(&queue, &[], d(2025, 1, 6));

    assert_eq!(days.len(), 2);
    for day in &days {
        assert_eq!(day.tasks.len(), 5);
        assert_eq!(day.energy_points, 10);
    }
    assert_eq!(ids(&days[0]), vec!["u0", "u1", "u2", "u3", "u4"]);
    assert_eq!(ids(&days[1]), vec!["u5", "u6", "u7", "u8", "u9"]);
}

#[test]
fn blend_then_fill_alternates_between_streams() {
    let unis = [uni("u1", 1), uni("u2", 1), uni("u3", 1)];
    let devs = [dev("d1", 3), dev("d2", 3)];
    let days = generate_schedule(&unis, &devs, d(2025, 1, 6));

    assert_eq!(days.len(), 2);
    assert_eq!(ids(&days[0]), vec!["u1", "d1", "u2", "d2"]);
    assert_eq!(days[0].energy_points, 10);
    assert_eq!(ids(&days[1]), vec!["u3"]);
    assert_eq!(days[1].energy_points, 2);
}

#[test]
fn fill_keeps_trying_dev_when_university_head_is_blocked() {
    let unis = [uni("u1", 4), uni("u2", 4)];
    let devs = [dev("d1", 2), dev("d2", 1), dev("d3", 5)];
    let days = generate_schedule(&unis, &devs, d(2025, 1, 6));

    assert_eq!(days.len(), 3);
    assert_eq!(ids(&days[0]), vec!["u1", "d1"]);
    assert_eq!(days[0].energy_points, 10);
    assert_eq!(ids(&days[1]), vec!["u2", "d2"]);
    assert_eq!(days[1].energy_points, 9);
    assert_eq!(ids(&days[2]), vec!["d3"]);
    assert_eq!(days[2].energy_points, 5);
}

#[test]
fn queue_order_is_never_skipped() {
    // d2 would fit on day one but d1 is ahead of it.
    let days = generate_schedule(&[uni("u1", 1)], &[dev("d1", 9), dev("d2", 1)], d(2025, 1, 6));

    assert_eq!(days.len(), 2);
    assert_eq!(ids(&days[0]), vec!["u1"]);
    assert_eq!(ids(&days[1]), vec!["d1", "d2"]);
    assert_eq!(days[1].energy_points, 10);
}

#[test]
fn dates_roll_over_year_end() {
    let queue: Vec<_> = (0..3).map(|i| uni(&format!("u{i}"), 4)).collect();
    let days = generate_schedule(&queue, &[], d(2025, 12, 30));

    let dates: Vec<_> = days.iter().map(|day| day.date).collect();
    assert_eq!(dates, vec![d(2025, 12, 31), d(2026, 1, 1), d(2026, 1, 2)]);
    assert_eq!(days[1].day, "Thursday");
}

#[test]
fn inputs_are_untouched_and_rerun_is_identical() {
    let unis = vec![uni("u1", 3), uni("u2", 2), uni("u3", 4)];
    let devs = vec![dev("d1", 6), dev("d2", 2)];
    let unis_before = unis.clone();
    let devs_before = devs.clone();

    let first = generate_schedule(&unis, &devs, d(2025, 3, 1));
    let second = generate_schedule(&unis, &devs, d(2025, 3, 1));

    assert_eq!(first, second);
    assert_eq!(unis, unis_before);
    assert_eq!(devs, devs_before);
}

#[test]
fn oversized_task_is_placed_alone_by_default() {
    let outcome = Scheduler::default().plan(
        &[uni("big", 6), uni("u2", 1)],
        &[dev("d1", 3)],
        d(2025, 1, 6),
    );

    assert!(outcome.is_complete());
    assert_eq!(outcome.days.len(), 2);
    assert_eq!(ids(&outcome.days[0]), vec!["big"]);
    assert_eq!(outcome.days[0].energy_points, 12);
    assert_eq!(ids(&outcome.days[1]), vec!["u2", "d1"]);
    assert_eq!(outcome.days[1].energy_points, 5);
}

#[test]
fn oversized_dev_task_gets_its_own_day() {
    let outcome = Scheduler::default().plan(&[uni("u1", 1)], &[dev("huge", 14)], d(2025, 1, 6));

    // The oversized dev head takes day one even though u1 would fit.
    assert_eq!(outcome.days.len(), 2);
    assert_eq!(ids(&outcome.days[0]), vec!["huge"]);
    assert_eq!(outcome.days[0].date, d(2025, 1, 7));
    assert_eq!(ids(&outcome.days[1]), vec!["u1"]);
    assert_eq!(outcome.days[1].date, d(2025, 1, 8));
}

#[test]
fn reject_policy_reports_oversized_tasks() {
    let config = SchedulerConfig {
        oversized: OversizedPolicy::Reject,
        ..SchedulerConfig::default()
    };
    let outcome = Scheduler::new(config).plan(
        &[uni("big", 6), uni("u2", 1)],
        &[dev("huge", 11)],
        d(2025, 1, 6),
    );

    assert!(!outcome.is_complete());
    assert!(!outcome.truncated);
    let rejected: Vec<_> = outcome.unschedulable.iter().map(|t| t.id()).collect();
    assert_eq!(rejected, vec!["big", "huge"]);
    assert_eq!(outcome.days.len(), 1);
    assert_eq!(outcome.days[0].id, "day-1");
    assert_eq!(ids(&outcome.days[0]), vec!["u2"]);
}

#[test]
fn day_limit_returns_partial_schedule_with_leftovers() {
    let config = SchedulerConfig {
        max_days: 3,
        ..SchedulerConfig::default()
    };
    let queue: Vec<_> = (0..10).map(|i| uni(&format!("u{i}"), 4)).collect();
    let outcome = Scheduler::new(config).plan(&queue, &[], d(2025, 1, 6));

    assert!(outcome.truncated);
    assert_eq!(outcome.days.len(), 3);
    let leftover: Vec<_> = outcome.remaining_uni.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(leftover, vec!["u3", "u4", "u5", "u6", "u7", "u8", "u9"]);
    assert!(outcome.remaining_dev.is_empty());
}

#[test]
fn default_day_limit_is_thirty() {
    let queue: Vec<_> = (0..40).map(|i| uni(&format!("u{i}"), 4)).collect();
    let outcome = Scheduler::default().plan(&queue, &[], d(2025, 1, 6));

    assert!(outcome.truncated);
    assert_eq!(outcome.days.len(), 30);
    assert_eq!(outcome.days.last().unwrap().date, d(2025, 2, 5));
    assert_eq!(outcome.remaining_uni.len(), 10);
}

#[test]
fn custom_capacity_is_respected() {
    let config = SchedulerConfig {
        max_energy_per_day: 4,
        ..SchedulerConfig::default()
    };
    let queue: Vec<_> = (0..3).map(|i| uni(&format!("u{i}"), 1)).collect();
    let outcome = Scheduler::new(config).plan(&queue, &[], d(2025, 1, 6));

    let sizes: Vec<_> = outcome.days.iter().map(|day| day.tasks.len()).collect();
    assert_eq!(sizes, vec![2, 1]);
}

#[test]
fn energy_points_match_task_costs() {
    let unis = [uni("u1", 2), uni("u2", 3), uni("u3", 1)];
    let devs = [dev("d1", 4), dev("d2", 7), dev("d3", 1)];
    let days = generate_schedule(&unis, &devs, d(2025, 6, 1));

    for day in &days {
        let sum: u32 = day.tasks.iter().map(|t| t.energy_cost()).sum();
        assert_eq!(day.energy_points, sum, "{}", day.id);
        assert!(day.energy_points <= 10);
    }
}

#[test]
fn summary_counts_streams() {
    let days = generate_schedule(
        &[uni("u1", 1), uni("u2", 2)],
        &[dev("d1", 3)],
        d(2025, 1, 6),
    );
    let summary = ScheduleSummary::from_days(&days);

    assert_eq!(summary.days, 1);
    assert_eq!(summary.tasks, 3);
    assert_eq!(summary.university_tasks, 2);
    assert_eq!(summary.dev_tasks, 1);
    assert_eq!(summary.energy_points, 9);
    assert_eq!(days[0].count_for(Stream::Dev), 1);
    assert_eq!(
        summary.to_cli_summary(),
        "days=1, tasks=3 (university=2, dev=1), energy=9"
    );
}

#[test]
fn schedule_day_serializes_with_camel_case_fields() {
    let days = generate_schedule(&[uni("u1", 2)], &[], d(2025, 1, 6));
    let json = serde_json::to_value(&days[0]).unwrap();

    assert_eq!(json["energyPoints"], 4);
    assert_eq!(json["isToday"], false);
    assert_eq!(json["date"], "2025-01-07");
    assert_eq!(json["tasks"][0]["type"], "university");
}
