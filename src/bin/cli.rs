use chrono::{Local, NaiveDate};
use dual_stream_planner::{
    DevTask, DualStreamPlanner, EnergyCost, JsonFileStateStore, PersistOnChange,
    ScheduleSummary, ServiceConfig, TECH_STACK_OPTIONS, UniversityTask, load_state_from_json,
    logging, save_schedule_to_csv, save_state_to_json, task::parse_tech_stack,
};
use std::io::{self, Write};

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_queues(planner: &DualStreamPlanner) -> String {
    let mut rows = Vec::new();
    for task in planner.uni_queue() {
        rows.push(vec![
            "university".to_string(),
            task.id.clone(),
            format!("{}: {}", task.subject, task.topic),
            format!("{}h", task.duration),
            task.energy_cost().to_string(),
        ]);
    }
    for task in planner.dev_queue() {
        rows.push(vec![
            "dev".to_string(),
            task.id.clone(),
            task.project.clone(),
            task.tech_stack.join(","),
            task.energy_cost().to_string(),
        ]);
    }
    render_text_table(&["stream", "id", "title", "detail", "energy"], &rows)
}

fn render_schedule(planner: &DualStreamPlanner) -> String {
    let mut rows = Vec::new();
    for day in planner.schedule() {
        for (idx, task) in day.tasks.iter().enumerate() {
            let (date, weekday, total) = if idx == 0 {
                (
                    day.date.to_string(),
                    day.day.clone(),
                    day.energy_points.to_string(),
                )
            } else {
                (String::new(), String::new(), String::new())
            };
            rows.push(vec![
                date,
                weekday,
                task.stream().to_string(),
                task.title(),
                task.energy_cost().to_string(),
                total,
            ]);
        }
    }
    render_text_table(
        &["date", "day", "stream", "task", "energy", "day total"],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  queues                             Show queued tasks\n  stats                              Show queue counts\n  tags                               List suggested tech stack tags\n  uni <hours> <subject> <topic...>   Queue a university task (1-4 hours)\n  dev <complexity> <project> <csv>   Queue a dev task (complexity 1-9, stack like Rust,Go)\n  remove <id>                        Remove a queued task\n  merge [YYYY-MM-DD]                 Build the schedule from the day after the date (default today)\n  schedule                           Show the generated schedule\n  export <csv_path>                  Write the schedule as CSV\n  save <json_path>                   Export planner state as JSON\n  load <json_path>                   Import planner state from JSON\n  reset                              Clear queues, schedule and saved state\n  quit|exit                          Exit"
    );
}

fn print_stats(planner: &DualStreamPlanner) {
    let stats = planner.stats();
    println!("Queued university : {}", stats.queued_uni);
    println!("Queued dev        : {}", stats.queued_dev);
    println!("Total queued      : {}", stats.total_tasks);
    println!(
        "Schedule          : {}",
        ScheduleSummary::from_days(planner.schedule()).to_cli_summary()
    );
}

fn main() {
    logging::init();
    let config = ServiceConfig::from_env();
    let store = JsonFileStateStore::new(&config.state_path);
    let mut planner = DualStreamPlanner::restore(&store).with_scheduler_config(config.scheduler);
    planner.observe(PersistOnChange::new(store));

    println!("Dual-Stream Planner (CLI) - type 'help' for commands\n");
    println!("{}", render_queues(&planner));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "queues" => println!("{}", render_queues(&planner)),
            "stats" => print_stats(&planner),
            "tags" => println!("{}", TECH_STACK_OPTIONS.join(", ")),
            "uni" => {
                let hours_s = parts.next();
                let subject = parts.next();
                let topic: Vec<&str> = parts.collect();
                match (hours_s, subject, topic.is_empty()) {
                    (Some(hours_s), Some(subject), false) => {
                        let hours: u32 = match hours_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid hours");
                                continue;
                            }
                        };
                        let task = UniversityTask::new(subject, topic.join(" "), hours);
                        match planner.add_university_task(task) {
                            Ok(id) => println!("Queued university task {id}."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: uni <hours> <subject> <topic...>"),
                }
            }
            "dev" => {
                let complexity_s = parts.next();
                let project = parts.next();
                let stack = parts.next();
                match (complexity_s, project, stack) {
                    (Some(complexity_s), Some(project), Some(stack)) => {
                        let complexity: u32 = match complexity_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid complexity");
                                continue;
                            }
                        };
                        let task = DevTask::new(project, parse_tech_stack(stack), complexity);
                        match planner.add_dev_task(task) {
                            Ok(id) => println!("Queued dev task {id}."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: dev <complexity> <project> <stack_csv>"),
                }
            }
            "remove" => match parts.next() {
                Some(id) => match planner.remove_task_any(id) {
                    Some(stream) => println!("Removed {stream} task {id}."),
                    None => println!("Task {id} not found."),
                },
                None => println!("Usage: remove <id>"),
            },
            "merge" => {
                let reference = match parts.next() {
                    Some(date_s) => match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                        Ok(d) => d,
                        Err(_) => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                let report = planner.merge(reference);
                println!("Merged ({})", report.summary.to_cli_summary());
                if report.truncated {
                    println!(
                        "Day limit reached; {} task(s) stay queued.",
                        report.carried_over
                    );
                }
                for task in &report.unschedulable {
                    println!("Unschedulable: {} ({})", task.title(), task.id());
                }
                println!("{}", render_schedule(&planner));
            }
            "schedule" => println!("{}", render_schedule(&planner)),
            "export" => match parts.next() {
                Some(path) => match save_schedule_to_csv(planner.schedule(), path) {
                    Ok(_) => println!("Schedule exported to {}.", path),
                    Err(e) => println!("Error exporting schedule: {}", e),
                },
                None => println!("Usage: export <csv_path>"),
            },
            "save" => match parts.next() {
                Some(path) => match save_state_to_json(planner.state(), path) {
                    Ok(_) => println!("State saved to {}.", path),
                    Err(e) => println!("Error saving state: {}", e),
                },
                None => println!("Usage: save <json_path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_state_from_json(path) {
                    Ok(state) => {
                        planner.replace_state(state);
                        println!("State loaded from {}.", path);
                        println!("{}", render_queues(&planner));
                    }
                    Err(e) => println!("Error loading state: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "reset" => {
                planner.reset_all();
                println!("Planner reset.");
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
