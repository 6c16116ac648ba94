use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use finals_schedule::config::SchedulerConfig;
use finals_schedule::enrollment::{available_courses, group_by_major, load_enrollment_csv};
use finals_schedule::persistence::{
    ScheduleSnapshot, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};
use finals_schedule::pipeline::{generate_from_frame, review_summary};
use finals_schedule::render::render_schedule;
use finals_schedule::{CourseCode, CourseSelection, ScheduleError, ScheduleResult};
use polars::prelude::DataFrame;
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  config <file.toml>                 Load scheduler settings\n  load <file.csv>                    Load an enrollment export (SID, CourseSection, Time Slot)\n  courses                            List courses by major ([x] = gives a final)\n  include <code>[, <code>...]        Mark courses as giving a final\n  exclude <code>[, <code>...]        Unmark courses\n  include-all                        Mark every listed course\n  include-major <major>              Mark every course of one major\n  set <key> <value>                  max-tests | max-days | periods | compact | max-rows | start-date\n  review                             Show the settings used for generation\n  generate                           Build the exam schedule\n  export <file.xlsx>                 Write the schedule spreadsheet\n  save <json|csv> <file>             Store the schedule\n  open <json|csv> <file>             Reload a stored schedule\n  quit|exit                          Exit"
    );
}

fn parse_codes(rest: &str) -> Vec<CourseCode> {
    rest.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(CourseCode::from_section)
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => Some(true),
        "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Default)]
struct Session {
    config: SchedulerConfig,
    source: Option<PathBuf>,
    enrollment: Option<DataFrame>,
    selection: CourseSelection,
    current: Option<ScheduleSnapshot>,
}

impl Session {
    fn enrollment(&self) -> ScheduleResult<&DataFrame> {
        self.enrollment.as_ref().ok_or_else(|| {
            ScheduleError::InvalidInputFormat("no enrollment file loaded; use 'load <file.csv>'".into())
        })
    }

    fn current(&self) -> ScheduleResult<&ScheduleSnapshot> {
        self.current.as_ref().ok_or_else(|| {
            ScheduleError::Render("no schedule yet; use 'generate' or 'open'".into())
        })
    }

    fn load(&mut self, path: &str) -> ScheduleResult<()> {
        let df = load_enrollment_csv(path)?;
        let courses = available_courses(&df, &self.config.exclusions()?)?;
        println!("Loaded {} rows, {} courses.", df.height(), courses.len());
        self.selection = CourseSelection::new(courses);
        self.enrollment = Some(df);
        self.source = Some(PathBuf::from(path));
        self.current = None;
        Ok(())
    }

    fn list_courses(&self) {
        let courses: Vec<CourseCode> = self.selection.iter().map(|(c, _)| c.clone()).collect();
        for (major, codes) in group_by_major(&courses) {
            let entries: Vec<String> = codes
                .iter()
                .map(|code| {
                    let mark = if self.selection.is_included(code) { "x" } else { " " };
                    format!("[{mark}] {code}")
                })
                .collect();
            println!("{major}: {}", entries.join("  "));
        }
        println!(
            "{} of {} courses give a final.",
            self.selection.included_count(),
            self.selection.len()
        );
    }

    fn mark(&mut self, rest: &str, include: bool) {
        let codes = parse_codes(rest);
        if codes.is_empty() {
            println!("Usage: {} <code>[, <code>...]", if include { "include" } else { "exclude" });
            return;
        }
        for code in codes {
            if !self.selection.contains(&code) {
                println!("Unknown course '{code}'.");
                continue;
            }
            self.selection.set(code, include);
        }
        println!("{} courses give a final.", self.selection.included_count());
    }

    fn set(&mut self, key: &str, value: &str) -> ScheduleResult<()> {
        let mut config = self.config.clone();
        let invalid = || ScheduleError::InvalidConfig(format!("invalid value '{value}' for {key}"));
        match key {
            "max-tests" => config.max_tests_per_day = value.parse().map_err(|_| invalid())?,
            "max-days" => config.max_final_days = value.parse().map_err(|_| invalid())?,
            "periods" => config.periods_per_day = Some(value.parse().map_err(|_| invalid())?),
            "compact" => config.compact = parse_bool(value).ok_or_else(invalid)?,
            "max-rows" => config.max_rows_per_column = value.parse().map_err(|_| invalid())?,
            "start-date" => {
                config.first_exam_date = Some(
                    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?,
                )
            }
            _ => {
                return Err(ScheduleError::InvalidConfig(format!(
                    "unknown setting '{key}'"
                )));
            }
        }
        config.validate()?;
        self.config = config;
        println!("{key} set.");
        Ok(())
    }

    fn generate(&mut self) -> ScheduleResult<()> {
        let run = generate_from_frame(self.enrollment()?, &self.selection, &self.config)?;
        print!("{}", run.console_dump());
        for finding in run.report.findings() {
            println!("Warning: {finding}");
        }
        self.current = Some(run.snapshot()?);
        Ok(())
    }

    fn export(&self, path: &str) -> ScheduleResult<()> {
        let snapshot = self.current()?;
        let mut options = self.config.render_options()?;
        if self.config.periods_per_day.is_none() {
            options.periods_per_day = snapshot.tests_per_day;
        }
        render_schedule(&snapshot.schedule, &options, path)?;
        println!("Schedule written to {path}.");
        Ok(())
    }

    fn save(&self, format: &str, path: &str) -> ScheduleResult<()> {
        let snapshot = self.current()?;
        match format {
            "json" => save_schedule_to_json(snapshot, path)?,
            "csv" => save_schedule_to_csv(snapshot, path)?,
            _ => {
                return Err(ScheduleError::InvalidInputFormat(format!(
                    "unknown format '{format}' (json|csv)"
                )));
            }
        }
        println!("Schedule saved to {path}.");
        Ok(())
    }

    fn open(&mut self, format: &str, path: &str) -> ScheduleResult<()> {
        let snapshot = match format {
            "json" => load_schedule_from_json(path)?,
            "csv" => load_schedule_from_csv(path, self.config.max_tests_per_day)?,
            _ => {
                return Err(ScheduleError::InvalidInputFormat(format!(
                    "unknown format '{format}' (json|csv)"
                )));
            }
        };
        println!("Schedule loaded from {path}.");
        print!("{}", snapshot.schedule.console_dump(snapshot.tests_per_day));
        self.current = Some(snapshot);
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut session = Session::default();
    println!("Finals Schedule (CLI) - type 'help' for commands\n");

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

        let (cmd, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();
        let mut parts = rest.split_whitespace();

        let result = match cmd {
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => break,
            "config" => match parts.next() {
                Some(path) => SchedulerConfig::from_file(path).map(|config| {
                    session.config = config;
                    println!("Configuration loaded.");
                }),
                None => {
                    println!("Usage: config <file.toml>");
                    Ok(())
                }
            },
            "load" => {
                if rest.is_empty() {
                    println!("Usage: load <file.csv>");
                    Ok(())
                } else {
                    session.load(rest)
                }
            }
            "courses" => {
                session.list_courses();
                Ok(())
            }
            "include" => {
                session.mark(rest, true);
                Ok(())
            }
            "exclude" => {
                session.mark(rest, false);
                Ok(())
            }
            "include-all" => {
                session.selection.include_all();
                println!("{} courses give a final.", session.selection.included_count());
                Ok(())
            }
            "include-major" => {
                if rest.is_empty() {
                    println!("Usage: include-major <major>");
                } else {
                    let matched = session.selection.include_major(rest);
                    println!("{matched} {rest} courses marked.");
                }
                Ok(())
            }
            "set" => match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => session.set(key, value),
                _ => {
                    println!("Usage: set <key> <value>");
                    Ok(())
                }
            },
            "review" => {
                print!(
                    "{}",
                    review_summary(session.source.as_deref(), &session.selection, &session.config)
                );
                Ok(())
            }
            "generate" => session.generate(),
            "export" => match parts.next() {
                Some(path) => session.export(path),
                None => {
                    println!("Usage: export <file.xlsx>");
                    Ok(())
                }
            },
            "save" | "open" => match (parts.next(), parts.next()) {
                (Some(format), Some(path)) if cmd == "save" => session.save(format, path),
                (Some(format), Some(path)) => session.open(format, path),
                _ => {
                    println!("Usage: {cmd} <json|csv> <file>");
                    Ok(())
                }
            },
            _ => {
                println!("Unknown command. Type 'help'.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Error: {e}");
        }
    }
}
