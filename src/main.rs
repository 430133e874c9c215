use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use volunteer_shift::domain::registry::registry_store::Registry;
use volunteer_shift::domain::schedule::schedule_window::ScheduleWindow;
use volunteer_shift::domain::schedule::service_type::ServiceType;
use volunteer_shift::domain::schedule::shift_partitioner::{MAX_SHIFT_COUNT, partition_hhmm};
use volunteer_shift::domain::service::roster::{roster_entries, write_roster};
use volunteer_shift::domain::service::scheduling_service::{ScheduleOverview, SchedulingService};
use volunteer_shift::domain::utils::dates::{parse_date, parse_month};
use volunteer_shift::domain::utils::id::{ScheduleId, UserId};
use volunteer_shift::domain::validation::{is_valid_date_string, is_valid_time_range, is_valid_time_string};
use volunteer_shift::logger::{self, LogOptions};
use volunteer_shift::{load_config, load_registry};

#[derive(Parser)]
#[command(name = "volunteer_shift")]
#[command(version = "0.1.0")]
#[command(about = "Shift partitioning, slot occupancy and monthly quotas for volunteer schedules", long_about = None)]
struct Cli {
    /// Service configuration JSON; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log file; defaults to logs/system.log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log to the console only
    #[arg(long, global = true, conflicts_with = "log_file")]
    no_log_file: bool,

    /// Raise log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Splits a time window into shifts
    Partition {
        #[arg(long, value_parser = time_arg)]
        start: String,
        #[arg(long, value_parser = time_arg)]
        end: String,
        #[arg(long, value_parser = clap::value_parser!(i64).range(..=MAX_SHIFT_COUNT as i64))]
        shifts: i64,
    },

    /// Shows the occupancy of every shift of one schedule
    Occupancy {
        /// Registry snapshot file
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        schedule: String,
    },

    /// Shows how much of a monthly limit a volunteer has used
    Quota {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        service: String,
        /// Month as YYYY-MM
        #[arg(long)]
        month: String,
    },

    /// Lists schedules in a date range with their fill level
    Overview {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        service: Option<String>,
        #[arg(long, value_parser = date_arg)]
        from: String,
        #[arg(long, value_parser = date_arg)]
        to: String,
    },

    /// Exports who serves which shift as CSV
    Roster {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        service: Option<String>,
        #[arg(long, value_parser = date_arg)]
        from: String,
        #[arg(long, value_parser = date_arg)]
        to: String,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn time_arg(raw: &str) -> std::result::Result<String, String> {
    if is_valid_time_string(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("'{}' is not a HH:MM time", raw))
    }
}

fn date_arg(raw: &str) -> std::result::Result<String, String> {
    if is_valid_date_string(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("'{}' is not a YYYY-MM-DD date", raw))
    }
}

fn log_options(cli: &Cli) -> LogOptions {
    let level = match cli.verbose {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    let file = if cli.no_log_file { None } else { cli.log_file.clone().or(LogOptions::default().file) };

    LogOptions { level, file }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_service(store: &Path, config: Option<&Path>) -> Result<SchedulingService<Registry>> {
    let config = load_config(config).context("could not load service configuration")?;
    let registry = load_registry(store).with_context(|| format!("could not load registry '{}'", store.display()))?;
    Ok(SchedulingService::new(registry, config))
}

fn parse_service(raw: Option<&str>) -> Result<Option<ServiceType>> {
    Ok(raw.map(str::parse::<ServiceType>).transpose()?)
}

fn schedule_heading(schedule: &ScheduleWindow) -> String {
    format!(
        "{} {} {}-{} {} ({})",
        schedule.date.format("%Y-%m-%d"),
        schedule.service_type,
        schedule.start_time,
        schedule.end_time,
        schedule.location,
        schedule.id
    )
}

fn print_occupancy(overview: &ScheduleOverview) {
    println!("{}", schedule_heading(&overview.schedule).bold());
    for shift in &overview.shifts {
        let names: Vec<String> =
            shift.registrations.iter().map(|registration| registration.user_name.clone().unwrap_or_else(|| registration.user_id.to_string())).collect();
        let line = format!(
            "  Shift {} {}-{}  {}/{}  {}",
            shift.window.shift_number,
            shift.window.start_time,
            shift.window.end_time,
            shift.filled_slots(),
            overview.schedule.participants_per_shift,
            names.join(", ")
        );

        if shift.is_overbooked() {
            println!("{} {}", line.red().bold(), "(over capacity)".red());
        } else if shift.is_full() {
            println!("{} {}", line.red(), "(full)".red());
        } else {
            println!("{}", line.green());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Partition { start, end, shifts } => {
            anyhow::ensure!(is_valid_time_range(&start, &end), "end time {} must follow start time {}", end, start);
            let windows = partition_hhmm(&start, &end, shifts)?;
            if cli.json {
                return print_json(&windows);
            }
            for window in windows {
                println!("Shift {}: {}-{} ({} min)", window.shift_number, window.start_time, window.end_time, window.duration_minutes());
            }
        }
        Commands::Occupancy { store, schedule } => {
            let service = open_service(&store, config)?;
            let overview = service.schedule_overview(&ScheduleId::new(schedule))?;
            if cli.json {
                return print_json(&overview);
            }
            print_occupancy(&overview);
            println!("  {} of {} slots filled ({}%)", overview.summary.filled_slots, overview.summary.total_slots, overview.summary.percentage());
        }
        Commands::Quota { store, user, service, month } => {
            let scheduling = open_service(&store, config)?;
            let service_type: ServiceType = service.parse()?;
            let (year, month) = parse_month(&month)?;
            let status = scheduling.quota_status(&UserId::new(user.as_str()), service_type, year, month)?;
            if cli.json {
                return print_json(&status);
            }
            match status.remaining() {
                None => println!("{} registrations for {} in {}-{:02} (unlimited)", status.used(), service_type, year, month),
                Some(0) => println!("{}", format!("{} registrations for {} in {}-{:02}: monthly limit reached", status.used(), service_type, year, month).red()),
                Some(remaining) => println!("{} registrations for {} in {}-{:02}, {} remaining", status.used(), service_type, year, month, remaining),
            }
        }
        Commands::Overview { store, service, from, to } => {
            let scheduling = open_service(&store, config)?;
            let overviews = scheduling.overview(parse_service(service.as_deref())?, parse_date(&from)?, parse_date(&to)?)?;
            if cli.json {
                return print_json(&overviews);
            }
            if overviews.is_empty() {
                println!("No schedules between {} and {}.", from, to);
            }
            for overview in &overviews {
                let fill = format!("{}/{} ({}%)", overview.summary.filled_slots, overview.summary.total_slots, overview.summary.percentage());
                let fill = if overview.summary.filled_slots >= overview.summary.total_slots { fill.red() } else { fill.green() };
                println!("{}  {}", schedule_heading(&overview.schedule), fill);
            }
        }
        Commands::Roster { store, service, from, to, out } => {
            let scheduling = open_service(&store, config)?;
            let overviews = scheduling.overview(parse_service(service.as_deref())?, parse_date(&from)?, parse_date(&to)?)?;
            let entries = roster_entries(&overviews);

            match out {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("could not create '{}'", path.display()))?;
                    write_roster(&entries, file)?;
                    log::info!("Wrote {} roster rows to '{}'.", entries.len(), path.display());
                }
                None => write_roster(&entries, std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(&log_options(&cli));
    log::debug!("Logger initialized. Starting volunteer_shift.");

    run(cli)
}
