//! `slots` CLI: inspect timeslot grids, bookings, and utilization from a
//! JSON export of the timeslot and webinar providers.
//!
//! ## Usage
//!
//! ```sh
//! # Raw 30-minute grid of every timeslot
//! slots grid -i schedule.json
//!
//! # Grid with bookings folded in, rendered in Berlin time
//! slots resolve -i schedule.json --tz Europe/Berlin
//!
//! # Dashboard numbers as JSON
//! cat schedule.json | slots stats --json
//!
//! # Double-booked webinars
//! slots conflicts -i schedule.json
//!
//! # Replay picker clicks against one timeslot
//! slots pick -i schedule.json --timeslot t1 --click 2 --click 0
//! ```
//!
//! The input document is `{ "timeslots": [...], "webinars": [...] }` with
//! records in the providers' camelCase shape.

mod settings;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use slot_engine::model::{load_schedule, Schedule, Timeslot, Webinar};
use slot_engine::selection::{PickerMsg, PickerState};
use slot_engine::{grid, interval, occupancy, stats, CandidateSlot, SlotDuration};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Inspect job-fair timeslot grids, bookings and utilization"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Input JSON document (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Grid granularity in minutes (overrides config and SLOTS_SLOT_MINUTES)
    #[arg(long, global = true)]
    slot_minutes: Option<u32>,

    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<String>,

    /// IANA time zone for printed times (UTC if omitted)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the raw slot grid
    Grid {
        /// Only this timeslot
        #[arg(long)]
        timeslot: Option<String>,
    },
    /// Show slots with bookings merged in
    Resolve {
        /// Only this timeslot
        #[arg(long)]
        timeslot: Option<String>,
    },
    /// Show utilization statistics
    Stats {
        /// Reference instant for past/upcoming counts (defaults to now)
        #[arg(long)]
        now: Option<String>,
        /// Also list per-timeslot figures
        #[arg(long)]
        per_timeslot: bool,
    },
    /// List double-booked webinars
    Conflicts,
    /// Replay range-picker clicks on one timeslot
    Pick {
        #[arg(long)]
        timeslot: String,
        /// Grid index to click; repeat for several clicks
        #[arg(long = "click")]
        clicks: Vec<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = settings::load(cli.config.as_deref(), cli.slot_minutes)?;
    let slot = cfg.slot_duration();
    let tz = parse_tz(cli.tz.as_deref())?;

    let raw = read_input(cli.input.as_deref())?;
    let schedule = load_schedule(&raw).context("Failed to load schedule")?;
    tracing::debug!(
        timeslots = schedule.timeslots.len(),
        webinars = schedule.webinars.len(),
        slot_minutes = slot.as_minutes(),
        "schedule loaded"
    );

    match cli.command {
        Commands::Grid { timeslot } => {
            let selected = select_timeslots(&schedule, timeslot.as_deref())?;
            let slots: Vec<CandidateSlot> = selected
                .iter()
                .flat_map(|ts| grid::generate_slots(ts, slot))
                .collect();
            if cli.json {
                print_json(&slots)?;
            } else {
                print_slots(&selected, &slots, tz);
            }
        }
        Commands::Resolve { timeslot } => {
            let selected = select_timeslots(&schedule, timeslot.as_deref())?;
            let unplaced: Vec<&Webinar> = selected
                .iter()
                .flat_map(|ts| occupancy::unplaced_bookings(ts, &schedule.webinars))
                .collect();
            for w in &unplaced {
                tracing::warn!(
                    webinar = %w.id,
                    timeslot = %w.timeslot_id,
                    "webinar is scheduled outside its timeslot window"
                );
            }

            let slots = occupancy::resolve_all(&selected, &schedule.webinars, slot);
            if cli.json {
                print_json(&serde_json::json!({
                    "slots": slots,
                    "unplaced": unplaced,
                }))?;
            } else {
                print_slots(&selected, &slots, tz);
                print_unplaced(&unplaced, tz);
            }
        }
        Commands::Stats { now, per_timeslot } => {
            let now = match now {
                Some(s) => interval::parse_instant(&s).context("Invalid --now")?,
                None => Utc::now(),
            };
            let totals =
                stats::compute_stats_at(&schedule.timeslots, &schedule.webinars, slot, now);
            let summaries = per_timeslot
                .then(|| stats::timeslot_summaries(&schedule.timeslots, &schedule.webinars, slot));

            if cli.json {
                match summaries {
                    Some(summaries) => print_json(&serde_json::json!({
                        "stats": totals,
                        "timeslots": summaries,
                    }))?,
                    None => print_json(&totals)?,
                }
            } else {
                println!("Total slots:        {}", totals.total_slots);
                println!("Booked slots:       {}", totals.booked_slots);
                println!("Available slots:    {}", totals.available_slots);
                println!("Utilization:        {}%", totals.utilization_rate);
                println!("Webinars:           {}", totals.total_webinars);
                println!("Past timeslots:     {}", totals.past_timeslots);
                println!("Upcoming timeslots: {}", totals.upcoming_timeslots);
                for s in summaries.unwrap_or_default() {
                    println!(
                        "  {} ({}): {}/{} booked, {}%",
                        s.timeslot_name,
                        s.timeslot_id,
                        s.booked_slots,
                        s.total_slots,
                        s.utilization_rate
                    );
                }
            }
        }
        Commands::Conflicts => {
            let conflicts = occupancy::find_booking_conflicts(&schedule.webinars);
            if cli.json {
                print_json(&conflicts)?;
            } else if conflicts.is_empty() {
                println!("No double bookings.");
            } else {
                for c in &conflicts {
                    println!(
                        "{}: '{}' [{}] overlaps '{}' [{}] by {} min",
                        c.timeslot_id,
                        c.webinar_a.title,
                        c.webinar_a.id,
                        c.webinar_b.title,
                        c.webinar_b.id,
                        c.overlap_minutes
                    );
                }
            }
        }
        Commands::Pick { timeslot, clicks } => {
            let selected = select_timeslots(&schedule, Some(timeslot.as_str()))?;
            run_picker(&selected[0], &schedule, slot, &clicks, cli.json, tz)?;
        }
    }

    Ok(())
}

fn run_picker(
    timeslot: &Timeslot,
    schedule: &Schedule,
    slot: SlotDuration,
    clicks: &[usize],
    json: bool,
    tz: Option<Tz>,
) -> Result<()> {
    let mut state = PickerState::for_timeslot(Some(timeslot), &schedule.webinars, slot);
    let mut output = None;

    for &index in clicks {
        let update = state.update(PickerMsg::Click(index));
        if let Some(warning) = &update.warning {
            if !json {
                println!("click {}: {}", index, warning);
            }
        }
        output = update.output;
        state = update.state;
    }

    if json {
        return print_json(&serde_json::json!({
            "selection": state.selection,
            "output": output,
        }));
    }

    match output {
        Some(range) => println!(
            "Selected {} slot(s): start {}, {} min",
            state.selection.len(),
            fmt_time(range.scheduled_start_time, tz),
            range.duration
        ),
        None => println!("Nothing selected."),
    }
    Ok(())
}

/// All timeslots, or just the one named by `id`.
fn select_timeslots(schedule: &Schedule, id: Option<&str>) -> Result<Vec<Timeslot>> {
    match id {
        None => Ok(schedule.timeslots.clone()),
        Some(id) => {
            let ts = schedule
                .timeslots
                .iter()
                .find(|t| t.id == id)
                .with_context(|| format!("Unknown timeslot: '{}'", id))?;
            Ok(vec![ts.clone()])
        }
    }
}

fn parse_tz(tz: Option<&str>) -> Result<Option<Tz>> {
    tz.map(|name| {
        name.parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown time zone: '{}'", name))
    })
    .transpose()
}

fn fmt_time(dt: DateTime<Utc>, tz: Option<Tz>) -> String {
    match tz {
        Some(tz) => dt.with_timezone(&tz).format("%H:%M").to_string(),
        None => dt.format("%H:%M").to_string(),
    }
}

fn print_slots(timeslots: &[Timeslot], slots: &[CandidateSlot], tz: Option<Tz>) {
    for ts in timeslots {
        println!("{} ({})", ts.timeslot_name, ts.id);
        let mut any = false;
        for s in slots.iter().filter(|s| s.timeslot_id == ts.id) {
            any = true;
            let label = format!("{}-{}", fmt_time(s.start, tz), fmt_time(s.end, tz));
            match &s.webinar {
                Some(w) if s.is_occupied => {
                    println!("  {}  booked     {} [{}]", label, w.title, w.id)
                }
                _ => println!("  {}  available", label),
            }
        }
        if !any {
            println!("  (no slots)");
        }
    }
}

fn print_unplaced(unplaced: &[&Webinar], tz: Option<Tz>) {
    if unplaced.is_empty() {
        return;
    }
    println!("Outside their timeslot:");
    for w in unplaced {
        let end = w.span().end;
        println!(
            "  {}-{}  {} [{}] in {}",
            fmt_time(w.scheduled_start_time, tz),
            fmt_time(end, tz),
            w.title,
            w.id,
            w.timeslot_id
        );
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
