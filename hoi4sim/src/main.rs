//! Command-line front end for the construction simulation.

mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hoi4sim_core::scenarios::{InfraPayback, MaxMilitary};
use hoi4sim_core::{
    laws, BuildCount, BuildOrder, ConstructionEngine, Date, DefaultHooks, ObjectType,
    PolicyTimeline, SimInputs, DEFAULT_END_DATE, GAME_START,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hoi4sim", about = "Day-stepped HOI4 construction simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Soviet demo build order and dump the completion log
    Run {
        /// Country tag (SOV, GER, ITA, JAP, FRA, USA, ENG)
        #[arg(long, default_value = "SOV")]
        country: String,
        /// End date, Y-M-D
        #[arg(long)]
        end: Option<Date>,
        /// Extra civilian factories from trade (negative when exporting)
        #[arg(long, default_value_t = 0)]
        trade: i64,
        /// Write the JSONL log here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Military buildup: civilian factories first, then military forever
    MaxMilitary {
        #[arg(long, default_value = "SOV")]
        country: String,
        #[arg(long)]
        end: Option<Date>,
        /// Extra civilian factories from trade (negative when exporting)
        #[arg(long, default_value_t = 0)]
        trade: i64,
        /// Civilian factories to build before switching
        #[arg(long, default_value_t = 0)]
        civilian_first: u32,
        /// Average infrastructure of the sites everything is built at
        #[arg(long, default_value_t = 6)]
        infrastructure: u8,
        /// Sweep civilian investment from 0 to this value and report the
        /// optimum instead of running once
        #[arg(long)]
        sweep: Option<u32>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Infrastructure payback: race a levelled-up site against building
    /// factories directly
    InfraPayback {
        #[arg(long, default_value = "GER")]
        country: String,
        #[arg(long)]
        end: Option<Date>,
        /// Restrict to one German region by name; default races them all
        #[arg(long)]
        site: Option<String>,
        /// Infrastructure levels to build at the chosen site
        #[arg(long, default_value_t = 1)]
        levels: u8,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Historical-ish Soviet law schedule used by the demos.
fn soviet_timeline() -> anyhow::Result<PolicyTimeline> {
    Ok(PolicyTimeline::new()
        .at(Date::new(1936, 3, 11)?, &["free_trade"])
        .at(Date::new(1936, 6, 27)?, &["construction_1"])
        .at(Date::new(1937, 4, 22)?, &["construction_2"])
        .at(Date::new(1937, 12, 1)?, &["war_economy"])
        .at(Date::new(1939, 4, 15)?, &["construction_3"]))
}

fn run_demo(
    country: &str,
    end: Option<Date>,
    trade: i64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut engine = ConstructionEngine::for_country(country)?;
    let inputs = SimInputs {
        build_order: vec![
            BuildOrder::new("Moscow", ObjectType::Infrastructure, BuildCount::Finite(2)),
            BuildOrder::new("Kharkov", ObjectType::CivilianFactory, BuildCount::Finite(3)),
            BuildOrder::new("Stalingrad", ObjectType::MilitaryFactory, BuildCount::Finite(4)),
        ],
        timeline: soviet_timeline()?,
        trade_bonus: trade,
        end_date: end.unwrap_or(DEFAULT_END_DATE),
        sites: laws::demo_sites(),
    };
    let log = engine.run(&inputs, &mut DefaultHooks)?;

    let counts = engine.counts();
    info!(
        "{country}: finished on {} with {} infrastructure, {} civilian, {} military",
        engine.date(),
        counts.infrastructure,
        counts.civilian,
        counts.military
    );
    report::write_jsonl(&log.to_jsonl()?, output.as_deref())
}

fn run_max_military(
    country: &str,
    end: Option<Date>,
    trade: i64,
    civilian_first: u32,
    infrastructure: u8,
    sweep: Option<u32>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let scenario = MaxMilitary {
        timeline: soviet_timeline()?,
        trade_bonus: trade,
        infrastructure,
        end_date: end.unwrap_or(DEFAULT_END_DATE),
        ..MaxMilitary::new(country)
    };
    match sweep {
        Some(max) => {
            let points = scenario.efficiency_sweep(max)?;
            let optimum = scenario.find_optimum(max)?;
            report::print_json(&points)?;
            report::print_json(&optimum)
        }
        None => {
            let outcome = scenario.run(civilian_first)?;
            info!(
                "{country}: {} military factories by {} ({} civilian built first)",
                outcome.military,
                GAME_START.add_days(outcome.log.final_day().unwrap_or(0)),
                outcome.civilian
            );
            report::write_jsonl(&outcome.log.to_jsonl()?, output.as_deref())
        }
    }
}

fn run_infra_payback(
    country: &str,
    end: Option<Date>,
    site_name: Option<String>,
    levels: u8,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let scenario = InfraPayback {
        end_date: end.unwrap_or(DEFAULT_END_DATE),
        ..InfraPayback::new(country)
    };
    let regions = laws::german_regions();
    match site_name {
        Some(name) => {
            let site = regions
                .iter()
                .find(|s| s.name() == name)
                .with_context(|| format!("no region named '{name}'"))?;
            let outcome = scenario.run(site, levels)?;
            match outcome.payback_day {
                Some(day) => info!(
                    "{name}: {levels} level(s) pay back on day {day} ({})",
                    GAME_START.add_days(day)
                ),
                None => info!("{name}: {levels} level(s) never pay back before the end date"),
            }
            report::write_jsonl(&outcome.log.to_jsonl()?, output.as_deref())?;
            Ok(())
        }
        None => {
            let verdicts = scenario.site_verdicts(&regions)?;
            report::print_json(&verdicts)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            country,
            end,
            trade,
            output,
        } => run_demo(&country, end, trade, output),
        Command::MaxMilitary {
            country,
            end,
            trade,
            civilian_first,
            infrastructure,
            sweep,
            output,
        } => run_max_military(&country, end, trade, civilian_first, infrastructure, sweep, output),
        Command::InfraPayback {
            country,
            end,
            site,
            levels,
            output,
        } => run_infra_payback(&country, end, site, levels, output),
    }
}
