mod alert;
mod cli;
mod config;
mod error;
mod monitor;
mod rainfall;
mod recommend;
mod report;
mod scoring;
mod site;
mod types;
mod weather;

use crate::error::LandslideError;
use crate::scoring::RiskEngine;
use crate::types::config::{ParameterThresholds, ThresholdBand};
use crate::types::risk::{Parameter, Readings, RiskLevel};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SAFE: i32 = 0;
    pub const WATCH: i32 = 1;
    pub const DANGER: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn level_exit_code(level: RiskLevel) -> i32 {
    match level {
        RiskLevel::Safe => exit_code::SAFE,
        RiskLevel::Watch => exit_code::WATCH,
        RiskLevel::Danger => exit_code::DANGER,
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let fallback = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

fn load_engine(args: &cli::ConfigArgs) -> Result<RiskEngine, LandslideError> {
    let base = config::resolve_base(args.config.as_deref());
    let model = config::load_model(base.as_deref(), args.config_override.as_deref())?;
    Ok(RiskEngine::new(model))
}

fn run() -> Result<i32, LandslideError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Assess(cmd) => {
            let engine = load_engine(&cmd.config)?;

            let (cumulative_3day, cumulative_7day) = match &cmd.history {
                Some(path) => {
                    let series = weather::load_history(path)?;
                    let newest = series
                        .iter()
                        .map(|sample| sample.timestamp)
                        .max()
                        .ok_or(LandslideError::NoReading)?;
                    let reference = match &cmd.at {
                        Some(at) => parse_reference_time(at)?,
                        None => newest,
                    };
                    let mut tracker = rainfall::RainfallTracker::new();
                    tracker.replace_with(series, reference)?;
                    let totals = tracker.cumulative(reference);
                    (totals.three_day, totals.seven_day)
                }
                None => (cmd.cumulative_3day, cmd.cumulative_7day),
            };

            let readings = Readings {
                rainfall_hourly: cmd.rainfall,
                cumulative_3day,
                cumulative_7day,
                humidity: cmd.humidity,
                wind_speed: cmd.wind_speed,
            };
            let result = engine.assess(&readings, cmd.month)?;
            let recommendations = recommend::recommendations_for(result.risk_level);

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Text => report::OutputFormat::Text,
            };
            let rendered = report::render(&result, recommendations, output_format)?;
            println!("{rendered}");

            Ok(level_exit_code(result.risk_level))
        }
        cli::Commands::Monitor(cmd) => {
            let engine = load_engine(&cmd.config)?;
            let mut source = weather::ObservationFile::load(&cmd.observations)?;
            let mut session = if cmd.capped {
                monitor::SiteMonitor::with_retention(rainfall::Retention::Capped(
                    rainfall::CAPPED_HOURLY_ENTRIES,
                ))
            } else {
                monitor::SiteMonitor::new()
            };

            let mut highest = RiskLevel::Safe;
            let mut cycle = 0usize;
            while !source.is_exhausted() {
                cycle += 1;
                match session.cycle(&engine, &mut source) {
                    Ok(outcome) => {
                        highest = highest.max(outcome.result.risk_level);
                        println!(
                            "cycle {cycle}: {} 3d={:.1}mm 7d={:.1}mm notify={}",
                            report::text::to_summary(&outcome.result),
                            outcome.cumulative.three_day,
                            outcome.cumulative.seven_day,
                            outcome.alert.notify
                        );
                        if cmd.show_alerts && outcome.alert.notify {
                            let recommendations =
                                recommend::recommendations_for(outcome.result.risk_level);
                            println!(
                                "{}",
                                report::text::alert_message(
                                    &outcome.result,
                                    &outcome.cumulative,
                                    recommendations
                                )
                            );
                        }
                    }
                    Err(LandslideError::NoReading) => {
                        println!("cycle {cycle}: skipped (no reading)");
                    }
                    Err(err) => return Err(err),
                }
            }

            let retained_mm: f64 = session
                .tracker()
                .samples()
                .map(|sample| sample.millimeters)
                .sum();
            if session.tracker().is_empty() {
                println!("no rainfall samples retained");
            } else {
                println!(
                    "retained {} rainfall samples ({:.1} mm), last notified level: {}",
                    session.tracker().len(),
                    retained_mm,
                    session
                        .last_notified()
                        .map(|level| level.to_string())
                        .unwrap_or_else(|| "none".to_string())
                );
            }

            Ok(level_exit_code(highest))
        }
        cli::Commands::Recommend(cmd) => {
            if cmd.level.parse::<RiskLevel>().is_err() {
                tracing::warn!(level = %cmd.level, "unknown risk level; showing SAFE actions");
            }
            for recommendation in recommend::recommendations_for_name(&cmd.level) {
                println!("- {recommendation}");
            }
            Ok(exit_code::SAFE)
        }
        cli::Commands::Thresholds(cmd) => {
            let engine = load_engine(&cmd.config)?;
            let selected = match &cmd.parameter {
                Some(name) => vec![engine.model().parameter(name.parse::<Parameter>()?)?],
                None => engine.model().parameters().iter().collect(),
            };
            for thresholds in selected {
                print!("{}", describe_thresholds(thresholds));
            }
            let seasonal = &engine.model().seasonal;
            println!(
                "seasonal multipliers: high {:.2}, moderate {:.2}, low {:.2} (max {:.2})",
                seasonal.high,
                seasonal.moderate,
                seasonal.low,
                seasonal.max_multiplier()
            );
            Ok(exit_code::SAFE)
        }
        cli::Commands::ExportConfig(cmd) => {
            config::export_reference(&cmd.path)?;
            println!("reference configuration written to {}", cmd.path.display());
            Ok(exit_code::SAFE)
        }
    }
}

fn parse_reference_time(raw: &str) -> Result<DateTime<Utc>, LandslideError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| LandslideError::InputValidation {
            field: "at".to_string(),
            reason: e.to_string(),
        })
}

fn describe_thresholds(thresholds: &ParameterThresholds) -> String {
    let band = |name: &str, band: &ThresholdBand| {
        let upper = band
            .max
            .map(|max| format!("{max}"))
            .unwrap_or_else(|| "unbounded".to_string());
        format!(
            "  {name:<6} {} ..= {upper} -> score {}..{}\n",
            band.min, band.score_lo, band.score_hi
        )
    };
    format!(
        "{} ({}), weight {:.2}\n{}{}{}",
        thresholds.parameter,
        thresholds.description,
        thresholds.weight,
        band("safe", &thresholds.safe),
        band("watch", &thresholds.watch),
        band("danger", &thresholds.danger)
    )
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
