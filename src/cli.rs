use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "landslide-warn",
    version,
    about = "Landslide early-warning risk scoring from weather readings"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Assess(AssessCommand),
    Monitor(MonitorCommand),
    Recommend(RecommendCommand),
    Thresholds(ThresholdsCommand),
    ExportConfig(ExportConfigCommand),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Model configuration file (TOML, or JSON by extension)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override file merged over the configuration
    #[arg(long)]
    pub config_override: Option<PathBuf>,
}

#[derive(Args)]
pub struct AssessCommand {
    /// Hourly rainfall (mm/h)
    #[arg(long)]
    pub rainfall: f64,
    /// Relative humidity (%)
    #[arg(long)]
    pub humidity: f64,
    /// Wind speed (km/h)
    #[arg(long, default_value_t = 0.0)]
    pub wind_speed: f64,
    /// 3-day cumulative rainfall (mm)
    #[arg(long = "cumulative-3day", default_value_t = 0.0, conflicts_with = "history")]
    pub cumulative_3day: f64,
    /// 7-day cumulative rainfall (mm)
    #[arg(long = "cumulative-7day", default_value_t = 0.0, conflicts_with = "history")]
    pub cumulative_7day: f64,
    /// Month (1-12) for the seasonal multiplier
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Provider hourly series (JSON) used for the cumulative sums
    #[arg(long)]
    pub history: Option<PathBuf>,
    /// Reference time for --history windows (RFC 3339); defaults to the newest sample
    #[arg(long, requires = "history")]
    pub at: Option<String>,
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct MonitorCommand {
    /// JSON array of observations; null entries are failed reads
    pub observations: PathBuf,
    /// Keep the latest 168 hourly samples instead of a 7-day window
    #[arg(long)]
    pub capped: bool,
    /// Print the alert body for cycles that would notify
    #[arg(long)]
    pub show_alerts: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct RecommendCommand {
    /// SAFE, WATCH or DANGER (AMAN, WASPADA, BAHAYA also accepted)
    pub level: String,
}

#[derive(Args)]
pub struct ThresholdsCommand {
    #[arg(long)]
    pub parameter: Option<String>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ExportConfigCommand {
    pub path: PathBuf,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    Text,
}
