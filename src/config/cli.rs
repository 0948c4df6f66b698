use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "splynx-shaper")]
#[command(about = "Export Splynx internet services to a ShapedDevices.csv")]
pub struct CliConfig {
    #[arg(long, default_value = "shaper.toml", help = "Path to the TOML configuration")]
    pub config: String,

    #[arg(long, help = "Override the output directory from the configuration")]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
