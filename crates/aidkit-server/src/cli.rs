use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "aidkit")]
#[command(about = "aidkit - offline first-aid guidance with a generative fallback", long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Socket address to listen on, e.g. 0.0.0.0:8000
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory holding the `<lang>.json` knowledge base catalogs
    #[arg(long, value_name = "DIR")]
    pub knowledge_dir: Option<PathBuf>,
}
