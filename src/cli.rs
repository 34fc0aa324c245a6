use std::path::PathBuf;

use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug, Default)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Directory with replacement images and music
    #[arg(short, long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Play without music
    #[arg(short, long)]
    pub mute: bool,

    /// Seed for the pipe heights, for reproducible runs
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,
}
