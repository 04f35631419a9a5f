use std::path::PathBuf;

use clap::Parser;

use crate::{config::GameSettings, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 30.0, value_parser = positive_rate)]
    pub tick_rate: f64,

    #[arg(short, long, value_name = "FLOAT", help = "Frame rate, i.e. number of frames per second", default_value_t = 30.0, value_parser = positive_rate)]
    pub frame_rate: f64,

    #[arg(short, long, value_name = "SEED", help = "Seed for the pipe gap generator")]
    pub seed: Option<u64>,

    #[arg(short, long, value_name = "DIR", help = "Directory holding the sprite images")]
    pub assets: Option<PathBuf>,
}

impl Cli {
    /// Applies the command line overrides on top of the configured settings.
    pub fn apply(&self, settings: &mut GameSettings) {
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(assets) = &self.assets {
            settings.assets_dir = assets.clone();
        }
    }
}

// Rates become interval periods, so they must be finite and above zero.
fn positive_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw.parse().map_err(|e| format!("`{raw}` is not a number: {e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("rate must be a positive number, got {raw}"))
    }
}
