//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "sunswitchd",
    about = "Switch scheduler following sunrise, sunset and daily timers",
    version
)]
pub struct Cli {
    /// Configuration file. A missing file means all defaults.
    #[arg(env = "SUNSWITCH_CONFIG", default_value = "sunswitch.toml")]
    pub config: PathBuf,

    /// Evaluation resolution in seconds.
    #[arg(short, long)]
    pub resolution: Option<u32>,

    /// Device controller host.
    #[arg(short = 'z', long)]
    pub zhost: Option<String>,

    /// Device controller port.
    #[arg(short = 'p', long)]
    pub zport: Option<u16>,
}

impl Cli {
    /// Apply flags given on the command line over file and env values.
    pub fn apply(&self, config: &mut Config) {
        if let Some(resolution) = self.resolution {
            config.scheduler.resolution = resolution;
        }
        if let Some(host) = &self.zhost {
            config.device.connection.host.clone_from(host);
        }
        if let Some(port) = self.zport {
            config.device.connection.port = port;
        }
    }
}
