use std::path::PathBuf;

use clap::{Parser, Subcommand};

use autopilot_runtime::DEFAULT_PORT;

/// Environment variable consulted when `--port` is not given.
pub const PORT_ENV: &str = "AUTOPILOT_PORT";

#[derive(Parser, Debug)]
#[command(name = "autopilot")]
#[command(about = "Auto-accepts suggestion prompts in a remote-debuggable editor")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Remote-debugging port (overrides AUTOPILOT_PORT)
    #[arg(short, long, global = true, value_name = "PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach to the editor and keep accepting suggestions until interrupted
    Run {
        /// Append one line per accepted suggestion to this file
        #[arg(long, value_name = "FILE")]
        click_log: Option<PathBuf>,
    },

    /// List every accept-like candidate each target can see, without clicking
    Inspect,

    /// Print the raw discovery response from the debug endpoint
    Targets,
}

/// Port precedence: `--port` flag, then `AUTOPILOT_PORT`, then the default.
pub fn resolve_port(flag: Option<u16>) -> u16 {
    resolve_port_from(flag, std::env::var(PORT_ENV).ok())
}

fn resolve_port_from(flag: Option<u16>, env: Option<String>) -> u16 {
    if let Some(port) = flag {
        return port;
    }
    if let Some(value) = env {
        match value.parse() {
            Ok(port) => return port,
            Err(_) => {
                tracing::warn!(
                    target: "autopilot",
                    value = %value,
                    "ignoring unparseable AUTOPILOT_PORT"
                );
            }
        }
    }
    DEFAULT_PORT
}
