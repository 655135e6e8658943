use clap::Parser;
use tracing::error;

mod cli;
mod click_log;
mod commands;
mod driver;
mod host;
mod logging;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let port = cli::resolve_port(cli.port);
    if let Err(err) = commands::dispatch(cli.command, port).await {
        error!(target: "autopilot", error = %err, "command failed");
        std::process::exit(1);
    }
}
