mod inspect;
mod run;
mod targets;

use crate::cli::Commands;

pub async fn dispatch(command: Commands, port: u16) -> anyhow::Result<()> {
    match command {
        Commands::Run { click_log } => run::run(port, click_log).await,
        Commands::Inspect => inspect::inspect(port).await,
        Commands::Targets => targets::targets(port).await,
    }
}
