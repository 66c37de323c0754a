use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "Autonomous pull-request review pipeline",
    long_about = "Vigil turns pull-request webhooks into a single consolidated review comment:\n\
                  an authored description, a deep code review, and a security scan with\n\
                  severity accounting, synthesized and posted back to the pull request.\n\n\
                  Each subcommand starts one of the services that make up the pipeline."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the webhook orchestrator that runs the review pipeline
    Orchestrator,
    /// Start the security scan service
    Scan,
    /// Start the source-control adapter that posts PR comments
    Adapter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Orchestrator => {
            let config = vigil_core::OrchestratorConfig::from_env();
            vigil_core::init_logging(&config.log_level);
            vigil_orchestrator::run(config).await?;
        }
        Command::Scan => {
            let config = vigil_core::ScanConfig::from_env();
            vigil_core::init_logging(&config.log_level);
            vigil_scan::run(config).await?;
        }
        Command::Adapter => {
            let config = vigil_core::AdapterConfig::from_env()?;
            vigil_core::init_logging(&config.log_level);
            vigil_adapter::run(config).await?;
        }
    }

    Ok(())
}
