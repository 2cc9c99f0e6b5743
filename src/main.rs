use clap::Parser;
use settings_engine::cli::{self, Cli};
use settings_engine::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    cli::run(Cli::parse()).await
}
