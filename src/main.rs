use anyhow::Result;
use clap::Parser;
use log::info;

use icat_admin::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file, truncated on each run
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("icat-admin.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting icat-admin");

    cli::run(cli).await
}
