use anyhow::Result;
use clap::Parser;

mod cli;
mod commit;
mod config;
mod error;
mod lm;
mod locate;
mod prompt;
mod workflow;

use crate::config::Workspace;
use crate::lm::LmClient;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let ws = Workspace::discover()?;

    if args.list_files {
        return workflow::run_list(&ws);
    }

    let client = LmClient::new(args.model);
    match args.file.as_deref() {
        Some(reference) => workflow::run_single(&ws, &client, reference, args.strict_archive),
        None => workflow::run_batch(&ws, &client, args.strict_archive),
    }
}
