//! SMS replay CLI - replays scripted conversations against a webhook
//!
//! Lets a developer without a real phone number walk through an SMS
//! onboarding flow by posting the answers the provider would post.

use clap::Parser;
use sms_replay::commands::Commands;
use sms_replay::{cli, common::logging};

#[derive(Parser)]
#[command(name = "sms-replay", about = "Replay SMS conversations against a webhook")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging::init_cli();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
