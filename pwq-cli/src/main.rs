//! PWQ CLI - Command line tool for Pune river water quality predictions.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pwq-cli",
    version,
    about = "Pune river water quality prediction toolkit"
)]
struct Cli {
    #[command(flatten)]
    fixtures: pwq_cmd::FixtureArgs,

    #[command(subcommand)]
    command: pwq_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    pwq_cmd::run(cli.command, &cli.fixtures)
}
