mod cli;
mod command;
mod config;
mod error;

use error::WrapErr;

use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();
    init_tracing(command_line.verbose);

    let cfg = config::Config::load().context("Load configuration error")?;

    if let Some(command) = command_line.command {
        let cmd: Box<dyn command::Command> = match command {
            cli::Commands::Create { index, fields, pattern, truncate } => {
                Box::new(command::CreateCommand::new(cfg, index, fields, pattern, truncate))
            }
            cli::Commands::Open { index } => Box::new(command::OpenCommand::new(cfg, index)),
            cli::Commands::Add { index, docs } => Box::new(command::AddCommand::new(cfg, index, docs)),
            cli::Commands::Split { text, pattern, json } => {
                Box::new(command::SplitCommand::new(cfg, text, pattern, json))
            }
        };
        cmd.execute().await?;
    } else {
        cli::Cli::command().print_help()?;
    }

    Ok(())
}
