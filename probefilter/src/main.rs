mod args;
mod pipeline;

use args::{Cli, SubCommands};
use pipeline::{curves, duplex, run, structure};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = match verbose {
        true => "debug",
        false => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: &SubCommands) -> anyhow::Result<()> {
    match command {
        SubCommands::Duplex(args) => {
            duplex(args)?;
        }
        SubCommands::Structure(args) => {
            structure(args)?;
        }
        SubCommands::Run(args) => {
            run(args)?;
        }
        SubCommands::Curves(args) => {
            let stdout = std::io::stdout();
            curves(args, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn main() {
    color_backtrace::install();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = dispatch(&cli.command) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
