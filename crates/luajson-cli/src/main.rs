use anyhow::Result;
use clap::Parser;

use luajson_cli::{
    cli::{Cli, Commands},
    commands, logging,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level, cli.verbose);

    match cli.command {
        Some(Commands::Export(args)) => commands::export::execute(cli.config.as_deref(), &args),
        Some(Commands::Config(cmd)) => commands::config::execute(cli.config.as_deref(), cmd),
        None => commands::menu::execute(cli.config.as_deref()),
    }
}
