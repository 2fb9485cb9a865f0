//! ClinAgenda CLI - session companion for the ClinAgenda clinic platform

use clap::Parser;

use clinagenda::cli::{self, Cli, Commands, GlobalOptions};
use clinagenda::error::Result;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        eprintln!("Debug mode enabled");
    }

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login { username, password } => cli::login::run(&opts, username, password).await,
        Commands::Logout => cli::logout::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Validate => cli::validate::run(&opts).await,
        Commands::Whoami => cli::whoami::run(&opts),
        Commands::Version => {
            println!("clinagenda version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
