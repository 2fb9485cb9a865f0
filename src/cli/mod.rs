//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod context;
pub mod login;
pub mod logout;
pub mod status;
pub mod validate;
pub mod whoami;

pub use context::SessionContext;

/// ClinAgenda CLI - session companion for the ClinAgenda clinic platform
#[derive(Parser, Debug)]
#[command(name = "clinagenda")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override session store location
    #[arg(long, global = true, env = "CLINAGENDA_STORE", hide_env = true)]
    pub store: Option<String>,

    /// Custom API host for development/testing
    #[arg(long, global = true, env = "CLINAGENDA_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CLINAGENDA_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        /// Username to sign in with (prompted when omitted)
        #[arg(long)]
        username: Option<String>,

        /// Password (prompted when omitted; flag intended for scripting)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and clear the persisted session
    Logout,

    /// Show session status
    Status,

    /// Check the current token against the server
    Validate,

    /// Show the signed-in user
    Whoami,

    /// Display version information
    Version,
}

/// Global CLI options passed to all command handlers
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Custom session store path (defaults to ~/.clinagenda/session.yaml)
    pub store: Option<String>,

    /// Custom API host for development/testing
    pub api_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            store: cli.store.clone(),
            api_host: cli.api_host.clone(),
        }
    }

    /// Get the store path as `Option<&str>`
    pub fn store_ref(&self) -> Option<&str> {
        self.store.as_deref()
    }
}
