//! Status command implementation

use colored::Colorize;

use crate::cli::{GlobalOptions, SessionContext};
use crate::error::Result;
use crate::session::storage::FileStorage;

/// Run the status command to display session status without touching the
/// network
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "ClinAgenda Session Status".bold());

    let store_path = match opts.store_ref() {
        Some(path) => path.into(),
        None => FileStorage::default_path()?,
    };
    println!(
        "Session store: {}",
        store_path.display().to_string().cyan()
    );

    let ctx = SessionContext::new(opts)?;

    match ctx.session.user() {
        Some(user) => {
            println!(
                "{} Signed in as {} ({})",
                "✓".green(),
                user.username.bold(),
                user.email
            );
            if !user.roles.is_empty() {
                println!("  Roles: {}", user.roles.join(", "));
            }
        }
        None => {
            println!("{} Not signed in", "✗".red());
            println!("  → Run 'clinagenda login' to sign in");
        }
    }

    match ctx.session.token_expires() {
        Some(expires) if ctx.session.is_authenticated() => {
            let remaining = expires.signed_duration_since(chrono::Utc::now());
            println!(
                "{} Token valid (expires in {}h {}m)",
                "✓".green(),
                remaining.num_hours(),
                remaining.num_minutes() % 60
            );
        }
        Some(_) => {
            println!("{} Token expired", "⚠".yellow());
            println!("  → Run 'clinagenda login' to sign in again");
        }
        None => {
            println!("{} No token held", "○".dimmed());
        }
    }

    println!();

    Ok(())
}
