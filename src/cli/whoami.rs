//! Whoami command implementation

use colored::Colorize;

use crate::cli::{GlobalOptions, SessionContext};
use crate::error::Result;

/// Run the whoami command
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = SessionContext::new(opts)?;

    match ctx.session.user() {
        Some(user) => {
            println!("{} ({})", user.username.bold(), user.email);
            if let Some(name) = &user.name {
                println!("  Name: {}", name);
            }
            if !user.roles.is_empty() {
                println!("  Roles: {}", user.roles.join(", "));
            }
            if !ctx.session.is_authenticated() {
                println!("  {}", "Session expired".yellow());
            }
        }
        None => println!("Not signed in."),
    }

    Ok(())
}
