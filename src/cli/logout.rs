//! Logout command implementation

use colored::Colorize;

use crate::cli::{GlobalOptions, SessionContext};
use crate::error::Result;

/// Run the logout command.
///
/// The remote call is best-effort; the local session is cleared regardless.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = SessionContext::new(opts)?;

    let had_session = ctx.session.user().is_some() || ctx.session.is_authenticated();

    // Clears stray keys even when nobody is signed in
    ctx.session.logout().await;

    if had_session {
        println!("{} Signed out", "✓".green());
    } else {
        println!("Not signed in.");
    }

    Ok(())
}
