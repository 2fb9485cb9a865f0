//! Validate command implementation

use colored::Colorize;

use crate::cli::{GlobalOptions, SessionContext};
use crate::error::{ApiError, Result};

/// Run the validate command: check the held token against the server.
///
/// A locally expired token fails without a network round-trip and clears
/// the session.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = SessionContext::new(opts)?;

    if ctx.session.validate_token().await {
        println!("{} Token is valid", "✓".green());
        Ok(())
    } else {
        println!("{} Token is not valid", "✗".red());
        Err(ApiError::Unauthorized.into())
    }
}
