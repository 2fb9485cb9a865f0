//! Login command implementation

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::cli::{GlobalOptions, SessionContext};
use crate::client::LoginCredentials;
use crate::error::{ApiError, Result};

/// Run the login command
pub async fn run(
    opts: &GlobalOptions,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Username")
            .interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    let ctx = SessionContext::new(opts)?;

    println!("{}", "Signing in...".cyan());

    let credentials = LoginCredentials { username, password };
    if !ctx.session.login(&credentials).await {
        return Err(ApiError::Unauthorized.into());
    }

    let user = ctx.session.user().expect("user set by successful login");
    println!(
        "{} Signed in as {} ({})",
        "✓".green(),
        user.username.bold(),
        user.email
    );

    if let Some(expires) = ctx.session.token_expires() {
        let remaining = expires.signed_duration_since(chrono::Utc::now());
        println!(
            "  Token expires in {}h {}m",
            remaining.num_hours(),
            remaining.num_minutes() % 60
        );
    }

    if let Some(path) = ctx.session.take_redirect_after_login() {
        println!("  Return to: {}", path.cyan());
    }

    Ok(())
}
