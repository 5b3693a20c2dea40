use anyhow::{Context, Result};
use colored::*;
use log::{info, warn};

use crate::api::{CatalogClient, ClientManager};
use crate::cli::context::CliContext;

pub async fn login(
    ctx: &mut CliContext,
    server: String,
    username: String,
    plugin: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let plugin = plugin.unwrap_or_else(|| ctx.config.settings.default_plugin.clone());
    let mut client = CatalogClient::new(server, &ctx.client_config())?;

    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", username))
            .context("Failed to read password")?,
    };

    client
        .login(&plugin, &username, &password)
        .await
        .context("Login failed")?;

    let connection = client.connection().context("Login returned no session")?;
    let slot = ctx.connections.save(&connection)?;
    info!("Logged in to {} as {} (slot {})", connection.server, connection.username, slot);

    println!(
        "{} Logged in to {} as {} (connection {})",
        "✓".bright_green().bold(),
        connection.server.bright_green(),
        connection.username.bright_green().bold(),
        slot.to_string().bright_cyan()
    );
    Ok(())
}

/// The session id is cleared locally even if the server call fails
pub async fn logout(ctx: &mut CliContext) -> Result<()> {
    let slot = ctx.slot()?;

    match ctx.client() {
        Ok((_, mut client)) => {
            if let Err(e) = client.logout().await {
                warn!("Server logout for connection {} failed: {}", slot, e);
                println!("  {} Server logout failed: {}", "⚠️".bright_yellow().bold(), e);
            }
        }
        Err(e) => warn!("No active session to end for connection {}: {}", slot, e),
    }

    ctx.connections.invalidate(slot)?;
    println!("{} Logged out of connection {}", "✓".bright_green().bold(), slot);
    Ok(())
}

pub async fn connections(ctx: &CliContext, check: bool) -> Result<()> {
    let stored = ctx.connections.list();
    if stored.is_empty() {
        println!("  {}", "⚠️  No connections saved".bright_yellow().bold());
        return Ok(());
    }

    let last = ctx.connections.last_connection();
    let manager = ClientManager::new();
    for connection in &stored {
        if let Some(live) = connection.connection() {
            manager
                .insert(connection.slot, CatalogClient::from_connection(&live, &ctx.client_config())?)
                .await;
        }
    }

    if check {
        let refreshed = manager.refresh_all().await;
        info!("Refreshed {} sessions", refreshed);
    }

    println!("  {}", "Saved connections:".bright_white().bold());
    for connection in stored {
        let marker = if Some(connection.slot) == last { "●" } else { "○" };
        let status = match manager.get(connection.slot).await {
            None => "logged out".dimmed().to_string(),
            Some(client) if check => match client.session_info().await {
                Ok(info) => format!("{:.0} min left", info.remaining_minutes).bright_green().to_string(),
                Err(e) => format!("invalid ({})", e).bright_red().to_string(),
            },
            Some(_) => "session saved".cyan().to_string(),
        };

        println!(
            "  {} {} {}@{} {}",
            marker.bright_green(),
            connection.slot.to_string().bright_cyan(),
            connection.username.bright_white(),
            connection.server,
            status
        );
    }
    Ok(())
}
