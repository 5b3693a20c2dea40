//! Command-line front end over the library

pub mod app;
pub mod commands;
pub mod context;
pub mod output;

pub use app::{Cli, Commands, TableArgs};
pub use context::CliContext;

use anyhow::Result;

pub async fn run(cli: Cli) -> Result<()> {
    let mut ctx = CliContext::load(cli.connection)?;

    let keeper = match cli.command {
        Commands::Login { .. } | Commands::Logout | Commands::Connections { .. } => None,
        _ => ctx.start_keeper().await,
    };

    let result = match cli.command {
        Commands::Login { server, username, plugin, password } => {
            commands::login(&mut ctx, server, username, plugin, password).await
        }
        Commands::Logout => commands::logout(&mut ctx).await,
        Commands::Connections { check } => commands::connections(&ctx, check).await,
        Commands::Browse(args) => commands::browse(&ctx, args).await,
        Commands::Count { entity, r#where } => commands::count(&ctx, entity, r#where).await,
        Commands::Related { entity, id, field, limit } => {
            commands::related(&ctx, entity, id, field, limit).await
        }
        Commands::Delete { entity, ids } => commands::delete(&ctx, entity, ids).await,
        Commands::Create { entity, fields } => commands::create(&ctx, entity, fields).await,
        Commands::Update { entity, id, fields } => commands::update(&ctx, entity, id, fields).await,
        Commands::Move { entity, field, target, ids } => {
            commands::move_entities(&ctx, entity, field, target, ids).await
        }
    };

    if let Some(keeper) = keeper {
        keeper.abort();
    }
    result
}
