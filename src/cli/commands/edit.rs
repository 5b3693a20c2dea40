use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use std::sync::Arc;

use super::browse::load;
use crate::api::metadata::{self, RelationKind};
use crate::api::models::reference;
use crate::api::operations::{self, BulkOutcome, BulkProgress, save_creation, save_modification};
use crate::api::TableFilter;
use crate::cli::context::CliContext;
use crate::cli::output;
use crate::state::{Msg, TabLoader, TabStore};

/// Parse `field=value`. To-one relation fields take the related id; other
/// values are read as null, booleans, numbers, or text.
pub fn parse_assignment(entity_type: &str, raw: &str) -> Result<(String, Value)> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected field=value, got '{}'", raw))?;
    let field = field.trim();
    let value = value.trim();
    if field.is_empty() {
        anyhow::bail!("Missing field name in '{}'", raw);
    }

    if let Some((_, RelationKind::ToOne)) = metadata::relation(entity_type, field) {
        let id: i64 = value
            .parse()
            .with_context(|| format!("'{}' is not a valid id for {}", value, field))?;
        return Ok((field.to_string(), reference(id)));
    }

    let parsed = match value {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = value.parse::<i64>() {
                Value::from(n)
            } else if let Ok(n) = value.parse::<f64>() {
                Value::from(n)
            } else {
                let unquoted = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                Value::String(unquoted.to_string())
            }
        }
    };
    Ok((field.to_string(), parsed))
}

fn parse_assignments(entity_type: &str, fields: &[String]) -> Result<Vec<(String, Value)>> {
    fields.iter().map(|raw| parse_assignment(entity_type, raw)).collect()
}

fn report<T>(action: &str, outcome: &BulkOutcome<T>) {
    println!(
        "{} {} {} of {}",
        "✓".bright_green().bold(),
        action,
        outcome.succeeded.len().to_string().bright_green(),
        outcome.total()
    );
    for failure in &outcome.failures {
        println!(
            "  {} item {}: {}",
            "❌".bright_red().bold(),
            failure.index,
            failure.message.bright_red()
        );
    }
}

pub async fn delete(ctx: &CliContext, entity: String, ids: Vec<i64>) -> Result<()> {
    let (_, client) = ctx.client()?;
    let bulk = ctx.client_config().resilience.bulk;

    let mut store = TabStore::new();
    let (key, _) = store.open(TableFilter::new(entity.clone()));
    for id in &ids {
        store.update(key, Msg::MarkDelete(*id));
    }

    let progress = BulkProgress::new();
    let outcome = operations::delete_entities(&client, &entity, &ids, &bulk, Some(&progress)).await;
    store.update(key, Msg::SyncDeletes(outcome.succeeded.clone()));

    report("Deleted", &outcome);
    if let Some(tab) = store.get(key) {
        if !tab.deletions.is_empty() {
            println!("  {} still pending: {:?}", "⚠️".bright_yellow().bold(), tab.deletions);
        }
    }
    Ok(())
}

/// Create one row the way a draft in a tab is saved
pub async fn create(ctx: &CliContext, entity: String, fields: Vec<String>) -> Result<()> {
    let assignments = parse_assignments(&entity, &fields)?;
    let (_, client) = ctx.client()?;

    let mut store = TabStore::new();
    let (key, _) = store.open(
        TableFilter::new(entity.clone())
            .with_limit(ctx.config.settings.page_size)
            .with_sort("id", false),
    );
    store.update(key, Msg::SetData(Vec::new()));
    store.update(key, Msg::AddCreation);
    for (field, value) in assignments {
        store.update(key, Msg::EditCreation { index: 0, field, value });
    }

    let draft = store
        .get(key)
        .and_then(|tab| tab.creations.first().cloned())
        .context("Draft disappeared")?;
    let created = save_creation(&client, &entity, &draft).await?;
    store.update(key, Msg::SyncCreation { index: 0, entity: created });

    if let Some(tab) = store.get(key) {
        output::print_tab(tab);
    }
    Ok(())
}

/// Change fields of one row through the modification overlay
pub async fn update(ctx: &CliContext, entity: String, id: i64, fields: Vec<String>) -> Result<()> {
    let assignments = parse_assignments(&entity, &fields)?;
    let (_, client) = ctx.client()?;

    let mut store = TabStore::new();
    let mut loader = TabLoader::new(Arc::new(client.clone()));
    let (key, _) = store.open(TableFilter::new(entity.clone()).with_where(format!("id = {}", id)));
    load(&mut loader, &mut store, key).await;

    let tab = store.get(key).context("Tab disappeared")?;
    if let Some(err) = &tab.err_msg {
        anyhow::bail!("{}", err);
    }
    if tab.data.as_ref().is_none_or(Vec::is_empty) {
        anyhow::bail!("{} {} does not exist", entity, id);
    }

    for (field, value) in assignments {
        store.update(key, Msg::EditEntity { id, field, value });
    }

    let Some(modification) = store.get(key).and_then(|tab| tab.modifications.get(&id).cloned()) else {
        println!("Nothing to change");
        return Ok(());
    };

    let saved = save_modification(&client, &entity, id, &modification).await?;
    store.update(key, Msg::SyncModification(saved));

    if let Some(tab) = store.get(key) {
        output::print_tab(tab);
    }
    Ok(())
}

pub async fn move_entities(
    ctx: &CliContext,
    entity: String,
    field: String,
    target: i64,
    ids: Vec<i64>,
) -> Result<()> {
    match metadata::relation(&entity, &field) {
        Some((_, RelationKind::ToOne)) => {}
        _ => anyhow::bail!("'{}' is not a to-one relation of {}", field, entity),
    }

    let (_, client) = ctx.client()?;
    let bulk = ctx.client_config().resilience.bulk;
    let progress = BulkProgress::new();

    let outcome =
        operations::move_entities(&client, &entity, &ids, &field, target, &bulk, Some(&progress)).await;
    report("Moved", &outcome);
    Ok(())
}
