use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;

use crate::api::metadata::{self, RelationKind, related_filter};
use crate::api::models::reference_id;
use crate::api::{CatalogClient, TableFilter};
use crate::cli::app::TableArgs;
use crate::cli::context::CliContext;
use crate::cli::output;
use crate::config::Settings;
use crate::state::{Msg, NO_ENTRIES, TabLoader, TabStore};

/// Build the filter for one page of a table
pub fn table_filter(settings: &Settings, args: &TableArgs) -> Result<TableFilter> {
    if args.page == 0 {
        anyhow::bail!("Page numbers start at 1");
    }
    let limit = args.limit.unwrap_or(settings.page_size);
    let offset = (args.page - 1)
        .checked_mul(limit)
        .context("Page number is too large")?;

    let mut filter = TableFilter::new(args.entity.clone())
        .with_limit(limit)
        .with_offset(offset);
    if let Some(where_clause) = &args.r#where {
        filter = filter.with_where(where_clause.clone());
    }
    if let Some(sort) = &args.sort {
        filter = filter.with_sort(sort.clone(), !args.desc);
    }
    if !args.include.is_empty() {
        let includes: Vec<&str> = args.include.iter().map(String::as_str).collect();
        filter = filter.with_includes(&includes);
    }
    Ok(filter)
}

fn warn_unknown(entity: &str) {
    if metadata::entity_type(entity).is_none() {
        warn!("'{}' is not a known entity type", entity);
    }
}

/// Fetch whatever a tab is missing and apply the results
pub async fn load(loader: &mut TabLoader, store: &mut TabStore, key: u64) {
    let Some(tab) = store.get(key) else {
        return;
    };

    let handles: Vec<_> = loader.start(tab).into_iter().map(tokio::spawn).collect();
    for handle in handles {
        match handle.await {
            Ok(outcome) => {
                loader.apply(store, outcome);
            }
            Err(e) => warn!("Fetch task for tab {} failed: {}", key, e),
        }
    }
}

async fn show(client: CatalogClient, filter: TableFilter, all_columns: bool) -> Result<()> {
    let mut store = TabStore::new();
    let mut loader = TabLoader::new(Arc::new(client));

    let (key, _) = store.open(filter);
    if all_columns {
        store.update(key, Msg::ToggleShowAllColumns);
    }
    load(&mut loader, &mut store, key).await;

    if let Some(tab) = store.get(key) {
        output::print_tab(tab);
    }
    Ok(())
}

pub async fn browse(ctx: &CliContext, args: TableArgs) -> Result<()> {
    warn_unknown(&args.entity);
    let filter = table_filter(&ctx.config.settings, &args)?;
    let (_, client) = ctx.client()?;
    show(client, filter, args.all_columns).await
}

pub async fn count(ctx: &CliContext, entity: String, where_clause: Option<String>) -> Result<()> {
    warn_unknown(&entity);
    let mut filter = TableFilter::new(entity);
    if let Some(where_clause) = where_clause {
        filter = filter.with_where(where_clause);
    }

    let (_, client) = ctx.client()?;
    let count = client.get_count(&filter, None).await?;
    println!("{}", count);
    Ok(())
}

/// Open the rows related to one row through `field`
pub async fn related(
    ctx: &CliContext,
    entity: String,
    id: i64,
    field: String,
    limit: Option<u32>,
) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.settings.page_size);
    let to_many = match metadata::relation(&entity, &field) {
        Some((_, kind)) => kind == RelationKind::ToMany,
        None => metadata::related_type_for_to_many_field(&entity, &field).is_some(),
    };

    let (_, client) = ctx.client()?;

    let related_id = if to_many {
        id
    } else {
        let origin = TableFilter::new(entity.clone())
            .with_where(format!("id = {}", id))
            .with_includes(&[field.as_str()]);
        let rows = client.get_entries(&origin, None).await?;
        let Some(row) = rows.first() else {
            anyhow::bail!("{} {} does not exist", entity, id);
        };
        match row.get(&field).and_then(reference_id) {
            Some(related_id) => related_id,
            None => {
                println!("{}", NO_ENTRIES);
                return Ok(());
            }
        }
    };

    match related_filter(&entity, &field, to_many, related_id, limit) {
        Some(filter) => show(client, filter, false).await,
        None => {
            println!("'{}' is not a relation of {}", field, entity);
            Ok(())
        }
    }
}
