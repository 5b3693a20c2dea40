//! Plain text rendering of tabs

use crate::api::metadata::{self, AUDIT_FIELDS};
use crate::api::models::{Entity, reference_id};
use crate::state::EntityTab;
use colored::*;
use serde_json::Value;

const MAX_CELL: usize = 40;

/// Columns shown for a table: id, scalar fields, to-one relations, and the
/// remaining audit fields when all columns are requested
pub fn columns(entity_type: &str, show_all: bool) -> Vec<String> {
    let mut columns = vec!["id".to_string()];
    if let Some(entity_type) = metadata::entity_type(entity_type) {
        columns.extend(entity_type.fields.iter().map(|f| f.to_string()));
        columns.extend(entity_type.to_one.iter().map(|r| r.name.to_string()));
    }
    if show_all {
        columns.extend(AUDIT_FIELDS.iter().skip(1).map(|f| f.to_string()));
    }
    columns
}

pub fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => format!("[{}]", items.len()),
        Some(value @ Value::Object(_)) => match reference_id(value) {
            Some(id) => format!("#{}", id),
            None => value.to_string(),
        },
        Some(other) => other.to_string(),
    };

    if text.chars().count() > MAX_CELL {
        let truncated: String = text.chars().take(MAX_CELL - 1).collect();
        format!("{}…", truncated)
    } else {
        text
    }
}

fn render_row(columns: &[String], row: &Entity) -> Vec<String> {
    columns.iter().map(|column| cell(row.get(column))).collect()
}

/// Print a tab: its rows, or the placeholder that stands in for them
pub fn print_tab(tab: &EntityTab) {
    let filter = &tab.filter;
    let mut title = format!("{}", filter.table.bright_white().bold());
    if !filter.where_input().is_empty() {
        title.push_str(&format!(" where {}", filter.where_input().cyan()));
    }
    if let Some(count) = tab.count {
        title.push_str(&format!(" ({} total)", count.to_string().bright_green()));
    }
    println!("{}", title);

    if let Some(placeholder) = tab.placeholder() {
        if tab.err_msg.is_some() {
            println!("  {} {}", "❌".bright_red().bold(), placeholder.bright_red());
        } else {
            println!("  {}", placeholder.dimmed());
        }
        return;
    }

    let columns = columns(&filter.table, tab.show_all_columns);
    let rows: Vec<Vec<String>> = tab
        .display_rows()
        .unwrap_or_default()
        .iter()
        .map(|row| render_row(&columns, row))
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:width$}", column, width = width))
        .collect();
    println!("  {}", header.join("  ").bright_white().bold());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:width$}", value, width = width))
            .collect();
        println!("  {}", line.join("  "));
    }

    let shown = tab.data.as_ref().map_or(0, Vec::len);
    if filter.limit > 0 {
        let page = filter.offset / filter.limit + 1;
        println!("  {}", format!("page {}, {} rows", page, shown).dimmed());
    }
}
