//! Catalog error taxonomy and server message clean-up

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Non-2xx response; `message` is already normalized and status-prefixed
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("connection failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A superseded request was aborted. Never shown to the user.
    #[error("request cancelled")]
    Cancelled,

    #[error("not logged in")]
    NotLoggedIn,

    /// Rejected locally before any request was issued
    #[error("{0}")]
    Validation(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Http { status, .. } => Some(*status),
            CatalogError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build an HTTP error from a status and the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        CatalogError::Http {
            status,
            message: normalize_error_message(status, body),
        }
    }
}

const MAX_REWRITES: usize = 16;

/// Pattern → replacement chain that strips server exception wrappers.
/// Every replacement keeps the `<status>: ` prefix.
static REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // unknown entity type in a query
        (
            r"(?s)^(\d{3}): .*The abstract schema type '([^']+)' is unknown.*$",
            "$1: Unknown entity type '$2'",
        ),
        // JPQL compile errors: keep only the positioned complaint
        (
            r"(?s)^(\d{3}): Problem with JPQL.*?\[\d+, \d+\] (.+)$",
            "$1: $2",
        ),
        // persistence provider wrapper
        (
            r"(?s)^(\d{3}): .*?Exception \[EclipseLink-\d+\] \([^)]*\): \S+\s*(.+)$",
            "$1: $2",
        ),
        // nested internal exception
        (
            r"(?s)^(\d{3}): .*?Internal Exception: [\w.$]+(?:Exception|Error): (.+)$",
            "$1: $2",
        ),
        (
            r"(?s)^(\d{3}): (?:Exception )?Description: (.+)$",
            "$1: $2",
        ),
        (r"(?s)^(\d{3}): (.*?)\s+$", "$1: $2"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
        Ok(regex) => Some((regex, replacement)),
        Err(e) => {
            log::error!("Invalid error rewrite pattern {}: {}", pattern, e);
            None
        }
    })
    .collect()
});

/// Apply the rewrite chain until no pattern matches
pub fn clean_error_message(message: &str) -> String {
    let mut current = message.to_string();

    for _ in 0..MAX_REWRITES {
        let rewritten = REWRITES.iter().find_map(|(regex, replacement)| {
            regex
                .is_match(&current)
                .then(|| regex.replace(&current, *replacement).into_owned())
        });

        match rewritten {
            Some(next) if next != current => current = next,
            _ => break,
        }
    }

    current
}

/// Turn an HTTP error body into a `"<status>: <sentence>"` message.
///
/// The catalog answers errors with `{"code": .., "message": ..}`; anything
/// else is used verbatim.
pub fn normalize_error_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    let message = if message.is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        message
    };

    clean_error_message(&format!("{status}: {message}"))
}
