use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::record::{Record, RecordField};

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to look for, case-insensitively.
    pub q: Option<String>,
    /// Restricts the search to a single record field.
    pub field: Option<String>,
}

/// Keeps the records matching `query`, in their original order.
///
/// - `q` and `field`: the named field must contain `q`.
/// - only `q`: any field may contain `q`.
/// - no `q`: every record is returned.
///
/// A `field` outside [`RecordField`] matches nothing.
pub fn filter(records: Vec<Record>, query: &SearchQuery) -> Vec<Record> {
    let needle = match query.q.as_deref() {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return records,
    };

    match query.field.as_deref() {
        Some(field) if !field.is_empty() => match field.parse::<RecordField>() {
            Ok(field) => records
                .into_iter()
                .filter(|record| {
                    record
                        .get(field)
                        .is_some_and(|value| contains(value, &needle))
                })
                .collect(),
            Err(err) => {
                tracing::debug!(%err, "No record can match");

                Vec::new()
            }
        },
        _ => records
            .into_iter()
            .filter(|record| record.values().any(|value| contains(value, &needle)))
            .collect(),
    }
}

/// `needle` must already be lower-cased.
fn contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        other => other.to_string().to_lowercase().contains(needle),
    }
}
