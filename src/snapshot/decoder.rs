use super::{Customer, RecordError, Snapshot};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Decode errors for inbound transport messages
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Payload is not valid JSON
    Malformed(String),
    /// Payload carries a customer list but the state fields have the wrong shape
    InvalidShape(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(e) => write!(f, "malformed message: {}", e),
            DecodeError::InvalidShape(e) => write!(f, "invalid state message: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Full simulation state as sent by the server
#[derive(Debug, Deserialize)]
struct SimulationStats {
    #[serde(default)]
    customers: Option<Vec<Value>>,
    #[serde(default)]
    customer_categories: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    average_purchase_count: Option<f64>,
    #[serde(default)]
    store_load: Option<f64>,
    #[serde(default)]
    goroutine_count: Option<i64>,
    #[serde(default)]
    channel_count: Option<i64>,
    #[serde(default)]
    technical_logs: Option<Vec<String>>,
}

/// Decode a raw transport payload.
///
/// Returns:
/// - `Ok(Some(snapshot))` for a full simulation state message
/// - `Ok(None)` for any other message shape (no `customers` field, or a null
///   one as sent when a run ends); these are not state updates
/// - `Err(DecodeError)` when the payload cannot be parsed
///
/// Individual customer records that are missing fields are dropped and
/// reported in [`Snapshot::rejected`]; they do not fail the whole message.
pub fn decode(text: &str) -> Result<Option<Snapshot>, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    match value.get("customers") {
        None | Some(Value::Null) => {
            debug!("Message has no customer list, not a state update");
            return Ok(None);
        }
        Some(_) => {}
    }

    let stats: SimulationStats =
        serde_json::from_value(value).map_err(|e| DecodeError::InvalidShape(e.to_string()))?;

    let raw_customers = stats.customers.unwrap_or_default();
    let mut customers = Vec::with_capacity(raw_customers.len());
    let mut rejected = Vec::new();

    for (index, raw) in raw_customers.into_iter().enumerate() {
        let id = raw.get("id").and_then(Value::as_i64);
        match serde_json::from_value::<Customer>(raw) {
            Ok(customer) => customers.push(customer),
            Err(e) => {
                let error = RecordError {
                    index,
                    id,
                    reason: e.to_string(),
                };
                warn!(index = index, customer_id = ?id, error = %e, "Skipping invalid customer record");
                rejected.push(error);
            }
        }
    }

    Ok(Some(Snapshot {
        customers,
        rejected,
        customer_categories: stats.customer_categories.unwrap_or_default(),
        average_purchase_count: stats.average_purchase_count.unwrap_or_default(),
        store_load: stats.store_load.unwrap_or_default(),
        goroutine_count: stats.goroutine_count.unwrap_or_default(),
        channel_count: stats.channel_count.unwrap_or_default(),
        technical_logs: stats.technical_logs.unwrap_or_default(),
        received_at: Utc::now(),
    }))
}
