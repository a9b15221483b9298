use crate::layout::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

mod decoder;

pub use decoder::{decode, DecodeError};

/// Stable customer identifier, unique within a simulation run
pub type CustomerId = i64;

/// Desired product of a customer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesiredProduct {
    pub category: String,
}

/// Customer as it appears in a state message (wire form)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub current_position: Point,
    pub desired_product: DesiredProduct,
}

impl Customer {
    pub fn new(id: CustomerId, x: f64, y: f64, category: &str) -> Self {
        Self {
            id,
            current_position: Point::new(x, y),
            desired_product: DesiredProduct {
                category: category.to_string(),
            },
        }
    }

    pub fn category(&self) -> &str {
        &self.desired_product.category
    }
}

/// Entity record that could not be read as a [`Customer`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordError {
    /// Position of the record in the message's customer list
    pub index: usize,
    /// Customer id, when the record carried a readable one
    pub id: Option<CustomerId>,
    pub reason: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(
                f,
                "customer record {} (id {}) is invalid: {}",
                self.index, id, self.reason
            ),
            None => write!(f, "customer record {} is invalid: {}", self.index, self.reason),
        }
    }
}

impl std::error::Error for RecordError {}

/// One full simulation state update.
///
/// Each snapshot replaces the previous one as current truth; it carries no
/// delta information.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Customers in message order (valid records only)
    pub customers: Vec<Customer>,

    /// Records dropped while decoding
    pub rejected: Vec<RecordError>,

    /// Active customers per desired category
    pub customer_categories: BTreeMap<String, u64>,

    pub average_purchase_count: f64,

    /// Store load factor
    pub store_load: f64,

    pub goroutine_count: i64,

    pub channel_count: i64,

    /// Recent technical log lines, oldest first
    pub technical_logs: Vec<String>,

    /// When the message was decoded
    pub received_at: DateTime<Utc>,
}

impl Snapshot {
    /// Snapshot with the given customers and empty aggregates
    pub fn from_customers(customers: Vec<Customer>) -> Self {
        Self {
            customers,
            rejected: Vec::new(),
            customer_categories: BTreeMap::new(),
            average_purchase_count: 0.0,
            store_load: 0.0,
            goroutine_count: 0,
            channel_count: 0,
            technical_logs: Vec::new(),
            received_at: Utc::now(),
        }
    }

    /// Number of active customers (for display)
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Last `count` technical log lines
    pub fn log_tail(&self, count: usize) -> &[String] {
        let start = self.technical_logs.len().saturating_sub(count);
        &self.technical_logs[start..]
    }

    /// "category: count" pairs joined by spaces, "-" when empty
    pub fn category_summary(&self) -> String {
        let summary = self
            .customer_categories
            .iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .collect::<Vec<_>>()
            .join(" ");

        if summary.is_empty() {
            "-".to_string()
        } else {
            summary
        }
    }
}
