// Pointer hit-testing and the hover tooltip

use crate::layout::Point;
use crate::snapshot::{Customer, CustomerId, Snapshot};
use tracing::trace;

/// First customer within `radius` of the pointer, in snapshot order.
///
/// Tests against the wire positions of the given snapshot, not the animated
/// positions. The boundary is inclusive.
pub fn hit_test<'a>(pointer: Point, snapshot: &'a Snapshot, radius: f64) -> Option<&'a Customer> {
    snapshot
        .customers
        .iter()
        .find(|customer| pointer.distance_to(customer.current_position) <= radius)
}

/// Tooltip content for a hovered customer
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub customer_id: CustomerId,
    pub category: String,
}

impl Tooltip {
    pub fn for_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            category: customer.category().to_string(),
        }
    }

    pub fn lines(&self) -> [String; 2] {
        [
            format!("ID: {}", self.customer_id),
            format!("Dept: {}", self.category),
        ]
    }

    /// Widest line, in terminal cells
    pub fn width(&self) -> u16 {
        self.lines()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as u16
    }
}

/// A visible tooltip anchored at the pointer cell
#[derive(Clone, Debug, PartialEq)]
pub struct Hovered {
    pub tooltip: Tooltip,
    pub column: u16,
    pub row: u16,
}

/// Hover state driven by pointer events
#[derive(Clone, Debug, Default)]
pub struct HoverState {
    current: Option<Hovered>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to `(column, row)`; `hit` is the customer under it, if any
    pub fn pointer_moved(&mut self, hit: Option<&Customer>, column: u16, row: u16) {
        self.current = hit.map(|customer| {
            trace!(customer_id = customer.id, column, row, "Hovering customer");
            Hovered {
                tooltip: Tooltip::for_customer(customer),
                column,
                row,
            }
        });
    }

    /// Pointer left the store surface
    pub fn hide(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Hovered> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}
