use crate::layout::Point;
use crate::snapshot::{CustomerId, DecodeError};

/// Token for a customer's running animation loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub(super) u64);

/// Presentation-side record mirroring one simulated customer.
///
/// Created the first time an id appears in a snapshot and destroyed the
/// first time it is absent. Only the animator moves `current_position`
/// after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedCustomer {
    pub(super) id: CustomerId,
    pub(super) current_position: Point,
    pub(super) target_position: Point,
    pub(super) desired_category: String,
    pub(super) animation: Option<AnimationHandle>,
}

impl TrackedCustomer {
    pub(super) fn new(id: CustomerId, position: Point, category: &str, target: Point) -> Self {
        Self {
            id,
            current_position: position,
            target_position: target,
            desired_category: category.to_string(),
            animation: None,
        }
    }

    /// Refresh intent and target; the position is left to the animator
    pub(super) fn retarget(&mut self, category: &str, target: Point) {
        if self.desired_category != category {
            self.desired_category = category.to_string();
        }
        self.target_position = target;
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn current_position(&self) -> Point {
        self.current_position
    }

    pub fn target_position(&self) -> Point {
        self.target_position
    }

    pub fn desired_category(&self) -> &str {
        &self.desired_category
    }

    pub fn animation(&self) -> Option<AnimationHandle> {
        self.animation
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

/// Result of reconciling one snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    /// Newly tracked customers, in snapshot order
    pub created: Vec<CustomerId>,
    /// Customers already tracked whose intent/target was refreshed
    pub updated: usize,
    /// Customers absent from the snapshot, now torn down
    pub retired: Vec<CustomerId>,
    /// Entity records skipped as invalid
    pub skipped: usize,
}

/// What happened to one inbound transport message
#[derive(Clone, Debug, PartialEq)]
pub enum MessageOutcome {
    /// State message reconciled and published as the latest snapshot
    Applied(ReconcileReport),
    /// Not a state update (e.g. a control acknowledgement)
    Ignored,
    /// Undecodable payload, dropped without touching state
    Dropped(DecodeError),
}
