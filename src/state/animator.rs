use crate::layout::Point;
use crate::snapshot::CustomerId;
use crate::state::entity::{AnimationHandle, TrackedCustomer};
use crate::state::proxy::ProxySurface;
use std::collections::BTreeMap;
use tracing::trace;

/// Outcome of one animation step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved `speed` units toward the target
    Advanced,
    /// Snapped onto the target and retargeted to the fallback destination
    Arrived,
}

/// Moves tracked customers toward their targets at a fixed speed.
///
/// Every customer with a live handle is stepped exactly once per frame
/// tick. Stopping a customer clears its handle, so no further step runs
/// for it.
#[derive(Clone, Debug)]
pub struct MotionAnimator {
    /// Distance per frame (scene units), same for every customer
    speed: f64,
    /// Where customers head after reaching a target
    fallback: Point,
    next_handle: u64,
}

impl MotionAnimator {
    pub fn new(speed: f64, fallback: Point) -> Self {
        Self {
            speed,
            fallback,
            next_handle: 1,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn fallback(&self) -> Point {
        self.fallback
    }

    /// Begin animating a customer.
    ///
    /// No-op (returns false) if the customer already has a live handle.
    pub fn start(&mut self, customer: &mut TrackedCustomer) -> bool {
        if customer.animation.is_some() {
            return false;
        }

        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        customer.animation = Some(handle);

        trace!(customer_id = customer.id, handle = handle.0, "Animation started");
        true
    }

    /// Cancel a customer's animation. Safe to call when none is running.
    pub fn stop(&mut self, customer: &mut TrackedCustomer) -> bool {
        match customer.animation.take() {
            Some(handle) => {
                trace!(customer_id = customer.id, handle = handle.0, "Animation stopped");
                true
            }
            None => false,
        }
    }

    /// Advance one customer's model by one frame
    pub fn step(&self, customer: &mut TrackedCustomer) -> StepOutcome {
        let current = customer.current_position;
        let target = customer.target_position;
        let dx = target.x - current.x;
        let dy = target.y - current.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance == 0.0 || distance < self.speed {
            customer.current_position = target;
            // Arrived: head for the exit, unconditionally
            customer.target_position = self.fallback;
            StepOutcome::Arrived
        } else {
            customer.current_position = Point::new(
                current.x + dx / distance * self.speed,
                current.y + dy / distance * self.speed,
            );
            StepOutcome::Advanced
        }
    }

    /// Run one frame tick: step every animating customer and move its proxy.
    ///
    /// Returns the number of customers stepped.
    pub fn frame<P: ProxySurface>(
        &self,
        tracked: &mut BTreeMap<CustomerId, TrackedCustomer>,
        proxies: &mut P,
    ) -> usize {
        let mut stepped = 0;

        for customer in tracked.values_mut().filter(|c| c.is_animating()) {
            self.step(customer);
            stepped += 1;

            if !proxies.update(customer.id, customer.current_position) {
                trace!(customer_id = customer.id, "Proxy already removed, skipping visual update");
            }
        }

        stepped
    }
}
