use crate::config::ViewerConfig;
use crate::interaction;
use crate::layout::{Point, StoreLayout};
use crate::snapshot::{self, Customer, CustomerId, Snapshot};
use crate::state::animator::MotionAnimator;
use crate::state::entity::{MessageOutcome, ReconcileReport, TrackedCustomer};
use crate::state::metrics::ViewerMetrics;
use crate::state::proxy::{ProxySurface, SceneProxies};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info};

/// Viewer engine: reconciles the snapshot stream into tracked customers.
///
/// Owns the tracked-customer map, the latest snapshot, the animator and the
/// proxy surface. All mutation happens through `&mut self`, so a snapshot is
/// fully reconciled (proxies created/destroyed, animations started/stopped)
/// before it becomes visible through [`ViewerEngine::latest`].
pub struct ViewerEngine<P: ProxySurface = SceneProxies> {
    tracked: BTreeMap<CustomerId, TrackedCustomer>,

    /// Current truth, replaced wholesale by each state message
    latest: Option<Snapshot>,

    layout: StoreLayout,
    animator: MotionAnimator,
    proxies: P,

    /// Hit radius for pointer queries (scene units)
    hit_radius: f64,

    pub metrics: ViewerMetrics,
}

impl ViewerEngine<SceneProxies> {
    /// Create engine from configuration with on-screen proxies
    pub fn new(config: &ViewerConfig) -> Self {
        let animator = MotionAnimator::new(config.animation.speed, config.layout.fallback());
        Self::with_proxies(
            config.layout.clone(),
            animator,
            config.interaction.hit_radius,
            SceneProxies::new(),
        )
    }
}

impl<P: ProxySurface> ViewerEngine<P> {
    pub fn with_proxies(
        layout: StoreLayout,
        animator: MotionAnimator,
        hit_radius: f64,
        proxies: P,
    ) -> Self {
        Self {
            tracked: BTreeMap::new(),
            latest: None,
            layout,
            animator,
            proxies,
            hit_radius,
            metrics: ViewerMetrics::new(),
        }
    }

    /// Handle one raw transport message.
    ///
    /// Decode failures are logged and dropped; they never mutate state.
    pub fn handle_message(&mut self, text: &str) -> MessageOutcome {
        match snapshot::decode(text) {
            Ok(Some(snapshot)) => MessageOutcome::Applied(self.apply_snapshot(snapshot)),
            Ok(None) => {
                self.metrics.record_ignored();
                MessageOutcome::Ignored
            }
            Err(e) => {
                error!(error = %e, "Failed to decode message, dropping");
                self.metrics.record_decode_failure();
                MessageOutcome::Dropped(e)
            }
        }
    }

    /// Reconcile a snapshot, then publish it as the latest
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> ReconcileReport {
        let report = self.reconcile(&snapshot);
        self.latest = Some(snapshot);

        self.metrics
            .record_snapshot(report.created.len(), report.retired.len(), report.skipped);

        report
    }

    /// Diff a snapshot against the tracked set.
    ///
    /// - new ids: tracked record created at the wire position, proxy created,
    ///   animation started
    /// - known ids: desired category and target refreshed, position untouched
    /// - ids absent from the snapshot: animation stopped, proxy removed,
    ///   record deleted
    pub fn reconcile(&mut self, snapshot: &Snapshot) -> ReconcileReport {
        let mut report = ReconcileReport {
            skipped: snapshot.rejected.len(),
            ..ReconcileReport::default()
        };
        let mut present = BTreeSet::new();

        for customer in &snapshot.customers {
            let category = customer.category();
            let target = self.layout.resolve(category);
            let first_occurrence = present.insert(customer.id);

            match self.tracked.get_mut(&customer.id) {
                Some(tracked) => {
                    tracked.retarget(category, target);
                    self.animator.start(tracked);
                    if first_occurrence {
                        report.updated += 1;
                    } else {
                        debug!(customer_id = customer.id, "Duplicate customer id in snapshot");
                    }
                }
                None => {
                    let mut tracked = TrackedCustomer::new(
                        customer.id,
                        customer.current_position,
                        category,
                        target,
                    );
                    self.proxies.create(customer.id, customer.current_position);
                    self.animator.start(&mut tracked);
                    self.tracked.insert(customer.id, tracked);
                    report.created.push(customer.id);
                }
            }
        }

        let absent: Vec<CustomerId> = self
            .tracked
            .keys()
            .filter(|id| !present.contains(id))
            .copied()
            .collect();

        for id in absent {
            self.retire(id);
            report.retired.push(id);
        }

        debug!(
            created = report.created.len(),
            updated = report.updated,
            retired = report.retired.len(),
            skipped = report.skipped,
            "Snapshot reconciled"
        );

        report
    }

    /// Tear down one tracked customer. The animation is stopped before the
    /// proxy goes away so no step can target a missing proxy.
    fn retire(&mut self, id: CustomerId) {
        if let Some(mut tracked) = self.tracked.remove(&id) {
            self.animator.stop(&mut tracked);
            self.proxies.destroy(id);
        }
    }

    /// One frame tick: step every animating customer once.
    pub fn frame(&mut self) -> usize {
        let stepped = self.animator.frame(&mut self.tracked, &mut self.proxies);
        self.metrics.record_frame();
        stepped
    }

    /// Drop all tracked state ahead of a new simulation run
    pub fn reset(&mut self) {
        let count = self.tracked.len();
        let ids: Vec<CustomerId> = self.tracked.keys().copied().collect();
        for id in ids {
            self.retire(id);
        }
        self.latest = None;

        info!(customers = count, "Viewer state reset");
    }

    /// Customer under the pointer, hit-tested against the latest snapshot's
    /// wire positions
    pub fn hover(&self, pointer: Point) -> Option<&Customer> {
        self.latest
            .as_ref()
            .and_then(|snapshot| interaction::hit_test(pointer, snapshot, self.hit_radius))
    }

    pub fn get(&self, id: CustomerId) -> Option<&TrackedCustomer> {
        self.tracked.get(&id)
    }

    pub fn tracked(&self) -> impl Iterator<Item = &TrackedCustomer> {
        self.tracked.values()
    }

    pub fn tracked_ids(&self) -> Vec<CustomerId> {
        self.tracked.keys().copied().collect()
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn animator(&self) -> &MotionAnimator {
        &self.animator
    }

    pub fn proxies(&self) -> &P {
        &self.proxies
    }
}
