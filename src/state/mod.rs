// Snapshot reconciliation, motion animation and renderable proxies

mod animator;
mod engine;
mod entity;
mod metrics;
mod proxy;

pub use animator::{MotionAnimator, StepOutcome};
pub use engine::ViewerEngine;
pub use entity::{AnimationHandle, MessageOutcome, ReconcileReport, TrackedCustomer};
pub use metrics::{MetricsSnapshot, ViewerMetrics};
pub use proxy::{ProxySurface, SceneProxies};
