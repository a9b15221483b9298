use crate::layout::Point;
use crate::snapshot::CustomerId;
use std::collections::BTreeMap;

/// Renderable proxies, one per tracked customer.
///
/// The engine creates and destroys proxies during reconciliation; the
/// animator moves them. Nothing else touches them.
pub trait ProxySurface {
    fn create(&mut self, id: CustomerId, position: Point);

    /// Move a proxy. Returns false if no proxy exists for `id`.
    fn update(&mut self, id: CustomerId, position: Point) -> bool;

    /// Remove a proxy. Returns false if no proxy exists for `id`.
    fn destroy(&mut self, id: CustomerId) -> bool;

    /// Ids of all live proxies, ascending
    fn ids(&self) -> Vec<CustomerId>;
}

/// Customer markers drawn on the store surface
#[derive(Clone, Debug, Default)]
pub struct SceneProxies {
    markers: BTreeMap<CustomerId, Point>,
}

impl SceneProxies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, id: CustomerId) -> Option<Point> {
        self.markers.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CustomerId, Point)> + '_ {
        self.markers.iter().map(|(id, pos)| (*id, *pos))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl ProxySurface for SceneProxies {
    fn create(&mut self, id: CustomerId, position: Point) {
        self.markers.insert(id, position);
    }

    fn update(&mut self, id: CustomerId, position: Point) -> bool {
        match self.markers.get_mut(&id) {
            Some(marker) => {
                *marker = position;
                true
            }
            None => false,
        }
    }

    fn destroy(&mut self, id: CustomerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    fn ids(&self) -> Vec<CustomerId> {
        self.markers.keys().copied().collect()
    }
}
