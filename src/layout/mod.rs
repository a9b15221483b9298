//! Store layout: named zones and the target resolver.
//!
//! A customer's desired product category is mapped to the centroid of the
//! first zone (in declared order) whose display name contains the category
//! text. Categories that match no zone resolve to the fallback destination
//! (the exit).

use serde::{Deserialize, Serialize};

/// Point in scene coordinates (same space as wire positions and surfaces)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Named rectangular zone (a store department)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Display name, also used for category matching
    pub name: String,
    /// Top-left corner
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Zone {
    pub fn new(name: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether this zone's label mentions the category (case-sensitive)
    pub fn matches(&self, category: &str) -> bool {
        self.name.contains(category)
    }
}

/// Scene dimensions, zones and the fallback destination
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreLayout {
    #[serde(default = "default_scene_width")]
    pub scene_width: f64,
    #[serde(default = "default_scene_height")]
    pub scene_height: f64,
    #[serde(default = "default_zones")]
    pub zones: Vec<Zone>,
    #[serde(default = "default_fallback")]
    pub fallback: Point,
}

fn default_scene_width() -> f64 {
    800.0
}

fn default_scene_height() -> f64 {
    600.0
}

fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new("Молочный отдел", 200.0, 100.0, 100.0, 200.0),
        Zone::new("Отдел овощей", 400.0, 100.0, 100.0, 200.0),
        Zone::new("Отдел мяса", 600.0, 100.0, 100.0, 200.0),
        Zone::new("Отдел хлеба", 200.0, 350.0, 100.0, 200.0),
        Zone::new("Отдел сахара", 400.0, 350.0, 100.0, 200.0),
    ]
}

fn default_fallback() -> Point {
    Point::new(750.0, 575.0)
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            scene_width: default_scene_width(),
            scene_height: default_scene_height(),
            zones: default_zones(),
            fallback: default_fallback(),
        }
    }
}

impl StoreLayout {
    /// First zone whose label contains `category`, in declared order
    pub fn zone_for(&self, category: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.matches(category))
    }

    /// Resolve a desired category to a destination point.
    ///
    /// Returns the matching zone's centroid, or the fallback destination when
    /// no zone matches.
    pub fn resolve(&self, category: &str) -> Point {
        self.zone_for(category)
            .map(Zone::centroid)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Point {
        self.fallback
    }
}
