use crate::layout::{Point, StoreLayout};
use ratatui::layout::Rect;

/// Maps between terminal cells of the store canvas and scene coordinates.
///
/// Scene coordinates match wire positions: origin top-left, y grows
/// downward. The canvas widget puts its origin bottom-left, so only the y
/// axis is flipped when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneViewport {
    /// Canvas area inside the store panel's border
    inner: Rect,
    scene_width: f64,
    scene_height: f64,
}

impl SceneViewport {
    pub fn new(inner: Rect, layout: &StoreLayout) -> Self {
        Self {
            inner,
            scene_width: layout.scene_width,
            scene_height: layout.scene_height,
        }
    }

    pub fn inner(&self) -> Rect {
        self.inner
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.scene_width]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [0.0, self.scene_height]
    }

    /// Scene point to canvas coordinates
    pub fn to_canvas(&self, point: Point) -> (f64, f64) {
        (point.x, self.scene_height - point.y)
    }

    /// Terminal cell to scene point; `None` outside the canvas
    pub fn to_scene(&self, column: u16, row: u16) -> Option<Point> {
        if !self.contains(column, row) || self.inner.width < 2 || self.inner.height < 2 {
            return None;
        }

        let dx = f64::from(column - self.inner.x);
        let dy = f64::from(row - self.inner.y);
        Some(Point::new(
            dx * self.scene_width / f64::from(self.inner.width - 1),
            dy * self.scene_height / f64::from(self.inner.height - 1),
        ))
    }

    /// Scene point to the terminal cell it is drawn in; `None` off-scene
    pub fn to_cell(&self, point: Point) -> Option<(u16, u16)> {
        if self.inner.width < 2 || self.inner.height < 2 {
            return None;
        }
        if !(0.0..=self.scene_width).contains(&point.x) || !(0.0..=self.scene_height).contains(&point.y) {
            return None;
        }

        let column = (point.x * f64::from(self.inner.width - 1) / self.scene_width).round() as u16;
        let row = (point.y * f64::from(self.inner.height - 1) / self.scene_height).round() as u16;
        Some((self.inner.x + column, self.inner.y + row))
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.inner.x
            && column < self.inner.right()
            && row >= self.inner.y
            && row < self.inner.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> SceneViewport {
        // 81x31 cells over an 800x600 scene: 10 units per column, 20 per row
        SceneViewport::new(Rect::new(1, 1, 81, 31), &StoreLayout::default())
    }

    #[test]
    fn test_to_scene_corners_and_center() {
        let viewport = viewport();

        assert_eq!(viewport.to_scene(1, 1), Some(Point::new(0.0, 0.0)));
        assert_eq!(viewport.to_scene(81, 31), Some(Point::new(800.0, 600.0)));
        assert_eq!(viewport.to_scene(41, 16), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_to_scene_outside_canvas() {
        let viewport = viewport();

        assert_eq!(viewport.to_scene(0, 5), None);
        assert_eq!(viewport.to_scene(82, 5), None);
        assert_eq!(viewport.to_scene(5, 32), None);
    }

    #[test]
    fn test_to_cell_inverts_to_scene() {
        let viewport = viewport();

        assert_eq!(viewport.to_cell(Point::new(250.0, 200.0)), Some((26, 11)));
        assert_eq!(viewport.to_scene(26, 11), Some(Point::new(250.0, 200.0)));
        assert_eq!(viewport.to_cell(Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn test_to_canvas_flips_y() {
        let viewport = viewport();

        assert_eq!(viewport.to_canvas(Point::new(750.0, 575.0)), (750.0, 25.0));
        assert_eq!(viewport.to_canvas(Point::new(0.0, 0.0)), (0.0, 600.0));
    }

    #[test]
    fn test_degenerate_area() {
        let viewport = SceneViewport::new(Rect::new(0, 0, 1, 1), &StoreLayout::default());
        assert_eq!(viewport.to_scene(0, 0), None);
        assert_eq!(viewport.to_cell(Point::new(0.0, 0.0)), None);
    }
}
