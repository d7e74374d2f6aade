// Panel geometry: positions, viewport bounds, hit regions

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Top-right corner anchor used until the panel is explicitly placed
    pub fn default_anchor(viewport: Viewport, panel: PanelSize, margin: f64) -> Self {
        Self::new(viewport.width - panel.width - margin, margin).clamp_to(viewport, panel)
    }

    /// Keep the whole panel inside the viewport.
    ///
    /// When the panel is larger than the viewport the coordinate pins to 0.
    pub fn clamp_to(self, viewport: Viewport, panel: PanelSize) -> Self {
        let max_left = (viewport.width - panel.width).max(0.0);
        let max_top = (viewport.height - panel.height).max(0.0);
        Self {
            left: clamp_axis(self.left, max_left),
            top: clamp_axis(self.top, max_top),
        }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

impl PanelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Position,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Position, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.left
            && point.x <= self.origin.left + self.width
            && point.y >= self.origin.top
            && point.y <= self.origin.top + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };
    const PANEL: PanelSize = PanelSize {
        width: 320.0,
        height: 240.0,
    };

    fn assert_within_bounds(position: Position) {
        assert!(position.left >= 0.0 && position.left <= VIEWPORT.width - PANEL.width);
        assert!(position.top >= 0.0 && position.top <= VIEWPORT.height - PANEL.height);
    }

    #[test]
    fn test_clamp_keeps_panel_inside_viewport() {
        let inputs = [
            (-500.0, -500.0),
            (0.0, 0.0),
            (100.0, 200.0),
            (960.0, 560.0),
            (1e12, 1e12),
            (-1e12, 1e12),
            (f64::INFINITY, f64::NEG_INFINITY),
            (f64::NAN, 10.0),
        ];
        for (left, top) in inputs {
            assert_within_bounds(Position::new(left, top).clamp_to(VIEWPORT, PANEL));
        }
    }

    #[test]
    fn test_clamp_preserves_in_range_values() {
        let position = Position::new(100.0, 200.0).clamp_to(VIEWPORT, PANEL);
        assert_eq!(position, Position::new(100.0, 200.0));

        let position = Position::new(5000.0, 5000.0).clamp_to(VIEWPORT, PANEL);
        assert_eq!(position, Position::new(960.0, 560.0));
    }

    #[test]
    fn test_clamp_pins_oversized_panel_to_origin() {
        let tiny = Viewport::new(100.0, 100.0);
        let position = Position::new(50.0, 50.0).clamp_to(tiny, PANEL);
        assert_eq!(position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_default_anchor_is_top_right() {
        let anchor = Position::default_anchor(VIEWPORT, PANEL, 20.0);
        assert_eq!(anchor, Position::new(940.0, 20.0));
    }

    #[test]
    fn test_rect_contains() {
        let header = Rect::new(Position::new(10.0, 10.0), 320.0, 44.0);
        assert!(header.contains(Point::new(10.0, 10.0)));
        assert!(header.contains(Point::new(200.0, 50.0)));
        assert!(!header.contains(Point::new(200.0, 60.0)));
        assert!(!header.contains(Point::new(5.0, 20.0)));
    }
}
