#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in either client (CSS) or canvas (logical) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The canvas element's bounding box in client (CSS) pixels, as reported by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Logical drawing surface of the canvas.
///
/// `width` / `height` are the canvas backing-store dimensions, which can differ
/// from the CSS size the element is laid out at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 400.0, height: 280.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal and vertical CSS-to-logical scale factors for `rect`.
    ///
    /// A collapsed rect (zero or negative extent) scales by 1.
    #[must_use]
    pub fn scale(&self, rect: ClientRect) -> (f64, f64) {
        let sx = if rect.width > 0.0 { self.width / rect.width } else { 1.0 };
        let sy = if rect.height > 0.0 { self.height / rect.height } else { 1.0 };
        (sx, sy)
    }

    /// Convert a client-space pointer position to canvas coordinates.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point, rect: ClientRect) -> Point {
        let (sx, sy) = self.scale(rect);
        Point {
            x: (client.x - rect.left) * sx,
            y: (client.y - rect.top) * sy,
        }
    }

    /// The y coordinate of the top of the ground strip.
    #[must_use]
    pub fn ground_top(&self) -> f64 {
        self.height - crate::consts::GROUND_HEIGHT
    }
}
