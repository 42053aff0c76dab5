//! Plain geometric value types returned by the detectors.

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// Axis-aligned rectangle with an inclusive top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// Smallest rectangle containing both corner points (inclusive).
    pub fn from_corners(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true when `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// Line segment between two pixel positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Line {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rise over run; `NaN` for vertical segments.
    ///
    /// Callers must check `is_vertical` (or `slope().is_nan()`) explicitly.
    pub fn slope(&self) -> f64 {
        if self.x1 == self.x2 {
            return f64::NAN;
        }
        f64::from(self.y2 - self.y1) / f64::from(self.x2 - self.x1)
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        let dx = f64::from(self.x2 - self.x1);
        let dy = f64::from(self.y2 - self.y1);
        dx.hypot(dy)
    }
}

/// Circle candidate: center `(x, y)` and radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec3i {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

#[cfg(test)]
mod tests {
    use super::{Line, Rect};

    #[test]
    fn vertical_line_has_nan_slope() {
        let line = Line::new(3, 0, 3, 10);
        assert!(line.is_vertical());
        assert!(line.slope().is_nan());
        assert!((line.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn rect_from_corners_is_inclusive() {
        let rect = Rect::from_corners(5, 2, 1, 4);
        assert_eq!(rect, Rect { x: 1, y: 2, width: 5, height: 3 });
        assert!(rect.contains(5, 4));
        assert!(!rect.contains(6, 4));
        assert_eq!(rect.area(), 15);
    }
}
