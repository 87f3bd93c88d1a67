use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangle in document point space (1/72 inch), origin at the top-left
/// corner of the page with y growing downwards.
///
/// Always normalized: `x1 <= x2` and `y1 <= y2`, whatever order the corners
/// were given in. A zero-width or zero-height region is valid and clips
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRegion")]
pub struct Region {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

#[derive(Deserialize)]
struct RawRegion {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl From<RawRegion> for Region {
    fn from(r: RawRegion) -> Self {
        Region::new(r.x1, r.y1, r.x2, r.y2)
    }
}

impl Region {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Region {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// The region offered before the user picks one: (100, 100) to (300, 150).
    pub fn default_suggestion() -> Self {
        Region::new(100.0, 100.0, 300.0, 150.0)
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Inclusive containment test. Degenerate regions contain nothing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_degenerate() && x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}) - ({:.1}, {:.1})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}
