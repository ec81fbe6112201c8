use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Planar coordinate in meters, in the local projected frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarCoord {
    pub x: f64,
    pub y: f64,
}

impl PlanarCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PlanarCoord) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Offset by `len` along `angle`. The y term is subtracted so headings
    /// follow the screen-style orientation used by the step engine.
    pub fn moved_by(&self, angle: f64, len: f64) -> PlanarCoord {
        PlanarCoord {
            x: self.x + len * angle.cos(),
            y: self.y - len * angle.sin(),
        }
    }

    /// Componentwise linear interpolation, `t` in [0, 1].
    pub fn lerp(&self, other: &PlanarCoord, t: f64) -> PlanarCoord {
        PlanarCoord {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}
