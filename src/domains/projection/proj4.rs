use anyhow::{anyhow, bail, Result};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Projection;
use crate::common::{DomainError, DomainResult, GeoCoord, PlanarCoord};

/// UTM zone 19 south on WGS84, the zone covering Valparaíso.
pub const DEFAULT_PROJ_DEFINITION: &str = "+proj=utm +zone=19 +south +ellps=WGS84 +datum=WGS84 +units=m +no_defs";

const GEOGRAPHIC_DEFINITION: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// Geographic area, in degrees, on which a projection is accepted.
/// Coordinates outside it are rejected in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl ProjectionBounds {
    pub fn contains(&self, geo: GeoCoord) -> bool {
        (self.min_lat..=self.max_lat).contains(&geo.lat) && (self.min_lon..=self.max_lon).contains(&geo.lon)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            bail!("projection bounds must be finite: {:?}", self);
        }
        if !(-90.0 <= self.min_lat && self.min_lat < self.max_lat && self.max_lat <= 90.0) {
            bail!("projection latitude bounds {}..{} are not a range within -90..90", self.min_lat, self.max_lat);
        }
        if !(-180.0 <= self.min_lon && self.min_lon < self.max_lon && self.max_lon <= 180.0) {
            bail!("projection longitude bounds {}..{} are not a range within -180..180", self.min_lon, self.max_lon);
        }
        Ok(())
    }
}

impl Default for ProjectionBounds {
    fn default() -> Self {
        // UTM latitude band, and 9° either side of the zone 19 central meridian (69°W)
        Self {
            min_lat: -80.0,
            max_lat: 84.0,
            min_lon: -78.0,
            max_lon: -60.0,
        }
    }
}

/// A projection described by a PROJ.4 definition string, such as
/// `+proj=utm +zone=19 +south +datum=WGS84 +units=m`.
pub struct Proj4Projection {
    definition: String,
    geographic: Proj,
    projected: Proj,
    bounds: ProjectionBounds,
}

impl Proj4Projection {
    /// Fails when the definition cannot be parsed or the bounds are not a
    /// usable area. Both are configuration mistakes, not bad input.
    pub fn new(definition: &str, bounds: ProjectionBounds) -> Result<Self> {
        bounds.validate()?;
        let projected = Proj::from_proj_string(definition)
            .map_err(|e| anyhow!("invalid projection definition {:?}: {}", definition, e))?;
        let geographic = Proj::from_proj_string(GEOGRAPHIC_DEFINITION)
            .map_err(|e| anyhow!("invalid geographic definition: {}", e))?;
        Ok(Self {
            definition: definition.to_string(),
            geographic,
            projected,
            bounds,
        })
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn bounds(&self) -> ProjectionBounds {
        self.bounds
    }
}

impl fmt::Debug for Proj4Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proj4Projection")
            .field("definition", &self.definition)
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl Projection for Proj4Projection {
    fn to_planar(&self, geo: GeoCoord) -> DomainResult<PlanarCoord> {
        if !geo.is_valid() {
            return Err(DomainError::invalid_coordinate(format!(
                "({}, {}) is not a valid latitude/longitude",
                geo.lat, geo.lon
            )));
        }
        if !self.bounds.contains(geo) {
            return Err(DomainError::invalid_coordinate(format!(
                "({}, {}) is outside the projected area",
                geo.lat, geo.lon
            )));
        }

        // longlat works in radians, lon first
        let mut point = (geo.lon.to_radians(), geo.lat.to_radians(), 0.0);
        transform(&self.geographic, &self.projected, &mut point).map_err(|e| {
            DomainError::invalid_coordinate(format!("cannot project ({}, {}): {}", geo.lat, geo.lon, e))
        })?;

        if !(point.0.is_finite() && point.1.is_finite()) {
            return Err(DomainError::invalid_coordinate(format!(
                "projection of ({}, {}) is not finite",
                geo.lat, geo.lon
            )));
        }
        Ok(PlanarCoord::new(point.0, point.1))
    }

    fn to_geo(&self, planar: PlanarCoord) -> DomainResult<GeoCoord> {
        if !(planar.x.is_finite() && planar.y.is_finite()) {
            return Err(DomainError::invalid_coordinate(format!(
                "planar ({}, {}) is not finite",
                planar.x, planar.y
            )));
        }

        let mut point = (planar.x, planar.y, 0.0);
        transform(&self.projected, &self.geographic, &mut point).map_err(|e| {
            DomainError::invalid_coordinate(format!("cannot unproject ({}, {}): {}", planar.x, planar.y, e))
        })?;

        let geo = GeoCoord::new(point.1.to_degrees(), point.0.to_degrees());
        if !geo.is_valid() || !self.bounds.contains(geo) {
            return Err(DomainError::invalid_coordinate(format!(
                "planar ({}, {}) maps outside the projected area",
                planar.x, planar.y
            )));
        }
        Ok(geo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_31(south: bool) -> Proj4Projection {
        let definition = if south {
            "+proj=utm +zone=31 +south +datum=WGS84 +units=m +no_defs"
        } else {
            "+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs"
        };
        let bounds = ProjectionBounds {
            min_lat: -80.0,
            max_lat: 84.0,
            min_lon: -6.0,
            max_lon: 12.0,
        };
        Proj4Projection::new(definition, bounds).unwrap()
    }

    #[test]
    fn equator_on_central_meridian_maps_to_false_origin() {
        let p = zone_31(false).to_planar(GeoCoord::new(0.0, 3.0)).unwrap();
        assert!((p.x - 500_000.0).abs() < 1e-3, "x = {}", p.x);
        assert!(p.y.abs() < 1e-3, "y = {}", p.y);

        let p = zone_31(true).to_planar(GeoCoord::new(0.0, 3.0)).unwrap();
        assert!((p.y - 10_000_000.0).abs() < 1e-3, "y = {}", p.y);
    }

    #[test]
    fn plaza_victoria_is_west_of_false_easting() {
        let projection = Proj4Projection::new(DEFAULT_PROJ_DEFINITION, ProjectionBounds::default()).unwrap();
        let p = projection.to_planar(GeoCoord::new(-33.0446605, -71.6235577)).unwrap();
        // ~2.6° west of the central meridian at 33°S is roughly 245 km.
        assert!(p.x > 240_000.0 && p.x < 270_000.0, "x = {}", p.x);
        assert!(p.y > 6_330_000.0 && p.y < 6_360_000.0, "y = {}", p.y);
    }

    #[test]
    fn rejects_unknown_projection_and_inverted_bounds() {
        assert!(Proj4Projection::new("+proj=no_such_projection", ProjectionBounds::default()).is_err());

        let inverted = ProjectionBounds {
            min_lon: -60.0,
            max_lon: -78.0,
            ..ProjectionBounds::default()
        };
        assert!(Proj4Projection::new(DEFAULT_PROJ_DEFINITION, inverted).is_err());
    }

    #[test]
    fn default_bounds_are_valid() {
        assert!(ProjectionBounds::default().validate().is_ok());
        assert!(ProjectionBounds::default().contains(GeoCoord::new(-33.04, -71.62)));
        assert!(!ProjectionBounds::default().contains(GeoCoord::new(48.85, 2.35)));
    }
}
