pub mod proj4;

pub use proj4::*;

use crate::common::{DomainResult, GeoCoord, PlanarCoord};

/// Bidirectional mapping between geographic and local planar coordinates.
/// Implementations must be mutually inverse within numerical tolerance.
pub trait Projection: Send + Sync {
    fn to_planar(&self, geo: GeoCoord) -> DomainResult<PlanarCoord>;
    fn to_geo(&self, planar: PlanarCoord) -> DomainResult<GeoCoord>;
}
