use crate::common::DomainResult;

use super::records::MapExtract;

/// Port trait for the map-data decoder.
/// Adapters provide PBF or JSON backed sources; a failure here is fatal to startup.
pub trait MapDataSource: Send + Sync {
    fn load_extract(&self) -> DomainResult<MapExtract>;

    /// Human-readable origin of the data, used in logs.
    fn describe(&self) -> String;
}
