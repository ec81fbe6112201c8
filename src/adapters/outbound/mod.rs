pub mod console_logger;
pub mod file_logger;
pub mod geojson_export;
pub mod multi_logger;
pub mod noop_logger;
pub mod osm_json;
pub mod osm_pbf;

pub use console_logger::*;
pub use file_logger::*;
pub use geojson_export::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use osm_json::*;
pub use osm_pbf::*;

use std::path::Path;

use crate::domains::map::MapDataSource;

/// Pick a decoder by file extension: `.json` is OSM JSON, anything else is PBF.
pub fn map_source_for(path: &Path) -> Box<dyn MapDataSource> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Box::new(OsmJsonMapSource::new(path))
    } else {
        Box::new(PbfMapSource::new(path))
    }
}
