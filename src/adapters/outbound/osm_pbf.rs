use osmpbf::{Element, ElementReader};
use std::path::PathBuf;

use crate::common::{DomainError, DomainResult, GeoCoord};
use crate::domains::map::{MapDataSource, MapExtract, MapWay};

/// Decodes an OpenStreetMap `.osm.pbf` extract.
pub struct PbfMapSource {
    path: PathBuf,
}

impl PbfMapSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MapDataSource for PbfMapSource {
    fn load_extract(&self) -> DomainResult<MapExtract> {
        let reader = ElementReader::from_path(&self.path)
            .map_err(|e| DomainError::DecodeFailure(format!("{}: {}", self.path.display(), e)))?;

        let mut extract = MapExtract::default();
        reader
            .for_each(|element| match element {
                Element::Node(n) => {
                    if !extract.nodes.insert(n.id(), GeoCoord::new(n.lat(), n.lon())) {
                        extract.rejected_nodes += 1;
                    }
                }
                Element::DenseNode(dn) => {
                    if !extract.nodes.insert(dn.id(), GeoCoord::new(dn.lat(), dn.lon())) {
                        extract.rejected_nodes += 1;
                    }
                }
                Element::Way(w) => {
                    extract.ways.push(MapWay {
                        id: w.id(),
                        node_refs: w.refs().collect(),
                        tags: w.tags().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                    });
                }
                Element::Relation(_) => {
                    extract.relation_count += 1;
                }
            })
            .map_err(|e| DomainError::DecodeFailure(format!("{}: {}", self.path.display(), e)))?;

        Ok(extract)
    }

    fn describe(&self) -> String {
        format!("osm.pbf {}", self.path.display())
    }
}
