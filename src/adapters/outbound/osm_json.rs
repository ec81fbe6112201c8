use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::common::{DomainError, DomainResult, GeoCoord};
use crate::domains::map::{MapDataSource, MapExtract, MapWay, NodeId, WayId};

/// OSM JSON as produced by Overpass (`[out:json]`): a flat `elements` array.
#[derive(Debug, Deserialize)]
struct OsmJsonDocument {
    elements: Vec<OsmJsonElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OsmJsonElement {
    Node {
        id: NodeId,
        lat: f64,
        lon: f64,
    },
    Way {
        id: WayId,
        #[serde(default)]
        nodes: Vec<NodeId>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {},
}

/// Decodes OSM JSON from a file on disk.
pub struct OsmJsonMapSource {
    path: PathBuf,
}

impl OsmJsonMapSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MapDataSource for OsmJsonMapSource {
    fn load_extract(&self) -> DomainResult<MapExtract> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| DomainError::DecodeFailure(format!("{}: {}", self.path.display(), e)))?;
        parse_osm_json(&content)
    }

    fn describe(&self) -> String {
        format!("osm json {}", self.path.display())
    }
}

pub fn parse_osm_json(content: &str) -> DomainResult<MapExtract> {
    let document: OsmJsonDocument = serde_json::from_str(content)
        .map_err(|e| DomainError::DecodeFailure(format!("invalid OSM JSON: {}", e)))?;

    let mut extract = MapExtract::default();
    for element in document.elements {
        match element {
            OsmJsonElement::Node { id, lat, lon } => {
                if !extract.nodes.insert(id, GeoCoord::new(lat, lon)) {
                    extract.rejected_nodes += 1;
                }
            }
            OsmJsonElement::Way { id, nodes, tags } => extract.ways.push(MapWay {
                id,
                node_refs: nodes,
                tags,
            }),
            OsmJsonElement::Relation {} => extract.relation_count += 1,
        }
    }
    Ok(extract)
}
