use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::common::GeoCoord;

pub type NodeId = i64;
pub type WayId = i64;

/// A decoded way: an ordered list of node references plus its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapWay {
    pub id: WayId,
    pub node_refs: Vec<NodeId>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl MapWay {
    pub fn new(id: WayId, node_refs: Vec<NodeId>) -> Self {
        Self { id, node_refs, tags: BTreeMap::new() }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

/// Node id to geographic coordinate. Only nodes that passed validation at
/// the decode boundary are present.
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    nodes: HashMap<NodeId, GeoCoord>,
}

impl NodeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and stores nothing) when the coordinate is out of range.
    pub fn insert(&mut self, id: NodeId, coord: GeoCoord) -> bool {
        if !coord.is_valid() {
            return false;
        }
        self.nodes.insert(id, coord);
        true
    }

    pub fn get(&self, id: NodeId) -> Option<GeoCoord> {
        self.nodes.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<(NodeId, GeoCoord)> for NodeLookup {
    fn from_iter<I: IntoIterator<Item = (NodeId, GeoCoord)>>(iter: I) -> Self {
        let mut lookup = NodeLookup::new();
        for (id, coord) in iter {
            lookup.insert(id, coord);
        }
        lookup
    }
}

/// Everything the footprint extractor needs from a decoded map extract.
#[derive(Debug, Clone, Default)]
pub struct MapExtract {
    pub nodes: NodeLookup,
    pub ways: Vec<MapWay>,
    pub relation_count: usize,
    /// Nodes dropped at the decode boundary for out-of-range coordinates.
    pub rejected_nodes: usize,
}
