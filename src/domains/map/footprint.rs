use serde::{Deserialize, Serialize};

use super::records::{MapWay, NodeLookup, WayId};
use crate::common::{MalformedBuildingWay, PlanarCoord};
use crate::domains::logger::DynLogger;
use crate::domains::projection::Projection;

/// A closed building ring in planar coordinates. The closing vertex is not
/// repeated. Only the exit door may change after construction, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    way_id: WayId,
    vertices: Vec<PlanarCoord>,
    exit_door: Option<PlanarCoord>,
}

impl Building {
    /// Build a footprint directly from an open ring of planar vertices.
    /// Returns None for rings with fewer than two vertices.
    pub fn from_vertices(way_id: WayId, vertices: Vec<PlanarCoord>) -> Option<Self> {
        if vertices.len() < 2 {
            return None;
        }
        Some(Self { way_id, vertices, exit_door: None })
    }

    pub fn way_id(&self) -> WayId {
        self.way_id
    }

    pub fn vertices(&self) -> &[PlanarCoord] {
        &self.vertices
    }

    pub fn exit_door(&self) -> Option<PlanarCoord> {
        self.exit_door
    }

    /// Returns false if a door was already assigned; the existing door is kept.
    pub fn assign_exit_door(&mut self, door: PlanarCoord) -> bool {
        if self.exit_door.is_some() {
            return false;
        }
        self.exit_door = Some(door);
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct FootprintExtraction {
    pub buildings: Vec<Building>,
    pub rejected: Vec<MalformedBuildingWay>,
    pub ways_seen: usize,
    pub building_ways: usize,
}

/// Turn every way carrying `building_tag` into a footprint. Ways that are not
/// closed rings, or that reference unknown or unprojectable nodes, are
/// reported and skipped. Output order follows input way order.
pub fn extract_footprints(
    ways: &[MapWay],
    nodes: &NodeLookup,
    projection: &dyn Projection,
    building_tag: &str,
    logger: &DynLogger,
) -> FootprintExtraction {
    let mut extraction = FootprintExtraction {
        ways_seen: ways.len(),
        ..FootprintExtraction::default()
    };

    for way in ways.iter().filter(|w| w.has_tag(building_tag)) {
        extraction.building_ways += 1;
        match footprint_from_way(way, nodes, projection) {
            Ok(building) => extraction.buildings.push(building),
            Err(report) => {
                logger.warn(&format!("{} (refs {:?})", report, report.node_refs));
                extraction.rejected.push(report);
            }
        }
    }

    extraction
}

pub fn footprint_from_way(
    way: &MapWay,
    nodes: &NodeLookup,
    projection: &dyn Projection,
) -> Result<Building, MalformedBuildingWay> {
    let reject = |reason: String| MalformedBuildingWay {
        way_id: way.id,
        node_refs: way.node_refs.clone(),
        reason,
    };

    let refs = &way.node_refs;
    if refs.len() <= 1 {
        return Err(reject(format!("ring has {} node reference(s)", refs.len())));
    }
    if refs.first() != refs.last() {
        return Err(reject("ring is not closed".to_string()));
    }

    let ring = &refs[..refs.len() - 1];
    if ring.iter().all(|r| *r == ring[0]) {
        return Err(reject("ring has fewer than two distinct vertices".to_string()));
    }

    let mut vertices = Vec::with_capacity(ring.len());
    for node_ref in ring {
        let geo = nodes
            .get(*node_ref)
            .ok_or_else(|| reject(format!("node {} is not in the extract", node_ref)))?;
        let planar = projection
            .to_planar(geo)
            .map_err(|e| reject(format!("node {}: {}", node_ref, e)))?;
        vertices.push(planar);
    }

    Ok(Building {
        way_id: way.id,
        vertices,
        exit_door: None,
    })
}
