use rand::Rng;

use super::footprint::Building;
use crate::common::PlanarCoord;

/// Point at fraction `t` along edge `r` of a ring (the edge from vertex `r`
/// to vertex `r + 1`, wrapping at the end). A zero-length edge yields its
/// single point.
///
/// Panics if `vertices` is empty; extracted footprints always have at least
/// two vertices.
pub fn exit_door_at(vertices: &[PlanarCoord], r: usize, t: f64) -> PlanarCoord {
    let n = vertices.len();
    let start = vertices[r % n];
    let end = vertices[(r + 1) % n];
    start.lerp(&end, t)
}

/// Uniform edge, then uniform position along it. Doors are not checked for
/// street adjacency, so a door may sit on a wall shared with a neighbour.
pub fn compute_exit_door<R: Rng + ?Sized>(vertices: &[PlanarCoord], rng: &mut R) -> Option<PlanarCoord> {
    if vertices.is_empty() {
        return None;
    }
    let r = rng.gen_range(0..vertices.len());
    let t: f64 = rng.gen();
    Some(exit_door_at(vertices, r, t))
}

/// Assign a door to every building that has none yet. Returns how many were assigned.
pub fn assign_exit_doors<R: Rng + ?Sized>(buildings: &mut [Building], rng: &mut R) -> usize {
    let mut assigned = 0;
    for building in buildings.iter_mut() {
        if building.exit_door().is_some() {
            continue;
        }
        if let Some(door) = compute_exit_door(building.vertices(), rng) {
            if building.assign_exit_door(door) {
                assigned += 1;
            }
        }
    }
    assigned
}
