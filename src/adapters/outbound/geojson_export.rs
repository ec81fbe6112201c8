use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::common::{DomainResult, GeoCoord, PlanarCoord};
use crate::domains::map::Building;
use crate::domains::projection::Projection;

fn position(geo: GeoCoord) -> Vec<f64> {
    vec![geo.lon, geo.lat]
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn unproject(projection: &dyn Projection, planar: PlanarCoord) -> DomainResult<Vec<f64>> {
    projection.to_geo(planar).map(position)
}

/// Footprints as closed polygons plus one point per exit door, in lon/lat order.
pub fn buildings_to_geojson(buildings: &[Building], projection: &dyn Projection) -> DomainResult<FeatureCollection> {
    let mut features = Vec::with_capacity(buildings.len() * 2);

    for building in buildings {
        let mut ring = building
            .vertices()
            .iter()
            .map(|v| unproject(projection, *v))
            .collect::<DomainResult<Vec<_>>>()?;
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }

        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("building"));
        properties.insert("way_id".to_string(), json!(building.way_id()));
        features.push(feature(Value::Polygon(vec![ring]), properties));

        if let Some(door) = building.exit_door() {
            let mut properties = JsonObject::new();
            properties.insert("kind".to_string(), json!("exit_door"));
            properties.insert("way_id".to_string(), json!(building.way_id()));
            features.push(feature(Value::Point(unproject(projection, door)?), properties));
        }
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
