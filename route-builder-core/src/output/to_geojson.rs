use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::algo::{ContiguousChain, Marker};
use crate::model::SelectionState;

/// Converts the resolved route to a `GeoJSON` `FeatureCollection`.
///
/// Streets appear in walking order, each tagged with the chain it belongs to.
pub fn route_to_geojson(chains: &[ContiguousChain<'_>]) -> Result<FeatureCollection, Error> {
    let mut features = Vec::new();

    for (chain_idx, chain) in chains.iter().enumerate() {
        for edge in chain.edges() {
            let geometry = Geometry::new(GeoJsonValue::from(edge.geometry()));

            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "street_edge_id": edge.id(),
                    "region_id": edge.region_id(),
                    "chain_index": chain_idx,
                    "reverse": edge.state() == SelectionState::ChosenReversed,
                    "state": edge.state().as_str(),
                }
            });
            features.push(
                Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?,
            );
        }
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

/// Converts planned markers to a `GeoJSON` `FeatureCollection` of points.
pub fn markers_to_geojson(markers: &[Marker]) -> Result<FeatureCollection, Error> {
    let features = markers
        .iter()
        .map(marker_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn marker_feature(marker: &Marker) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&Point::from(marker.position)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": marker.kind.as_str(),
            "label": marker.label,
            "color": marker.color,
            "bearing": marker.bearing,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::model::{RouteEdge, StreetEdge};
    use crate::{PROXIMITY_TOLERANCE_M, compute_contiguous_chains, plan_markers};

    fn edges() -> Vec<RouteEdge> {
        [
            (1, (0.000, 0.0), (0.001, 0.0)),
            (2, (0.001, 0.0), (0.002, 0.0)),
            (3, (0.010, 0.0), (0.011, 0.0)),
        ]
        .into_iter()
        .map(|(id, from, to)| {
            let geometry = line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)];
            RouteEdge::new(StreetEdge::new(id, 5, geometry).unwrap())
        })
        .collect()
    }

    #[test]
    fn route_features_carry_chain_index() {
        let edges = edges();
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        let collection = route_to_geojson(&chains).unwrap();

        let value = serde_json::to_value(&collection).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[1]["properties"]["street_edge_id"], 2);
        assert_eq!(features[1]["properties"]["chain_index"], 0);
        assert_eq!(features[2]["properties"]["chain_index"], 1);
        assert_eq!(features[2]["properties"]["region_id"], 5);
        assert_eq!(features[0]["geometry"]["type"], "LineString");
    }

    #[test]
    fn marker_features_are_points() {
        let edges = edges();
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        let markers = plan_markers(&chains, &["#80c32a".to_string()]);
        let collection = markers_to_geojson(&markers).unwrap();

        let value = serde_json::to_value(&collection).unwrap();
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["properties"]["kind"], "start");
        assert_eq!(features[1]["properties"]["color"], "#80c32a");
        assert_eq!(features[2]["properties"]["label"], 1);
        assert_eq!(features[3]["geometry"]["type"], "Point");
    }
}
