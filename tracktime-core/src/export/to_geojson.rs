use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::realtime::TrainPosition;
use crate::{Error, ScheduleIndex};

/// Vehicle positions as point features with trip and route properties
pub fn positions_to_geojson(positions: &[TrainPosition]) -> Result<FeatureCollection, Error> {
    let features = positions
        .iter()
        .map(|position| {
            to_feature(json!({
                "type": "Feature",
                "geometry": Geometry::new((&position.geometry).into()),
                "properties": {
                    "trip_id": position.trip_id,
                    "route_id": position.route_id,
                    "distance": position.distance,
                    "progress": position.progress,
                }
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collection(features))
}

/// Every shape as a line string feature, ordered by shape id
pub fn shapes_to_geojson(index: &ScheduleIndex) -> Result<FeatureCollection, Error> {
    let mut shapes: Vec<_> = index.shapes().collect();
    shapes.sort_unstable_by(|a, b| a.shape_id.cmp(&b.shape_id));

    let features = shapes
        .into_iter()
        .map(|shape| {
            let line = shape.to_line_string();
            to_feature(json!({
                "type": "Feature",
                "geometry": Geometry::new((&line).into()),
                "properties": {
                    "shape_id": shape.shape_id,
                    "length": shape.total_length(),
                }
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collection(features))
}

/// Every located stop as a point feature, ordered by stop id
pub fn stops_to_geojson(index: &ScheduleIndex) -> Result<FeatureCollection, Error> {
    let mut stops: Vec<_> = index.stops().collect();
    stops.sort_unstable_by(|a, b| a.stop_id.cmp(&b.stop_id));

    let features = stops
        .into_iter()
        .map(|stop| {
            to_feature(json!({
                "type": "Feature",
                "geometry": Geometry::new((&stop.geometry).into()),
                "properties": {
                    "stop_id": stop.stop_id,
                    "stop_name": stop.name,
                }
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collection(features))
}

pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, Error> {
    serde_json::to_string(collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn to_feature(value: serde_json::Value) -> Result<Feature, Error> {
    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;

    #[test]
    fn positions_become_point_features() {
        let positions = vec![TrainPosition {
            trip_id: "T1".to_string(),
            route_id: "R1".to_string(),
            geometry: Point::new(-3.7, 40.4),
            distance: 150.0,
            progress: 0.5,
        }];

        let collection = positions_to_geojson(&positions).unwrap();
        assert_eq!(collection.features.len(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&to_geojson_string(&collection).unwrap()).unwrap();
        let feature = &json["features"][0];
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"][0], -3.7);
        assert_eq!(feature["geometry"]["coordinates"][1], 40.4);
        assert_eq!(feature["properties"]["trip_id"], "T1");
        assert_eq!(feature["properties"]["route_id"], "R1");
    }

    #[test]
    fn empty_index_exports_empty_collections() {
        let index = ScheduleIndex::default();
        assert!(shapes_to_geojson(&index).unwrap().features.is_empty());
        assert!(stops_to_geojson(&index).unwrap().features.is_empty());
    }
}
