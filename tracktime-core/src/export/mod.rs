//! Geometry export for map clients

pub mod to_geojson;

pub use to_geojson::{positions_to_geojson, shapes_to_geojson, stops_to_geojson, to_geojson_string};
