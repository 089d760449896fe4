//! Distance-annotated route geometries

use geo::{LineString, Point};
use itertools::Itertools;

use super::geodesy::haversine_distance;
use crate::Distance;

#[derive(Debug, Clone, PartialEq)]
pub struct ShapePoint {
    /// `x` is longitude, `y` is latitude
    pub geometry: Point<f64>,
    pub sequence: u32,
    /// Cumulative distance from the first point of the shape
    pub distance: Distance,
}

/// One shape polyline, ordered by sequence with non-decreasing distances
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub shape_id: String,
    points: Vec<ShapePoint>,
}

impl ShapeGeometry {
    /// Orders `points` by sequence number and fills in cumulative distances.
    ///
    /// If every point reports a distance of exactly 0 the feed is assumed to
    /// carry none, and distances are accumulated from haversine lengths.
    /// Returns `None` when supplied distances decrease along the sequence.
    pub fn new(shape_id: impl Into<String>, mut points: Vec<ShapePoint>) -> Option<Self> {
        points.sort_by_key(|p| p.sequence);

        if points.iter().all(|p| p.distance == 0.0) {
            accumulate_haversine(&mut points);
        } else if points
            .iter()
            .tuple_windows()
            .any(|(prev, next)| next.distance < prev.distance)
        {
            return None;
        }

        Some(Self {
            shape_id: shape_id.into(),
            points,
        })
    }

    pub fn points(&self) -> &[ShapePoint] {
        &self.points
    }

    /// Cumulative distance at the last point
    pub fn total_length(&self) -> Distance {
        self.points.last().map_or(0.0, |p| p.distance)
    }

    /// Point located `distance` along the shape.
    ///
    /// The segment is the first one whose end reaches `distance`; the position
    /// is interpolated linearly in lon/lat space. `None` if the shape has
    /// fewer than two points or `distance` lies past its end.
    pub fn position_at_distance(&self, distance: Distance) -> Option<Point<f64>> {
        let (prev, next) = self
            .points
            .iter()
            .tuple_windows()
            .find(|(_, next)| next.distance >= distance)?;

        let segment = next.distance - prev.distance;
        let fraction = if segment > 0.0 {
            ((distance - prev.distance) / segment).max(0.0)
        } else {
            0.0
        };

        Some(Point::new(
            prev.geometry.x() + (next.geometry.x() - prev.geometry.x()) * fraction,
            prev.geometry.y() + (next.geometry.y() - prev.geometry.y()) * fraction,
        ))
    }

    /// Vertex indices for locations visited in order along the shape.
    ///
    /// Each location may land on any vertex where it is locally closest, or
    /// on the last vertex. Of the non-decreasing assignments the one with the
    /// smallest summed distance wins, earliest vertices first on ties, so the
    /// first stop of a loop stays at its start. `None` if either side is empty.
    pub(crate) fn snap_in_order(&self, locations: &[Point<f64>]) -> Option<Vec<usize>> {
        let last = self.points.len().checked_sub(1)?;
        let candidates: Vec<Vec<(usize, f64)>> = locations
            .iter()
            .map(|location| self.snap_candidates(*location, last))
            .collect();

        // (summed distance, candidate index in the previous row)
        let mut costs: Vec<Vec<(f64, usize)>> = Vec::with_capacity(candidates.len());
        for (row, current) in candidates.iter().enumerate() {
            let scored = current
                .iter()
                .map(|&(vertex, distance)| {
                    let Some(previous) = row.checked_sub(1) else {
                        return (distance, 0);
                    };
                    candidates[previous]
                        .iter()
                        .zip(&costs[previous])
                        .enumerate()
                        .filter(|(_, ((prev_vertex, _), _))| *prev_vertex <= vertex)
                        .map(|(k, (_, (cost, _)))| (cost + distance, k))
                        .min_by(|a, b| a.0.total_cmp(&b.0))
                        .unwrap_or((f64::INFINITY, 0))
                })
                .collect();
            costs.push(scored);
        }

        let (mut k, _) = costs
            .last()?
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.0.total_cmp(&b.1.0))?;
        let mut vertices = vec![0; candidates.len()];
        for row in (0..candidates.len()).rev() {
            vertices[row] = candidates[row][k].0;
            k = costs[row][k].1;
        }
        Some(vertices)
    }

    /// Local distance minima for `location`, nearest few kept, plus `last`
    fn snap_candidates(&self, location: Point<f64>, last: usize) -> Vec<(usize, f64)> {
        const MAX_CANDIDATES: usize = 8;

        let distances: Vec<f64> = self
            .points
            .iter()
            .map(|p| haversine_distance(p.geometry, location))
            .collect();
        let mut candidates: Vec<(usize, f64)> = distances
            .iter()
            .copied()
            .enumerate()
            .filter(|&(idx, distance)| {
                let before = idx.checked_sub(1).map_or(f64::INFINITY, |i| distances[i]);
                let after = distances.get(idx + 1).copied().unwrap_or(f64::INFINITY);
                distance <= before && distance <= after
            })
            .collect();

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates.truncate(MAX_CANDIDATES);
        if candidates.iter().all(|&(idx, _)| idx != last) {
            candidates.push((last, distances[last]));
        }
        candidates.sort_by_key(|&(idx, _)| idx);
        candidates
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().map(|p| p.geometry.0).collect()
    }
}

fn accumulate_haversine(points: &mut [ShapePoint]) {
    let mut cumulative = 0.0;
    let mut previous: Option<Point<f64>> = None;
    for point in points.iter_mut() {
        if let Some(prev) = previous {
            cumulative += haversine_distance(prev, point.geometry);
        }
        point.distance = cumulative;
        previous = Some(point.geometry);
    }
}
