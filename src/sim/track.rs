//! Track model: per-map segment tables, obstacles and the overview polyline
//!
//! Tracks are rebuilt wholesale from a fixed table on every map load and are
//! never mutated afterwards. Every lookup restarts from the first segment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{OVERVIEW_HEADING_SCALE, OVERVIEW_STEP};

/// One of the three predefined maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MapId {
    #[default]
    One,
    Two,
    Three,
}

impl MapId {
    pub const ALL: [MapId; 3] = [MapId::One, MapId::Two, MapId::Three];

    /// 1-based number shown in menus
    pub fn number(self) -> u8 {
        match self {
            MapId::One => 1,
            MapId::Two => 2,
            MapId::Three => 3,
        }
    }

    /// Zero-based slot, for per-map tables
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            MapId::One => "No Obstacles",
            MapId::Two => "Obstacles",
            MapId::Three => "More Obstacles",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MapId::One => "General rural roads",
            MapId::Two => "City roads",
            MapId::Three => "Cyber road",
        }
    }

    /// Previous map in menu order (saturates at the first)
    pub fn prev(self) -> Self {
        match self {
            MapId::One | MapId::Two => MapId::One,
            MapId::Three => MapId::Two,
        }
    }

    /// Next map in menu order (saturates at the last)
    pub fn next(self) -> Self {
        match self {
            MapId::One => MapId::Two,
            MapId::Two | MapId::Three => MapId::Three,
        }
    }
}

impl TryFrom<u8> for MapId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MapId::One),
            2 => Ok(MapId::Two),
            3 => Ok(MapId::Three),
            other => Err(other),
        }
    }
}

/// A rectangular obstacle placed inside a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Distance from the start of the owning segment
    pub seg_offset: f32,
    /// Lateral centre in road coordinates (-1..1)
    pub lateral_offset: f32,
    /// Lateral extent in road coordinates
    pub width: f32,
}

impl Obstacle {
    pub const fn new(seg_offset: f32, lateral_offset: f32, width: f32) -> Self {
        Self {
            seg_offset,
            lateral_offset,
            width,
        }
    }

    /// Lateral interval `[left, right]`
    #[inline]
    pub fn lateral_span(&self) -> (f32, f32) {
        let half = self.width / 2.0;
        (self.lateral_offset - half, self.lateral_offset + half)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub curvature: f32,
    pub length: f32,
    pub obstacles: Vec<Obstacle>,
}

impl TrackSegment {
    pub fn new(curvature: f32, length: f32) -> Self {
        Self {
            curvature,
            length,
            obstacles: Vec::new(),
        }
    }
}

/// Result of the segment cursor: which segment a distance falls in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCursor {
    pub index: usize,
    /// Distance from the start of that segment
    pub offset: f32,
}

/// The nearest obstacle ahead of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleWarning {
    /// Track distance still to cover before reaching it
    pub distance: f32,
    pub lateral_offset: f32,
}

/// An immutable track for one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub map: MapId,
    pub segments: Vec<TrackSegment>,
    pub total_length: f32,
    /// Display-only polyline, one point per unit of distance
    pub overview: Vec<Vec2>,
}

// (curvature, length) tables
const MAP_ONE: &[(f32, f32)] = &[
    (0.0, 80.0),
    (0.6, 250.0),
    (-0.6, 250.0),
    (0.0, 100.0),
    (0.8, 200.0),
    (0.0, 120.0),
];

const MAP_TWO: &[(f32, f32)] = &[
    (0.0, 100.0),
    (0.7, 150.0),
    (-0.5, 150.0),
    (0.9, 200.0),
    (0.0, 100.0),
    (-0.8, 180.0),
    (0.6, 200.0),
    (0.0, 150.0),
    (1.0, 120.0),
    (0.0, 100.0),
];

const MAP_TWO_OBSTACLES: &[(usize, Obstacle)] = &[
    (4, Obstacle::new(20.0, 0.4, 0.3)),
    (4, Obstacle::new(70.0, -0.5, 0.4)),
    (5, Obstacle::new(80.0, 0.6, 0.3)),
];

const MAP_THREE: &[(f32, f32)] = &[
    (0.0, 100.0),
    (0.8, 200.0),
    (-0.6, 150.0),
    (0.6, 180.0),
    (-0.8, 200.0),
    (0.5, 150.0),
    (-0.5, 150.0),
    (0.8, 200.0),
    (-0.8, 200.0),
    (0.0, 100.0),
];

const MAP_THREE_OBSTACLES: &[(usize, Obstacle)] = &[
    (1, Obstacle::new(50.0, -0.6, 0.3)),
    (1, Obstacle::new(150.0, 0.6, 0.3)),
    (3, Obstacle::new(40.0, 0.0, 0.5)),
    (5, Obstacle::new(100.0, -0.4, 0.4)),
    (7, Obstacle::new(70.0, 0.3, 0.2)),
];

/// Build the track for a map from its fixed table
pub fn build_track(map: MapId) -> Track {
    let (table, placed): (&[(f32, f32)], &[(usize, Obstacle)]) = match map {
        MapId::One => (MAP_ONE, &[]),
        MapId::Two => (MAP_TWO, MAP_TWO_OBSTACLES),
        MapId::Three => (MAP_THREE, MAP_THREE_OBSTACLES),
    };

    let mut segments: Vec<TrackSegment> = table
        .iter()
        .map(|&(curvature, length)| TrackSegment::new(curvature, length))
        .collect();
    for &(segment, obstacle) in placed {
        segments[segment].obstacles.push(obstacle);
    }

    let total_length = segments.iter().map(|s| s.length).sum();
    let overview = derive_overview(&segments);

    Track {
        map,
        segments,
        total_length,
        overview,
    }
}

/// Integrate heading from curvature to get a 2-D outline of the track
pub fn derive_overview(segments: &[TrackSegment]) -> Vec<Vec2> {
    let mut points = Vec::new();
    let mut pos = Vec2::ZERO;
    let mut heading = 0.0_f32;

    for seg in segments {
        let mut d = 0.0;
        while d < seg.length {
            heading += seg.curvature * OVERVIEW_STEP * OVERVIEW_HEADING_SCALE;
            pos += Vec2::new(heading.sin(), heading.cos()) * OVERVIEW_STEP;
            points.push(pos);
            d += OVERVIEW_STEP;
        }
    }

    points
}

impl Track {
    /// Find the segment containing `distance`; `None` at or past the end
    pub fn locate(&self, distance: f32) -> Option<SegmentCursor> {
        let mut offset = distance;
        for (index, seg) in self.segments.iter().enumerate() {
            if offset < seg.length {
                return Some(SegmentCursor { index, offset });
            }
            offset -= seg.length;
        }
        None
    }

    /// Nominal curvature at `distance` (straight past the end)
    pub fn curvature_at(&self, distance: f32) -> f32 {
        self.locate(distance)
            .map(|cursor| self.segments[cursor.index].curvature)
            .unwrap_or(0.0)
    }

    /// All obstacles in track order as `(global distance, segment index, obstacle)`
    pub fn obstacles(&self) -> impl Iterator<Item = (f32, usize, &Obstacle)> + '_ {
        let mut start = 0.0;
        self.segments.iter().enumerate().flat_map(move |(index, seg)| {
            let seg_start = start;
            start += seg.length;
            seg.obstacles
                .iter()
                .map(move |obs| (seg_start + obs.seg_offset, index, obs))
        })
    }

    /// First obstacle strictly ahead of `distance` and no further than `range`
    pub fn upcoming_obstacle(&self, distance: f32, range: f32) -> Option<ObstacleWarning> {
        self.obstacles()
            .filter(|&(at, _, _)| at > distance)
            .find(|&(at, _, _)| at - distance <= range)
            .map(|(at, _, obs)| ObstacleWarning {
                distance: at - distance,
                lateral_offset: obs.lateral_offset,
            })
    }

    /// Overview point matching `distance` by proportion of the track
    pub fn overview_index(&self, distance: f32) -> Option<usize> {
        if self.overview.is_empty() || distance < 0.0 || distance > self.total_length {
            return None;
        }
        let total = if self.total_length > 0.0 {
            self.total_length
        } else {
            1.0
        };
        let idx = ((distance / total) * self.overview.len() as f32) as usize;
        Some(idx.min(self.overview.len() - 1))
    }

    pub fn obstacle_count(&self) -> usize {
        self.segments.iter().map(|s| s.obstacles.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        for map in MapId::ALL {
            let a = build_track(map);
            let b = build_track(map);
            assert_eq!(a.segments, b.segments);
            assert_eq!(a.overview.len(), b.overview.len());
            for (p, q) in a.overview.iter().zip(&b.overview) {
                assert_eq!(p.x.to_bits(), q.x.to_bits());
                assert_eq!(p.y.to_bits(), q.y.to_bits());
            }
        }
    }

    #[test]
    fn test_total_lengths() {
        assert_eq!(build_track(MapId::One).total_length, 1000.0);
        assert_eq!(build_track(MapId::Two).total_length, 1450.0);
        assert_eq!(build_track(MapId::Three).total_length, 1630.0);
    }

    #[test]
    fn test_obstacle_counts() {
        assert_eq!(build_track(MapId::One).obstacle_count(), 0);
        assert_eq!(build_track(MapId::Two).obstacle_count(), 3);
        assert_eq!(build_track(MapId::Three).obstacle_count(), 5);
    }

    #[test]
    fn test_overview_one_point_per_unit() {
        let track = build_track(MapId::One);
        assert_eq!(track.overview.len(), 1000);
        // First segment is straight: points march up the y axis
        assert!(track.overview[0].x.abs() < 1e-6);
        assert!((track.overview[0].y - 1.0).abs() < 1e-6);
        assert!((track.overview[79].y - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_overview_curves_toward_positive_x() {
        let segments = vec![TrackSegment::new(1.0, 10.0)];
        let points = derive_overview(&segments);
        assert_eq!(points.len(), 10);
        assert!(points[9].x > 0.0);
        // heading after 10 steps = 0.1 rad
        let dir = points[9] - points[8];
        assert!((dir.x - 0.1_f32.sin()).abs() < 1e-5);
    }

    #[test]
    fn test_locate_segments() {
        let track = build_track(MapId::One);
        let c = track.locate(0.0).unwrap();
        assert_eq!((c.index, c.offset), (0, 0.0));
        let c = track.locate(80.0).unwrap();
        assert_eq!((c.index, c.offset), (1, 0.0));
        let c = track.locate(100.0).unwrap();
        assert_eq!(c.index, 1);
        assert!((c.offset - 20.0).abs() < 1e-4);
        assert!(track.locate(1000.0).is_none());
        assert_eq!(track.curvature_at(1000.0), 0.0);
        assert_eq!(track.curvature_at(90.0), 0.6);
    }

    #[test]
    fn test_obstacle_global_distances() {
        let track = build_track(MapId::Two);
        let globals: Vec<f32> = track.obstacles().map(|(d, _, _)| d).collect();
        // segment 4 starts at 100+150+150+200 = 600, segment 5 at 700
        assert_eq!(globals, vec![620.0, 670.0, 780.0]);
    }

    #[test]
    fn test_upcoming_obstacle_window() {
        let track = build_track(MapId::Two);
        assert!(track.upcoming_obstacle(500.0, 50.0).is_none());

        let warn = track.upcoming_obstacle(580.0, 50.0).unwrap();
        assert!((warn.distance - 40.0).abs() < 1e-4);
        assert_eq!(warn.lateral_offset, 0.4);

        // Exactly at the obstacle: it is no longer ahead
        let warn = track.upcoming_obstacle(620.0, 50.0).unwrap();
        assert!((warn.distance - 50.0).abs() < 1e-4);
        assert_eq!(warn.lateral_offset, -0.5);
    }

    #[test]
    fn test_overview_index_proportional() {
        let track = build_track(MapId::One);
        assert_eq!(track.overview_index(0.0), Some(0));
        assert_eq!(track.overview_index(500.0), Some(500));
        assert_eq!(track.overview_index(1000.0), Some(999));
        assert_eq!(track.overview_index(1000.5), None);
    }

    #[test]
    fn test_map_id_conversion() {
        assert_eq!(MapId::try_from(2), Ok(MapId::Two));
        assert_eq!(MapId::try_from(4), Err(4));
        assert_eq!(MapId::One.prev(), MapId::One);
        assert_eq!(MapId::Three.next(), MapId::Three);
        assert_eq!(MapId::Two.index(), 1);
    }
}
