//! Minimap projection
//!
//! Fits an overview polyline into a `width x height` cell box and places the
//! player and obstacles on it by proportional distance. Cells are relative to
//! the box origin; the outermost ring of cells is the frame.

use glam::{IVec2, Vec2};

use crate::sim::Track;

/// Cells kept clear between the frame and the outline
const MARGIN: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    width: i32,
    height: i32,
    min: Vec2,
    scale: Vec2,
}

impl Minimap {
    /// Fit the bounding box of `points` into the cell box
    pub fn fit(points: &[Vec2], width: i32, height: i32) -> Self {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let (min, max) = if points.is_empty() {
            (Vec2::ZERO, Vec2::ONE)
        } else {
            (min, max)
        };
        let span = max - min;
        let span = Vec2::new(
            if span.x != 0.0 { span.x } else { 1.0 },
            if span.y != 0.0 { span.y } else { 1.0 },
        );
        // Boxes smaller than the margins still get a positive scale
        let inner = Vec2::new((width - 2 * MARGIN) as f32, (height - 2 * MARGIN) as f32)
            .max(Vec2::ONE);
        Self {
            width,
            height,
            min,
            scale: inner / span,
        }
    }

    /// Cell for a world point; y grows downward
    pub fn project(&self, point: Vec2) -> IVec2 {
        let local = (point - self.min) * self.scale;
        IVec2::new(
            MARGIN + local.x.round() as i32,
            self.height - MARGIN - local.y.round() as i32,
        )
    }

    /// Strictly inside the frame
    pub fn is_interior(&self, cell: IVec2) -> bool {
        cell.x >= 1 && cell.x < self.width - 1 && cell.y >= 1 && cell.y < self.height - 1
    }

    /// Interior cells covered by the outline, in track order, without repeats
    pub fn outline(&self, points: &[Vec2]) -> Vec<IVec2> {
        let mut cells: Vec<IVec2> = Vec::new();
        for cell in points.iter().map(|p| self.project(*p)) {
            if self.is_interior(cell) && cells.last() != Some(&cell) {
                cells.push(cell);
            }
        }
        cells
    }

    /// Player marker for `distance` along `track`
    pub fn player_cell(&self, track: &Track, distance: f32) -> Option<IVec2> {
        let idx = track.overview_index(distance)?;
        Some(self.project(track.overview[idx]))
    }

    /// Obstacle markers, in track order
    pub fn obstacle_cells(&self, track: &Track) -> Vec<IVec2> {
        track
            .obstacles()
            .filter_map(|(at, _, _)| track.overview_index(at))
            .map(|idx| self.project(track.overview[idx]))
            .filter(|cell| self.is_interior(*cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MapId, build_track};

    #[test]
    fn test_straight_line_fits_vertically() {
        let points: Vec<Vec2> = (1..=10).map(|i| Vec2::new(0.0, i as f32)).collect();
        let map = Minimap::fit(&points, 20, 14);
        // Bottom of the line sits just above the bottom margin, top at the top margin
        assert_eq!(map.project(points[0]), IVec2::new(2, 12));
        assert_eq!(map.project(points[9]), IVec2::new(2, 2));
    }

    #[test]
    fn test_outline_stays_inside_frame() {
        for map_id in MapId::ALL {
            let track = build_track(map_id);
            let map = Minimap::fit(&track.overview, 40, 22);
            let outline = map.outline(&track.overview);
            assert!(!outline.is_empty());
            assert!(outline.iter().all(|c| map.is_interior(*c)));
        }
    }

    #[test]
    fn test_player_and_obstacles_placed() {
        let track = build_track(MapId::Three);
        let map = Minimap::fit(&track.overview, 40, 22);
        assert_eq!(
            map.player_cell(&track, 0.0),
            Some(map.project(track.overview[0]))
        );
        assert!(map.player_cell(&track, track.total_length + 1.0).is_none());
        assert!(map.obstacle_cells(&track).len() <= 5);
        assert!(!map.obstacle_cells(&track).is_empty());
    }

    #[test]
    fn test_tiny_box_keeps_orientation() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)];
        for size in [0, 1, 3, 4] {
            let map = Minimap::fit(&points, size, size);
            let low = map.project(points[0]);
            let high = map.project(points[1]);
            assert!(high.x >= low.x, "size {size}");
            assert!(high.y <= low.y, "size {size}");
        }
    }

    #[test]
    fn test_empty_polyline() {
        let map = Minimap::fit(&[], 10, 10);
        assert!(map.outline(&[]).is_empty());
    }
}
