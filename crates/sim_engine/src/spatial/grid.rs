//! Uniform-cell spatial hash grid
//!
//! Buckets aliens and asteroids into fixed-size cubic cells keyed by
//! `floor(position / cell_size)` per axis. Rebuilt from scratch every frame;
//! queries visit the 3x3x3 neighborhood around a point so that contacts
//! across cell boundaries are never missed. Each entity is inserted into
//! exactly one cell, so a query sees any candidate at most once.

use std::collections::HashMap;

use crate::foundation::math::Vec3;

/// What kind of entity a grid entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Live, vulnerable alien
    Alien {
        /// Flying-saucer body plan (affects hit component resolution)
        saucer: bool,
    },
    /// Non-decorative asteroid
    Asteroid,
}

/// Entity stored in the grid with position and bounding radius
#[derive(Debug, Clone, Copy)]
pub struct GridEntry {
    /// Caller's entity identifier
    pub id: u32,
    /// World position
    pub position: Vec3,
    /// Bounding radius
    pub radius: f32,
    /// Entity kind
    pub kind: TargetKind,
}

/// Uniform spatial hash over collision candidates
#[derive(Debug)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32, i32), Vec<GridEntry>>,
    entry_count: usize,
}

impl SpatialHashGrid {
    /// Create an empty grid with the given cell edge length
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            entry_count: 0,
        }
    }

    /// Cell key containing a position
    fn cell_key(&self, position: Vec3) -> (i32, i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }

    /// Drop all entries, keeping bucket allocations for the next rebuild
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.entry_count = 0;
    }

    /// Insert an entity into the bucket matching its position
    pub fn insert(&mut self, entry: GridEntry) {
        let key = self.cell_key(entry.position);
        self.cells.entry(key).or_default().push(entry);
        self.entry_count += 1;
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of occupied cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|bucket| !bucket.is_empty()).count()
    }

    /// Visit every entry in the 27 cells around `position`
    pub fn visit_neighborhood(&self, position: Vec3, mut visit: impl FnMut(&GridEntry)) {
        let (cx, cy, cz) = self.cell_key(position);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) {
                        for entry in bucket {
                            visit(entry);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alien(id: u32, position: Vec3) -> GridEntry {
        GridEntry {
            id,
            position,
            radius: 1.0,
            kind: TargetKind::Alien { saucer: false },
        }
    }

    fn collect_ids(grid: &SpatialHashGrid, position: Vec3) -> Vec<u32> {
        let mut ids = Vec::new();
        grid.visit_neighborhood(position, |entry| ids.push(entry.id));
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_same_cell_query() {
        let mut grid = SpatialHashGrid::new(20.0);
        grid.insert(alien(1, Vec3::new(5.0, 5.0, 5.0)));
        assert_eq!(collect_ids(&grid, Vec3::new(6.0, 6.0, 6.0)), vec![1]);
    }

    #[test]
    fn test_neighbor_cell_query() {
        let mut grid = SpatialHashGrid::new(20.0);
        // Query point sits in cell (0,0,0); the entry lands in (1,0,0)
        grid.insert(alien(7, Vec3::new(21.0, 5.0, 5.0)));
        assert_eq!(collect_ids(&grid, Vec3::new(19.0, 5.0, 5.0)), vec![7]);
    }

    #[test]
    fn test_far_cell_not_visited() {
        let mut grid = SpatialHashGrid::new(20.0);
        // Two cells away on X; outside the 3x3x3 neighborhood
        grid.insert(alien(9, Vec3::new(45.0, 5.0, 5.0)));
        assert!(collect_ids(&grid, Vec3::new(5.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_negative_coordinates_floor_correctly() {
        let mut grid = SpatialHashGrid::new(20.0);
        // -1.0 must land in cell -1, not cell 0
        grid.insert(alien(3, Vec3::new(-1.0, 0.0, 0.0)));
        assert_eq!(collect_ids(&grid, Vec3::new(1.0, 0.0, 0.0)), vec![3]);
    }

    #[test]
    fn test_entry_visited_once() {
        let mut grid = SpatialHashGrid::new(20.0);
        grid.insert(alien(4, Vec3::new(0.5, 0.5, 0.5)));
        let ids = collect_ids(&grid, Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_clear_keeps_no_entries() {
        let mut grid = SpatialHashGrid::new(20.0);
        grid.insert(alien(1, Vec3::zeros()));
        grid.insert(alien(2, Vec3::new(100.0, 0.0, 0.0)));
        assert_eq!(grid.entry_count(), 2);
        grid.clear();
        assert_eq!(grid.entry_count(), 0);
        assert_eq!(grid.occupied_cells(), 0);
        assert!(collect_ids(&grid, Vec3::zeros()).is_empty());
    }
}
