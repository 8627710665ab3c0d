//! Unit tests for hm-grid.

#[cfg(test)]
mod helpers {
    use hm_core::{GridCoord, WorldPos};

    use crate::GridMap;

    pub fn open(width: i32, height: i32) -> GridMap {
        GridMap::new(width, height, WorldPos::ZERO, 1.0).unwrap()
    }

    pub fn block(grid: &mut GridMap, x: i32, y: i32) {
        grid.set_occupancy(GridCoord::new(x, y), false, false, false).unwrap();
    }

    pub fn road(grid: &mut GridMap, x: i32, y: i32) {
        grid.set_occupancy(GridCoord::new(x, y), true, false, true).unwrap();
    }

    /// Reference shortest distances from `origin` by repeated edge relaxation
    /// over the same neighbour set and cost model as the A* search.
    pub fn bellman_ford(grid: &GridMap, origin: GridCoord, discount: f32) -> Vec<f32> {
        let n = grid.cell_count();
        let mut dist = vec![f32::INFINITY; n];
        dist[grid.index(origin).unwrap()] = 0.0;
        for _ in 0..n {
            let mut changed = false;
            for i in 0..n {
                if dist[i].is_infinite() {
                    continue;
                }
                let c = grid.coord(i);
                let departure = if grid.is_road(c) { discount } else { 1.0 };
                for (next, step) in grid.neighbors(c) {
                    let j = grid.index(next).unwrap();
                    let d = dist[i] + step / departure;
                    if d < dist[j] - 1e-6 {
                        dist[j] = d;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        dist
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use hm_core::{GridCoord, WorldPos};

    use super::helpers::{block, open};
    use crate::{Footprint, GridError, GridMap};

    #[test]
    fn zero_sized_grid_rejected() {
        let err = GridMap::new(0, 5, WorldPos::ZERO, 1.0).unwrap_err();
        assert_eq!(err, GridError::EmptyGrid { width: 0, height: 5 });
    }

    #[test]
    fn world_and_grid_coords_agree() {
        let grid = GridMap::new(10, 10, WorldPos::new(-5.0, 1.0, -5.0), 2.0).unwrap();
        let c = GridCoord::new(3, 7);
        let centre = grid.center(c);
        assert_eq!(grid.grid_coord(centre), c);
        assert!((centre.x - 2.0).abs() < 1e-6);
        assert!((centre.z - 10.0).abs() < 1e-6);
        assert!((centre.y - 1.0).abs() < 1e-6);

        let corner = grid.world_pos(c, 0.5, false);
        assert!((corner.x - 1.0).abs() < 1e-6);
        assert!((corner.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn negative_world_positions_floor_outside() {
        let grid = open(4, 4);
        let c = grid.grid_coord(WorldPos::new(-0.1, 0.0, 0.5));
        assert_eq!(c, GridCoord::new(-1, 0));
        assert!(!grid.is_valid(c));
        assert!(!grid.is_walkable(c));
    }

    #[test]
    fn set_occupancy_out_of_range() {
        let mut grid = open(3, 3);
        let c = GridCoord::new(3, 0);
        assert_eq!(grid.set_occupancy(c, false, false, false), Err(GridError::OutOfRange(c)));
    }

    #[test]
    fn index_coord_inverse() {
        let grid = open(5, 4);
        for i in 0..grid.cell_count() {
            assert_eq!(grid.index(grid.coord(i)), Some(i));
        }
    }

    #[test]
    fn diagonal_needs_both_corners() {
        let mut grid = open(3, 3);
        let centre = GridCoord::new(1, 1);
        assert_eq!(grid.neighbors(centre).count(), 8);

        // Blocking (2,1) removes it and both diagonals that would cut its corner.
        block(&mut grid, 2, 1);
        let ns: Vec<_> = grid.neighbors(centre).map(|(c, _)| c).collect();
        assert_eq!(ns.len(), 5);
        assert!(!ns.contains(&GridCoord::new(2, 0)));
        assert!(!ns.contains(&GridCoord::new(2, 2)));
        assert!(ns.contains(&GridCoord::new(0, 0)));
    }

    #[test]
    fn can_place_checks_buildable_and_occupants() {
        let mut grid = open(6, 6);
        let fp = Footprint::new(GridCoord::new(1, 1), 2, 2);
        assert!(grid.can_place(fp, &[]));
        assert!(!grid.can_place(fp, &[GridCoord::new(2, 2)]));
        assert!(grid.can_place(fp, &[GridCoord::new(3, 3)]));

        grid.set_occupancy(GridCoord::new(2, 1), true, false, true).unwrap();
        assert!(!grid.can_place(fp, &[]));

        let spills = Footprint::new(GridCoord::new(5, 5), 2, 2);
        assert!(!grid.can_place(spills, &[]));
    }

    #[test]
    fn footprint_cells_row_major() {
        let fp = Footprint::new(GridCoord::new(2, 3), 2, 2);
        let cells: Vec<_> = fp.cells().collect();
        assert_eq!(cells, vec![
            GridCoord::new(2, 3),
            GridCoord::new(3, 3),
            GridCoord::new(2, 4),
            GridCoord::new(3, 4),
        ]);
        assert!(Footprint::new(GridCoord::new(0, 0), 0, 3).is_empty());
    }
}

// ── Path search ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use hm_core::GridCoord;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::helpers::{bellman_ford, block, open, road};
    use crate::{AStarFinder, GridError, PathFinder, path_cost, reconstruct_path};

    #[test]
    fn straight_line_on_open_grid() {
        let grid = open(6, 1);
        let finder = AStarFinder::new(2.0);
        let from = GridCoord::new(0, 0);
        let to = GridCoord::new(5, 0);
        let map = finder.search(&grid, from, &[to]).unwrap();
        let path = reconstruct_path(&map, from, to).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.last(), Some(&to));
        assert!(!path.contains(&from), "origin excluded");
        assert!((map.distance(to).unwrap() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn origin_equals_target_gives_empty_path() {
        let grid = open(3, 3);
        let c = GridCoord::new(1, 1);
        let map = AStarFinder::default().search(&grid, c, &[c]).unwrap();
        assert_eq!(reconstruct_path(&map, c, c), Some(vec![]));
    }

    #[test]
    fn blocked_target_is_an_error() {
        let mut grid = open(4, 4);
        block(&mut grid, 3, 3);
        let finder = AStarFinder::default();
        let origin = GridCoord::new(0, 0);
        let err = finder.search(&grid, origin, &[GridCoord::new(1, 1), GridCoord::new(3, 3)]);
        assert_eq!(err.unwrap_err(), GridError::TargetNotWalkable(GridCoord::new(3, 3)));

        let outside = GridCoord::new(9, 9);
        let err = finder.search(&grid, origin, &[outside]).unwrap_err();
        assert_eq!(err, GridError::TargetNotWalkable(outside));
        assert_eq!(finder.path(&grid, origin, outside), None);
    }

    #[test]
    fn origin_out_of_range_is_an_error() {
        let grid = open(4, 4);
        let origin = GridCoord::new(-1, 0);
        let err = AStarFinder::default().search(&grid, origin, &[GridCoord::new(1, 1)]).unwrap_err();
        assert_eq!(err, GridError::OutOfRange(origin));
    }

    #[test]
    fn empty_targets_visit_nothing() {
        let grid = open(4, 4);
        let map = AStarFinder::default().search(&grid, GridCoord::new(0, 0), &[]).unwrap();
        assert_eq!(map.visited_count(), 0);
    }

    #[test]
    fn agent_can_walk_out_of_blocked_origin() {
        let mut grid = open(4, 1);
        block(&mut grid, 0, 0);
        let path = AStarFinder::default()
            .path(&grid, GridCoord::new(0, 0), GridCoord::new(3, 0))
            .unwrap();
        assert_eq!(path, vec![GridCoord::new(1, 0), GridCoord::new(2, 0), GridCoord::new(3, 0)]);
    }

    #[test]
    fn walled_off_target_is_unreachable() {
        let mut grid = open(5, 5);
        for x in 0..5 {
            block(&mut grid, x, 2);
        }
        let from = GridCoord::new(0, 0);
        let to = GridCoord::new(4, 4);
        let map = AStarFinder::default().search(&grid, from, &[to]).unwrap();
        assert!(!map.is_visited(to));
        assert_eq!(reconstruct_path(&map, from, to), None);
        // The whole reachable half was explored.
        assert_eq!(map.visited_count(), 10);
    }

    #[test]
    fn multi_target_settles_exactly_one() {
        let grid = open(9, 9);
        let targets = [GridCoord::new(8, 8), GridCoord::new(0, 8), GridCoord::new(8, 0)];
        let map = AStarFinder::default().search(&grid, GridCoord::new(1, 1), &targets).unwrap();
        assert_eq!(map.reached(&targets).count(), 1);
    }

    #[test]
    fn reconstruction_is_repeatable() {
        let mut grid = open(8, 8);
        for y in 0..6 {
            block(&mut grid, 4, y);
        }
        let from = GridCoord::new(0, 0);
        let to = GridCoord::new(7, 0);
        let map = AStarFinder::default().search(&grid, from, &[to]).unwrap();
        let first = reconstruct_path(&map, from, to).unwrap();
        let second = reconstruct_path(&map, from, to).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|&c| grid.is_walkable(c)));
        // Consecutive cells touch.
        let mut prev = from;
        for &c in &first {
            assert_eq!(prev.chebyshev(c), 1);
            prev = c;
        }
    }

    #[test]
    fn searches_are_deterministic() {
        let grid = open(12, 12);
        let finder = AStarFinder::default();
        let from = GridCoord::new(0, 0);
        let to = GridCoord::new(11, 5);
        let a = finder.path(&grid, from, to).unwrap();
        let b = finder.path(&grid, from, to).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn road_strip_is_preferred() {
        // 7×3 grid, top row is road.  Walking straight along y = 1 costs 6;
        // detouring over the road costs ~4.1 with a discount of 2.
        let mut grid = open(7, 3);
        for x in 0..7 {
            road(&mut grid, x, 0);
        }
        let finder = AStarFinder::new(2.0);
        let from = GridCoord::new(0, 1);
        let to = GridCoord::new(6, 1);
        let map = finder.search(&grid, from, &[to]).unwrap();
        let path = reconstruct_path(&map, from, to).unwrap();

        assert!(path.iter().any(|&c| grid.is_road(c)), "path should use the road: {path:?}");
        let cost = map.distance(to).unwrap();
        assert!(cost < 6.0);
        assert!((path_cost(&grid, from, &path, 2.0) - cost).abs() < 1e-4);
    }

    #[test]
    fn matches_bellman_ford_on_random_grids() {
        let mut rng = SmallRng::seed_from_u64(7);
        for round in 0..40 {
            let w = rng.gen_range(3..10);
            let h = rng.gen_range(3..10);
            let mut grid = open(w, h);
            for y in 0..h {
                for x in 0..w {
                    if rng.gen_bool(0.25) {
                        block(&mut grid, x, y);
                    } else if rng.gen_bool(0.2) {
                        road(&mut grid, x, y);
                    }
                }
            }
            let discount = if round % 2 == 0 { 1.0 } else { 2.5 };
            let finder = AStarFinder::new(discount);
            let origin = GridCoord::new(rng.gen_range(0..w), rng.gen_range(0..h));
            let expected = bellman_ford(&grid, origin, discount);

            for i in 0..grid.cell_count() {
                let target = grid.coord(i);
                if !grid.is_walkable(target) {
                    continue;
                }
                let map = finder.search(&grid, origin, &[target]).unwrap();
                match map.distance(target) {
                    Some(d) => {
                        assert!(
                            (d - expected[i]).abs() < 1e-3,
                            "round {round}: {origin} -> {target}: got {d}, want {}",
                            expected[i],
                        );
                        let path = reconstruct_path(&map, origin, target).unwrap();
                        assert!((path_cost(&grid, origin, &path, discount) - d).abs() < 1e-3);
                    }
                    None => assert!(
                        expected[i].is_infinite(),
                        "round {round}: {target} reachable but not found",
                    ),
                }
            }
        }
    }
}
