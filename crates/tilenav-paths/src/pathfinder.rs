use tilenav_core::Point;

use crate::distance::euclidean;
use crate::heap::Heap;
use crate::map::{BlockedSet, WeightedMap};
use crate::neighbors::{Connectivity, Neighbors};
use crate::node::{NodeArena, OpenRef};
use crate::result::{PathResult, PathStatus};
use crate::table::{CellTable, TableShape};

/// Shortest-path search over a weighted walkable graph.
///
/// A `Pathfinder` is immutable once built: it owns the weighted map, the
/// blocked set and the connectivity rule it was constructed with. To react
/// to a changed world, build a new one and swap it in.
///
/// Queries run an A* search whose open set is ordered by g + h with a
/// Euclidean heuristic, while relaxation uses only the accumulated g.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    weighted: WeightedMap,
    blocked: BlockedSet,
    connectivity: Connectivity,
    // Layout of the eligibility table and of every query's node lookup.
    shape: TableShape,
    eligible: CellTable<f32>,
    eligible_count: usize,
}

impl Pathfinder {
    /// Build a pathfinder from a weighted map, a set of blocked cells and a
    /// connectivity rule.
    pub fn new(weighted: WeightedMap, blocked: BlockedSet, connectivity: Connectivity) -> Self {
        let shape = TableShape::for_members(weighted.bounds(), weighted.len());
        let mut eligible = CellTable::new(shape, weighted.len());
        let mut eligible_count = 0;
        for (p, cost) in weighted.iter() {
            if blocked.contains(p) {
                continue;
            }
            if eligible.insert(p, cost) {
                eligible_count += 1;
            }
        }
        log::debug!(
            "pathfinder: {} cells ({} eligible, {} blocked), {shape:?}, {connectivity:?}",
            weighted.len(),
            eligible_count,
            blocked.len(),
        );
        Self {
            weighted,
            blocked,
            connectivity,
            shape,
            eligible,
            eligible_count,
        }
    }

    /// Build a pathfinder in which every graph member is eligible.
    pub fn without_blockers(weighted: WeightedMap, connectivity: Connectivity) -> Self {
        Self::new(weighted, BlockedSet::new(), connectivity)
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    #[inline]
    pub fn weighted_map(&self) -> &WeightedMap {
        &self.weighted
    }

    #[inline]
    pub fn blocked(&self) -> &BlockedSet {
        &self.blocked
    }

    /// Number of graph members.
    #[inline]
    pub fn len(&self) -> usize {
        self.weighted.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weighted.is_empty()
    }

    /// Number of graph members that are not blocked.
    #[inline]
    pub fn eligible_count(&self) -> usize {
        self.eligible_count
    }

    /// Whether `cell` is a graph member and not blocked.
    #[inline]
    pub fn is_eligible(&self, cell: Point) -> bool {
        self.eligible_cost(cell).is_some()
    }

    /// Cost of entering `cell` if it is eligible.
    #[inline]
    pub fn eligible_cost(&self, cell: Point) -> Option<f32> {
        self.eligible.get(cell)
    }

    /// Eligible neighbors of `cell` under the pathfinder's connectivity.
    pub fn neighbors(&self, cell: Point) -> Vec<Point> {
        let mut nbuf = Neighbors::new();
        nbuf.of(self.connectivity, cell, |p| self.is_eligible(p))
            .to_vec()
    }

    /// Compute the lowest-cost path from `start` to `end`.
    ///
    /// Not finding a path is a normal outcome reported through
    /// [`PathStatus::NotFound`], with an empty path and zero distances.
    pub fn find_path(&self, start: Point, end: Point) -> PathResult {
        if start == end {
            return PathResult::empty(PathStatus::Success);
        }
        if !self.is_eligible(start) || !self.is_eligible(end) {
            log::trace!("find_path {start} -> {end}: endpoint not eligible");
            return PathResult::empty(PathStatus::NotFound);
        }

        let mut nodes = NodeArena::new(self.shape, self.eligible_count);
        let mut open: Heap<OpenRef> = Heap::with_capacity(self.eligible_count);
        let mut nbuf = Neighbors::new();

        let (Some(start_idx), Some(end_idx)) = (
            nodes.insert(start, 0.0, euclidean(start, end)),
            nodes.insert(end, f32::INFINITY, 0.0),
        ) else {
            return PathResult::empty(PathStatus::NotFound);
        };
        open.push(OpenRef {
            node: start_idx,
            f: nodes.get(start_idx).total(),
        });

        while let Some(current) = open.pop() {
            let ci = current.node;
            nodes.get_mut(ci).closed = true;
            if ci == end_idx {
                break;
            }

            let (cell, current_g) = {
                let n = nodes.get(ci);
                (n.cell, n.g)
            };

            for &np in nbuf.of(self.connectivity, cell, |p| self.is_eligible(p)) {
                let Some(cost) = self.eligible_cost(np) else {
                    continue;
                };
                let Some(ni) = nodes.insert(np, f32::INFINITY, euclidean(np, end)) else {
                    continue;
                };
                if nodes.get(ni).closed {
                    continue;
                }
                if !open.contains(ni) {
                    open.push(OpenRef {
                        node: ni,
                        f: nodes.get(ni).total(),
                    });
                }

                let tentative_g = current_g + cost;
                let n = nodes.get_mut(ni);
                if tentative_g < n.g {
                    n.g = tentative_g;
                    n.parent = Some(ci);
                    let f = n.total();
                    open.update(OpenRef { node: ni, f });
                }
            }
        }

        // Walk back from the goal. A missing link before reaching the start
        // means the goal was never reached.
        let weighted_distance = nodes.get(end_idx).total();
        let mut path = Vec::new();
        let mut ci = end_idx;
        loop {
            let n = nodes.get(ci);
            if n.cell == start {
                break;
            }
            path.push(n.cell);
            match n.parent {
                Some(parent) => ci = parent,
                None => {
                    log::trace!(
                        "find_path {start} -> {end}: not found after visiting {} cells",
                        nodes.len()
                    );
                    return PathResult::empty(PathStatus::NotFound);
                }
            }
        }

        log::trace!(
            "find_path {start} -> {end}: {} steps, weighted {weighted_distance}",
            path.len()
        );
        PathResult {
            distance: path.len() as f32,
            path,
            status: PathStatus::Success,
            weighted_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::manhattan;
    use tilenav_core::Range;
    use rand::{RngExt, SeedableRng};
    use std::cmp::Reverse;
    use std::collections::{BinaryHeap, HashMap};

    /// Build a pathfinder from rows of text, row `i` being `y = i`.
    ///
    /// `.` costs 1, a digit costs its value, `#` is absent from the map and
    /// `B` is a member that is blocked.
    fn parse(rows: &[&str], connectivity: Connectivity) -> Pathfinder {
        let mut weighted = WeightedMap::new();
        let mut blocked = BlockedSet::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                match ch {
                    '.' => {
                        weighted.insert(p, 1.0);
                    }
                    'B' => {
                        weighted.insert(p, 1.0);
                        blocked.insert(p);
                    }
                    '#' => {}
                    d => {
                        let cost = d.to_digit(10).expect("cost digit") as f32;
                        weighted.insert(p, cost);
                    }
                }
            }
        }
        Pathfinder::new(weighted, blocked, connectivity)
    }

    fn open_grid(w: i32, h: i32, connectivity: Connectivity) -> Pathfinder {
        let weighted = Range::new(0, 0, w, h).iter().map(|p| (p, 1.0)).collect();
        Pathfinder::without_blockers(weighted, connectivity)
    }

    /// Check that a successful result is a connected walk from `start` to
    /// `end` whose weight matches the reported distances.
    fn assert_valid(pf: &Pathfinder, start: Point, end: Point, r: &PathResult) {
        assert!(r.is_success());
        assert_eq!(r.goal(), Some(end));
        assert!(!r.path.contains(&start));
        let mut prev = start;
        let mut weight = 0.0;
        for step in r.steps() {
            assert!(
                pf.neighbors(prev).contains(&step),
                "{step} is not a neighbor of {prev}"
            );
            weight += pf.eligible_cost(step).unwrap();
            prev = step;
        }
        assert_eq!(r.distance, r.len() as f32);
        assert!((r.weighted_distance - weight).abs() < 1e-4);
    }

    #[test]
    fn same_cell_is_trivial_success() {
        let pf = open_grid(3, 3, Connectivity::Cardinal);
        for p in Range::new(0, 0, 3, 3) {
            let r = pf.find_path(p, p);
            assert_eq!(r.status, PathStatus::Success);
            assert!(r.path.is_empty());
            assert_eq!(r.distance, 0.0);
            assert_eq!(r.weighted_distance, 0.0);
        }
    }

    #[test]
    fn ineligible_endpoints_are_not_found() {
        let pf = parse(&["..B", "...", "#.."], Connectivity::Cardinal);
        let absent = Point::new(0, 2);
        let blocked = Point::new(2, 0);
        let outside = Point::new(10, 10);
        for start in Range::new(0, 0, 3, 3) {
            for end in [absent, blocked, outside] {
                if start == end {
                    continue;
                }
                let r = pf.find_path(start, end);
                assert_eq!(r.status, PathStatus::NotFound);
                assert!(r.path.is_empty());
                assert_eq!(r.distance, 0.0);
                assert_eq!(r.weighted_distance, 0.0);
            }
        }
        assert_eq!(
            pf.find_path(blocked, Point::new(1, 1)).status,
            PathStatus::NotFound
        );
    }

    #[test]
    fn disconnected_islands_are_not_found() {
        let pf = parse(&["..#..", "..B..", "..#.."], Connectivity::Diagonal);
        let r = pf.find_path(Point::new(0, 0), Point::new(4, 2));
        assert_eq!(r.status, PathStatus::NotFound);
        assert!(r.path.is_empty());
        assert_eq!(r.distance, 0.0);
        assert_eq!(r.weighted_distance, 0.0);
    }

    #[test]
    fn corner_to_corner_is_manhattan_optimal() {
        let pf = open_grid(5, 5, Connectivity::Cardinal);
        let (a, b) = (Point::new(0, 0), Point::new(4, 4));
        let r = pf.find_path(a, b);
        assert_valid(&pf, a, b, &r);
        assert_eq!(r.distance, manhattan(a, b) as f32);
        assert_eq!(r.distance, 8.0);
        assert_eq!(r.weighted_distance, 8.0);

        let edge = pf.find_path(a, Point::new(4, 0));
        assert_eq!(edge.distance, 4.0);
        assert_eq!(edge.weighted_distance, 4.0);
        assert_eq!(
            edge.path,
            vec![Point::new(4, 0), Point::new(3, 0), Point::new(2, 0), Point::new(1, 0)]
        );
    }

    #[test]
    fn weighted_distance_scales_with_uniform_cost() {
        let weighted = Range::new(0, 0, 5, 5).iter().map(|p| (p, 2.5)).collect();
        let pf = Pathfinder::without_blockers(weighted, Connectivity::Cardinal);
        let r = pf.find_path(Point::new(0, 0), Point::new(4, 4));
        assert_eq!(r.distance, 8.0);
        assert_eq!(r.weighted_distance, 8.0 * 2.5);
    }

    #[test]
    fn start_cell_cost_is_not_charged() {
        let pf = parse(&["9.."], Connectivity::Cardinal);
        let r = pf.find_path(Point::new(0, 0), Point::new(2, 0));
        assert_eq!(r.weighted_distance, 2.0);
        let back = pf.find_path(Point::new(2, 0), Point::new(0, 0));
        assert_eq!(back.weighted_distance, 10.0);
    }

    fn strip_grid(weight: char) -> Pathfinder {
        // The strip covers x = 2 for y = 1..=3; the only way around is row 0.
        let rows: Vec<String> = vec![
            ".....".to_string(),
            format!("..{weight}.."),
            format!("..{weight}.."),
            format!("..{weight}.."),
        ];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        parse(&rows, Connectivity::Cardinal)
    }

    #[test]
    fn detours_around_expensive_strip() {
        let pf = strip_grid('9');
        let (a, b) = (Point::new(0, 2), Point::new(4, 2));
        let r = pf.find_path(a, b);
        assert_valid(&pf, a, b, &r);
        assert!(r.path.iter().all(|p| p.x != 2 || p.y == 0));
        assert_eq!(r.distance, 8.0);
        assert_eq!(r.weighted_distance, 8.0);
    }

    #[test]
    fn crosses_cheap_strip() {
        let pf = strip_grid('3');
        let (a, b) = (Point::new(0, 2), Point::new(4, 2));
        let r = pf.find_path(a, b);
        assert_valid(&pf, a, b, &r);
        assert!(r.path.contains(&Point::new(2, 2)));
        assert_eq!(r.distance, 4.0);
        assert_eq!(r.weighted_distance, 6.0);
    }

    #[test]
    fn strip_at_threshold_costs_the_same_either_way() {
        let pf = strip_grid('5');
        let r = pf.find_path(Point::new(0, 2), Point::new(4, 2));
        assert_eq!(r.weighted_distance, 8.0);
    }

    #[test]
    fn blocked_members_force_a_detour() {
        let pf = parse(&["...", "BB.", "..."], Connectivity::Cardinal);
        let (a, b) = (Point::new(0, 0), Point::new(0, 2));
        let r = pf.find_path(a, b);
        assert_valid(&pf, a, b, &r);
        assert_eq!(r.distance, 6.0);
    }

    #[test]
    fn diagonal_connectivity_shortens_paths() {
        let diag = open_grid(3, 3, Connectivity::Diagonal);
        let card = open_grid(3, 3, Connectivity::Cardinal);
        let a = Point::new(0, 0);

        assert_eq!(diag.find_path(a, Point::new(1, 1)).distance, 1.0);
        assert_eq!(card.find_path(a, Point::new(1, 1)).distance, 2.0);

        let far = Point::new(2, 2);
        let rd = diag.find_path(a, far);
        assert_valid(&diag, a, far, &rd);
        assert_eq!(rd.distance, 2.0);
        assert_eq!(card.find_path(a, far).distance, 4.0);
    }

    #[test]
    fn hex_diagonals_depend_on_row_parity() {
        let hex = open_grid(5, 5, Connectivity::HexOffset);
        // Odd rows reach up-right / down-right directly.
        let r = hex.find_path(Point::new(1, 1), Point::new(2, 2));
        assert_eq!(r.distance, 1.0);
        // Even rows only lean left.
        let r = hex.find_path(Point::new(2, 2), Point::new(3, 3));
        assert_valid(&hex, Point::new(2, 2), Point::new(3, 3), &r);
        assert_eq!(r.distance, 2.0);
        let r = hex.find_path(Point::new(2, 2), Point::new(1, 3));
        assert_eq!(r.distance, 1.0);
    }

    #[test]
    fn neighbors_are_filtered_by_eligibility() {
        let pf = parse(&[".B.", "...", "#.."], Connectivity::Diagonal);
        let mut ns = pf.neighbors(Point::new(0, 1));
        ns.sort();
        assert_eq!(ns, vec![Point::new(0, 0), Point::new(1, 1), Point::new(1, 2)]);
        assert_eq!(pf.eligible_count(), 7);
        assert_eq!(pf.len(), 8);
    }

    #[test]
    fn empty_map_finds_nothing() {
        let pf = Pathfinder::without_blockers(WeightedMap::new(), Connectivity::Cardinal);
        assert!(pf.is_empty());
        let r = pf.find_path(Point::new(0, 0), Point::new(1, 0));
        assert_eq!(r.status, PathStatus::NotFound);
    }

    #[test]
    fn far_apart_members_use_sparse_tables() {
        let (a, b, far) = (Point::new(0, 0), Point::new(1, 0), Point::new(3_000_000, 3_000_000));
        let weighted = [(a, 1.0), (b, 1.0), (far, 1.0)].into_iter().collect();
        let pf = Pathfinder::without_blockers(weighted, Connectivity::Diagonal);
        assert_eq!(pf.shape, TableShape::Sparse);
        assert_eq!(pf.eligible_count(), 3);
        assert!(pf.is_eligible(far));

        let r = pf.find_path(a, b);
        assert_valid(&pf, a, b, &r);
        assert_eq!(r.distance, 1.0);
        assert_eq!(pf.find_path(a, far).status, PathStatus::NotFound);
        assert_eq!(pf.find_path(far, b).status, PathStatus::NotFound);
    }

    #[test]
    fn sparse_and_dense_layouts_agree() {
        let rows = ["..3..", ".B#..", "..9..", "....."];
        let dense = parse(&rows, Connectivity::Diagonal);
        assert!(matches!(dense.shape, TableShape::Dense(_)));

        let outlier = Point::new(-2_000_000, 5_000_000);
        let mut weighted = dense.weighted_map().clone();
        weighted.insert(outlier, 1.0);
        let sparse = Pathfinder::new(weighted, dense.blocked().clone(), Connectivity::Diagonal);
        assert_eq!(sparse.shape, TableShape::Sparse);

        for a in Range::new(0, 0, 5, 4) {
            for b in Range::new(0, 0, 5, 4) {
                assert_eq!(dense.find_path(a, b), sparse.find_path(a, b), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn cells_at_the_edge_of_i32() {
        let cases = [
            (Point::new(i32::MAX - 1, 0), Point::new(i32::MAX, 0)),
            (Point::new(i32::MIN, 0), Point::new(i32::MIN + 1, 0)),
            (Point::new(i32::MAX - 1, i32::MAX - 1), Point::new(i32::MAX, i32::MAX)),
        ];
        for (a, b) in cases {
            let weighted = [(a, 1.0), (b, 2.0)].into_iter().collect();
            let pf = Pathfinder::without_blockers(weighted, Connectivity::Diagonal);
            let r = pf.find_path(a, b);
            assert_eq!(r.path, vec![b], "{a} -> {b}");
            assert_eq!(r.weighted_distance, 2.0);
            assert_eq!(pf.find_path(b, a).weighted_distance, 1.0);
        }
    }

    /// Plain Dijkstra over the same graph, used as a reference.
    fn reference_cost(pf: &Pathfinder, start: Point, end: Point) -> Option<u32> {
        let mut dist: HashMap<Point, u32> = HashMap::new();
        let mut open = BinaryHeap::new();
        dist.insert(start, 0);
        open.push(Reverse((0u32, start)));
        while let Some(Reverse((d, p))) = open.pop() {
            if p == end {
                return Some(d);
            }
            if dist.get(&p).is_some_and(|&best| d > best) {
                continue;
            }
            for n in pf.neighbors(p) {
                let nd = d + pf.eligible_cost(n).unwrap() as u32;
                if dist.get(&n).is_none_or(|&best| nd < best) {
                    dist.insert(n, nd);
                    open.push(Reverse((nd, n)));
                }
            }
        }
        None
    }

    #[test]
    fn randomized_grids_match_reference_dijkstra() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let (w, h) = (rng.random_range(3..12), rng.random_range(3..12));
            let mut weighted = WeightedMap::new();
            let mut blocked = BlockedSet::new();
            for p in Range::new(0, 0, w, h) {
                match rng.random_range(0..10u32) {
                    0 => {}
                    1 => {
                        weighted.insert(p, 1.0);
                        blocked.insert(p);
                    }
                    _ => {
                        weighted.insert(p, rng.random_range(1..6u32) as f32);
                    }
                }
            }
            let pf = Pathfinder::new(weighted, blocked, Connectivity::Cardinal);
            for _ in 0..10 {
                let a = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                let b = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                let r = pf.find_path(a, b);
                if a == b {
                    assert!(r.is_success());
                    continue;
                }
                if !pf.is_eligible(a) || !pf.is_eligible(b) {
                    assert_eq!(r.status, PathStatus::NotFound);
                    continue;
                }
                match reference_cost(&pf, a, b) {
                    Some(cost) => {
                        assert_valid(&pf, a, b, &r);
                        assert_eq!(r.weighted_distance, cost as f32, "{a} -> {b}");
                    }
                    None => assert_eq!(r.status, PathStatus::NotFound, "{a} -> {b}"),
                }
            }
        }
    }
}
