use tilenav_core::Point;

/// Outcome of a path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathStatus {
    Success,
    NotFound,
}

/// Result of [`Pathfinder::find_path`](crate::Pathfinder::find_path).
///
/// `path` runs from the goal back to the cell adjacent to the start; the
/// start itself is never included. Use [`steps`](Self::steps) to walk it in
/// travel order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub path: Vec<Point>,
    pub status: PathStatus,
    /// Number of moves along the path.
    pub distance: f32,
    /// Sum of the costs of the entered cells.
    pub weighted_distance: f32,
}

impl PathResult {
    pub(crate) fn empty(status: PathStatus) -> Self {
        Self {
            path: Vec::new(),
            status,
            distance: 0.0,
            weighted_distance: 0.0,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == PathStatus::Success
    }

    /// Cells in travel order, from the start-adjacent cell to the goal.
    pub fn steps(&self) -> impl DoubleEndedIterator<Item = Point> + '_ {
        self.path.iter().rev().copied()
    }

    /// Number of cells in the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Goal cell of a non-empty path.
    #[inline]
    pub fn goal(&self) -> Option<Point> {
        self.path.first().copied()
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_result_round_trip() {
        let result = PathResult {
            path: vec![Point::new(2, 0), Point::new(1, 0)],
            status: PathStatus::Success,
            distance: 2.0,
            weighted_distance: 3.5,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""status":"success""#));
        let back: PathResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
