use tilenav_core::Point;

/// Euclidean (L2) distance between two cells. Used as the search heuristic.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f32 {
    // Widened so cells at opposite ends of the i32 range do not overflow.
    let dx = (i64::from(a.x) - i64::from(b.x)) as f32;
    let dy = (i64::from(a.y) - i64::from(b.y)) as f32;
    dx.hypot(dy)
}

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two cells.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}
