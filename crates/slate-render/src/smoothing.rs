//! Cardinal-spline smoothing of stroke polylines.
//!
//! Each interior point gets two control points along the direction from its
//! predecessor to its successor, split in proportion to the neighbouring
//! segment lengths and scaled by `tension`. The first and last segments are
//! quadratic, interior segments cubic.

use kurbo::{BezPath, Point};

/// Build a smoothed path through `points`.
///
/// A single point yields a zero-length segment so round caps paint a dot.
/// With fewer than three points, or zero tension, segments are straight.
pub fn smooth_path(points: &[Point], tension: f64) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);

    if points.len() == 1 {
        path.line_to(first);
        return path;
    }

    // Control triples: [in-control, vertex, out-control] per interior point
    let mut triples = Vec::with_capacity((points.len() - 2) * 3);
    if tension > 0.0 {
        for w in points.windows(3) {
            if let Some((c_in, c_out)) = control_points(w[0], w[1], w[2], tension) {
                triples.extend([c_in, w[1], c_out]);
            }
        }
    }

    if triples.is_empty() {
        for &p in &points[1..] {
            path.line_to(p);
        }
        return path;
    }

    let last = points[points.len() - 1];
    path.quad_to(triples[0], triples[1]);
    let mut n = 2;
    while n < triples.len() - 1 {
        path.curve_to(triples[n], triples[n + 1], triples[n + 2]);
        n += 3;
    }
    path.quad_to(triples[triples.len() - 1], last);
    path
}

/// Incoming and outgoing control points for `p1`. `None` when all three
/// points coincide.
fn control_points(p0: Point, p1: Point, p2: Point, tension: f64) -> Option<(Point, Point)> {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let total = d01 + d12;
    if total <= 0.0 {
        return None;
    }

    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let across = p2 - p0;
    Some((p1 - across * fa, p1 + across * fb))
}
