use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::curve::Point;

/// Line simplification used to bound the size of exported curves.
///
/// Implementations must keep the first and last point and return a
/// subsequence of the input with at most `max(max_points, 2)` points.
pub trait CurveSimplifier: Send + Sync {
    fn simplify(&self, points: &[Point], max_points: usize) -> Vec<Point>;
}

/// Visvalingam–Whyatt effective-area simplification.
///
/// Repeatedly drops the interior point whose triangle with its current
/// neighbours has the smallest area. A neighbour's recomputed area is never
/// allowed to fall below the area just eliminated, so points are removed in
/// order of significance.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisvalingamWhyatt;

/// Heap entry; `version` invalidates entries whose neighbours changed.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    area: f64,
    index: usize,
    version: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse so the smallest area (then the
        // lowest index) pops first.
        other
            .area
            .total_cmp(&self.area)
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}

impl CurveSimplifier for VisvalingamWhyatt {
    fn simplify(&self, points: &[Point], max_points: usize) -> Vec<Point> {
        let limit = max_points.max(2);
        let n = points.len();
        if n <= limit {
            return points.to_vec();
        }

        let mut prev: Vec<usize> = (0..n).map(|i| i.saturating_sub(1)).collect();
        let mut next: Vec<usize> = (0..n).map(|i| (i + 1).min(n - 1)).collect();
        let mut removed = vec![false; n];
        let mut version = vec![0u32; n];

        let mut heap: BinaryHeap<Candidate> = (1..n - 1)
            .map(|i| Candidate {
                area: triangle_area(points[i - 1], points[i], points[i + 1]),
                index: i,
                version: 0,
            })
            .collect();

        let mut remaining = n;
        while remaining > limit {
            let Some(candidate) = heap.pop() else { break };
            let i = candidate.index;
            if removed[i] || candidate.version != version[i] {
                continue;
            }

            removed[i] = true;
            remaining -= 1;
            let (p, q) = (prev[i], next[i]);
            next[p] = q;
            prev[q] = p;

            for j in [p, q] {
                if j == 0 || j == n - 1 {
                    continue;
                }
                version[j] += 1;
                let area = triangle_area(points[prev[j]], points[j], points[next[j]]);
                heap.push(Candidate {
                    area: area.max(candidate.area),
                    index: j,
                    version: version[j],
                });
            }
        }

        tracing::trace!(from = n, to = remaining, "simplified curve");

        points
            .iter()
            .zip(removed)
            .filter(|(_, gone)| !gone)
            .map(|(p, _)| *p)
            .collect()
    }
}
