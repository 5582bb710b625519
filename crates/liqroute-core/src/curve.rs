use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::simplify::{CurveSimplifier, VisvalingamWhyatt};

/// Relative tolerance used by [`Curve::improves_on`].
const IMPROVEMENT_TOLERANCE: f64 = 1e-9;

/// A single vertex of a rate curve: sending `x` yields at most `y`.
///
/// On the wire a point is a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// An immutable piecewise-linear liquidity curve.
///
/// Points are strictly increasing in `x` and non-decreasing in `y`. Below the
/// first point the curve yields nothing; past the last point it stays flat at
/// the last `y` (the route's capacity). Every operation returns a new curve.
///
/// The empty curve (`Curve::default()`) is the neutral operand of
/// [`combine`](Curve::combine) and [`join`](Curve::join); it cannot be built
/// through [`Curve::new`] or deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    /// Build a curve from caller-supplied points, validating the rate-curve
    /// invariants.
    pub fn new(points: Vec<Point>) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::InvalidCurve(
                "a curve needs at least one point".into(),
            ));
        }
        for (i, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(CoreError::InvalidCurve(format!(
                    "point {i} is not finite: ({}, {})",
                    p.x, p.y
                )));
            }
            if p.x < 0.0 || p.y < 0.0 {
                return Err(CoreError::InvalidCurve(format!(
                    "point {i} has a negative amount: ({}, {})",
                    p.x, p.y
                )));
            }
        }
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].x <= pair[0].x {
                return Err(CoreError::InvalidCurve(format!(
                    "x must be strictly increasing, point {} has x {} after {}",
                    i + 1,
                    pair[1].x,
                    pair[0].x
                )));
            }
            if pair[1].y < pair[0].y {
                return Err(CoreError::InvalidCurve(format!(
                    "y must not decrease, point {} has y {} after {}",
                    i + 1,
                    pair[1].y,
                    pair[0].y
                )));
            }
        }
        Ok(Self { points })
    }

    /// Assemble a curve from algebra output: drops non-finite points, sorts
    /// by x (stable) and keeps the first of any run of equal x.
    fn from_unsorted(mut points: Vec<Point>) -> Self {
        points.retain(|p| p.x.is_finite() && p.y.is_finite());
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        points.dedup_by(|later, earlier| later.x == earlier.x);
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(x_min, x_max)`, or `None` for the empty curve.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }

    /// The largest output this curve can produce.
    pub fn max_amount(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.y)
    }

    /// Output obtained for input `x`.
    pub fn amount_at(&self, x: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if x < first.x {
            return 0.0;
        }
        if x == first.x {
            return first.y;
        }
        if last.x <= x {
            return last.y;
        }

        // first.x < x < last.x, so 1 <= i < len.
        let i = self.points.partition_point(|p| p.x < x);
        let b = self.points[i];
        if b.x == x {
            return b.y;
        }
        let a = self.points[i - 1];
        (b.y - a.y) / (b.x - a.x) * (x - a.x) + a.y
    }

    /// Smallest input that yields output `y`, or `f64::INFINITY` when `y` is
    /// beyond the curve's capacity.
    pub fn amount_reverse(&self, y: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return f64::INFINITY,
        };
        if first.y >= y {
            return first.x;
        }
        if last.y < y {
            return f64::INFINITY;
        }

        // first.y < y <= last.y, so 1 <= i < len.
        let i = self.points.partition_point(|p| p.y < y);
        let b = self.points[i];
        if b.y == y {
            return b.x;
        }
        let a = self.points[i - 1];
        (b.x - a.x) / (b.y - a.y) * (y - a.y) + a.x
    }

    /// Reduce the curve to at most `max_points` points (never fewer than its
    /// two endpoints) with Visvalingam–Whyatt simplification.
    pub fn simplify(&self, max_points: usize) -> Curve {
        self.simplify_with(&VisvalingamWhyatt, max_points)
    }

    /// Like [`simplify`](Curve::simplify), with an injected algorithm.
    pub fn simplify_with(&self, simplifier: &dyn CurveSimplifier, max_points: usize) -> Curve {
        Curve {
            points: simplifier.simplify(&self.points, max_points),
        }
    }

    /// Pointwise maximum of two curves describing alternatives for the same
    /// ledger pair.
    pub fn combine(&self, other: &Curve) -> Curve {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut points = self.raise_to_max(&other.points);
        points.extend(other.raise_to_max(&self.points));
        points.extend(self.crossovers(other));
        Curve::from_unsorted(points)
    }

    /// Composition: the output of `self` is fed into `next`.
    pub fn join(&self, next: &Curve) -> Curve {
        if self.is_empty() {
            return next.clone();
        }
        if next.is_empty() {
            return self.clone();
        }

        let mut points: Vec<Point> = self
            .points
            .iter()
            .map(|p| Point::new(p.x, next.amount_at(p.y)))
            .collect();
        points.extend(
            next.points
                .iter()
                .map(|p| Point::new(self.amount_reverse(p.x), p.y)),
        );
        Curve::from_unsorted(points)
    }

    /// Translate every output by `dy`.
    pub fn shift_y(&self, dy: f64) -> Curve {
        Curve {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x, p.y + dy))
                .collect(),
        }
    }

    /// True when some vertex of `self` lies measurably above `other`.
    pub fn improves_on(&self, other: &Curve) -> bool {
        self.points.iter().any(|p| {
            let base = other.amount_at(p.x);
            p.y - base > IMPROVEMENT_TOLERANCE * base.abs().max(1.0)
        })
    }

    /// `points` with each y raised to this curve's value at the same x.
    fn raise_to_max(&self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .map(|p| Point::new(p.x, p.y.max(self.amount_at(p.x))))
            .collect()
    }

    /// Points where segments of `self` and `other` cross.
    fn crossovers(&self, other: &Curve) -> Vec<Point> {
        let (end_a, end_b) = match (self.points.last(), other.points.last()) {
            (Some(a), Some(b)) => (*a, *b),
            _ => return Vec::new(),
        };

        // The shorter curve continues flat to the end of the longer one.
        let mut points_a = self.points.clone();
        let mut points_b = other.points.clone();
        if end_a.x < end_b.x {
            points_a.push(Point::new(end_b.x, end_a.y));
        }
        if end_b.x < end_a.x {
            points_b.push(Point::new(end_a.x, end_b.y));
        }

        let mut result = Vec::new();
        let mut cursor = 1;
        for window_a in points_a.windows(2) {
            let line_a = Segment::through(window_a[0], window_a[1]);
            let mut index_b = cursor;
            while index_b < points_b.len() {
                let line_b = Segment::through(points_b[index_b - 1], points_b[index_b]);
                if line_b.x1 < line_a.x0 {
                    cursor += 1;
                    index_b += 1;
                    continue;
                }
                if line_a.x1 < line_b.x0 {
                    break;
                }
                if let Some(point) = line_a.intersect(&line_b) {
                    result.push(point);
                }
                index_b += 1;
            }
        }
        result
    }
}

impl TryFrom<Vec<Point>> for Curve {
    type Error = CoreError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Curve::new(points)
    }
}

impl From<Curve> for Vec<Point> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

/// A curve segment in slope-intercept form, `y = m·x + b` on `[x0, x1]`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    m: f64,
    b: f64,
    x0: f64,
    x1: f64,
}

impl Segment {
    fn through(p0: Point, p1: Point) -> Self {
        let dx = p1.x - p0.x;
        Self {
            m: (p1.y - p0.y) / dx,
            b: (p1.x * p0.y - p0.x * p1.y) / dx,
            x0: p0.x,
            x1: p1.x,
        }
    }

    /// Intersection inside both segments' x ranges. Parallel and vertical
    /// pairs have no unique crossing.
    fn intersect(&self, other: &Segment) -> Option<Point> {
        if self.m == other.m || !self.m.is_finite() || !other.m.is_finite() {
            return None;
        }
        let x = (other.b - self.b) / (self.m - other.m);
        let y = self.m * x + self.b;
        if x < self.x0 || self.x1 < x {
            return None;
        }
        if x < other.x0 || other.x1 < x {
            return None;
        }
        Some(Point::new(x, y))
    }
}
