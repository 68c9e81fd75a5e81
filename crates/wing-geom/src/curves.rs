use nalgebra::{DMatrix, Point2};
use serde::{Deserialize, Serialize};

use crate::error::GeomError;

/// Sample count used while a control point is being dragged.
pub const SAMPLES_ON_DRAG: usize = 80;
/// Sample count used once the drag is released.
pub const SAMPLES_ON_RELEASE: usize = 200;

/// Dense sample count used when refitting a curve to a new family.
const REFIT_SAMPLES: usize = 100;

/// Interpolation family of a control curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveKind {
    Linear,
    Bezier,
    BSpline,
}

/// A 2D curve defined by an ordered list of control points.
///
/// Used for angle-of-attack, z-rotation, arc, planform and ballooning
/// curves. The x axis is the curve's primary parametrization axis; evaluated
/// sequences are expected to be monotonic in x whenever the control polygon
/// is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCurve {
    controlpoints: Vec<Point2<f64>>,
    kind: CurveKind,
}

impl ControlCurve {
    pub fn new(controlpoints: Vec<Point2<f64>>, kind: CurveKind) -> Result<Self, GeomError> {
        if controlpoints.len() < 2 {
            return Err(GeomError::InvalidCurve {
                reason: format!("need at least 2 control points, got {}", controlpoints.len()),
            });
        }
        Ok(Self { controlpoints, kind })
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn controlpoints(&self) -> &[Point2<f64>] {
        &self.controlpoints
    }

    pub fn numpoints(&self) -> usize {
        self.controlpoints.len()
    }

    /// Move a single control point (the live-drag mutation).
    pub fn set_controlpoint(&mut self, index: usize, point: Point2<f64>) -> Result<(), GeomError> {
        let slot = self
            .controlpoints
            .get_mut(index)
            .ok_or(GeomError::InvalidParameter {
                name: "index",
                reason: format!("control point index {} out of range", index),
            })?;
        *slot = point;
        Ok(())
    }

    /// Scale all control points, e.g. when the span of the glider changes
    /// and every span-domain curve must follow.
    pub fn scale(&mut self, x_factor: f64, y_factor: f64) {
        for p in &mut self.controlpoints {
            p.x *= x_factor;
            p.y *= y_factor;
        }
    }

    /// Evaluate the curve at parameter t in [0, 1].
    pub fn evaluate(&self, t: f64) -> Point2<f64> {
        let t = t.clamp(0.0, 1.0);
        match self.kind {
            CurveKind::Linear => self.evaluate_linear(t),
            CurveKind::Bezier => self.evaluate_bezier(t),
            CurveKind::BSpline => self.evaluate_bspline(t),
        }
    }

    /// Produce `n` points tracing the curve at evenly spaced parameters.
    pub fn get_sequence(&self, n: usize) -> Result<Vec<Point2<f64>>, GeomError> {
        if n < 2 {
            return Err(GeomError::InvalidParameter {
                name: "n",
                reason: format!("need at least 2 samples, got {}", n),
            });
        }
        let last = (n - 1) as f64;
        Ok((0..n).map(|i| self.evaluate(i as f64 / last)).collect())
    }

    /// Bounded-resolution sequence for live dragging.
    pub fn sequence_preview(&self) -> Vec<Point2<f64>> {
        // len >= 2 is a construction invariant, so this cannot fail
        self.get_sequence(SAMPLES_ON_DRAG).unwrap_or_default()
    }

    /// Full-resolution sequence for drag release.
    pub fn sequence_final(&self) -> Vec<Point2<f64>> {
        self.get_sequence(SAMPLES_ON_RELEASE).unwrap_or_default()
    }

    /// Interpolate the curve's y value at a given x.
    ///
    /// Requires the sampled sequence to be monotonically increasing in x.
    /// Values outside the curve's x range are clamped to the end values.
    pub fn interpolate_x(&self, x: f64) -> Result<f64, GeomError> {
        let samples = self.get_sequence(SAMPLES_ON_RELEASE)?;
        for w in samples.windows(2) {
            if w[1].x < w[0].x - 1e-12 {
                return Err(GeomError::InvalidCurve {
                    reason: format!(
                        "curve is not monotonic in x near x={}, cannot interpolate",
                        w[0].x
                    ),
                });
            }
        }
        if x <= samples[0].x {
            return Ok(samples[0].y);
        }
        if x >= samples[samples.len() - 1].x {
            return Ok(samples[samples.len() - 1].y);
        }
        let idx = samples.partition_point(|p| p.x < x).max(1);
        let (a, b) = (samples[idx - 1], samples[idx]);
        let dx = b.x - a.x;
        if dx.abs() < 1e-15 {
            return Ok(a.y);
        }
        Ok(a.y + (b.y - a.y) * (x - a.x) / dx)
    }

    /// Change the interpolation family, refitting the control points so the
    /// traced curve stays as close as possible to the old one.
    ///
    /// The old curve is sampled densely and the new family is fitted by least
    /// squares with the first and last control points pinned exactly.
    /// Validates the refit before mutating: a non-monotonic reprojection
    /// leaves the curve untouched and returns `InvalidCurve`.
    pub fn set_kind(&mut self, kind: CurveKind) -> Result<(), GeomError> {
        if kind == self.kind {
            return Ok(());
        }
        let samples = self.get_sequence(REFIT_SAMPLES)?;
        let fitted = fit(&samples, self.controlpoints.len(), kind)?;
        let candidate = Self {
            controlpoints: fitted,
            kind,
        };
        candidate.check_monotonic()?;
        *self = candidate;
        Ok(())
    }

    /// Change the number of control points, refitting to preserve the traced
    /// curve. Endpoints are pinned exactly.
    pub fn set_numpoints(&mut self, n: usize) -> Result<(), GeomError> {
        if n < 2 {
            return Err(GeomError::InvalidCurve {
                reason: format!("need at least 2 control points, got {}", n),
            });
        }
        if n == self.controlpoints.len() {
            return Ok(());
        }
        let samples = self.get_sequence(REFIT_SAMPLES)?;
        let fitted = fit(&samples, n, self.kind)?;
        let candidate = Self {
            controlpoints: fitted,
            kind: self.kind,
        };
        candidate.check_monotonic()?;
        *self = candidate;
        Ok(())
    }

    fn check_monotonic(&self) -> Result<(), GeomError> {
        let seq = self.get_sequence(SAMPLES_ON_DRAG)?;
        for w in seq.windows(2) {
            if w[1].x < w[0].x - 1e-9 {
                return Err(GeomError::InvalidCurve {
                    reason: "refit produced a non-monotonic curve".to_string(),
                });
            }
        }
        Ok(())
    }

    fn evaluate_linear(&self, t: f64) -> Point2<f64> {
        let n = self.controlpoints.len();
        let scaled = t * (n - 1) as f64;
        let seg = (scaled.floor() as usize).min(n - 2);
        let local = scaled - seg as f64;
        let a = self.controlpoints[seg];
        let b = self.controlpoints[seg + 1];
        Point2::new(a.x + (b.x - a.x) * local, a.y + (b.y - a.y) * local)
    }

    fn evaluate_bezier(&self, t: f64) -> Point2<f64> {
        // de Casteljau
        let mut pts: Vec<Point2<f64>> = self.controlpoints.clone();
        let n = pts.len();
        for level in 1..n {
            for i in 0..n - level {
                let a = pts[i];
                let b = pts[i + 1];
                pts[i] = Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            }
        }
        pts[0]
    }

    fn evaluate_bspline(&self, t: f64) -> Point2<f64> {
        let n = self.controlpoints.len();
        let degree = bspline_degree(n);
        let knots = clamped_knots(n, degree);
        let row = bspline_basis_row(&knots, n, degree, t);
        let mut x = 0.0;
        let mut y = 0.0;
        for (i, w) in row {
            x += w * self.controlpoints[i].x;
            y += w * self.controlpoints[i].y;
        }
        Point2::new(x, y)
    }
}

/// Degree used for B-spline curves: cubic, reduced for short control polygons.
fn bspline_degree(num_controlpoints: usize) -> usize {
    3.min(num_controlpoints - 1)
}

/// Clamped uniform knot vector on [0, 1] for n control points of the given degree.
fn clamped_knots(n: usize, degree: usize) -> Vec<f64> {
    let mut knots = Vec::with_capacity(n + degree + 1);
    let interior = n - degree;
    for _ in 0..=degree {
        knots.push(0.0);
    }
    for i in 1..interior {
        knots.push(i as f64 / interior as f64);
    }
    for _ in 0..=degree {
        knots.push(1.0);
    }
    knots
}

/// Find the knot span index for parameter t.
fn find_span(knots: &[f64], n: usize, degree: usize, t: f64) -> usize {
    if t >= knots[n] {
        return n - 1;
    }
    if t <= knots[degree] {
        return degree;
    }
    let mut low = degree;
    let mut high = n;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Nonzero B-spline basis values at t, as (control index, weight) pairs.
fn bspline_basis_row(knots: &[f64], n: usize, degree: usize, t: f64) -> Vec<(usize, f64)> {
    let span = find_span(knots, n, degree, t);
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    values[0] = 1.0;
    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = values[r] / (right[r + 1] + left[j - r]);
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    values
        .into_iter()
        .enumerate()
        .map(|(j, w)| (span - degree + j, w))
        .collect()
}

fn binomial(n: usize, k: usize) -> f64 {
    let mut result = 1.0;
    for i in 0..k {
        result *= (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// Basis weight of control point i at parameter t for the given family.
fn basis_weight(kind: CurveKind, n: usize, i: usize, t: f64) -> f64 {
    match kind {
        CurveKind::Linear => {
            // Hat function over uniform breakpoints.
            let scaled = t * (n - 1) as f64;
            let d = (scaled - i as f64).abs();
            (1.0 - d).max(0.0)
        }
        CurveKind::Bezier => {
            let deg = n - 1;
            binomial(deg, i) * t.powi(i as i32) * (1.0 - t).powi((deg - i) as i32)
        }
        CurveKind::BSpline => {
            let degree = bspline_degree(n);
            let knots = clamped_knots(n, degree);
            bspline_basis_row(&knots, n, degree, t)
                .into_iter()
                .find(|(j, _)| *j == i)
                .map(|(_, w)| w)
                .unwrap_or(0.0)
        }
    }
}

/// Least-squares fit of `num_controlpoints` control points of the given
/// family through the sample sequence, with both endpoints pinned.
fn fit(
    samples: &[Point2<f64>],
    num_controlpoints: usize,
    kind: CurveKind,
) -> Result<Vec<Point2<f64>>, GeomError> {
    let m = samples.len();
    let k = num_controlpoints;
    if k < 2 {
        return Err(GeomError::InvalidCurve {
            reason: format!("need at least 2 control points, got {}", k),
        });
    }
    let first = samples[0];
    let last = samples[m - 1];
    if k == 2 {
        return Ok(vec![first, last]);
    }

    // Basis matrix over all samples, endpoint columns separated out.
    let mut interior = DMatrix::<f64>::zeros(m, k - 2);
    let mut rhs = DMatrix::<f64>::zeros(m, 2);
    let last_param = (m - 1) as f64;
    for j in 0..m {
        let t = j as f64 / last_param;
        let w_first = basis_weight(kind, k, 0, t);
        let w_last = basis_weight(kind, k, k - 1, t);
        for i in 1..k - 1 {
            interior[(j, i - 1)] = basis_weight(kind, k, i, t);
        }
        rhs[(j, 0)] = samples[j].x - w_first * first.x - w_last * last.x;
        rhs[(j, 1)] = samples[j].y - w_first * first.y - w_last * last.y;
    }

    let svd = interior.svd(true, true);
    let solution = svd.solve(&rhs, 1e-12).map_err(|e| GeomError::InvalidCurve {
        reason: format!("least-squares refit failed: {}", e),
    })?;

    let mut result = Vec::with_capacity(k);
    result.push(first);
    for i in 0..k - 2 {
        result.push(Point2::new(solution[(i, 0)], solution[(i, 1)]));
    }
    result.push(last);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight(kind: CurveKind) -> ControlCurve {
        ControlCurve::new(
            vec![Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)],
            kind,
        )
        .unwrap()
    }

    #[test]
    fn test_too_few_controlpoints_rejected() {
        let r = ControlCurve::new(vec![Point2::new(0.0, 0.0)], CurveKind::Linear);
        assert!(matches!(r, Err(GeomError::InvalidCurve { .. })));
    }

    #[test]
    fn test_sequence_endpoints_exact() {
        for kind in [CurveKind::Linear, CurveKind::Bezier, CurveKind::BSpline] {
            let c = straight(kind);
            let seq = c.get_sequence(80).unwrap();
            assert_eq!(seq.len(), 80);
            assert_relative_eq!(seq[0].x, 0.0, epsilon = 1e-12);
            assert_relative_eq!(seq[0].y, 0.0, epsilon = 1e-12);
            assert_relative_eq!(seq[79].x, 2.0, epsilon = 1e-12);
            assert_relative_eq!(seq[79].y, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_two_point_curves_are_straight() {
        for kind in [CurveKind::Linear, CurveKind::Bezier, CurveKind::BSpline] {
            let c = straight(kind);
            let mid = c.evaluate(0.5);
            assert_relative_eq!(mid.x, 1.0, epsilon = 1e-10);
            assert_relative_eq!(mid.y, 0.5, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_bezier_matches_control_polygon_hull() {
        let c = ControlCurve::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 2.0),
                Point2::new(2.0, 0.0),
            ],
            CurveKind::Bezier,
        )
        .unwrap();
        // Quadratic bezier apex is at half the control height.
        let apex = c.evaluate(0.5);
        assert_relative_eq!(apex.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(apex.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_x() {
        let c = straight(CurveKind::Linear);
        let y = c.interpolate_x(1.0).unwrap();
        assert_relative_eq!(y, 0.5, epsilon = 1e-10);
        // Clamped outside the range.
        assert_relative_eq!(c.interpolate_x(-5.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.interpolate_x(99.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_kind_pins_endpoints() {
        let mut c = ControlCurve::new(
            vec![
                Point2::new(0.0, 0.1),
                Point2::new(1.0, 0.4),
                Point2::new(2.0, 0.3),
                Point2::new(3.0, 0.2),
            ],
            CurveKind::Bezier,
        )
        .unwrap();
        c.set_kind(CurveKind::BSpline).unwrap();
        assert_eq!(c.kind(), CurveKind::BSpline);
        assert_eq!(c.numpoints(), 4);
        assert_relative_eq!(c.controlpoints()[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.controlpoints()[3].x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(c.controlpoints()[3].y, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_set_kind_preserves_shape_closely() {
        let mut c = ControlCurve::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 1.0),
                Point2::new(3.0, 0.0),
            ],
            CurveKind::BSpline,
        )
        .unwrap();
        let before = c.get_sequence(50).unwrap();
        c.set_kind(CurveKind::Bezier).unwrap();
        let after = c.get_sequence(50).unwrap();
        let max_dev = before
            .iter()
            .zip(&after)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0f64, f64::max);
        assert!(max_dev < 0.1, "refit deviated too far: {}", max_dev);
    }

    #[test]
    fn test_set_numpoints_refits() {
        let mut c = ControlCurve::new(
            vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.2)],
            CurveKind::Bezier,
        )
        .unwrap();
        c.set_numpoints(5).unwrap();
        assert_eq!(c.numpoints(), 5);
        assert_relative_eq!(c.controlpoints()[4].x, 4.0, epsilon = 1e-12);
        // The traced curve is still (nearly) the same straight line.
        let mid = c.evaluate(0.5);
        assert_relative_eq!(mid.y, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_preview_is_bounded() {
        let c = straight(CurveKind::BSpline);
        assert_eq!(c.sequence_preview().len(), SAMPLES_ON_DRAG);
        assert_eq!(c.sequence_final().len(), SAMPLES_ON_RELEASE);
    }
}
