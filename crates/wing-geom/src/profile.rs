use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::distribution::{distribution, DistributionKind};
use crate::error::GeomError;

/// A 2D airfoil cross-section.
///
/// The contour runs from the trailing edge over the upper surface to the
/// nose and back along the lower surface to the trailing edge; the nose is
/// the point of minimum x. Profiles are immutable value objects: every
/// transform returns a new instance, which keeps feature-stack layering
/// correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile2D {
    name: String,
    data: Vec<Point2<f64>>,
}

/// Parameters for converting a rib profile to a single-skin contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSkinParams {
    /// Chordwise spacing of the attachment points.
    pub att_dist: f64,
    /// Sag of the skin between attachments, as a fraction of segment length.
    pub height: f64,
    /// Interior points generated per skin segment.
    pub num_points: usize,
    /// Keep the leading-edge segment on the original contour.
    pub le_gap: bool,
    /// Keep the trailing-edge segment on the original contour.
    pub te_gap: bool,
}

impl Default for SingleSkinParams {
    fn default() -> Self {
        Self {
            att_dist: 0.1,
            height: 0.5,
            num_points: 20,
            le_gap: true,
            te_gap: true,
        }
    }
}

impl Profile2D {
    pub fn new(name: impl Into<String>, data: Vec<Point2<f64>>) -> Result<Self, GeomError> {
        if data.len() < 4 {
            return Err(GeomError::InvalidParameter {
                name: "profile_data",
                reason: format!("need at least 4 contour points, got {}", data.len()),
            });
        }
        let profile = Self {
            name: name.into(),
            data,
        };
        let nose = profile.nose_index();
        if nose == 0 || nose == profile.data.len() - 1 {
            return Err(GeomError::InvalidParameter {
                name: "profile_data",
                reason: "nose (minimum x) must be an interior contour point".to_string(),
            });
        }
        Ok(profile)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[Point2<f64>] {
        &self.data
    }

    pub fn numpoints(&self) -> usize {
        self.data.len()
    }

    /// Index of the nose: the contour point with minimum x.
    pub fn nose_index(&self) -> usize {
        let mut best = 0;
        for (i, p) in self.data.iter().enumerate() {
            if p.x < self.data[best].x {
                best = i;
            }
        }
        best
    }

    /// Upper surface, trailing edge to nose (inclusive).
    pub fn upper(&self) -> &[Point2<f64>] {
        &self.data[..=self.nose_index()]
    }

    /// Lower surface, nose (inclusive) to trailing edge.
    pub fn lower(&self) -> &[Point2<f64>] {
        &self.data[self.nose_index()..]
    }

    /// Translate and scale so the nose sits at x = 0 and the chord is 1.
    pub fn normalized(&self) -> Result<Self, GeomError> {
        let nose = self.data[self.nose_index()];
        let te_x = (self.data[0].x + self.data[self.data.len() - 1].x) / 2.0;
        let chord = te_x - nose.x;
        if crate::Tolerance::default().is_zero_length(chord) {
            return Err(GeomError::DegenerateGeometry {
                stage: "profile",
                index: 0,
                reason: format!("profile '{}' has zero chord", self.name),
            });
        }
        let data = self
            .data
            .iter()
            .map(|p| Point2::new((p.x - nose.x) / chord, p.y / chord))
            .collect();
        Self::new(self.name.clone(), data)
    }

    /// Resample to `n` contour points via arc-length parametrization with
    /// cosine clustering toward the nose and trailing edge.
    ///
    /// Leading and trailing edge landmarks are preserved exactly; repeated
    /// resampling with the same n reproduces the points within floating
    /// tolerance.
    pub fn resample(&self, n: usize) -> Result<Self, GeomError> {
        self.resample_with(n, DistributionKind::Cosine)
    }

    /// Resample with an explicit clustering strategy per surface side.
    pub fn resample_with(&self, n: usize, kind: DistributionKind) -> Result<Self, GeomError> {
        if n < 5 {
            return Err(GeomError::InvalidParameter {
                name: "n",
                reason: format!("need at least 5 profile points, got {}", n),
            });
        }
        let upper_count = (n + 1) / 2;
        let lower_count = n + 1 - upper_count;
        // Both sides are resampled nose-first so nose-clustered strategies
        // densify toward the leading edge on either surface.
        let mut upper_reversed: Vec<Point2<f64>> = self.upper().to_vec();
        upper_reversed.reverse();
        let mut data = resample_side(&upper_reversed, upper_count, kind)?;
        data.reverse();
        let lower = resample_side(self.lower(), lower_count, kind)?;
        data.extend_from_slice(&lower[1..]);
        Self::new(self.name.clone(), data)
    }

    /// Interpolated upper-surface y at chordwise position x.
    pub fn upper_y_at(&self, x: f64) -> f64 {
        interpolate_side(self.upper(), x)
    }

    /// Interpolated lower-surface y at chordwise position x.
    pub fn lower_y_at(&self, x: f64) -> f64 {
        interpolate_side(self.lower(), x)
    }

    /// True when the upper and lower contours coincide, i.e. the profile is
    /// a pure camber line with no enclosed area. Such ribs are skipped by
    /// solid meshing.
    pub fn zero_thickness(&self) -> bool {
        self.thickness() < crate::Tolerance::default().thickness
    }

    /// Maximum distance between the upper and lower contour.
    pub fn thickness(&self) -> f64 {
        let mut max = 0.0f64;
        for p in self.upper() {
            let d = (p.y - self.lower_y_at(p.x)).abs();
            max = max.max(d);
        }
        for p in self.lower() {
            let d = (self.upper_y_at(p.x) - p.y).abs();
            max = max.max(d);
        }
        max
    }

    /// Enclosed contour area (shoelace formula).
    pub fn area(&self) -> f64 {
        let mut sum = 0.0;
        for w in self.data.windows(2) {
            sum += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        let first = self.data[0];
        let last = self.data[self.data.len() - 1];
        sum += last.x * first.y - first.x * last.y;
        sum.abs() / 2.0
    }

    /// Mean line between the upper and lower surface, nose to trailing edge.
    pub fn camber_line(&self, n: usize) -> Result<Vec<Point2<f64>>, GeomError> {
        let xs = distribution(DistributionKind::Cosine, n)?;
        Ok(xs
            .into_iter()
            .map(|x| Point2::new(x, (self.upper_y_at(x) + self.lower_y_at(x)) / 2.0))
            .collect())
    }

    /// Deflect the lower surface aft of the hinge downward, ramping linearly
    /// to `amount` at the trailing edge.
    pub fn with_flap(&self, hinge: f64, amount: f64) -> Result<Self, GeomError> {
        if !(0.0 < hinge && hinge < 1.0) {
            return Err(GeomError::InvalidParameter {
                name: "hinge",
                reason: format!("flap hinge must lie in (0, 1), got {}", hinge),
            });
        }
        let nose = self.nose_index();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i > nose && p.x > hinge {
                    let ramp = (p.x - hinge) / (1.0 - hinge);
                    Point2::new(p.x, p.y - amount * ramp)
                } else {
                    *p
                }
            })
            .collect();
        Self::new(self.name.clone(), data)
    }

    /// Apply a shark-gill deformation to the lower surface: a piecewise
    /// linear bump ramping up between x1..x2 and back down between x2..x3,
    /// applied only to points with y < 0.
    pub fn with_shark_gill(
        &self,
        x1: f64,
        x2: f64,
        x3: f64,
        y_add: f64,
    ) -> Result<Self, GeomError> {
        if !(x1 < x2 && x2 < x3) {
            return Err(GeomError::InvalidParameter {
                name: "x1..x3",
                reason: format!("shark-gill fractions must satisfy x1 < x2 < x3, got {} {} {}", x1, x2, x3),
            });
        }
        let data = self
            .data
            .iter()
            .map(|p| {
                let mut y = p.y;
                if y < 0.0 {
                    if p.x > x1 && p.x < x2 {
                        y -= y_add * (p.x - x1) / (x2 - x1);
                    } else if p.x > x2 && p.x < x3 {
                        y -= y_add * (x3 - p.x) / (x3 - x2);
                    }
                }
                Point2::new(p.x, y)
            })
            .collect();
        Self::new(self.name.clone(), data)
    }

    /// Reprofile the lower surface for a single-skin rib: the upper contour
    /// is kept, the lower contour becomes skin segments hung between
    /// attachment points spaced `att_dist` apart, sagging by `height`.
    pub fn single_skin(&self, params: &SingleSkinParams) -> Result<Self, GeomError> {
        if !(0.0 < params.att_dist && params.att_dist <= 1.0) {
            return Err(GeomError::InvalidParameter {
                name: "att_dist",
                reason: format!("attachment distance must lie in (0, 1], got {}", params.att_dist),
            });
        }
        if params.height < 0.0 {
            return Err(GeomError::InvalidParameter {
                name: "height",
                reason: format!("sag height must be non-negative, got {}", params.height),
            });
        }

        let span = self.lower_x_span();
        let mut attachments = vec![span.0];
        let mut x = span.0 + params.att_dist * (span.1 - span.0);
        while x < span.1 - 1e-9 {
            attachments.push(x);
            x += params.att_dist * (span.1 - span.0);
        }
        attachments.push(span.1);

        let mut data: Vec<Point2<f64>> = self.upper().to_vec();
        let segment_count = attachments.len() - 1;
        for (seg, pair) in attachments.windows(2).enumerate() {
            let (xa, xb) = (pair[0], pair[1]);
            let keep_original = (seg == 0 && params.le_gap) || (seg == segment_count - 1 && params.te_gap);
            if keep_original {
                for p in self.lower() {
                    if p.x > xa + 1e-12 && p.x <= xb + 1e-12 {
                        data.push(*p);
                    }
                }
                continue;
            }
            let ya = self.lower_y_at(xa);
            let yb = self.lower_y_at(xb);
            let seg_len = xb - xa;
            for j in 1..=params.num_points {
                let t = j as f64 / (params.num_points + 1) as f64;
                let px = xa + seg_len * t;
                let py = ya + (yb - ya) * t - params.height * seg_len * t * (1.0 - t);
                data.push(Point2::new(px, py));
            }
            data.push(Point2::new(xb, yb));
        }
        Self::new(self.name.clone(), data)
    }

    fn lower_x_span(&self) -> (f64, f64) {
        let lower = self.lower();
        (lower[0].x, lower[lower.len() - 1].x)
    }

    /// True when any two non-adjacent contour segments cross.
    pub fn self_intersects(&self) -> bool {
        let n = self.data.len();
        for i in 0..n - 1 {
            for j in i + 2..n - 1 {
                if segments_cross(
                    self.data[i],
                    self.data[i + 1],
                    self.data[j],
                    self.data[j + 1],
                ) {
                    return true;
                }
            }
        }
        false
    }

    /// Generate a NACA 4-digit airfoil with `n` contour points.
    pub fn compute_naca(code: u32, n: usize) -> Result<Self, GeomError> {
        if code > 9999 {
            return Err(GeomError::InvalidParameter {
                name: "code",
                reason: format!("expected a 4-digit NACA code, got {}", code),
            });
        }
        let m = ((code / 1000) % 10) as f64 / 100.0;
        let p = ((code / 100) % 10) as f64 / 10.0;
        let t = (code % 100) as f64 / 100.0;

        let upper_count = (n + 1) / 2;
        let lower_count = n + 1 - upper_count;
        let xs_upper = distribution(DistributionKind::Cosine, upper_count)?;
        let xs_lower = distribution(DistributionKind::Cosine, lower_count)?;

        let surface = |x: f64, upper: bool| -> Point2<f64> {
            let yt = 5.0
                * t
                * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x * x + 0.2843 * x * x * x
                    - 0.1036 * x * x * x * x);
            let (yc, dyc) = if p > 0.0 && x < p {
                (
                    m / (p * p) * (2.0 * p * x - x * x),
                    2.0 * m / (p * p) * (p - x),
                )
            } else if p > 0.0 {
                (
                    m / ((1.0 - p) * (1.0 - p)) * (1.0 - 2.0 * p + 2.0 * p * x - x * x),
                    2.0 * m / ((1.0 - p) * (1.0 - p)) * (p - x),
                )
            } else {
                (0.0, 0.0)
            };
            let theta = dyc.atan();
            if upper {
                Point2::new(x - yt * theta.sin(), yc + yt * theta.cos())
            } else {
                Point2::new(x + yt * theta.sin(), yc - yt * theta.cos())
            }
        };

        // Trailing edge -> nose along the upper surface, then back.
        let mut data: Vec<Point2<f64>> =
            xs_upper.iter().rev().map(|&x| surface(x, true)).collect();
        data.extend(xs_lower.iter().skip(1).map(|&x| surface(x, false)));
        Self::new(format!("naca{:04}", code), data)
    }

    /// Maximum pointwise deviation from another profile with the same count.
    pub fn max_deviation(&self, other: &Self) -> Result<f64, GeomError> {
        if self.data.len() != other.data.len() {
            return Err(GeomError::InvalidParameter {
                name: "other",
                reason: format!(
                    "point counts differ: {} vs {}",
                    self.data.len(),
                    other.data.len()
                ),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }
}

/// Resample one surface side to `count` points at clustered arc fractions.
/// Endpoints are copied exactly.
fn resample_side(
    side: &[Point2<f64>],
    count: usize,
    kind: DistributionKind,
) -> Result<Vec<Point2<f64>>, GeomError> {
    if side.len() < 2 {
        return Err(GeomError::InvalidParameter {
            name: "side",
            reason: "surface side needs at least 2 points".to_string(),
        });
    }
    let mut cumulative = Vec::with_capacity(side.len());
    cumulative.push(0.0);
    for w in side.windows(2) {
        let last = *cumulative.last().unwrap_or(&0.0);
        cumulative.push(last + (w[1] - w[0]).norm());
    }
    let total = cumulative[cumulative.len() - 1];
    if total < 1e-12 {
        return Err(GeomError::InvalidParameter {
            name: "side",
            reason: "surface side has zero length".to_string(),
        });
    }

    let fractions = distribution(kind, count)?;
    let mut result = Vec::with_capacity(count);
    let mut seg = 0usize;
    for f in fractions {
        let target = f * total;
        while seg < side.len() - 2 && cumulative[seg + 1] < target {
            seg += 1;
        }
        let seg_len = cumulative[seg + 1] - cumulative[seg];
        let local = if seg_len < 1e-15 {
            0.0
        } else {
            (target - cumulative[seg]) / seg_len
        };
        let a = side[seg];
        let b = side[seg + 1];
        result.push(Point2::new(
            a.x + (b.x - a.x) * local,
            a.y + (b.y - a.y) * local,
        ));
    }
    result[0] = side[0];
    result[count - 1] = side[side.len() - 1];
    Ok(result)
}

/// Interpolate y at x along one surface side, scanning segments for the
/// bracketing pair. Outside the side's x range the end value is returned.
fn interpolate_side(side: &[Point2<f64>], x: f64) -> f64 {
    for w in side.windows(2) {
        let (lo, hi) = if w[0].x <= w[1].x {
            (w[0], w[1])
        } else {
            (w[1], w[0])
        };
        if lo.x <= x && x <= hi.x {
            let dx = hi.x - lo.x;
            if dx < 1e-15 {
                return lo.y;
            }
            return lo.y + (hi.y - lo.y) * (x - lo.x) / dx;
        }
    }
    // No bracketing segment: clamp to the nearer end.
    let first = side[0];
    let last = side[side.len() - 1];
    if (x - first.x).abs() < (x - last.x).abs() {
        first.y
    } else {
        last.y
    }
}

fn segments_cross(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    let orient = |p: Point2<f64>, q: Point2<f64>, r: Point2<f64>| -> f64 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    };
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn simple_profile() -> Profile2D {
        Profile2D::new(
            "simple",
            vec![
                Point2::new(1.0, 0.1),
                Point2::new(0.5, 0.12),
                Point2::new(0.0, 0.0),
                Point2::new(0.3, -0.2),
                Point2::new(1.0, -0.01),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_nose_index() {
        let p = simple_profile();
        assert_eq!(p.nose_index(), 2);
        assert_eq!(p.upper().len(), 3);
        assert_eq!(p.lower().len(), 3);
    }

    #[test]
    fn test_new_rejects_boundary_nose() {
        let r = Profile2D::new(
            "bad",
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(0.5, 0.1),
                Point2::new(1.0, 0.05),
                Point2::new(0.5, -0.1),
            ],
        );
        assert!(matches!(r, Err(GeomError::InvalidParameter { .. })));
    }

    #[test]
    fn test_naca_profile_shape() {
        let p = Profile2D::compute_naca(2412, 81).unwrap();
        assert_eq!(p.numpoints(), 81);
        // Nose at x ~ 0, trailing edge at x ~ 1.
        assert!(p.data()[p.nose_index()].x.abs() < 1e-6);
        assert_relative_eq!(p.data()[0].x, 1.0, epsilon = 1e-9);
        // A 12% thick airfoil: max thickness near 0.12.
        let t = p.thickness();
        assert!((0.10..0.14).contains(&t), "thickness {}", t);
        assert!(!p.zero_thickness());
        assert!(!p.self_intersects());
    }

    #[test]
    fn test_resample_preserves_landmarks() {
        let p = Profile2D::compute_naca(2412, 121).unwrap();
        let r = p.resample(41).unwrap();
        assert_eq!(r.numpoints(), 41);
        assert_relative_eq!(r.data()[0].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(r.data()[40].x, 1.0, epsilon = 1e-9);
        assert!(r.data()[r.nose_index()].x.abs() < 1e-6);
    }

    #[test]
    fn test_resample_idempotent() {
        let p = Profile2D::compute_naca(2412, 121).unwrap();
        let once = p.resample(41).unwrap();
        let twice = once.resample(41).unwrap();
        let dev = once.max_deviation(&twice).unwrap();
        assert!(dev < 2e-3, "resample drifted by {}", dev);
    }

    #[test]
    fn test_flap_deflects_lower_aft_points() {
        let p = simple_profile();
        let flapped = p.with_flap(0.2, 0.1).unwrap();
        // Lower point at x=0.3 moves down by 0.1 * (0.3-0.2)/0.8.
        let expected = -0.2 - 0.1 * (0.3 - 0.2) / 0.8;
        assert_relative_eq!(flapped.data()[3].y, expected, epsilon = 1e-12);
        // Upper surface untouched.
        assert_relative_eq!(flapped.data()[1].y, 0.12, epsilon = 1e-12);
        // Source profile untouched (value semantics).
        assert_relative_eq!(p.data()[3].y, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_flap_rejects_bad_hinge() {
        let p = simple_profile();
        assert!(p.with_flap(0.0, 0.1).is_err());
        assert!(p.with_flap(1.0, 0.1).is_err());
        assert!(p.with_flap(1.5, 0.1).is_err());
    }

    #[test]
    fn test_shark_gill_ramp_down_region() {
        let p = simple_profile();
        let gilled = p.with_shark_gill(0.1, 0.11, 0.5, 0.1).unwrap();
        // x=0.3 lies in the x2..x3 ramp-down region.
        let expected = -0.2 - 0.1 * (0.5 - 0.3) / (0.5 - 0.11);
        assert_relative_eq!(gilled.data()[3].y, expected, epsilon = 1e-12);
        // Positive-y points are never touched.
        assert_relative_eq!(gilled.data()[1].y, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_shark_gill_rejects_unordered_fractions() {
        let p = simple_profile();
        let r = p.with_shark_gill(0.5, 0.11, 0.1, 0.1);
        assert!(matches!(r, Err(GeomError::InvalidParameter { .. })));
        // Validate-then-apply: nothing changed.
        assert_relative_eq!(p.data()[3].y, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_single_skin_sags_below_chord() {
        let p = Profile2D::compute_naca(2412, 81).unwrap();
        let params = SingleSkinParams {
            att_dist: 0.25,
            height: 0.5,
            num_points: 8,
            le_gap: false,
            te_gap: false,
        };
        let ss = p.single_skin(&params).unwrap();
        // Upper surface preserved exactly.
        assert_eq!(ss.upper().len(), p.upper().len());
        // A mid-segment point sags below the straight line between attachments.
        let xa = 0.25;
        let xb = 0.5;
        let straight_mid = (p.lower_y_at(xa) + p.lower_y_at(xb)) / 2.0;
        let mid = ss.lower_y_at((xa + xb) / 2.0);
        assert!(
            mid < straight_mid,
            "skin should sag: {} >= {}",
            mid,
            straight_mid
        );
    }

    #[test]
    fn test_single_skin_reapplication_uses_new_params() {
        let p = Profile2D::compute_naca(2412, 81).unwrap();
        let a = p
            .single_skin(&SingleSkinParams {
                height: 0.2,
                ..Default::default()
            })
            .unwrap();
        let b = p
            .single_skin(&SingleSkinParams {
                height: 0.8,
                ..Default::default()
            })
            .unwrap();
        // Conversions derive from the same base, not from each other.
        assert!(a != b);
    }

    #[test]
    fn test_zero_thickness_camber_only() {
        // Upper and lower contour on the same line.
        let p = Profile2D::new(
            "skin",
            vec![
                Point2::new(1.0, 0.0),
                Point2::new(0.5, 0.05),
                Point2::new(0.0, 0.0),
                Point2::new(0.5, 0.05),
                Point2::new(1.0, 0.0),
            ],
        )
        .unwrap();
        assert!(p.zero_thickness());
        assert!(!simple_profile().zero_thickness());
    }

    #[test]
    fn test_self_intersection_detected() {
        let p = Profile2D::new(
            "crossed",
            vec![
                Point2::new(1.0, 0.1),
                Point2::new(0.2, -0.15),
                Point2::new(0.0, 0.0),
                Point2::new(0.3, 0.2),
                Point2::new(1.0, -0.1),
            ],
        )
        .unwrap();
        assert!(p.self_intersects());
    }

    #[test]
    fn test_area_positive() {
        let p = Profile2D::compute_naca(12, 81).unwrap();
        assert!(p.area() > 0.01);
    }

    #[test]
    fn test_normalized() {
        let p = Profile2D::new(
            "wide",
            vec![
                Point2::new(2.0, 0.2),
                Point2::new(1.0, 0.24),
                Point2::new(0.0, 0.0),
                Point2::new(0.6, -0.4),
                Point2::new(2.0, -0.02),
            ],
        )
        .unwrap();
        let n = p.normalized().unwrap();
        assert_relative_eq!(n.data()[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.data()[n.nose_index()].x, 0.0, epsilon = 1e-12);
    }
}
