use crate::core::types::Point;
use crate::error::{ChartError, ChartResult};

/// Largest angular step, in degrees, used when tessellating arcs.
pub const ARC_STEP_DEG: f64 = 3.0;

/// Fraction of each angular category sector left empty between polar bars.
pub const POLAR_BAR_GAP: f64 = 0.1;

/// Pixel-space polar coordinate frame.
///
/// Angles are degrees in the mathematical convention: 0 points east and
/// angles grow counter-clockwise. Screen y grows downward, so the sine term
/// is subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarFrame {
    center: Point,
    radius: f64,
}

impl PolarFrame {
    pub fn new(center: Point, radius: f64) -> ChartResult<Self> {
        if !center.is_finite() {
            return Err(ChartError::InvalidData(
                "polar center must be finite".to_owned(),
            ));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ChartError::InvalidData(
                "polar radius must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn center(self) -> Point {
        self.center
    }

    #[must_use]
    pub fn radius(self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn point(self, angle_deg: f64, radius_px: f64) -> Point {
        let angle = angle_deg.to_radians();
        Point::new(
            self.center.x + radius_px * angle.cos(),
            self.center.y - radius_px * angle.sin(),
        )
    }

    /// Closed outline of an annular sector between two angles.
    ///
    /// A zero inner radius yields a pie slice that starts at the center.
    #[must_use]
    pub fn wedge(self, start_deg: f64, end_deg: f64, inner_px: f64, outer_px: f64) -> Vec<Point> {
        let outer = arc_angles(start_deg, end_deg);
        let mut points: Vec<Point> = outer
            .iter()
            .map(|angle| self.point(*angle, outer_px))
            .collect();
        if inner_px <= 0.0 {
            points.push(self.center);
        } else {
            points.extend(outer.iter().rev().map(|angle| self.point(*angle, inner_px)));
        }
        points
    }

    /// Points along a full circle, first point not repeated.
    #[must_use]
    pub fn ring(self, radius_px: f64) -> Vec<Point> {
        let mut angles = arc_angles(0.0, 360.0);
        angles.pop();
        angles
            .into_iter()
            .map(|angle| self.point(angle, radius_px))
            .collect()
    }
}

/// Evenly spaced angles for `count` categories, first category at 0 degrees.
#[must_use]
pub fn category_angles(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let sector = 360.0 / count as f64;
    (0..count).map(|index| sector * index as f64).collect()
}

#[must_use]
pub fn category_sector_deg(count: usize) -> f64 {
    if count == 0 { 360.0 } else { 360.0 / count as f64 }
}

fn arc_angles(start_deg: f64, end_deg: f64) -> Vec<f64> {
    let span = end_deg - start_deg;
    let steps = ((span.abs() / ARC_STEP_DEG).ceil() as usize).max(1);
    (0..=steps)
        .map(|step| start_deg + span * step as f64 / steps as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PolarFrame, category_angles};
    use crate::core::types::Point;

    #[test]
    fn zero_degrees_points_east_and_ninety_points_up() {
        let frame = PolarFrame::new(Point::new(100.0, 100.0), 50.0).expect("frame");
        let east = frame.point(0.0, 50.0);
        let up = frame.point(90.0, 50.0);
        assert!((east.x - 150.0).abs() < 1e-9 && (east.y - 100.0).abs() < 1e-9);
        assert!((up.x - 100.0).abs() < 1e-9 && (up.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn pie_wedge_closes_through_center() {
        let frame = PolarFrame::new(Point::new(0.0, 0.0), 10.0).expect("frame");
        let wedge = frame.wedge(0.0, 90.0, 0.0, 10.0);
        assert_eq!(wedge.last().copied(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn category_angles_split_full_turn() {
        assert_eq!(category_angles(4), vec![0.0, 90.0, 180.0, 270.0]);
        assert!(category_angles(0).is_empty());
    }
}
