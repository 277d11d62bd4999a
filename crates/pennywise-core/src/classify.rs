//! Category classifier
//!
//! Assigns a [`FinancialCategory`] to a point in (budget margin, spending)
//! space by testing which side of each boundary line it falls on.
//!
//! ## Convention
//!
//! Each boundary polyline contributes only its first two vertices, which
//! define an infinite line. The two vertices are ordered by ascending x (then
//! y) before the cross product, so "below" means the same thing whatever
//! order the backend lists them in. For a vertical line, "below" is the side
//! with larger x.
//!
//! - strictly below `saver_balanced` → `Saver`
//! - otherwise, not strictly below `balanced_overspender` → `Overspender`
//! - otherwise → `Balanced`
//!
//! A line with fewer than two vertices never reports "below". Missing
//! boundaries altogether classify everything as `Balanced`.

use std::collections::HashMap;

use crate::models::{BoundarySet, DatasetPoint, FinancialCategory, Point};

/// Signed area of the triangle (p1, p2, point)
///
/// Positive when `point` lies to the left of the directed line p1 → p2.
pub fn line_side(p1: Point, p2: Point, point: Point) -> f64 {
    (p2.x - p1.x) * (point.y - p1.y) - (p2.y - p1.y) * (point.x - p1.x)
}

/// Whether `point` lies strictly below the line through the first two
/// vertices of `line`
pub fn is_below(line: &[Point], point: Point) -> bool {
    let (a, b) = match line {
        [a, b, ..] => (*a, *b),
        _ => return false,
    };
    let (p1, p2) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
    line_side(p1, p2, point) < 0.0
}

/// Classify a point against the boundary lines
pub fn classify(point: Point, boundaries: Option<&BoundarySet>) -> FinancialCategory {
    let Some(boundaries) = boundaries else {
        return FinancialCategory::Balanced;
    };

    if is_below(&boundaries.saver_balanced, point) {
        FinancialCategory::Saver
    } else if !is_below(&boundaries.balanced_overspender, point) {
        FinancialCategory::Overspender
    } else {
        FinancialCategory::Balanced
    }
}

/// Result of relabelling a reference population with [`classify`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelabelReport {
    /// Points per locally assigned category
    pub counts: HashMap<FinancialCategory, usize>,
    /// Points whose backend label parses and matches the local category
    pub agreeing: usize,
    /// Points whose backend label parses but differs
    pub disagreeing: usize,
    /// Points whose backend label is not one of the three categories
    pub unlabelled: usize,
}

impl RelabelReport {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, category: FinancialCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Share of labelled points that agree, `None` without labelled points
    pub fn agreement(&self) -> Option<f64> {
        let labelled = self.agreeing + self.disagreeing;
        (labelled > 0).then(|| self.agreeing as f64 / labelled as f64)
    }
}

/// Classify every dataset point and compare with the backend's labels
pub fn classify_points(points: &[DatasetPoint], boundaries: Option<&BoundarySet>) -> RelabelReport {
    let mut report = RelabelReport::default();
    for point in points {
        let local = classify(point.point(), boundaries);
        *report.counts.entry(local).or_insert(0) += 1;
        match point.category() {
            Some(remote) if remote == local => report.agreeing += 1,
            Some(_) => report.disagreeing += 1,
            None => report.unlabelled += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn diagonal_boundaries() -> BoundarySet {
        BoundarySet {
            saver_balanced: vec![p(0.0, 0.0), p(1.0, 1.0)],
            balanced_overspender: vec![p(0.0, 2.0), p(1.0, 3.0)],
        }
    }

    #[test]
    fn test_line_side_sign() {
        assert!(line_side(p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0)) > 0.0);
        assert!(line_side(p(0.0, 0.0), p(1.0, 0.0), p(0.5, -1.0)) < 0.0);
        assert_eq!(line_side(p(0.0, 0.0), p(1.0, 1.0), p(3.0, 3.0)), 0.0);
    }

    #[test]
    fn test_far_above_both_lines_is_overspender() {
        let b = diagonal_boundaries();
        assert_eq!(classify(p(0.5, 5.0), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_three_regions() {
        let b = diagonal_boundaries();
        assert_eq!(classify(p(0.5, -1.0), Some(&b)), FinancialCategory::Saver);
        assert_eq!(classify(p(0.5, 1.5), Some(&b)), FinancialCategory::Balanced);
        assert_eq!(classify(p(0.5, 2.6), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_points_on_lines() {
        let b = diagonal_boundaries();
        // On the saver line: not below it, below the upper line
        assert_eq!(classify(p(2.0, 2.0), Some(&b)), FinancialCategory::Balanced);
        // On the overspender line: not below it
        assert_eq!(classify(p(2.0, 4.0), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        let reversed = BoundarySet {
            saver_balanced: vec![p(1.0, 1.0), p(0.0, 0.0)],
            balanced_overspender: vec![p(1.0, 3.0), p(0.0, 2.0)],
        };
        let b = diagonal_boundaries();
        for point in [p(0.5, -1.0), p(0.5, 1.5), p(0.5, 5.0), p(-3.0, 0.0)] {
            assert_eq!(classify(point, Some(&reversed)), classify(point, Some(&b)));
        }
    }

    #[test]
    fn test_extra_vertices_ignored() {
        let b = diagonal_boundaries();
        let mut extended = b.clone();
        extended.saver_balanced.extend([p(5.0, -40.0), p(0.0, 0.0)]);
        extended.balanced_overspender.extend([p(-7.0, 90.0)]);
        for point in [p(0.5, -1.0), p(0.5, 1.5), p(0.5, 5.0), p(10.0, 10.5)] {
            assert_eq!(classify(point, Some(&extended)), classify(point, Some(&b)));
        }
    }

    #[test]
    fn test_no_boundaries_is_balanced() {
        for point in [p(0.0, 0.0), p(-1e9, 1e9), p(1e9, -1e9)] {
            assert_eq!(classify(point, None), FinancialCategory::Balanced);
        }
    }

    #[test]
    fn test_missing_saver_line() {
        let b = BoundarySet {
            saver_balanced: vec![p(0.0, 0.0)],
            ..diagonal_boundaries()
        };
        // Would be a saver with both lines
        assert_eq!(classify(p(0.5, -1.0), Some(&b)), FinancialCategory::Balanced);
        assert_eq!(classify(p(0.5, 5.0), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_missing_overspender_line() {
        let b = BoundarySet {
            balanced_overspender: Vec::new(),
            ..diagonal_boundaries()
        };
        assert_eq!(classify(p(0.5, -1.0), Some(&b)), FinancialCategory::Saver);
        assert_eq!(classify(p(0.5, 1.5), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_total_on_degenerate_input() {
        let b = BoundarySet {
            saver_balanced: vec![p(1.0, 1.0), p(1.0, 1.0)],
            balanced_overspender: vec![p(0.0, 2.0), p(1.0, 3.0)],
        };
        // A zero-length line never reports below; NaN compares false
        assert_eq!(classify(p(0.0, 0.0), Some(&b)), FinancialCategory::Balanced);
        assert_eq!(
            classify(p(f64::NAN, 0.0), Some(&diagonal_boundaries())),
            FinancialCategory::Overspender
        );
    }

    #[test]
    fn test_vertical_line_below_is_right() {
        let b = BoundarySet {
            saver_balanced: vec![p(0.0, 0.0), p(0.0, 1.0)],
            balanced_overspender: Vec::new(),
        };
        assert_eq!(classify(p(1.0, 0.5), Some(&b)), FinancialCategory::Saver);
        assert_eq!(classify(p(-1.0, 0.5), Some(&b)), FinancialCategory::Overspender);
    }

    #[test]
    fn test_classify_points_report() {
        let b = diagonal_boundaries();
        let points = vec![
            DatasetPoint {
                label: "saver".into(),
                x: 0.5,
                y: -1.0,
                details: None,
            },
            DatasetPoint {
                label: "saver".into(),
                x: 0.5,
                y: 1.5,
                details: None,
            },
            DatasetPoint {
                label: "unknown".into(),
                x: 0.5,
                y: 5.0,
                details: None,
            },
        ];
        let report = classify_points(&points, Some(&b));
        assert_eq!(report.total(), 3);
        assert_eq!(report.count(FinancialCategory::Saver), 1);
        assert_eq!(report.count(FinancialCategory::Balanced), 1);
        assert_eq!(report.count(FinancialCategory::Overspender), 1);
        assert_eq!(report.agreeing, 1);
        assert_eq!(report.disagreeing, 1);
        assert_eq!(report.unlabelled, 1);
        assert_eq!(report.agreement(), Some(0.5));
    }
}
