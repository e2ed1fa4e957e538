//! Trend chart geometry.
//!
//! Values are min-max rescaled onto the canvas (minimum on the baseline,
//! maximum on the top edge) and joined by a piecewise quadratic curve. The
//! resulting path is closed along the baseline so it can be filled.

use thiserror::Error;

/// Canvas-space coordinate, origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2D),
    LineTo(Point2D),
    QuadTo { control: Point2D, to: Point2D },
    Close,
}

/// Closed silhouette: baseline, smoothed curve through the points, baseline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmoothPath {
    pub commands: Vec<PathCommand>,
}

impl SmoothPath {
    /// Every point the path passes through or uses as a control
    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.commands.iter().flat_map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadTo { control, to } => vec![control, to],
            PathCommand::Close => Vec::new(),
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("no values to chart")]
    EmptySeries,
    #[error("value at index {index} is not finite")]
    NonFiniteValue { index: usize },
    #[error("invalid canvas {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// Map values onto the canvas.
///
/// A series without spread (all values equal, or a single value) becomes a
/// flat line at mid-height; a single value is stretched across the full width.
pub fn normalize_points(
    values: &[f64],
    width: f64,
    height: f64,
) -> Result<Vec<Point2D>, ChartError> {
    if !(width.is_finite() && height.is_finite()) || width <= 1.0 || height <= 0.0 {
        return Err(ChartError::InvalidCanvas { width, height });
    }
    if values.is_empty() {
        return Err(ChartError::EmptySeries);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ChartError::NonFiniteValue { index });
    }

    if values.len() == 1 {
        let mid = height / 2.0;
        return Ok(vec![Point2D::new(0.0, mid), Point2D::new(width, mid)]);
    }

    // Halved operands keep the spread finite for values near f64::MAX
    let half_min = values.iter().copied().fold(f64::INFINITY, f64::min) / 2.0;
    let half_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) / 2.0;
    let half_range = half_max - half_min;
    let steps = (values.len() - 1) as f64;

    let points = values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            // Multiply before dividing so the last point lands on `width` exactly
            let x = i as f64 * width / steps;
            let y = if half_range == 0.0 {
                height / 2.0
            } else {
                height - ((value / 2.0 - half_min) / half_range) * height
            };
            Point2D::new(x, y)
        })
        .collect();

    Ok(points)
}

/// Build the closed fill path for a chronologically ordered value sequence
pub fn build_smooth_fill_path(
    values: &[f64],
    width: f64,
    height: f64,
) -> Result<SmoothPath, ChartError> {
    let points = normalize_points(values, width, height)?;
    Ok(smooth_fill_path(&points, width, height))
}

fn smooth_fill_path(points: &[Point2D], width: f64, height: f64) -> SmoothPath {
    let mut commands = Vec::with_capacity(points.len() * 2 + 3);

    commands.push(PathCommand::MoveTo(Point2D::new(0.0, height)));
    commands.push(PathCommand::LineTo(points[0]));

    for pair in points.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let avg = current.midpoint(next);
        let cp1 = Point2D::new((avg.x + current.x) / 2.0, current.y);
        let cp2 = Point2D::new((avg.x + next.x) / 2.0, next.y);

        commands.push(PathCommand::QuadTo { control: cp1, to: avg });
        commands.push(PathCommand::QuadTo { control: cp2, to: next });
    }

    commands.push(PathCommand::LineTo(Point2D::new(width, height)));
    commands.push(PathCommand::Close);

    SmoothPath { commands }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 400.0;
    const H: f64 = 120.0;

    #[test]
    fn test_scenario_points() {
        let points = normalize_points(&[10.0, 12.0, 11.0, 15.0], W, H).unwrap();

        assert_eq!(points[0], Point2D::new(0.0, 120.0));
        assert_eq!(points[3], Point2D::new(400.0, 0.0));
        assert_eq!(points[1].y, 120.0 - (2.0 / 5.0) * 120.0);
    }

    #[test]
    fn test_baseline_endpoints() {
        let path = build_smooth_fill_path(&[10.0, 12.0, 11.0, 15.0], W, H).unwrap();

        assert_eq!(path.commands.first(), Some(&PathCommand::MoveTo(Point2D::new(0.0, H))));
        let n = path.commands.len();
        assert_eq!(path.commands[n - 2], PathCommand::LineTo(Point2D::new(W, H)));
        assert_eq!(path.commands[n - 1], PathCommand::Close);
    }

    #[test]
    fn test_points_stay_on_canvas() {
        let values = [3.2, -1.0, 7.5, 7.4, 0.0, 2.2, 6.9];
        let points = normalize_points(&values, W, H).unwrap();

        for p in &points {
            assert!((0.0..=H).contains(&p.y), "y out of range: {}", p.y);
            assert!((0.0..=W).contains(&p.x), "x out of range: {}", p.x);
        }
        assert_eq!(points[1].y, H);
        assert_eq!(points[2].y, 0.0);

        let path = build_smooth_fill_path(&values, W, H).unwrap();
        assert!(path.points().all(|p| (0.0..=H).contains(&p.y)));
    }

    #[test]
    fn test_extreme_magnitudes_stay_on_canvas() {
        let points = normalize_points(&[-1e308, 0.0, 1e308], W, H).unwrap();

        assert_eq!(points[0], Point2D::new(0.0, H));
        assert_eq!(points[1], Point2D::new(200.0, 60.0));
        assert_eq!(points[2], Point2D::new(W, 0.0));

        let path = build_smooth_fill_path(&[f64::MAX, -f64::MAX, f64::MAX], W, H).unwrap();
        assert!(path.points().all(|p| (0.0..=H).contains(&p.y)));
    }

    #[test]
    fn test_idempotent() {
        let values = [412.0, 415.0, 409.0, 420.0, 418.0];
        let first = build_smooth_fill_path(&values, W, H).unwrap();
        let second = build_smooth_fill_path(&values, W, H).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_points_single_iteration() {
        let path = build_smooth_fill_path(&[1.0, 2.0], W, H).unwrap();

        // move, line, two quads, line, close
        assert_eq!(path.commands.len(), 6);
        assert_eq!(
            path.commands[2],
            PathCommand::QuadTo {
                control: Point2D::new(100.0, H),
                to: Point2D::new(200.0, 60.0),
            }
        );
        assert_eq!(
            path.commands[3],
            PathCommand::QuadTo {
                control: Point2D::new(300.0, 0.0),
                to: Point2D::new(W, 0.0),
            }
        );
    }

    #[test]
    fn test_flat_series_mid_height() {
        let points = normalize_points(&[5.0, 5.0, 5.0], W, H).unwrap();
        assert!(points.iter().all(|p| p.y == 60.0));
        assert_eq!(points[2].x, W);

        let path = build_smooth_fill_path(&[5.0, 5.0, 5.0], W, H).unwrap();
        assert!(path.points().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_single_value_spans_width() {
        let points = normalize_points(&[7.0], W, H).unwrap();
        assert_eq!(points, vec![Point2D::new(0.0, 60.0), Point2D::new(W, 60.0)]);
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(build_smooth_fill_path(&[], W, H), Err(ChartError::EmptySeries));
        assert_eq!(
            build_smooth_fill_path(&[1.0, f64::NAN], W, H),
            Err(ChartError::NonFiniteValue { index: 1 })
        );
        assert!(matches!(
            build_smooth_fill_path(&[1.0, 2.0], 1.0, H),
            Err(ChartError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            build_smooth_fill_path(&[1.0, 2.0], W, 0.0),
            Err(ChartError::InvalidCanvas { .. })
        ));
    }
}
