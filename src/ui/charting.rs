use flick::time_series::ReactionPoint;

/// X (hit index) and Y (milliseconds) bounds for the reaction-time chart.
/// Y is rounded up to the next 100 ms so the top label reads cleanly.
pub fn compute_chart_params(points: &[ReactionPoint]) -> (f64, f64) {
    let last_index = points.last().map(|p| p.index).unwrap_or(1).max(2) as f64;
    let slowest = points.iter().map(|p| p.millis).max().unwrap_or(0);
    let ceiling = (slowest.div_ceil(100) * 100).max(100) as f64;

    (last_index, ceiling)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_chart_params_empty() {
        assert_eq!(compute_chart_params(&[]), (2.0, 100.0));
    }

    #[test]
    fn test_compute_chart_params_rounds_up() {
        let points = [
            ReactionPoint::new(1, 240),
            ReactionPoint::new(2, 512),
            ReactionPoint::new(3, 300),
        ];
        assert_eq!(compute_chart_params(&points), (3.0, 600.0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }
}
