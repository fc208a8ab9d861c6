use bunnybash::difficulty::TOTAL_DURATION;
use bunnybash::time_series::ScorePoint;

/// X (seconds) and Y (score) bounds for the results chart.
/// The Y range always contains zero so gains and losses read at a glance.
pub fn compute_chart_params(points: &[ScorePoint]) -> (f64, f64, f64) {
    let (lowest, highest) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), p| (lo.min(p.score), hi.max(p.score)));

    let duration = points
        .last()
        .map(|p| p.t)
        .unwrap_or(TOTAL_DURATION as f64)
        .max(1.0);

    // keep a flat all-zero run from collapsing the axis
    let highest = if highest == lowest { lowest + 10.0 } else { highest };

    (duration, lowest, highest)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
