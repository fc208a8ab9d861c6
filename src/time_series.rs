/// Score sampled at one clock tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePoint {
    pub t: f64,
    pub score: f64,
}

impl ScorePoint {
    pub fn new(t: f64, score: f64) -> Self {
        Self { t, score }
    }
}

impl From<(f64, f64)> for ScorePoint {
    fn from(v: (f64, f64)) -> Self {
        ScorePoint { t: v.0, score: v.1 }
    }
}

impl From<ScorePoint> for (f64, f64) {
    fn from(p: ScorePoint) -> Self {
        (p.t, p.score)
    }
}
