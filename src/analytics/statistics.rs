/// Aggregate statistics over the metric values of one analysis run.
///
/// Every field is optional: a statistic that cannot be computed from the
/// available values is simply absent, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Population standard deviation; 0.0 for a single sample.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
}

impl Statistics {
    /// Computes the full set of aggregates. An empty slice yields the
    /// all-absent default.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let std_dev = if values.len() < 2 {
            0.0
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            variance.sqrt()
        };

        Self {
            mean: Some(mean),
            median: Some(median),
            std_dev: Some(std_dev),
            min: Some(min),
            max: Some(max),
            range: Some(max - min),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_none()
    }
}
