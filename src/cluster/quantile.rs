/// Five number summary of a numeric sample
///
/// `q1` and `q3` are the medians of the lower and upper halves of the sorted
/// sample. When the sample length is odd the median itself belongs to
/// neither half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantiles {
    pub min: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub max: f64,
}

impl Quantiles {
    /// Computes the summary, `None` for an empty sample
    ///
    /// NaN values sort last and should be filtered by the caller.
    pub fn from_sample(data: &[f64]) -> Option<Quantiles> {
        if data.is_empty() {
            return None;
        }

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let q2 = median(&sorted);
        let (q1, q3) = if n == 1 {
            (q2, q2)
        } else {
            (median(&sorted[..n / 2]), median(&sorted[(n + 1) / 2..]))
        };

        Some(Quantiles {
            min: sorted[0],
            q1,
            q2,
            q3,
            max: sorted[n - 1],
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey upper fence, `q3 + 1.5 * IQR`
    pub fn upper_fence(&self) -> f64 {
        self.q3 + 1.5 * self.iqr()
    }
}

/// Tukey upper fence of a sample, `None` when the sample is empty
pub fn upper_fence(data: &[f64]) -> Option<f64> {
    Quantiles::from_sample(data).map(|q| q.upper_fence())
}

/// Median of a sorted, non-empty slice
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
