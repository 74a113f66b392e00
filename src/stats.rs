use serde::Serialize;

// ---------------------------------------------------------------------------
// Basic reductions
// ---------------------------------------------------------------------------

/// Median of the values, averaging the two middle values for an even count.
/// `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Observed `(min, max)` of the values, `None` for an empty slice.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Quantile `q` (0..=1) of an already sorted, non-empty slice using linear
/// interpolation between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// `bins + 1` equally spaced edges covering `[min, max]`.
///
/// A zero-width range is widened to one unit centred on the value so that a
/// constant column still produces a visible bar.
pub fn equal_width_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    if bins == 0 {
        return Vec::new();
    }
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect()
}

/// Index of the bin that holds `value`. Bins are half-open except the last,
/// which also includes its right edge. `None` when outside the edges.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if bins == 0 || !value.is_finite() {
        return None;
    }
    let lo = edges[0];
    let hi = edges[bins];
    if value < lo || value > hi {
        return None;
    }
    let width = (hi - lo) / bins as f64;
    let idx = ((value - lo) / width).floor() as usize;
    Some(idx.min(bins - 1))
}

/// Count the values falling into each bin delimited by `edges`.
pub fn bin_counts(edges: &[f64], values: &[f64]) -> Vec<usize> {
    let mut counts = vec![0usize; edges.len().saturating_sub(1)];
    for &v in values {
        if let Some(idx) = bin_index(edges, v) {
            counts[idx] += 1;
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Five-number summary of a distribution as drawn by a Tukey box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two equally long samples.
///
/// Returns NaN when it is undefined: fewer than two pairs, or either side has
/// zero variance. Finite results are clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    // Rounding in the mean leaves a tiny spread for constants such as 0.1.
    if !has_variance(xs) || !has_variance(ys) {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Whether the sample has more than one distinct value.
pub fn has_variance(values: &[f64]) -> bool {
    match value_range(values) {
        Some((min, max)) => max > min,
        None => false,
    }
}
