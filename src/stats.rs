//! Small numeric helpers shared by the analysis stages.
//!
//! Every helper returns 0 for empty input instead of NaN.

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Largest value, or 0 for an empty slice
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Clamp to `[-1, 1]`
pub fn clip_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Sign with `sign(0) == 0`
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Centered moving average with zero padding at the edges.
///
/// Output has the same length as the input. Each sample averages the window
/// `[i - window/2, i + (window-1)/2]`, dividing by the full window length even
/// where it hangs off either end.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.is_empty() {
        return values.to_vec();
    }

    let n = values.len() as isize;
    let lead = ((window - 1) / 2) as isize;
    let w = window as isize;

    (0..n)
        .map(|i| {
            let hi = (i + lead).min(n - 1);
            let lo = (i + lead - w + 1).max(0);
            let sum: f64 = if lo <= hi {
                values[lo as usize..=hi as usize].iter().sum()
            } else {
                0.0
            };
            sum / window as f64
        })
        .collect()
}
