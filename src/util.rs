/// Average of `samples`, `None` when there are none
pub fn mean_ms(samples: &[u64]) -> Option<f64> {
    match samples.len() {
        0 => None,
        count => Some(samples.iter().map(|&ms| ms as f64).sum::<f64>() / count as f64),
    }
}

/// Population standard deviation of `samples`
pub fn std_dev_ms(samples: &[u64]) -> Option<f64> {
    let avg = mean_ms(samples)?;
    let variance = samples
        .iter()
        .map(|&ms| {
            let diff = avg - ms as f64;

            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;

    Some(variance.sqrt())
}

/// Milliseconds as fractional seconds
pub fn ms_to_secs(ms: f64) -> f64 {
    ms / 1000.0
}
