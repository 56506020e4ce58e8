// Small numeric helpers shared by the line model and the layout profile.

/// Arithmetic mean. `None` for an empty slice.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation. `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = average(values)?;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}
