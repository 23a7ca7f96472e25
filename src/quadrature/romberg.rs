use super::QuadratureError;

/// Integrates uniformly spaced samples `y`, separated by `dx`,
/// by Romberg's method: the trapezoidal rule is evaluated on
/// successively halved steps and Richardson-extrapolated.
///
/// The number of samples must be 2^k + 1, for some k >= 0.
pub fn romberg(y: &[f64], dx: f64) -> Result<f64, QuadratureError> {
    let intervals = y.len().checked_sub(1)
        .ok_or(QuadratureError::SampleCount(0))?;

    if !intervals.is_power_of_two() {
        if intervals == 0 {
            // a single point has no extent
            return Ok(0.0);
        }
        return Err(QuadratureError::SampleCount(y.len()));
    }

    let k = intervals.trailing_zeros() as usize;

    // previous and current rows of the Romberg tableau
    let mut prev: Vec<f64> = Vec::with_capacity(k + 1);
    let mut row: Vec<f64> = Vec::with_capacity(k + 1);

    let mut h = (intervals as f64) * dx;
    prev.push(0.5 * h * (y[0] + y[intervals]));

    let mut step = intervals;
    for _i in 1..=k {
        let start = step / 2;
        // midpoints of the previous level
        let sum: f64 = y[start..intervals].iter().step_by(step).sum();
        step /= 2;

        row.clear();
        row.push(0.5 * (prev[0] + h * sum));
        for j in 1..=prev.len() {
            let last = row[j-1];
            let scale = ((1u64 << (2 * j)) - 1) as f64;
            row.push(last + (last - prev[j-1]) / scale);
        }

        std::mem::swap(&mut prev, &mut row);
        h *= 0.5;
    }

    Ok(prev[k])
}
