use super::QuadratureError;

/// Cumulative integral of `y(x)` by the trapezoidal rule,
/// starting from zero at the first sample, so that the
/// `i`th element is the integral from `x[0]` to `x[i]`.
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Result<Vec<f64>, QuadratureError> {
    if x.len() != y.len() || x.is_empty() {
        return Err(QuadratureError::Shape(x.len(), y.len()));
    }

    let mut total = 0.0;
    let mut integral = Vec::with_capacity(x.len());
    integral.push(total);

    for (xs, ys) in x.windows(2).zip(y.windows(2)) {
        total += 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]);
        integral.push(total);
    }

    Ok(integral)
}
