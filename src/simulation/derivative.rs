//! Central finite differences of a hill profile

/// `(f(x+h) - f(x-h)) / 2h`
pub fn first_derivative<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// `(f(x+h) - 2f(x) + f(x-h)) / h^2`
pub fn second_derivative<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + h) - 2.0 * f(x) + f(x - h)) / (h * h)
}
