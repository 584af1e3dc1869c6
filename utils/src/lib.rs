/// Root-sum-square of two independent error bounds, the uncertainty of
/// `a - b` when `a` and `b` are measured by separate sensors.
pub fn root_sum_square(first: f64, second: f64) -> f64 {
    first.hypot(second)
}

pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

pub fn is_unit_fraction(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

pub fn near(value: f64, target: f64, margin: f64) -> bool {
    (value - target).abs() <= margin
}
