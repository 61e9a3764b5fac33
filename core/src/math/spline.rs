use log::warn;

/// Evaluates the uniform cubic spline segment through the stencil `[a, b, c, d]` at
/// `u` in [0, 1]. Returns `None` when `u` falls outside that range.
pub fn cubic_spline(u: f64, stencil: [f64; 4]) -> Option<f64> {
    if !(0.0..=1.0).contains(&u) {
        warn!("spline parameter {u} outside [0, 1]");
        return None;
    }
    let [a, b, c, d] = stencil;
    let value = u * u * u * (-a + 3.0 * b - 3.0 * c + d)
        + u * u * (3.0 * a - 6.0 * b + 3.0 * c)
        + u * (-3.0 * a + 3.0 * c)
        + (a + 4.0 * b + c);
    Some(value / 6.0)
}

/// Indices of the four-point stencil around the bracketing pair `(lower, lower + 1)`,
/// repeating the edge entries where the table ends.
pub fn stencil_indices(lower: usize, len: usize) -> [usize; 4] {
    let last = len.saturating_sub(1);
    [
        lower.saturating_sub(1),
        lower.min(last),
        (lower + 1).min(last),
        (lower + 2).min(last),
    ]
}
