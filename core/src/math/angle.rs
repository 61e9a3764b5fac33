//! Angle helpers. All inputs and outputs are in degrees unless the name says otherwise.

pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Wraps any angle into [0, 360).
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps any angle into (-180, 180].
pub fn fold_to_180(angle: f64) -> f64 {
    let wrapped = normalize(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Folds a relative angle into (-90, 90]; used only to compare how far off the bow
/// a direction lies regardless of whether it points ahead or astern.
pub fn fold_to_90(angle: f64) -> f64 {
    let folded = fold_to_180(angle);
    if folded > 90.0 {
        folded - 180.0
    } else if folded <= -90.0 {
        folded + 180.0
    } else {
        folded
    }
}

/// Folds an angle onto [0, 180] by symmetry about the bow.
pub fn fold_symmetric(angle: f64) -> f64 {
    fold_to_180(angle).abs()
}

/// Smallest signed rotation taking `from` onto `to`, in (-180, 180].
pub fn shortest_rotation(from: f64, to: f64) -> f64 {
    fold_to_180(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent_and_in_range() {
        for value in [-720.5, -360.0, -1e-14, -0.1, 0.0, 45.0, 359.999, 360.0, 1234.5] {
            let once = normalize(value);
            assert!((0.0..360.0).contains(&once), "{value} -> {once}");
            assert_eq!(normalize(once), once);
        }
    }

    #[test]
    fn fold_to_180_keeps_half_open_range() {
        assert_eq!(fold_to_180(180.0), 180.0);
        assert_eq!(fold_to_180(-180.0), 180.0);
        assert_eq!(fold_to_180(270.0), -90.0);
        assert_eq!(fold_to_180(-10.0), -10.0);
    }

    #[test]
    fn fold_to_90_mirrors_astern_directions() {
        assert_eq!(fold_to_90(135.0), -45.0);
        assert_eq!(fold_to_90(-135.0), 45.0);
        assert_eq!(fold_to_90(90.0), 90.0);
        assert_eq!(fold_to_90(30.0), 30.0);
    }

    #[test]
    fn shortest_rotation_crosses_north() {
        assert_eq!(shortest_rotation(350.0, 10.0), 20.0);
        assert_eq!(shortest_rotation(10.0, 350.0), -20.0);
        assert_eq!(fold_symmetric(200.0), 160.0);
    }
}
