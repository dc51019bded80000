/// Energy returned for coincident atoms or degenerate angles.
pub const CLASH_SENTINEL: f64 = 1e10;

#[inline]
pub fn inverse_quartic(dist: f64) -> f64 {
    if dist < 1e-6 {
        return CLASH_SENTINEL;
    }
    let inv2 = 1.0 / (dist * dist);
    inv2 * inv2
}

/// `k (theta - theta0)^2`, both angles in radians.
#[inline]
pub fn harmonic_angle(theta: f64, ideal_theta: f64, force_constant: f64) -> f64 {
    let delta = theta - ideal_theta;
    force_constant * delta * delta
}
