//! Analytical contraction kernels for contracted Gaussian shells.
//!
//! Each function evaluates the radial part of one shell at one point in space,
//! streaming once through the shell's primitive exponents and its pre-normalized
//! contraction coefficients. The coefficient slice is laid out primitive-major
//! with the angular components innermost, so a single index advances through it
//! in lock-step with the exponents.
//!
//! The angular prefactors that multiply these sums depend only on the
//! point-to-atom displacement and are provided separately, so the same radial
//! sums serve both the orbital and the basis-value evaluation modes.

/// Accumulates the radial sum of an S shell: `Σ_j n_j · e^{−α_j · dr²}`.
///
/// `norm_coefficients` holds one normalized coefficient per primitive.
#[inline]
pub fn contract_s(exponents: &[f64], norm_coefficients: &[f64], dr2: f64) -> f64 {
    let mut sum = 0.0;
    for (alpha, norm) in exponents.iter().zip(norm_coefficients) {
        sum += norm * (-alpha * dr2).exp();
    }
    sum
}

/// Accumulates the three radial sums of a P shell.
///
/// `norm_coefficients` holds three coefficients per primitive (x, y, z), equal
/// in value but stored separately so the streaming layout stays uniform across
/// shell types.
#[inline]
pub fn contract_p(exponents: &[f64], norm_coefficients: &[f64], dr2: f64) -> [f64; 3] {
    let mut sums = [0.0; 3];
    for (j, alpha) in exponents.iter().enumerate() {
        let radial = (-alpha * dr2).exp();
        for (k, sum) in sums.iter_mut().enumerate() {
            *sum += norm_coefficients[j * 3 + k] * radial;
        }
    }
    sums
}

/// Accumulates the six radial sums of a Cartesian D shell, ordered
/// {xx, yy, zz, xy, xz, yz}.
#[inline]
pub fn contract_d(exponents: &[f64], norm_coefficients: &[f64], dr2: f64) -> [f64; 6] {
    let mut sums = [0.0; 6];
    for (j, alpha) in exponents.iter().enumerate() {
        let radial = (-alpha * dr2).exp();
        for (k, sum) in sums.iter_mut().enumerate() {
            *sum += norm_coefficients[j * 6 + k] * radial;
        }
    }
    sums
}

/// Accumulates the five radial sums of a spherical D shell, ordered
/// {d0, d1+, d1−, d2+, d2−}.
#[inline]
pub fn contract_d5(exponents: &[f64], norm_coefficients: &[f64], dr2: f64) -> [f64; 5] {
    let mut sums = [0.0; 5];
    for (j, alpha) in exponents.iter().enumerate() {
        let radial = (-alpha * dr2).exp();
        for (k, sum) in sums.iter_mut().enumerate() {
            *sum += norm_coefficients[j * 5 + k] * radial;
        }
    }
    sums
}

/// The six Cartesian D angular prefactors {δx², δy², δz², δxδy, δxδz, δyδz}.
#[inline]
pub fn d_angular(delta: &[f64; 3]) -> [f64; 6] {
    [
        delta[0] * delta[0],
        delta[1] * delta[1],
        delta[2] * delta[2],
        delta[0] * delta[1],
        delta[0] * delta[2],
        delta[1] * delta[2],
    ]
}

/// The five spherical D angular prefactors
/// {δz² − dr², δxδz, δyδz, δx² − δy², δxδy}.
#[inline]
pub fn d5_angular(delta: &[f64; 3], dr2: f64) -> [f64; 5] {
    [
        delta[2] * delta[2] - dr2,
        delta[0] * delta[2],
        delta[1] * delta[2],
        delta[0] * delta[0] - delta[1] * delta[1],
        delta[0] * delta[1],
    ]
}
