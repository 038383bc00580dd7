//! Preference Algebra
//!
//! Category shares are stored as unnormalized log-preferences and decoded
//! with softmax. Only differences between the components of a vector matter,
//! so adding deltas is a plain componentwise sum and any common shift can be
//! removed without changing the decoded shares.

/// Decodes log-preferences into shares summing to 1.
///
/// Invariant under adding the same constant to every component.
pub fn softmax<const N: usize>(prefs: &[f64; N]) -> [f64; N] {
    // Shifting by the maximum keeps exp() in range for large raw values.
    let max = prefs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut ratios = prefs.map(|p| (p - max).exp());
    let total: f64 = ratios.iter().sum();
    for r in ratios.iter_mut() {
        *r /= total;
    }
    ratios
}

/// Encodes strictly positive shares as centered log-preferences.
///
/// The ratios need not sum to 1; the decoded shares are the normalized
/// ratios. A ratio `<= 0` is a caller error and yields non-finite output.
pub fn inv_softmax<const N: usize>(ratios: &[f64; N]) -> [f64; N] {
    debug_assert!(
        ratios.iter().all(|r| *r > 0.0),
        "inv_softmax requires strictly positive ratios: {:?}",
        ratios
    );
    recenter(&ratios.map(f64::ln))
}

/// Midpoint of the component range, `(max + min) / 2`.
pub fn midpoint<const N: usize>(prefs: &[f64; N]) -> f64 {
    let max = prefs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = prefs.iter().copied().fold(f64::INFINITY, f64::min);
    (max + min) / 2.0
}

/// Shifts the vector so that its midpoint is zero.
pub fn recenter<const N: usize>(prefs: &[f64; N]) -> [f64; N] {
    let offset = midpoint(prefs);
    prefs.map(|p| p - offset)
}
