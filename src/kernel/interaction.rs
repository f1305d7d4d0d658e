//! The pairwise gravitational interaction, shared by every evaluator.
//!
//! Floating-point addition is not associative, so the operation order below
//! is fixed and every evaluator (scalar or lane-batched) performs the same
//! sequence. The gravitational constant is normalized to 1.

/// Computes the force the source body exerts on the observer.
///
/// The softening term is added to the squared separation before the inverse
/// distance is taken, so coincident bodies produce a finite contribution
/// whenever `softening_sq > 0`. With `softening_sq == 0` a self-interaction
/// divides by zero; callers that include the self-pair (the diagonal tile
/// and the planar inner loop) must supply a positive softening.
///
/// # Examples
///
/// ```
/// use rs_nbody::kernel::body_body_interaction;
///
/// // Unit masses one unit apart, no softening: unit force along +x.
/// let (fx, fy, fz) = body_body_interaction(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
/// assert!((fx - 1.0).abs() < 1e-6);
/// assert_eq!(fy, 0.0);
/// assert_eq!(fz, 0.0);
/// ```
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn body_body_interaction(
    x0: f32,
    y0: f32,
    z0: f32,
    x1: f32,
    y1: f32,
    z1: f32,
    mass1: f32,
    softening_sq: f32,
) -> (f32, f32, f32) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let dz = z1 - z0;

    let dist_sq = dx * dx + dy * dy + dz * dz + softening_sq;
    let inv_dist = 1.0 / dist_sq.sqrt();
    let inv_dist_cube = inv_dist * inv_dist * inv_dist;

    let s = mass1 * inv_dist_cube;
    (dx * s, dy * s, dz * s)
}
