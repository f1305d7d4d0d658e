use crate::assert_float_eq;
use crate::kernel::body_body_interaction;
use approx::assert_relative_eq;
use rand::{rng, Rng};

#[test]
fn test_two_unit_bodies_unit_separation() {
    // Body A at the origin, body B at (1, 0, 0), both mass 1, no softening.
    // The pull on A points toward B along +x with magnitude 1 (G = 1).
    let (fx, fy, fz) = body_body_interaction(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
    assert_float_eq(fx, 1.0, 1e-6, None);
    assert_eq!(fy, 0.0);
    assert_eq!(fz, 0.0);

    // The pull on B is the exact negation.
    let (gx, gy, gz) = body_body_interaction(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
    assert_eq!(gx, -fx);
    assert_eq!(gy, -fy);
    assert_eq!(gz, -fz);
}

#[test]
fn test_pair_symmetry_random_positions() {
    // For equal masses the force j exerts on i is the negation of the force
    // i exerts on j, up to rounding. The displacement negates exactly and
    // the softened squared distance is identical in both directions, so the
    // results are bitwise negations here.
    let mut rng = rng();
    for _ in 0..200 {
        let (x0, y0, z0) = (
            rng.random_range(-10.0f32..10.0),
            rng.random_range(-10.0f32..10.0),
            rng.random_range(-10.0f32..10.0),
        );
        let (x1, y1, z1) = (
            rng.random_range(-10.0f32..10.0),
            rng.random_range(-10.0f32..10.0),
            rng.random_range(-10.0f32..10.0),
        );
        let mass = rng.random_range(0.1f32..5.0);
        let softening_sq = 1e-3;

        let (fx, fy, fz) = body_body_interaction(x0, y0, z0, x1, y1, z1, mass, softening_sq);
        let (gx, gy, gz) = body_body_interaction(x1, y1, z1, x0, y0, z0, mass, softening_sq);

        assert_eq!(fx, -gx);
        assert_eq!(fy, -gy);
        assert_eq!(fz, -gz);
    }
}

#[test]
fn test_zero_mass_source_contributes_nothing() {
    let (fx, fy, fz) = body_body_interaction(0.0, 0.0, 0.0, 3.0, -2.0, 7.5, 0.0, 1e-3);
    assert_eq!(fx, 0.0);
    assert_eq!(fy, 0.0);
    assert_eq!(fz, 0.0);
}

#[test]
fn test_coincident_bodies_are_finite_with_softening() {
    let (fx, fy, fz) = body_body_interaction(2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 5.0, 1e-6);
    assert!(fx.is_finite() && fy.is_finite() && fz.is_finite());
    // Zero displacement means zero force regardless of how close r gets.
    assert_eq!(fx, 0.0);
    assert_eq!(fy, 0.0);
    assert_eq!(fz, 0.0);
}

#[test]
fn test_mass_scale_law() {
    // Force is linear in the source mass; doubling is exact in binary
    // floating point, so scaling by 2 must match bit for bit.
    let (fx, fy, fz) = body_body_interaction(0.5, -1.0, 0.0, 2.0, 1.0, -3.0, 1.25, 0.0);
    let (sx, sy, sz) = body_body_interaction(0.5, -1.0, 0.0, 2.0, 1.0, -3.0, 2.5, 0.0);
    assert_eq!(sx, 2.0 * fx);
    assert_eq!(sy, 2.0 * fy);
    assert_eq!(sz, 2.0 * fz);
}

#[test]
fn test_inverse_square_falloff() {
    // Doubling the separation quarters the magnitude (softening at zero).
    let (f1, _, _) = body_body_interaction(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
    let (f2, _, _) = body_body_interaction(0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 0.0);
    assert_relative_eq!(f2, f1 / 4.0, max_relative = 1e-6);
}
