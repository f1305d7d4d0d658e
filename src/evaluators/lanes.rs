//! Data-parallel lane primitives for the lane-batched evaluator.
//!
//! One trait captures the handful of arithmetic operations the inner loop
//! needs; each supported instruction family implements it. The accumulation
//! loop itself is written once, generic over the trait, and reached through
//! a per-family `#[target_feature]` wrapper so the intrinsics compile in a
//! feature-enabled frame and inline. Adding another family (wider registers,
//! a different ISA) means writing one more impl and one more wrapper; the
//! evaluator in `lane_batched` stays untouched.

use std::arch::x86_64::*;

/// Arithmetic primitives of one SIMD register family.
///
/// # Safety
///
/// The `unsafe` methods may only be called after [`detected`](Self::detected)
/// returned `true` on the running CPU, and `load` additionally requires a
/// pointer valid for [`WIDTH`](Self::WIDTH) reads and aligned to
/// [`ALIGNMENT`](Self::ALIGNMENT) bytes.
pub trait LaneArithmetic {
    /// Number of f32 lanes per register.
    const WIDTH: usize;
    /// Natural alignment of a register load, in bytes.
    const ALIGNMENT: usize;
    /// Feature name used in rejection errors.
    const NAME: &'static str;
    /// One register of [`WIDTH`](Self::WIDTH) f32 lanes.
    type Reg: Copy;

    /// Whether the running CPU supports this family.
    fn detected() -> bool;

    unsafe fn splat(v: f32) -> Self::Reg;
    unsafe fn zero() -> Self::Reg;
    unsafe fn load(ptr: *const f32) -> Self::Reg;
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg;
    /// Reduces the lanes to one scalar, summing left to right.
    unsafe fn horizontal_sum(a: Self::Reg) -> f32;

    /// Accumulates the force of all sources on the observer at index `i`,
    /// [`WIDTH`](Self::WIDTH) sources per step, then reduces the per-lane
    /// sums to scalars. Every impl forwards to a frame compiled with the
    /// family's target feature enabled so the primitives above inline into
    /// the loop instead of being outlined per operation.
    ///
    /// # Safety
    ///
    /// Same contract as [`load`](Self::load) for every register-wide stride
    /// of the four source arrays, which must share one length that is a
    /// multiple of [`WIDTH`](Self::WIDTH) and contain index `i`.
    unsafe fn forces_on_observer(
        x: &[f32],
        y: &[f32],
        z: &[f32],
        mass: &[f32],
        i: usize,
        softening_sq: f32,
    ) -> (f32, f32, f32);
}

/// 4-lane family backed by SSE4.1 registers.
pub struct Sse41;

impl LaneArithmetic for Sse41 {
    const WIDTH: usize = 4;
    const ALIGNMENT: usize = 16;
    const NAME: &'static str = "sse4.1";
    type Reg = __m128;

    fn detected() -> bool {
        is_x86_feature_detected!("sse4.1")
    }

    #[inline(always)]
    unsafe fn splat(v: f32) -> __m128 {
        _mm_set1_ps(v)
    }

    #[inline(always)]
    unsafe fn zero() -> __m128 {
        _mm_setzero_ps()
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m128 {
        _mm_load_ps(ptr)
    }

    #[inline(always)]
    unsafe fn add(a: __m128, b: __m128) -> __m128 {
        _mm_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m128, b: __m128) -> __m128 {
        _mm_sub_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m128, b: __m128) -> __m128 {
        _mm_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn div(a: __m128, b: __m128) -> __m128 {
        _mm_div_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: __m128) -> __m128 {
        _mm_sqrt_ps(a)
    }

    #[inline(always)]
    unsafe fn horizontal_sum(a: __m128) -> f32 {
        let mut lanes = [0.0f32; 4];
        _mm_storeu_ps(lanes.as_mut_ptr(), a);
        let mut sum = 0.0f32;
        for lane in lanes {
            sum += lane;
        }
        sum
    }

    #[inline(always)]
    unsafe fn forces_on_observer(
        x: &[f32],
        y: &[f32],
        z: &[f32],
        mass: &[f32],
        i: usize,
        softening_sq: f32,
    ) -> (f32, f32, f32) {
        forces_on_observer_sse41(x, y, z, mass, i, softening_sq)
    }
}

/// 8-lane family backed by AVX2 registers.
pub struct Avx2;

impl LaneArithmetic for Avx2 {
    const WIDTH: usize = 8;
    const ALIGNMENT: usize = 32;
    const NAME: &'static str = "avx2";
    type Reg = __m256;

    fn detected() -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline(always)]
    unsafe fn splat(v: f32) -> __m256 {
        _mm256_set1_ps(v)
    }

    #[inline(always)]
    unsafe fn zero() -> __m256 {
        _mm256_setzero_ps()
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m256 {
        _mm256_load_ps(ptr)
    }

    #[inline(always)]
    unsafe fn add(a: __m256, b: __m256) -> __m256 {
        _mm256_add_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sub(a: __m256, b: __m256) -> __m256 {
        _mm256_sub_ps(a, b)
    }

    #[inline(always)]
    unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        _mm256_mul_ps(a, b)
    }

    #[inline(always)]
    unsafe fn div(a: __m256, b: __m256) -> __m256 {
        _mm256_div_ps(a, b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: __m256) -> __m256 {
        _mm256_sqrt_ps(a)
    }

    #[inline(always)]
    unsafe fn horizontal_sum(a: __m256) -> f32 {
        let mut lanes = [0.0f32; 8];
        _mm256_storeu_ps(lanes.as_mut_ptr(), a);
        let mut sum = 0.0f32;
        for lane in lanes {
            sum += lane;
        }
        sum
    }

    #[inline(always)]
    unsafe fn forces_on_observer(
        x: &[f32],
        y: &[f32],
        z: &[f32],
        mass: &[f32],
        i: usize,
        softening_sq: f32,
    ) -> (f32, f32, f32) {
        forces_on_observer_avx2(x, y, z, mass, i, softening_sq)
    }
}

/// Lane-generic accumulation loop shared by every family. Only called from
/// the feature-enabled wrappers below, where it and the lane primitives
/// inline into one frame.
#[inline(always)]
unsafe fn accumulate_observer<L: LaneArithmetic>(
    x: &[f32],
    y: &[f32],
    z: &[f32],
    mass: &[f32],
    i: usize,
    softening_sq: f32,
) -> (f32, f32, f32) {
    let n = x.len();

    let obs_x = L::splat(x[i]);
    let obs_y = L::splat(y[i]);
    let obs_z = L::splat(z[i]);
    let soft = L::splat(softening_sq);
    let one = L::splat(1.0);

    let mut acx = L::zero();
    let mut acy = L::zero();
    let mut acz = L::zero();

    let mut j = 0;
    while j < n {
        let src_x = L::load(x.as_ptr().add(j));
        let src_y = L::load(y.as_ptr().add(j));
        let src_z = L::load(z.as_ptr().add(j));
        let src_mass = L::load(mass.as_ptr().add(j));

        // Same operation order as the scalar kernel.
        let dx = L::sub(src_x, obs_x);
        let dy = L::sub(src_y, obs_y);
        let dz = L::sub(src_z, obs_z);

        let dist_sq = L::add(
            L::add(L::add(L::mul(dx, dx), L::mul(dy, dy)), L::mul(dz, dz)),
            soft,
        );
        let inv_dist = L::div(one, L::sqrt(dist_sq));
        let inv_dist_cube = L::mul(L::mul(inv_dist, inv_dist), inv_dist);
        let s = L::mul(src_mass, inv_dist_cube);

        acx = L::add(acx, L::mul(dx, s));
        acy = L::add(acy, L::mul(dy, s));
        acz = L::add(acz, L::mul(dz, s));

        j += L::WIDTH;
    }

    (
        L::horizontal_sum(acx),
        L::horizontal_sum(acy),
        L::horizontal_sum(acz),
    )
}

#[target_feature(enable = "sse4.1")]
unsafe fn forces_on_observer_sse41(
    x: &[f32],
    y: &[f32],
    z: &[f32],
    mass: &[f32],
    i: usize,
    softening_sq: f32,
) -> (f32, f32, f32) {
    accumulate_observer::<Sse41>(x, y, z, mass, i, softening_sq)
}

#[target_feature(enable = "avx2")]
unsafe fn forces_on_observer_avx2(
    x: &[f32],
    y: &[f32],
    z: &[f32],
    mass: &[f32],
    i: usize,
    softening_sq: f32,
) -> (f32, f32, f32) {
    accumulate_observer::<Avx2>(x, y, z, mass, i, softening_sq)
}
