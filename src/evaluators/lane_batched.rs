//! Lane-batched planar evaluator.
//!
//! For every observer the inner loop strides over the planar source arrays
//! in register-wide steps, keeping three per-lane accumulators that are
//! horizontally reduced once per observer. The loop itself lives in
//! [`LaneArithmetic`] (one generic body behind per-family feature-enabled
//! wrappers), so the SSE4.1 and AVX2 variants differ only in lane width and
//! primitive operations; this module validates, parallelizes and times.

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use log::debug;
use rayon::prelude::*;

use crate::errors::EvaluatorError;
use crate::evaluators::{check_alignment, check_body_count, check_buffer_len, LaneArithmetic};
use crate::evaluators::{Avx2, Sse41};

/// Lane-batched force evaluator over planar arrays.
pub struct LaneBatched<L: LaneArithmetic> {
    _family: PhantomData<L>,
}

/// 4-lane variant.
pub type LaneBatchedSse41 = LaneBatched<Sse41>;
/// 8-lane variant.
pub type LaneBatchedAvx2 = LaneBatched<Avx2>;

impl<L: LaneArithmetic> Default for LaneBatched<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LaneArithmetic> LaneBatched<L> {
    pub fn new() -> Self {
        LaneBatched { _family: PhantomData }
    }

    /// Computes the net force on every body from planar attribute arrays.
    ///
    /// The force arrays are written, not accumulated into. Returns the
    /// elapsed time of the computation loop.
    ///
    /// # Errors
    ///
    /// Rejects an empty body set, arrays whose lengths disagree with
    /// `x.len()`, a body count that is not a multiple of the lane width,
    /// source arrays whose base pointers are not aligned to the register
    /// width, and a CPU that lacks the targeted instruction family.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        force_x: &mut [f32],
        force_y: &mut [f32],
        force_z: &mut [f32],
        x: &[f32],
        y: &[f32],
        z: &[f32],
        mass: &[f32],
        softening_sq: f32,
    ) -> Result<Duration, EvaluatorError> {
        let n = x.len();
        check_body_count(n, 1)?;
        for buf in [&y[..], &z[..], &mass[..]] {
            check_buffer_len(n, buf.len())?;
        }
        for buf in [&force_x[..], &force_y[..], &force_z[..]] {
            check_buffer_len(n, buf.len())?;
        }
        check_body_count(n, L::WIDTH)?;
        for buf in [x, y, z, mass] {
            check_alignment(buf.as_ptr(), L::ALIGNMENT)?;
        }
        if !L::detected() {
            return Err(EvaluatorError::UnsupportedInstructionSet(L::NAME));
        }

        let start = Instant::now();

        force_x
            .par_iter_mut()
            .zip(force_y.par_iter_mut())
            .zip(force_z.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((out_x, out_y), out_z))| {
                // Preconditions hold: family detected, arrays aligned and a
                // multiple of the lane width long.
                let (acx, acy, acz) =
                    unsafe { L::forces_on_observer(x, y, z, mass, i, softening_sq) };
                *out_x = acx;
                *out_y = acy;
                *out_z = acz;
            });

        let elapsed = start.elapsed();
        debug!(
            "lane-batched ({}) evaluation: n={}, width={}, elapsed={:?}",
            L::NAME,
            n,
            L::WIDTH,
            elapsed
        );
        Ok(elapsed)
    }
}
