//! Structure-of-arrays reference evaluator.
//!
//! Straightforward full N x N double loop with no symmetry exploitation:
//! every pair is evaluated twice, once from each side. Its output defines
//! the reference semantics the other evaluators are checked against.

use std::time::{Duration, Instant};

use log::debug;
use rayon::prelude::*;

use crate::errors::EvaluatorError;
use crate::evaluators::{check_body_count, check_buffer_len};
use crate::kernel::body_body_interaction;

/// The planar evaluator only accepts body counts that are multiples of this
/// block size.
pub const PLANAR_BLOCK: usize = 1024;

/// Planar (structure-of-arrays) force evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Planar;

impl Planar {
    /// Computes the net force on every body from planar attribute arrays.
    ///
    /// The force arrays are written, not accumulated into. Returns the
    /// elapsed time of the computation loop.
    ///
    /// # Errors
    ///
    /// Rejects an empty body set, attribute or force arrays whose lengths
    /// disagree with `x.len()`, and a body count that is not a multiple of
    /// [`PLANAR_BLOCK`].
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
        check_body_count(n, PLANAR_BLOCK)?;

        let start = Instant::now();

        force_x
            .par_iter_mut()
            .zip(force_y.par_iter_mut())
            .zip(force_z.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((out_x, out_y), out_z))| {
                let my_x = x[i];
                let my_y = y[i];
                let my_z = z[i];

                let mut acx = 0.0f32;
                let mut acy = 0.0f32;
                let mut acz = 0.0f32;

                for j in 0..n {
                    let (fx, fy, fz) = body_body_interaction(
                        my_x,
                        my_y,
                        my_z,
                        x[j],
                        y[j],
                        z[j],
                        mass[j],
                        softening_sq,
                    );
                    acx += fx;
                    acy += fy;
                    acz += fz;
                }

                *out_x = acx;
                *out_y = acy;
                *out_z = acz;
            });

        let elapsed = start.elapsed();
        debug!("planar evaluation: n={}, elapsed={:?}", n, elapsed);
        Ok(elapsed)
    }
}
