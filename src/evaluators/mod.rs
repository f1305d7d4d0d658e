//! The four interchangeable force evaluators.
//!
//! All evaluators compute the same quantity (the net gravitational force on
//! every body due to all others) through the shared kernel in
//! [`crate::kernel`], and differ only in data layout and parallel strategy.
//! Each returns the wall-clock duration of the computation phase; output
//! zeroing and buffer staging happen before the timer starts.

mod planar;
mod tiled_blocked;
#[cfg(target_arch = "x86_64")]
mod lanes;
#[cfg(target_arch = "x86_64")]
mod lane_batched;

pub use planar::*;
pub use tiled_blocked::*;
#[cfg(target_arch = "x86_64")]
pub use lanes::*;
#[cfg(target_arch = "x86_64")]
pub use lane_batched::*;


use std::time::Duration;

use crate::errors::EvaluatorError;
use crate::layout::{BodySet, ForceSet, FORCE_STRIDE};

/// Selects one of the four force evaluators.
///
/// The evaluators are one capability with four implementations; callers that
/// hold a [`BodySet`] can switch strategy without touching their buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Cache-blocked interleaved-layout evaluator with reciprocity.
    TiledBlocked { tile: usize },
    /// Structure-of-arrays reference evaluator, full N x N.
    Planar,
    /// Lane-batched planar evaluator, 4 lanes (SSE4.1).
    LaneSse41,
    /// Lane-batched planar evaluator, 8 lanes (AVX2).
    LaneAvx2,
}

impl Strategy {
    /// The body count must be an exact multiple of this for the strategy to
    /// accept the computation.
    pub fn required_multiple(&self) -> usize {
        match *self {
            Strategy::TiledBlocked { tile } => tile,
            Strategy::Planar => PLANAR_BLOCK,
            Strategy::LaneSse41 => 4,
            Strategy::LaneAvx2 => 8,
        }
    }

    /// Runs the selected evaluator over `bodies` and returns the populated
    /// force buffer together with the elapsed computation time.
    pub fn evaluate(
        &self,
        bodies: &BodySet,
        softening_sq: f32,
    ) -> Result<(ForceSet, Duration), EvaluatorError> {
        match *self {
            Strategy::TiledBlocked { tile } => {
                let mut force = vec![0.0f32; FORCE_STRIDE * bodies.len()];
                let elapsed = TiledBlocked::new(tile).evaluate(
                    &mut force,
                    bodies.interleaved(),
                    softening_sq,
                )?;
                Ok((ForceSet::from_interleaved(&force), elapsed))
            }
            Strategy::Planar => {
                let mut forces = ForceSet::zeroed(bodies.len());
                let (x, y, z, mass) = bodies.planar();
                let elapsed = Planar.evaluate(
                    &mut forces.x,
                    &mut forces.y,
                    &mut forces.z,
                    x,
                    y,
                    z,
                    mass,
                    softening_sq,
                )?;
                Ok((forces, elapsed))
            }
            Strategy::LaneSse41 => evaluate_lane_sse41(bodies, softening_sq),
            Strategy::LaneAvx2 => evaluate_lane_avx2(bodies, softening_sq),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn evaluate_lane<L: LaneArithmetic>(
    bodies: &BodySet,
    softening_sq: f32,
) -> Result<(ForceSet, Duration), EvaluatorError> {
    let mut forces = ForceSet::zeroed(bodies.len());
    let (x, y, z, mass) = bodies.planar();
    let elapsed = LaneBatched::<L>::new().evaluate(
        &mut forces.x,
        &mut forces.y,
        &mut forces.z,
        x,
        y,
        z,
        mass,
        softening_sq,
    )?;
    Ok((forces, elapsed))
}

#[cfg(target_arch = "x86_64")]
fn evaluate_lane_sse41(
    bodies: &BodySet,
    softening_sq: f32,
) -> Result<(ForceSet, Duration), EvaluatorError> {
    evaluate_lane::<Sse41>(bodies, softening_sq)
}

#[cfg(not(target_arch = "x86_64"))]
fn evaluate_lane_sse41(
    _bodies: &BodySet,
    _softening_sq: f32,
) -> Result<(ForceSet, Duration), EvaluatorError> {
    Err(EvaluatorError::UnsupportedInstructionSet("sse4.1"))
}

#[cfg(target_arch = "x86_64")]
fn evaluate_lane_avx2(
    bodies: &BodySet,
    softening_sq: f32,
) -> Result<(ForceSet, Duration), EvaluatorError> {
    evaluate_lane::<Avx2>(bodies, softening_sq)
}

#[cfg(not(target_arch = "x86_64"))]
fn evaluate_lane_avx2(
    _bodies: &BodySet,
    _softening_sq: f32,
) -> Result<(ForceSet, Duration), EvaluatorError> {
    Err(EvaluatorError::UnsupportedInstructionSet("avx2"))
}

pub(crate) fn check_body_count(n: usize, multiple: usize) -> Result<(), EvaluatorError> {
    if n == 0 {
        return Err(EvaluatorError::EmptyBodySet);
    }
    if multiple == 0 || n % multiple != 0 {
        return Err(EvaluatorError::LengthNotMultiple { n, multiple });
    }
    Ok(())
}

pub(crate) fn check_buffer_len(expected: usize, actual: usize) -> Result<(), EvaluatorError> {
    if expected != actual {
        return Err(EvaluatorError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn check_alignment(ptr: *const f32, required: usize) -> Result<(), EvaluatorError> {
    if ptr as usize % required != 0 {
        return Err(EvaluatorError::MisalignedBuffer { required });
    }
    Ok(())
}
