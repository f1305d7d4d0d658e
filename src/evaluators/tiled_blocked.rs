//! Cache-blocked evaluator over the interleaved layout.
//!
//! The N x N interaction matrix is partitioned into square tiles of edge
//! `tile`. Off-diagonal tiles pair two disjoint body groups and evaluate
//! each cross-group pair once, applying the result to both sides with
//! opposite sign (Newton's third law). Diagonal tiles evaluate every pair
//! within one group from both sides; the softened kernel makes the i == j
//! self-pair a finite zero contribution.

use std::time::{Duration, Instant};

use log::debug;
use rayon::prelude::*;

use crate::errors::EvaluatorError;
use crate::evaluators::{check_body_count, check_buffer_len};
use crate::kernel::body_body_interaction;
use crate::layout::{FORCE_STRIDE, INTERLEAVED_STRIDE};

/// Default tile edge, sized so one tile's worth of body data stays cache
/// resident.
pub const DEFAULT_TILE: usize = 1024;

/// Tiled-blocked force evaluator.
#[derive(Clone, Copy, Debug)]
pub struct TiledBlocked {
    tile: usize,
}

impl Default for TiledBlocked {
    fn default() -> Self {
        TiledBlocked::new(DEFAULT_TILE)
    }
}

impl TiledBlocked {
    /// Creates an evaluator with the given tile edge. The body count handed
    /// to [`evaluate`](Self::evaluate) must be a positive multiple of it.
    pub fn new(tile: usize) -> Self {
        TiledBlocked { tile }
    }

    pub fn tile(&self) -> usize {
        self.tile
    }

    /// Computes the net force on every body.
    ///
    /// `pos_mass` is the interleaved `(x, y, z, mass)` buffer, 4 slots per
    /// body; `force` receives 3 slots per body and is fully overwritten.
    /// Returns the elapsed time of the two computation phases; the output
    /// zeroing that precedes them is not timed.
    ///
    /// # Errors
    ///
    /// Rejects an empty body set, a `pos_mass` length that is not a
    /// multiple of 4, a force buffer that does not hold exactly `3 * n`
    /// entries, and a body count that is not a multiple of the tile edge.
    pub fn evaluate(
        &self,
        force: &mut [f32],
        pos_mass: &[f32],
        softening_sq: f32,
    ) -> Result<Duration, EvaluatorError> {
        let n = pos_mass.len() / INTERLEAVED_STRIDE;
        check_body_count(n, 1)?;
        check_buffer_len(n * INTERLEAVED_STRIDE, pos_mass.len())?;
        check_buffer_len(n * FORCE_STRIDE, force.len())?;
        check_body_count(n, self.tile)?;

        force.fill(0.0);
        let n_tiles = n / self.tile;
        let row_len = FORCE_STRIDE * self.tile;
        let start = Instant::now();

        // Off-diagonal pass, ascending i_tile. For a fixed i_tile every
        // j_tile < i_tile runs in parallel; each worker owns its j_tile's
        // force rows exclusively, so the reciprocal updates need no
        // synchronization. The i-side sums come back as per-tile partial
        // buffers and are merged in ascending j_tile order, which keeps the
        // summation order deterministic across runs.
        for i_tile in 1..n_tiles {
            let (head, tail) = force.split_at_mut(row_len * i_tile);
            let i_rows = &mut tail[..row_len];
            let partials: Vec<Vec<f32>> = head
                .par_chunks_mut(row_len)
                .enumerate()
                .map(|(j_tile, j_rows)| {
                    off_diagonal_tile(j_rows, pos_mass, softening_sq, i_tile, j_tile, self.tile)
                })
                .collect();
            for partial in &partials {
                for (dst, src) in i_rows.iter_mut().zip(partial) {
                    *dst += *src;
                }
            }
        }

        // Diagonal pass. Every off-diagonal contribution is committed at
        // this point; each worker accumulates on top of its own disjoint
        // chunk of the force buffer.
        force
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(i_tile, rows)| {
                diagonal_tile(rows, pos_mass, softening_sq, i_tile, self.tile);
            });

        let elapsed = start.elapsed();
        debug!(
            "tiled-blocked evaluation: n={}, tile={}, elapsed={:?}",
            n, self.tile, elapsed
        );
        Ok(elapsed)
    }
}

/// Evaluates the interactions between group `i_tile` (observers) and group
/// `j_tile` (sources), `j_tile < i_tile`. Writes the reciprocal sums into
/// `j_rows` (that group's slice of the force buffer) and returns the i-side
/// sums for the caller to merge.
fn off_diagonal_tile(
    j_rows: &mut [f32],
    pos_mass: &[f32],
    softening_sq: f32,
    i_tile: usize,
    j_tile: usize,
    tile: usize,
) -> Vec<f32> {
    let mut i_acc = vec![0.0f32; FORCE_STRIDE * tile];
    let mut symmetric_x = vec![0.0f32; tile];
    let mut symmetric_y = vec![0.0f32; tile];
    let mut symmetric_z = vec![0.0f32; tile];

    for local_i in 0..tile {
        let i = i_tile * tile + local_i;
        let my_x = pos_mass[i * INTERLEAVED_STRIDE];
        let my_y = pos_mass[i * INTERLEAVED_STRIDE + 1];
        let my_z = pos_mass[i * INTERLEAVED_STRIDE + 2];

        let mut ax = 0.0f32;
        let mut ay = 0.0f32;
        let mut az = 0.0f32;

        for local_j in 0..tile {
            let j = j_tile * tile + local_j;
            let (fx, fy, fz) = body_body_interaction(
                my_x,
                my_y,
                my_z,
                pos_mass[j * INTERLEAVED_STRIDE],
                pos_mass[j * INTERLEAVED_STRIDE + 1],
                pos_mass[j * INTERLEAVED_STRIDE + 2],
                pos_mass[j * INTERLEAVED_STRIDE + 3],
                softening_sq,
            );

            ax += fx;
            ay += fy;
            az += fz;

            symmetric_x[local_j] -= fx;
            symmetric_y[local_j] -= fy;
            symmetric_z[local_j] -= fz;
        }

        i_acc[FORCE_STRIDE * local_i] = ax;
        i_acc[FORCE_STRIDE * local_i + 1] = ay;
        i_acc[FORCE_STRIDE * local_i + 2] = az;
    }

    // The reciprocal updates are amortized through the scratch arrays and
    // flushed once per tile call instead of once per pair.
    for local_j in 0..tile {
        j_rows[FORCE_STRIDE * local_j] += symmetric_x[local_j];
        j_rows[FORCE_STRIDE * local_j + 1] += symmetric_y[local_j];
        j_rows[FORCE_STRIDE * local_j + 2] += symmetric_z[local_j];
    }

    i_acc
}

/// Evaluates all interactions within group `i_tile`, including the softened
/// self-pair, and accumulates into that group's force rows.
fn diagonal_tile(rows: &mut [f32], pos_mass: &[f32], softening_sq: f32, i_tile: usize, tile: usize) {
    for local_i in 0..tile {
        let i = i_tile * tile + local_i;
        let my_x = pos_mass[i * INTERLEAVED_STRIDE];
        let my_y = pos_mass[i * INTERLEAVED_STRIDE + 1];
        let my_z = pos_mass[i * INTERLEAVED_STRIDE + 2];

        let mut acx = 0.0f32;
        let mut acy = 0.0f32;
        let mut acz = 0.0f32;

        for local_j in 0..tile {
            let j = i_tile * tile + local_j;
            let (fx, fy, fz) = body_body_interaction(
                my_x,
                my_y,
                my_z,
                pos_mass[j * INTERLEAVED_STRIDE],
                pos_mass[j * INTERLEAVED_STRIDE + 1],
                pos_mass[j * INTERLEAVED_STRIDE + 2],
                pos_mass[j * INTERLEAVED_STRIDE + 3],
                softening_sq,
            );

            acx += fx;
            acy += fy;
            acz += fz;
        }

        rows[FORCE_STRIDE * local_i] += acx;
        rows[FORCE_STRIDE * local_i + 1] += acy;
        rows[FORCE_STRIDE * local_i + 2] += acz;
    }
}
