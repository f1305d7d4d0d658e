use std::ops::{Deref, DerefMut};
use std::slice;

/// Alignment (in bytes) guaranteed by [`AlignedVec`]. Covers SSE (16),
/// AVX (32) and a full cache line.
pub const BUFFER_ALIGNMENT: usize = 64;

const CHUNK_LANES: usize = BUFFER_ALIGNMENT / std::mem::size_of::<f32>();

#[repr(C, align(64))]
#[derive(Clone, Copy, Debug)]
struct AlignedChunk([f32; CHUNK_LANES]);

/// A fixed-length `f32` buffer whose backing storage is 64-byte aligned.
///
/// The lane-batched evaluators load planar attribute arrays in register-wide
/// strides and require their base pointers to sit on the register's natural
/// alignment. A plain `Vec<f32>` only guarantees 4-byte alignment, so planar
/// storage is carved out of a vector of over-aligned chunks instead and
/// viewed as a flat slice.
#[derive(Clone, Debug)]
pub struct AlignedVec {
    chunks: Vec<AlignedChunk>,
    len: usize,
}

impl AlignedVec {
    /// Allocates a zero-initialized buffer of `len` floats.
    pub fn zeroed(len: usize) -> Self {
        let n_chunks = (len + CHUNK_LANES - 1) / CHUNK_LANES;
        AlignedVec {
            chunks: vec![AlignedChunk([0.0; CHUNK_LANES]); n_chunks],
            len,
        }
    }

    /// Allocates an aligned copy of `values`.
    pub fn from_slice(values: &[f32]) -> Self {
        let mut buf = Self::zeroed(values.len());
        buf.as_mut_slice().copy_from_slice(values);
        buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f32] {
        // The chunk storage is contiguous `f32`s; `len` never exceeds the
        // chunk capacity established at construction.
        unsafe { slice::from_raw_parts(self.chunks.as_ptr().cast::<f32>(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        unsafe { slice::from_raw_parts_mut(self.chunks.as_mut_ptr().cast::<f32>(), self.len) }
    }
}

impl Deref for AlignedVec {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        self.as_slice()
    }
}

impl DerefMut for AlignedVec {
    fn deref_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }
}
