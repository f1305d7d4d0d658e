use crate::errors::EvaluatorError;
use crate::layout::AlignedVec;

/// Attribute slots per body in the interleaved layout: x, y, z, mass.
pub const INTERLEAVED_STRIDE: usize = 4;

/// Force components per body: fx, fy, fz.
pub const FORCE_STRIDE: usize = 3;

/// One body population held in both storage conventions at once.
///
/// The interleaved buffer stores each body as four consecutive slots
/// `(x, y, z, mass)` and feeds the tiled evaluator; the planar arrays store
/// one attribute per buffer and feed the planar and lane-batched evaluators.
/// Planar storage is aligned (see [`AlignedVec`]) so the same population can
/// be handed to any evaluator without copying.
///
/// Both views are read-only after construction; an evaluator never mutates
/// its inputs.
#[derive(Clone, Debug)]
pub struct BodySet {
    pos_mass: Vec<f32>,
    x: AlignedVec,
    y: AlignedVec,
    z: AlignedVec,
    mass: AlignedVec,
}

impl BodySet {
    /// Builds both layouts from per-body `[x, y, z, mass]` entries.
    pub fn from_bodies(bodies: &[[f32; 4]]) -> Self {
        let n = bodies.len();
        let mut pos_mass = Vec::with_capacity(n * INTERLEAVED_STRIDE);
        let mut x = AlignedVec::zeroed(n);
        let mut y = AlignedVec::zeroed(n);
        let mut z = AlignedVec::zeroed(n);
        let mut mass = AlignedVec::zeroed(n);

        for (i, body) in bodies.iter().enumerate() {
            pos_mass.extend_from_slice(body);
            x[i] = body[0];
            y[i] = body[1];
            z[i] = body[2];
            mass[i] = body[3];
        }

        BodySet { pos_mass, x, y, z, mass }
    }

    /// Builds both layouts from an interleaved `(x, y, z, mass)` buffer.
    ///
    /// # Errors
    ///
    /// Rejects a buffer whose length is not a multiple of four; trailing
    /// slots are never silently dropped.
    pub fn from_interleaved(pos_mass: &[f32]) -> Result<Self, EvaluatorError> {
        let n = pos_mass.len() / INTERLEAVED_STRIDE;
        if n * INTERLEAVED_STRIDE != pos_mass.len() {
            return Err(EvaluatorError::BufferSizeMismatch {
                expected: n * INTERLEAVED_STRIDE,
                actual: pos_mass.len(),
            });
        }
        let bodies: Vec<[f32; 4]> = pos_mass
            .chunks_exact(INTERLEAVED_STRIDE)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Ok(Self::from_bodies(&bodies))
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Interleaved `(x, y, z, mass)` view, 4 slots per body.
    pub fn interleaved(&self) -> &[f32] {
        &self.pos_mass
    }

    /// Planar views in `(x, y, z, mass)` order.
    pub fn planar(&self) -> (&[f32], &[f32], &[f32], &[f32]) {
        (&self.x, &self.y, &self.z, &self.mass)
    }
}

/// Net force on every body, stored as three aligned planar arrays.
#[derive(Clone, Debug)]
pub struct ForceSet {
    pub x: AlignedVec,
    pub y: AlignedVec,
    pub z: AlignedVec,
}

impl ForceSet {
    pub fn zeroed(n: usize) -> Self {
        ForceSet {
            x: AlignedVec::zeroed(n),
            y: AlignedVec::zeroed(n),
            z: AlignedVec::zeroed(n),
        }
    }

    /// Splits an interleaved force buffer (3 slots per body) into planar
    /// component arrays.
    pub fn from_interleaved(force: &[f32]) -> Self {
        let n = force.len() / FORCE_STRIDE;
        let mut out = Self::zeroed(n);
        for i in 0..n {
            out.x[i] = force[FORCE_STRIDE * i];
            out.y[i] = force[FORCE_STRIDE * i + 1];
            out.z[i] = force[FORCE_STRIDE * i + 2];
        }
        out
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The force vector on body `i`.
    pub fn get(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }
}
