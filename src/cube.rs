//! A regular 3-D grid of scalar samples with a read/write lock.
//!
//! A [`Cube`] is the output target of every evaluation: a rectilinear grid
//! described by an origin, a per-axis spacing and per-axis extents, backed by a
//! linear sample array. The engine holds the sample array's write lock for the
//! whole duration of a computation, so readers (renderers, exporters) block
//! until the cube is complete.

use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Identifies what the samples of a cube represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeType {
    /// The cube has not been computed yet.
    #[default]
    None,
    /// Values of a single molecular orbital ψ_k(r).
    Mo,
    /// The total electron density ρ(r).
    ElectronDensity,
}

/// A regular three-dimensional grid of `f64` samples.
///
/// Sample `i` sits at `origin + spacing ⊙ (ix, iy, iz)`, where `(ix, iy, iz)`
/// is the row-major decomposition of `i` (x slowest, z fastest). Origin and
/// spacing are in Ångström.
///
/// The sample array sits behind a read/write lock: an evaluation acquires it
/// for writing before any worker runs and releases it only after the last
/// point has been written, so concurrent readers always observe either the
/// previous contents or the finished result. Within an evaluation each worker
/// writes a disjoint set of indices, so no further per-sample synchronization
/// exists.
#[derive(Debug)]
pub struct Cube {
    origin: [f64; 3],
    spacing: [f64; 3],
    dims: [usize; 3],
    samples: RwLock<Vec<f64>>,
    kind: Mutex<CubeType>,
}

impl Cube {
    /// Creates a zero-filled cube with the given origin, spacing and extents,
    /// all in Ångström.
    pub fn new(origin: [f64; 3], spacing: [f64; 3], dims: [usize; 3]) -> Self {
        let len = dims[0] * dims[1] * dims[2];
        Self {
            origin,
            spacing,
            dims,
            samples: RwLock::new(vec![0.0; len]),
            kind: Mutex::new(CubeType::None),
        }
    }

    /// The total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// The position of sample `index` in Ångström.
    #[inline]
    pub fn position(&self, index: usize) -> [f64; 3] {
        let ix = index / (self.dims[1] * self.dims[2]);
        let iy = (index / self.dims[2]) % self.dims[1];
        let iz = index % self.dims[2];
        [
            self.origin[0] + self.spacing[0] * ix as f64,
            self.origin[1] + self.spacing[1] * iy as f64,
            self.origin[2] + self.spacing[2] * iz as f64,
        ]
    }

    /// The linear index of the sample at grid coordinates `(ix, iy, iz)`.
    #[inline]
    pub fn index_of(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.dims[1] + iy) * self.dims[2] + iz
    }

    /// What the samples currently represent.
    pub fn cube_type(&self) -> CubeType {
        *self.kind.lock().expect("cube type lock poisoned")
    }

    /// Tags the cube with what its samples represent.
    ///
    /// The tag is independent of the sample lock, so it is observable while a
    /// computation is still filling the samples in.
    pub fn set_cube_type(&self, kind: CubeType) {
        *self.kind.lock().expect("cube type lock poisoned") = kind;
    }

    /// Reads a single sample, blocking while a computation holds the cube.
    pub fn value(&self, index: usize) -> f64 {
        self.samples()[index]
    }

    /// Writes a single sample, blocking while a computation holds the cube.
    pub fn set_value(&self, index: usize, value: f64) {
        self.samples_write()[index] = value;
    }

    /// Read access to the whole sample array.
    ///
    /// Blocks until any in-flight computation has released the cube.
    pub fn samples(&self) -> RwLockReadGuard<'_, Vec<f64>> {
        self.samples.read().expect("cube sample lock poisoned")
    }

    /// Non-blocking read access; `None` while a computation holds the cube.
    pub fn try_samples(&self) -> Option<RwLockReadGuard<'_, Vec<f64>>> {
        self.samples.try_read().ok()
    }

    pub(crate) fn samples_write(&self) -> RwLockWriteGuard<'_, Vec<f64>> {
        self.samples.write().expect("cube sample lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_row_major_positions() {
        let cube = Cube::new([-1.0, -2.0, -3.0], [0.5, 1.0, 2.0], [2, 3, 4]);
        assert_eq!(cube.len(), 24);

        // index 0 is the origin; the last index is the opposite corner.
        assert_eq!(cube.position(0), [-1.0, -2.0, -3.0]);
        let far = cube.position(23);
        assert_relative_eq!(far[0], -1.0 + 0.5, epsilon = 1e-15);
        assert_relative_eq!(far[1], -2.0 + 2.0, epsilon = 1e-15);
        assert_relative_eq!(far[2], -3.0 + 6.0, epsilon = 1e-15);

        // z is the fastest axis.
        assert_eq!(cube.position(1)[2], -1.0);
        assert_eq!(cube.position(1)[0], -1.0);
    }

    #[test]
    fn test_index_of_round_trip() {
        let cube = Cube::new([0.0; 3], [1.0; 3], [3, 4, 5]);
        let index = cube.index_of(2, 1, 3);
        assert_eq!(index, (2 * 4 + 1) * 5 + 3);
        let position = cube.position(index);
        assert_eq!(position, [2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_value_round_trip_and_type_tag() {
        let cube = Cube::new([0.0; 3], [1.0; 3], [2, 2, 2]);
        assert_eq!(cube.cube_type(), CubeType::None);
        cube.set_value(5, 1.25);
        assert_eq!(cube.value(5), 1.25);
        cube.set_cube_type(CubeType::Mo);
        assert_eq!(cube.cube_type(), CubeType::Mo);
    }
}
