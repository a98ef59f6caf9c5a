//! This module contains the basis-set engines and their shared capability surface.
//!
//! It includes the contracted-Gaussian engine (`GaussianBasis`), the interface-level
//! Slater-type basis (`SlaterBasis`), and the `BasisSet` trait through which callers
//! request grid evaluations without caring which kind of basis a file produced.

mod evaluator;
mod gaussian;
mod slater;

/// The contracted Gaussian basis-set engine.
///
/// This is the main engine of the library: it owns the shells, primitives and
/// coefficient matrices of a parsed basis and evaluates molecular orbitals or
/// the electron density over a cube.
pub use gaussian::GaussianBasis;

/// The Slater-type orbital basis.
///
/// Present at interface level so loaders can hand one back; its analytical
/// evaluation engine lives outside this crate.
pub use slater::SlaterBasis;

use crate::cube::Cube;
use crate::error::OrbCubeError;
use std::sync::Arc;

/// A one-shot completion callback, invoked exactly once after an evaluation
/// has written every sample and released the cube's write lock.
///
/// The lock release happens-before the callback runs, so the callback (and
/// anything it unblocks) observes every worker's writes.
pub type CompletionHandler = Box<dyn FnOnce() + Send + 'static>;

/// The capability set shared by every basis-set kind.
///
/// Evaluations are non-blocking: a successful return means the work has been
/// dispatched and the cube's write lock is held; the completion handler fires
/// asynchronously once the cube is filled in. A basis supports one
/// outstanding computation at a time; overlapping dispatches on the same
/// basis are not defined.
pub trait BasisSet {
    /// The number of basis functions, equal to the number of molecular-orbital
    /// columns.
    fn num_mos(&self) -> usize;

    /// Dispatches the evaluation of molecular orbital `state_index` (1-based)
    /// over every sample of `cube`.
    fn compute_mo(
        &mut self,
        cube: &Arc<Cube>,
        state_index: usize,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError>;

    /// Dispatches the evaluation of the total electron density over every
    /// sample of `cube`. Requires an installed density matrix.
    fn compute_density(
        &mut self,
        cube: &Arc<Cube>,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError>;
}

/// A basis set of either supported kind, as returned by the loader.
#[derive(Debug, Clone)]
pub enum Basis {
    Gaussian(GaussianBasis),
    Slater(SlaterBasis),
}

impl BasisSet for Basis {
    fn num_mos(&self) -> usize {
        match self {
            Basis::Gaussian(basis) => basis.num_mos(),
            Basis::Slater(basis) => BasisSet::num_mos(basis),
        }
    }

    fn compute_mo(
        &mut self,
        cube: &Arc<Cube>,
        state_index: usize,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        match self {
            Basis::Gaussian(basis) => basis.compute_mo(cube, state_index, on_complete),
            Basis::Slater(basis) => BasisSet::compute_mo(basis, cube, state_index, on_complete),
        }
    }

    fn compute_density(
        &mut self,
        cube: &Arc<Cube>,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        match self {
            Basis::Gaussian(basis) => basis.compute_density(cube, on_complete),
            Basis::Slater(basis) => BasisSet::compute_density(basis, cube, on_complete),
        }
    }
}
