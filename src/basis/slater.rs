//! Slater-type orbital basis, present at interface level.
//!
//! MOPAC aux files describe their orbitals with Slater functions rather than
//! contracted Gaussians. The loader hands back a [`SlaterBasis`] for those
//! files so callers can keep a single code path over both basis kinds; the
//! analytical STO evaluation engine itself is a separate concern and is not
//! part of this crate.

use super::{BasisSet, CompletionHandler};
use crate::cube::Cube;
use crate::error::OrbCubeError;
use crate::types::Molecule;
use log::warn;
use std::sync::Arc;

/// A Slater-type orbital basis set.
#[derive(Debug, Clone, Default)]
pub struct SlaterBasis {
    molecule: Molecule,
}

impl SlaterBasis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom (position in Ångström) and returns its index.
    pub fn add_atom(&mut self, position: [f64; 3], atomic_number: u8) -> usize {
        self.molecule.add_atom(position, atomic_number)
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.molecule.num_atoms()
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }
}

impl BasisSet for SlaterBasis {
    fn num_mos(&self) -> usize {
        0
    }

    fn compute_mo(
        &mut self,
        _cube: &Arc<Cube>,
        _state_index: usize,
        _on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        warn!("Slater-type orbital evaluation was requested but is not available");
        Err(OrbCubeError::Unsupported("Slater-type orbital evaluation"))
    }

    fn compute_density(
        &mut self,
        _cube: &Arc<Cube>,
        _on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        warn!("Slater-type orbital evaluation was requested but is not available");
        Err(OrbCubeError::Unsupported("Slater-type orbital evaluation"))
    }
}
