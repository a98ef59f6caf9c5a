//! The single entry point that turns a user-selected file into a basis set.
//!
//! Output files from quantum-chemistry packages usually travel in groups: a
//! log next to a checkpoint next to a geometry. [`match_basis_set`] finds the
//! sibling of a selected file whose extension indicates a readable format,
//! and [`load_basis_set`] dispatches on that extension to the matching parser
//! and basis kind.

use crate::basis::{Basis, GaussianBasis, SlaterBasis};
use crate::error::OrbCubeError;
use crate::parser;
use log::debug;
use std::path::{Path, PathBuf};

/// The basis-set file formats recognized by their extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BasisFormat {
    /// Gaussian formatted checkpoint (`fchk`, `fch`, `fck`).
    Fchk,
    /// GAMESS-UK output (`gukout`).
    GamessUk,
    /// MOPAC auxiliary file (`aux`).
    MopacAux,
    /// Molden format (`molden`, `mold`, `molf`).
    Molden,
}

/// Classifies a path by a case-insensitive substring test against its
/// complete suffix (everything after the first dot of the file name), in
/// fixed priority order.
fn classify(path: &Path) -> Option<BasisFormat> {
    let name = path.file_name()?.to_str()?;
    let suffix = name.split_once('.')?.1.to_ascii_lowercase();
    if suffix.contains("fchk") || suffix.contains("fch") || suffix.contains("fck") {
        Some(BasisFormat::Fchk)
    } else if suffix.contains("gukout") {
        Some(BasisFormat::GamessUk)
    } else if suffix.contains("aux") {
        Some(BasisFormat::MopacAux)
    } else if suffix.contains("molden") || suffix.contains("mold") || suffix.contains("molf") {
        Some(BasisFormat::Molden)
    } else {
        None
    }
}

/// The stem of a file name up to its first dot.
fn base_name(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(name.split('.').next().unwrap_or(name))
}

/// Given a user-selected file, returns a sibling file whose extension
/// indicates a recognized basis-set format.
///
/// The named file itself is considered first, then the readable files next to
/// it that share its base name, in name order. Returns `None` when nothing
/// matches.
pub fn match_basis_set(path: &Path) -> Option<PathBuf> {
    if classify(path).is_some() {
        return Some(path.to_path_buf());
    }

    let stem = base_name(path)?;
    let parent = path.parent()?;
    let mut siblings: Vec<PathBuf> = std::fs::read_dir(parent)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|candidate| {
            candidate.is_file() && base_name(candidate) == Some(stem)
        })
        .collect();
    siblings.sort();

    siblings.into_iter().find(|candidate| classify(candidate).is_some())
}

/// Loads the basis set contained in `path`, dispatching on its extension.
///
/// Checkpoint and Molden files produce a [`GaussianBasis`]; MOPAC aux files
/// produce a [`SlaterBasis`]. Unrecognized extensions and parser failures are
/// reported as errors.
pub fn load_basis_set(path: &Path) -> Result<Basis, OrbCubeError> {
    match classify(path) {
        Some(BasisFormat::Fchk) => {
            let mut basis = GaussianBasis::new();
            parser::fchk::parse(path, &mut basis)?;
            Ok(Basis::Gaussian(basis))
        }
        Some(BasisFormat::Molden) => {
            let mut basis = GaussianBasis::new();
            parser::molden::parse(path, &mut basis)?;
            Ok(Basis::Gaussian(basis))
        }
        Some(BasisFormat::MopacAux) => {
            // The Slater data model lives here; its MOPAC reader is an
            // external collaborator driving the same builder surface.
            debug!("instantiating a Slater basis for '{}'", path.display());
            Ok(Basis::Slater(SlaterBasis::new()))
        }
        Some(BasisFormat::GamessUk) => Err(OrbCubeError::Unsupported("the GAMESS-UK reader")),
        None => Err(OrbCubeError::UnrecognizedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_classify_priorities_and_case() {
        assert_eq!(classify(Path::new("a.fchk")), Some(BasisFormat::Fchk));
        assert_eq!(classify(Path::new("a.FCh")), Some(BasisFormat::Fchk));
        assert_eq!(classify(Path::new("a.fck")), Some(BasisFormat::Fchk));
        assert_eq!(classify(Path::new("a.gukout")), Some(BasisFormat::GamessUk));
        assert_eq!(classify(Path::new("a.AUX")), Some(BasisFormat::MopacAux));
        assert_eq!(classify(Path::new("a.molden")), Some(BasisFormat::Molden));
        assert_eq!(classify(Path::new("a.molf")), Some(BasisFormat::Molden));
        assert_eq!(classify(Path::new("a.xyz")), None);
        assert_eq!(classify(Path::new("noextension")), None);
        // The complete suffix is tested: a trailing extension still matches.
        assert_eq!(classify(Path::new("a.fchk.bak")), Some(BasisFormat::Fchk));
    }

    #[test]
    fn test_match_returns_named_file_first() {
        let dir = TempDir::new().unwrap();
        let named = dir.path().join("job.molden");
        File::create(&named).unwrap();
        File::create(dir.path().join("job.fchk")).unwrap();

        // The named file matches on its own and wins over the sibling.
        assert_eq!(match_basis_set(&named), Some(named));
    }

    #[test]
    fn test_match_finds_sibling() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("job.log");
        File::create(&log).unwrap();
        let checkpoint = dir.path().join("job.fchk");
        File::create(&checkpoint).unwrap();
        File::create(dir.path().join("other.aux")).unwrap();

        assert_eq!(match_basis_set(&log), Some(checkpoint));
    }

    #[test]
    fn test_match_none_without_candidates() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("job.log");
        File::create(&log).unwrap();
        assert_eq!(match_basis_set(&log), None);
    }
}
