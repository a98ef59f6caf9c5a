use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all fallible operations in the `orbcube` library.
///
/// This enum is designed to be comprehensive, providing clear and actionable
/// information for each potential failure mode, from I/O issues to dimension
/// mismatches between a basis and its coefficient matrices. It implements
/// `std::error::Error`, allowing it to be composed with other error types in
/// application code.
///
/// None of these errors is fatal: each is local to one basis set or one
/// requested computation, and it is the caller's responsibility to act on it.
#[derive(Error, Debug)]
pub enum OrbCubeError {
    /// Indicates that an evaluation was requested on a basis set that contains
    /// no shells.
    ///
    /// This typically means the basis was constructed manually without any
    /// `add_shell` calls, or a parser failed to populate it.
    #[error("Basis set is empty: no shells have been added")]
    EmptyBasis,

    /// The requested molecular-orbital index lies outside the valid range.
    ///
    /// Orbital indices are 1-based; the valid range is `1..=num_mos`.
    #[error("Molecular orbital {state} is out of range (valid: 1..={num_mos})")]
    MoIndexOutOfRange {
        /// The 1-based orbital index that was requested.
        state: usize,
        /// The number of basis functions (and MO columns) in the basis.
        num_mos: usize,
    },

    /// An electron-density evaluation was requested, but no density matrix has
    /// been installed via `set_density_matrix`.
    #[error("Cannot compute the electron density: no density matrix has been set")]
    DensityMatrixMissing,

    /// The provided density matrix does not match the dimension of the basis.
    ///
    /// The density matrix must be square with side equal to the number of
    /// basis functions.
    #[error("Density matrix of side {found} does not match the basis dimension {expected}")]
    DensityDimensionMismatch {
        /// The number of basis functions in the basis.
        expected: usize,
        /// The side length of the rejected matrix.
        found: usize,
    },

    /// A contracted shell was recorded without any primitives.
    ///
    /// Every shell must own at least one primitive Gaussian; an empty shell
    /// would leave the primitive index arrays misaligned.
    #[error("Basis contains a shell with no primitives")]
    EmptyShell,

    /// An I/O error that occurred while attempting to read a basis-set file.
    ///
    /// The path to the file and the underlying I/O error are provided for context.
    #[error("I/O error at path '{path}': {source}")]
    Io {
        /// The path of the file that caused the I/O error.
        path: PathBuf,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// A basis-set file was readable but malformed.
    #[error("Failed to parse '{path}': {details}")]
    Parse {
        /// The path of the offending file.
        path: PathBuf,
        /// A human-readable description of what was wrong.
        details: String,
    },

    /// The file's extension does not correspond to any recognized basis-set
    /// format.
    #[error("No recognized basis-set format for '{path}'")]
    UnrecognizedFormat {
        /// The path that could not be classified.
        path: PathBuf,
    },

    /// The requested capability is recognized but not provided by this crate.
    #[error("{0} is not implemented in this crate")]
    Unsupported(&'static str),
}
