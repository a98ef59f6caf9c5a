pub mod basis;
pub mod cube;
pub mod error;
pub mod loader;
pub mod math;
pub mod parser;
pub mod types;

pub use basis::{Basis, BasisSet, CompletionHandler, GaussianBasis, SlaterBasis};
pub use cube::{Cube, CubeType};
pub use error::OrbCubeError;
pub use loader::{load_basis_set, match_basis_set};
pub use types::{Atom, Molecule, ShellType};
