use super::evaluator::{self, EvalTarget};
use super::{BasisSet, CompletionHandler};
use crate::cube::{Cube, CubeType};
use crate::error::OrbCubeError;
use crate::math::constants::{NORM_D_CROSS, NORM_D_DIAGONAL, NORM_P, NORM_S};
use crate::types::{Molecule, ShellType};
use faer::Mat;
use log::{debug, warn};
use std::f64::consts::PI;
use std::ops::Range;
use std::sync::Arc;

/// The dense in-memory form of a contracted Gaussian basis.
///
/// Shells and primitives live in parallel flat arrays so the evaluation
/// kernels stream through them with a single advancing index per shell.
/// The struct is shared read-only with worker threads during an evaluation;
/// builders go through copy-on-write, so an in-flight computation keeps its
/// snapshot while the caller mutates.
#[derive(Debug, Clone)]
pub(crate) struct GaussianData {
    pub(crate) molecule: Molecule,
    pub(crate) shell_types: Vec<ShellType>,
    /// Atom index owning each shell.
    pub(crate) shell_atoms: Vec<usize>,
    /// Index of each shell's first primitive. Normalization appends a sentinel
    /// holding the total primitive count, so shell `s` spans
    /// `shell_first_primitive[s]..shell_first_primitive[s + 1]` uniformly.
    pub(crate) shell_first_primitive: Vec<usize>,
    /// Row of each shell's first basis function in the MO matrix.
    pub(crate) shell_mo_offset: Vec<usize>,
    /// Index of each shell's first entry in `norm_coefficients`.
    pub(crate) shell_norm_offset: Vec<usize>,
    pub(crate) exponents: Vec<f64>,
    pub(crate) coefficients: Vec<f64>,
    /// Contraction coefficients premultiplied with the analytical
    /// normalization constants, primitive-major with angular components
    /// innermost.
    pub(crate) norm_coefficients: Vec<f64>,
    pub(crate) mo_matrix: Mat<f64>,
    pub(crate) density: Option<Mat<f64>>,
    pub(crate) num_mos: usize,
    pub(crate) normalized: bool,
}

impl Default for GaussianData {
    fn default() -> Self {
        Self {
            molecule: Molecule::new(),
            shell_types: Vec::new(),
            shell_atoms: Vec::new(),
            shell_first_primitive: Vec::new(),
            shell_mo_offset: Vec::new(),
            shell_norm_offset: Vec::new(),
            exponents: Vec::new(),
            coefficients: Vec::new(),
            norm_coefficients: Vec::new(),
            mo_matrix: Mat::new(),
            density: None,
            num_mos: 0,
            normalized: false,
        }
    }
}

impl GaussianData {
    #[inline]
    pub(crate) fn primitive_range(&self, shell: usize) -> Range<usize> {
        self.shell_first_primitive[shell]..self.shell_first_primitive[shell + 1]
    }

    #[inline]
    pub(crate) fn shell_exponents(&self, shell: usize) -> &[f64] {
        &self.exponents[self.primitive_range(shell)]
    }

    /// The normalized coefficients of `shell`; only valid for evaluated types.
    #[inline]
    pub(crate) fn shell_norm_coefficients(&self, shell: usize) -> &[f64] {
        let start = self.shell_norm_offset[shell];
        let len = self.primitive_range(shell).len() * self.shell_types[shell].components();
        &self.norm_coefficients[start..start + len]
    }
}

/// A contracted Gaussian basis set and its evaluation engine.
///
/// Construction happens through the builder methods in the order parsers emit
/// data: atoms, shells, primitives, molecular-orbital coefficients, and
/// optionally a density matrix. Every mutation invalidates the normalized
/// coefficients; the next evaluation re-runs the (memoized) normalization
/// pass before any worker touches a grid point.
///
/// `clone` produces an independent deep copy: the underlying data is shared
/// copy-on-write, so mutating either copy afterwards leaves the other intact.
#[derive(Debug, Clone, Default)]
pub struct GaussianBasis {
    data: Arc<GaussianData>,
}

impl GaussianBasis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the shared data, dropping the normalized state.
    fn edit(&mut self) -> &mut GaussianData {
        let data = Arc::make_mut(&mut self.data);
        if data.normalized {
            // Drop the primitive sentinel again so the builders see the raw
            // per-shell array they maintain.
            data.shell_first_primitive.pop();
            data.normalized = false;
        }
        data
    }

    pub(crate) fn data(&self) -> &GaussianData {
        &self.data
    }

    /// Appends an atom (position in Ångström) and returns its index.
    pub fn add_atom(&mut self, position: [f64; 3], atomic_number: u8) -> usize {
        self.edit().molecule.add_atom(position, atomic_number)
    }

    /// Appends a contracted shell on atom `atom_index` and returns the shell
    /// index. The basis dimension grows by the shell's component count.
    pub fn add_shell(&mut self, atom_index: usize, shell_type: ShellType) -> usize {
        let data = self.edit();
        data.shell_types.push(shell_type);
        data.shell_atoms.push(atom_index);
        data.num_mos += shell_type.components();
        data.shell_types.len() - 1
    }

    /// Appends one primitive to the most recently added shell.
    pub fn add_primitive(&mut self, coefficient: f64, exponent: f64) {
        let data = self.edit();
        if data.shell_first_primitive.len() < data.shell_types.len() {
            // First primitive of the newest shell.
            data.shell_first_primitive.push(data.exponents.len());
        }
        data.exponents.push(exponent);
        data.coefficients.push(coefficient);
    }

    /// Installs the molecular-orbital coefficient matrix from a flat,
    /// column-major array, replacing any previous matrix.
    ///
    /// The matrix is square with side `num_mos`. Some programs do not output
    /// every orbital, so the column count is taken from the length of the
    /// input; the remaining columns stay zero.
    pub fn set_mo_coefficients(&mut self, coefficients: &[f64]) {
        let data = self.edit();
        let n = data.num_mos;
        data.mo_matrix = Mat::zeros(n, n);
        if n == 0 {
            return;
        }
        let columns = (coefficients.len() / n).min(n);
        debug!("installing MO coefficients: {n} basis functions, {columns} columns");
        for column in 0..columns {
            for row in 0..n {
                data.mo_matrix[(row, column)] = coefficients[row + column * n];
            }
        }
    }

    /// Installs the density matrix, a symmetric matrix of side `num_mos`.
    pub fn set_density_matrix(&mut self, density: Mat<f64>) -> Result<(), OrbCubeError> {
        let expected = self.data.num_mos;
        if density.nrows() != expected || density.ncols() != expected {
            return Err(OrbCubeError::DensityDimensionMismatch {
                expected,
                found: density.nrows(),
            });
        }
        self.edit().density = Some(density);
        Ok(())
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.data.molecule.num_atoms()
    }

    #[inline]
    pub fn num_shells(&self) -> usize {
        self.data.shell_types.len()
    }

    /// The number of basis functions (and MO matrix columns).
    #[inline]
    pub fn num_mos(&self) -> usize {
        self.data.num_mos
    }

    pub fn molecule(&self) -> &Molecule {
        &self.data.molecule
    }

    /// Builds the normalized contraction coefficients and the per-shell
    /// offset tables. Memoized: a second call without an intervening mutation
    /// returns immediately and leaves every array byte-identical.
    fn normalize(&mut self) -> Result<(), OrbCubeError> {
        if self.data.normalized {
            return Ok(());
        }
        let data = Arc::make_mut(&mut self.data);

        // A shell that never received a primitive leaves the first-primitive
        // array short, wherever in the sequence it sits: each add_primitive
        // pushes at most one catch-up entry, so the count never recovers.
        if data.shell_first_primitive.len() != data.shell_types.len() {
            return Err(OrbCubeError::EmptyShell);
        }
        data.shell_first_primitive.push(data.exponents.len());

        data.shell_mo_offset.clear();
        data.shell_norm_offset.clear();
        data.norm_coefficients.clear();

        let mut mo_offset = 0;
        for shell in 0..data.shell_types.len() {
            data.shell_mo_offset.push(mo_offset);
            data.shell_norm_offset.push(data.norm_coefficients.len());
            let range = data.shell_first_primitive[shell]..data.shell_first_primitive[shell + 1];
            let shell_type = data.shell_types[shell];
            match shell_type {
                ShellType::S => {
                    for j in range {
                        data.norm_coefficients
                            .push(data.coefficients[j] * data.exponents[j].powf(0.75) * NORM_S);
                    }
                }
                ShellType::P => {
                    for j in range {
                        let norm = data.coefficients[j] * data.exponents[j].powf(1.25) * NORM_P;
                        data.norm_coefficients.extend_from_slice(&[norm, norm, norm]);
                    }
                }
                ShellType::D => {
                    // Order is xx, yy, zz, xy, xz, yz.
                    for j in range {
                        let radial = data.coefficients[j] * data.exponents[j].powf(1.75);
                        let diagonal = radial * NORM_D_DIAGONAL;
                        let cross = radial * NORM_D_CROSS;
                        data.norm_coefficients
                            .extend_from_slice(&[diagonal, diagonal, diagonal, cross, cross, cross]);
                    }
                }
                ShellType::D5 => {
                    // Order is d0, d1+, d1-, d2+, d2-.
                    let pi3 = PI.powi(3);
                    for j in range {
                        let c = data.coefficients[j];
                        let alpha7 = data.exponents[j].powi(7);
                        let d0 = c * (2048.0 * alpha7 / (9.0 * pi3)).powf(0.25);
                        let d1 = c * (2048.0 * alpha7 / pi3).powf(0.25);
                        let d2p = c * (128.0 * alpha7 / pi3).powf(0.25);
                        data.norm_coefficients
                            .extend_from_slice(&[d0, d1, d1, d2p, d1]);
                    }
                }
                _ => {
                    // The MO columns are reserved, but no coefficients exist:
                    // these shells evaluate to zero.
                    warn!(
                        "shell {shell} has angular type {shell_type:?}, which is not evaluated; \
                         its contribution will be zero"
                    );
                }
            }
            mo_offset += shell_type.components();
        }
        debug_assert_eq!(mo_offset, data.num_mos);

        // A basis without installed MO coefficients evaluates to zero rather
        // than indexing out of bounds.
        if data.mo_matrix.nrows() != data.num_mos || data.mo_matrix.ncols() != data.num_mos {
            data.mo_matrix = Mat::zeros(data.num_mos, data.num_mos);
        }

        data.normalized = true;
        Ok(())
    }

    /// Dispatches the evaluation of molecular orbital `state_index` (1-based)
    /// over every sample of `cube`.
    ///
    /// On success the cube is tagged [`CubeType::Mo`], its write lock is held,
    /// and the samples fill in on the worker pool; `on_complete` fires once
    /// after the lock is released. On error the cube is untouched.
    pub fn compute_mo(
        &mut self,
        cube: &Arc<Cube>,
        state_index: usize,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        if self.data.shell_types.is_empty() {
            return Err(OrbCubeError::EmptyBasis);
        }
        let num_mos = self.data.num_mos;
        if state_index < 1 || state_index > num_mos {
            return Err(OrbCubeError::MoIndexOutOfRange {
                state: state_index,
                num_mos,
            });
        }
        self.normalize()?;

        cube.set_cube_type(CubeType::Mo);
        evaluator::dispatch(
            Arc::clone(&self.data),
            Arc::clone(cube),
            EvalTarget::Orbital {
                mo_column: state_index - 1,
            },
            on_complete,
        );
        Ok(())
    }

    /// Dispatches the evaluation of the total electron density over every
    /// sample of `cube`.
    ///
    /// Requires a density matrix installed via
    /// [`set_density_matrix`](Self::set_density_matrix); on success the cube
    /// is tagged [`CubeType::ElectronDensity`].
    pub fn compute_density(
        &mut self,
        cube: &Arc<Cube>,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        if self.data.density.is_none() {
            return Err(OrbCubeError::DensityMatrixMissing);
        }
        if self.data.shell_types.is_empty() {
            return Err(OrbCubeError::EmptyBasis);
        }
        self.normalize()?;
        if let Some(density) = self.data.density.as_ref() {
            if density.nrows() != self.data.num_mos {
                return Err(OrbCubeError::DensityDimensionMismatch {
                    expected: self.data.num_mos,
                    found: density.nrows(),
                });
            }
        }

        cube.set_cube_type(CubeType::ElectronDensity);
        evaluator::dispatch(
            Arc::clone(&self.data),
            Arc::clone(cube),
            EvalTarget::Density,
            on_complete,
        );
        Ok(())
    }
}

impl BasisSet for GaussianBasis {
    fn num_mos(&self) -> usize {
        GaussianBasis::num_mos(self)
    }

    fn compute_mo(
        &mut self,
        cube: &Arc<Cube>,
        state_index: usize,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        GaussianBasis::compute_mo(self, cube, state_index, on_complete)
    }

    fn compute_density(
        &mut self,
        cube: &Arc<Cube>,
        on_complete: CompletionHandler,
    ) -> Result<(), OrbCubeError> {
        GaussianBasis::compute_density(self, cube, on_complete)
    }
}
