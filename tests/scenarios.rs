//! End-to-end scenarios: small hand-built bases evaluated over cubes, plus
//! the loader dispatch over on-disk files.

mod common;

use approx::assert_relative_eq;
use common::{compute_mo_blocking, hydrogen_s_basis, single_p_basis};
use orbcube::{load_basis_set, Basis, Cube, CubeType, OrbCubeError};
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

// (8 / pi^3)^(1/4), the S normalization prefactor for alpha = 1.
const S_NORM: f64 = 0.71270547;

#[test]
fn test_scenario_center_sample_matches_analytic_value() {
    let mut basis = hydrogen_s_basis(1.0, 1.0, 1.0);
    let cube = Arc::new(Cube::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [3, 3, 3]));
    compute_mo_blocking(&mut basis, &cube, 1);

    assert_eq!(cube.cube_type(), CubeType::Mo);
    // The center sample sits exactly on the atom: psi(0) = alpha^(3/4) * N.
    let center = cube.index_of(1, 1, 1);
    assert_relative_eq!(cube.value(center), S_NORM, epsilon = 1e-12);

    // Off-center samples decay; opposite corners are equal by symmetry.
    let corner_a = cube.index_of(0, 0, 0);
    let corner_b = cube.index_of(2, 2, 2);
    assert!(cube.value(corner_a) < cube.value(center));
    assert_relative_eq!(cube.value(corner_a), cube.value(corner_b), epsilon = 1e-12);
}

#[test]
fn test_scenario_zero_mo_coefficient_gives_zero_cube() {
    let mut basis = hydrogen_s_basis(1.0, 1.0, 0.0);
    let cube = Arc::new(Cube::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [3, 3, 3]));
    compute_mo_blocking(&mut basis, &cube, 1);

    let samples = cube.samples();
    assert!(samples.iter().all(|&value| value == 0.0));
}

#[test]
fn test_scenario_p_shell_antisymmetric_along_axis() {
    let mut basis = single_p_basis(1.0, 1.0);
    // Three samples on the x axis: (-1, 0, 0), (0, 0, 0), (1, 0, 0) Å.
    let cube = Arc::new(Cube::new([-1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [3, 1, 1]));
    compute_mo_blocking(&mut basis, &cube, 1);

    let samples = cube.samples();
    assert_relative_eq!(samples[0], -samples[2], epsilon = 1e-12);
    assert_relative_eq!(samples[1], 0.0, epsilon = 1e-15);
    assert!(samples[2] != 0.0);
}

const HYDROGEN_FCHK: &str = "\
Hydrogen atom
SP        RHF                                                         STO-3G
Number of atoms                            I                1
Atomic numbers                             I   N=           1
           1
Current cartesian coordinates              R   N=           3
  0.00000000E+00  0.00000000E+00  0.00000000E+00
Shell types                                I   N=           1
           0
Number of primitives per shell             I   N=           1
           3
Shell to atom map                          I   N=           1
           1
Primitive exponents                        R   N=           3
  3.42525091E+00  6.23913730E-01  1.68855404E-01
Contraction coefficients                   R   N=           3
  1.54328971E-01  5.35328142E-01  4.44634542E-01
Alpha MO coefficients                      R   N=           1
  1.00000000E+00
";

#[test]
fn test_scenario_loader_dispatch() {
    let dir = TempDir::new().unwrap();

    let checkpoint = dir.path().join("foo.fchk");
    write!(File::create(&checkpoint).unwrap(), "{}", HYDROGEN_FCHK).unwrap();
    let loaded = load_basis_set(&checkpoint).unwrap();
    match loaded {
        Basis::Gaussian(basis) => {
            assert_eq!(basis.num_atoms(), 1);
            assert_eq!(basis.num_mos(), 1);
        }
        Basis::Slater(_) => panic!("an fchk file must produce a Gaussian basis"),
    }

    let aux = dir.path().join("foo.aux");
    File::create(&aux).unwrap();
    assert!(matches!(load_basis_set(&aux), Ok(Basis::Slater(_))));

    let geometry = dir.path().join("foo.xyz");
    File::create(&geometry).unwrap();
    assert!(matches!(
        load_basis_set(&geometry),
        Err(OrbCubeError::UnrecognizedFormat { .. })
    ));
}

#[test]
fn test_scenario_loaded_basis_evaluates() {
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("h.fchk");
    write!(File::create(&checkpoint).unwrap(), "{}", HYDROGEN_FCHK).unwrap();

    let Ok(Basis::Gaussian(mut basis)) = load_basis_set(&checkpoint) else {
        panic!("failed to load the checkpoint");
    };
    let cube = Arc::new(Cube::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1, 1, 1]));
    compute_mo_blocking(&mut basis, &cube, 1);

    // STO-3G hydrogen 1s at the nucleus: sum of the normalized primitives.
    let expected: f64 = [
        (3.42525091f64, 1.54328971f64),
        (0.62391373, 5.35328142e-1),
        (0.168855404, 4.44634542e-1),
    ]
    .iter()
    .map(|(alpha, coefficient)| coefficient * alpha.powf(0.75) * S_NORM)
    .sum();
    assert_relative_eq!(cube.value(0), expected, epsilon = 1e-9);
}
