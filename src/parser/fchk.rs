//! Reader for Gaussian formatted checkpoint (FCHK) files.
//!
//! An FCHK file is a sequence of labeled blocks: a label line carrying a type
//! character and an optional `N=` element count, followed by the values packed
//! several per line. Only the blocks the evaluation engine needs are read;
//! everything else is skipped.

use crate::basis::GaussianBasis;
use crate::error::OrbCubeError;
use crate::math::constants::BOHR_TO_ANGSTROM;
use crate::types::ShellType;
use faer::Mat;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BLOCK_LABELS: &[&str] = &[
    "Atomic numbers",
    "Current cartesian coordinates",
    "Shell types",
    "Number of primitives per shell",
    "Shell to atom map",
    "Primitive exponents",
    "Contraction coefficients",
    "P(S=P) Contraction coefficients",
    "Alpha MO coefficients",
    "Total SCF Density",
];

/// Populates `basis` from the FCHK file at `path`.
pub fn parse(path: &Path, basis: &mut GaussianBasis) -> Result<(), OrbCubeError> {
    let content = fs::read_to_string(path).map_err(|source| OrbCubeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let blocks = read_blocks(&content, path)?;
    build_basis(path, &blocks, basis)
}

fn parse_error(path: &Path, details: impl Into<String>) -> OrbCubeError {
    OrbCubeError::Parse {
        path: path.to_path_buf(),
        details: details.into(),
    }
}

/// Collects the labeled vector blocks the engine cares about.
fn read_blocks(
    content: &str,
    path: &Path,
) -> Result<HashMap<&'static str, Vec<f64>>, OrbCubeError> {
    let mut blocks = HashMap::new();
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        let Some(&label) = BLOCK_LABELS.iter().find(|label| line.starts_with(**label)) else {
            continue;
        };
        // Scalar entries carry no N= count; none of them are needed here.
        let Some(count_position) = line.find("N=") else {
            continue;
        };
        let count: usize = line[count_position + 2..]
            .trim()
            .parse()
            .map_err(|_| parse_error(path, format!("invalid element count for '{label}'")))?;

        let mut values = Vec::with_capacity(count);
        while values.len() < count {
            let Some(data_line) = lines.next() else {
                return Err(parse_error(path, format!("block '{label}' is truncated")));
            };
            for token in data_line.split_whitespace() {
                let value: f64 = token.parse().map_err(|_| {
                    parse_error(path, format!("invalid value '{token}' in block '{label}'"))
                })?;
                values.push(value);
            }
        }
        values.truncate(count);
        blocks.insert(label, values);
    }
    Ok(blocks)
}

fn build_basis(
    path: &Path,
    blocks: &HashMap<&'static str, Vec<f64>>,
    basis: &mut GaussianBasis,
) -> Result<(), OrbCubeError> {
    let required = |label: &'static str| {
        blocks
            .get(label)
            .ok_or_else(|| parse_error(path, format!("missing block '{label}'")))
    };

    let atomic_numbers = required("Atomic numbers")?;
    let coordinates = required("Current cartesian coordinates")?;
    if coordinates.len() != atomic_numbers.len() * 3 {
        return Err(parse_error(
            path,
            "coordinate count does not match the number of atoms",
        ));
    }
    // FCHK geometries are in Bohr; the basis stores Ångström.
    for (z, position) in atomic_numbers.iter().zip(coordinates.chunks_exact(3)) {
        basis.add_atom(
            [
                position[0] * BOHR_TO_ANGSTROM,
                position[1] * BOHR_TO_ANGSTROM,
                position[2] * BOHR_TO_ANGSTROM,
            ],
            *z as u8,
        );
    }

    let shell_codes = required("Shell types")?;
    let shell_primitives = required("Number of primitives per shell")?;
    let shell_atoms = required("Shell to atom map")?;
    let exponents = required("Primitive exponents")?;
    let coefficients = required("Contraction coefficients")?;
    if shell_primitives.len() != shell_codes.len() || shell_atoms.len() != shell_codes.len() {
        return Err(parse_error(path, "shell block lengths are inconsistent"));
    }

    let mut first = 0usize;
    for shell in 0..shell_codes.len() {
        let count = shell_primitives[shell] as usize;
        let end = first + count;
        if end > exponents.len() || end > coefficients.len() {
            return Err(parse_error(
                path,
                "per-shell primitive counts exceed the primitive blocks",
            ));
        }
        let atom_number = shell_atoms[shell] as isize;
        if atom_number < 1 || atom_number as usize > basis.num_atoms() {
            return Err(parse_error(
                path,
                format!("shell {shell} maps to the invalid atom {atom_number}"),
            ));
        }
        let atom = atom_number as usize - 1;

        let code = shell_codes[shell] as i32;
        if code == -1 {
            // SP shells carry a shared exponent set with separate S and P
            // contraction coefficients; split them into two shells.
            let sp_coefficients = blocks.get("P(S=P) Contraction coefficients").ok_or_else(|| {
                parse_error(path, "SP shell without a 'P(S=P) Contraction coefficients' block")
            })?;
            if end > sp_coefficients.len() {
                return Err(parse_error(path, "'P(S=P) Contraction coefficients' is too short"));
            }
            basis.add_shell(atom, ShellType::S);
            for j in first..end {
                basis.add_primitive(coefficients[j], exponents[j]);
            }
            basis.add_shell(atom, ShellType::P);
            for j in first..end {
                basis.add_primitive(sp_coefficients[j], exponents[j]);
            }
        } else {
            let shell_type = shell_type_from_code(code)
                .ok_or_else(|| parse_error(path, format!("unknown shell type code {code}")))?;
            basis.add_shell(atom, shell_type);
            for j in first..end {
                basis.add_primitive(coefficients[j], exponents[j]);
            }
        }
        first = end;
    }

    if let Some(mo_coefficients) = blocks.get("Alpha MO coefficients") {
        basis.set_mo_coefficients(mo_coefficients);
    }

    if let Some(packed) = blocks.get("Total SCF Density") {
        let n = basis.num_mos();
        if packed.len() != n * (n + 1) / 2 {
            return Err(parse_error(
                path,
                "'Total SCF Density' does not hold a lower triangle of the basis dimension",
            ));
        }
        let mut density = Mat::zeros(n, n);
        let mut k = 0;
        for i in 0..n {
            for j in 0..=i {
                density[(i, j)] = packed[k];
                density[(j, i)] = packed[k];
                k += 1;
            }
        }
        basis.set_density_matrix(density)?;
    }

    Ok(())
}

/// Maps an FCHK shell type code to the angular type; positive codes are
/// Cartesian shells, negative codes their spherical counterparts.
fn shell_type_from_code(code: i32) -> Option<ShellType> {
    match code {
        0 => Some(ShellType::S),
        1 => Some(ShellType::P),
        -1 => Some(ShellType::Sp),
        2 => Some(ShellType::D),
        -2 => Some(ShellType::D5),
        3 => Some(ShellType::F),
        -3 => Some(ShellType::F7),
        4 => Some(ShellType::G),
        -4 => Some(ShellType::G9),
        5 => Some(ShellType::H),
        -5 => Some(ShellType::H11),
        6 => Some(ShellType::I),
        -6 => Some(ShellType::I13),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HYDROGEN_STO3G: &str = "\
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
Total SCF Density                          R   N=           1
  2.00000000E+00
";

    const CARBON_SP: &str = "\
Carbon with an SP shell
Number of atoms                            I                1
Atomic numbers                             I   N=           1
           6
Current cartesian coordinates              R   N=           3
  0.00000000E+00  0.00000000E+00  1.88972612E+00
Shell types                                I   N=           2
           0          -1
Number of primitives per shell             I   N=           2
           1           2
Shell to atom map                          I   N=           2
           1           1
Primitive exponents                        R   N=           3
  7.16168370E+01  2.94124940E+00  6.83483100E-01
Contraction coefficients                   R   N=           3
  1.54328970E-01 -9.99672300E-02  3.99512830E-01
P(S=P) Contraction coefficients            R   N=           3
  0.00000000E+00  1.55916270E-01  6.07683720E-01
";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_hydrogen() {
        let file = write_temp(HYDROGEN_STO3G);
        let mut basis = GaussianBasis::new();
        parse(file.path(), &mut basis).unwrap();

        assert_eq!(basis.num_atoms(), 1);
        assert_eq!(basis.num_shells(), 1);
        assert_eq!(basis.num_mos(), 1);
        assert_eq!(basis.molecule().atoms()[0].atomic_number, 1);
        assert_eq!(basis.data().exponents.len(), 3);
        assert_eq!(basis.data().mo_matrix[(0, 0)], 1.0);
        let density = basis.data().density.as_ref().unwrap();
        assert_eq!(density[(0, 0)], 2.0);
    }

    #[test]
    fn test_parse_splits_sp_shells() {
        let file = write_temp(CARBON_SP);
        let mut basis = GaussianBasis::new();
        parse(file.path(), &mut basis).unwrap();

        // One S shell plus the SP pair split into S and P.
        assert_eq!(basis.num_shells(), 3);
        assert_eq!(
            basis.data().shell_types,
            vec![ShellType::S, ShellType::S, ShellType::P]
        );
        assert_eq!(basis.num_mos(), 1 + 1 + 3);
        // The P half re-uses the shared exponents with its own coefficients.
        assert_eq!(basis.data().exponents.len(), 1 + 2 + 2);
        assert_eq!(basis.data().coefficients[3], 0.15591627);
        // Coordinates arrive in Bohr and are stored in Ångström.
        let position = basis.molecule().atom_position(0);
        assert!((position[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_missing_file() {
        let mut basis = GaussianBasis::new();
        let result = parse(Path::new("no_such_file.fchk"), &mut basis);
        assert!(matches!(result, Err(OrbCubeError::Io { .. })));
    }

    #[test]
    fn test_parse_truncated_block() {
        let file = write_temp(
            "Atomic numbers                             I   N=           2\n           1\n",
        );
        let mut basis = GaussianBasis::new();
        let result = parse(file.path(), &mut basis);
        assert!(matches!(result, Err(OrbCubeError::Parse { .. })));
    }
}
