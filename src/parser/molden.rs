//! Reader for Molden format files.
//!
//! Molden files are organized in bracketed sections. The reader extracts the
//! `[Atoms]`, `[GTO]` and `[MO]` sections together with the `[5D]`-family
//! flags that switch Cartesian D and F shells to their spherical forms; the
//! flags may appear anywhere, so the file is scanned for them before the
//! sections are processed.

use crate::basis::GaussianBasis;
use crate::error::OrbCubeError;
use crate::math::constants::BOHR_TO_ANGSTROM;
use crate::types::ShellType;
use std::fs;
use std::path::Path;

/// Populates `basis` from the Molden file at `path`.
pub fn parse(path: &Path, basis: &mut GaussianBasis) -> Result<(), OrbCubeError> {
    let content = fs::read_to_string(path).map_err(|source| OrbCubeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = content.lines().collect();

    let mut spherical_d = false;
    let mut spherical_f = false;
    for line in &lines {
        match line.trim().to_ascii_lowercase().as_str() {
            "[5d]" | "[5d7f]" => {
                spherical_d = true;
                spherical_f = true;
            }
            "[5d10f]" => spherical_d = true,
            "[7f]" => spherical_f = true,
            _ => {}
        }
    }

    let mut i = 0;
    while i < lines.len() {
        let lower = lines[i].trim().to_ascii_lowercase();
        if lower.starts_with("[atoms]") {
            let to_angstrom = if lower.contains("au") {
                BOHR_TO_ANGSTROM
            } else {
                1.0
            };
            i = read_atoms(&lines, i + 1, to_angstrom, path, basis)?;
        } else if lower.starts_with("[gto]") {
            i = read_shells(&lines, i + 1, spherical_d, spherical_f, path, basis)?;
        } else if lower.starts_with("[mo]") {
            i = read_orbitals(&lines, i + 1, path, basis)?;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn parse_error(path: &Path, details: impl Into<String>) -> OrbCubeError {
    OrbCubeError::Parse {
        path: path.to_path_buf(),
        details: details.into(),
    }
}

#[inline]
fn is_section(line: &str) -> bool {
    line.trim_start().starts_with('[')
}

/// Parses a Molden number, accepting Fortran `D` exponents.
fn number(token: &str, path: &Path) -> Result<f64, OrbCubeError> {
    token
        .replace(['D', 'd'], "E")
        .parse()
        .map_err(|_| parse_error(path, format!("invalid number '{token}'")))
}

/// `[Atoms]` lines: `name sequence atomic_number x y z`.
fn read_atoms(
    lines: &[&str],
    mut i: usize,
    to_angstrom: f64,
    path: &Path,
    basis: &mut GaussianBasis,
) -> Result<usize, OrbCubeError> {
    while i < lines.len() && !is_section(lines[i]) {
        let tokens: Vec<&str> = lines[i].split_whitespace().collect();
        if tokens.len() >= 6 {
            let atomic_number = tokens[2]
                .parse::<u8>()
                .map_err(|_| parse_error(path, format!("invalid atomic number '{}'", tokens[2])))?;
            let x = number(tokens[3], path)?;
            let y = number(tokens[4], path)?;
            let z = number(tokens[5], path)?;
            basis.add_atom(
                [x * to_angstrom, y * to_angstrom, z * to_angstrom],
                atomic_number,
            );
        }
        i += 1;
    }
    Ok(i)
}

/// `[GTO]` blocks: per atom, a header `sequence 0` followed by shell
/// definitions `letter primitive_count scale` and their primitive lines,
/// terminated by a blank line.
fn read_shells(
    lines: &[&str],
    mut i: usize,
    spherical_d: bool,
    spherical_f: bool,
    path: &Path,
    basis: &mut GaussianBasis,
) -> Result<usize, OrbCubeError> {
    while i < lines.len() {
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        if i >= lines.len() || is_section(lines[i]) {
            return Ok(i);
        }

        let header: Vec<&str> = lines[i].split_whitespace().collect();
        let sequence: usize = header[0]
            .parse()
            .map_err(|_| parse_error(path, format!("invalid atom header '{}'", lines[i])))?;
        if sequence < 1 || sequence > basis.num_atoms() {
            return Err(parse_error(
                path,
                format!("shell block references the invalid atom {sequence}"),
            ));
        }
        let atom = sequence - 1;
        i += 1;

        while i < lines.len() && !lines[i].trim().is_empty() && !is_section(lines[i]) {
            let tokens: Vec<&str> = lines[i].split_whitespace().collect();
            if tokens.len() < 2 {
                return Err(parse_error(path, format!("invalid shell line '{}'", lines[i])));
            }
            let letter = tokens[0].to_ascii_lowercase();
            let primitive_count: usize = tokens[1]
                .parse()
                .map_err(|_| parse_error(path, format!("invalid primitive count '{}'", tokens[1])))?;
            i += 1;

            let mut exponents = Vec::with_capacity(primitive_count);
            let mut first_coefficients = Vec::with_capacity(primitive_count);
            let mut second_coefficients = Vec::with_capacity(primitive_count);
            for _ in 0..primitive_count {
                if i >= lines.len() {
                    return Err(parse_error(path, "shell definition is truncated"));
                }
                let values: Vec<&str> = lines[i].split_whitespace().collect();
                if values.len() < 2 {
                    return Err(parse_error(path, format!("invalid primitive line '{}'", lines[i])));
                }
                exponents.push(number(values[0], path)?);
                first_coefficients.push(number(values[1], path)?);
                if values.len() >= 3 {
                    second_coefficients.push(number(values[2], path)?);
                }
                i += 1;
            }

            match letter.as_str() {
                "s" | "p" | "d" | "f" | "g" | "h" | "i" => {
                    // Shells above D5 are recorded but never evaluated.
                    let shell_type = match letter.as_str() {
                        "s" => ShellType::S,
                        "p" => ShellType::P,
                        "d" if spherical_d => ShellType::D5,
                        "d" => ShellType::D,
                        "f" if spherical_f => ShellType::F7,
                        "f" => ShellType::F,
                        "g" if spherical_d => ShellType::G9,
                        "g" => ShellType::G,
                        "h" => ShellType::H,
                        _ => ShellType::I,
                    };
                    basis.add_shell(atom, shell_type);
                    for (exponent, coefficient) in exponents.iter().zip(&first_coefficients) {
                        basis.add_primitive(*coefficient, *exponent);
                    }
                }
                "sp" => {
                    if second_coefficients.len() != primitive_count {
                        return Err(parse_error(path, "sp shell without P coefficients"));
                    }
                    basis.add_shell(atom, ShellType::S);
                    for (exponent, coefficient) in exponents.iter().zip(&first_coefficients) {
                        basis.add_primitive(*coefficient, *exponent);
                    }
                    basis.add_shell(atom, ShellType::P);
                    for (exponent, coefficient) in exponents.iter().zip(&second_coefficients) {
                        basis.add_primitive(*coefficient, *exponent);
                    }
                }
                _ => {
                    return Err(parse_error(path, format!("unknown shell letter '{letter}'")));
                }
            }
        }
    }
    Ok(i)
}

/// `[MO]` blocks: `Sym=`/`Ene=`/`Spin=`/`Occup=` headers followed by
/// `index coefficient` lines, one block per orbital, collected column-major.
fn read_orbitals(
    lines: &[&str],
    mut i: usize,
    path: &Path,
    basis: &mut GaussianBasis,
) -> Result<usize, OrbCubeError> {
    let n = basis.num_mos();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut current: Option<Vec<f64>> = None;
    let mut reading_coefficients = false;

    while i < lines.len() && !is_section(lines[i]) {
        let line = lines[i].trim();
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("sym=")
            || lower.starts_with("ene=")
            || lower.starts_with("spin=")
            || lower.starts_with("occup=")
        {
            if reading_coefficients || current.is_none() {
                if let Some(column) = current.take() {
                    columns.push(column);
                }
                current = Some(vec![0.0; n]);
                reading_coefficients = false;
            }
        } else if !line.is_empty() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() >= 2 {
                let index: usize = tokens[0]
                    .parse()
                    .map_err(|_| parse_error(path, format!("invalid coefficient line '{line}'")))?;
                if index < 1 || index > n {
                    return Err(parse_error(
                        path,
                        format!("coefficient index {index} is outside the basis dimension {n}"),
                    ));
                }
                let column = current.get_or_insert_with(|| vec![0.0; n]);
                column[index - 1] = number(tokens[1], path)?;
                reading_coefficients = true;
            }
        }
        i += 1;
    }
    if let Some(column) = current.take() {
        columns.push(column);
    }

    if !columns.is_empty() {
        let flat: Vec<f64> = columns.concat();
        basis.set_mo_coefficients(&flat);
    }
    Ok(i)
}
