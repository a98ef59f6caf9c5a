//! The parallel evaluation driver.
//!
//! Each evaluation maps a pure per-point function over every sample of the
//! target cube on the rayon worker pool. The cube's write lock is acquired
//! before the dispatching call returns and held until the last sample is
//! written, so no reader ever observes a half-filled cube. Workers write
//! disjoint samples and perform no cross-point reductions, which makes the
//! result bytewise reproducible regardless of scheduling.

use super::gaussian::GaussianData;
use super::CompletionHandler;
use crate::cube::Cube;
use crate::math::constants::{ANGSTROM_TO_BOHR, MO_COEFFICIENT_CUTOFF};
use crate::math::kernels;
use crate::types::ShellType;
use rayon::prelude::*;
use std::sync::{mpsc, Arc};

/// What a dispatched evaluation computes at each grid point.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EvalTarget {
    /// One molecular orbital; `mo_column` is the 0-based column of the MO
    /// matrix.
    Orbital { mo_column: usize },
    /// The total electron density via the installed density matrix.
    Density,
}

/// Dispatches the parallel map over the cube's samples.
///
/// Returns once the spawned task holds the cube's write lock; the map itself
/// runs asynchronously and `on_complete` is invoked exactly once after the
/// lock has been released.
pub(crate) fn dispatch(
    data: Arc<GaussianData>,
    cube: Arc<Cube>,
    target: EvalTarget,
    on_complete: CompletionHandler,
) {
    // Atom positions are fixed for the whole map; convert them once.
    let atom_positions: Vec<[f64; 3]> = data
        .molecule
        .atoms()
        .iter()
        .map(|atom| scale(atom.position, ANGSTROM_TO_BOHR))
        .collect();

    let (ready_tx, ready_rx) = mpsc::channel();
    rayon::spawn(move || {
        let mut samples = cube.samples_write();
        // The cube is ours; the dispatching thread may return.
        let _ = ready_tx.send(());

        samples
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, sample)| {
                let point = scale(cube.position(index), ANGSTROM_TO_BOHR);
                *sample = value_at_point(&data, &atom_positions, point, target);
            });

        drop(samples);
        on_complete();
    });
    let _ = ready_rx.recv();
}

#[inline]
fn scale(v: [f64; 3], factor: f64) -> [f64; 3] {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}

/// Evaluates the requested field at one point (Bohr).
fn value_at_point(
    data: &GaussianData,
    atom_positions: &[[f64; 3]],
    point: [f64; 3],
    target: EvalTarget,
) -> f64 {
    // Each atom's displacement serves every shell centered on it; with few
    // atoms and many grid points this reuse dominates the runtime.
    let mut deltas = Vec::with_capacity(atom_positions.len());
    let mut dr2 = Vec::with_capacity(atom_positions.len());
    for position in atom_positions {
        let delta = [
            point[0] - position[0],
            point[1] - position[1],
            point[2] - position[2],
        ];
        dr2.push(delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]);
        deltas.push(delta);
    }

    match target {
        EvalTarget::Orbital { mo_column } => {
            let mut value = 0.0;
            for shell in 0..data.shell_types.len() {
                let atom = data.shell_atoms[shell];
                value += shell_orbital_value(data, shell, &deltas[atom], dr2[atom], mo_column);
            }
            value
        }
        EvalTarget::Density => density_value(data, &deltas, &dr2),
    }
}

/// The contribution of one shell to ψ_{mo_column} at one point.
fn shell_orbital_value(
    data: &GaussianData,
    shell: usize,
    delta: &[f64; 3],
    dr2: f64,
    mo_column: usize,
) -> f64 {
    let shell_type = data.shell_types[shell];
    if !shell_type.is_evaluated() {
        return 0.0;
    }
    let exponents = data.shell_exponents(shell);
    let norms = data.shell_norm_coefficients(shell);
    let offset = data.shell_mo_offset[shell];

    match shell_type {
        ShellType::S => {
            let coefficient = data.mo_matrix[(offset, mo_column)];
            // Skip the primitives entirely for a vanishing MO weight.
            if coefficient.abs() < MO_COEFFICIENT_CUTOFF {
                return 0.0;
            }
            kernels::contract_s(exponents, norms, dr2) * coefficient
        }
        ShellType::P => {
            let sums = kernels::contract_p(exponents, norms, dr2);
            (0..3)
                .map(|k| data.mo_matrix[(offset + k, mo_column)] * delta[k] * sums[k])
                .sum()
        }
        ShellType::D => {
            let sums = kernels::contract_d(exponents, norms, dr2);
            let angular = kernels::d_angular(delta);
            (0..6)
                .map(|k| data.mo_matrix[(offset + k, mo_column)] * angular[k] * sums[k])
                .sum()
        }
        ShellType::D5 => {
            let sums = kernels::contract_d5(exponents, norms, dr2);
            let angular = kernels::d5_angular(delta, dr2);
            (0..5)
                .map(|k| data.mo_matrix[(offset + k, mo_column)] * angular[k] * sums[k])
                .sum()
        }
        _ => 0.0,
    }
}

/// Writes the basis-function values of one shell into the per-point column.
fn shell_basis_values(
    data: &GaussianData,
    shell: usize,
    delta: &[f64; 3],
    dr2: f64,
    values: &mut [f64],
) {
    let shell_type = data.shell_types[shell];
    if !shell_type.is_evaluated() {
        // Unevaluated shells leave their reserved rows zero.
        return;
    }
    let exponents = data.shell_exponents(shell);
    let norms = data.shell_norm_coefficients(shell);
    let offset = data.shell_mo_offset[shell];

    match shell_type {
        ShellType::S => {
            values[offset] = kernels::contract_s(exponents, norms, dr2);
        }
        ShellType::P => {
            let sums = kernels::contract_p(exponents, norms, dr2);
            for k in 0..3 {
                values[offset + k] = delta[k] * sums[k];
            }
        }
        ShellType::D => {
            let sums = kernels::contract_d(exponents, norms, dr2);
            let angular = kernels::d_angular(delta);
            for k in 0..6 {
                values[offset + k] = angular[k] * sums[k];
            }
        }
        ShellType::D5 => {
            let sums = kernels::contract_d5(exponents, norms, dr2);
            let angular = kernels::d5_angular(delta, dr2);
            for k in 0..5 {
                values[offset + k] = angular[k] * sums[k];
            }
        }
        _ => {}
    }
}

/// ρ(r) from the basis values and the symmetric density matrix, using only
/// the lower triangle.
fn density_value(data: &GaussianData, deltas: &[[f64; 3]], dr2: &[f64]) -> f64 {
    let Some(density) = data.density.as_ref() else {
        return 0.0;
    };

    let mut values = vec![0.0; data.num_mos];
    for shell in 0..data.shell_types.len() {
        let atom = data.shell_atoms[shell];
        shell_basis_values(data, shell, &deltas[atom], dr2[atom], &mut values);
    }

    let mut rho = 0.0;
    for i in 0..data.num_mos {
        let value_i = values[i];
        for j in 0..i {
            rho += 2.0 * density[(i, j)] * value_i * values[j];
        }
        rho += density[(i, i)] * value_i * value_i;
    }
    rho
}
