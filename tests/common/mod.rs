use orbcube::{Cube, GaussianBasis, ShellType};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// One hydrogen atom at the origin with a single S primitive and a 1x1 MO
/// matrix holding `mo_coefficient`.
pub fn hydrogen_s_basis(alpha: f64, coefficient: f64, mo_coefficient: f64) -> GaussianBasis {
    let mut basis = GaussianBasis::new();
    let atom = basis.add_atom([0.0, 0.0, 0.0], 1);
    basis.add_shell(atom, ShellType::S);
    basis.add_primitive(coefficient, alpha);
    basis.set_mo_coefficients(&[mo_coefficient]);
    basis
}

/// One atom at the origin with a single P primitive and MO coefficients
/// (1, 0, 0) for the first state.
pub fn single_p_basis(alpha: f64, coefficient: f64) -> GaussianBasis {
    let mut basis = GaussianBasis::new();
    let atom = basis.add_atom([0.0, 0.0, 0.0], 6);
    basis.add_shell(atom, ShellType::P);
    basis.add_primitive(coefficient, alpha);
    basis.set_mo_coefficients(&[1.0, 0.0, 0.0]);
    basis
}

/// Dispatches an MO evaluation and blocks until the completion signal fires.
pub fn compute_mo_blocking(basis: &mut GaussianBasis, cube: &Arc<Cube>, state: usize) {
    let (sender, receiver) = mpsc::channel();
    basis
        .compute_mo(
            cube,
            state,
            Box::new(move || {
                let _ = sender.send(());
            }),
        )
        .expect("MO evaluation failed to dispatch");
    receiver
        .recv_timeout(Duration::from_secs(30))
        .expect("MO evaluation did not signal completion");
}

/// Dispatches a density evaluation and blocks until the completion signal
/// fires.
#[allow(dead_code)]
pub fn compute_density_blocking(basis: &mut GaussianBasis, cube: &Arc<Cube>) {
    let (sender, receiver) = mpsc::channel();
    basis
        .compute_density(
            cube,
            Box::new(move || {
                let _ = sender.send(());
            }),
        )
        .expect("density evaluation failed to dispatch");
    receiver
        .recv_timeout(Duration::from_secs(30))
        .expect("density evaluation did not signal completion");
}

/// Evaluates one MO at a single point by computing a 1x1x1 cube there.
#[allow(dead_code)]
pub fn mo_value_at(basis: &mut GaussianBasis, position: [f64; 3], state: usize) -> f64 {
    let cube = Arc::new(Cube::new(position, [1.0, 1.0, 1.0], [1, 1, 1]));
    compute_mo_blocking(basis, &cube, state);
    let value = cube.samples()[0];
    value
}
