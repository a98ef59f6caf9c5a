//! This module contains the file-format readers that populate a basis set.
//!
//! A parser is nothing more than a function that drives the basis-construction
//! builders (`add_atom`, `add_shell`, `add_primitive`, `set_mo_coefficients`,
//! `set_density_matrix`) from the contents of one file. The formats themselves
//! are defined by the upstream quantum-chemistry packages; the readers here
//! extract only what the evaluation engine needs.

/// Reader for Gaussian formatted checkpoint (`.fchk`) files.
pub mod fchk;

/// Reader for Molden (`.molden`) files.
pub mod molden;
