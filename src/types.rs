#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub atomic_number: u8,
    pub position: [f64; 3],
}

/// An ordered collection of atoms addressed by insertion index.
///
/// Positions are stored in Ångström. The insertion index is the identity used
/// by basis shells to refer back to their parent atom, so atoms are never
/// reordered or removed once added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, position: [f64; 3], atomic_number: u8) -> usize {
        self.atoms.push(Atom {
            atomic_number,
            position,
        });
        self.atoms.len() - 1
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// The position of atom `index` in Ångström.
    #[inline]
    pub fn atom_position(&self, index: usize) -> [f64; 3] {
        self.atoms[index].position
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }
}

/// The angular type of a contracted Gaussian shell.
///
/// The discriminants mirror the shell classes emitted by quantum-chemistry
/// packages: plain letters are Cartesian shells, the numbered variants are
/// their spherical-harmonic counterparts (`D5` = five real spherical d
/// functions, and so on). Shells above `D5` are recognized so that parsers can
/// record them, but their values are not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellType {
    S,
    Sp,
    P,
    D,
    D5,
    F,
    F7,
    G,
    G9,
    H,
    H11,
    I,
    I13,
}

impl ShellType {
    /// The number of independent basis functions this shell contributes.
    ///
    /// Shells beyond `F7` contribute no columns: they are carried through
    /// construction but produce neither coefficients nor values.
    pub fn components(self) -> usize {
        match self {
            ShellType::S => 1,
            ShellType::Sp => 4,
            ShellType::P => 3,
            ShellType::D => 6,
            ShellType::D5 => 5,
            ShellType::F => 8,
            ShellType::F7 => 7,
            ShellType::G
            | ShellType::G9
            | ShellType::H
            | ShellType::H11
            | ShellType::I
            | ShellType::I13 => 0,
        }
    }

    /// Whether analytical evaluation kernels exist for this shell type.
    #[inline]
    pub fn is_evaluated(self) -> bool {
        matches!(
            self,
            ShellType::S | ShellType::P | ShellType::D | ShellType::D5
        )
    }
}
