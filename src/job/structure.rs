use serde::{Deserialize, Serialize};

/// One atomic site: chemical symbol and cartesian position in angstrom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicSite {
    pub symbol: String,
    pub position: [f64; 3],
}

/// Atomic geometry staged as `structure.json`
///
/// Owned by the caller; the builder only reads it. Conversion from other
/// molecular formats is the chemistry toolkit's job, not this crate's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDescriptor {
    /// Cell vectors in angstrom, row per lattice vector
    pub cell: [[f64; 3]; 3],
    pub atoms: Vec<AtomicSite>,
}

impl StructureDescriptor {
    pub fn new(cell: [[f64; 3]; 3]) -> Self {
        StructureDescriptor {
            cell,
            atoms: Vec::new(),
        }
    }

    /// Cubic cell with lattice constant `alat`
    pub fn cubic(alat: f64) -> Self {
        StructureDescriptor::new([
            [alat, 0.0, 0.0],
            [0.0, alat, 0.0],
            [0.0, 0.0, alat],
        ])
    }

    pub fn append_atom(&mut self, symbol: &str, position: [f64; 3]) {
        self.atoms.push(AtomicSite {
            symbol: symbol.to_string(),
            position,
        });
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
