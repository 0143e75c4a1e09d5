use thiserror::Error;

use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Structure parsing failed: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Atom index {index} out of range for a structure of {len} atoms")]
    AtomIndex { index: usize, len: usize },
}
