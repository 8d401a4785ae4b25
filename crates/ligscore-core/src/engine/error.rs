use thiserror::Error;

use super::chain_mapping::ChainMappingError;
use super::config::ConfigError;
use crate::core::ligands::LigandError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Ligand error: {source}")]
    Ligand {
        #[from]
        source: LigandError,
    },

    #[error(
        "Too many symmetries between target ligand {target_ligand} and model ligand {model_ligand}: more than {limit}"
    )]
    SymmetryExplosion {
        target_ligand: String,
        model_ligand: String,
        limit: usize,
    },

    #[error("Chain mapping failed: {source}")]
    ChainMapping {
        #[from]
        source: ChainMappingError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Ligand index {index} out of range ({count} ligands)")]
    LigandIndexOutOfRange { index: usize, count: usize },
}
