use mapgen_codegen::CodegenError;
use mapgen_model::ModelError;
use mapgen_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    /// A required input was left empty; nothing was changed.
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error("invalid filter pattern")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;
