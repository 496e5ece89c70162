use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActioneerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("No performer named '{0}' in the catalog")]
    PerformerNotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Enqueue error: {0}")]
    Enqueue(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
