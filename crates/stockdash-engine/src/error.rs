use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ticker registry JSON is invalid: {0}")]
    RegistryJson(#[from] serde_json::Error),

    #[error("ticker registry has an unsupported shape: {0}")]
    RegistryShape(String),

    #[error("ticker registry is empty; aggregation requires validation symbols")]
    EmptyRegistry,
}
