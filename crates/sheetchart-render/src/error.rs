pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown render engine: {name}")]
    UnknownEngine { name: String },

    #[error("No render engine registered")]
    NoEngine,

    #[error("Render engine failed ({engine}): {message}")]
    Engine { engine: String, message: String },

    #[error("Invalid render settings: {0}")]
    Settings(#[source] serde_json::Error),

    #[error(transparent)]
    Core(#[from] sheetchart_core::Error),
}
