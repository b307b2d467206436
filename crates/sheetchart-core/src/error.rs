pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid chart style: {0}")]
    Style(#[source] serde_json::Error),

    #[error("Invalid chart snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("Chart id already in use: {id}")]
    DuplicateChart { id: String },
}
