use thiserror::Error;

/// Structural mutations rejected by the item tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("item id '{0}' already exists in this sidebar")]
    DuplicateId(String),
    #[error("parent item '{0}' not found")]
    UnknownParent(String),
    #[error("item '{0}' not found")]
    UnknownItem(String),
    #[error("item id must not be empty")]
    EmptyId,
}

/// Failures while loading item data from an inline or remote source.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("invalid item data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item source returned HTTP {status}")]
    Status { status: u16 },
    #[error("item source client could not be built: {0}")]
    Client(#[source] reqwest::Error),
    #[error("item request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid item tree: {0}")]
    Tree(#[from] TreeError),
}
