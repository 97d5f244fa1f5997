use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid detection parameters: {0}")]
    InvalidParams(String),

    #[error("{collaborator} failed: {source:#}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl GridError {
    pub fn collaborator(collaborator: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator {
            collaborator,
            source,
        }
    }
}

pub type GridResult<T> = Result<T, GridError>;
