use thiserror::Error;

#[derive(Debug, Error)]
pub enum OmikujiError {
    #[error("unknown fortune label: {0}")]
    UnknownFortune(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, OmikujiError>;
