use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("missing API token: set LUNCHMONEY_TOKEN or `token` in the config file")]
    MissingToken,
    #[error(transparent)]
    Client(#[from] lunchmoney::ClientError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
