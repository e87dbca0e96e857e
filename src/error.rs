use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid hex string for `{field}`: {source}")]
    InvalidHex {
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("the input and output are the same file `{}`", .0.display())]
    SameFile(PathBuf),

    #[error("the path `{}` not exist", .0.display())]
    PathNotExist(PathBuf),

    #[error("load config failed: {0}")]
    Config(#[from] config::ConfigError),
}
