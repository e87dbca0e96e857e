use crate::builder::{BlockCipherType, CipherMode, PaddingMode};
use std::{io, sync::Arc};
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid key size `{size}` for `{algorithm}`")]
    InvalidKeySize {
        algorithm: BlockCipherType,
        size: usize,
    },

    #[error("missing key")]
    MissingKey,

    #[error("`{0}` mode requires an iv")]
    MissingIv(CipherMode),

    /// 不合法的IV长度
    #[error("invalid iv size `{real}` not match to target size `{target}`")]
    InvalidIvSize { target: usize, real: usize },

    #[error("`GCM` mode requires a non-empty nonce")]
    MissingNonce,

    #[error("`{mode}` mode does not support block size `{block_size}`")]
    UnsupportedMode { mode: CipherMode, block_size: usize },

    #[error("`{mode}` mode does not support `{padding}` padding")]
    UnsupportedPadding {
        mode: CipherMode,
        padding: PaddingMode,
    },

    #[error("invalid tag size `{0}`, must be in range [12, 16]")]
    InvalidTagSize(usize),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PaddingError {
    /// 数据长度不是分组长度的整数倍
    #[error("data size `{size}` is not a multiple of block size `{block_size}`")]
    InvalidDataSize { block_size: usize, size: usize },

    #[error("block size `{0}` is not in range [1, 255]")]
    InvalidBlockSize(usize),

    /// 填充字节不合法
    #[error("invalid `{0}` padding")]
    InvalidPadding(PaddingMode),
}

#[derive(Error, Clone, Debug)]
pub enum CipherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Padding(#[from] PaddingError),

    /// 不合法分组大小
    #[error("invalid block data size `{real}` not match to target size `{target}`")]
    InvalidBlockSize { target: usize, real: usize },

    #[error("data size `{size}` is not a multiple of block size `{block_size}`")]
    InvalidDataSize { block_size: usize, size: usize },

    /// 认证失败, 密文或标签被篡改
    #[error("message authentication failed")]
    Authentication,

    #[error("payload size `{len}` exceeds limit `{limit}`")]
    PayloadTooLong { len: u64, limit: u64 },

    #[error("io error: {0}")]
    Io(Arc<io::Error>),

    /// 输出缓冲区不足, 剩余数据在后续调用中返回
    #[error("buffer size `{buffer_size}` is less than available data size `{data_size}`")]
    Buffer { buffer_size: usize, data_size: usize },

    #[error("stream already closed")]
    StreamClosed,
}

impl From<io::Error> for CipherError {
    fn from(value: io::Error) -> Self {
        // 经过`io::Read`/`io::Write`传出的引擎错误还原为原来的错误
        if let Some(e) = value.get_ref().and_then(|e| e.downcast_ref::<CipherError>()) {
            return e.clone();
        }
        Self::Io(Arc::new(value))
    }
}

impl From<CipherError> for io::Error {
    fn from(value: CipherError) -> Self {
        match value {
            CipherError::Io(e) => io::Error::new(e.kind(), CipherError::Io(e)),
            CipherError::Authentication
            | CipherError::Padding(_)
            | CipherError::InvalidDataSize { .. } => {
                io::Error::new(io::ErrorKind::InvalidData, value)
            }
            CipherError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, value),
            _ => io::Error::new(io::ErrorKind::Other, value),
        }
    }
}

impl CipherError {
    pub fn is_buffer(&self) -> bool {
        matches!(self, Self::Buffer { .. })
    }
}
