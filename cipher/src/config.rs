//! 加解密配置 <br>
//!
//! `CipherConfig`收集算法/工作模式/填充方式以及密钥等参数, `validate`一次性检查后得到不可变的`ValidConfig`. <br>
//! 检查顺序: 密钥长度 -> 工作模式与分组长度 -> IV/nonce -> 填充方式 -> 认证标签长度, 返回第一个不满足的错误. <br>
//! `ValidConfig`持有已完成密钥扩展的分组密码, 可在多个加解密实例之间共享.

use crate::{
    ae::{DEFAULT_TAG_SIZE, GCM},
    block_cipher::{BoxBlockCipher, DynBlockCipher},
    builder::{BlockCipherType, CipherMode, PaddingMode},
    cipher_mode::ModeState,
    CipherError, ConfigError,
};
use std::{fmt, sync::Arc};
use zeroize::Zeroizing;

/// 未经检查的配置
#[derive(Clone)]
pub struct CipherConfig {
    algorithm: BlockCipherType,
    mode: CipherMode,
    padding: PaddingMode,
    key: Option<Zeroizing<Vec<u8>>>,
    iv: Option<Zeroizing<Vec<u8>>>,
    nonce: Option<Zeroizing<Vec<u8>>>,
    aad: Zeroizing<Vec<u8>>,
    tag_size: usize,
}

impl CipherConfig {
    pub fn new(algorithm: BlockCipherType, mode: CipherMode, padding: PaddingMode) -> Self {
        Self {
            algorithm,
            mode,
            padding,
            key: None,
            iv: None,
            nonce: None,
            aad: Zeroizing::new(Vec::new()),
            tag_size: DEFAULT_TAG_SIZE,
        }
    }

    pub fn key(mut self, key: impl AsRef<[u8]>) -> Self {
        self.key = Some(Zeroizing::new(key.as_ref().to_vec()));
        self
    }

    pub fn iv(mut self, iv: impl AsRef<[u8]>) -> Self {
        self.iv = Some(Zeroizing::new(iv.as_ref().to_vec()));
        self
    }

    pub fn nonce(mut self, nonce: impl AsRef<[u8]>) -> Self {
        self.nonce = Some(Zeroizing::new(nonce.as_ref().to_vec()));
        self
    }

    /// 只用于GCM
    pub fn aad(mut self, aad: impl AsRef<[u8]>) -> Self {
        self.aad = Zeroizing::new(aad.as_ref().to_vec());
        self
    }

    /// 只用于GCM, 取值`[12, 16]`
    pub fn tag_size(mut self, tag_size: usize) -> Self {
        self.tag_size = tag_size;
        self
    }

    pub fn algorithm(&self) -> BlockCipherType {
        self.algorithm
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    fn check_mode(&self) -> Result<(), ConfigError> {
        let block_size = self.algorithm.block_size();
        if self.mode == CipherMode::GCM && block_size != 16 {
            Err(ConfigError::UnsupportedMode {
                mode: self.mode,
                block_size,
            })
        } else {
            Ok(())
        }
    }

    fn check_iv(&self) -> Result<(), ConfigError> {
        let block_size = self.algorithm.block_size();
        if self.mode.requires_iv() {
            let iv = self.iv.as_ref().ok_or(ConfigError::MissingIv(self.mode))?;
            if iv.len() != block_size {
                return Err(ConfigError::InvalidIvSize {
                    target: block_size,
                    real: iv.len(),
                });
            }
        } else if self.mode == CipherMode::GCM
            && self.nonce.as_ref().map_or(true, |x| x.is_empty())
        {
            return Err(ConfigError::MissingNonce);
        }

        Ok(())
    }

    fn check_padding(&self) -> Result<(), ConfigError> {
        if !self.mode.is_block_aligned() && !self.padding.is_identity() {
            Err(ConfigError::UnsupportedPadding {
                mode: self.mode,
                padding: self.padding,
            })
        } else {
            Ok(())
        }
    }

    fn check_tag_size(&self) -> Result<(), ConfigError> {
        if self.mode == CipherMode::GCM && !(12..=16).contains(&self.tag_size) {
            Err(ConfigError::InvalidTagSize(self.tag_size))
        } else {
            Ok(())
        }
    }

    fn validate_inner(&self) -> Result<ValidConfig, ConfigError> {
        let key = self.key.as_ref().ok_or(ConfigError::MissingKey)?;
        if !self.algorithm.key_size_valid(key.len()) {
            return Err(ConfigError::InvalidKeySize {
                algorithm: self.algorithm,
                size: key.len(),
            });
        }
        self.check_mode()?;
        self.check_iv()?;
        self.check_padding()?;
        self.check_tag_size()?;

        let cipher = self.algorithm.block_cipher(key)?;
        let (iv, nonce) = match self.mode {
            CipherMode::GCM => (
                Zeroizing::new(Vec::new()),
                self.nonce.clone().unwrap_or_else(|| Zeroizing::new(Vec::new())),
            ),
            CipherMode::ECB => (Zeroizing::new(Vec::new()), Zeroizing::new(Vec::new())),
            _ => (
                self.iv.clone().unwrap_or_else(|| Zeroizing::new(Vec::new())),
                Zeroizing::new(Vec::new()),
            ),
        };
        let aad = if self.mode == CipherMode::GCM {
            self.aad.clone()
        } else {
            Zeroizing::new(Vec::new())
        };

        Ok(ValidConfig {
            inner: Arc::new(Inner {
                algorithm: self.algorithm,
                mode: self.mode,
                padding: self.padding,
                cipher,
                iv,
                nonce,
                aad,
                tag_size: self.tag_size,
            }),
        })
    }

    /// 检查配置, 密钥扩展在这里完成
    pub fn validate(&self) -> Result<ValidConfig, ConfigError> {
        match self.validate_inner() {
            Ok(c) => {
                log::debug!(
                    "cipher config accepted: {}/{}/{}",
                    self.algorithm,
                    self.mode,
                    self.padding
                );
                Ok(c)
            }
            Err(e) => {
                log::debug!(
                    "cipher config {}/{}/{} rejected: {e}",
                    self.algorithm,
                    self.mode,
                    self.padding
                );
                Err(e)
            }
        }
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("algorithm", &self.algorithm)
            .field("mode", &self.mode)
            .field("padding", &self.padding)
            .field("key", &self.key.as_ref().map(|x| x.len()))
            .field("iv", &self.iv.as_ref().map(|x| x.len()))
            .field("nonce", &self.nonce.as_ref().map(|x| x.len()))
            .field("aad", &self.aad.len())
            .field("tag_size", &self.tag_size)
            .finish()
    }
}

impl TryFrom<&CipherConfig> for ValidConfig {
    type Error = ConfigError;

    fn try_from(value: &CipherConfig) -> Result<Self, Self::Error> {
        value.validate()
    }
}

struct Inner {
    algorithm: BlockCipherType,
    mode: CipherMode,
    padding: PaddingMode,
    cipher: BoxBlockCipher,
    iv: Zeroizing<Vec<u8>>,
    nonce: Zeroizing<Vec<u8>>,
    aad: Zeroizing<Vec<u8>>,
    tag_size: usize,
}

/// 检查通过的配置, 只读, 克隆只增加引用计数
#[derive(Clone)]
pub struct ValidConfig {
    inner: Arc<Inner>,
}

impl ValidConfig {
    pub fn algorithm(&self) -> BlockCipherType {
        self.inner.algorithm
    }

    pub fn mode(&self) -> CipherMode {
        self.inner.mode
    }

    pub fn padding(&self) -> PaddingMode {
        self.inner.padding
    }

    pub fn block_size(&self) -> usize {
        self.inner.algorithm.block_size()
    }

    pub fn tag_size(&self) -> usize {
        self.inner.tag_size
    }

    pub(crate) fn cipher(&self) -> &DynBlockCipher {
        self.inner.cipher.as_ref()
    }

    /// 每条消息从配置的IV/nonce开始一个新的工作模式状态
    pub(crate) fn transform(&self) -> Result<Transform, ConfigError> {
        let inner = self.inner.as_ref();
        let t = match inner.mode {
            CipherMode::GCM => Transform::Gcm(GCM::new(
                inner.cipher.as_ref(),
                &inner.nonce,
                &inner.aad,
                inner.tag_size,
            )?),
            mode => Transform::Mode(ModeState::new(mode, &inner.iv)?),
        };

        Ok(t)
    }
}

impl fmt::Debug for ValidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidConfig")
            .field("algorithm", &self.inner.algorithm)
            .field("mode", &self.inner.mode)
            .field("padding", &self.inner.padding)
            .field("tag_size", &self.inner.tag_size)
            .finish_non_exhaustive()
    }
}

/// 一条消息的加解密状态
#[derive(Clone)]
pub(crate) enum Transform {
    Mode(ModeState),
    Gcm(GCM),
}

impl Transform {
    pub(crate) fn encrypt(
        &mut self,
        cipher: &DynBlockCipher,
        data: &mut [u8],
    ) -> Result<(), CipherError> {
        match self {
            Self::Mode(m) => m.encrypt(cipher, data),
            Self::Gcm(g) => g.encrypt(cipher, data),
        }
    }
}
