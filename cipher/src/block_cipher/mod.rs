//! 分组密码变换<br>
//!
//! 工作模式只通过`BlockCipherX`使用分组密码, 不依赖具体算法.<br>
//! AES/DES/3DES/Blowfish由RustCrypto实现, TEA/XTEA在本地实现.<br>

use crate::{
    builder::BlockCipherType,
    error::{CipherError, ConfigError},
};

pub trait BlockEncrypt<const BLOCK_SIZE: usize> {
    fn encrypt_block(&self, plaintext: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE];
}

pub trait BlockDecrypt<const BLOCK_SIZE: usize> {
    fn decrypt_block(&self, ciphertext: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE];
}

pub trait BlockCipher<const N: usize>: BlockEncrypt<N> + BlockDecrypt<N> {
    const BLOCK_SIZE: usize = N;
}

impl<T, const N: usize> BlockCipher<N> for T where T: BlockDecrypt<N> + BlockEncrypt<N> {}

pub trait BlockSizeX {
    fn block_size_x(&self) -> usize;
}

/// 分组大小在运行时确定的分组加密, 原地变换
pub trait BlockEncryptX: BlockSizeX {
    fn encrypt_block_x(&self, block: &mut [u8]) -> Result<(), CipherError>;
}

pub trait BlockDecryptX: BlockSizeX {
    fn decrypt_block_x(&self, block: &mut [u8]) -> Result<(), CipherError>;
}

pub trait BlockCipherX: BlockEncryptX + BlockDecryptX {}

impl<T> BlockCipherX for T where T: BlockEncryptX + BlockDecryptX {}

macro_rules! impl_block_cipher_x {
    ($NAME: ty, $N: literal) => {
        impl $crate::block_cipher::BlockSizeX for $NAME {
            fn block_size_x(&self) -> usize {
                $N
            }
        }

        impl $crate::block_cipher::BlockEncryptX for $NAME {
            fn encrypt_block_x(&self, block: &mut [u8]) -> Result<(), $crate::CipherError> {
                let real = block.len();
                let b: &mut [u8; $N] = block
                    .try_into()
                    .map_err(|_| $crate::CipherError::InvalidBlockSize { target: $N, real })?;
                let out = $crate::block_cipher::BlockEncrypt::<$N>::encrypt_block(self, b);
                *b = out;
                Ok(())
            }
        }

        impl $crate::block_cipher::BlockDecryptX for $NAME {
            fn decrypt_block_x(&self, block: &mut [u8]) -> Result<(), $crate::CipherError> {
                let real = block.len();
                let b: &mut [u8; $N] = block
                    .try_into()
                    .map_err(|_| $crate::CipherError::InvalidBlockSize { target: $N, real })?;
                let out = $crate::block_cipher::BlockDecrypt::<$N>::decrypt_block(self, b);
                *b = out;
                Ok(())
            }
        }
    };
}

mod aes;
pub use aes::AES;

mod des;
pub use des::{TripleDES, DES};

mod blowfish;
pub use blowfish::Blowfish;

mod tea;
pub use tea::{TEA, XTEA};

pub type DynBlockCipher = dyn BlockCipherX + Send + Sync;

pub type BoxBlockCipher = Box<DynBlockCipher>;

impl BlockCipherType {
    pub const fn block_size(&self) -> usize {
        match self {
            Self::AES => 16,
            Self::DES | Self::TripleDES | Self::Blowfish | Self::TEA | Self::XTEA => 8,
        }
    }

    pub fn key_size_valid(&self, n: usize) -> bool {
        match self {
            Self::AES => matches!(n, 16 | 24 | 32),
            Self::DES => n == 8,
            Self::TripleDES => matches!(n, 16 | 24),
            Self::Blowfish => (4..=56).contains(&n),
            Self::TEA | Self::XTEA => n == 16,
        }
    }

    /// 检查密钥长度后构造分组密码, 密钥扩展只在这里做一次
    pub fn block_cipher(&self, key: &[u8]) -> Result<BoxBlockCipher, ConfigError> {
        if !self.key_size_valid(key.len()) {
            return Err(ConfigError::InvalidKeySize {
                algorithm: *self,
                size: key.len(),
            });
        }

        let c: BoxBlockCipher = match self {
            Self::AES => Box::new(AES::new(key)?),
            Self::DES => Box::new(DES::new(key)?),
            Self::TripleDES => Box::new(TripleDES::new(key)?),
            Self::Blowfish => Box::new(Blowfish::new(key)?),
            Self::TEA => Box::new(TEA::new(key)?),
            Self::XTEA => Box::new(XTEA::new(key)?),
        };

        Ok(c)
    }
}
