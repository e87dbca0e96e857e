mod error;
pub use error::{CipherError, ConfigError, PaddingError};

pub mod builder;
pub use builder::{BlockCipherType, CipherMode, PaddingMode};

pub mod block_cipher;
pub use block_cipher::{
    BlockCipher, BlockCipherX, BlockDecrypt, BlockDecryptX, BlockEncrypt, BlockEncryptX,
    BlockSizeX,
};

pub mod cipher_mode;

pub mod ae;

pub mod config;
pub use config::{CipherConfig, ValidConfig};

mod std_cipher;
pub use std_cipher::{StdDecrypter, StdEncrypter};

pub mod stream_cipher;
pub use stream_cipher::{StreamDecrypter, StreamEncrypter};

use std::io::{Read, Write};

pub trait Encrypt {
    /// 追加到`ciphertext`之后, 出错时`ciphertext`恢复原长度
    fn encrypt_into(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError>;

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut ciphertext = Vec::with_capacity(plaintext.len() + 16);
        self.encrypt_into(plaintext, &mut ciphertext)?;
        Ok(ciphertext)
    }
}

pub trait Decrypt {
    /// 追加到`plaintext`之后, 出错时`plaintext`恢复原长度
    fn decrypt_into(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut plaintext = Vec::with_capacity(ciphertext.len());
        self.decrypt_into(ciphertext, &mut plaintext)?;
        Ok(plaintext)
    }
}

pub trait Cipher: Encrypt + Decrypt {}

impl<T> Cipher for T where T: Encrypt + Decrypt {}

pub fn new_std_encrypter(config: &CipherConfig) -> Result<StdEncrypter, ConfigError> {
    config.validate().map(StdEncrypter::from)
}

pub fn new_std_decrypter(config: &CipherConfig) -> Result<StdDecrypter, ConfigError> {
    config.validate().map(StdDecrypter::from)
}

pub fn new_stream_encrypter<W: Write>(
    sink: W,
    config: &CipherConfig,
) -> Result<StreamEncrypter<W>, ConfigError> {
    StreamEncrypter::new(sink, config)
}

pub fn new_stream_decrypter<R: Read>(
    source: R,
    config: &CipherConfig,
) -> Result<StreamDecrypter<R>, ConfigError> {
    StreamDecrypter::new(source, config)
}
