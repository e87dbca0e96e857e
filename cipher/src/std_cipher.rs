//! 一次性加解密 <br>
//!
//! 每次调用都从配置的IV/nonce重新开始, 整块数据先填充再经工作模式变换. 出错时不输出任何数据. <br>
//! 空输入得到空输出(GCM也不输出标签), 只有ECB/CBC配合非`No`/`Empty`的填充方式时输出一个填充分组.

use crate::{
    config::{Transform, ValidConfig},
    CipherError, Decrypt, Encrypt,
};
use zeroize::Zeroizing;

#[derive(Clone, Debug)]
pub struct StdEncrypter {
    config: ValidConfig,
}

impl From<ValidConfig> for StdEncrypter {
    fn from(config: ValidConfig) -> Self {
        Self { config }
    }
}

impl Encrypt for StdEncrypter {
    fn encrypt_into(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        let (c, bs) = (&self.config, self.config.block_size());
        if plaintext.is_empty() && c.padding().is_identity() {
            return Ok(());
        }

        let mut buf = Zeroizing::new(Vec::with_capacity(plaintext.len() + bs + c.tag_size()));
        buf.extend_from_slice(plaintext);

        match c.transform()? {
            Transform::Mode(mut m) => {
                if m.mode().is_block_aligned() {
                    c.padding().pad(&mut buf, bs)?;
                }
                m.encrypt(c.cipher(), &mut buf)?;
            }
            Transform::Gcm(mut g) => {
                g.encrypt(c.cipher(), &mut buf)?;
                let tag = g.tag(c.cipher())?;
                buf.extend_from_slice(&tag);
            }
        }

        ciphertext.extend_from_slice(&buf);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct StdDecrypter {
    config: ValidConfig,
}

impl From<ValidConfig> for StdDecrypter {
    fn from(config: ValidConfig) -> Self {
        Self { config }
    }
}

impl Decrypt for StdDecrypter {
    fn decrypt_into(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        let (c, bs) = (&self.config, self.config.block_size());
        if ciphertext.is_empty() {
            return Ok(());
        }

        let mut buf = Zeroizing::new(ciphertext.to_vec());
        match c.transform()? {
            Transform::Mode(mut m) => {
                m.decrypt(c.cipher(), &mut buf)?;
                if m.mode().is_block_aligned() {
                    c.padding().unpad(&mut buf, bs)?;
                }
            }
            Transform::Gcm(mut g) => g.decrypt_and_verify(c.cipher(), &mut buf)?,
        }

        plaintext.extend_from_slice(&buf);
        Ok(())
    }
}
