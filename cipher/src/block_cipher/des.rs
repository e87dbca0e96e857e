//! DES / 3DES<br>
//! FIPS 46-3, NIST SP 800-67<br>
//! 3DES为EDE结构, 16字节密钥为`K1 ‖ K2`(K3 = K1), 24字节密钥为`K1 ‖ K2 ‖ K3`.<br>

use super::{BlockDecrypt, BlockEncrypt};
use crate::{builder::BlockCipherType, ConfigError};
use des::cipher::{
    generic_array::{typenum::U8, GenericArray},
    BlockDecrypt as _, BlockEncrypt as _, KeyInit,
};

#[derive(Clone)]
pub struct DES(des::Des);

#[derive(Clone)]
pub enum TripleDES {
    Ede2(des::TdesEde2),
    Ede3(des::TdesEde3),
}

impl DES {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        des::Des::new_from_slice(key)
            .map(Self)
            .map_err(|_| ConfigError::InvalidKeySize {
                algorithm: BlockCipherType::DES,
                size: key.len(),
            })
    }
}

impl TripleDES {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        let c = match key.len() {
            16 => des::TdesEde2::new_from_slice(key).map(Self::Ede2).ok(),
            24 => des::TdesEde3::new_from_slice(key).map(Self::Ede3).ok(),
            _ => None,
        };

        c.ok_or(ConfigError::InvalidKeySize {
            algorithm: BlockCipherType::TripleDES,
            size: key.len(),
        })
    }
}

/// 在`GenericArray`上原地变换一个分组
fn transform<F>(block: &[u8; 8], f: F) -> [u8; 8]
where
    F: FnOnce(&mut GenericArray<u8, U8>),
{
    let mut b = GenericArray::clone_from_slice(block);
    f(&mut b);
    let mut out = [0u8; 8];
    out.copy_from_slice(&b);
    out
}

impl BlockEncrypt<8> for DES {
    fn encrypt_block(&self, plaintext: &[u8; 8]) -> [u8; 8] {
        transform(plaintext, |b| self.0.encrypt_block(b))
    }
}

impl BlockDecrypt<8> for DES {
    fn decrypt_block(&self, ciphertext: &[u8; 8]) -> [u8; 8] {
        transform(ciphertext, |b| self.0.decrypt_block(b))
    }
}

impl BlockEncrypt<8> for TripleDES {
    fn encrypt_block(&self, plaintext: &[u8; 8]) -> [u8; 8] {
        transform(plaintext, |b| match self {
            Self::Ede2(c) => c.encrypt_block(b),
            Self::Ede3(c) => c.encrypt_block(b),
        })
    }
}

impl BlockDecrypt<8> for TripleDES {
    fn decrypt_block(&self, ciphertext: &[u8; 8]) -> [u8; 8] {
        transform(ciphertext, |b| match self {
            Self::Ede2(c) => c.decrypt_block(b),
            Self::Ede3(c) => c.decrypt_block(b),
        })
    }
}

impl_block_cipher_x!(DES, 8);
impl_block_cipher_x!(TripleDES, 8);

#[cfg(test)]
mod tests {
    use super::{TripleDES, DES};
    use crate::{BlockDecrypt, BlockEncrypt};

    fn arr(s: &str) -> [u8; 8] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn des() {
        let c = DES::new(&hex::decode("133457799bbcdff1").unwrap()).unwrap();
        let ct = c.encrypt_block(&arr("0123456789abcdef"));
        assert_eq!(hex::encode(ct), "85e813540f0ab405");
        assert_eq!(c.decrypt_block(&ct), arr("0123456789abcdef"));
    }

    #[test]
    fn triple_des() {
        let cases = [
            (
                "0123456789abcdef23456789abcdef01456789abcdef0123",
                "a826fd8ce53b855f",
            ),
            ("0123456789abcdef23456789abcdef01", "c44862f70cf2fbdc"),
        ];
        let pt = arr("5468652071756663");

        for (i, (key, ct)) in cases.into_iter().enumerate() {
            let c = TripleDES::new(&hex::decode(key).unwrap()).unwrap();
            let x = c.encrypt_block(&pt);
            assert_eq!(hex::encode(x), ct, "case {i} encrypt failed");
            assert_eq!(c.decrypt_block(&x), pt, "case {i} decrypt failed");
        }

        assert!(TripleDES::new(&[1u8; 8]).is_err());
    }
}
