//! AES加密<br>
//! FIPS 197  <br>
//! [FIPS 197-upd1](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.197-upd1.pdf)<br>
//! 轮函数由RustCrypto `aes`实现, 运行时按CPU特性选择AES-NI/ARMv8或软件实现.<br>

use super::{BlockDecrypt, BlockEncrypt};
use crate::ConfigError;
use aes::cipher::{
    generic_array::GenericArray, BlockDecrypt as _, BlockEncrypt as _, KeyInit,
};

/// 按密钥长度选择AES-128/192/256
#[derive(Clone)]
pub enum AES {
    AES128(aes::Aes128),
    AES192(aes::Aes192),
    AES256(aes::Aes256),
}

impl AES {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        let invalid = |_| ConfigError::InvalidKeySize {
            algorithm: crate::builder::BlockCipherType::AES,
            size: key.len(),
        };

        match key.len() {
            16 => aes::Aes128::new_from_slice(key).map(Self::AES128).map_err(invalid),
            24 => aes::Aes192::new_from_slice(key).map(Self::AES192).map_err(invalid),
            32 => aes::Aes256::new_from_slice(key).map(Self::AES256).map_err(invalid),
            _ => Err(invalid(aes::cipher::InvalidLength)),
        }
    }
}

impl BlockEncrypt<16> for AES {
    fn encrypt_block(&self, plaintext: &[u8; 16]) -> [u8; 16] {
        let mut b = GenericArray::clone_from_slice(plaintext);
        match self {
            Self::AES128(c) => c.encrypt_block(&mut b),
            Self::AES192(c) => c.encrypt_block(&mut b),
            Self::AES256(c) => c.encrypt_block(&mut b),
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(&b);
        out
    }
}

impl BlockDecrypt<16> for AES {
    fn decrypt_block(&self, ciphertext: &[u8; 16]) -> [u8; 16] {
        let mut b = GenericArray::clone_from_slice(ciphertext);
        match self {
            Self::AES128(c) => c.decrypt_block(&mut b),
            Self::AES192(c) => c.decrypt_block(&mut b),
            Self::AES256(c) => c.decrypt_block(&mut b),
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(&b);
        out
    }
}

impl_block_cipher_x!(AES, 16);

#[cfg(test)]
mod tests {
    use super::AES;
    use crate::{BlockDecrypt, BlockEncrypt};

    #[test]
    fn aes() {
        // FIPS 197 Appendix C
        let cases = [
            (
                "000102030405060708090a0b0c0d0e0f",
                "69c4e0d86a7b0430d8cdb78070b4c55a",
            ),
            (
                "000102030405060708090a0b0c0d0e0f1011121314151617",
                "dda97ca4864cdfe06eaf70a0ec0d7191",
            ),
            (
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
                "8ea2b7ca516745bfeafc49904b496089",
            ),
        ];
        let pt: [u8; 16] = hex::decode("00112233445566778899aabbccddeeff")
            .unwrap()
            .try_into()
            .unwrap();

        for (i, (key, ct)) in cases.into_iter().enumerate() {
            let aes = AES::new(&hex::decode(key).unwrap()).unwrap();
            let c = aes.encrypt_block(&pt);
            assert_eq!(hex::encode(c), ct, "case {i} encrypt failed");
            assert_eq!(aes.decrypt_block(&c), pt, "case {i} decrypt failed");
        }
    }

    #[test]
    fn invalid_key() {
        assert!(AES::new(&[0u8; 20]).is_err());
    }
}
