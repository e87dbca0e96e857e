//! Blowfish, 64位分组, 32~448位变长密钥<br>
//! [Description of a New Variable-Length Key, 64-Bit Block Cipher](https://www.schneier.com/academic/archives/1994/09/description_of_a_new.html)<br>

use super::{BlockDecrypt, BlockEncrypt};
use crate::{builder::BlockCipherType, ConfigError};
use blowfish::cipher::{generic_array::GenericArray, BlockDecrypt as _, BlockEncrypt as _, KeyInit};

#[derive(Clone)]
pub struct Blowfish(blowfish::Blowfish);

impl Blowfish {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        <blowfish::Blowfish>::new_from_slice(key)
            .map(Self)
            .map_err(|_| ConfigError::InvalidKeySize {
                algorithm: BlockCipherType::Blowfish,
                size: key.len(),
            })
    }
}

impl BlockEncrypt<8> for Blowfish {
    fn encrypt_block(&self, plaintext: &[u8; 8]) -> [u8; 8] {
        let mut b = GenericArray::clone_from_slice(plaintext);
        self.0.encrypt_block(&mut b);
        let mut out = [0u8; 8];
        out.copy_from_slice(&b);
        out
    }
}

impl BlockDecrypt<8> for Blowfish {
    fn decrypt_block(&self, ciphertext: &[u8; 8]) -> [u8; 8] {
        let mut b = GenericArray::clone_from_slice(ciphertext);
        self.0.decrypt_block(&mut b);
        let mut out = [0u8; 8];
        out.copy_from_slice(&b);
        out
    }
}

impl_block_cipher_x!(Blowfish, 8);

#[cfg(test)]
mod tests {
    use super::Blowfish;
    use crate::{BlockDecrypt, BlockEncrypt};

    #[test]
    fn blowfish() {
        // Eric Young's test vectors
        let cases = [
            ("0000000000000000", "0000000000000000", "4ef997456198dd78"),
            ("0123456789abcdef", "1111111111111111", "61f9c3802281b096"),
        ];

        for (i, (key, pt, ct)) in cases.into_iter().enumerate() {
            let c = Blowfish::new(&hex::decode(key).unwrap()).unwrap();
            let pt: [u8; 8] = hex::decode(pt).unwrap().try_into().unwrap();
            let x = c.encrypt_block(&pt);
            assert_eq!(hex::encode(x), ct, "case {i} encrypt failed");
            assert_eq!(c.decrypt_block(&x), pt, "case {i} decrypt failed");
        }

        assert!(Blowfish::new(&[0u8; 3]).is_err());
        assert!(Blowfish::new(&[0u8; 56]).is_ok());
    }
}
