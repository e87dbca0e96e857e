//! TEA / XTEA<br>
//! 64位分组, 128位密钥, 32轮(每轮两次Feistel), 大端字序.<br>
//!
//! $$
//! \delta = \lfloor (\sqrt{5} - 1) \cdot 2^{31} \rfloor = \mathtt{0x9E3779B9}
//! $$

use super::{BlockDecrypt, BlockEncrypt};
use crate::{builder::BlockCipherType, ConfigError};
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

const DELTA: u32 = 0x9E37_79B9;
const ROUNDS: u32 = 32;

fn load_key(key: &[u8], algorithm: BlockCipherType) -> Result<[u32; 4], ConfigError> {
    if key.len() != 16 {
        return Err(ConfigError::InvalidKeySize {
            algorithm,
            size: key.len(),
        });
    }

    let mut k = [0u32; 4];
    k.iter_mut()
        .zip(key.chunks_exact(4))
        .for_each(|(k, x)| *k = u32::from_be_bytes([x[0], x[1], x[2], x[3]]));
    Ok(k)
}

fn load_block(block: &[u8; 8]) -> (u32, u32) {
    (
        u32::from_be_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_be_bytes([block[4], block[5], block[6], block[7]]),
    )
}

fn store_block(v0: u32, v1: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&v0.to_be_bytes());
    out[4..].copy_from_slice(&v1.to_be_bytes());
    out
}

#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct TEA {
    key: [u32; 4],
}

impl TEA {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        load_key(key, BlockCipherType::TEA).map(|key| Self { key })
    }
}

impl BlockEncrypt<8> for TEA {
    fn encrypt_block(&self, plaintext: &[u8; 8]) -> [u8; 8] {
        let (mut v0, mut v1) = load_block(plaintext);
        let k = &self.key;
        let mut sum = 0u32;
        for _ in 0..ROUNDS {
            sum = sum.wrapping_add(DELTA);
            v0 = v0.wrapping_add(
                (v1 << 4).wrapping_add(k[0]) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k[1]),
            );
            v1 = v1.wrapping_add(
                (v0 << 4).wrapping_add(k[2]) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k[3]),
            );
        }
        store_block(v0, v1)
    }
}

impl BlockDecrypt<8> for TEA {
    fn decrypt_block(&self, ciphertext: &[u8; 8]) -> [u8; 8] {
        let (mut v0, mut v1) = load_block(ciphertext);
        let k = &self.key;
        let mut sum = DELTA.wrapping_mul(ROUNDS);
        for _ in 0..ROUNDS {
            v1 = v1.wrapping_sub(
                (v0 << 4).wrapping_add(k[2]) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k[3]),
            );
            v0 = v0.wrapping_sub(
                (v1 << 4).wrapping_add(k[0]) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k[1]),
            );
            sum = sum.wrapping_sub(DELTA);
        }
        store_block(v0, v1)
    }
}

/// XTEA, 修正了TEA的相关密钥问题
#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct XTEA {
    key: [u32; 4],
}

impl XTEA {
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        load_key(key, BlockCipherType::XTEA).map(|key| Self { key })
    }

    #[inline]
    fn mix(v: u32) -> u32 {
        ((v << 4) ^ (v >> 5)).wrapping_add(v)
    }
}

impl BlockEncrypt<8> for XTEA {
    fn encrypt_block(&self, plaintext: &[u8; 8]) -> [u8; 8] {
        let (mut v0, mut v1) = load_block(plaintext);
        let k = &self.key;
        let mut sum = 0u32;
        for _ in 0..ROUNDS {
            v0 = v0.wrapping_add(Self::mix(v1) ^ sum.wrapping_add(k[(sum & 3) as usize]));
            sum = sum.wrapping_add(DELTA);
            v1 = v1.wrapping_add(Self::mix(v0) ^ sum.wrapping_add(k[((sum >> 11) & 3) as usize]));
        }
        store_block(v0, v1)
    }
}

impl BlockDecrypt<8> for XTEA {
    fn decrypt_block(&self, ciphertext: &[u8; 8]) -> [u8; 8] {
        let (mut v0, mut v1) = load_block(ciphertext);
        let k = &self.key;
        let mut sum = DELTA.wrapping_mul(ROUNDS);
        for _ in 0..ROUNDS {
            v1 = v1.wrapping_sub(Self::mix(v0) ^ sum.wrapping_add(k[((sum >> 11) & 3) as usize]));
            sum = sum.wrapping_sub(DELTA);
            v0 = v0.wrapping_sub(Self::mix(v1) ^ sum.wrapping_add(k[(sum & 3) as usize]));
        }
        store_block(v0, v1)
    }
}

impl_block_cipher_x!(TEA, 8);
impl_block_cipher_x!(XTEA, 8);

#[cfg(test)]
mod tests {
    use super::{TEA, XTEA};
    use crate::{BlockDecrypt, BlockEncrypt};

    fn arr(s: &str) -> [u8; 8] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn tea() {
        let cases = [
            ("00000000000000000000000000000000", "0000000000000000", "41ea3a0a94baa940"),
            ("000102030405060708090a0b0c0d0e0f", "4142434445464748", "df25fc4279b8f929"),
        ];

        for (i, (key, pt, ct)) in cases.into_iter().enumerate() {
            let c = TEA::new(&hex::decode(key).unwrap()).unwrap();
            let x = c.encrypt_block(&arr(pt));
            assert_eq!(hex::encode(x), ct, "case {i} encrypt failed");
            assert_eq!(c.decrypt_block(&x), arr(pt), "case {i} decrypt failed");
        }
    }

    #[test]
    fn xtea() {
        let cases = [
            ("00000000000000000000000000000000", "0000000000000000", "dee9d4d8f7131ed9"),
            ("000102030405060708090a0b0c0d0e0f", "4142434445464748", "497df3d072612cb5"),
            ("000102030405060708090a0b0c0d0e0f", "4141414141414141", "e78f2d13744341d8"),
        ];

        for (i, (key, pt, ct)) in cases.into_iter().enumerate() {
            let c = XTEA::new(&hex::decode(key).unwrap()).unwrap();
            let x = c.encrypt_block(&arr(pt));
            assert_eq!(hex::encode(x), ct, "case {i} encrypt failed");
            assert_eq!(c.decrypt_block(&x), arr(pt), "case {i} decrypt failed");
        }
    }
}
