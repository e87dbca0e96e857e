//! ## The Electronic Codebook Mode(ECB)
//!
//! $$
//! C_j = Encrypt(P_j), j = 1...n
//!
//! P_j = Decrypt(C_j), j = 1...n
//! $$
//!
//! 给定的密钥, 每个明文块和密文块一一对应(如果不期待使用这一特性, 不应该使用ECB模式), 加解密都可并行. <br>

use super::check_aligned;
use crate::{block_cipher::DynBlockCipher, CipherError};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Electronic Codebook Mode, 无状态
#[derive(Copy, Clone, Debug, Default)]
pub struct ECB;

impl ECB {
    pub fn encrypt(&self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        let n = cipher.block_size_x();
        check_aligned(n, data.len())?;

        #[cfg(feature = "parallel")]
        if data.len() >= super::PARALLEL_MIN_BYTES {
            return data
                .par_chunks_exact_mut(n)
                .try_for_each(|b| cipher.encrypt_block_x(b));
        }

        data.chunks_exact_mut(n)
            .try_for_each(|b| cipher.encrypt_block_x(b))
    }

    pub fn decrypt(&self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        let n = cipher.block_size_x();
        check_aligned(n, data.len())?;

        #[cfg(feature = "parallel")]
        if data.len() >= super::PARALLEL_MIN_BYTES {
            return data
                .par_chunks_exact_mut(n)
                .try_for_each(|b| cipher.decrypt_block_x(b));
        }

        data.chunks_exact_mut(n)
            .try_for_each(|b| cipher.decrypt_block_x(b))
    }
}
