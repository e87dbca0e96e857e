//! ## The Cipher Block Chaining Mode(CBC)
//!
//! 给定初始向量IV, IV可以不保密, 但是**它必须是不可预测的(unpredictable)**. <br>
//!
//! $$
//! C_1 = Encrypt(P_1 \xor IV); C_j = Encrypt(P_j \xor C_{j-1}), j = 2...n
//!
//! P_1 = Decrypt(C_1) \xor IV; P_j = Decrypt(C_j) \xor C_{j-1}, j = 2...n
//! $$
//!
//! 在CBC模式中, 加密每个明文块依赖前一个密文输出, 故Encrypt无法并行. 但Decrypt是可以并行的. <br>

use super::check_aligned;
use crate::{block_cipher::DynBlockCipher, CipherError};
use utils::xor_in_place;
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cipher Block Chaining Mode(CBC) <br>
///
/// `iv`保存上一个密文分组, 跨多次调用保持链接状态.
#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct CBC {
    iv: Vec<u8>,
}

impl CBC {
    pub fn new(iv: &[u8]) -> Self {
        Self { iv: iv.to_vec() }
    }

    fn check_iv(&self, block_size: usize) -> Result<(), CipherError> {
        if self.iv.len() != block_size {
            Err(CipherError::InvalidBlockSize {
                target: block_size,
                real: self.iv.len(),
            })
        } else {
            Ok(())
        }
    }

    pub fn encrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        let n = cipher.block_size_x();
        check_aligned(n, data.len())?;
        self.check_iv(n)?;

        for block in data.chunks_exact_mut(n) {
            xor_in_place(block, &self.iv);
            cipher.encrypt_block_x(block)?;
            self.iv.copy_from_slice(block);
        }

        Ok(())
    }

    pub fn decrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        let n = cipher.block_size_x();
        check_aligned(n, data.len())?;
        self.check_iv(n)?;

        let mut pre = zeroize::Zeroizing::new(vec![0u8; n]);
        for block in data.chunks_exact_mut(n) {
            pre.copy_from_slice(block);
            cipher.decrypt_block_x(block)?;
            xor_in_place(block, &self.iv);
            std::mem::swap(&mut self.iv, &mut *pre);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CBC;
    use crate::cipher_mode::tests::{cases, IV};

    const CTS: [&str; 3] = [
        "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b273bed6b8e3c1743b7116e69e222295163ff1caa1681fac09120eca307586e1a7",
        "4f021db243bc633d7178183a9fa071e8b4d9ada9ad7dedf4e5e738763f69145a571b242012fb7ae07fa9baac3df102e008b0e27988598881d920a9e64f5615cd",
        "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d39f23369a9d9bacfa530e26304231461b2eb05e2c39be9fcda6c19078c6a9d1b",
    ];

    #[test]
    fn cbc_aes() {
        for (i, (cipher, iv, pt, ct)) in cases(IV, CTS).into_iter().enumerate() {
            let mut buf = pt.clone();
            CBC::new(&iv).encrypt(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, ct, "case {i} encrypt failed");
            CBC::new(&iv).decrypt(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, pt, "case {i} decrypt failed");
        }
    }

    #[test]
    fn cbc_chaining_across_calls() {
        for (i, (cipher, iv, pt, ct)) in cases(IV, CTS).into_iter().enumerate() {
            let (mut enc, mut dec) = (CBC::new(&iv), CBC::new(&iv));
            let mut buf = pt.clone();
            for block in buf.chunks_mut(16) {
                enc.encrypt(&*cipher, block).unwrap();
            }
            assert_eq!(buf, ct, "case {i} encrypt failed");

            let (head, tail) = buf.split_at_mut(48);
            dec.decrypt(&*cipher, head).unwrap();
            dec.decrypt(&*cipher, tail).unwrap();
            assert_eq!(buf, pt, "case {i} decrypt failed");
        }
    }
}
