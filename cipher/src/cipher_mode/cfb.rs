//! ## The Cipher Feedback Mode(CFB)
//!
//! 只实现分段大小等于分组大小($s = b$)的CFB:
//!
//! $$
//! I_1 = IV; I_j = C_{j-1}, j = 2...n; O_j = Encrypt(I_j); C_j = P_j \xor O_j; C'_n = P'_n \xor MSB_u(O_n);
//!
//! I_1 = IV; I_j = C_{j-1}, j = 2...n; O_j = Encrypt(I_j); P_j = C_j \xor O_j; P'_n = C'_n \xor MSB_u(O_n);
//! $$
//!
//! 解密时反馈的是收到的密文. <br>

use crate::{block_cipher::DynBlockCipher, CipherError};
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct CFB {
    // 正在收集的密文分组, 满一个分组后作为下一次的加密输入
    register: Vec<u8>,
    keystream: Vec<u8>,
    pos: usize,
}

impl CFB {
    pub fn new(iv: &[u8]) -> Self {
        Self {
            register: iv.to_vec(),
            keystream: vec![0u8; iv.len()],
            pos: iv.len(),
        }
    }

    fn refill(&mut self, cipher: &DynBlockCipher) -> Result<(), CipherError> {
        self.keystream.copy_from_slice(&self.register);
        cipher.encrypt_block_x(&mut self.keystream)?;
        self.pos = 0;
        Ok(())
    }

    pub fn encrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        for x in data.iter_mut() {
            if self.pos == self.keystream.len() {
                self.refill(cipher)?;
            }
            *x ^= self.keystream[self.pos];
            self.register[self.pos] = *x;
            self.pos += 1;
        }

        Ok(())
    }

    pub fn decrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        for x in data.iter_mut() {
            if self.pos == self.keystream.len() {
                self.refill(cipher)?;
            }
            self.register[self.pos] = *x;
            *x ^= self.keystream[self.pos];
            self.pos += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CFB;
    use crate::cipher_mode::tests::{cases, IV};

    #[test]
    fn cfb_aes() {
        let cts = [
            "3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b26751f67a3cbb140b1808cf187a4f4dfc04b05357c5d1c0eeac4c66f9ff7f2e6",
            "cdc80d6fddf18cab34c25909c99a417467ce7f7f81173621961a2b70171d3d7a2e1e8a1dd59b88b1c8e60fed1efac4c9c05f9f9ca9834fa042ae8fba584b09ff",
            "dc7e84bfda79164b7ecd8486985d386039ffed143b28b1c832113c6331e5407bdf10132415e54b92a13ed0a8267ae2f975a385741ab9cef82031623d55b1e471",
        ];

        for (i, (cipher, iv, pt, ct)) in cases(IV, cts).into_iter().enumerate() {
            let mut buf = pt.clone();
            CFB::new(&iv).encrypt(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, ct, "case {i} encrypt failed");
            CFB::new(&iv).decrypt(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, pt, "case {i} decrypt failed");

            // 任意切分, 最后一段不足一个分组
            for chunk in [1usize, 7, 16, 33] {
                let (mut enc, mut dec) = (CFB::new(&iv), CFB::new(&iv));
                let mut buf = pt[..61].to_vec();
                buf.chunks_mut(chunk)
                    .for_each(|x| enc.encrypt(&*cipher, x).unwrap());
                assert_eq!(buf, ct[..61], "case {i} chunk {chunk} encrypt failed");
                buf.chunks_mut(chunk)
                    .for_each(|x| dec.decrypt(&*cipher, x).unwrap());
                assert_eq!(buf, pt[..61], "case {i} chunk {chunk} decrypt failed");
            }
        }
    }
}
