//! ## The Output Feedback Mode(OFB)
//!
//! 给定初始向量IV, **其需要是一个nonce值**. 即对于给定的密钥, 每次执行OFB模式时, $IV$都需要是独一无二的(unique), 且需要是保密的. <br>
//!
//! $$
//! I_1 = IV; I_j = O_{j-1}, j = 2...n; O_j = Encrypt(I_j), C_j = P_j \xor O_j, j = 1...n-1; C'_n = P'_n \xor MSB_u(O_n);
//! $$
//!
//! 加密和解密是同一个变换. <br>

use crate::{block_cipher::DynBlockCipher, CipherError};
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct OFB {
    // O_j
    register: Vec<u8>,
    pos: usize,
}

impl OFB {
    pub fn new(iv: &[u8]) -> Self {
        Self {
            register: iv.to_vec(),
            pos: iv.len(),
        }
    }

    pub fn apply(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        for x in data.iter_mut() {
            if self.pos == self.register.len() {
                cipher.encrypt_block_x(&mut self.register)?;
                self.pos = 0;
            }
            *x ^= self.register[self.pos];
            self.pos += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::OFB;
    use crate::cipher_mode::tests::{cases, IV};

    #[test]
    fn ofb_aes() {
        let cts = [
            "3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed8259740051e9c5fecf64344f7a82260edcc304c6528f659c77866a510d9c1d6ae5e",
            "cdc80d6fddf18cab34c25909c99a4174fcc28b8d4c63837c09e81700c11004018d9a9aeac0f6596f559c6d4daf59a5f26d9f200857ca6c3e9cac524bd9acc92a",
            "dc7e84bfda79164b7ecd8486985d38604febdc6740d20b3ac88f6ad82a4fb08d71ab47a086e86eedf39d1c5bba97c4080126141d67f37be8538f5a8be740e484",
        ];

        for (i, (cipher, iv, pt, ct)) in cases(IV, cts).into_iter().enumerate() {
            let mut buf = pt.clone();
            OFB::new(&iv).apply(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, ct, "case {i} encrypt failed");
            OFB::new(&iv).apply(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, pt, "case {i} decrypt failed");

            let mut ofb = OFB::new(&iv);
            let mut buf = pt[..50].to_vec();
            buf.chunks_mut(3).for_each(|x| ofb.apply(&*cipher, x).unwrap());
            assert_eq!(buf, ct[..50], "case {i} chunked failed");
        }
    }
}
