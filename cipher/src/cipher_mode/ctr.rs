//! ## The Counter Mode(CTR)
//!
//! $$
//! O_j = Encrypt(T_j), j = 1...n; C_j = P_j \xor O_j, j = 1...n-1; C'_n = P'_n \xor MSB_u(O_n);
//! $$
//!
//! 加密和解密是同一个变换, 开启`parallel`特性时大块数据按分组并行计算. <br>

use super::Counter;
use crate::{block_cipher::DynBlockCipher, CipherError};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use utils::xor_in_place;
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct CTR {
    counter: Counter,
    keystream: Vec<u8>,
    pos: usize,
}

impl CTR {
    pub fn new(iv: &[u8]) -> Self {
        Self {
            counter: Counter::new(iv),
            keystream: vec![0u8; iv.len()],
            pos: iv.len(),
        }
    }

    fn refill(&mut self, cipher: &DynBlockCipher) -> Result<(), CipherError> {
        self.keystream.copy_from_slice(self.counter.as_slice());
        cipher.encrypt_block_x(&mut self.keystream)?;
        self.counter.increment();
        self.pos = 0;
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn apply_par<'a>(
        &mut self,
        cipher: &DynBlockCipher,
        data: &'a mut [u8],
    ) -> Result<&'a mut [u8], CipherError> {
        let n = self.keystream.len();
        if self.pos != n || data.len() < super::PARALLEL_MIN_BYTES {
            return Ok(data);
        }

        let (head, tail) = data.split_at_mut(data.len() / n * n);
        let base = &self.counter;
        head.par_chunks_exact_mut(n)
            .enumerate()
            .try_for_each(|(i, block)| {
                let mut ks = zeroize::Zeroizing::new(base.nth(i as u64).as_slice().to_vec());
                cipher.encrypt_block_x(&mut ks)?;
                xor_in_place(block, &ks);
                Ok::<(), CipherError>(())
            })?;
        self.counter.add((head.len() / n) as u64);

        Ok(tail)
    }

    pub fn apply(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        #[cfg(feature = "parallel")]
        let data = self.apply_par(cipher, data)?;

        let mut data = data;
        while !data.is_empty() {
            if self.pos == self.keystream.len() {
                self.refill(cipher)?;
            }

            let n = (self.keystream.len() - self.pos).min(data.len());
            let (head, tail) = std::mem::take(&mut data).split_at_mut(n);
            xor_in_place(head, &self.keystream[self.pos..]);
            self.pos += n;
            data = tail;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CTR;
    use crate::{builder::BlockCipherType, cipher_mode::tests::cases};

    #[test]
    fn ctr_aes() {
        let cts = [
            "874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff5ae4df3edbd5d35e5b4f09020db03eab1e031dda2fbe03d1792170a0f3009cee",
            "1abc932417521ca24f2b0459fe7e6e0b090339ec0aa6faefd5ccc2c6f4ce8e941e36b26bd1ebc670d1bd1d665620abf74f78a7f6d29809585a97daec58c6b050",
            "601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c52b0930daa23de94ce87017ba2d84988ddfc9c58db67aada613c2dd08457941a6",
        ];

        let iv = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
        for (i, (cipher, iv, pt, ct)) in cases(iv, cts).into_iter().enumerate() {
            let mut buf = pt.clone();
            CTR::new(&iv).apply(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, ct, "case {i} encrypt failed");
            CTR::new(&iv).apply(&*cipher, &mut buf).unwrap();
            assert_eq!(buf, pt, "case {i} decrypt failed");

            let mut ctr = CTR::new(&iv);
            let mut buf = pt[..45].to_vec();
            buf.chunks_mut(11).for_each(|x| ctr.apply(&*cipher, x).unwrap());
            assert_eq!(buf, ct[..45], "case {i} chunked failed");
        }
    }

    #[test]
    fn ctr_counter_wraps() {
        let cipher = BlockCipherType::XTEA.block_cipher(&[7u8; 16]).unwrap();
        let mut data = vec![0u8; 16];
        CTR::new(&[0xff; 8]).apply(&*cipher, &mut data).unwrap();

        let (mut k0, mut k1) = ([0xffu8; 8], [0u8; 8]);
        cipher.encrypt_block_x(&mut k0).unwrap();
        cipher.encrypt_block_x(&mut k1).unwrap();
        assert_eq!(&data[..8], &k0);
        assert_eq!(&data[8..], &k1);
    }

    #[test]
    fn ctr_large_buffer() {
        // 大于并行阈值, 与逐段计算结果一致
        let cipher = BlockCipherType::AES.block_cipher(&[3u8; 16]).unwrap();
        let iv = [0xfeu8; 16];
        let pt = (0..(1usize << 17) + 5).map(|x| (x % 251) as u8).collect::<Vec<_>>();

        let mut a = pt.clone();
        CTR::new(&iv).apply(&*cipher, &mut a).unwrap();

        let mut ctr = CTR::new(&iv);
        let mut b = pt.clone();
        b.chunks_mut(4099).for_each(|x| ctr.apply(&*cipher, x).unwrap());
        assert_eq!(a, b);

        CTR::new(&iv).apply(&*cipher, &mut a).unwrap();
        assert_eq!(a, pt);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn ctr_parallel_after_partial_block() {
        let cipher = BlockCipherType::Blowfish.block_cipher(&[1u8; 20]).unwrap();
        let iv = [0x11u8; 8];
        let pt = (0..super::super::PARALLEL_MIN_BYTES * 2 + 3)
            .map(|x| (x % 247) as u8)
            .collect::<Vec<_>>();

        // 先用掉半个分组, 再对齐, 之后的大块数据走并行
        let mut a = pt.clone();
        let mut ctr = CTR::new(&iv);
        let (x, rest) = a.split_at_mut(5);
        ctr.apply(&*cipher, x).unwrap();
        let (y, rest) = rest.split_at_mut(3);
        ctr.apply(&*cipher, y).unwrap();
        ctr.apply(&*cipher, rest).unwrap();

        let mut b = pt.clone();
        let mut ctr = CTR::new(&iv);
        b.chunks_mut(1000).for_each(|x| ctr.apply(&*cipher, x).unwrap());
        assert_eq!(a, b);
    }
}
