//! # Galois/Counter Mode(GCM)
//!
//! - [Recommendation for Block Cipher Modes of Operation: GCM and GMAC](https://csrc.nist.gov/pubs/sp/800/38/d/final) <br>
//!
//! - GCM的特点:
//!   - 无需事先知道payload/associated data的长度;
//!   - 加密过的数据无需解密, 即可完成一致性认证;
//!
//! 记(Nonce, AssociateData, Payload)为`(N, A, P)`, 其字节长度为`(n, a, p)`, 需要满足:
//! - `p <= 2^{36} - 32`;
//! - `a <= 2^{61} - 1`;
//! - `1 <= n`;
//!
//! ## 注意
//!
//! - 如果nonce值的uniqueness不能保证, 会减弱GCM的安全性;
//! - 加密输出结果格式为`C || T`, `T`截断为`tag_size`字节, `tag_size`取值`[12, 16]`;
//! - 解密时先校验`T`再输出明文, 校验失败不输出任何明文;

use crate::{
    block_cipher::BlockCipherX,
    builder::CipherMode,
    CipherError, ConfigError,
};
use subtle::ConstantTimeEq;
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 认证标签默认字节长度
pub const DEFAULT_TAG_SIZE: usize = 16;

/// 明文的最大字节长度
pub const PAYLOAD_LIMIT: u64 = (1u64 << 36) - 32;

/// 可增量加密的GCM状态, 每条消息使用一个新的实例
#[derive(Clone)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct GCM {
    // hash subkey
    h: u128,
    j0: u128,
    // 当前计数块
    cb: u128,
    // GHASH中间值
    s: u128,
    keystream: [u8; 16],
    pos: usize,
    // 未满一个分组的待哈希密文
    pending: [u8; 16],
    pending_len: usize,
    aad_len: u64,
    text_len: u64,
    tag_size: usize,
}

impl GCM {
    const R: u128 = 0b11100001u128 << 120;

    pub fn new(
        cipher: &dyn BlockCipherX,
        nonce: &[u8],
        aad: &[u8],
        tag_size: usize,
    ) -> Result<Self, ConfigError> {
        let block_size = cipher.block_size_x();
        if block_size != 16 {
            return Err(ConfigError::UnsupportedMode {
                mode: CipherMode::GCM,
                block_size,
            });
        } else if nonce.is_empty() {
            return Err(ConfigError::MissingNonce);
        } else if !(12..=16).contains(&tag_size) {
            return Err(ConfigError::InvalidTagSize(tag_size));
        }

        let h = Self::encrypt_u128(cipher, 0).map_err(|_| ConfigError::UnsupportedMode {
            mode: CipherMode::GCM,
            block_size,
        })?;
        let j0 = Self::j0(nonce, h);

        Ok(Self {
            h,
            j0,
            cb: Self::inc_s(j0, 32),
            s: Self::g_hash(0, aad, h),
            keystream: [0u8; 16],
            pos: 16,
            pending: [0u8; 16],
            pending_len: 0,
            aad_len: aad.len() as u64,
            text_len: 0,
            tag_size,
        })
    }

    fn encrypt_u128(cipher: &dyn BlockCipherX, x: u128) -> Result<u128, CipherError> {
        let mut b = x.to_be_bytes();
        cipher.encrypt_block_x(&mut b)?;
        Ok(u128::from_be_bytes(b))
    }

    // len(x) = l, l >= s
    // inc_s(X) = MSB_{l-s}(x)|| (LSB_s(x) + 1 \mod 2^s)
    const fn inc_s(x: u128, s: usize) -> u128 {
        let y = (1 << s) - 1;
        ((x >> s) << s) | (x.wrapping_add(1) & y)
    }

    // 定义两个块乘积`X \cdot Y`
    const fn block_mul(x: u128, y: u128) -> u128 {
        let (mut z, mut v, mut i) = (0, y, 0);

        while i < u128::BITS {
            if (x & (1u128 << (u128::BITS - 1 - i))) != 0 {
                z ^= v;
            }
            if (v & 0x1) != 0 {
                v >>= 1;
                v ^= Self::R;
            } else {
                v >>= 1;
            }
            i += 1;
        }

        z
    }

    // x大小无需是分组大小的整数倍, 等价于补0对齐
    // `Y_i = (Y_{i-1} ^ X_i) * h, i = 1...m`
    fn g_hash(pre_hash: u128, x: &[u8], h: u128) -> u128 {
        x.chunks(16).fold(pre_hash, |y, chunk| {
            let mut buf = [0u8; 16];
            buf[..chunk.len()].copy_from_slice(chunk);
            Self::g_hash_inner(y, buf, h)
        })
    }

    const fn g_hash_inner(pre_hash: u128, x: [u8; 16], h: u128) -> u128 {
        Self::block_mul(pre_hash ^ u128::from_be_bytes(x), h)
    }

    fn j0(nonce: &[u8], h: u128) -> u128 {
        let mut buf = [0u8; 16];
        if nonce.len() == 12 {
            buf[..12].copy_from_slice(nonce);
            buf[15] = 1;
            u128::from_be_bytes(buf)
        } else {
            buf[8..].copy_from_slice(&((nonce.len() as u64) << 3).to_be_bytes());
            let pre = Self::g_hash(0, nonce, h);
            Self::g_hash_inner(pre, buf, h)
        }
    }

    fn check_payload_size(&self, len: usize) -> Result<(), CipherError> {
        let len = self.text_len.saturating_add(len as u64);
        if len > PAYLOAD_LIMIT {
            Err(CipherError::PayloadTooLong {
                len,
                limit: PAYLOAD_LIMIT,
            })
        } else {
            Ok(())
        }
    }

    // 把密文并入GHASH
    fn absorb(&mut self, mut ct: &[u8]) {
        while !ct.is_empty() {
            let n = (16 - self.pending_len).min(ct.len());
            self.pending[self.pending_len..(self.pending_len + n)].copy_from_slice(&ct[..n]);
            self.pending_len += n;
            ct = &ct[n..];

            if self.pending_len == 16 {
                self.s = Self::g_hash_inner(self.s, self.pending, self.h);
                self.pending_len = 0;
            }
        }
    }

    // GCTR
    fn apply_keystream(
        &mut self,
        cipher: &dyn BlockCipherX,
        mut data: &mut [u8],
    ) -> Result<(), CipherError> {
        while !data.is_empty() {
            if self.pos == 16 {
                self.keystream = self.cb.to_be_bytes();
                cipher.encrypt_block_x(&mut self.keystream)?;
                self.cb = Self::inc_s(self.cb, 32);
                self.pos = 0;
            }

            let n = (16 - self.pos).min(data.len());
            let (head, tail) = std::mem::take(&mut data).split_at_mut(n);
            head.iter_mut()
                .zip(self.keystream[self.pos..].iter())
                .for_each(|(a, &b)| *a ^= b);
            self.pos += n;
            data = tail;
        }

        Ok(())
    }

    /// 原地加密, 可多次调用
    pub fn encrypt(
        &mut self,
        cipher: &dyn BlockCipherX,
        data: &mut [u8],
    ) -> Result<(), CipherError> {
        self.check_payload_size(data.len())?;
        self.apply_keystream(cipher, data)?;
        self.absorb(data);
        self.text_len += data.len() as u64;
        Ok(())
    }

    fn full_tag(&self, cipher: &dyn BlockCipherX) -> Result<[u8; 16], CipherError> {
        let mut s = self.s;
        if self.pending_len > 0 {
            let mut buf = [0u8; 16];
            buf[..self.pending_len].copy_from_slice(&self.pending[..self.pending_len]);
            s = Self::g_hash_inner(s, buf, self.h);
        }

        let mut buf = [0u8; 16];
        buf[..8].copy_from_slice(&(self.aad_len << 3).to_be_bytes());
        buf[8..].copy_from_slice(&(self.text_len << 3).to_be_bytes());
        s = Self::g_hash_inner(s, buf, self.h);

        Ok((Self::encrypt_u128(cipher, self.j0)? ^ s).to_be_bytes())
    }

    /// 结束加密, 返回截断后的认证标签
    pub fn tag(&self, cipher: &dyn BlockCipherX) -> Result<Vec<u8>, CipherError> {
        let t = self.full_tag(cipher)?;
        Ok(t[..self.tag_size].to_vec())
    }

    /// `data`为`C || T`, 校验通过后原地解密并去掉`T`; 校验失败时`data`保持不变
    pub fn decrypt_and_verify(
        &mut self,
        cipher: &dyn BlockCipherX,
        data: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        if data.len() < self.tag_size {
            return Err(CipherError::Authentication);
        }

        let ct_len = data.len() - self.tag_size;
        self.check_payload_size(ct_len)?;
        self.absorb(&data[..ct_len]);
        self.text_len += ct_len as u64;

        let t = self.full_tag(cipher)?;
        if !bool::from(t[..self.tag_size].ct_eq(&data[ct_len..])) {
            log::debug!("GCM tag mismatch");
            return Err(CipherError::Authentication);
        }

        data.truncate(ct_len);
        self.apply_keystream(cipher, data.as_mut_slice())
    }
}
