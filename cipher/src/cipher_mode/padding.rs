//! 填充方案<br>
//!
//! 记需要填充的字节数为$N = bs - (len \bmod bs) \in [1, bs]$:<br>
//! - `No`: 不填充, 数据长度必须是分组长度的整数倍;<br>
//! - `Empty`: 不填充, 也不检查长度, 交由工作模式处理;<br>
//! - `Zero`: 填充$N$个`0x00`, 去填充时去掉最后一个分组末尾的`0x00`(明文以`0x00`结尾时有歧义);<br>
//! - `PKCS5`/`PKCS7`: 填充$N$个值为$N$的字节;<br>
//! - `AnsiX923`: 填充$N-1$个`0x00`, 最后一个字节为$N$;<br>
//! - `ISO10126`: 填充$N-1$个随机字节, 最后一个字节为$N$;<br>
//! - `ISO97971`/`ISO78164`/`Bit`: 填充`0x80`, 再补充$N-1$个`0x00`.<br>
//!
//! 除`No`/`Empty`外, 空数据填充为一个完整分组.<br>

use crate::{builder::PaddingMode, PaddingError};
use rand::{rngs::OsRng, RngCore};

impl PaddingMode {
    fn check_block_size(&self, block_size: usize) -> Result<(), PaddingError> {
        let valid = match self {
            Self::No | Self::Empty => block_size != 0,
            _ => (1..=255).contains(&block_size),
        };

        if valid {
            Ok(())
        } else {
            Err(PaddingError::InvalidBlockSize(block_size))
        }
    }

    /// 在`buf`后追加填充字节
    pub fn pad(&self, buf: &mut Vec<u8>, block_size: usize) -> Result<(), PaddingError> {
        self.check_block_size(block_size)?;

        let n = block_size - (buf.len() % block_size);
        match self {
            Self::No => {
                if n != block_size {
                    return Err(PaddingError::InvalidDataSize {
                        block_size,
                        size: buf.len(),
                    });
                }
            }
            Self::Empty => {}
            Self::Zero => buf.resize(buf.len() + n, 0),
            Self::PKCS5 | Self::PKCS7 => buf.resize(buf.len() + n, n as u8),
            Self::AnsiX923 => {
                buf.resize(buf.len() + n - 1, 0);
                buf.push(n as u8);
            }
            Self::ISO10126 => {
                let len = buf.len();
                buf.resize(len + n - 1, 0);
                OsRng.fill_bytes(&mut buf[len..]);
                buf.push(n as u8);
            }
            Self::ISO97971 | Self::ISO78164 | Self::Bit => {
                buf.push(0x80);
                buf.resize(buf.len() + n - 1, 0);
            }
        }

        Ok(())
    }

    /// 从`buf`尾部去掉填充字节, `buf`是解密后的全部数据或至少包含最后一个分组
    pub fn unpad(&self, buf: &mut Vec<u8>, block_size: usize) -> Result<(), PaddingError> {
        self.check_block_size(block_size)?;

        if self.is_identity() {
            return Ok(());
        }

        let len = buf.len();
        if len < block_size || len % block_size != 0 {
            return Err(PaddingError::InvalidDataSize {
                block_size,
                size: len,
            });
        }

        let last = &buf[(len - block_size)..];
        let n = match self {
            Self::No | Self::Empty => 0,
            Self::Zero => last.iter().rev().take_while(|&&x| x == 0).count(),
            Self::PKCS5 | Self::PKCS7 => {
                let n = last[block_size - 1] as usize;
                // 不提前退出
                let diff = last.iter().rev().enumerate().fold(0u8, |acc, (i, &x)| {
                    acc | (x ^ (n as u8)) & (((i < n) as u8).wrapping_neg())
                });
                if n == 0 || n > block_size || diff != 0 {
                    return Err(PaddingError::InvalidPadding(*self));
                }
                n
            }
            Self::AnsiX923 => {
                let n = last[block_size - 1] as usize;
                if n == 0 || n > block_size {
                    return Err(PaddingError::InvalidPadding(*self));
                }
                let diff = last[(block_size - n)..(block_size - 1)]
                    .iter()
                    .fold(0u8, |acc, &x| acc | x);
                if diff != 0 {
                    return Err(PaddingError::InvalidPadding(*self));
                }
                n
            }
            Self::ISO10126 => {
                let n = last[block_size - 1] as usize;
                if n == 0 || n > block_size {
                    return Err(PaddingError::InvalidPadding(*self));
                }
                n
            }
            Self::ISO97971 | Self::ISO78164 | Self::Bit => {
                let zeros = last.iter().rev().take_while(|&&x| x == 0).count();
                if zeros == block_size || last[block_size - 1 - zeros] != 0x80 {
                    return Err(PaddingError::InvalidPadding(*self));
                }
                zeros + 1
            }
        };

        buf.truncate(len - n);
        Ok(())
    }
}

/// 返回填充后的数据
pub fn pad(padding: PaddingMode, data: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
    let mut buf = Vec::with_capacity(data.len() + block_size);
    buf.extend_from_slice(data);
    padding.pad(&mut buf, block_size)?;
    Ok(buf)
}

/// 返回去掉填充后的数据
pub fn unpad(padding: PaddingMode, data: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
    let mut buf = data.to_vec();
    padding.unpad(&mut buf, block_size)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::{pad, unpad};
    use crate::{builder::PaddingMode, PaddingError};
    use proptest::prelude::*;

    #[test]
    fn pad_layout() {
        let cases = [
            (PaddingMode::Zero, "616263", "6162630000000000"),
            (PaddingMode::PKCS7, "616263", "6162630505050505"),
            (PaddingMode::PKCS5, "", "0808080808080808"),
            (PaddingMode::PKCS7, "0102030405060708", "01020304050607080808080808080808"),
            (PaddingMode::AnsiX923, "616263", "6162630000000005"),
            (PaddingMode::ISO97971, "616263", "6162638000000000"),
            (PaddingMode::ISO78164, "61626364656667", "6162636465666780"),
            (PaddingMode::Bit, "", "8000000000000000"),
            (PaddingMode::Empty, "616263", "616263"),
            (PaddingMode::Empty, "", ""),
            (PaddingMode::No, "0102030405060708", "0102030405060708"),
        ];

        for (i, (p, data, tgt)) in cases.into_iter().enumerate() {
            let data = hex::decode(data).unwrap();
            let padded = pad(p, &data, 8).unwrap();
            assert_eq!(hex::encode(&padded), tgt, "case {i} {p} pad failed");
            assert_eq!(unpad(p, &padded, 8).unwrap(), data, "case {i} {p} unpad failed");
        }
    }

    #[test]
    fn iso10126_random_filler() {
        let padded = pad(PaddingMode::ISO10126, b"abc", 16).unwrap();
        assert_eq!(padded.len(), 16);
        assert_eq!(padded[15], 13);
        assert_eq!(unpad(PaddingMode::ISO10126, &padded, 16).unwrap(), b"abc");
    }

    #[test]
    fn zero_padding_ambiguity() {
        let padded = pad(PaddingMode::Zero, b"ab\0", 4).unwrap();
        assert_eq!(padded, b"ab\0\0");
        assert_eq!(unpad(PaddingMode::Zero, &padded, 4).unwrap(), b"ab");

        // 只去掉最后一个分组中的0x00
        let data = [1u8, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(unpad(PaddingMode::Zero, &data, 4).unwrap(), vec![1, 0, 0, 0]);
        let data = [1u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(unpad(PaddingMode::Zero, &data, 4).unwrap(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn invalid_padding() {
        let cases = [
            (PaddingMode::PKCS7, "6162630505050405"),
            (PaddingMode::PKCS7, "6162636465666700"),
            (PaddingMode::PKCS7, "6162636465666709"),
            (PaddingMode::AnsiX923, "6162630001000005"),
            (PaddingMode::AnsiX923, "6162630000000000"),
            (PaddingMode::ISO10126, "6162630000000011"),
            (PaddingMode::ISO97971, "6162630000000000"),
            (PaddingMode::Bit, "6162630100000000"),
        ];

        for (i, (p, data)) in cases.into_iter().enumerate() {
            let data = hex::decode(data).unwrap();
            assert_eq!(
                unpad(p, &data, 8),
                Err(PaddingError::InvalidPadding(p)),
                "case {i} {p} failed"
            );
        }
    }

    #[test]
    fn invalid_size() {
        assert_eq!(
            pad(PaddingMode::No, b"abc", 8),
            Err(PaddingError::InvalidDataSize { block_size: 8, size: 3 })
        );
        assert_eq!(
            unpad(PaddingMode::PKCS7, b"abc", 8),
            Err(PaddingError::InvalidDataSize { block_size: 8, size: 3 })
        );
        assert_eq!(
            unpad(PaddingMode::PKCS7, b"", 8),
            Err(PaddingError::InvalidDataSize { block_size: 8, size: 0 })
        );
        assert_eq!(pad(PaddingMode::PKCS7, b"", 256), Err(PaddingError::InvalidBlockSize(256)));
        assert_eq!(pad(PaddingMode::Zero, b"", 0), Err(PaddingError::InvalidBlockSize(0)));
        assert_eq!(pad(PaddingMode::Empty, b"", 300).unwrap(), Vec::<u8>::new());
    }

    proptest! {
        #[test]
        fn unpad_inverts_pad(
            data in proptest::collection::vec(any::<u8>(), 0..80),
            bs in prop::sample::select(vec![1usize, 8, 16, 255]),
            idx in 0usize..PaddingMode::all().len(),
        ) {
            let p = PaddingMode::all()[idx];
            prop_assume!(p != PaddingMode::No || data.len() % bs == 0);
            prop_assume!(p != PaddingMode::Zero || data.last() != Some(&0));

            let padded = pad(p, &data, bs).unwrap();
            if !p.is_identity() {
                prop_assert!(padded.len() > data.len());
                prop_assert_eq!(padded.len() % bs, 0);
            }
            prop_assert_eq!(unpad(p, &padded, bs).unwrap(), data);
        }
    }
}
