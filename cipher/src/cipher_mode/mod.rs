//! # Recommendation for Block Cipher Mode of Operation: Method and Techniques
//!
//! [Block Cipher Techniques](https://csrc.nist.gov/Projects/block-cipher-techniques/BCM/current-modes)<br>
//! [NIST 800-38A, Recommendation for Block Cipher Modes of operation Methods and Techniques](https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38a.pdf)<br>
//!
//! ## The Electronic Codebook Mode(ECB)
//!
//! $$
//! C_j = Encrypt(P_j), j = 1...n
//!
//! P_j = Decrypt(C_j), j = 1...n
//! $$
//!
//! 给定的密钥, 每个明文块和密文块一一对应(如果不期待使用这一特性, 不应该使用ECB模式), 加解密都可并行. <br>
//! <br>
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
//! <br>
//! ## The Cipher Feedback Mode(CFB)
//!
//! 记有初始向量IV(IV可以不保密, 但是**它必须是不可预测的(unpredictable)**.), b是分组加密函数的分组位大小, 这里只实现$s = b$的情形. <br>
//!
//! $$
//! I_1 = IV; I_j = LSB_{b-s}(I_{j-1} | C'_{j-1}, j = 2...n; O_j = Encrypt(I_j), j = 1...n; C'_j = P'_j \xor MSB_{s}(O_j), j = 1...n;
//!
//! I_1 = IV; I_j = LSB_{b-s}(I_{j-1}) | C'_{j-1}, j = 2...n; O_j = Encrypt(I_j), j = 1...n; P'_j = C'_j \xor MSB_{s}(O_j), j = 1...n;
//! $$
//!
//! 在CFB模式中, 当前加密的输入块数据是上一次的加密输出和上一次的加密输入的结合, 即当前加密输出反馈到输出结合得到下一个加密的输入. <br>
//! 每次加密依赖前一次的加密输出, 故Encrypt无法并行. Decrypt的输入是依赖前一次的输入, 当每次加密的输入$IV_j$都计算出来的前提下, Decrypt是可并行的. <br>
//! <br>
//! ## The Output Feedback Mode(OFB)
//!
//! 给定初始向量IV, **其需要是一个nonce值**. 即对于给定的密钥, 每次执行OFB模式时, $IV$都需要是独一无二的(unique), 且需要是保密的. <br>
//!
//! $$
//! I_1 = IV; I_j = O_{j-1}, j = 2...n; O_j = Encrypt(I_j), C_j = P_j \xor O_j, j = 1...n-1; C'_n = P'_n \xor MSB_u(O_n);
//!
//! I_1 = IV; I_j = O_{j-1}, j = 2...n; O_j = Encrypt(I_j), P_j = C_j \xor O_j, j = 1...n-1; P'_n = C'_n \xor MSB_u(O_n);
//! $$
//!
//! 从OFB的工作方式可以看出, 每次加解密都依赖于前一次的加解密, 因此加解密都是无法并行的. 另外, $IV$的保密性随机性需要保证,
//! 否则某个明文泄露则之后的密文都会计算出来, 从而之后的明文都会解密出来. <br>
//! <br>
//! ## The Counter Mode(CTR)
//!
//! 计数值$T_1 = IV$, 按分组宽度的大端整数加一, 溢出时回绕. 其生成的计数值$T_i$每个都需要是相异的. <br>
//!
//! $$
//! O_j = Encrypt(T_j), j = 1...n; C_j = P_j \xor O_j, j = 1...n-1; C'_n = P'_n \xor MSB_u(O_n);
//!
//! O_j = Encrypt(T_j), j = 1...n; P_j = C_j \xor O_j, j = 1...n-1; P'_n = C'_n \xor MSB_u(O_n);
//! $$
//!
//! 在CTR工作模式中, 如果每个$T_i$能提前计算出来, 那么加解密可以并行.
//! <br>
//! ## 分组对齐
//!
//! ECB/CBC每次调用的数据长度必须是分组长度的整数倍; CFB/OFB/CTR可以按任意长度分多次调用,
//! 状态中记录了当前分组已使用的密钥流位置, 多次调用的结果与一次调用相同.<br>

mod padding;
pub use padding::{pad, unpad};

mod counter;
pub use counter::Counter;

mod ecb;
pub use ecb::ECB;

mod cbc;
pub use cbc::CBC;

mod cfb;
pub use cfb::CFB;

mod ofb;
pub use ofb::OFB;

mod ctr;
pub use ctr::CTR;

use crate::{block_cipher::DynBlockCipher, builder::CipherMode, CipherError, ConfigError};

#[cfg(feature = "parallel")]
const PARALLEL_MIN_BYTES: usize = 1 << 16;

fn check_aligned(block_size: usize, len: usize) -> Result<(), CipherError> {
    if len % block_size != 0 {
        Err(CipherError::InvalidDataSize {
            block_size,
            size: len,
        })
    } else {
        Ok(())
    }
}

/// 非认证工作模式的状态, 每条消息使用一个新的实例
#[derive(Clone)]
pub enum ModeState {
    ECB(ECB),
    CBC(CBC),
    CFB(CFB),
    OFB(OFB),
    CTR(CTR),
}

impl ModeState {
    /// `iv`的长度需和分组长度相同, ECB忽略`iv`
    pub fn new(mode: CipherMode, iv: &[u8]) -> Result<Self, ConfigError> {
        let s = match mode {
            CipherMode::ECB => Self::ECB(ECB),
            CipherMode::CBC => Self::CBC(CBC::new(iv)),
            CipherMode::CFB => Self::CFB(CFB::new(iv)),
            CipherMode::OFB => Self::OFB(OFB::new(iv)),
            CipherMode::CTR => Self::CTR(CTR::new(iv)),
            CipherMode::GCM => {
                return Err(ConfigError::UnsupportedMode {
                    mode,
                    block_size: iv.len(),
                })
            }
        };

        Ok(s)
    }

    pub fn mode(&self) -> CipherMode {
        match self {
            Self::ECB(_) => CipherMode::ECB,
            Self::CBC(_) => CipherMode::CBC,
            Self::CFB(_) => CipherMode::CFB,
            Self::OFB(_) => CipherMode::OFB,
            Self::CTR(_) => CipherMode::CTR,
        }
    }

    /// 原地加密
    pub fn encrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        match self {
            Self::ECB(m) => m.encrypt(cipher, data),
            Self::CBC(m) => m.encrypt(cipher, data),
            Self::CFB(m) => m.encrypt(cipher, data),
            Self::OFB(m) => m.apply(cipher, data),
            Self::CTR(m) => m.apply(cipher, data),
        }
    }

    /// 原地解密
    pub fn decrypt(&mut self, cipher: &DynBlockCipher, data: &mut [u8]) -> Result<(), CipherError> {
        match self {
            Self::ECB(m) => m.decrypt(cipher, data),
            Self::CBC(m) => m.decrypt(cipher, data),
            Self::CFB(m) => m.decrypt(cipher, data),
            Self::OFB(m) => m.apply(cipher, data),
            Self::CTR(m) => m.apply(cipher, data),
        }
    }
}

#[cfg(test)]
pub(in crate::cipher_mode) mod tests {
    use crate::{block_cipher::BoxBlockCipher, builder::BlockCipherType};

    pub(in crate::cipher_mode) const KEYS: [&str; 3] = [
        "2b7e151628aed2a6abf7158809cf4f3c",
        "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
    ];

    pub(in crate::cipher_mode) const IV: &str = "000102030405060708090a0b0c0d0e0f";

    pub(in crate::cipher_mode) const PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710";

    /// NIST 800-38A F.*: (cipher, iv, plaintext, ciphertext)
    pub(in crate::cipher_mode) fn cases(
        iv: &str,
        ciphertexts: [&str; 3],
    ) -> Vec<(BoxBlockCipher, Vec<u8>, Vec<u8>, Vec<u8>)> {
        KEYS.into_iter()
            .zip(ciphertexts)
            .map(|(key, ct)| {
                (
                    BlockCipherType::AES
                        .block_cipher(&hex::decode(key).unwrap())
                        .unwrap(),
                    hex::decode(iv).unwrap(),
                    hex::decode(PLAINTEXT).unwrap(),
                    hex::decode(ct).unwrap(),
                )
            })
            .collect()
    }
}
