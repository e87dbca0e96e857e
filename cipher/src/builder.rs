use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("`{value}` is no valid `{kind}` value")]
pub struct UnknownTypeError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_cipher_type {
    ($NAME: ident, $REPR: ty, $([$ITEM: ident $(=$VAL: literal)?]),+) => {
        #[repr($REPR)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
        pub enum $NAME {
            $($ITEM $(=$VAL)?,)+
        }

        impl $NAME {
            pub const fn all() -> &'static [Self] {
                &[$(Self::$ITEM),+]
            }

            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$ITEM => stringify!($ITEM),)+
                }
            }
        }

        impl TryFrom<$REPR> for $NAME {
            type Error = UnknownTypeError;

            fn try_from(value: $REPR) -> Result<Self, Self::Error> {
                match value {
                    $(x if x == Self::$ITEM as $REPR => Ok(Self::$ITEM),)+
                    _ => Err(UnknownTypeError {
                        kind: stringify!($NAME),
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl FromStr for $NAME {
            type Err = UnknownTypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::all()
                    .iter()
                    .find(|x| x.name().eq_ignore_ascii_case(s))
                    .copied()
                    .ok_or_else(|| UnknownTypeError {
                        kind: stringify!($NAME),
                        value: s.to_string(),
                    })
            }
        }

        impl Display for $NAME {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

impl_cipher_type!(
    BlockCipherType,
    u16,
    [AES = 0x1],
    [DES],
    [TripleDES],
    [Blowfish],
    [TEA],
    [XTEA]
);

impl_cipher_type!(
    PaddingMode,
    u8,
    [No],
    [Empty],
    [Zero],
    [PKCS5],
    [PKCS7],
    [AnsiX923],
    [ISO97971],
    [ISO10126],
    [ISO78164],
    [Bit]
);

impl_cipher_type!(CipherMode, u16, [ECB = 0x1], [CBC], [CFB], [OFB], [CTR], [GCM]);

impl CipherMode {
    /// 是否需要对输入做分组对齐
    pub const fn is_block_aligned(&self) -> bool {
        matches!(self, Self::ECB | Self::CBC)
    }

    pub const fn requires_iv(&self) -> bool {
        matches!(self, Self::CBC | Self::CFB | Self::OFB | Self::CTR)
    }
}

impl PaddingMode {
    /// `No`和`Empty`不会改变数据长度
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::No | Self::Empty)
    }
}
