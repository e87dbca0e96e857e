#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// CTR模式使用的计数器 <br>
///
/// 计数值是分组宽度的大端整数, 每个分组加一, 溢出时按$2^{8 \cdot bs}$取模回绕.
/// 调用者需保证同一密钥下各次加密的计数值互不重叠.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct Counter {
    value: Vec<u8>,
}

impl Counter {
    pub fn new(iv: &[u8]) -> Self {
        Self { value: iv.to_vec() }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.value.as_slice()
    }

    pub fn increment(&mut self) {
        for x in self.value.iter_mut().rev() {
            let (v, carry) = x.overflowing_add(1);
            *x = v;
            if !carry {
                break;
            }
        }
    }

    /// 计数值加`n`
    pub fn add(&mut self, n: u64) {
        let mut carry = n as u128;
        for x in self.value.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let v = *x as u128 + (carry & 0xff);
            *x = v as u8;
            carry = (carry >> 8) + (v >> 8);
        }
    }

    /// 返回第`n`个之后的计数值, 不改变自身
    pub fn nth(&self, n: u64) -> Self {
        let mut c = self.clone();
        c.add(n);
        c
    }
}
