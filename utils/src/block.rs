use std::ops::{Deref, DerefMut};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// 字节缓冲区, 用于暂存不足一个分组的数据 <br>
///
/// 开启`sec-zeroize`特性时, `clear`/`consume`会先清零被移除的字节; 开启`sec-zeroize-drop`特性时, 析构时清零.
#[derive(Default, Clone, Debug)]
pub struct Block {
    data: Vec<u8>,
}

impl Block {
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        #[cfg(feature = "sec-zeroize")]
        self.data.as_mut_slice().zeroize();
        self.data.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 从`data`中补齐到`size`字节, 返回消耗的字节数
    pub fn fill_to(&mut self, size: usize, data: &[u8]) -> usize {
        let n = size.saturating_sub(self.data.len()).min(data.len());
        self.data.extend_from_slice(&data[..n]);
        n
    }

    /// 移除头部`n`个字节
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.data.len());
        #[cfg(feature = "sec-zeroize")]
        self.data[..n].zeroize();
        self.data.drain(..n);
    }
}

impl Deref for Block {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data.as_slice()
    }
}

impl DerefMut for Block {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.data.as_mut_slice()
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

#[cfg(feature = "sec-zeroize-drop")]
impl Drop for Block {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<A> Extend<A> for Block
where
    Vec<u8>: Extend<A>,
{
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        self.data.extend(iter)
    }
}

/// `dst[i] ^= src[i]`, 按较短者的长度
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    dst.iter_mut().zip(src.iter()).for_each(|(a, &b)| *a ^= b);
}

#[cfg(test)]
mod tests {
    use super::{xor_in_place, Block};

    #[test]
    fn fill_and_consume() {
        let mut b = Block::with_capacity(8);
        assert_eq!(b.fill_to(8, b"abc"), 3);
        assert_eq!(b.fill_to(8, b"defghijk"), 5);
        assert_eq!(b.as_slice(), b"abcdefgh");
        assert_eq!(b.fill_to(8, b"z"), 0);

        b.consume(3);
        assert_eq!(b.as_slice(), b"defgh");
        b.consume(100);
        assert!(b.is_empty());
    }

    #[test]
    fn xor_shorter_wins() {
        let mut d = [0xffu8, 0x0f, 0x00];
        xor_in_place(&mut d, &[0x0f, 0x0f]);
        assert_eq!(d, [0xf0, 0x00, 0x00]);
    }
}
