use std::io::{Read, Result};

/// 每次最多读出`chunk`个字节的`Read`, 用于模拟分片到达的输入
#[derive(Clone, Debug)]
pub struct ChunkedRead<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedRead<'a> {
    /// `chunk`为0时按1处理
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk: chunk.max(1),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl<'a> Read for ChunkedRead<'a> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkedRead;
    use std::io::Read;

    #[test]
    fn reads_in_chunks() {
        let data = (0u8..10).collect::<Vec<_>>();
        let mut r = ChunkedRead::new(&data, 3);
        let mut buf = [0u8; 8];

        assert_eq!(r.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[0, 1, 2]);
        assert_eq!(r.read(&mut buf[..2]).unwrap(), 2);
        assert_eq!(r.remaining(), 5);

        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![5, 6, 7, 8, 9]);
        assert_eq!(r.read(&mut buf).unwrap(), 0);
    }
}
