//! 流式加解密 <br>
//!
//! `StreamEncrypter`把写入的明文按分组切分后经工作模式加密写到`sink`, 不足一个分组的数据暂存, 在`close`时填充并输出. <br>
//! `StreamDecrypter`从`source`按需读取密文并解密; ECB/CBC的最后一个分组在`source`读完后才去填充, GCM在认证通过后才输出明文. <br>
//! 与一次性加解密相同, GCM的空输入对应空输出. <br>
//!
//! 状态: `Open -> Closing -> Closed`. 任何一次出错后, 之后的调用都返回同一个错误且不再访问`sink`/`source`.
//! 缓冲区不足(`CipherError::Buffer`)不算出错.

use crate::{
    config::{Transform, ValidConfig},
    CipherConfig, CipherError, ConfigError,
};
use std::io::{self, Read, Write};
use utils::Block;
use zeroize::Zeroizing;

/// 每次从`source`读取的最大字节数
const READ_SIZE: usize = 4096;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StreamState {
    Open,
    Closing,
    Closed,
}

fn record<T>(
    error: &mut Option<CipherError>,
    r: Result<T, CipherError>,
) -> Result<T, CipherError> {
    if let Err(e) = &r {
        if !e.is_buffer() && !matches!(e, CipherError::StreamClosed) && error.is_none() {
            log::debug!("stream failed: {e}");
            *error = Some(e.clone());
        }
    }
    r
}

pub struct StreamEncrypter<W: Write> {
    sink: W,
    config: ValidConfig,
    transform: Transform,
    carry: Block,
    // 已写入的明文字节数
    total: usize,
    state: StreamState,
    error: Option<CipherError>,
}

impl<W: Write> StreamEncrypter<W> {
    pub fn new(sink: W, config: &CipherConfig) -> Result<Self, ConfigError> {
        Self::from_valid(sink, config.validate()?)
    }

    pub fn from_valid(sink: W, config: ValidConfig) -> Result<Self, ConfigError> {
        let transform = config.transform()?;
        let carry = Block::with_capacity(config.block_size());
        Ok(Self {
            sink,
            config,
            transform,
            carry,
            total: 0,
            state: StreamState::Open,
            error: None,
        })
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    fn check(&self) -> Result<(), CipherError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None if self.state != StreamState::Open => Err(CipherError::StreamClosed),
            None => Ok(()),
        }
    }

    fn write_inner(&mut self, chunk: &[u8]) -> Result<usize, CipherError> {
        let bs = self.config.block_size();
        let mut data = chunk;
        let mut out = Zeroizing::new(Vec::with_capacity(chunk.len() + bs));
        self.total += chunk.len();

        if !self.carry.is_empty() {
            let n = self.carry.fill_to(bs, data);
            data = &data[n..];
            if self.carry.len() < bs {
                return Ok(chunk.len());
            }
            out.extend_from_slice(&self.carry);
            self.carry.clear();
        }

        let full = data.len() - data.len() % bs;
        out.extend_from_slice(&data[..full]);
        self.carry.extend(data[full..].iter());

        if !out.is_empty() {
            self.transform.encrypt(self.config.cipher(), &mut out)?;
            self.sink.write_all(&out)?;
        }

        Ok(chunk.len())
    }

    /// 返回消耗的字节数, 成功时总是`chunk.len()`
    pub fn write(&mut self, chunk: &[u8]) -> Result<usize, CipherError> {
        self.check()?;
        let r = self.write_inner(chunk);
        record(&mut self.error, r)
    }

    fn close_inner(&mut self) -> Result<(), CipherError> {
        let (bs, cipher) = (self.config.block_size(), self.config.cipher());
        let mut last = Zeroizing::new(self.carry.to_vec());
        self.carry.clear();

        match &mut self.transform {
            Transform::Mode(m) => {
                if m.mode().is_block_aligned() {
                    self.config.padding().pad(&mut last, bs)?;
                }
                m.encrypt(cipher, &mut last)?;
            }
            Transform::Gcm(_) if self.total == 0 => {}
            Transform::Gcm(g) => {
                g.encrypt(cipher, &mut last)?;
                let tag = g.tag(cipher)?;
                last.extend_from_slice(&tag);
            }
        }

        if !last.is_empty() {
            self.sink.write_all(&last)?;
        }
        self.sink.flush()?;
        Ok(())
    }

    /// 填充并输出最后的分组, 重复调用返回第一次记录的错误
    pub fn close(&mut self) -> Result<(), CipherError> {
        if self.state != StreamState::Open {
            return self.error.clone().map_or(Ok(()), Err);
        } else if let Some(e) = &self.error {
            self.state = StreamState::Closed;
            return Err(e.clone());
        }

        self.state = StreamState::Closing;
        let r = self.close_inner();
        self.state = StreamState::Closed;
        log::trace!("stream encrypter closed");
        record(&mut self.error, r)
    }

    /// 关闭并取回`sink`
    pub fn finish(mut self) -> Result<W, CipherError> {
        self.close()?;
        Ok(self.sink)
    }
}

impl<W: Write> Write for StreamEncrypter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StreamEncrypter::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check()?;
        let r = self.sink.flush().map_err(CipherError::from);
        Ok(record(&mut self.error, r)?)
    }
}

pub struct StreamDecrypter<R: Read> {
    source: R,
    config: ValidConfig,
    transform: Transform,
    // 已读入未解密的密文
    carry: Block,
    // 已解密未取走的明文
    ready: Block,
    total: usize,
    state: StreamState,
    error: Option<CipherError>,
}

impl<R: Read> StreamDecrypter<R> {
    pub fn new(source: R, config: &CipherConfig) -> Result<Self, ConfigError> {
        Self::from_valid(source, config.validate()?)
    }

    pub fn from_valid(source: R, config: ValidConfig) -> Result<Self, ConfigError> {
        let transform = config.transform()?;
        Ok(Self {
            source,
            config,
            transform,
            carry: Block::new(),
            ready: Block::new(),
            total: 0,
            state: StreamState::Open,
            error: None,
        })
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// 已从`source`读取的密文字节数
    pub fn total_read(&self) -> usize {
        self.total
    }

    /// 解密`carry`中可以确定不是最后一个分组的数据
    fn decrypt_carry(&mut self) -> Result<(), CipherError> {
        let (bs, cipher) = (self.config.block_size(), self.config.cipher());
        let Transform::Mode(m) = &mut self.transform else {
            // GCM在认证通过前不输出明文
            return Ok(());
        };

        let len = self.carry.len();
        let n = if m.mode().is_block_aligned() {
            let n = len - len % bs;
            if n == len && n > 0 && !self.config.padding().is_identity() {
                n - bs
            } else {
                n
            }
        } else {
            len
        };

        if n > 0 {
            let mut buf = Zeroizing::new(self.carry[..n].to_vec());
            m.decrypt(cipher, &mut buf)?;
            self.ready.extend(buf.iter());
            self.carry.consume(n);
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<(), CipherError> {
        let (bs, cipher) = (self.config.block_size(), self.config.cipher());
        let mut last = Zeroizing::new(self.carry.to_vec());
        self.carry.clear();

        match &mut self.transform {
            Transform::Mode(m) => {
                if m.mode().is_block_aligned() && self.total % bs != 0 {
                    return Err(CipherError::InvalidDataSize {
                        block_size: bs,
                        size: self.total,
                    });
                }
                m.decrypt(cipher, &mut last)?;
                if m.mode().is_block_aligned() && !last.is_empty() {
                    self.config.padding().unpad(&mut last, bs)?;
                }
            }
            Transform::Gcm(_) if self.total == 0 => {}
            Transform::Gcm(g) => g.decrypt_and_verify(cipher, &mut last)?,
        }

        self.ready.extend(last.iter());
        Ok(())
    }

    fn fill(&mut self) -> Result<(), CipherError> {
        let mut chunk = [0u8; READ_SIZE];
        let n = loop {
            match self.source.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if n == 0 {
            self.state = StreamState::Closing;
            self.finalize()?;
            log::trace!("stream decrypter reached end of source, {} bytes", self.total);
        } else {
            self.total += n;
            self.carry.extend(chunk[..n].iter());
            self.decrypt_carry()?;
        }

        Ok(())
    }

    // 返回(复制的字节数, 可用的字节数)
    fn read_inner(&mut self, buf: &mut [u8]) -> Result<(usize, usize), CipherError> {
        while self.ready.is_empty() {
            match self.state {
                StreamState::Open => self.fill()?,
                StreamState::Closing => {
                    self.state = StreamState::Closed;
                    return Ok((0, 0));
                }
                StreamState::Closed => return Err(CipherError::StreamClosed),
            }
        }

        let available = self.ready.len();
        let n = available.min(buf.len());
        buf[..n].copy_from_slice(&self.ready[..n]);
        self.ready.consume(n);
        Ok((n, available))
    }

    fn read_some(&mut self, buf: &mut [u8]) -> Result<(usize, usize), CipherError> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        let r = self.read_inner(buf);
        record(&mut self.error, r)
    }

    /// 返回写入`buf`的字节数, `Ok(0)`表示数据已读完. <br>
    /// `buf`小于可用的明文时, 填满`buf`并返回`CipherError::Buffer`, 剩余的明文由之后的调用返回.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, CipherError> {
        let (n, available) = self.read_some(buf)?;
        if n < available {
            Err(CipherError::Buffer {
                buffer_size: buf.len(),
                data_size: available,
            })
        } else {
            Ok(n)
        }
    }
}

impl<R: Read> Read for StreamDecrypter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        match self.read_some(buf) {
            Ok((n, _)) => Ok(n),
            Err(CipherError::StreamClosed) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
