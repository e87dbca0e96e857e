use std::{
    io::{self, Read, Write},
    path::PathBuf,
};

use cipher::{
    BlockCipherType, CipherConfig, CipherError, CipherMode, PaddingMode, StreamDecrypter,
    StreamEncrypter, ValidConfig,
};
use clap::Args;

use super::{
    args::{Encoding, IOArgs},
    config::BlockmodeConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CryptoArgs {
    #[arg(short, long = "algo", value_name = "ALGORITHM")]
    #[arg(help = "AES | DES | TripleDES | Blowfish | TEA | XTEA")]
    pub algorithm: Option<BlockCipherType>,

    #[arg(short, long)]
    #[arg(help = "ECB | CBC | CFB | OFB | CTR | GCM")]
    pub mode: Option<CipherMode>,

    #[arg(short, long = "pad", value_name = "PADDING")]
    #[arg(help = "No | Empty | Zero | PKCS5 | PKCS7 | AnsiX923 | ISO97971 | ISO10126 | ISO78164 | Bit")]
    pub padding: Option<PaddingMode>,

    #[arg(short, long)]
    #[arg(help = "the key string")]
    pub key: Option<String>,

    #[arg(long)]
    #[arg(help = "the initial vector string, one block for CBC/CFB/OFB/CTR")]
    pub iv: Option<String>,

    #[arg(long)]
    #[arg(help = "the nonce string for GCM")]
    pub nonce: Option<String>,

    #[arg(long)]
    #[arg(help = "the additional authenticated data string for GCM")]
    pub aad: Option<String>,

    #[arg(long)]
    #[arg(help = "the GCM tag byte size in [12, 16]")]
    pub tag_size: Option<usize>,

    #[arg(short, long, value_enum)]
    #[arg(help = "how the key/iv/nonce/aad strings are decoded")]
    pub encoding: Option<Encoding>,

    #[arg(long, value_name = "FILE")]
    #[arg(help = "the json config file path")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub io: IOArgs,
}

impl CryptoArgs {
    /// 命令行参数覆盖`settings`
    pub fn cipher_config(&self, settings: &BlockmodeConfig) -> anyhow::Result<ValidConfig> {
        let encoding = self.encoding.unwrap_or(settings.encoding);
        let mut c = CipherConfig::new(
            self.algorithm.unwrap_or(settings.algorithm),
            self.mode.unwrap_or(settings.mode),
            self.padding.unwrap_or(settings.padding),
        )
        .tag_size(self.tag_size.unwrap_or(settings.tag_size));

        if let Some(k) = self.key.as_deref() {
            c = c.key(encoding.decode(k, "key")?);
        }
        if let Some(iv) = self.iv.as_deref() {
            c = c.iv(encoding.decode(iv, "iv")?);
        }
        if let Some(n) = self.nonce.as_deref() {
            c = c.nonce(encoding.decode(n, "nonce")?);
        }
        if let Some(a) = self.aad.as_deref() {
            c = c.aad(encoding.decode(a, "aad")?);
        }

        Ok(c.validate()?)
    }

    pub fn exe(&self, direction: Direction) -> anyhow::Result<()> {
        let settings = BlockmodeConfig::config_with_file(self.config.as_deref())?;
        let config = self.cipher_config(settings)?;
        log::debug!("{:?} with {:?}", direction, config);

        let reader = self.io.reader(settings.io_buf_size)?;
        let writer = self.io.writer(settings.io_buf_size)?;
        let (n, m) = transform(config, direction, reader, writer)?;

        log::info!(
            "{} {} bytes into {} bytes",
            match direction {
                Direction::Encrypt => "encrypted",
                Direction::Decrypt => "decrypted",
            },
            n,
            m
        );
        Ok(())
    }
}

struct Counted<W> {
    inner: W,
    n: u64,
}

impl<W: Write> Write for Counted<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.n += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// 返回(读入的字节数, 写出的字节数)
pub fn transform<R: Read, W: Write>(
    config: ValidConfig,
    direction: Direction,
    mut reader: R,
    writer: W,
) -> Result<(u64, u64), CipherError> {
    let mut writer = Counted { inner: writer, n: 0 };

    let n = match direction {
        Direction::Encrypt => {
            let mut enc = StreamEncrypter::from_valid(&mut writer, config)?;
            let n = io::copy(&mut reader, &mut enc)?;
            enc.finish()?;
            n
        }
        Direction::Decrypt => {
            let mut dec = StreamDecrypter::from_valid(&mut reader, config)?;
            io::copy(&mut dec, &mut writer)?;
            writer.flush()?;
            dec.total_read() as u64
        }
    };

    Ok((n, writer.n))
}
