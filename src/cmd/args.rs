use std::{
    fs::{File, OpenOptions},
    io::{self, BufReader, BufWriter, Read, Write},
    path::PathBuf,
};

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::CliError;

/// 命令行中key/iv/nonce/aad字符串的编码方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    #[value(help = "use the utf-8 bytes of the string")]
    Utf8,
    #[value(help = "decode the string as hex")]
    Hex,
}

impl Encoding {
    pub fn decode(&self, s: &str, field: &'static str) -> Result<Zeroizing<Vec<u8>>, CliError> {
        match self {
            Self::Utf8 => Ok(Zeroizing::new(s.as_bytes().to_vec())),
            Self::Hex => hex::decode(s.trim())
                .map(Zeroizing::new)
                .map_err(|source| CliError::InvalidHex { field, source }),
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct IOArgs {
    #[arg(short, long = "input", value_name = "FILE")]
    #[arg(help = "the input file path, read from stdin if not specified")]
    pub ifile: Option<PathBuf>,

    #[arg(short, long = "output", value_name = "FILE")]
    #[arg(help = "the output file path, write to stdout if not specified")]
    pub ofile: Option<PathBuf>,
}

impl IOArgs {
    fn check(&self) -> Result<(), CliError> {
        if let Some(i) = self.ifile.as_deref() {
            if !i.is_file() {
                return Err(CliError::PathNotExist(i.to_path_buf()));
            }

            if let Some(o) = self.ofile.as_deref() {
                if o.exists() && i.canonicalize().ok() == o.canonicalize().ok() {
                    return Err(CliError::SameFile(o.to_path_buf()));
                }
            }
        }

        Ok(())
    }

    pub fn reader(&self, buf_size: usize) -> anyhow::Result<Box<dyn Read>> {
        self.check()?;
        Ok(match self.ifile.as_deref() {
            Some(p) => Box::new(BufReader::with_capacity(buf_size, File::open(p)?)),
            None => Box::new(BufReader::with_capacity(buf_size, io::stdin())),
        })
    }

    pub fn writer(&self, buf_size: usize) -> anyhow::Result<Box<dyn Write>> {
        self.check()?;
        Ok(match self.ofile.as_deref() {
            Some(p) => {
                let f = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(p)?;
                Box::new(BufWriter::with_capacity(buf_size, f))
            }
            None => Box::new(BufWriter::with_capacity(buf_size, io::stdout())),
        })
    }
}
