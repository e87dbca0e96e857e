use clap::{Parser, Subcommand};

pub mod args;
pub mod config;

mod crypto;
pub use crypto::{transform, CryptoArgs, Direction};

#[derive(Parser, Debug)]
#[command(name = "blockmode", version = env!("BLOCKMODE_VERSION_INFO"))]
#[command(about = "block cipher modes of operation over files and pipes")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: SubCmd,
}

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    #[command(about = "encrypt the input(stdin | file)")]
    Enc(CryptoArgs),
    #[command(about = "decrypt the input(stdin | file)")]
    Dec(CryptoArgs),
}

impl SubCmd {
    pub fn exe(&self) -> anyhow::Result<()> {
        match self {
            Self::Enc(a) => a.exe(Direction::Encrypt),
            Self::Dec(a) => a.exe(Direction::Decrypt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, SubCmd};
    use crate::cmd::args::Encoding;
    use cipher::{BlockCipherType, CipherMode, PaddingMode};
    use clap::Parser;

    #[test]
    fn parse() {
        let cli = Cli::try_parse_from([
            "blockmode", "enc", "-a", "blowfish", "-m", "ctr", "-p", "no", "-k", "k3y!", "--iv",
            "0001020304050607", "-e", "hex", "-i", "in.txt",
        ])
        .unwrap();

        let SubCmd::Enc(a) = cli.cmd else {
            panic!("expect enc");
        };
        assert_eq!(a.algorithm, Some(BlockCipherType::Blowfish));
        assert_eq!(a.mode, Some(CipherMode::CTR));
        assert_eq!(a.padding, Some(PaddingMode::No));
        assert_eq!(a.encoding, Some(Encoding::Hex));
        assert_eq!(a.key.as_deref(), Some("k3y!"));
        assert!(a.io.ofile.is_none());

        assert!(Cli::try_parse_from(["blockmode", "dec", "-m", "xts"]).is_err());
    }
}
