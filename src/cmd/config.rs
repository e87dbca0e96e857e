use std::{path::Path, sync::OnceLock};

use cipher::{ae::DEFAULT_TAG_SIZE, BlockCipherType, CipherMode, PaddingMode};
use config::Config;
use serde::{Deserialize, Serialize};

use super::args::Encoding;
use crate::error::CliError;

const ENV_PREFIX: &str = "BLOCKMODE";

/// 命令行未指定时使用的参数 <br>
///
/// 优先级从低到高: 默认值, 配置文件(json), 环境变量(`BLOCKMODE__MODE=CTR`), 命令行参数.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct BlockmodeConfig {
    pub algorithm: BlockCipherType,

    pub mode: CipherMode,

    pub padding: PaddingMode,

    pub encoding: Encoding,

    // GCM认证标签字节长度
    pub tag_size: usize,

    // byte size
    pub io_buf_size: usize,
}

impl Default for BlockmodeConfig {
    fn default() -> Self {
        Self {
            algorithm: BlockCipherType::AES,
            mode: CipherMode::CBC,
            padding: PaddingMode::PKCS7,
            encoding: Encoding::Utf8,
            tag_size: DEFAULT_TAG_SIZE,
            io_buf_size: 8 * 1024,
        }
    }
}

impl BlockmodeConfig {
    fn load_with(f: Option<&Path>, env_prefix: &str) -> Result<Self, CliError> {
        let default_config = Config::try_from(&BlockmodeConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(false));
        }
        config = config.add_source(
            config::Environment::with_prefix(env_prefix)
                .try_parsing(true)
                .separator("__"),
        );

        let mut c: BlockmodeConfig = config.build()?.try_deserialize()?;
        c.io_buf_size = c.io_buf_size.max(512);

        log::trace!("{:?}", c);
        Ok(c)
    }

    pub fn load(f: Option<&Path>) -> Result<Self, CliError> {
        Self::load_with(f, ENV_PREFIX)
    }

    /// 进程内只加载一次, 之后的调用忽略`f`
    pub fn config_with_file(f: Option<&Path>) -> Result<&'static Self, CliError> {
        static CONFIG: OnceLock<BlockmodeConfig> = OnceLock::new();

        if let Some(c) = CONFIG.get() {
            return Ok(c);
        }
        let c = Self::load(f)?;
        Ok(CONFIG.get_or_init(|| c))
    }
}

#[cfg(test)]
mod tests {
    use super::BlockmodeConfig;
    use crate::cmd::args::Encoding;
    use cipher::{BlockCipherType, CipherMode, PaddingMode};

    #[test]
    fn defaults() {
        let c = BlockmodeConfig::load_with(None, "BLOCKMODE_TEST_DEFAULTS").unwrap();
        assert_eq!(c, BlockmodeConfig::default());
    }

    #[test]
    fn file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("blockmode.json");
        std::fs::write(
            &p,
            r#"{"algorithm": "Blowfish", "mode": "CTR", "padding": "No", "encoding": "hex", "io_buf_size": 100}"#,
        )
        .unwrap();

        let c = BlockmodeConfig::load_with(Some(&p), "BLOCKMODE_TEST_FILE").unwrap();
        assert_eq!(c.algorithm, BlockCipherType::Blowfish);
        assert_eq!(c.mode, CipherMode::CTR);
        assert_eq!(c.padding, PaddingMode::No);
        assert_eq!(c.encoding, Encoding::Hex);
        assert_eq!(c.tag_size, 16);
        assert_eq!(c.io_buf_size, 512);

        std::env::set_var("BLOCKMODE_TEST_ENV__MODE", "OFB");
        std::env::set_var("BLOCKMODE_TEST_ENV__TAG_SIZE", "12");
        let c = BlockmodeConfig::load_with(Some(&p), "BLOCKMODE_TEST_ENV").unwrap();
        assert_eq!(c.mode, CipherMode::OFB);
        assert_eq!(c.tag_size, 12);
        assert_eq!(c.algorithm, BlockCipherType::Blowfish);
    }

    #[test]
    fn missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let c = BlockmodeConfig::load_with(
            Some(&dir.path().join("none.json")),
            "BLOCKMODE_TEST_MISSING",
        )
        .unwrap();
        assert_eq!(c.mode, CipherMode::CBC);
    }
}
