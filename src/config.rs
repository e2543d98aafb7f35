use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 默认每批组合数量
pub const DEFAULT_BATCH_SIZE: usize = 80;
/// 默认单批超时（30 分钟）
pub const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 30 * 60;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_base_url: String,
    /// 每批发送的组合数量
    pub batch_size: usize,
    /// 单批 /ask 请求的超时（秒）
    pub batch_timeout_secs: u64,
    /// 管理类请求的超时（秒）
    pub request_timeout_secs: u64,
    /// 结果与报表输出目录
    pub output_dir: String,
    /// 对话记录文件
    pub transcript_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout_secs: DEFAULT_BATCH_TIMEOUT_SECS,
            request_timeout_secs: 30,
            output_dir: "output".to_string(),
            transcript_file: "transcript.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的项使用默认值
    pub fn from_env() -> AppResult<Self> {
        Self::default().merge_env()
    }

    /// 从 TOML 文件加载，文件中未出现的项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FileError::read(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置
    pub fn merge_env(self) -> AppResult<Self> {
        let config = Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            batch_size: env_parse("BATCH_SIZE", "usize")?.unwrap_or(self.batch_size),
            batch_timeout_secs: env_parse("BATCH_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.batch_timeout_secs),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            transcript_file: std::env::var("TRANSCRIPT_FILE").unwrap_or(self.transcript_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值
    pub fn validate(&self) -> AppResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch_size",
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        if self.batch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch_timeout_secs",
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &'static str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigError::EnvVarParseFailed {
                    var_name: var_name.to_string(),
                    value,
                    expected_type,
                }
                .into()
            }),
        Err(_) => Ok(None),
    }
}
