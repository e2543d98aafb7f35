use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 本地校验错误（不会发起网络请求）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 是否为请求超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Api(ApiError::Timeout { .. }))
    }
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 请求超时
    #[error("API请求超时 ({endpoint}), 超过 {timeout_secs} 秒")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 基础URL无法拼接路径
    #[error("无效的API地址: {url}")]
    InvalidUrl { url: String },
}

/// 本地校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 没有选择问题或酒店
    #[error("请至少选择一个问题和一个酒店")]
    EmptySelection,
    /// 未知的聊天机器人
    #[error("未知的聊天机器人: {id}")]
    UnknownChatbot { id: String },
    /// 未知的问题
    #[error("问题不存在: {text}")]
    UnknownQuestion { text: String },
    /// 未知的酒店
    #[error("酒店不存在: {name}")]
    UnknownHotel { name: String },
    /// 批次大小为 0
    #[error("批次大小必须大于 0")]
    InvalidBatchSize,
    /// 必填字段为空
    #[error("{field} 不能为空")]
    MissingField { field: &'static str },
    /// 酒店配置不是合法 JSON
    #[error("无效的 JSON 配置: {source}")]
    InvalidPayload {
        #[source]
        source: serde_json::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 文件解析失败
    #[error("JSON文件解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 配置项取值非法
    #[error("配置项 {key} 非法: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 从 reqwest 错误构造，超时单独归类
    pub fn from_reqwest(endpoint: impl Into<String>, timeout_secs: u64, err: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if err.is_timeout() {
            ApiError::Timeout {
                endpoint,
                timeout_secs,
            }
        } else {
            ApiError::RequestFailed {
                endpoint,
                source: err,
            }
        }
    }
}

impl FileError {
    pub fn read(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn write(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
