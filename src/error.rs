use thiserror::Error;

/// 草稿读写错误
#[derive(Debug, Error)]
pub enum DraftError {
    /// 草稿键名不合法
    #[error("草稿键名不合法: {key:?}（只允许字母、数字、下划线和连字符）")]
    InvalidKey { key: String },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },

    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },

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

    /// 删除文件失败
    #[error("删除文件失败 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON 解析 / 序列化失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 不支持的文件格式
    #[error("不支持的草稿文件格式: {path}")]
    UnsupportedFormat { path: String },
}

/// 草稿读写结果类型
pub type DraftResult<T> = Result<T, DraftError>;
