//! 草稿处理上下文
//!
//! 封装"我正在检查哪一份草稿"这一信息

use std::fmt::Display;

/// 草稿处理上下文
#[derive(Debug, Clone)]
pub struct DraftCtx {
    /// 草稿键名 / 文件名
    pub key: String,

    /// 草稿索引（从1开始，仅用于日志显示）
    pub draft_index: usize,
}

impl DraftCtx {
    /// 创建新的草稿上下文
    pub fn new(key: impl Into<String>, draft_index: usize) -> Self {
        Self {
            key: key.into(),
            draft_index,
        }
    }
}

impl Display for DraftCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[草稿 #{} {}]", self.draft_index, self.key)
    }
}
