//! 草稿存储服务 - 业务能力层
//!
//! 向导每填完一步就把草稿写一份到本地，崩溃或刷新后可以恢复。
//! 按字符串键存取，每个键对应目录下的一个 `<key>.json` 文件。

use crate::error::{DraftError, DraftResult};
use crate::models::draft::FullTestDraft;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 草稿存储
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    /// 使用指定目录创建存储（目录在第一次写入时创建）
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 存储目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 保存草稿，已存在则覆盖
    ///
    /// 先写临时文件再改名，避免写到一半留下损坏的草稿
    pub async fn save(&self, key: &str, draft: &FullTestDraft) -> DraftResult<()> {
        let path = self.path_for(key)?;
        let display = path.display().to_string();

        let content = serde_json::to_string_pretty(draft).map_err(|source| DraftError::JsonFailed {
            path: display.clone(),
            source,
        })?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DraftError::WriteFailed {
                path: self.dir.display().to_string(),
                source,
            })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .map_err(|source| DraftError::WriteFailed {
                path: tmp_path.display().to_string(),
                source,
            })?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| DraftError::WriteFailed {
                path: display.clone(),
                source,
            })?;

        debug!("草稿已保存: {} ({} 个题组)", key, draft.group_count());
        Ok(())
    }

    /// 读取草稿，不存在时返回 `None`
    ///
    /// 文件损坏时返回错误，不会当作空草稿
    pub async fn load(&self, key: &str) -> DraftResult<Option<FullTestDraft>> {
        let path = self.path_for(key)?;
        let display = path.display().to_string();

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DraftError::ReadFailed {
                    path: display,
                    source,
                })
            }
        };

        let draft = serde_json::from_str(&content).map_err(|source| DraftError::JsonFailed {
            path: display,
            source,
        })?;
        Ok(Some(draft))
    }

    /// 删除草稿，返回是否确实删除了文件
    pub async fn remove(&self, key: &str) -> DraftResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("草稿已删除: {}", key);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(DraftError::DeleteFailed {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// 所有已保存草稿的键（排序后）
    pub async fn keys(&self) -> DraftResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(DraftError::ReadFailed {
                    path: self.dir.display().to_string(),
                    source,
                })
            }
        };

        let mut keys = Vec::new();
        loop {
            let entry = entries
                .next_entry()
                .await
                .map_err(|source| DraftError::ReadFailed {
                    path: self.dir.display().to_string(),
                    source,
                })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_key(stem) {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn path_for(&self, key: &str) -> DraftResult<PathBuf> {
        if !is_valid_key(key) {
            return Err(DraftError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// 键名只允许字母、数字、下划线和连字符
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
