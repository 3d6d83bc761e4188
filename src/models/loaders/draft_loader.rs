use crate::error::{DraftError, DraftResult};
use crate::models::draft::FullTestDraft;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从文件中读出的草稿
#[derive(Debug, Clone)]
pub struct DraftFile {
    pub path: PathBuf,
    pub draft: FullTestDraft,
}

impl DraftFile {
    /// 文件名（不含扩展名），用于日志和报告
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// 草稿文件支持的扩展名
pub fn is_draft_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("json") | Some("toml")
    )
}

/// 按内容格式解析草稿
pub fn parse_draft(content: &str, path: &Path) -> DraftResult<FullTestDraft> {
    let path_str = path.display().to_string();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|source| DraftError::JsonFailed {
            path: path_str,
            source,
        }),
        Some("toml") => toml::from_str(content).map_err(|source| DraftError::TomlParseFailed {
            path: path_str,
            source,
        }),
        _ => Err(DraftError::UnsupportedFormat { path: path_str }),
    }
}

/// 从 JSON / TOML 文件加载草稿
pub async fn load_draft_file(path: &Path) -> DraftResult<DraftFile> {
    let path_str = path.display().to_string();
    if !is_draft_file(path) {
        return Err(DraftError::UnsupportedFormat { path: path_str });
    }

    let content = fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DraftError::NotFound {
                path: path_str.clone(),
            }
        } else {
            DraftError::ReadFailed {
                path: path_str.clone(),
                source,
            }
        }
    })?;

    let draft = parse_draft(&content, path)?;
    let unknown = draft.unknown_labels();
    if !unknown.is_empty() {
        tracing::warn!("{} 中有无法识别的部分，已忽略: {:?}", path_str, unknown);
    }
    let shadowed = draft.shadowed_labels();
    if !shadowed.is_empty() {
        tracing::warn!("{} 中有重复的部分键名，已忽略: {:?}", path_str, shadowed);
    }

    Ok(DraftFile {
        path: path.to_path_buf(),
        draft,
    })
}

/// 加载失败的草稿文件
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// 一个文件夹的加载结果
#[derive(Debug, Default)]
pub struct LoadedDrafts {
    /// 成功加载的草稿
    pub files: Vec<DraftFile>,
    /// 读取或解析失败的文件，计入失败数，不能当作合格
    pub failures: Vec<LoadFailure>,
}

impl LoadedDrafts {
    pub fn total(&self) -> usize {
        self.files.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 从文件夹中加载所有草稿文件（按文件名排序）
///
/// 单个文件失败不影响其他文件，失败的文件记在 `failures` 中
pub async fn load_all_draft_files(folder_path: &str) -> Result<LoadedDrafts> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(DraftError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_draft_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = LoadedDrafts::default();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_draft_file(&path).await {
            Ok(file) => {
                tracing::info!(
                    "成功加载 {} 个题组，{} 道题目",
                    file.draft.group_count(),
                    file.draft.question_count()
                );
                loaded.files.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                loaded.failures.push(LoadFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}
