use crate::models::history::ImageAttachment;
use crate::models::submission::Submission;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 Submission 对象
pub async fn load_toml_to_submission(toml_file_path: &Path) -> Result<Submission> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut submission: Submission = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    submission.file_path = Some(toml_file_path.to_string_lossy().to_string());

    // 名称缺省时用文件名填充
    if submission.name.is_empty() {
        submission.name = toml_file_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
    }

    Ok(submission)
}

/// 从文件夹中加载所有 TOML 文件并转换为 Submission 对象列表
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<Submission>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut submissions = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_submission(&path).await {
                Ok(submission) => {
                    submissions.push(submission);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    // 按文件名排序，保证处理顺序稳定
    submissions.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    Ok(submissions)
}

/// 把图片文件解析成 data URI 附件
///
/// 相对路径相对于 `base_dir`（一般是 TOML 所在目录）解析。
/// 单个图片读取失败只告警并跳过，不中断整份作业。
pub async fn load_image_attachments(
    paths: &[String],
    base_dir: Option<&Path>,
) -> Vec<ImageAttachment> {
    let mut attachments = Vec::new();

    for raw_path in paths {
        let path = resolve_path(raw_path, base_dir);
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        match fs::read(&path).await {
            Ok(bytes) => {
                let mime = mime_for_extension(&path);
                let src = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
                tracing::debug!("📁 已加载图片 {} ({} 字节)", name, bytes.len());
                attachments.push(ImageAttachment::new(name, src));
            }
            Err(e) => {
                tracing::warn!("⚠️ 图片加载失败 {}: {}", path.display(), e);
            }
        }
    }

    attachments
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(base) => base.join(path),
        None => path,
    }
}

/// 按扩展名推断 MIME 类型
fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}
