//! 作业提交数据模型
//!
//! 对应一个作业 TOML 文件：学生的提问、可选的作业文本、可选的图片路径。

use serde::{Deserialize, Serialize};

/// 一份待处理的作业
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// 作业名称（为空时由加载器用文件名填充）
    #[serde(default)]
    pub name: String,
    /// 科目（自由文本，由 SubjectMode::find 解析）
    #[serde(default)]
    pub subject: String,
    /// 学生的提问
    pub ask: String,
    /// 作业文本（粘贴的代码/文字，可缺省）
    #[serde(default)]
    pub code: Option<String>,
    /// 图片文件路径列表（相对于 TOML 文件所在目录或绝对路径）
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// 来源文件路径（加载后填充，不参与序列化）
    #[serde(skip)]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let submission: Submission = toml::from_str(
            r#"
            ask = "为什么我的循环停不下来"
            code = "while i < 10 {}"
            "#,
        )
        .unwrap();

        assert_eq!(submission.ask, "为什么我的循环停不下来");
        assert_eq!(submission.code.as_deref(), Some("while i < 10 {}"));
        assert!(submission.name.is_empty());
        assert!(submission.subject.is_empty());
        assert!(submission.images.is_none());
        assert!(submission.file_path.is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let submission: Submission = toml::from_str(
            r#"
            name = "第三题"
            subject = "数学"
            ask = "这一步怎么化简"
            images = ["photo1.jpg", "photo2.jpg"]
            "#,
        )
        .unwrap();

        assert_eq!(submission.name, "第三题");
        assert_eq!(submission.subject, "数学");
        assert!(submission.code.is_none());
        assert_eq!(submission.images.as_deref().map(|v| v.len()), Some(2));
    }
}
