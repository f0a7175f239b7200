//! 终端主题
//!
//! 控制摘录视图里高亮标记的样式，偏好持久化在本地状态里。

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 终端主题
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// 按名称解析主题，未知名称回退到深色
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dark" | "深色" => Theme::Dark,
            "light" | "浅色" => Theme::Light,
            other => {
                if !other.is_empty() {
                    warn!("⚠️ 未知主题 \"{}\"，使用深色主题", other);
                }
                Theme::Dark
            }
        }
    }

    /// 主题名称（也是持久化的值）
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// 命中行的标记
    pub fn hit_marker(self) -> &'static str {
        match self {
            Theme::Dark => "█",
            Theme::Light => "●",
        }
    }

    /// 上下文行的标记
    pub fn context_marker(self) -> &'static str {
        match self {
            Theme::Dark => "░",
            Theme::Light => "◦",
        }
    }

    /// 普通行的标记
    pub fn plain_marker(self) -> &'static str {
        " "
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
