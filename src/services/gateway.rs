//! 辅导网关 - 业务能力层
//!
//! 把"图片转写 / 请求提示 / 定位行号"三个远程能力收到一个 trait 后面，
//! 流程层只面向 trait 编程，测试时注入脚本化实现即可。
//!
//! 生产实现有两个：
//! - `RemoteGateway`：走托管的教练服务（/extract /hint /locate）
//! - `DirectLlmGateway`：直连 OpenAI 兼容接口，自带指令前导

use tracing::warn;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::history::ImageAttachment;
use crate::models::subject::SubjectMode;
use crate::services::llm_gateway::DirectLlmGateway;
use crate::services::remote_gateway::RemoteGateway;

/// 辅导网关能力
///
/// 职责：
/// - 三个远程操作，各自恰好请求一次（重试策略不在这层）
/// - 只处理单次请求，不认识工作状态 / 历史记录
/// - 不关心流程顺序
#[allow(async_fn_in_trait)]
pub trait TutorGateway {
    /// 把图片逐字转写成文本
    async fn extract_text(
        &self,
        images: &[ImageAttachment],
        ask: &str,
        mode: SubjectMode,
    ) -> AppResult<String>;

    /// 请求启发式提示（不给最终答案）
    async fn request_hint(
        &self,
        code: &str,
        ask: &str,
        images: &[ImageAttachment],
        mode: SubjectMode,
    ) -> AppResult<String>;

    /// 请求行号定位（返回 LINES:/NOTE: 格式的纯文本）
    async fn locate_lines(&self, code: &str, ask: &str, mode: SubjectMode) -> AppResult<String>;
}

/// 按配置选择的生产网关
pub enum Gateway {
    Remote(RemoteGateway),
    Direct(DirectLlmGateway),
}

impl Gateway {
    /// 根据配置创建网关
    ///
    /// `gateway_mode` 取 "remote" 或 "direct"，未知值告警后回退到 remote。
    pub fn from_config(config: &Config) -> Self {
        match config.gateway_mode.as_str() {
            "direct" => Gateway::Direct(DirectLlmGateway::new(config)),
            "remote" => Gateway::Remote(RemoteGateway::new(config)),
            other => {
                warn!("⚠️ 未知网关模式 \"{}\"，回退到 remote", other);
                Gateway::Remote(RemoteGateway::new(config))
            }
        }
    }

    /// 网关模式名称（用于日志）
    pub fn mode_name(&self) -> &'static str {
        match self {
            Gateway::Remote(_) => "remote",
            Gateway::Direct(_) => "direct",
        }
    }
}

impl TutorGateway for Gateway {
    async fn extract_text(
        &self,
        images: &[ImageAttachment],
        ask: &str,
        mode: SubjectMode,
    ) -> AppResult<String> {
        match self {
            Gateway::Remote(g) => g.extract_text(images, ask, mode).await,
            Gateway::Direct(g) => g.extract_text(images, ask, mode).await,
        }
    }

    async fn request_hint(
        &self,
        code: &str,
        ask: &str,
        images: &[ImageAttachment],
        mode: SubjectMode,
    ) -> AppResult<String> {
        match self {
            Gateway::Remote(g) => g.request_hint(code, ask, images, mode).await,
            Gateway::Direct(g) => g.request_hint(code, ask, images, mode).await,
        }
    }

    async fn locate_lines(&self, code: &str, ask: &str, mode: SubjectMode) -> AppResult<String> {
        match self {
            Gateway::Remote(g) => g.locate_lines(code, ask, mode).await,
            Gateway::Direct(g) => g.locate_lines(code, ask, mode).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_mode_selection() {
        let mut config = Config::default();

        config.gateway_mode = "remote".to_string();
        assert_eq!(Gateway::from_config(&config).mode_name(), "remote");

        config.gateway_mode = "direct".to_string();
        assert_eq!(Gateway::from_config(&config).mode_name(), "direct");

        // 未知模式回退到 remote
        config.gateway_mode = "什么都不是".to_string();
        assert_eq!(Gateway::from_config(&config).mode_name(), "remote");
    }
}
