//! 远程教练服务客户端 - 业务能力层
//!
//! 对接托管的三个补全端点（/extract /hint /locate）。
//! 线上约定：请求是 JSON，成功返回 `{"aiText": "..."}`，
//! 失败返回非 2xx 状态码加 `{"error": "..."}`。
//!
//! 这层不做重试、不设超时：每个操作恰好请求一次，
//! 超时交给服务端和上层策略。

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, GatewayError};
use crate::models::history::ImageAttachment;
use crate::models::subject::SubjectMode;
use crate::services::gateway::TutorGateway;

/// 远程教练服务客户端
pub struct RemoteGateway {
    client: Client,
    base_url: String,
}

// ========== 线上格式 ==========

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    images: &'a [ImageAttachment],
    ask: &'a str,
    #[serde(rename = "subjectMode")]
    subject_mode: SubjectMode,
}

#[derive(Debug, Serialize)]
struct HintRequest<'a> {
    code: &'a str,
    ask: &'a str,
    images: &'a [ImageAttachment],
    #[serde(rename = "subjectMode")]
    subject_mode: SubjectMode,
}

#[derive(Debug, Serialize)]
struct LocateRequest<'a> {
    code: &'a str,
    ask: &'a str,
    #[serde(rename = "subjectMode")]
    subject_mode: SubjectMode,
}

#[derive(Debug, Deserialize)]
struct AiReply {
    #[serde(rename = "aiText", default)]
    ai_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

impl RemoteGateway {
    /// 创建新的远程客户端
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.coach_api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST 到指定端点并取出 aiText
    async fn post_for_text<B: Serialize>(&self, endpoint: &str, body: &B) -> AppResult<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("📤 请求 {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::gateway_request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            // 失败时服务端在 body 里带 {"error": "..."}，尽量取出来
            let message = response
                .json::<ErrorReply>()
                .await
                .ok()
                .and_then(|reply| reply.error);
            debug!("❌ {} 返回 {} ({:?})", endpoint, status, message);
            return Err(AppError::gateway_bad_response(
                endpoint,
                status.as_u16(),
                message,
            ));
        }

        let reply: AiReply = response.json().await.map_err(|e| {
            AppError::Gateway(GatewayError::JsonParseFailed {
                source: Box::new(e),
            })
        })?;

        debug!("✓ {} 应答 {} 字符", endpoint, reply.ai_text.chars().count());

        Ok(reply.ai_text)
    }
}

impl TutorGateway for RemoteGateway {
    async fn extract_text(
        &self,
        images: &[ImageAttachment],
        ask: &str,
        mode: SubjectMode,
    ) -> AppResult<String> {
        let body = ExtractRequest {
            images,
            ask,
            subject_mode: mode,
        };
        self.post_for_text("extract", &body).await
    }

    async fn request_hint(
        &self,
        code: &str,
        ask: &str,
        images: &[ImageAttachment],
        mode: SubjectMode,
    ) -> AppResult<String> {
        let body = HintRequest {
            code,
            ask,
            images,
            subject_mode: mode,
        };
        self.post_for_text("hint", &body).await
    }

    async fn locate_lines(&self, code: &str, ask: &str, mode: SubjectMode) -> AppResult<String> {
        let body = LocateRequest {
            code,
            ask,
            subject_mode: mode,
        };
        self.post_for_text("locate", &body).await
    }
}
