//! LLM 直连网关 - 业务能力层
//!
//! 不经过托管教练服务，直接调用 OpenAI 兼容的聊天补全接口，
//! 三个能力各自带固定的指令前导（system 消息）：
//! - 转写：逐字转写图片，不加解释
//! - 提示：启发式辅导，绝不给最终答案
//! - 定位：按 LINES:/NOTE: 约定格式输出行号
//!
//! 模型调用成功但内容为空白时按网关空应答错误处理。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 图片以 data URI 形式走 Vision 内容分片

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::history::ImageAttachment;
use crate::models::subject::SubjectMode;
use crate::services::gateway::TutorGateway;

/// 转写前导：要求逐字输出，不要任何修饰
const EXTRACT_PREAMBLE: &str = "你是一个精确的文字转写助手。\
请逐字转写图片中的全部文字内容（包括代码、公式和标点），保持原有换行。\
不要添加任何解释、说明或格式修饰，只输出转写结果本身。";

/// 提示前导：启发式辅导，不给最终答案
const HINT_PREAMBLE: &str = "你是一位耐心的学习辅导老师。\
请针对学生提交的作业给出启发式的指导：指出值得思考的方向、提出引导性的问题、\
解释相关的概念，帮助学生自己找到答案。\
绝对不要直接给出最终答案，也不要给出改好的完整代码。\
回答使用 Markdown 格式。";

/// 定位前导：严格按约定格式输出行号
const LOCATE_PREAMBLE: &str = "你是一个作业定位助手。\
请找出学生作业中最可能有问题的行号范围，严格按照如下纯文本格式输出，不要输出任何其他内容：\n\
LINES:\n\
- 起始行-结束行 | 原因\n\
单独一行可以省略结束行，写作 `- 行号 | 原因`。\
最后可以加一行 `NOTE: 说明`。\n\
如果无法定位任何行，请恰好输出：\n\
LINES:\nNOTE: none";

/// LLM 直连网关
///
/// 职责：
/// - 调用 LLM API 完成转写 / 提示 / 定位
/// - 只处理单次请求
/// - 不认识工作状态 / 历史记录
/// - 不关心流程顺序
pub struct DirectLlmGateway {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl DirectLlmGateway {
    /// 创建新的直连网关
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 这是最基础的 LLM 调用接口，三个网关能力都基于此函数。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `imgs`: 图片 data URI 列表（可选），会作为 Vision 分片追加到用户消息中
    ///
    /// # 返回
    /// 返回 LLM 的原始响应内容（不做裁剪，归一化由各能力自理）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        imgs: Option<&[String]>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());
        if let Some(img_urls) = imgs {
            debug!("包含 {} 张图片", img_urls.len());
        }

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 构建用户消息内容（支持图片）
        let user_msg = if let Some(img_urls) = imgs {
            if !img_urls.is_empty() {
                // 使用 Vision API：构建包含文本和图片的内容
                let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                    Vec::new();

                // 添加文本部分
                content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText {
                        text: user_message.to_string(),
                    },
                ));

                // 添加图片部分
                for url in img_urls.iter() {
                    content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: url.clone(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ));
                }

                // 构建包含多部分内容的用户消息
                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(
                        content_parts,
                    ))
                    .build()?
            } else {
                // 没有图片，只有文本
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()?
            }
        } else {
            // 没有图片参数，只有文本
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
        };

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content)
    }

    /// 把 anyhow 错误归入网关错误分类
    fn llm_error(&self, e: anyhow::Error) -> AppError {
        AppError::llm_call_failed(self.model_name.clone(), e)
    }
}

impl TutorGateway for DirectLlmGateway {
    async fn extract_text(
        &self,
        images: &[ImageAttachment],
        ask: &str,
        mode: SubjectMode,
    ) -> AppResult<String> {
        let urls: Vec<String> = images.iter().map(|img| img.src.clone()).collect();

        let user_message = format!(
            "这是一道{}作业的图片。学生的问题：{}\n请逐字转写图片中的全部文字。",
            mode.name(),
            ask
        );

        let reply = self
            .send_to_llm(&user_message, Some(EXTRACT_PREAMBLE), Some(&urls))
            .await
            .map_err(|e| self.llm_error(e))?;

        // 托管服务会剥掉整体包裹的代码围栏，这里保持同样的归一化
        reject_blank("extract", strip_code_fence(&reply))
    }

    async fn request_hint(
        &self,
        code: &str,
        ask: &str,
        images: &[ImageAttachment],
        mode: SubjectMode,
    ) -> AppResult<String> {
        let urls: Vec<String> = images.iter().map(|img| img.src.clone()).collect();
        let imgs = if urls.is_empty() {
            None
        } else {
            Some(urls.as_slice())
        };

        let user_message = format!(
            "这是一道{}作业。\n\n学生的问题：{}\n\n作业内容：\n{}",
            mode.name(),
            ask,
            code
        );

        let reply = self
            .send_to_llm(&user_message, Some(HINT_PREAMBLE), imgs)
            .await
            .map_err(|e| self.llm_error(e))?;

        // 提示正文结尾的空白保留，开头的裁剪由会话层负责
        reject_blank("hint", reply)
    }

    async fn locate_lines(&self, code: &str, ask: &str, mode: SubjectMode) -> AppResult<String> {
        // 给模型看带行号的文本，定位结果才对得上
        let user_message = format!(
            "这是一道{}作业。学生的问题：{}\n\n带行号的作业内容：\n{}",
            mode.name(),
            ask,
            number_lines(code)
        );

        let reply = self
            .send_to_llm(&user_message, Some(LOCATE_PREAMBLE), None)
            .await
            .map_err(|e| self.llm_error(e))?;

        reject_blank("locate", reply)
    }
}

/// 空应答按网关错误处理
///
/// 三个能力共用：模型给了 2xx 但内容是空白时，和调用失败一样对待。
fn reject_blank(endpoint: &str, text: String) -> AppResult<String> {
    if text.trim().is_empty() {
        Err(AppError::gateway_empty_reply(endpoint))
    } else {
        Ok(text)
    }
}

/// 剥掉整体包裹的代码围栏
///
/// 只处理"整个应答被一对 ``` 包住"的情况，围栏后紧跟的语言标记一并去掉；
/// 文本中间出现的围栏原样保留。
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(inner) = rest.strip_suffix("```") {
            let inner = match inner.split_once('\n') {
                Some((first, body))
                    if !first.trim().is_empty() && !first.trim().contains(char::is_whitespace) =>
                {
                    body
                }
                _ => inner,
            };
            return inner.trim().to_string();
        }
    }

    trimmed.to_string()
}

/// 给文本加上 1 起始的行号
fn number_lines(code: &str) -> String {
    code.lines()
        .enumerate()
        .map(|(idx, line)| format!("{:>4} | {}", idx + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    /// 创建测试用的直连网关（从环境变量读取 LLM 配置）
    fn create_test_gateway() -> DirectLlmGateway {
        DirectLlmGateway::new(&Config::from_env())
    }

    #[test]
    fn test_blank_reply_is_gateway_error() {
        let err = reject_blank("hint", "   \n  ".to_string()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Gateway(GatewayError::EmptyReply { .. })
        ));
        assert!(reject_blank("extract", String::new()).is_err());
        assert!(reject_blank("locate", "\t".to_string()).is_err());
    }

    #[test]
    fn test_reject_blank_keeps_reply_intact() {
        // 提示正文结尾的空白不在网关层裁掉
        let reply = reject_blank("hint", "多想想边界条件。\n\n".to_string()).unwrap();
        assert_eq!(reply, "多想想边界条件。\n\n");
    }

    #[test]
    fn test_strip_code_fence_with_language_tag() {
        let text = "```python\nprint(1)\nprint(2)\n```";
        assert_eq!(strip_code_fence(text), "print(1)\nprint(2)");
    }

    #[test]
    fn test_strip_code_fence_bare() {
        let text = "```\nx = 1\n```";
        assert_eq!(strip_code_fence(text), "x = 1");
    }

    #[test]
    fn test_strip_code_fence_untouched_cases() {
        // 没有围栏
        assert_eq!(strip_code_fence("  普通文本  "), "普通文本");
        // 只有开头的围栏（没有整体包裹）
        assert_eq!(strip_code_fence("```python\n没收尾"), "```python\n没收尾");
        // 围栏在中间
        let mixed = "前面\n```\ncode\n```";
        assert_eq!(strip_code_fence(mixed), mixed);
    }

    #[test]
    fn test_strip_code_fence_single_line() {
        assert_eq!(strip_code_fence("```x = 1```"), "x = 1");
    }

    #[test]
    fn test_number_lines() {
        let numbered = number_lines("a\nbb\nccc");
        assert_eq!(numbered, "   1 | a\n   2 | bb\n   3 | ccc");
        assert_eq!(number_lines(""), "");
    }

    /// 测试直连模式的提示能力（需要可用的 LLM 配置）
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_direct_hint -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_direct_hint() {
        let _ = tracing_subscriber::fmt::try_init();

        let gateway = create_test_gateway();

        let code = "fn main() {\n    let mut i = 0;\n    while i < 10 {\n        println!(\"{}\", i);\n    }\n}";

        println!("\n========== 测试直连提示 ==========");
        let result = gateway
            .request_hint(code, "为什么我的循环停不下来", &[], SubjectMode::Cs)
            .await;

        match result {
            Ok(response) => {
                println!("\n========== LLM 响应 ==========");
                println!("{}", response);
                println!("==============================\n");
                println!("✅ 直连提示调用成功！");
                assert!(!response.is_empty());
            }
            Err(e) => {
                println!("❌ 直连提示调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }

    /// 测试直连模式的定位能力（需要可用的 LLM 配置）
    #[tokio::test]
    #[ignore]
    async fn test_direct_locate_format() {
        let _ = tracing_subscriber::fmt::try_init();

        let gateway = create_test_gateway();

        let code = "fn main() {\n    let mut i = 0;\n    while i < 10 {\n        println!(\"{}\", i);\n    }\n}";

        let result = gateway
            .locate_lines(code, "为什么我的循环停不下来", SubjectMode::Cs)
            .await;

        match result {
            Ok(reply) => {
                println!("\n========== 定位应答 ==========");
                println!("{}", reply);
                println!("==============================\n");
                println!("✅ 定位调用成功！");
                // 约定格式应当出现 LINES: 头
                assert!(reply.contains("LINES:"));
            }
            Err(e) => {
                println!("❌ 定位调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }
}
