use std::fmt;

use crate::workflow::phase::Phase;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 远程网关错误（hint / extract / locate 三个能力）
    Gateway(GatewayError),
    /// 本地状态存储错误
    Storage(StorageError),
    /// 输入文件错误
    Input(InputError),
    /// 流程错误
    Flow(FlowError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Gateway(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "存储错误: {}", e),
            AppError::Input(e) => write!(f, "输入错误: {}", e),
            AppError::Flow(e) => write!(f, "流程错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Gateway(e) => Some(e),
            AppError::Storage(e) => Some(e),
            AppError::Input(e) => Some(e),
            AppError::Flow(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 远程网关错误
///
/// 注意：Display 文本会拼进用户可见的 "Oops — " 提示里，
/// 所以这里的措辞按"给学生看"的口吻写。
#[derive(Debug)]
pub enum GatewayError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回错误响应（非 2xx）
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 服务返回空内容
    EmptyReply {
        endpoint: String,
    },
    /// LLM 直连调用失败
    LlmCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::RequestFailed { endpoint, source } => {
                write!(f, "请求 {} 服务失败: {}", endpoint, source)
            }
            GatewayError::BadResponse {
                endpoint,
                status,
                message,
            } => match message {
                Some(message) => write!(f, "{} 服务出错: {}", endpoint, message),
                None => write!(f, "{} 服务出错 (HTTP {})", endpoint, status),
            },
            GatewayError::EmptyReply { endpoint } => {
                write!(f, "{} 服务返回了空内容", endpoint)
            }
            GatewayError::LlmCallFailed { model, source } => {
                write!(f, "LLM 调用失败 (模型: {}): {}", model, source)
            }
            GatewayError::JsonParseFailed { source } => {
                write!(f, "响应解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::RequestFailed { source, .. }
            | GatewayError::LlmCallFailed { source, .. }
            | GatewayError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 本地状态存储错误
#[derive(Debug)]
pub enum StorageError {
    /// 初始化存储目录失败
    InitFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 读取键失败
    ReadFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入键失败
    WriteFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 删除键失败
    ClearFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 序列化/反序列化失败
    JsonFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InitFailed { path, source } => {
                write!(f, "初始化存储目录失败 ({}): {}", path, source)
            }
            StorageError::ReadFailed { key, source } => {
                write!(f, "读取 {} 失败: {}", key, source)
            }
            StorageError::WriteFailed { key, source } => {
                write!(f, "写入 {} 失败: {}", key, source)
            }
            StorageError::ClearFailed { key, source } => {
                write!(f, "删除 {} 失败: {}", key, source)
            }
            StorageError::JsonFailed { source } => {
                write!(f, "JSON 处理失败: {}", source)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::InitFailed { source, .. }
            | StorageError::ReadFailed { source, .. }
            | StorageError::WriteFailed { source, .. }
            | StorageError::ClearFailed { source, .. }
            | StorageError::JsonFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 输入文件错误
#[derive(Debug)]
pub enum InputError {
    /// 文件读取失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
    /// 图片文件加载失败
    ImageLoadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            InputError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            InputError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
            InputError::ImageLoadFailed { path, source } => {
                write!(f, "图片加载失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::ReadFailed { source, .. }
            | InputError::TomlParseFailed { source, .. }
            | InputError::ImageLoadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 流程错误
#[derive(Debug)]
pub enum FlowError {
    /// 已有一次提交在进行中
    Busy {
        phase: Phase,
    },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Busy { phase } => {
                write!(f, "当前已有提交在进行中 (阶段: {})", phase)
            }
        }
    }
}

impl std::error::Error for FlowError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::JsonFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Input(InputError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Input(InputError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网关请求失败错误
    pub fn gateway_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Gateway(GatewayError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建网关错误响应错误
    pub fn gateway_bad_response(
        endpoint: impl Into<String>,
        status: u16,
        message: Option<String>,
    ) -> Self {
        AppError::Gateway(GatewayError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建网关空响应错误
    pub fn gateway_empty_reply(endpoint: impl Into<String>) -> Self {
        AppError::Gateway(GatewayError::EmptyReply {
            endpoint: endpoint.into(),
        })
    }

    /// 创建 LLM 调用失败错误
    pub fn llm_call_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Gateway(GatewayError::LlmCallFailed {
            model: model.into(),
            source: source.into(),
        })
    }

    /// 创建存储读取失败错误
    pub fn storage_read_failed(
        key: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            key: key.into(),
            source: Box::new(source),
        })
    }

    /// 创建存储写入失败错误
    pub fn storage_write_failed(
        key: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            key: key.into(),
            source: Box::new(source),
        })
    }

    /// 创建"提交进行中"错误
    pub fn flow_busy(phase: Phase) -> Self {
        AppError::Flow(FlowError::Busy { phase })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
