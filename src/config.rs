/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 网关模式："remote"（托管教练服务）或 "direct"（直连 LLM）
    pub gateway_mode: String,
    /// 托管教练服务的基础 URL（/extract /hint /locate 挂在其下）
    pub coach_api_base_url: String,
    /// 作业 TOML 文件存放目录
    pub submissions_folder: String,
    /// 本地状态目录（历史记录 / 主题偏好）
    pub state_folder: String,
    /// 主题覆盖（为空则使用已保存的偏好）
    pub theme_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置（direct 模式） ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_mode: "remote".to_string(),
            coach_api_base_url: "http://127.0.0.1:8787/api".to_string(),
            submissions_folder: "submissions".to_string(),
            state_folder: ".hint_coach".to_string(),
            theme_name: String::new(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            gateway_mode: std::env::var("GATEWAY_MODE").unwrap_or(default.gateway_mode),
            coach_api_base_url: std::env::var("COACH_API_BASE_URL").unwrap_or(default.coach_api_base_url),
            submissions_folder: std::env::var("SUBMISSIONS_FOLDER").unwrap_or(default.submissions_folder),
            state_folder: std::env::var("STATE_FOLDER").unwrap_or(default.state_folder),
            theme_name: std::env::var("COACH_THEME").unwrap_or(default.theme_name),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }
}
