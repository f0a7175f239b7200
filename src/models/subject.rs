/// 科目模式枚举
///
/// 只影响发给远程服务的提示词措辞，对核心流程没有其他行为差异。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectMode {
    /// 编程
    Cs,
    /// 数学
    Math,
    /// 科学
    Science,
    /// 英语
    English,
    /// 其他
    Other,
}

impl SubjectMode {
    /// 获取线上格式的科目代码
    pub fn code(self) -> &'static str {
        match self {
            SubjectMode::Cs => "cs",
            SubjectMode::Math => "math",
            SubjectMode::Science => "science",
            SubjectMode::English => "english",
            SubjectMode::Other => "other",
        }
    }

    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            SubjectMode::Cs => "编程",
            SubjectMode::Math => "数学",
            SubjectMode::Science => "科学",
            SubjectMode::English => "英语",
            SubjectMode::Other => "其他",
        }
    }

    /// 从科目代码解析（精确匹配）
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "cs" => Some(SubjectMode::Cs),
            "math" => Some(SubjectMode::Math),
            "science" => Some(SubjectMode::Science),
            "english" => Some(SubjectMode::English),
            "other" => Some(SubjectMode::Other),
            _ => None,
        }
    }

    /// 智能查找科目（支持模糊匹配）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        let s_lower = s.trim().to_lowercase();
        if let Some(mode) = Self::from_code(&s_lower) {
            return Some(mode);
        }

        // 模糊匹配
        if s_lower.contains("编程")
            || s_lower.contains("代码")
            || s_lower.contains("计算机")
            || s_lower.contains("程序")
            || s_lower.contains("computer")
            || s_lower.contains("coding")
            || s_lower.contains("program")
        {
            return Some(SubjectMode::Cs);
        }
        if s_lower.contains("数学") || s_lower.contains("数") || s_lower.contains("math") {
            return Some(SubjectMode::Math);
        }
        if s_lower.contains("科学")
            || s_lower.contains("物理")
            || s_lower.contains("化学")
            || s_lower.contains("生物")
            || s_lower.contains("science")
            || s_lower.contains("physics")
            || s_lower.contains("chemistry")
            || s_lower.contains("biology")
        {
            return Some(SubjectMode::Science);
        }
        if s_lower.contains("英语") || s_lower.contains("英") || s_lower.contains("english") {
            return Some(SubjectMode::English);
        }
        if s_lower.contains("其他") || s_lower.contains("other") {
            return Some(SubjectMode::Other);
        }

        None
    }
}

impl std::fmt::Display for SubjectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
