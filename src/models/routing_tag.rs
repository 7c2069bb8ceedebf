use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 路由标签：决定远端使用哪一种分析流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingTag {
    /// 分析
    #[serde(rename = "분석")]
    Analysis,
    /// 文体 / 校对
    #[serde(rename = "문체")]
    StyleCorrection,
}

/// 可接受的输入写法 → 标签
static TAG_ALIASES: phf::Map<&'static str, RoutingTag> = phf::phf_map! {
    "분석" => RoutingTag::Analysis,
    "analysis" => RoutingTag::Analysis,
    "문체" => RoutingTag::StyleCorrection,
    "style" => RoutingTag::StyleCorrection,
    "style-correction" => RoutingTag::StyleCorrection,
};

impl RoutingTag {
    pub const ALL: [RoutingTag; 2] = [RoutingTag::Analysis, RoutingTag::StyleCorrection];

    /// 发给服务端的取值
    pub fn wire_value(self) -> &'static str {
        match self {
            RoutingTag::Analysis => "분석",
            RoutingTag::StyleCorrection => "문체",
        }
    }

    /// 界面上的说明
    pub fn label(self) -> &'static str {
        match self {
            RoutingTag::Analysis => "분석 (Gemini Pro)",
            RoutingTag::StyleCorrection => "문체/교정 (Gemini Flash)",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let key = value.trim().to_lowercase();
        TAG_ALIASES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ConfigError::UnknownRoutingTag {
                value: value.to_string(),
            })
    }
}

impl Default for RoutingTag {
    fn default() -> Self {
        RoutingTag::Analysis
    }
}

impl std::str::FromStr for RoutingTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RoutingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_value())
    }
}
