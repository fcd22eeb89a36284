//! 站点控制命令
//!
//! 模型在自然语言回复末尾追加一段 JSON 命令，前后用固定标记包裹：
//!
//! ```text
//! 回复正文
//! |||JSON_START|||{"action": "CHANGE_THEME", "payload": "dark"}|||JSON_END|||
//! ```
//!
//! 前端依赖这一文本约定，解析统一收口在 [`extract`]。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// 命令起始标记
pub const JSON_START: &str = "|||JSON_START|||";

/// 命令结束标记
pub const JSON_END: &str = "|||JSON_END|||";

/// 前端可执行的命令
///
/// 模型写出的 JSON 对象原样保留并转发给前端，不校验字段类型和动作枚举。
/// 约定的字段是 `action` 和 `payload`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Map<String, Value>);

impl Command {
    pub fn new(action: impl Into<String>, payload: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("action".to_string(), Value::String(action.into()));
        fields.insert("payload".to_string(), payload.into());
        Self(fields)
    }

    /// `action` 字段，不是字符串时返回 None
    pub fn action(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.0.get("payload")
    }

    /// 任意字段
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 对应的已知动作，不在目录中时返回 None
    pub fn known_action(&self) -> Option<Action> {
        self.action()?.parse().ok()
    }
}

/// 系统提示词中声明的动作目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChangeTheme,
    Navigate,
    Filter,
    Search,
    PlayMusic,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::ChangeTheme,
        Action::Navigate,
        Action::Filter,
        Action::Search,
        Action::PlayMusic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ChangeTheme => "CHANGE_THEME",
            Action::Navigate => "NAVIGATE",
            Action::Filter => "FILTER",
            Action::Search => "SEARCH",
            Action::PlayMusic => "PLAY_MUSIC",
        }
    }

    /// 提示词里给模型看的 payload 说明
    pub fn payload_hint(&self) -> &'static str {
        match self {
            Action::ChangeTheme => "'dark' or 'light'",
            Action::Navigate => "'home', 'popular', 'trending'",
            Action::Filter => {
                "'action', 'romance', 'comic', 'anime' (Use exact tag/category names)"
            }
            Action::Search => "'search term'",
            Action::PlayMusic => "'true' (Just for fun vibe)",
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 拆分模型回复
///
/// 返回去掉命令段后的展示文本，以及解析出的命令。
/// 命令段不是 JSON 对象时只记录日志，命令视为不存在。
pub fn extract(raw_text: &str) -> (String, Option<Command>) {
    let Some((before, after)) = raw_text.split_once(JSON_START) else {
        return (raw_text.trim().to_string(), None);
    };

    let display_text = before.trim().to_string();

    // 缺少结束标记时保留剩余全部内容
    let segment = match after.split_once(JSON_END) {
        Some((json_part, _)) => json_part,
        None => after,
    }
    .trim();

    let command = match serde_json::from_str::<Command>(segment) {
        Ok(command) => Some(command),
        Err(e) => {
            warn!("JSON Parsing Failed: {} (segment: {:?})", e, segment);
            None
        }
    };

    (display_text, command)
}
