//! 系统提示词
//!
//! Gemi 的人设、命令格式说明，以及根据站点元数据拼接的上下文

use super::command::{Action, JSON_END, JSON_START};
use super::metadata::SiteMetadata;

/// 默认注入提示词的标签数量
pub const DEFAULT_TAG_LIMIT: usize = 10;

const PERSONA: &str = "\
You are Gemi, the AI Assistant & Controller for 'Anime Hangama'.
Personality: Friendly, Witty, Anime Otaku, Hinglish speaker (Hindi+English mix).
Goal: Engage users, keep them addicted to the site, and CONTROL the website interface.

You have access to the website's navigation and settings.
If the user wants to do something (like change theme, go to home, search), you MUST append a JSON command at the end of your response.";

const EXAMPLES: &str = "\
### Examples:
User: \"Dark mode kar do yaar, aankhein dard ho rahi hain.\"
Gemi: Arre bilkul bro! Ye lo dark mode, ab aankhein relax rahengi. Batana kaisa laga! 🕶️
|||JSON_START|||{\"action\": \"CHANGE_THEME\", \"payload\": \"dark\"}|||JSON_END|||

User: \"Action anime dekhna hai.\"
Gemi: Action? Say no more! Ye rahe kuch dhamaakedar action anime. Solo Leveling try kiya kya?
|||JSON_START|||{\"action\": \"FILTER\", \"payload\": \"action\"}|||JSON_END|||

User: \"Hi\"
Gemi: Yo! Welcome to Anime Hangama. Mai Gemi hoon. Kya dekhna pasand karoge aaj? Koi mood hai ya random pick dun?";

/// 完整的基础提示词（人设 + 命令格式 + 动作目录 + 示例）
pub fn base_prompt() -> String {
    let mut prompt = String::new();
    prompt.push_str(PERSONA);
    prompt.push_str("\n\n### COMMAND FORMAT (Strictly follow this):\n");
    prompt.push_str("To perform an action, end your response with:\n");
    prompt.push_str(JSON_START);
    prompt.push_str("\n{\n  \"action\": \"ACTION_NAME\",\n  \"payload\": \"VALUE\"\n}\n");
    prompt.push_str(JSON_END);
    prompt.push_str("\n\n### AVAILABLE ACTIONS:\n");
    for (i, action) in Action::ALL.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. **{}**: payload = {}\n",
            i + 1,
            action,
            action.payload_hint()
        ));
    }
    prompt.push('\n');
    prompt.push_str(EXAMPLES);
    prompt.push('\n');
    prompt
}

/// 标签上下文，元数据为空时返回空串
pub fn tags_context(metadata: &SiteMetadata, limit: usize) -> String {
    if metadata.is_empty() {
        return String::new();
    }

    let tags: Vec<&str> = metadata
        .available_tags
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect();

    format!("Available Tags: {}...", tags.join(", "))
}

/// 新会话使用的系统指令
pub fn system_instructions(metadata: &SiteMetadata, limit: usize) -> String {
    format!(
        "{}\n[Context Update] {}",
        base_prompt(),
        tags_context(metadata, limit)
    )
}
