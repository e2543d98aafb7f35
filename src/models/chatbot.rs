use crate::error::ValidationError;

/// 可测试的聊天机器人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chatbot {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// 已接入的聊天机器人
pub const CHATBOTS: &[Chatbot] = &[Chatbot {
    id: "asksuite",
    name: "Asksuite",
    description: "No description provided",
}];

/// 按 id 查找聊天机器人
pub fn find_chatbot(id: &str) -> Result<&'static Chatbot, ValidationError> {
    CHATBOTS
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| ValidationError::UnknownChatbot { id: id.to_string() })
}
