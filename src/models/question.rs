use serde::{Deserialize, Serialize};

/// 题库中的一个问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    /// 是否被选中参与分析
    #[serde(default)]
    pub selected: bool,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selected: false,
        }
    }
}

/// `GET /questions` 与 `GET /admin/questions` 的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionList {
    #[serde(default)]
    pub questions: Vec<String>,
}
