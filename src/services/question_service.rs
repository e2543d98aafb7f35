//! 题库服务 - 业务能力层
//!
//! 只负责问题的增删改查，不关心分析流程

use crate::clients::ApiClient;
use crate::error::{AppResult, ValidationError};
use tracing::info;

/// 题库服务
pub struct QuestionService {
    client: ApiClient,
}

impl QuestionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 管理端完整题库
    pub async fn list(&self) -> AppResult<Vec<String>> {
        self.client.get_admin_questions().await
    }

    /// 新增问题，已存在时后端返回 409
    pub async fn add(&self, question: &str) -> AppResult<String> {
        let question = normalize(question)?;
        self.client.add_question(&question).await?;
        info!("✓ 问题已添加: {}", question);
        Ok(question)
    }

    /// 修改问题文本
    pub async fn update(&self, old_question: &str, new_question: &str) -> AppResult<String> {
        let new_question = normalize(new_question)?;
        self.client
            .update_question(old_question, &new_question)
            .await?;
        info!("✓ 问题已更新: {} → {}", old_question, new_question);
        Ok(new_question)
    }

    pub async fn delete(&self, question: &str) -> AppResult<()> {
        self.client.delete_question(question).await?;
        info!("✓ 问题已删除: {}", question);
        Ok(())
    }
}

/// 去除首尾空白，拒绝空问题
pub fn normalize(question: &str) -> Result<String, ValidationError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field: "问题" });
    }
    Ok(trimmed.to_string())
}
