use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 酒店
///
/// 公共接口 `GET /hotels` 只返回 name 和 company_id，此时 payload 为 Null；
/// 管理接口 `GET /admin/hotels` 返回完整记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub company_id: String,
    /// 发送给聊天机器人的原始 JSON 配置
    #[serde(default)]
    pub payload: Value,
    #[serde(skip)]
    pub selected: bool,
}

impl Hotel {
    pub fn new(name: impl Into<String>, company_id: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            company_id: company_id.into(),
            payload,
            selected: false,
        }
    }

    /// 以缩进格式输出 payload，用于编辑
    pub fn payload_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}

/// `GET /hotels` 与 `GET /admin/hotels` 的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelList {
    #[serde(default)]
    pub hotels: Vec<Hotel>,
}

/// 新增/编辑酒店时的表单输入，payload 仍是用户输入的原始文本
#[derive(Debug, Clone, Default)]
pub struct HotelForm {
    pub name: String,
    pub company_id: String,
    pub payload: String,
}

impl HotelForm {
    /// 校验表单并转换为 `Hotel`
    ///
    /// 名称、company_id、payload 都必须非空，payload 必须是合法 JSON。
    pub fn validate(&self) -> Result<Hotel, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField { field: "酒店名称" });
        }
        let company_id = self.company_id.trim();
        if company_id.is_empty() {
            return Err(ValidationError::MissingField {
                field: "company_id",
            });
        }
        if self.payload.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "payload" });
        }
        let payload: Value = serde_json::from_str(&self.payload)
            .map_err(|e| ValidationError::InvalidPayload { source: e })?;

        Ok(Hotel::new(name, company_id, payload))
    }
}
