//! 酒店服务 - 业务能力层
//!
//! 只负责酒店列表的增删改查。表单在本地校验（含 JSON payload），
//! 校验失败不会发起请求。

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::{Hotel, HotelForm};
use tracing::info;

/// 酒店服务
pub struct HotelService {
    client: ApiClient,
}

impl HotelService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 管理端酒店列表（含 payload）
    pub async fn list(&self) -> AppResult<Vec<Hotel>> {
        self.client.get_admin_hotels().await
    }

    /// 按名称查找
    pub async fn find(&self, name: &str) -> AppResult<Option<Hotel>> {
        let hotels = self.list().await?;
        Ok(hotels.into_iter().find(|h| h.name == name))
    }

    pub async fn add(&self, form: &HotelForm) -> AppResult<Hotel> {
        let hotel = form.validate()?;
        self.client.add_hotel(&hotel).await?;
        info!("✓ 酒店已添加: {} ({})", hotel.name, hotel.company_id);
        Ok(hotel)
    }

    /// 更新酒店，`original_name` 为修改前的名称
    pub async fn update(&self, original_name: &str, form: &HotelForm) -> AppResult<Hotel> {
        let hotel = form.validate()?;
        self.client.update_hotel(original_name, &hotel).await?;
        info!("✓ 酒店已更新: {}", original_name);
        Ok(hotel)
    }

    pub async fn delete(&self, name: &str) -> AppResult<()> {
        self.client.delete_hotel(name).await?;
        info!("✓ 酒店已删除: {}", name);
        Ok(())
    }
}
