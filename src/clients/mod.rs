pub mod api_client;

pub use api_client::ApiClient;

use crate::error::AppResult;
use crate::models::AnalysisResponse;
use crate::workflow::BatchRequest;
use async_trait::async_trait;

/// `/ask` 能力
///
/// 流程层只通过这个 trait 访问后端，测试中可以替换为本地桩实现。
#[async_trait]
pub trait AskBackend: Send + Sync {
    async fn ask(&self, request: &BatchRequest) -> AppResult<AnalysisResponse>;
}
