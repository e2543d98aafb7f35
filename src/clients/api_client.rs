/// 后端 REST API 客户端
///
/// 封装所有与后端 API 相关的调用逻辑
use crate::clients::AskBackend;
use crate::config::Config;
use crate::error::{ApiError, AppResult};
use crate::models::{AnalysisResponse, Hotel, HotelList, QuestionList};
use crate::workflow::BatchRequest;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// 后端 API 客户端
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    request_timeout: Duration,
    batch_timeout: Duration,
}

/// 错误响应体 `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    /// 创建新的 API 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|_| ApiError::InvalidUrl {
            url: config.api_base_url.clone(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.api_base_url.clone(),
            }
            .into());
        }

        let http = Client::builder()
            .build()
            .map_err(|e| ApiError::RequestFailed {
                endpoint: config.api_base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url,
            request_timeout: config.request_timeout(),
            batch_timeout: config.batch_timeout(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ========== 问题 ==========

    /// 公共问题列表
    pub async fn get_questions(&self) -> AppResult<Vec<String>> {
        let list: QuestionList = self.get_json(&["questions"]).await?;
        Ok(list.questions)
    }

    /// 管理端问题列表
    pub async fn get_admin_questions(&self) -> AppResult<Vec<String>> {
        let list: QuestionList = self.get_json(&["admin", "questions"]).await?;
        Ok(list.questions)
    }

    pub async fn add_question(&self, question: &str) -> AppResult<()> {
        let request = self
            .request(Method::POST, &["admin", "questions"])?
            .json(&json!({ "question": question }));
        self.send(request, "admin/questions", self.request_timeout)
            .await?;
        Ok(())
    }

    pub async fn update_question(&self, old_question: &str, new_question: &str) -> AppResult<()> {
        let request = self
            .request(Method::PUT, &["admin", "questions", old_question])?
            .json(&json!({ "new_question": new_question }));
        self.send(request, "admin/questions/{question}", self.request_timeout)
            .await?;
        Ok(())
    }

    pub async fn delete_question(&self, question: &str) -> AppResult<()> {
        let request = self.request(Method::DELETE, &["admin", "questions", question])?;
        self.send(request, "admin/questions/{question}", self.request_timeout)
            .await?;
        Ok(())
    }

    // ========== 酒店 ==========

    /// 公共酒店列表（不含 payload）
    pub async fn get_hotels(&self) -> AppResult<Vec<Hotel>> {
        let list: HotelList = self.get_json(&["hotels"]).await?;
        Ok(list.hotels)
    }

    /// 管理端酒店列表（含 payload）
    pub async fn get_admin_hotels(&self) -> AppResult<Vec<Hotel>> {
        let list: HotelList = self.get_json(&["admin", "hotels"]).await?;
        Ok(list.hotels)
    }

    pub async fn add_hotel(&self, hotel: &Hotel) -> AppResult<()> {
        let request = self
            .request(Method::POST, &["admin", "hotels"])?
            .json(hotel);
        self.send(request, "admin/hotels", self.request_timeout)
            .await?;
        Ok(())
    }

    pub async fn update_hotel(&self, hotel_name: &str, hotel: &Hotel) -> AppResult<()> {
        let request = self
            .request(Method::PUT, &["admin", "hotels", hotel_name])?
            .json(hotel);
        self.send(request, "admin/hotels/{name}", self.request_timeout)
            .await?;
        Ok(())
    }

    pub async fn delete_hotel(&self, hotel_name: &str) -> AppResult<()> {
        let request = self.request(Method::DELETE, &["admin", "hotels", hotel_name])?;
        self.send(request, "admin/hotels/{name}", self.request_timeout)
            .await?;
        Ok(())
    }

    // ========== 分析与报表 ==========

    /// 向后端提问，单次调用使用批次超时
    pub async fn ask(&self, request: &BatchRequest) -> AppResult<AnalysisResponse> {
        debug!(
            "POST /ask: {} 个问题 x {} 个酒店",
            request.questions.len(),
            request.hotels.len()
        );
        let builder = self.request(Method::POST, &["ask"])?.json(request);
        let bytes = self.send(builder, "ask", self.batch_timeout).await?;
        decode("ask", &bytes)
    }

    /// 生成报表，返回表格文件的原始字节
    pub async fn generate_report(&self, response: &AnalysisResponse) -> AppResult<Vec<u8>> {
        let builder = self.request(Method::POST, &["report"])?.json(response);
        let bytes = self.send(builder, "report", self.request_timeout).await?;
        Ok(bytes)
    }

    // ========== 内部辅助 ==========

    /// 拼接 URL，每一段都会被百分号编码
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.http.request(method, url))
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let endpoint = segments.join("/");
        let request = self.request(Method::GET, segments)?;
        let bytes = self.send(request, &endpoint, self.request_timeout).await?;
        decode(&endpoint, &bytes)
    }

    /// 发送请求，非 2xx 响应转换为 `ApiError::BadResponse`
    async fn send(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        timeout: Duration,
    ) -> AppResult<Vec<u8>> {
        let timeout_secs = timeout.as_secs();
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, timeout_secs, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, timeout_secs, e))?;

        if !status.is_success() {
            return Err(bad_response(endpoint, status, &bytes).into());
        }

        debug!("{} -> {} ({} 字节)", endpoint, status, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AskBackend for ApiClient {
    async fn ask(&self, request: &BatchRequest) -> AppResult<AnalysisResponse> {
        ApiClient::ask(self, request).await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> AppResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        ApiError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source: e,
        }
        .into()
    })
}

fn bad_response(endpoint: &str, status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        });

    ApiError::BadResponse {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    }
}
