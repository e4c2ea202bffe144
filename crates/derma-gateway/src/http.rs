//! HTTP网关实现
//!
//! 按后端服务的REST接口封装五个诊断操作。非成功状态码与传输错误
//! 统一转换为网关错误，由调用方决定如何呈现；不做重试。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use derma_core::{DermaError, Result};

use crate::types::{
    CommunicationSummary, ConversationInput, DiagnosisRequest, DiagnosisResponse, LatestSummary,
    PatientDiagnoses,
};
use crate::DiagnosisGateway;

/// HTTP网关配置
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// 后端服务地址
    pub endpoint: String,
    /// 单次请求超时
    pub request_timeout: Duration,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP网关
pub struct HttpGateway {
    config: HttpGatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DermaError::Gateway(format!("failed to build http client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("Gateway GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DermaError::Gateway(format!("request to {} failed: {}", url, e)))?;

        Self::decode(&url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(DermaError::Gateway(format!("{} returned status {}", url, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DermaError::Gateway(format!("invalid response from {}: {}", url, e)))
    }
}

#[async_trait]
impl DiagnosisGateway for HttpGateway {
    async fn submit_diagnosis(&self, request: &DiagnosisRequest) -> Result<DiagnosisResponse> {
        let url = self.url("/diagnose");
        debug!("Gateway POST {} for patient {}", url, request.patient_id);

        let image = reqwest::multipart::Part::bytes(request.image_data.clone())
            .file_name(request.image_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", image)
            .text("patient_name", request.patient_name.clone())
            .text("patient_age", request.patient_age.to_string())
            .text("patient_id", request.patient_id.clone())
            .text("patient_sex", request.patient_sex.clone())
            .text("anatomy_site", request.anatomy_site.clone());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DermaError::Gateway(format!("request to {} failed: {}", url, e)))?;

        let parsed: DiagnosisResponse = Self::decode(&url, response).await?;
        parsed.validate()?;
        Ok(parsed)
    }

    async fn summarize_conversation(&self, input: &ConversationInput) -> Result<CommunicationSummary> {
        let url = self.url("/summarize");
        debug!("Gateway POST {} for patient {}", url, input.patient_id);

        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|e| DermaError::Gateway(format!("request to {} failed: {}", url, e)))?;

        Self::decode(&url, response).await
    }

    async fn fetch_latest_summary(&self, patient_id: &str) -> Result<LatestSummary> {
        self.get_json(&format!("/summary/{}", patient_id)).await
    }

    async fn fetch_all_diagnoses(&self) -> Result<PatientDiagnoses> {
        self.get_json("/diagnoses").await
    }

    async fn fetch_diagnosis(&self, patient_id: &str) -> Result<DiagnosisResponse> {
        let parsed: DiagnosisResponse = self.get_json(&format!("/diagnosis/{}", patient_id)).await?;
        parsed.validate()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let gateway = HttpGateway::new(HttpGatewayConfig {
            endpoint: "http://localhost:8000/".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(gateway.url("/diagnoses"), "http://localhost:8000/diagnoses");
        assert_eq!(gateway.url("/summary/P001"), "http://localhost:8000/summary/P001");
    }
}
