//! # Derma Gateway
//!
//! 诊断服务的远程网关边界：定义统一的异步接口，
//! 并提供HTTP实现与可复现的Mock实现。

pub mod http;
pub mod mock;
pub mod types;

use async_trait::async_trait;

use derma_core::Result;
pub use types::{
    CommunicationSummary, ConversationInput, DiagnosisRequest, DiagnosisResponse, LatestSummary,
    PatientDiagnoses,
};

/// 诊断网关接口
///
/// 五个操作均可能因网络或服务端原因失败；调用方在调用点捕获错误，
/// 网关本身不做重试。
#[async_trait]
pub trait DiagnosisGateway: Send + Sync {
    /// 提交诊断请求，返回AI诊断结果
    async fn submit_diagnosis(&self, request: &DiagnosisRequest) -> Result<DiagnosisResponse>;

    /// 基于语音转写的对话生成诊疗摘要
    async fn summarize_conversation(&self, input: &ConversationInput) -> Result<CommunicationSummary>;

    /// 查询患者最新诊疗摘要
    async fn fetch_latest_summary(&self, patient_id: &str) -> Result<LatestSummary>;

    /// 查询全部诊断记录
    async fn fetch_all_diagnoses(&self) -> Result<PatientDiagnoses>;

    /// 查询指定患者的诊断结果
    async fn fetch_diagnosis(&self, patient_id: &str) -> Result<DiagnosisResponse>;
}

pub use http::{HttpGateway, HttpGatewayConfig};
pub use mock::{MockGateway, MockGatewayConfig};
pub use types::*;
