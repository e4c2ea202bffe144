//! HTTP处理器
//!
//! 看板前端的读写入口：诊断提交与查询走网关，列表、统计与刷新
//! 操作记录存储。网关错误在此捕获并转换为错误响应，不会中断服务。

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{error, info};

use derma_core::{DermaError, DiagnosisRecord};
use derma_gateway::{
    ConversationInput, DiagnosisGateway, DiagnosisRequest, DiagnosisResponse, LatestSummary,
};
use derma_store::{aggregate_counts, query_records, RecordCounts, RecordPage, RecordQuery, RecordStore};

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RecordStore>>,
    pub gateway: Arc<dyn DiagnosisGateway>,
}

impl AppState {
    pub fn new(store: RecordStore, gateway: Arc<dyn DiagnosisGateway>) -> Self {
        Self { store: Arc::new(RwLock::new(store)), gateway }
    }
}

/// HTTP层错误包装
#[derive(Debug)]
pub struct ApiError(DermaError);

impl From<DermaError> for ApiError {
    fn from(error: DermaError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DermaError::Validation(_) => StatusCode::BAD_REQUEST,
            DermaError::NotFound(_) => StatusCode::NOT_FOUND,
            DermaError::Gateway(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": true,
            "message": self.0.to_string(),
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}

/// 患者详情聚合响应
///
/// 诊断与摘要任一成功即可返回，两者同时失败才算错误。
#[derive(Debug, Serialize)]
pub struct PatientHistoryResponse {
    pub patient_id: String,
    pub diagnosis: Option<DiagnosisResponse>,
    pub summary: Option<LatestSummary>,
}

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": "0.1.0"
    }))
}

/// 提交诊断请求
///
/// 先做入参校验，再调用网关；成功的诊断以新记录形式进入存储，
/// 网关失败时存储保持不变。
pub async fn diagnose(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResponse>, ApiError> {
    let request = parse_diagnosis_request(multipart).await?;
    request.validate()?;

    info!("Submitting diagnosis for patient {}", request.patient_id);
    let response = match state.gateway.submit_diagnosis(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Diagnosis request failed for patient {}: {}", request.patient_id, e);
            return Err(ApiError::from(e));
        }
    };

    state.store.write().await.append(response.to_record(&request));
    Ok(Json(response))
}

/// 读取multipart表单中的诊断请求字段
async fn parse_diagnosis_request(mut multipart: Multipart) -> Result<DiagnosisRequest, ApiError> {
    let mut request = DiagnosisRequest {
        image_name: String::new(),
        image_data: Vec::new(),
        patient_name: String::new(),
        patient_age: 0.0,
        patient_id: String::new(),
        patient_sex: String::new(),
        anatomy_site: String::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DermaError::Validation(format!("invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                request.image_name = field.file_name().unwrap_or_default().to_string();
                request.image_data = field
                    .bytes()
                    .await
                    .map_err(|e| DermaError::Validation(format!("failed to read image: {}", e)))?
                    .to_vec();
            }
            "patient_name" => request.patient_name = read_text(field).await?,
            "patient_age" => {
                let raw = read_text(field).await?;
                request.patient_age = raw
                    .trim()
                    .parse()
                    .map_err(|_| DermaError::Validation(format!("invalid patient age: {}", raw)))?;
            }
            "patient_id" => request.patient_id = read_text(field).await?,
            "patient_sex" => request.patient_sex = read_text(field).await?,
            "anatomy_site" => request.anatomy_site = read_text(field).await?,
            _ => {}
        }
    }

    Ok(request)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::from(DermaError::Validation(format!("invalid form field: {}", e))))
}

/// 生成对话摘要
pub async fn summarize(
    State(state): State<AppState>,
    Json(input): Json<ConversationInput>,
) -> Result<impl IntoResponse, ApiError> {
    input.validate()?;

    info!("Summarizing conversation for patient {}", input.patient_id);
    match state.gateway.summarize_conversation(&input).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            error!("Conversation summary failed for patient {}: {}", input.patient_id, e);
            Err(ApiError::from(e))
        }
    }
}

/// 查询患者最新诊疗摘要
pub async fn get_latest_summary(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<LatestSummary>, ApiError> {
    let summary = state.gateway.fetch_latest_summary(&patient_id).await.map_err(|e| {
        error!("Latest summary lookup failed for patient {}: {}", patient_id, e);
        ApiError::from(e)
    })?;
    Ok(Json(summary))
}

/// 查询指定患者的诊断结果
pub async fn get_diagnosis(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<DiagnosisResponse>, ApiError> {
    let diagnosis = state.gateway.fetch_diagnosis(&patient_id).await.map_err(|e| {
        error!("Diagnosis lookup failed for patient {}: {}", patient_id, e);
        ApiError::from(e)
    })?;
    Ok(Json(diagnosis))
}

/// 患者详情：诊断与摘要并发获取
pub async fn patient_history(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientHistoryResponse>, ApiError> {
    let (diagnosis, summary) = tokio::join!(
        state.gateway.fetch_diagnosis(&patient_id),
        state.gateway.fetch_latest_summary(&patient_id),
    );

    let diagnosis = match diagnosis {
        Ok(value) => Some(value),
        Err(e) => {
            error!("History diagnosis fetch failed for patient {}: {}", patient_id, e);
            None
        }
    };
    let summary = match summary {
        Ok(value) => Some(value),
        Err(e) => {
            error!("History summary fetch failed for patient {}: {}", patient_id, e);
            None
        }
    };

    if diagnosis.is_none() && summary.is_none() {
        return Err(ApiError::from(DermaError::Gateway(format!(
            "failed to load any data for patient {}",
            patient_id
        ))));
    }

    Ok(Json(PatientHistoryResponse { patient_id, diagnosis, summary }))
}

/// 查询记录列表（搜索、过滤、分页）
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Json<RecordPage> {
    let store = state.store.read().await;
    Json(query_records(store.get_all(), &query))
}

/// 记录汇总统计
pub async fn record_stats(State(state): State<AppState>) -> Json<RecordCounts> {
    let store = state.store.read().await;
    Json(aggregate_counts(store.get_all()))
}

/// 以网关数据整体刷新记录存储
pub async fn refresh_records(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let listing = state.gateway.fetch_all_diagnoses().await.map_err(|e| {
        error!("Record refresh failed: {}", e);
        ApiError::from(e)
    })?;

    let records: Vec<DiagnosisRecord> =
        listing.diagnoses.into_iter().map(|entry| entry.into_record()).collect();
    let count = records.len();
    state.store.write().await.replace_all(records);

    info!("Record store refreshed with {} fetched records", count);
    Ok(Json(json!({ "replaced": count })))
}

async fn log_requests(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    info!("API request: {} {}", request.method(), request.uri());
    let response = next.run(request).await;
    info!("API response: {}", response.status());
    response
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
        .route("/summarize", post(summarize))
        .route("/summary/:patient_id", get(get_latest_summary))
        .route("/diagnosis/:patient_id", get(get_diagnosis))
        .route("/patients/:patient_id/history", get(patient_history))
        .route("/records", get(list_records))
        .route("/records/stats", get(record_stats))
        .route("/records/refresh", post(refresh_records))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
}
