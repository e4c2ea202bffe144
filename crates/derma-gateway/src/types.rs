//! 网关请求与响应类型
//!
//! 与后端服务交互的显式数据结构。响应在边界处完成校验，
//! 再转换为诊断记录进入存储。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use derma_core::{AnatomSite, DermaError, Diagnosis, DiagnosisRecord, Result, Sex};

/// 诊断提交请求
#[derive(Debug, Clone)]
pub struct DiagnosisRequest {
    /// 病变图像文件名
    pub image_name: String,
    /// 病变图像内容
    pub image_data: Vec<u8>,
    pub patient_name: String,
    pub patient_age: f64,
    pub patient_id: String,
    pub patient_sex: String,
    pub anatomy_site: String,
}

impl DiagnosisRequest {
    /// 发起网关调用前的入参校验
    pub fn validate(&self) -> Result<()> {
        if self.patient_id.trim().is_empty() {
            return Err(DermaError::Validation("patient_id is required".to_string()));
        }
        if self.patient_name.trim().is_empty() {
            return Err(DermaError::Validation("patient_name is required".to_string()));
        }
        if self.image_data.is_empty() {
            return Err(DermaError::Validation("diagnosis image is required".to_string()));
        }
        if !self.patient_age.is_finite() || self.patient_age < 0.0 {
            return Err(DermaError::Validation(format!(
                "invalid patient age: {}",
                self.patient_age
            )));
        }
        Ok(())
    }
}

/// 诊断结果响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    pub total_diagnosis_summary: String,
    pub diagnosis: Diagnosis,
    pub medical_image_id: i64,
    pub ai_description: String,
    pub confidence_score: f64,
}

impl DiagnosisResponse {
    /// 边界校验：拒绝超出范围的置信度
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(DermaError::Gateway(format!(
                "confidence score out of range: {}",
                self.confidence_score
            )));
        }
        Ok(())
    }

    /// 由提交请求与本次诊断结果构造一条新记录
    pub fn to_record(&self, request: &DiagnosisRequest) -> DiagnosisRecord {
        DiagnosisRecord::new(
            request.image_name.clone(),
            request.patient_id.clone(),
            Sex::parse(&request.patient_sex),
            request.patient_age,
            AnatomSite::parse(&request.anatomy_site),
            self.diagnosis,
        )
        .with_patient_name(request.patient_name.clone())
    }
}

/// 语音转写对话输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationInput {
    pub patient_id: String,
    pub conversation: String,
}

impl ConversationInput {
    pub fn validate(&self) -> Result<()> {
        if self.patient_id.trim().is_empty() {
            return Err(DermaError::Validation("patient_id is required".to_string()));
        }
        if self.conversation.trim().is_empty() {
            return Err(DermaError::Validation("conversation is empty".to_string()));
        }
        Ok(())
    }
}

/// 诊疗沟通摘要
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommunicationSummary {
    pub doctor_notes: String,
    pub patient_concerns: String,
    pub care_plan: String,
    pub prescription: String,
}

/// 患者最新诊疗摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestSummary {
    pub patient_id: String,
    pub latest_summary: CommunicationSummary,
    pub created_at: DateTime<Utc>,
}

/// 批量诊断条目，携带所属患者信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub anatom_site_general_challenge: Option<AnatomSite>,
    #[serde(default)]
    pub location: Option<AnatomSite>,
    #[serde(default)]
    pub benign_malignant: Option<Diagnosis>,
    pub age_approx: f64,
    pub confidence_score: f64,
    pub diagnosed_by: String,
    pub diagnosed_at: DateTime<Utc>,
}

impl DiagnosisEntry {
    /// 转换为可入库的诊断记录
    ///
    /// 批量拉取的条目没有关联图像与性别信息，分别以空名与Unknown入库。
    pub fn into_record(self) -> DiagnosisRecord {
        let site = self
            .anatom_site_general_challenge
            .or(self.location)
            .unwrap_or_else(|| AnatomSite::Other(String::new()));
        let diagnosis = self.benign_malignant.unwrap_or(Diagnosis::Pending);

        let record = DiagnosisRecord::new(
            String::new(),
            self.patient_id,
            Sex::Unknown,
            self.age_approx,
            site,
            diagnosis,
        );
        match self.patient_name {
            Some(name) => record.with_patient_name(name),
            None => record,
        }
    }
}

/// 全量诊断记录响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDiagnoses {
    pub patient_id: String,
    pub patient_name: String,
    pub diagnoses: Vec<DiagnosisEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> DiagnosisRequest {
        DiagnosisRequest {
            image_name: "lesion.jpg".to_string(),
            image_data: vec![0xFF, 0xD8],
            patient_name: "John Doe".to_string(),
            patient_age: 45.0,
            patient_id: "P001".to_string(),
            patient_sex: "male".to_string(),
            anatomy_site: "head/neck".to_string(),
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(valid_request().validate().is_ok());

        let mut missing_id = valid_request();
        missing_id.patient_id = "  ".to_string();
        assert!(matches!(missing_id.validate(), Err(DermaError::Validation(_))));

        let mut missing_image = valid_request();
        missing_image.image_data.clear();
        assert!(matches!(missing_image.validate(), Err(DermaError::Validation(_))));

        let mut negative_age = valid_request();
        negative_age.patient_age = -1.0;
        assert!(matches!(negative_age.validate(), Err(DermaError::Validation(_))));
    }

    #[test]
    fn test_response_confidence_bounds() {
        let mut response = DiagnosisResponse {
            total_diagnosis_summary: String::new(),
            diagnosis: Diagnosis::Benign,
            medical_image_id: 1,
            ai_description: String::new(),
            confidence_score: 0.9,
        };
        assert!(response.validate().is_ok());

        response.confidence_score = 1.2;
        assert!(matches!(response.validate(), Err(DermaError::Gateway(_))));
    }

    #[test]
    fn test_response_to_record_derives_fields() {
        let request = valid_request();
        let response = DiagnosisResponse {
            total_diagnosis_summary: String::new(),
            diagnosis: Diagnosis::Malignant,
            medical_image_id: 10001,
            ai_description: String::new(),
            confidence_score: 0.87,
        };

        let record = response.to_record(&request);
        assert_eq!(record.patient_id, "P001");
        assert_eq!(record.patient_name.as_deref(), Some("John Doe"));
        assert_eq!(record.image_name, "lesion.jpg");
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.anatom_site, AnatomSite::HeadNeck);
        assert_eq!(record.target, 1);
        assert_eq!(record.benign_malignant, Diagnosis::Malignant);
    }

    #[test]
    fn test_entry_into_record_handles_missing_fields() {
        let entry = DiagnosisEntry {
            patient_id: "P002".to_string(),
            patient_name: None,
            anatom_site_general_challenge: None,
            location: Some(AnatomSite::Torso),
            benign_malignant: None,
            age_approx: 38.0,
            confidence_score: 0.8,
            diagnosed_by: "AI_MODEL".to_string(),
            diagnosed_at: Utc::now(),
        };

        let record = entry.into_record();
        assert_eq!(record.anatom_site, AnatomSite::Torso);
        assert_eq!(record.diagnosis, Diagnosis::Pending);
        assert_eq!(record.target, 0);
        assert_eq!(record.sex, Sex::Unknown);
        assert!(record.image_name.is_empty());
    }

    #[test]
    fn test_unknown_diagnosis_label_rejected_at_boundary() {
        let raw = serde_json::json!({
            "total_diagnosis_summary": "",
            "diagnosis": "suspicious",
            "medical_image_id": 1,
            "ai_description": "",
            "confidence_score": 0.9
        });
        assert!(serde_json::from_value::<DiagnosisResponse>(raw).is_err());
    }
}
