//! Mock网关实现
//!
//! 开发与测试环境下的模拟服务：随机种子可注入，固定种子下输出可复现；
//! 人工延迟可整体关闭。返回数据与真实服务同构。

use std::ops::Range;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::debug;

use derma_core::{AnatomSite, DermaError, Diagnosis, Result};

use crate::types::{
    CommunicationSummary, ConversationInput, DiagnosisEntry, DiagnosisRequest, DiagnosisResponse,
    LatestSummary, PatientDiagnoses,
};
use crate::DiagnosisGateway;

/// Mock网关配置
#[derive(Debug, Clone)]
pub struct MockGatewayConfig {
    /// 随机种子
    pub seed: u64,
    /// 是否模拟网络延迟
    pub latency_enabled: bool,
}

impl Default for MockGatewayConfig {
    fn default() -> Self {
        Self { seed: 42, latency_enabled: true }
    }
}

/// Mock网关
pub struct MockGateway {
    config: MockGatewayConfig,
    rng: Mutex<StdRng>,
}

// ========== 固定患者与文案 ==========

struct MockPatient {
    patient_id: &'static str,
    patient_name: &'static str,
    age: f64,
}

const MOCK_PATIENTS: [MockPatient; 3] = [
    MockPatient { patient_id: "P001", patient_name: "John Doe", age: 45.0 },
    MockPatient { patient_id: "P002", patient_name: "Jane Smith", age: 38.0 },
    MockPatient { patient_id: "P003", patient_name: "Michael Park", age: 52.0 },
];

const MOCK_BODY_SITES: [&str; 6] =
    ["head/neck", "torso", "upper extremity", "lower extremity", "face", "back"];

fn canned_summary(index: usize) -> CommunicationSummary {
    match index {
        0 => CommunicationSummary {
            doctor_notes: "Visual examination of the reported lesion shows atypical features"
                .to_string(),
            patient_concerns: "Worried about recent growth and color change of the lesion"
                .to_string(),
            care_plan: "Confirm diagnosis via biopsy before deciding on treatment".to_string(),
            prescription: "Anti-inflammatory ointment, follow-up visit in two weeks".to_string(),
        },
        1 => CommunicationSummary {
            doctor_notes: "Presumed benign lesion, border changes need monitoring".to_string(),
            patient_concerns: "Anxiety over family history and possibility of recurrence"
                .to_string(),
            care_plan: "Regular observation and self-examination education".to_string(),
            prescription: "Moisturizer use and strict sun protection advised".to_string(),
        },
        _ => CommunicationSummary {
            doctor_notes: "Appears to be inflammatory skin condition, no sign of infection"
                .to_string(),
            patient_concerns: "Asked whether work stress could worsen the skin condition"
                .to_string(),
            care_plan: "Lifestyle adjustment and stress management counseling".to_string(),
            prescription: "Short course of steroid ointment plus antihistamines".to_string(),
        },
    }
}

fn latest_summary_for(patient_id: &str) -> CommunicationSummary {
    match patient_id {
        "P001" => CommunicationSummary {
            doctor_notes: "Atypical features on visual examination: irregular borders and \
                           uneven pigmentation"
                .to_string(),
            patient_concerns: "Ongoing anxiety about recent growth, color change and family \
                               history"
                .to_string(),
            care_plan: "Biopsy to confirm diagnosis, referral to dermatology specialist planned"
                .to_string(),
            prescription: "Anti-inflammatory ointment, follow-up in two weeks, strict sun \
                           protection"
                .to_string(),
        },
        "P002" => CommunicationSummary {
            doctor_notes: "Presumed benign lesion without inflammation; size changes must be \
                           monitored"
                .to_string(),
            patient_concerns: "Asked about work stress effects and cosmetic product precautions"
                .to_string(),
            care_plan: "Regular observation, self-examination education and lifestyle counseling"
                .to_string(),
            prescription: "Moisturizer recommended, short-term steroid ointment, antihistamines \
                           as needed"
                .to_string(),
        },
        "P003" => CommunicationSummary {
            doctor_notes: "Inflammatory skin condition without infection, responding well to \
                           current treatment"
                .to_string(),
            patient_concerns: "Concerned about recurrence from occupational exposure, requested \
                               prevention guidance"
                .to_string(),
            care_plan: "Continue current treatment with monthly follow-up, discuss workplace \
                        improvements"
                .to_string(),
            prescription: "Keep existing prescription, wear protective equipment, return \
                           immediately if worsening"
                .to_string(),
        },
        _ => CommunicationSummary {
            doctor_notes: "General skin findings from routine checkup".to_string(),
            patient_concerns: "General questions about overall skin health".to_string(),
            care_plan: "Regular observation and general health management".to_string(),
            prescription: "General skin care guidance provided".to_string(),
        },
    }
}

// ========== 网关实现 ==========

impl MockGateway {
    pub fn new(config: MockGatewayConfig) -> Self {
        let rng = Mutex::new(StdRng::seed_from_u64(config.seed));
        Self { config, rng }
    }

    /// 以给定种子创建延迟开启的Mock网关
    pub fn with_seed(seed: u64) -> Self {
        Self::new(MockGatewayConfig { seed, ..MockGatewayConfig::default() })
    }

    /// 在给定区间内随机延迟（毫秒）
    async fn simulate_delay(&self, millis: Range<u64>) {
        if !self.config.latency_enabled {
            return;
        }
        let delay = { self.rng.lock().await.gen_range(millis) };
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    /// 固定时长延迟（毫秒）
    async fn fixed_delay(&self, millis: u64) {
        if !self.config.latency_enabled {
            return;
        }
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    fn summary_text(patient_name: &str, anatomy_site: &str, diagnosis: Diagnosis) -> Result<String> {
        let (treatment, care_plan) = if diagnosis.is_malignant() {
            (
                "Biopsy and specialist consultation required, further detailed examination recommended",
                "Dermatology referral, MRI/CT scan, treatment planning",
            )
        } else {
            (
                "Presumed benign lesion, observation and regular checkups recommended",
                "Re-examination in 3 months, continued self-monitoring",
            )
        };

        let summary = serde_json::json!({
            "patient_state": format!(
                "Skin lesion examination completed for {} at site {}",
                patient_name, anatomy_site
            ),
            "treatment": treatment,
            "care_plan": care_plan,
        });
        serde_json::to_string_pretty(&summary).map_err(DermaError::from)
    }
}

#[async_trait]
impl DiagnosisGateway for MockGateway {
    async fn submit_diagnosis(&self, request: &DiagnosisRequest) -> Result<DiagnosisResponse> {
        debug!("Mock gateway: diagnose request for patient {}", request.patient_id);
        self.simulate_delay(1000..3000).await;

        // 30%概率判为恶性，置信度0.7~1.0
        let (is_malignant, confidence, image_id) = {
            let mut rng = self.rng.lock().await;
            (
                rng.gen::<f64>() > 0.7,
                0.7 + rng.gen::<f64>() * 0.3,
                rng.gen_range(1..=1000),
            )
        };
        let diagnosis = if is_malignant { Diagnosis::Malignant } else { Diagnosis::Benign };

        Ok(DiagnosisResponse {
            total_diagnosis_summary: Self::summary_text(
                &request.patient_name,
                &request.anatomy_site,
                diagnosis,
            )?,
            diagnosis,
            medical_image_id: image_id,
            ai_description: format!(
                "AI model classified the lesion as {} with confidence {:.1}%",
                diagnosis,
                confidence * 100.0
            ),
            confidence_score: confidence,
        })
    }

    async fn summarize_conversation(&self, input: &ConversationInput) -> Result<CommunicationSummary> {
        debug!("Mock gateway: summary request for patient {}", input.patient_id);
        self.simulate_delay(1000..2000).await;

        let index = { self.rng.lock().await.gen_range(0..3) };
        Ok(canned_summary(index))
    }

    async fn fetch_latest_summary(&self, patient_id: &str) -> Result<LatestSummary> {
        debug!("Mock gateway: latest summary lookup for patient {}", patient_id);
        self.fixed_delay(500).await;

        // 生成时间取最近7天内的随机时刻
        let age_millis = { self.rng.lock().await.gen_range(0..7 * 24 * 60 * 60 * 1000i64) };
        Ok(LatestSummary {
            patient_id: patient_id.to_string(),
            latest_summary: latest_summary_for(patient_id),
            created_at: Utc::now() - TimeDelta::milliseconds(age_millis),
        })
    }

    async fn fetch_all_diagnoses(&self) -> Result<PatientDiagnoses> {
        debug!("Mock gateway: full diagnosis listing");
        self.fixed_delay(800).await;

        let now = Utc::now();
        let mut diagnoses = Vec::new();
        let mut rng = self.rng.lock().await;

        for (patient_index, patient) in MOCK_PATIENTS.iter().enumerate() {
            // 每位患者3~5条历史诊断
            let count = rng.gen_range(3..=5);
            for entry_index in 0..count {
                let site = MOCK_BODY_SITES[rng.gen_range(0..MOCK_BODY_SITES.len())];
                let is_malignant = rng.gen::<f64>() > 0.7;
                let age_shift = rng.gen_range(0..10) as f64 - 5.0;
                let confidence = (0.7 + rng.gen::<f64>() * 0.25).clamp(0.7, 0.95);

                diagnoses.push(DiagnosisEntry {
                    patient_id: patient.patient_id.to_string(),
                    patient_name: Some(patient.patient_name.to_string()),
                    anatom_site_general_challenge: Some(AnatomSite::parse(site)),
                    location: Some(AnatomSite::parse(site)),
                    benign_malignant: Some(if is_malignant {
                        Diagnosis::Malignant
                    } else {
                        Diagnosis::Benign
                    }),
                    age_approx: patient.age + age_shift,
                    confidence_score: confidence,
                    diagnosed_by: "AI_MODEL".to_string(),
                    diagnosed_at: now
                        - TimeDelta::days(patient_index as i64 * 7)
                        - TimeDelta::days(entry_index as i64 * 2),
                });
            }
        }

        Ok(PatientDiagnoses {
            patient_id: MOCK_PATIENTS[0].patient_id.to_string(),
            patient_name: MOCK_PATIENTS[0].patient_name.to_string(),
            diagnoses,
        })
    }

    async fn fetch_diagnosis(&self, patient_id: &str) -> Result<DiagnosisResponse> {
        debug!("Mock gateway: diagnosis lookup for patient {}", patient_id);
        self.fixed_delay(600).await;

        let response = match patient_id {
            "P001" => DiagnosisResponse {
                total_diagnosis_summary: Self::summary_text("John Doe", "head/neck", Diagnosis::Malignant)?,
                diagnosis: Diagnosis::Malignant,
                medical_image_id: 10001,
                ai_description: "AI analysis indicates a likely malignant lesion; atypical shape \
                                 and pigmentation pattern observed"
                    .to_string(),
                confidence_score: 0.87,
            },
            "P002" => DiagnosisResponse {
                total_diagnosis_summary: Self::summary_text("Jane Smith", "torso", Diagnosis::Benign)?,
                diagnosis: Diagnosis::Benign,
                medical_image_id: 10002,
                ai_description: "AI analysis indicates a benign lesion; regular borders and \
                                 uniform pigment distribution confirmed"
                    .to_string(),
                confidence_score: 0.93,
            },
            "P003" => DiagnosisResponse {
                total_diagnosis_summary: Self::summary_text("Michael Park", "upper extremity", Diagnosis::Benign)?,
                diagnosis: Diagnosis::Benign,
                medical_image_id: 10003,
                ai_description: "AI analysis indicates an inflammatory benign lesion; good \
                                 response to treatment expected"
                    .to_string(),
                confidence_score: 0.81,
            },
            _ => {
                let (confidence, image_id) = {
                    let mut rng = self.rng.lock().await;
                    (0.75 + rng.gen::<f64>() * 0.2, rng.gen_range(1..=1000))
                };
                DiagnosisResponse {
                    total_diagnosis_summary: Self::summary_text("Unknown patient", "unspecified", Diagnosis::Benign)?,
                    diagnosis: Diagnosis::Benign,
                    medical_image_id: image_id,
                    ai_description: "AI analysis indicates skin findings within normal range"
                        .to_string(),
                    confidence_score: confidence,
                }
            }
        };

        response.validate()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_gateway(seed: u64) -> MockGateway {
        MockGateway::new(MockGatewayConfig { seed, latency_enabled: false })
    }

    fn test_request() -> DiagnosisRequest {
        DiagnosisRequest {
            image_name: "lesion.jpg".to_string(),
            image_data: vec![1, 2, 3],
            patient_name: "John Doe".to_string(),
            patient_age: 45.0,
            patient_id: "P001".to_string(),
            patient_sex: "male".to_string(),
            anatomy_site: "head/neck".to_string(),
        }
    }

    #[tokio::test]
    async fn test_diagnose_is_deterministic_for_fixed_seed() {
        let request = test_request();

        let first = test_gateway(7).submit_diagnosis(&request).await.unwrap();
        let second = test_gateway(7).submit_diagnosis(&request).await.unwrap();

        assert_eq!(first.diagnosis, second.diagnosis);
        assert_eq!(first.medical_image_id, second.medical_image_id);
        assert!((first.confidence_score - second.confidence_score).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_diagnose_respects_ranges() {
        let gateway = test_gateway(11);
        for _ in 0..20 {
            let response = gateway.submit_diagnosis(&test_request()).await.unwrap();
            assert!(response.validate().is_ok());
            assert!((0.7..=1.0).contains(&response.confidence_score));
            assert!((1..=1000).contains(&response.medical_image_id));
            assert_ne!(response.diagnosis, Diagnosis::Pending);
        }
    }

    #[tokio::test]
    async fn test_fetch_all_diagnoses_counts() {
        let listing = test_gateway(3).fetch_all_diagnoses().await.unwrap();

        // 3位患者，每人3~5条
        assert!((9..=15).contains(&listing.diagnoses.len()));
        assert_eq!(listing.patient_id, "P001");

        for entry in &listing.diagnoses {
            assert!((0.7..=0.95).contains(&entry.confidence_score));
            assert_eq!(entry.diagnosed_by, "AI_MODEL");
            assert!(entry.benign_malignant.is_some());
        }
    }

    #[tokio::test]
    async fn test_fetch_diagnosis_known_patients() {
        let gateway = test_gateway(5);

        let p001 = gateway.fetch_diagnosis("P001").await.unwrap();
        assert_eq!(p001.diagnosis, Diagnosis::Malignant);
        assert_eq!(p001.medical_image_id, 10001);

        let p002 = gateway.fetch_diagnosis("P002").await.unwrap();
        assert_eq!(p002.diagnosis, Diagnosis::Benign);
        assert!((p002.confidence_score - 0.93).abs() < f64::EPSILON);

        let unknown = gateway.fetch_diagnosis("P999").await.unwrap();
        assert_eq!(unknown.diagnosis, Diagnosis::Benign);
        assert!((0.75..=0.95).contains(&unknown.confidence_score));
    }

    #[tokio::test]
    async fn test_latest_summary_per_patient_map() {
        let gateway = test_gateway(9);

        let known = gateway.fetch_latest_summary("P003").await.unwrap();
        assert_eq!(known.patient_id, "P003");
        assert!(known.latest_summary.doctor_notes.contains("Inflammatory"));

        let fallback = gateway.fetch_latest_summary("P777").await.unwrap();
        assert_eq!(fallback.latest_summary, latest_summary_for("anyone-else"));
        assert!(fallback.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_summarize_returns_canned_summary() {
        let gateway = test_gateway(1);
        let input = ConversationInput {
            patient_id: "P001".to_string(),
            conversation: "Doctor: how long has the lesion been there?".to_string(),
        };

        let summary = gateway.summarize_conversation(&input).await.unwrap();
        let all = [canned_summary(0), canned_summary(1), canned_summary(2)];
        assert!(all.contains(&summary));
    }
}
