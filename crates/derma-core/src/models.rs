//! 核心数据模型定义

use serde::{Deserialize, Serialize};

/// 性别枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[serde(other)]
    Unknown,
}

impl Sex {
    /// 从外部输入解析性别，无法识别时归为Unknown
    pub fn parse(value: &str) -> Sex {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Sex::Male,
            "female" | "f" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// 病变解剖部位
///
/// 数据集中的标准部位为四类，其余自由文本通过Other保留原值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum AnatomSite {
    HeadNeck,
    UpperExtremity,
    LowerExtremity,
    Torso,
    Other(String),
}

impl AnatomSite {
    /// 从线上字段值解析部位
    pub fn parse(value: &str) -> AnatomSite {
        match value.trim().to_ascii_lowercase().as_str() {
            "head/neck" => AnatomSite::HeadNeck,
            "upper extremity" => AnatomSite::UpperExtremity,
            "lower extremity" => AnatomSite::LowerExtremity,
            "torso" => AnatomSite::Torso,
            _ => AnatomSite::Other(value.trim().to_string()),
        }
    }

    /// 部位的线上字段值
    pub fn as_str(&self) -> &str {
        match self {
            AnatomSite::HeadNeck => "head/neck",
            AnatomSite::UpperExtremity => "upper extremity",
            AnatomSite::LowerExtremity => "lower extremity",
            AnatomSite::Torso => "torso",
            AnatomSite::Other(value) => value,
        }
    }
}

impl From<String> for AnatomSite {
    fn from(value: String) -> Self {
        AnatomSite::parse(&value)
    }
}

impl From<AnatomSite> for String {
    fn from(site: AnatomSite) -> Self {
        site.as_str().to_string()
    }
}

impl std::fmt::Display for AnatomSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 诊断结论
///
/// 待定结论在线上以空字符串表示。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Diagnosis {
    #[serde(rename = "benign")]
    Benign,
    #[serde(rename = "malignant")]
    Malignant,
    #[serde(rename = "")]
    Pending,
}

impl Diagnosis {
    /// 二元恶性指示：仅恶性为1
    pub fn target(&self) -> u8 {
        match self {
            Diagnosis::Malignant => 1,
            Diagnosis::Benign | Diagnosis::Pending => 0,
        }
    }

    pub fn is_malignant(&self) -> bool {
        matches!(self, Diagnosis::Malignant)
    }

    /// 结论的线上字段值
    pub fn as_str(&self) -> &str {
        match self {
            Diagnosis::Benign => "benign",
            Diagnosis::Malignant => "malignant",
            Diagnosis::Pending => "",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单次诊断记录
///
/// target、benign_malignant、location为写入时派生的冗余字段，
/// 构造后不再单独修改；记录本身创建后不可变。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisRecord {
    pub image_name: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub sex: Sex,
    pub age_approx: f64,
    #[serde(rename = "anatom_site_general_challenge")]
    pub anatom_site: AnatomSite,
    pub target: u8,
    pub diagnosis: Diagnosis,
    pub benign_malignant: Diagnosis,
    pub location: AnatomSite,
}

impl DiagnosisRecord {
    /// 创建新记录，派生字段在此一次性写入
    pub fn new(
        image_name: impl Into<String>,
        patient_id: impl Into<String>,
        sex: Sex,
        age_approx: f64,
        anatom_site: AnatomSite,
        diagnosis: Diagnosis,
    ) -> Self {
        Self {
            image_name: image_name.into(),
            patient_id: patient_id.into(),
            patient_name: None,
            sex,
            age_approx,
            target: diagnosis.target(),
            location: anatom_site.clone(),
            anatom_site,
            benign_malignant: diagnosis,
            diagnosis,
        }
    }

    /// 附加患者显示姓名
    pub fn with_patient_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_follows_diagnosis() {
        let malignant = DiagnosisRecord::new(
            "ISIC_0000001",
            "IP_0000001",
            Sex::Male,
            60.0,
            AnatomSite::Torso,
            Diagnosis::Malignant,
        );
        assert_eq!(malignant.target, 1);

        let benign = DiagnosisRecord::new(
            "ISIC_0000002",
            "IP_0000002",
            Sex::Female,
            40.0,
            AnatomSite::HeadNeck,
            Diagnosis::Benign,
        );
        assert_eq!(benign.target, 0);

        let pending = DiagnosisRecord::new(
            "",
            "IP_0000003",
            Sex::Unknown,
            50.0,
            AnatomSite::Torso,
            Diagnosis::Pending,
        );
        assert_eq!(pending.target, 0);
    }

    #[test]
    fn test_mirror_fields_set_at_construction() {
        let record = DiagnosisRecord::new(
            "ISIC_0000003",
            "IP_0000003",
            Sex::Female,
            35.0,
            AnatomSite::UpperExtremity,
            Diagnosis::Benign,
        );
        assert_eq!(record.benign_malignant, record.diagnosis);
        assert_eq!(record.location, record.anatom_site);
    }

    #[test]
    fn test_record_wire_format() {
        let record = DiagnosisRecord::new(
            "ISIC_0000004",
            "IP_0000004",
            Sex::Male,
            45.0,
            AnatomSite::HeadNeck,
            Diagnosis::Benign,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["anatom_site_general_challenge"], "head/neck");
        assert_eq!(json["diagnosis"], "benign");
        assert_eq!(json["sex"], "male");
        assert_eq!(json["target"], 0);
        assert!(json.get("patient_name").is_none());
    }

    #[test]
    fn test_pending_diagnosis_serializes_empty() {
        assert_eq!(serde_json::to_value(Diagnosis::Pending).unwrap(), "");
        let parsed: Diagnosis = serde_json::from_value(serde_json::json!("")).unwrap();
        assert_eq!(parsed, Diagnosis::Pending);
    }

    #[test]
    fn test_anatom_site_free_text_roundtrip() {
        let site = AnatomSite::parse("face");
        assert_eq!(site, AnatomSite::Other("face".to_string()));

        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json, "face");

        let parsed: AnatomSite = serde_json::from_value(serde_json::json!("lower extremity")).unwrap();
        assert_eq!(parsed, AnatomSite::LowerExtremity);
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!(Sex::parse("male"), Sex::Male);
        assert_eq!(Sex::parse("F"), Sex::Female);
        assert_eq!(Sex::parse("unspecified"), Sex::Unknown);
    }
}
