//! 内置演示数据集
//!
//! 会话启动时预置的ISIC皮肤病变诊断记录，与前端演示表格一致。

use crate::models::{AnatomSite, Diagnosis, DiagnosisRecord, Sex};

/// 演示用的初始诊断记录，顺序即展示顺序
pub fn seed_records() -> Vec<DiagnosisRecord> {
    use AnatomSite::{HeadNeck, LowerExtremity, Torso, UpperExtremity};
    use Diagnosis::{Benign, Malignant};
    use Sex::{Female, Male};

    vec![
        record("ISIC_2637011", "IP_7279968", Male, 45.0, HeadNeck, Benign),
        record("ISIC_0015719", "IP_3075186", Female, 45.0, UpperExtremity, Benign),
        record("ISIC_0052212", "IP_2842074", Female, 50.0, LowerExtremity, Benign),
        record("ISIC_0068279", "IP_6890425", Female, 45.0, HeadNeck, Benign),
        record("ISIC_0074268", "IP_8723313", Female, 55.0, UpperExtremity, Benign),
        record("ISIC_0074311", "IP_2950485", Female, 40.0, LowerExtremity, Benign),
        record("ISIC_0098742", "IP_1234567", Male, 65.0, Torso, Malignant),
        record("ISIC_0102341", "IP_7896543", Male, 70.0, LowerExtremity, Malignant),
        record("ISIC_0112342", "IP_4567890", Female, 35.0, Torso, Benign),
        record("ISIC_0123456", "IP_1112131", Male, 60.0, UpperExtremity, Malignant),
        record("ISIC_0134567", "IP_2223242", Female, 30.0, LowerExtremity, Benign),
        record("ISIC_0145678", "IP_3334353", Male, 85.0, HeadNeck, Malignant),
        record("ISIC_0156789", "IP_4445464", Female, 50.0, Torso, Benign),
        record("ISIC_0167890", "IP_5556575", Male, 42.0, UpperExtremity, Benign),
        record("ISIC_0178901", "IP_6667686", Female, 58.0, LowerExtremity, Malignant),
        record("ISIC_0189012", "IP_7778797", Male, 49.0, HeadNeck, Benign),
        record("ISIC_0190123", "IP_8889908", Female, 64.0, Torso, Malignant),
        record("ISIC_0201234", "IP_9991011", Male, 33.0, UpperExtremity, Benign),
        record("ISIC_0212345", "IP_0001213", Female, 37.0, LowerExtremity, Benign),
        record("ISIC_0223456", "IP_1314151", Male, 55.0, Torso, Malignant),
    ]
}

fn record(
    image_name: &str,
    patient_id: &str,
    sex: Sex,
    age_approx: f64,
    anatom_site: AnatomSite,
    diagnosis: Diagnosis,
) -> DiagnosisRecord {
    DiagnosisRecord::new(image_name, patient_id, sex, age_approx, anatom_site, diagnosis)
}
