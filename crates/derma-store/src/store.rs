//! 诊断记录存储
//!
//! 会话级的内存存储，记录按插入时间倒序保存（最新在前）。
//! 记录只增不改：新的诊断以头部插入的方式加入，整体刷新时一次性替换。

use derma_core::DiagnosisRecord;
use tracing::{debug, info};

/// 记录存储
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<DiagnosisRecord>,
}

impl RecordStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// 以给定记录初始化存储，顺序保持不变
    pub fn with_records(records: Vec<DiagnosisRecord>) -> Self {
        Self { records }
    }

    /// 返回全部记录，最新插入的在最前
    pub fn get_all(&self) -> &[DiagnosisRecord] {
        &self.records
    }

    /// 头部插入一条新记录
    ///
    /// 不做任何校验，入参合法性由调用方保证。
    pub fn append(&mut self, record: DiagnosisRecord) {
        debug!("Appending diagnosis record for patient {}", record.patient_id);
        self.records.insert(0, record);
    }

    /// 整体替换现有记录，不重排输入顺序
    pub fn replace_all(&mut self, records: Vec<DiagnosisRecord>) {
        info!("Replacing record store contents: {} -> {} records", self.records.len(), records.len());
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derma_core::{AnatomSite, Diagnosis, DiagnosisRecord, Sex};

    fn record(patient_id: &str) -> DiagnosisRecord {
        DiagnosisRecord::new(
            "ISIC_TEST",
            patient_id,
            Sex::Male,
            50.0,
            AnatomSite::Torso,
            Diagnosis::Benign,
        )
    }

    #[test]
    fn test_append_returns_reverse_insertion_order() {
        let mut store = RecordStore::new();
        store.append(record("P1"));
        store.append(record("P2"));
        store.append(record("P3"));

        let ids: Vec<&str> = store.get_all().iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P2", "P1"]);
    }

    #[test]
    fn test_append_on_seeded_store() {
        let mut store = RecordStore::with_records(vec![record("A"), record("B")]);
        store.append(record("NEW"));

        let ids: Vec<&str> = store.get_all().iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["NEW", "A", "B"]);
    }

    #[test]
    fn test_replace_all_keeps_given_order() {
        let mut store = RecordStore::with_records(vec![record("OLD")]);
        let replacement = vec![record("X"), record("Y"), record("Z")];
        store.replace_all(replacement.clone());

        assert_eq!(store.get_all(), replacement.as_slice());
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get_all().is_empty());
    }
}
