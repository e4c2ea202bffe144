//! 派生视图计算
//!
//! 基于记录序列的纯函数：分页、搜索、结论过滤与汇总统计。
//! 所有函数不修改输入，相同输入恒得相同输出。

use derma_core::{Diagnosis, DiagnosisRecord};
use serde::{Deserialize, Serialize};

/// 未显式指定时的分页大小
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// 诊断结论过滤器
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    All,
    Benign,
    Malignant,
}

impl OutcomeFilter {
    /// All不对应具体结论，返回None
    fn as_diagnosis(self) -> Option<Diagnosis> {
        match self {
            OutcomeFilter::All => None,
            OutcomeFilter::Benign => Some(Diagnosis::Benign),
            OutcomeFilter::Malignant => Some(Diagnosis::Malignant),
        }
    }
}

/// 汇总统计结果
///
/// 待定结论的记录只计入total。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordCounts {
    pub total: usize,
    pub benign_count: usize,
    pub malignant_count: usize,
}

/// 记录查询条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordQuery {
    /// 搜索关键字
    pub q: Option<String>,
    /// 结论过滤
    #[serde(default)]
    pub outcome: OutcomeFilter,
    /// 页码，从1开始
    pub page: Option<usize>,
    /// 分页大小
    pub page_size: Option<usize>,
}

/// 查询结果页
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage {
    pub records: Vec<DiagnosisRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// 计算总页数（向上取整）
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (len + page_size - 1) / page_size
}

/// 取出指定页的连续切片，页码从1开始
///
/// 超出末页的页码返回空切片，不做就近修正。
pub fn paginate(records: &[DiagnosisRecord], page_size: usize, page_number: usize) -> &[DiagnosisRecord] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

/// 关键字搜索
///
/// 对患者ID、显示姓名（如有）与病变部位做不区分大小写的子串匹配，
/// 空白关键字原样返回输入。
pub fn filter_by_search(records: &[DiagnosisRecord], query: &str) -> Vec<DiagnosisRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches_query(record, &query))
        .cloned()
        .collect()
}

fn matches_query(record: &DiagnosisRecord, query: &str) -> bool {
    record.patient_id.to_lowercase().contains(query)
        || record
            .patient_name
            .as_ref()
            .map_or(false, |name| name.to_lowercase().contains(query))
        || record.anatom_site.as_str().to_lowercase().contains(query)
        || record.location.as_str().to_lowercase().contains(query)
}

/// 按诊断结论过滤，All为恒等变换
pub fn filter_by_outcome(records: &[DiagnosisRecord], outcome: OutcomeFilter) -> Vec<DiagnosisRecord> {
    match outcome.as_diagnosis() {
        None => records.to_vec(),
        Some(diagnosis) => records
            .iter()
            .filter(|record| record.benign_malignant == diagnosis)
            .cloned()
            .collect(),
    }
}

/// 单趟汇总统计
pub fn aggregate_counts(records: &[DiagnosisRecord]) -> RecordCounts {
    let mut counts = RecordCounts {
        total: records.len(),
        benign_count: 0,
        malignant_count: 0,
    };

    for record in records {
        match record.benign_malignant {
            Diagnosis::Benign => counts.benign_count += 1,
            Diagnosis::Malignant => counts.malignant_count += 1,
            Diagnosis::Pending => {}
        }
    }

    counts
}

/// 组合查询：搜索与结论过滤取交集后分页
pub fn query_records(records: &[DiagnosisRecord], query: &RecordQuery) -> RecordPage {
    let searched = filter_by_search(records, query.q.as_deref().unwrap_or(""));
    let filtered = filter_by_outcome(&searched, query.outcome);

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let slice = paginate(&filtered, page_size, page);

    RecordPage {
        records: slice.to_vec(),
        total: filtered.len(),
        page,
        page_size,
        total_pages: total_pages(filtered.len(), page_size),
    }
}
