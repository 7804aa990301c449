use serde::{Deserialize, Serialize};

use super::common::PatientInfo;
use super::result::{Severity, ValidationResult};

/// 文档包的财务汇总 (完全由文档与校验结果推导)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_billed: Option<f64>,
    pub total_allowed: Option<f64>,
    pub total_insurance_paid: Option<f64>,
    pub total_patient_responsibility_per_eob: Option<f64>,
    pub total_patient_responsibility_per_bills: Option<f64>,
    pub discrepancy_amount: Option<f64>,
    pub potential_savings: Option<f64>,
    pub flagged_issues: usize,
}

/// 各严重程度的发现数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low + self.info
    }
}

/// 单个文档包的完整校验报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketReport {
    pub packet_id: String,
    pub patient: PatientInfo,
    pub document_count: usize,
    pub validation_results: Vec<ValidationResult>,
    pub severity_counts: SeverityCounts,
    pub financial_summary: FinancialSummary,
    pub recommended_actions: Vec<String>,
}
