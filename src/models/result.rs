use std::fmt;

use serde::{Deserialize, Serialize};

/// 严重程度 (全序: HIGH < MEDIUM < LOW < INFO, 排序时靠前者优先)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// 排序名次, HIGH=0 … INFO=3
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Mismatch,
    Warning,
    Error,
    Info,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Mismatch => "MISMATCH",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Info => "INFO",
        }
    }
}

/// 检查项标识 (序列化为稳定的 snake_case 名称)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    // 单据内算术
    EobBilledSum,
    EobPaidSum,
    EobPatientResponsibilityBreakdown,
    BillLineItemSum,
    BillBalanceDueMath,
    // EOB 与账单对账
    MissingBills,
    MissingEobs,
    EobVsBillAmount,
    LineItemOverAllowed,
    UnmatchedEob,
    UnmatchedBill,
    // 重复收费
    DuplicateCptCrossProvider,
    DuplicateCptSameProvider,
    // 承保与拒付
    ClaimDenied,
    LineItemDenied,
    ZeroAllowedAmount,
    PatientFullCost,
    PriorAuthDenied,
    PriorAuthExpired,
    AppealUpheld,
    AppealOverturned,
    PriorAuthVsDenial,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EobBilledSum => "eob_billed_sum",
            Self::EobPaidSum => "eob_paid_sum",
            Self::EobPatientResponsibilityBreakdown => "eob_patient_responsibility_breakdown",
            Self::BillLineItemSum => "bill_line_item_sum",
            Self::BillBalanceDueMath => "bill_balance_due_math",
            Self::MissingBills => "missing_bills",
            Self::MissingEobs => "missing_eobs",
            Self::EobVsBillAmount => "eob_vs_bill_amount",
            Self::LineItemOverAllowed => "line_item_over_allowed",
            Self::UnmatchedEob => "unmatched_eob",
            Self::UnmatchedBill => "unmatched_bill",
            Self::DuplicateCptCrossProvider => "duplicate_cpt_cross_provider",
            Self::DuplicateCptSameProvider => "duplicate_cpt_same_provider",
            Self::ClaimDenied => "claim_denied",
            Self::LineItemDenied => "line_item_denied",
            Self::ZeroAllowedAmount => "zero_allowed_amount",
            Self::PatientFullCost => "patient_full_cost",
            Self::PriorAuthDenied => "prior_auth_denied",
            Self::PriorAuthExpired => "prior_auth_expired",
            Self::AppealUpheld => "appeal_upheld",
            Self::AppealOverturned => "appeal_overturned",
            Self::PriorAuthVsDenial => "prior_auth_vs_denial",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条校验发现 (值对象, 创建后不再修改)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub check_name: CheckKind,
    pub status: ValidationStatus,
    pub severity: Severity,
    pub detail: String,
    /// 正数表示患者可能多付的金额
    #[serde(default)]
    pub potential_overcharge: Option<f64>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub document_ids: Vec<String>,
}

impl ValidationResult {
    pub fn new(
        check_name: CheckKind,
        status: ValidationStatus,
        severity: Severity,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            check_name,
            status,
            severity,
            detail: detail.into(),
            potential_overcharge: None,
            recommendation: None,
            document_ids: Vec::new(),
        }
    }

    pub fn with_overcharge(mut self, amount: Option<f64>) -> Self {
        self.potential_overcharge = amount;
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_documents<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_high_first() {
        let mut levels = vec![Severity::Info, Severity::Low, Severity::High, Severity::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![Severity::High, Severity::Medium, Severity::Low, Severity::Info]
        );
        assert_eq!(Severity::High.rank(), 0);
        assert_eq!(Severity::Info.rank(), 3);
    }

    #[test]
    fn check_names_serialize_as_stable_identifiers() {
        let result = ValidationResult::new(
            CheckKind::EobPatientResponsibilityBreakdown,
            ValidationStatus::Mismatch,
            Severity::Medium,
            "detail",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["check_name"], "eob_patient_responsibility_breakdown");
        assert_eq!(json["status"], "MISMATCH");
        assert_eq!(json["severity"], "MEDIUM");
        assert!(json.get("document_ids").is_none());
        assert_eq!(
            CheckKind::PriorAuthVsDenial.as_str(),
            serde_json::to_value(CheckKind::PriorAuthVsDenial).unwrap()
        );
    }
}
