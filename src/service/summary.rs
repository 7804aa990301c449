//! 报告汇总: 财务汇总、行动清单、患者信息合并

use crate::models::{
    ExtractedData, FinancialSummary, PatientInfo, ProcessedDocument, Severity, ValidationResult,
};

/// 0 视为"没有数据"
fn non_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

/// 汇总 EOB 合计与账单余额, 并统计校验结果中的潜在可追回金额
pub fn compute_financial_summary(
    documents: &[ProcessedDocument],
    results: &[ValidationResult],
) -> FinancialSummary {
    let mut total_billed = 0.0;
    let mut total_allowed = 0.0;
    let mut total_insurance_paid = 0.0;
    let mut eob_patient_resp = 0.0;
    let mut bill_patient_resp = 0.0;

    for doc in documents {
        match &doc.extracted_data {
            ExtractedData::Eob(eob) => {
                total_billed += eob.total_billed.unwrap_or_default();
                total_allowed += eob.total_allowed.unwrap_or_default();
                total_insurance_paid += eob.total_insurance_paid.unwrap_or_default();
                eob_patient_resp += eob.total_patient_responsibility.unwrap_or_default();
            }
            ExtractedData::MedicalBill(bill) => {
                bill_patient_resp += bill.balance_due.unwrap_or_default();
            }
            _ => {}
        }
    }

    let discrepancy_amount = (eob_patient_resp > 0.0).then(|| bill_patient_resp - eob_patient_resp);
    let potential_savings: f64 = results.iter().filter_map(|r| r.potential_overcharge).sum();
    let flagged_issues = results
        .iter()
        .filter(|r| matches!(r.severity, Severity::High | Severity::Medium))
        .count();

    FinancialSummary {
        total_billed: non_zero(total_billed),
        total_allowed: non_zero(total_allowed),
        total_insurance_paid: non_zero(total_insurance_paid),
        total_patient_responsibility_per_eob: non_zero(eob_patient_resp),
        total_patient_responsibility_per_bills: non_zero(bill_patient_resp),
        discrepancy_amount,
        potential_savings: non_zero(potential_savings),
        flagged_issues,
    }
}

/// 行动清单: HIGH -> "URGENT: ...", MEDIUM -> "INVESTIGATE: ...", 保持结果顺序
pub fn build_action_list(results: &[ValidationResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| {
            let recommendation = r.recommendation.as_deref()?;
            match r.severity {
                Severity::High => Some(format!("URGENT: {}", recommendation)),
                Severity::Medium => Some(format!("INVESTIGATE: {}", recommendation)),
                Severity::Low | Severity::Info => None,
            }
        })
        .collect()
}

/// 逐字段取文档顺序中第一个非空的患者信息
pub fn consolidate_patient(documents: &[ProcessedDocument]) -> PatientInfo {
    let mut patient = PatientInfo::default();

    for info in documents.iter().filter_map(|d| d.extracted_data.patient()) {
        if patient.first_name.is_none() {
            patient.first_name = info.first_name.clone();
        }
        if patient.last_name.is_none() {
            patient.last_name = info.last_name.clone();
        }
        if patient.date_of_birth.is_none() {
            patient.date_of_birth = info.date_of_birth;
        }
        if patient.member_id.is_none() {
            patient.member_id = info.member_id.clone();
        }
        if patient.group_number.is_none() {
            patient.group_number = info.group_number.clone();
        }
        if patient.address.is_none() {
            patient.address = info.address.clone();
        }
    }

    patient
}
