//! 单据内算术一致性校验 (明细合计 / 余额推算)

use crate::models::{
    CheckKind, EobData, ExtractedData, MedicalBillData, ProcessedDocument, Severity,
    ValidationResult, ValidationStatus,
};

use super::context::CheckContext;
use super::money;

/// 对每份 EOB / 医疗账单做算术校验
pub fn run_math_checks(documents: &[ProcessedDocument], ctx: &CheckContext) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    for doc in documents {
        match &doc.extracted_data {
            ExtractedData::Eob(eob) => results.extend(check_eob_math(eob, doc.doc_id(), ctx)),
            ExtractedData::MedicalBill(bill) => {
                results.extend(check_bill_math(bill, doc.doc_id(), ctx))
            }
            _ => {}
        }
    }

    tracing::debug!("math checks: {} findings over {} documents", results.len(), documents.len());
    results
}

/// 缺失的明细金额按 0 计
fn safe_sum(values: impl Iterator<Item = Option<f64>>) -> f64 {
    values.flatten().sum()
}

fn check_eob_math(eob: &EobData, doc_id: &str, ctx: &CheckContext) -> Vec<ValidationResult> {
    let mut results = Vec::new();
    let has_lines = !eob.line_items.is_empty();

    if let (Some(total_billed), true) = (eob.total_billed, has_lines) {
        let line_sum = safe_sum(eob.line_items.iter().map(|i| i.billed_amount));
        if ctx.differs(line_sum, total_billed) {
            results.push(
                ValidationResult::new(
                    CheckKind::EobBilledSum,
                    ValidationStatus::Mismatch,
                    Severity::Medium,
                    format!(
                        "EOB {}: Line item billed amounts sum to {} but total_billed is {}",
                        doc_id,
                        money(line_sum),
                        money(total_billed)
                    ),
                )
                .with_overcharge(Some((line_sum - total_billed).abs()))
                .with_recommendation("Review the EOB for calculation errors")
                .with_documents([doc_id]),
            );
        }
    }

    if let (Some(total_paid), true) = (eob.total_insurance_paid, has_lines) {
        let line_sum = safe_sum(eob.line_items.iter().map(|i| i.insurance_paid));
        if ctx.differs(line_sum, total_paid) {
            // 方向不明确, 不计算多收金额
            results.push(
                ValidationResult::new(
                    CheckKind::EobPaidSum,
                    ValidationStatus::Mismatch,
                    Severity::Medium,
                    format!(
                        "EOB {}: Line item insurance_paid sum {} doesn't match total {}",
                        doc_id,
                        money(line_sum),
                        money(total_paid)
                    ),
                )
                .with_recommendation("Contact insurance to verify payment amounts")
                .with_documents([doc_id]),
            );
        }
    }

    if let Some(total_patient) = eob.total_patient_responsibility {
        let deductible = eob.total_deductible.unwrap_or(0.0);
        let copay = eob.total_copay.unwrap_or(0.0);
        let coinsurance = eob.total_coinsurance.unwrap_or(0.0);
        let breakdown = deductible + copay + coinsurance;

        // 拆分项全为 0 时多半是没有抽取到, 不报
        if breakdown > 0.0 && ctx.differs(breakdown, total_patient) {
            let overcharge = (breakdown < total_patient).then(|| total_patient - breakdown);
            results.push(
                ValidationResult::new(
                    CheckKind::EobPatientResponsibilityBreakdown,
                    ValidationStatus::Mismatch,
                    Severity::Medium,
                    format!(
                        "EOB {}: Deductible ({}) + copay ({}) + coinsurance ({}) = {}, but total patient responsibility is {}",
                        doc_id,
                        money(deductible),
                        money(copay),
                        money(coinsurance),
                        money(breakdown),
                        money(total_patient)
                    ),
                )
                .with_overcharge(overcharge)
                .with_recommendation("Verify patient responsibility calculation with insurance")
                .with_documents([doc_id]),
            );
        }
    }

    results
}

fn check_bill_math(bill: &MedicalBillData, doc_id: &str, ctx: &CheckContext) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    if let (Some(total_charges), false) = (bill.total_charges, bill.line_items.is_empty()) {
        let line_sum = safe_sum(bill.line_items.iter().map(|i| i.amount));
        if ctx.differs(line_sum, total_charges) {
            let overcharge = (total_charges > line_sum).then(|| total_charges - line_sum);
            results.push(
                ValidationResult::new(
                    CheckKind::BillLineItemSum,
                    ValidationStatus::Error,
                    Severity::High,
                    format!(
                        "Bill {}: Line items sum to {} but total_charges is {}",
                        doc_id,
                        money(line_sum),
                        money(total_charges)
                    ),
                )
                .with_overcharge(overcharge)
                .with_recommendation("Request itemized bill from provider to verify charges")
                .with_documents([doc_id]),
            );
        }
    }

    if let (Some(balance_due), Some(total_charges)) = (bill.balance_due, bill.total_charges) {
        let adjustments = bill.insurance_adjustments.unwrap_or(0.0);
        let insurance_payments = bill.insurance_payments.unwrap_or(0.0);
        let patient_payments = bill.patient_payments.unwrap_or(0.0);
        let expected = total_charges - adjustments - insurance_payments - patient_payments;

        if ctx.differs(expected, balance_due) {
            let overcharge = (balance_due > expected).then(|| balance_due - expected);
            results.push(
                ValidationResult::new(
                    CheckKind::BillBalanceDueMath,
                    ValidationStatus::Mismatch,
                    Severity::Medium,
                    format!(
                        "Bill {}: Expected balance {} (charges {} - adjustments {} - insurance paid {} - patient paid {}), but balance_due shows {}",
                        doc_id,
                        money(expected),
                        money(total_charges),
                        money(adjustments),
                        money(insurance_payments),
                        money(patient_payments),
                        money(balance_due)
                    ),
                )
                .with_overcharge(overcharge)
                .with_recommendation("Contact billing department to clarify balance calculation")
                .with_documents([doc_id]),
            );
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{ctx, doc};
    use serde_json::json;

    fn checks(results: &[ValidationResult], kind: CheckKind) -> Vec<&ValidationResult> {
        results.iter().filter(|r| r.check_name == kind).collect()
    }

    #[test]
    fn eob_billed_sum_consistent_produces_nothing() {
        let eob = doc("EOB", "eob-1", json!({
            "total_billed": 500.00,
            "line_items": [{"billed_amount": 200.00}, {"billed_amount": 300.00}]
        }));
        assert!(run_math_checks(&[eob], &ctx()).is_empty());
    }

    #[test]
    fn eob_billed_sum_mismatch_reports_difference() {
        let eob = doc("EOB", "eob-1", json!({
            "total_billed": 600.00,
            "line_items": [{"billed_amount": 200.00}, {"billed_amount": 300.00}]
        }));
        let results = run_math_checks(&[eob], &ctx());
        let found = checks(&results, CheckKind::EobBilledSum);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status, ValidationStatus::Mismatch);
        assert_eq!(found[0].severity, Severity::Medium);
        assert_eq!(found[0].potential_overcharge, Some(100.0));
        assert!(found[0].detail.contains("$500.00"));
    }

    #[test]
    fn missing_line_amounts_count_as_zero() {
        let eob = doc("EOB", "eob-1", json!({
            "total_billed": 200.00,
            "line_items": [{"billed_amount": 200.00}, {"cpt_code": "99213"}]
        }));
        assert!(run_math_checks(&[eob], &ctx()).is_empty());
    }

    #[test]
    fn paid_sum_mismatch_has_no_overcharge() {
        let eob = doc("EOB", "eob-1", json!({
            "total_insurance_paid": 300.00,
            "line_items": [{"insurance_paid": 100.00}, {"insurance_paid": 100.00}]
        }));
        let results = run_math_checks(&[eob], &ctx());
        let found = checks(&results, CheckKind::EobPaidSum);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].potential_overcharge, None);
    }

    #[test]
    fn patient_responsibility_breakdown() {
        let matching = doc("EOB", "eob-1", json!({
            "total_patient_responsibility": 350.00,
            "total_deductible": 200.00,
            "total_copay": 50.00,
            "total_coinsurance": 100.00
        }));
        assert!(run_math_checks(&[matching], &ctx()).is_empty());

        let short = doc("EOB", "eob-2", json!({
            "total_patient_responsibility": 400.00,
            "total_deductible": 200.00,
            "total_copay": 50.00,
            "total_coinsurance": 100.00
        }));
        let results = run_math_checks(&[short], &ctx());
        let found = checks(&results, CheckKind::EobPatientResponsibilityBreakdown);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].potential_overcharge, Some(50.0));

        let over = doc("EOB", "eob-3", json!({
            "total_patient_responsibility": 300.00,
            "total_deductible": 350.00
        }));
        let results = run_math_checks(&[over], &ctx());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].potential_overcharge, None);
    }

    #[test]
    fn zero_breakdown_is_not_checked() {
        let eob = doc("EOB", "eob-1", json!({
            "total_patient_responsibility": 400.00,
            "total_deductible": 0,
            "total_copay": 0
        }));
        assert!(run_math_checks(&[eob], &ctx()).is_empty());
    }

    #[test]
    fn bill_line_item_sum_is_high() {
        let bill = doc("MEDICAL_BILL", "bill-1", json!({
            "total_charges": 1000.00,
            "line_items": [{"amount": 400.00}, {"amount": 300.00}]
        }));
        let results = run_math_checks(&[bill], &ctx());
        let found = checks(&results, CheckKind::BillLineItemSum);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].potential_overcharge, Some(300.0));
    }

    #[test]
    fn bill_balance_due_math() {
        let consistent = doc("MEDICAL_BILL", "bill-1", json!({
            "total_charges": 1000.00,
            "insurance_adjustments": 200.00,
            "insurance_payments": 600.00,
            "patient_payments": 50.00,
            "balance_due": 150.00
        }));
        assert!(run_math_checks(&[consistent], &ctx()).is_empty());

        let inflated = doc("MEDICAL_BILL", "bill-2", json!({
            "total_charges": 1000.00,
            "insurance_adjustments": 200.00,
            "insurance_payments": 600.00,
            "balance_due": 500.00
        }));
        let results = run_math_checks(&[inflated], &ctx());
        let found = checks(&results, CheckKind::BillBalanceDueMath);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Medium);
        assert_eq!(found[0].potential_overcharge, Some(300.0));
    }

    #[test]
    fn absent_totals_suppress_checks() {
        let eob = doc("EOB", "eob-1", json!({"line_items": [{"billed_amount": 10}]}));
        let bill = doc("MEDICAL_BILL", "bill-1", json!({"balance_due": 10, "line_items": []}));
        let empty_lines = doc("MEDICAL_BILL", "bill-2", json!({"total_charges": 10, "line_items": []}));
        assert!(run_math_checks(&[eob, bill, empty_lines], &ctx()).is_empty());
    }
}
