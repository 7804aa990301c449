//! EOB 与医疗账单的跨文档对账
//!
//! 按 (机构名称模糊匹配 && 服务日期重叠) 配对, 对每一对比较患者自付金额与
//! 账单余额, 并逐个 CPT 比较账单收费与 EOB 核定金额。

use std::collections::{HashMap, HashSet};

use crate::models::{
    CheckKind, EobData, ExtractedData, MedicalBillData, ProcessedDocument, Severity,
    ValidationResult, ValidationStatus,
};

use super::context::CheckContext;
use super::matching::{dates_overlap, normalize_provider_name, providers_match};
use super::money;

/// 参与对账的一份文档 (文档 ID + 对应结构)
struct Party<'a, T> {
    doc_id: &'a str,
    data: &'a T,
    provider: String,
}

pub fn run_billing_reconciliation_checks(
    documents: &[ProcessedDocument],
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    let eobs: Vec<Party<'_, EobData>> = documents
        .iter()
        .filter_map(|doc| match &doc.extracted_data {
            ExtractedData::Eob(eob) => Some(Party {
                doc_id: doc.doc_id(),
                data: eob,
                provider: normalize_provider_name(eob.provider.name()),
            }),
            _ => None,
        })
        .collect();

    let bills: Vec<Party<'_, MedicalBillData>> = documents
        .iter()
        .filter_map(|doc| match &doc.extracted_data {
            ExtractedData::MedicalBill(bill) => Some(Party {
                doc_id: doc.doc_id(),
                data: bill,
                provider: normalize_provider_name(bill.provider.name()),
            }),
            _ => None,
        })
        .collect();

    if !eobs.is_empty() && bills.is_empty() {
        results.push(
            ValidationResult::new(
                CheckKind::MissingBills,
                ValidationStatus::Warning,
                Severity::Low,
                "Found EOB(s) but no provider bills. Cannot fully reconcile without bills.",
            )
            .with_recommendation("Obtain bills from providers to verify amounts owed"),
        );
    }

    if !bills.is_empty() && eobs.is_empty() {
        // 没有 EOB 时患者可能在不了解保险结算的情况下多付, 严重程度更高
        results.push(
            ValidationResult::new(
                CheckKind::MissingEobs,
                ValidationStatus::Warning,
                Severity::Medium,
                "Found provider bill(s) but no EOB. Cannot verify insurance processing.",
            )
            .with_recommendation("Request EOB from insurance before paying bills"),
        );
    }

    let mut matched_eobs: HashSet<&str> = HashSet::new();
    let mut matched_bills: HashSet<&str> = HashSet::new();

    for eob in &eobs {
        for bill in &bills {
            if !is_match(eob, bill) {
                continue;
            }
            matched_eobs.insert(eob.doc_id);
            matched_bills.insert(bill.doc_id);

            if let Some(finding) = compare_patient_amounts(eob, bill, ctx) {
                results.push(finding);
            }
            results.extend(compare_line_items(eob, bill, ctx));
        }
    }

    for eob in &eobs {
        if !matched_eobs.contains(eob.doc_id) {
            let provider = eob.data.provider.name().unwrap_or("Unknown");
            results.push(
                ValidationResult::new(
                    CheckKind::UnmatchedEob,
                    ValidationStatus::Warning,
                    Severity::Low,
                    format!("EOB from {} could not be matched to any provider bill", provider),
                )
                .with_recommendation("Obtain corresponding bill from provider")
                .with_documents([eob.doc_id]),
            );
        }
    }

    for bill in &bills {
        if !matched_bills.contains(bill.doc_id) {
            let provider = bill.data.provider.name().unwrap_or("Unknown");
            results.push(
                ValidationResult::new(
                    CheckKind::UnmatchedBill,
                    ValidationStatus::Warning,
                    Severity::Medium,
                    format!("Bill from {} could not be matched to any EOB", provider),
                )
                .with_recommendation("Request EOB from insurance for this service before paying")
                .with_documents([bill.doc_id]),
            );
        }
    }

    tracing::debug!(
        "billing reconciliation: {} EOBs, {} bills, {} matched EOBs, {} findings",
        eobs.len(),
        bills.len(),
        matched_eobs.len(),
        results.len()
    );
    results
}

fn is_match(eob: &Party<'_, EobData>, bill: &Party<'_, MedicalBillData>) -> bool {
    providers_match(&eob.provider, &bill.provider)
        && dates_overlap(
            eob.data.date_of_service_start,
            eob.data.date_of_service_end,
            bill.data.date_of_service_start,
            bill.data.date_of_service_end,
        )
}

/// EOB 患者自付 vs 账单余额
fn compare_patient_amounts(
    eob: &Party<'_, EobData>,
    bill: &Party<'_, MedicalBillData>,
    ctx: &CheckContext,
) -> Option<ValidationResult> {
    let eob_responsibility = eob.data.total_patient_responsibility?;
    let bill_balance = bill.data.balance_due?;
    if !ctx.differs(eob_responsibility, bill_balance) {
        return None;
    }

    let provider = bill.data.provider.name().unwrap_or("provider");
    let overcharge = bill_balance - eob_responsibility;
    let recommendation = if overcharge > 0.0 {
        format!("Contact {} to request adjustment to match EOB amount", provider)
    } else {
        "Verify with insurance if additional payment is expected".to_string()
    };

    Some(
        ValidationResult::new(
            CheckKind::EobVsBillAmount,
            ValidationStatus::Mismatch,
            Severity::High,
            format!(
                "Bill from {} shows balance of {} but EOB says patient responsibility is {}",
                provider,
                money(bill_balance),
                money(eob_responsibility)
            ),
        )
        .with_overcharge((overcharge > 0.0).then_some(overcharge))
        .with_recommendation(recommendation)
        .with_documents([eob.doc_id, bill.doc_id]),
    )
}

/// 账单 CPT 收费 vs EOB 核定金额
fn compare_line_items(
    eob: &Party<'_, EobData>,
    bill: &Party<'_, MedicalBillData>,
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    // 同一编码出现多次时以后出现的为准
    let mut allowed_by_cpt: HashMap<&str, f64> = HashMap::new();
    for item in &eob.data.line_items {
        if let (Some(cpt), Some(allowed)) = (item.cpt_code.as_deref(), item.allowed_amount) {
            allowed_by_cpt.insert(cpt, allowed);
        }
    }

    let mut results = Vec::new();
    for item in &bill.data.line_items {
        let (Some(cpt), Some(amount)) = (item.cpt_code.as_deref(), item.amount) else {
            continue;
        };
        let Some(&allowed) = allowed_by_cpt.get(cpt) else {
            continue;
        };

        if amount > allowed + ctx.tolerance() {
            results.push(
                ValidationResult::new(
                    CheckKind::LineItemOverAllowed,
                    ValidationStatus::Mismatch,
                    Severity::Medium,
                    format!(
                        "Bill charges {} for CPT {} but EOB allowed amount is only {}",
                        money(amount),
                        cpt,
                        money(allowed)
                    ),
                )
                .with_overcharge(Some(amount - allowed))
                .with_recommendation(format!(
                    "Request provider adjust CPT {} charge to insurance allowed amount",
                    cpt
                ))
                .with_documents([eob.doc_id, bill.doc_id]),
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

    fn eob(id: &str, provider: &str, responsibility: f64, date: &str) -> ProcessedDocument {
        doc("EOB", id, json!({
            "provider": {"name": provider},
            "total_billed": 1000.00,
            "total_patient_responsibility": responsibility,
            "date_of_service_start": date
        }))
    }

    fn bill(id: &str, provider: &str, balance: f64, date: &str) -> ProcessedDocument {
        doc("MEDICAL_BILL", id, json!({
            "provider": {"name": provider},
            "total_charges": 1000.00,
            "balance_due": balance,
            "date_of_service_start": date
        }))
    }

    fn names(results: &[ValidationResult]) -> Vec<&'static str> {
        results.iter().map(|r| r.check_name.as_str()).collect()
    }

    #[test]
    fn eob_without_bill_flags_missing_bills() {
        let results = run_billing_reconciliation_checks(
            &[eob("eob-1", "Hospital A", 200.0, "2024-01-15")],
            &ctx(),
        );
        assert_eq!(names(&results), vec!["missing_bills", "unmatched_eob"]);
        assert_eq!(results[0].severity, Severity::Low);
        assert_eq!(results[1].severity, Severity::Low);
    }

    #[test]
    fn bill_without_eob_flags_missing_eobs() {
        let results = run_billing_reconciliation_checks(
            &[bill("bill-1", "Hospital A", 500.0, "2024-01-15")],
            &ctx(),
        );
        assert_eq!(names(&results), vec!["missing_eobs", "unmatched_bill"]);
        assert_eq!(results[0].severity, Severity::Medium);
        assert_eq!(results[1].severity, Severity::Medium);
    }

    #[test]
    fn overcharge_against_matched_eob() {
        let docs = [
            eob("eob-1", "Hospital A", 200.0, "2024-01-15"),
            bill("bill-1", "hospital a", 500.0, "2024-01-15"),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert_eq!(results.len(), 1);
        let finding = &results[0];
        assert_eq!(finding.check_name, CheckKind::EobVsBillAmount);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.potential_overcharge, Some(300.0));
        assert_eq!(finding.document_ids, vec!["eob-1", "bill-1"]);
        assert!(finding.recommendation.as_deref().unwrap().starts_with("Contact hospital a"));
    }

    #[test]
    fn underbilled_balance_has_no_overcharge() {
        let docs = [
            eob("eob-1", "Hospital A", 500.0, "2024-01-15"),
            bill("bill-1", "Hospital A", 200.0, "2024-01-15"),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].potential_overcharge, None);
        assert_eq!(
            results[0].recommendation.as_deref(),
            Some("Verify with insurance if additional payment is expected")
        );
    }

    #[test]
    fn different_dates_leave_both_unmatched() {
        let docs = [
            eob("eob-1", "Hospital A", 200.0, "2024-01-15"),
            bill("bill-1", "Hospital A", 500.0, "2024-02-20"),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert_eq!(names(&results), vec!["unmatched_eob", "unmatched_bill"]);
    }

    #[test]
    fn bill_line_over_allowed_amount() {
        let docs = [
            doc("EOB", "eob-1", json!({
                "provider": {"name": "Valley Medical Center"},
                "line_items": [
                    {"cpt_code": "99213", "allowed_amount": 120.00},
                    {"cpt_code": "80053", "allowed_amount": 40.00}
                ]
            })),
            doc("MEDICAL_BILL", "bill-1", json!({
                "provider": {"name": "Valley Med Ctr"},
                "line_items": [
                    {"cpt_code": "99213", "amount": 200.00},
                    {"cpt_code": "80053", "amount": 40.00},
                    {"cpt_code": "36415", "amount": 25.00}
                ]
            })),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert_eq!(names(&results), vec!["line_item_over_allowed"]);
        assert_eq!(results[0].potential_overcharge, Some(80.0));
        assert!(results[0].detail.contains("CPT 99213"));
    }

    #[test]
    fn one_eob_may_match_several_bills() {
        let docs = [
            eob("eob-1", "Hospital A", 200.0, "2024-01-15"),
            bill("bill-1", "Hospital A", 200.0, "2024-01-15"),
            bill("bill-2", "Hospital A North", 200.0, "2024-01-15"),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert!(results.is_empty());
    }

    #[test]
    fn nameless_provider_never_matches() {
        let docs = [
            doc("EOB", "eob-1", json!({"total_patient_responsibility": 10})),
            doc("MEDICAL_BILL", "bill-1", json!({"balance_due": 99})),
        ];
        let results = run_billing_reconciliation_checks(&docs, &ctx());
        assert_eq!(names(&results), vec!["unmatched_eob", "unmatched_bill"]);
        assert!(results[0].detail.contains("Unknown"));
    }
}
