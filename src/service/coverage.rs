//! 承保与拒付分析: EOB 拒付、预授权拒绝/过期、申诉结果, 以及
//! "预授权已批准但 EOB 拒付" 的跨文档矛盾。

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::models::{
    AppealDecisionData, CheckKind, EobData, ExtractedData, PriorAuthData, ProcessedDocument,
    Severity, ValidationResult, ValidationStatus,
};

use super::context::{AppealUrgency, CheckContext};
use super::money;

fn is_denial(status: &str) -> bool {
    status.to_lowercase().contains("den")
}

/// 按整词判断: "Partially Approved" 算批准, "Not Authorized" /
/// "Unauthorized" / "Pending Authorization" 不算
fn is_approval(status: &str) -> bool {
    if is_denial(status) {
        return false;
    }
    let lowered = status.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words
        .iter()
        .any(|w| matches!(*w, "not" | "no" | "non" | "pending" | "pend"))
    {
        return false;
    }
    words
        .iter()
        .any(|w| matches!(*w, "approved" | "authorized" | "authorised"))
}

/// 截止日期 + 紧急标记, 追加到 detail 末尾
fn deadline_note(ctx: &CheckContext, deadline: Option<NaiveDate>) -> String {
    let Some(date) = deadline else {
        return String::new();
    };
    let mut note = format!(". Appeal deadline: {}", date);
    if ctx.appeal_urgency(deadline) == AppealUrgency::Urgent {
        note.push_str(&format!(
            " (URGENT - less than {} days remaining)",
            ctx.settings.urgent_days
        ));
    }
    note
}

pub fn run_coverage_checks(
    documents: &[ProcessedDocument],
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let mut results = Vec::new();

    for doc in documents {
        let doc_id = doc.doc_id();
        match &doc.extracted_data {
            ExtractedData::Eob(eob) => results.extend(check_eob_coverage(eob, doc_id, ctx)),
            ExtractedData::PriorAuth(auth) => {
                results.extend(check_prior_auth(auth, doc_id, ctx))
            }
            ExtractedData::AppealDecision(appeal) => {
                results.extend(check_appeal_decision(appeal, doc_id, ctx))
            }
            _ => {}
        }
    }

    results.extend(check_prior_auth_vs_denial(documents));

    tracing::debug!("coverage checks: {} findings", results.len());
    results
}

fn check_eob_coverage(eob: &EobData, doc_id: &str, ctx: &CheckContext) -> Vec<ValidationResult> {
    let mut results = Vec::new();
    let provider = eob.provider.name().unwrap_or("provider");

    if eob.claim_status.as_deref().is_some_and(is_denial) {
        let mut detail = format!("Claim from {} was DENIED", provider);
        if let Some(billed) = eob.total_billed.filter(|b| *b != 0.0) {
            detail.push_str(&format!(" ({})", money(billed)));
        }
        detail.push_str(&deadline_note(ctx, eob.appeal_deadline));

        results.push(
            ValidationResult::new(
                CheckKind::ClaimDenied,
                ValidationStatus::Error,
                Severity::High,
                detail,
            )
            .with_overcharge(eob.total_billed)
            .with_recommendation(
                "File an appeal immediately with insurance. Contact provider about claim denial.",
            )
            .with_documents([doc_id]),
        );
    }

    for item in &eob.line_items {
        let Some(reason) = item.denial_reason.as_deref() else {
            continue;
        };
        let cpt = item.cpt_code.as_deref().unwrap_or("Unknown");

        let mut detail = format!("Service {}", cpt);
        if let Some(desc) = item.description.as_deref() {
            detail.push_str(&format!(" ({})", desc));
        }
        detail.push_str(&format!(" was denied: {}", reason));
        if let Some(billed) = item.billed_amount.filter(|b| *b != 0.0) {
            detail.push_str(&format!(". Billed amount: {}", money(billed)));
        }

        results.push(
            ValidationResult::new(
                CheckKind::LineItemDenied,
                ValidationStatus::Error,
                Severity::High,
                detail,
            )
            .with_overcharge(item.billed_amount)
            .with_recommendation(format!(
                "Review denial reason for {}. Consider appeal if service was medically necessary.",
                cpt
            ))
            .with_documents([doc_id]),
        );
    }

    for item in &eob.line_items {
        let nothing_paid = item.insurance_paid.map_or(true, |paid| paid == 0.0);
        let Some(billed) = item.billed_amount.filter(|b| *b > 0.0) else {
            continue;
        };
        if item.allowed_amount != Some(0.0) || !nothing_paid {
            continue;
        }

        let cpt = item.cpt_code.as_deref().unwrap_or("Unknown");
        let mut detail = format!("Insurance allowed $0 for {}", cpt);
        if let Some(desc) = item.description.as_deref() {
            detail.push_str(&format!(" ({})", desc));
        }
        detail.push_str(&format!(" but provider billed {}", money(billed)));
        if !item.remark_codes.is_empty() {
            detail.push_str(&format!(". Remark codes: {}", item.remark_codes.join(", ")));
        }

        results.push(
            ValidationResult::new(
                CheckKind::ZeroAllowedAmount,
                ValidationStatus::Warning,
                Severity::Medium,
                detail,
            )
            .with_overcharge(Some(billed))
            .with_recommendation(format!(
                "Contact insurance to understand why {} was not covered. May need prior authorization or may not be a covered benefit.",
                cpt
            ))
            .with_documents([doc_id]),
        );
    }

    if let (Some(paid), Some(billed), Some(responsibility)) = (
        eob.total_insurance_paid,
        eob.total_billed,
        eob.total_patient_responsibility,
    ) {
        if paid == 0.0 && billed > 0.0 && (responsibility - billed).abs() < ctx.tolerance() {
            results.push(
                ValidationResult::new(
                    CheckKind::PatientFullCost,
                    ValidationStatus::Error,
                    Severity::High,
                    format!(
                        "Patient responsible for full billed amount ({}) from {}. Insurance paid $0.",
                        money(billed),
                        provider
                    ),
                )
                .with_overcharge(Some(billed))
                .with_recommendation(
                    "Verify claim was submitted correctly. Check if provider is out-of-network or if deductible applies.",
                )
                .with_documents([doc_id]),
            );
        }
    }

    results
}

fn auth_label(auth: &PriorAuthData) -> &str {
    auth.authorization_number
        .as_deref()
        .or(auth.reference_number.as_deref())
        .unwrap_or("(no number)")
}

fn check_prior_auth(
    auth: &PriorAuthData,
    doc_id: &str,
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let mut results = Vec::new();
    let denied = auth.status().is_some_and(is_denial);

    if denied {
        let mut detail = format!("Prior authorization {}", auth_label(auth));
        if let Some(service) = auth.requested_service.as_deref() {
            detail.push_str(&format!(" for {}", service));
        }
        detail.push_str(" was DENIED");
        if let Some(reason) = auth.denial_reason.as_deref() {
            detail.push_str(&format!(": {}", reason));
        }
        detail.push_str(&deadline_note(ctx, auth.appeal_deadline));

        let recommendation = auth.appeal_instructions.clone().unwrap_or_else(|| {
            "Request a peer-to-peer review or file an appeal with supporting medical records before the deadline."
                .to_string()
        });

        results.push(
            ValidationResult::new(
                CheckKind::PriorAuthDenied,
                ValidationStatus::Error,
                Severity::High,
                detail,
            )
            .with_recommendation(recommendation)
            .with_documents([doc_id]),
        );
    }

    if let Some(expired) = auth.expiration_date.filter(|d| *d < ctx.today) {
        if !denied {
            results.push(
                ValidationResult::new(
                    CheckKind::PriorAuthExpired,
                    ValidationStatus::Warning,
                    Severity::Medium,
                    format!(
                        "Prior authorization {} expired on {} ({} days ago)",
                        auth_label(auth),
                        expired,
                        -ctx.days_until(expired)
                    ),
                )
                .with_recommendation(
                    "Confirm services were performed before the expiration date. Request an extension or a new authorization for any remaining services.",
                )
                .with_documents([doc_id]),
            );
        }
    }

    results
}

fn check_appeal_decision(
    appeal: &AppealDecisionData,
    doc_id: &str,
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let Some(decision) = appeal.outcome() else {
        return Vec::new();
    };
    let lowered = decision.to_lowercase();
    let reference = appeal
        .appeal_reference_number
        .as_deref()
        .or(appeal.original_claim_number.as_deref())
        .unwrap_or("(no reference)");

    if lowered.contains("upheld") || lowered.contains("denied") {
        let mut detail = format!("Appeal {} was decided against the patient: {}", reference, decision);
        if let Some(reason) = appeal.original_denial_reason.as_deref() {
            detail.push_str(&format!(". Original denial reason: {}", reason));
        }
        if let Some(billed) = appeal.original_billed_amount {
            detail.push_str(&format!(". Amount at stake: {}", money(billed)));
        }

        return vec![ValidationResult::new(
            CheckKind::AppealUpheld,
            ValidationStatus::Error,
            Severity::High,
            detail,
        )
        .with_overcharge(appeal.original_billed_amount)
        .with_recommendation(next_steps(appeal, ctx))
        .with_documents([doc_id])];
    }

    if ["overturned", "approved", "reversed"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        let mut detail = format!("Appeal {} was {}", reference, decision);
        if let Some(approved) = appeal.approved_amount {
            detail.push_str(&format!(". Approved amount: {}", money(approved)));
        }
        if let Some(owed) = appeal.adjusted_patient_responsibility {
            detail.push_str(&format!(". Adjusted patient responsibility: {}", money(owed)));
        }

        return vec![ValidationResult::new(
            CheckKind::AppealOverturned,
            ValidationStatus::Info,
            Severity::Info,
            detail,
        )
        .with_recommendation(
            "Confirm the claim is reprocessed and that later bills reflect the overturned decision.",
        )
        .with_documents([doc_id])];
    }

    Vec::new()
}

/// 维持拒绝后的下一步建议
fn next_steps(appeal: &AppealDecisionData, ctx: &CheckContext) -> String {
    let mut steps = Vec::new();

    if let Some(level) = appeal.next_appeal_level.as_deref() {
        let mut step = format!("Request {} review", level);
        if let Some(deadline) = appeal.next_appeal_deadline {
            step.push_str(&format!(" by {}", deadline));
            if ctx.appeal_urgency(Some(deadline)) == AppealUrgency::Urgent {
                step.push_str(" (URGENT)");
            }
        }
        steps.push(step);
    }

    if appeal.external_review_available == Some(true) {
        steps.push("An independent external review is available".to_string());
    }

    if let Some(instructions) = appeal.external_review_instructions.as_deref() {
        steps.push(instructions.to_string());
    }

    if steps.is_empty() {
        "Review the decision letter for further appeal rights, including external review by an independent organization.".to_string()
    } else {
        format!("{}.", steps.join(". "))
    }
}

/// 已批准预授权中的编码被 EOB 以拒付理由驳回
fn check_prior_auth_vs_denial(documents: &[ProcessedDocument]) -> Vec<ValidationResult> {
    // 编码 -> (授权号, 预授权文档 ID); 同一编码以先出现的授权为准
    let mut authorized: IndexMap<&str, (&str, &str)> = IndexMap::new();
    for doc in documents {
        let ExtractedData::PriorAuth(auth) = &doc.extracted_data else {
            continue;
        };
        if !auth.status().is_some_and(is_approval) {
            continue;
        }
        for code in auth.authorized_codes() {
            authorized
                .entry(code)
                .or_insert((auth_label(auth), doc.doc_id()));
        }
    }

    if authorized.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for doc in documents {
        let ExtractedData::Eob(eob) = &doc.extracted_data else {
            continue;
        };
        for item in &eob.line_items {
            let (Some(code), Some(reason)) = (item.cpt_code.as_deref(), item.denial_reason.as_deref())
            else {
                continue;
            };
            let Some(&(auth_number, auth_doc)) = authorized.get(code) else {
                continue;
            };

            results.push(
                ValidationResult::new(
                    CheckKind::PriorAuthVsDenial,
                    ValidationStatus::Error,
                    Severity::High,
                    format!(
                        "CPT {} was approved under prior authorization {} but denied on the EOB: {}",
                        code, auth_number, reason
                    ),
                )
                .with_overcharge(item.billed_amount)
                .with_recommendation(format!(
                    "Appeal the denial and include a copy of prior authorization {} showing CPT {} was approved.",
                    auth_number, code
                ))
                .with_documents([auth_doc, doc.doc_id()]),
            );
        }
    }

    results
}
