//! 重复收费检测
//!
//! 把各类文档的服务行统一成 [`ServiceLine`], 按 (编码, 服务日期) 分组后
//! 检查跨机构重复与同机构多次出现。

use std::collections::HashSet;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::models::{
    CheckKind, Cms1500Data, DentalClaimData, EobData, ExtractedData,
    ItemizedStatementData, LabReportData, MedicalBillData, ProcessedDocument, Severity, Ub04Data,
    ValidationResult, ValidationStatus,
};

use super::context::CheckContext;
use super::money;

const UNKNOWN_PROVIDER: &str = "Unknown";

/// 归一化后的服务行
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLine<'a> {
    pub code: Option<&'a str>,
    pub service_date: Option<NaiveDate>,
    pub description: Option<&'a str>,
    pub amount: Option<f64>,
    pub doc_id: &'a str,
    pub provider: Option<&'a str>,
}

/// 能产出可计费服务行的文档结构
pub trait BillableLines {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>>;
}

impl BillableLines for EobData {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.provider.name();
        self.line_items
            .iter()
            .map(|item| ServiceLine {
                code: item.cpt_code.as_deref(),
                service_date: item.service_date,
                description: item.description.as_deref(),
                amount: item.billed_amount,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for MedicalBillData {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.provider.name();
        self.line_items
            .iter()
            .map(|item| ServiceLine {
                code: item.cpt_code.as_deref(),
                service_date: item.service_date,
                description: item.description.as_deref(),
                amount: item.amount,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for Cms1500Data {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.provider.name();
        self.service_lines
            .iter()
            .map(|line| ServiceLine {
                code: line.cpt_code.as_deref(),
                service_date: line.date_of_service_from,
                description: None,
                amount: line.charges,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for Ub04Data {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.provider.name().or(self.facility_name.as_deref());
        self.revenue_lines
            .iter()
            .map(|line| ServiceLine {
                code: line.hcpcs_code.as_deref(),
                service_date: line.service_date,
                description: line.description.as_deref(),
                amount: line.total_charges,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for LabReportData {
    /// 化验报告不带单项金额, 日期取采样日期
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.performing_lab.name().or(self.ordering_provider.name());
        self.test_results
            .iter()
            .map(|test| ServiceLine {
                code: test.cpt_code.as_deref(),
                service_date: self.collection_date,
                description: test.test_name.as_deref(),
                amount: None,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for DentalClaimData {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.billing_provider.name().or(self.provider.name());
        self.service_lines
            .iter()
            .map(|line| ServiceLine {
                code: line.cdt_code.as_deref(),
                service_date: line.service_date,
                description: line.description.as_deref(),
                amount: line.fee,
                doc_id,
                provider,
            })
            .collect()
    }
}

impl BillableLines for ItemizedStatementData {
    fn service_lines<'a>(&'a self, doc_id: &'a str) -> Vec<ServiceLine<'a>> {
        let provider = self.provider.name();
        self.charges
            .iter()
            .map(|charge| ServiceLine {
                code: charge.cpt_code.as_deref(),
                service_date: charge.service_date,
                description: charge.description.as_deref(),
                amount: charge.amount,
                doc_id,
                provider,
            })
            .collect()
    }
}

/// 文档类型 -> 服务行来源; 药房小票 / 预授权 / 申诉 / 未知类型不参与
fn billable(data: &ExtractedData) -> Option<&dyn BillableLines> {
    match data {
        ExtractedData::Eob(d) => Some(d),
        ExtractedData::MedicalBill(d) => Some(d),
        ExtractedData::Cms1500(d) => Some(d),
        ExtractedData::Ub04(d) => Some(d),
        ExtractedData::LabReport(d) => Some(d),
        ExtractedData::DentalClaim(d) => Some(d),
        ExtractedData::ItemizedStatement(d) => Some(d),
        ExtractedData::PharmacyReceipt(_)
        | ExtractedData::PriorAuth(_)
        | ExtractedData::AppealDecision(_)
        | ExtractedData::Unknown(_) => None,
    }
}

/// 所有文档的服务行, 按文档顺序展开
pub fn collect_service_lines(documents: &[ProcessedDocument]) -> Vec<ServiceLine<'_>> {
    documents
        .iter()
        .filter_map(|doc| billable(&doc.extracted_data).map(|src| src.service_lines(doc.doc_id())))
        .flatten()
        .collect()
}

fn charged_total(lines: &[&ServiceLine<'_>]) -> f64 {
    lines.iter().filter_map(|l| l.amount).sum()
}

fn date_label(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

pub fn run_duplicate_detection(
    documents: &[ProcessedDocument],
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let lines = collect_service_lines(documents);

    // 没有编码的行不参与分组; 没有日期的行单独成组
    let mut by_code_date: IndexMap<(&str, Option<NaiveDate>), Vec<&ServiceLine<'_>>> =
        IndexMap::new();
    for line in &lines {
        if let Some(code) = line.code {
            by_code_date
                .entry((code, line.service_date))
                .or_default()
                .push(line);
        }
    }

    let mut results = Vec::new();
    for ((code, service_date), occurrences) in &by_code_date {
        if occurrences.len() < 2 {
            continue;
        }

        let mut by_provider: IndexMap<&str, Vec<&ServiceLine<'_>>> = IndexMap::new();
        for &occ in occurrences {
            by_provider
                .entry(occ.provider.unwrap_or(UNKNOWN_PROVIDER))
                .or_default()
                .push(occ);
        }

        let date = date_label(*service_date);

        if by_provider.len() > 1 {
            let doc_ids: HashSet<&str> = occurrences.iter().map(|o| o.doc_id).collect();
            if doc_ids.len() > 1 {
                results.push(cross_provider_finding(
                    code,
                    &date,
                    occurrences,
                    &by_provider,
                    ctx,
                ));
            }
        }

        for (provider, provider_lines) in &by_provider {
            if provider_lines.len() >= ctx.settings.same_provider_min_occurrences {
                // 第一条带描述的行给编码补充说明
                let label = match provider_lines.iter().find_map(|l| l.description) {
                    Some(description) => format!("{} ({})", code, description),
                    None => code.to_string(),
                };
                results.push(
                    ValidationResult::new(
                        CheckKind::DuplicateCptSameProvider,
                        ValidationStatus::Info,
                        Severity::Low,
                        format!(
                            "CPT {} on {} appears {} times from {}. May be intentional for multiple units.",
                            label,
                            date,
                            provider_lines.len(),
                            provider
                        ),
                    )
                    .with_recommendation("Verify units billed match services received")
                    .with_documents(unique_doc_ids(provider_lines)),
                );
            }
        }
    }

    tracing::debug!(
        "duplicate detection: {} service lines, {} code/date groups, {} findings",
        lines.len(),
        by_code_date.len(),
        results.len()
    );
    results
}

fn cross_provider_finding(
    code: &str,
    date: &str,
    occurrences: &[&ServiceLine<'_>],
    by_provider: &IndexMap<&str, Vec<&ServiceLine<'_>>>,
    ctx: &CheckContext,
) -> ValidationResult {
    let max_listed = ctx.settings.max_listed_providers;
    let mut provider_list = by_provider
        .keys()
        .take(max_listed)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if by_provider.len() > max_listed {
        provider_list.push_str(&format!(" and {} more", by_provider.len() - max_listed));
    }

    let total = charged_total(occurrences);

    // 假设只有一次是合理收费
    let overcharge = (total > 0.0).then_some(total / 2.0);

    ValidationResult::new(
        CheckKind::DuplicateCptCrossProvider,
        ValidationStatus::Warning,
        Severity::Medium,
        format!(
            "CPT {} on {} appears from multiple providers: {}. Total charged: {}",
            code,
            date,
            provider_list,
            money(total)
        ),
    )
    .with_overcharge(overcharge)
    .with_recommendation(format!(
        "Verify if CPT {} was legitimately performed by multiple providers or if this is duplicate billing",
        code
    ))
    .with_documents(unique_doc_ids(occurrences))
}

/// 去重后的文档 ID, 保持首次出现顺序
fn unique_doc_ids<'a>(lines: &[&ServiceLine<'a>]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .map(|l| l.doc_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
