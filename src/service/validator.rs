use chrono::{Local, NaiveDate};
use rayon::prelude::*;

use crate::config::ValidationSettings;
use crate::models::{
    ClaimsPacket, DocumentType, PacketReport, ProcessedDocument, SeverityCounts, ValidationResult,
};

use super::billing::run_billing_reconciliation_checks;
use super::context::CheckContext;
use super::coverage::run_coverage_checks;
use super::duplicate::run_duplicate_detection;
use super::math::run_math_checks;
use super::summary::{build_action_list, compute_financial_summary, consolidate_patient};

/// 运行全部校验, 返回按严重程度排序的结果
///
/// 四个检查器互不依赖, 并行执行; 拼接顺序固定为
/// 算术 -> 对账 -> 重复 -> 承保, 稳定排序保证同级结果保持发现顺序。
pub fn run_all_validations(
    documents: &[ProcessedDocument],
    ctx: &CheckContext,
) -> Vec<ValidationResult> {
    let ((math, billing), (duplicates, coverage)) = rayon::join(
        || {
            rayon::join(
                || run_math_checks(documents, ctx),
                || run_billing_reconciliation_checks(documents, ctx),
            )
        },
        || {
            rayon::join(
                || run_duplicate_detection(documents, ctx),
                || run_coverage_checks(documents, ctx),
            )
        },
    );

    let mut results = Vec::with_capacity(math.len() + billing.len() + duplicates.len() + coverage.len());
    results.extend(math);
    results.extend(billing);
    results.extend(duplicates);
    results.extend(coverage);

    // sort_by_key 是稳定排序
    results.sort_by_key(|r| r.severity);
    results
}

/// 文档包校验服务
pub struct ValidatorService {
    settings: ValidationSettings,
}

impl ValidatorService {
    pub fn new(settings: ValidationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// 以本地日期为"今天"校验一个文档包
    pub fn validate_packet(&self, packet: &ClaimsPacket) -> PacketReport {
        self.validate_packet_on(packet, Local::now().date_naive())
    }

    pub fn validate_packet_on(&self, packet: &ClaimsPacket, today: NaiveDate) -> PacketReport {
        let packet_id = packet
            .packet_id
            .clone()
            .unwrap_or_else(|| "unnamed".to_string());
        let documents = &packet.documents;
        tracing::info!("Validating packet {} ({} documents)", packet_id, documents.len());

        for doc in documents.iter().filter(|d| d.doc_type() == DocumentType::Unknown) {
            tracing::debug!("Document {} has unrecognised type, only patient info is used", doc.doc_id());
        }

        let ctx = CheckContext::new(self.settings.clone(), today);
        let validation_results = run_all_validations(documents, &ctx);
        let severity_counts = SeverityCounts::from_results(&validation_results);

        tracing::info!(
            "Packet {} validated: {} findings (HIGH {}, MEDIUM {}, LOW {}, INFO {})",
            packet_id,
            severity_counts.total(),
            severity_counts.high,
            severity_counts.medium,
            severity_counts.low,
            severity_counts.info
        );

        PacketReport {
            patient: consolidate_patient(documents),
            document_count: documents.len(),
            financial_summary: compute_financial_summary(documents, &validation_results),
            recommended_actions: build_action_list(&validation_results),
            severity_counts,
            validation_results,
            packet_id,
        }
    }

    /// 批量校验, 各文档包独立并行, 输出顺序与输入一致
    pub fn validate_batch(&self, packets: &[ClaimsPacket]) -> Vec<PacketReport> {
        let today = Local::now().date_naive();
        self.validate_batch_on(packets, today)
    }

    pub fn validate_batch_on(&self, packets: &[ClaimsPacket], today: NaiveDate) -> Vec<PacketReport> {
        tracing::info!("Validating batch of {} packets", packets.len());
        packets
            .par_iter()
            .map(|packet| self.validate_packet_on(packet, today))
            .collect()
    }
}

impl Default for ValidatorService {
    fn default() -> Self {
        Self::new(ValidationSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckKind, Severity};
    use crate::service::test_support::{ctx, doc, today};
    use serde_json::json;

    fn mixed_packet() -> Vec<ProcessedDocument> {
        vec![
            doc("EOB", "eob-1", json!({
                "provider": {"name": "Hospital A"},
                "date_of_service_start": "2024-01-15",
                "total_billed": 600,
                "total_patient_responsibility": 200,
                "claim_status": "Partially denied",
                "line_items": [
                    {"cpt_code": "99213", "service_date": "2024-01-15", "billed_amount": 200},
                    {"cpt_code": "80053", "service_date": "2024-01-15", "billed_amount": 300}
                ]
            })),
            doc("MEDICAL_BILL", "bill-1", json!({
                "provider": {"name": "Hospital A"},
                "date_of_service_start": "2024-01-15",
                "balance_due": 200
            })),
            doc("EOB", "eob-2", json!({
                "provider": {"name": "Clinic B"},
                "line_items": [{"cpt_code": "99213", "service_date": "2024-01-15", "billed_amount": 150}]
            })),
        ]
    }

    #[test]
    fn results_are_sorted_by_severity_in_discovery_order() {
        let results = run_all_validations(&mixed_packet(), &ctx());
        let names: Vec<_> = results.iter().map(|r| r.check_name).collect();
        assert_eq!(
            names,
            vec![
                CheckKind::ClaimDenied,
                CheckKind::EobBilledSum,
                CheckKind::DuplicateCptCrossProvider,
                CheckKind::UnmatchedEob,
            ]
        );
        assert!(results.windows(2).all(|w| w[0].severity.rank() <= w[1].severity.rank()));
    }

    #[test]
    fn running_twice_gives_identical_output() {
        let docs = mixed_packet();
        assert_eq!(run_all_validations(&docs, &ctx()), run_all_validations(&docs, &ctx()));
    }

    #[test]
    fn empty_packet_has_no_findings() {
        assert!(run_all_validations(&[], &ctx()).is_empty());
    }

    #[test]
    fn packet_report_combines_everything() {
        let service = ValidatorService::default();
        let packet = ClaimsPacket {
            packet_id: Some("pkt-1".to_string()),
            documents: mixed_packet(),
        };
        let report = service.validate_packet_on(&packet, today());
        assert_eq!(report.packet_id, "pkt-1");
        assert_eq!(report.document_count, 3);
        assert_eq!(report.severity_counts.high, 1);
        assert_eq!(report.severity_counts.medium, 2);
        assert_eq!(report.severity_counts.low, 1);
        assert_eq!(report.financial_summary.flagged_issues, 3);
        assert_eq!(report.recommended_actions.len(), 3);
        assert!(report.recommended_actions[0].starts_with("URGENT: "));
        assert!(report.validation_results[0].severity == Severity::High);
    }

    #[test]
    fn batch_preserves_input_order() {
        let service = ValidatorService::default();
        let packets: Vec<ClaimsPacket> = (0..5)
            .map(|i| ClaimsPacket {
                packet_id: Some(format!("pkt-{}", i)),
                documents: Vec::new(),
            })
            .collect();
        let reports = service.validate_batch_on(&packets, today());
        let ids: Vec<_> = reports.iter().map(|r| r.packet_id.as_str()).collect();
        assert_eq!(ids, vec!["pkt-0", "pkt-1", "pkt-2", "pkt-3", "pkt-4"]);
    }
}
