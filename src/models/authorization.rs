use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{InsuranceInfo, PatientInfo, ProviderInfo};
use super::lenient;

/// 预授权批准的单项服务
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedService {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity_approved: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub approved_amount: Option<f64>,
}

/// 预授权函 (批准或拒绝)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorAuthData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub authorization_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub document_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub requesting_provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub servicing_provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,

    #[serde(default, deserialize_with = "lenient::text")]
    pub auth_status: Option<String>,
    /// 部分抽取结果用这个键名表示同一状态
    #[serde(default, deserialize_with = "lenient::text")]
    pub authorization_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub auth_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub effective_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub diagnosis_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub authorized_services: Vec<AuthorizedService>,
    /// 部分抽取结果只给出编码列表
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub approved_cpt_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub requested_service: Option<String>,

    #[serde(default, deserialize_with = "lenient::text_list")]
    pub conditions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub place_of_service: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub denial_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub appeal_deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub appeal_instructions: Option<String>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_approved_amount: Option<f64>,
}

impl PriorAuthData {
    /// 授权状态: `auth_status` 优先, 缺失时取 `authorization_status`
    pub fn status(&self) -> Option<&str> {
        self.auth_status
            .as_deref()
            .or(self.authorization_status.as_deref())
    }

    /// 所有被授权的服务编码, 按出现顺序
    pub fn authorized_codes(&self) -> impl Iterator<Item = &str> {
        self.authorized_services
            .iter()
            .filter_map(|s| s.cpt_code.as_deref())
            .chain(self.approved_cpt_codes.iter().map(String::as_str))
    }
}

/// 申诉结果函
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppealDecisionData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub appeal_reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub original_claim_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub original_authorization_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub document_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,

    // 原理赔上下文
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub original_denial_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub original_denial_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub original_billed_amount: Option<f64>,

    // 申诉结果
    #[serde(default, deserialize_with = "lenient::text")]
    pub appeal_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub decision: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub appeal_outcome: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub decision_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub decision_rationale: Option<String>,

    // 推翻 / 部分批准
    #[serde(default, deserialize_with = "lenient::amount")]
    pub approved_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub approved_services: Vec<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub adjusted_patient_responsibility: Option<f64>,

    // 维持拒绝后的下一步
    #[serde(default, deserialize_with = "lenient::text")]
    pub next_appeal_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub next_appeal_deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub external_review_available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub external_review_instructions: Option<String>,

    #[serde(default, deserialize_with = "lenient::text_list")]
    pub cpt_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub diagnosis_codes: Vec<String>,
}

impl AppealDecisionData {
    /// 申诉结论: `decision` 优先, 缺失时取 `appeal_outcome`
    pub fn outcome(&self) -> Option<&str> {
        self.decision.as_deref().or(self.appeal_outcome.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_keys_present_together_do_not_clash() {
        let auth: PriorAuthData = serde_json::from_value(json!({
            "auth_status": null,
            "authorization_status": "denied",
            "requested_service": "MRI Lumbar Spine"
        }))
        .unwrap();
        assert_eq!(auth.status(), Some("denied"));
        assert_eq!(auth.requested_service.as_deref(), Some("MRI Lumbar Spine"));

        let auth: PriorAuthData = serde_json::from_value(json!({
            "auth_status": "Approved",
            "authorization_status": "Pending"
        }))
        .unwrap();
        assert_eq!(auth.status(), Some("Approved"));
    }

    #[test]
    fn outcome_falls_back_to_appeal_outcome() {
        let appeal: AppealDecisionData = serde_json::from_value(json!({
            "decision": null,
            "appeal_outcome": "upheld",
            "original_billed_amount": 9000
        }))
        .unwrap();
        assert_eq!(appeal.outcome(), Some("upheld"));
        assert_eq!(appeal.original_billed_amount, Some(9000.0));
    }
}
