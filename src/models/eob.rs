use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{InsuranceInfo, PatientInfo, ProviderInfo};
use super::lenient;

/// EOB 服务明细行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EobLineItem {
    #[serde(default, deserialize_with = "lenient::date")]
    pub service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub billed_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub allowed_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub insurance_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub deductible_applied: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub copay: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub coinsurance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_responsibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub remark_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub denial_reason: Option<String>,
}

/// Explanation of Benefits (保险公司理赔说明)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EobData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub claim_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub document_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,

    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub place_of_service: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub line_items: Vec<EobLineItem>,

    // 合计
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_billed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_allowed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_insurance_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_patient_responsibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_deductible: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_copay: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_coinsurance: Option<f64>,

    // 年度累计
    #[serde(default, deserialize_with = "lenient::amount")]
    pub deductible_met_ytd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub deductible_remaining: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub out_of_pocket_met_ytd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub out_of_pocket_max: Option<f64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub claim_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub appeal_deadline: Option<NaiveDate>,
}
