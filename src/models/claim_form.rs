use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{InsuranceInfo, PatientInfo, ProviderInfo};
use super::lenient;

/// ICD-10 诊断编码 (带指针)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisCode {
    #[serde(default, deserialize_with = "lenient::text")]
    pub pointer: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icd10_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

/// CMS-1500 第 24 栏服务行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cms1500ServiceLine {
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub place_of_service: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub modifier_1: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub modifier_2: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub diagnosis_pointer: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub units: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rendering_provider_npi: Option<String>,
}

/// CMS-1500 专业理赔表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cms1500Data {
    #[serde(default, deserialize_with = "lenient::text")]
    pub payer_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insured: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::optional_block")]
    pub referring_provider: Option<ProviderInfo>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,
    #[serde(default, deserialize_with = "lenient::text")]
    pub patient_account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub accept_assignment: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub prior_authorization: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub diagnosis_codes: Vec<DiagnosisCode>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub service_lines: Vec<Cms1500ServiceLine>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charge: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub balance_due: Option<f64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub patient_signature_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub physician_signature_date: Option<NaiveDate>,
}

/// UB-04 收入行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ub04RevenueLine {
    #[serde(default, deserialize_with = "lenient::text")]
    pub revenue_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub hcpcs_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub units: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub non_covered_charges: Option<f64>,
}

/// UB-04 机构理赔表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ub04Data {
    #[serde(default, deserialize_with = "lenient::text")]
    pub facility_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub facility_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub facility_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub federal_tax_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,
    #[serde(default, deserialize_with = "lenient::date")]
    pub admission_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub admission_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub discharge_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub discharge_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub admission_diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub principal_diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub other_diagnoses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub principal_procedure: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub procedure_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub revenue_lines: Vec<Ub04RevenueLine>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_non_covered: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub estimated_amount_due: Option<f64>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::text")]
    pub attending_physician_npi: Option<String>,
}

/// 牙科服务行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DentalServiceLine {
    #[serde(default, deserialize_with = "lenient::date")]
    pub service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub area_of_oral_cavity: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tooth_system: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tooth_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tooth_surface: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cdt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub fee: Option<f64>,
}

/// ADA 牙科理赔表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DentalClaimData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub claim_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub predetermination_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub document_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub subscriber: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub billing_provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub insurance: InsuranceInfo,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub place_of_treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_orthodontic: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_prosthesis_replacement: Option<bool>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub prior_prosthesis_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub diagnosis_codes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub service_lines: Vec<DentalServiceLine>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_responsibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub remarks: Option<String>,
}
