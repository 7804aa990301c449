use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{PatientInfo, ProviderInfo};
use super::lenient;

/// 化验单中的单项结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabTestResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub test_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub result_value: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reference_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub flag: Option<String>,
}

/// 化验报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabReportData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub accession_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub report_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub ordering_provider: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub performing_lab: ProviderInfo,
    #[serde(default, deserialize_with = "lenient::date")]
    pub collection_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub specimen_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub panel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub test_results: Vec<LabTestResult>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub diagnosis_codes: Vec<String>,
}

/// 药房收据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PharmacyReceiptData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub pharmacy_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pharmacy_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pharmacy_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pharmacy_npi: Option<String>,
    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rx_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub fill_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub medication_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ndc_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub days_supply: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub prescriber_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub prescriber_npi: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub drug_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub insurance_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_copay: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_coinsurance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub deductible_applied: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub formulary_tier: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub prior_auth_required: Option<bool>,
}
