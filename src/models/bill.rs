use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{PatientInfo, ProviderInfo};
use super::lenient;

/// 医疗账单明细行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    #[serde(default, deserialize_with = "lenient::date")]
    pub service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
}

/// 医疗机构账单 / 患者对账单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalBillData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub statement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub invoice_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,

    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub line_items: Vec<BillLineItem>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub insurance_adjustments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub insurance_payments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub patient_payments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub balance_due: Option<f64>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub payment_plan_available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub financial_assistance_note: Option<String>,
}

/// 明细清单中的单项收费
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemizedCharge {
    #[serde(default, deserialize_with = "lenient::date")]
    pub service_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub revenue_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cpt_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
}

/// 医院明细清单 (比普通账单粒度更细)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemizedStatementData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub statement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub medical_record_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::block")]
    pub patient: PatientInfo,
    #[serde(default, deserialize_with = "lenient::block")]
    pub provider: ProviderInfo,

    #[serde(default, deserialize_with = "lenient::date")]
    pub admission_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub discharge_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_service_end: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub charges: Vec<ItemizedCharge>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_charges: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_adjustments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_insurance_payments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_patient_payments: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub balance_due: Option<f64>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub page_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_line_items: Option<i64>,
}
