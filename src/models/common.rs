use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// 患者信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub member_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub group_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
}

/// 医疗机构 / 医生信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub npi: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tax_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

impl ProviderInfo {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// 保险计划信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub payer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub plan_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub plan_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub policy_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub group_number: Option<String>,
}
