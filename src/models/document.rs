use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::authorization::{AppealDecisionData, PriorAuthData};
use super::bill::{ItemizedStatementData, MedicalBillData};
use super::claim_form::{Cms1500Data, DentalClaimData, Ub04Data};
use super::clinical::{LabReportData, PharmacyReceiptData};
use super::common::PatientInfo;
use super::eob::EobData;

/// 分类服务给出的文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Eob,
    Cms1500,
    Ub04,
    MedicalBill,
    PharmacyReceipt,
    LabReport,
    DentalClaim,
    PriorAuth,
    AppealDecision,
    ItemizedStatement,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eob => "EOB",
            Self::Cms1500 => "CMS-1500",
            Self::Ub04 => "UB-04",
            Self::MedicalBill => "MEDICAL_BILL",
            Self::PharmacyReceipt => "PHARMACY_RECEIPT",
            Self::LabReport => "LAB_REPORT",
            Self::DentalClaim => "DENTAL_CLAIM",
            Self::PriorAuth => "PRIOR_AUTH",
            Self::AppealDecision => "APPEAL_DECISION",
            Self::ItemizedStatement => "ITEMIZED_STATEMENT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// 解析类型标签: 忽略大小写, `-` / 空格 / `_` 视为同一分隔符。
    /// 无法识别的标签归为 UNKNOWN。
    pub fn from_label(label: &str) -> Self {
        let folded: String = label
            .trim()
            .chars()
            .filter_map(|c| match c {
                '-' | '_' | ' ' => None,
                c => Some(c.to_ascii_uppercase()),
            })
            .collect();

        match folded.as_str() {
            "EOB" | "EXPLANATIONOFBENEFITS" => Self::Eob,
            "CMS1500" | "HCFA1500" => Self::Cms1500,
            "UB04" | "CMS1450" => Self::Ub04,
            "MEDICALBILL" => Self::MedicalBill,
            "PHARMACYRECEIPT" => Self::PharmacyReceipt,
            "LABREPORT" => Self::LabReport,
            "DENTALCLAIM" => Self::DentalClaim,
            "PRIORAUTH" | "PRIORAUTHORIZATION" => Self::PriorAuth,
            "APPEALDECISION" => Self::AppealDecision,
            "ITEMIZEDSTATEMENT" => Self::ItemizedStatement,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(Self::from_label)
            .unwrap_or(Self::Unknown))
    }
}

/// 文档元数据信封 (创建后不可变)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEnvelope {
    pub doc_id: String,
    #[serde(default)]
    pub filename: String,
    pub classified_type: DocumentType,
    #[serde(default)]
    pub classification_confidence: f64,
    #[serde(default)]
    pub field_confidence: BTreeMap<String, f64>,
    #[serde(default)]
    pub extraction_warnings: Vec<String>,
}

impl DocumentEnvelope {
    pub fn new(doc_id: impl Into<String>, classified_type: DocumentType) -> Self {
        Self {
            doc_id: doc_id.into(),
            filename: String::new(),
            classified_type,
            classification_confidence: 1.0,
            field_confidence: BTreeMap::new(),
            extraction_warnings: Vec::new(),
        }
    }
}

/// 按文档类型区分的抽取结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedData {
    Eob(EobData),
    Cms1500(Cms1500Data),
    Ub04(Ub04Data),
    MedicalBill(MedicalBillData),
    PharmacyReceipt(PharmacyReceiptData),
    LabReport(LabReportData),
    DentalClaim(DentalClaimData),
    PriorAuth(PriorAuthData),
    AppealDecision(AppealDecisionData),
    ItemizedStatement(ItemizedStatementData),
    Unknown(Value),
}

impl ExtractedData {
    /// 按分类类型解析原始字段映射。
    /// 映射不是对象 (或整体无法解析) 时得到该类型的空结构。
    pub fn from_value(doc_type: DocumentType, value: Value) -> Self {
        fn parse<T: serde::de::DeserializeOwned + Default>(value: Value) -> T {
            if value.is_object() {
                serde_json::from_value(value).unwrap_or_default()
            } else {
                T::default()
            }
        }

        match doc_type {
            DocumentType::Eob => Self::Eob(parse(value)),
            DocumentType::Cms1500 => Self::Cms1500(parse(value)),
            DocumentType::Ub04 => Self::Ub04(parse(value)),
            DocumentType::MedicalBill => Self::MedicalBill(parse(value)),
            DocumentType::PharmacyReceipt => Self::PharmacyReceipt(parse(value)),
            DocumentType::LabReport => Self::LabReport(parse(value)),
            DocumentType::DentalClaim => Self::DentalClaim(parse(value)),
            DocumentType::PriorAuth => Self::PriorAuth(parse(value)),
            DocumentType::AppealDecision => Self::AppealDecision(parse(value)),
            DocumentType::ItemizedStatement => Self::ItemizedStatement(parse(value)),
            DocumentType::Unknown => Self::Unknown(value),
        }
    }

    /// 文档中的患者信息块 (药房 / 未知类型也可能带)
    pub fn patient(&self) -> Option<&PatientInfo> {
        match self {
            Self::Eob(d) => Some(&d.patient),
            Self::Cms1500(d) => Some(&d.patient),
            Self::Ub04(d) => Some(&d.patient),
            Self::MedicalBill(d) => Some(&d.patient),
            Self::PharmacyReceipt(d) => Some(&d.patient),
            Self::LabReport(d) => Some(&d.patient),
            Self::DentalClaim(d) => Some(&d.patient),
            Self::PriorAuth(d) => Some(&d.patient),
            Self::AppealDecision(d) => Some(&d.patient),
            Self::ItemizedStatement(d) => Some(&d.patient),
            Self::Unknown(_) => None,
        }
    }
}

/// 已分类 + 已抽取的文档, 校验引擎的输入单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct ProcessedDocument {
    pub envelope: DocumentEnvelope,
    pub extracted_data: ExtractedData,
}

impl ProcessedDocument {
    pub fn new(envelope: DocumentEnvelope, extracted_data: ExtractedData) -> Self {
        Self {
            envelope,
            extracted_data,
        }
    }

    /// 由信封和原始 JSON 字段映射构建
    pub fn from_json(envelope: DocumentEnvelope, extracted_data: Value) -> Self {
        let data = ExtractedData::from_value(envelope.classified_type, extracted_data);
        Self::new(envelope, data)
    }

    pub fn doc_id(&self) -> &str {
        &self.envelope.doc_id
    }

    pub fn doc_type(&self) -> DocumentType {
        self.envelope.classified_type
    }
}

#[derive(Deserialize)]
struct RawDocument {
    envelope: DocumentEnvelope,
    #[serde(default)]
    extracted_data: Value,
}

impl From<RawDocument> for ProcessedDocument {
    fn from(raw: RawDocument) -> Self {
        Self::from_json(raw.envelope, raw.extracted_data)
    }
}

/// 一次提交的文档包
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsPacket {
    #[serde(default)]
    pub packet_id: Option<String>,
    #[serde(default)]
    pub documents: Vec<ProcessedDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_labels_fold_case_and_separators() {
        assert_eq!(DocumentType::from_label("EOB"), DocumentType::Eob);
        assert_eq!(DocumentType::from_label("cms1500"), DocumentType::Cms1500);
        assert_eq!(DocumentType::from_label("UB_04"), DocumentType::Ub04);
        assert_eq!(DocumentType::from_label("prior auth"), DocumentType::PriorAuth);
        assert_eq!(DocumentType::from_label("FAX_COVER"), DocumentType::Unknown);
    }

    #[test]
    fn document_type_serializes_to_canonical_label() {
        let json = serde_json::to_value(DocumentType::Cms1500).unwrap();
        assert_eq!(json, json!("CMS-1500"));
    }

    #[test]
    fn processed_document_picks_schema_from_envelope() {
        let doc: ProcessedDocument = serde_json::from_value(json!({
            "envelope": {"doc_id": "eob-1", "classified_type": "EOB"},
            "extracted_data": {"total_billed": "600.00", "line_items": [{"billed_amount": 200}]}
        }))
        .unwrap();

        match &doc.extracted_data {
            ExtractedData::Eob(eob) => {
                assert_eq!(eob.total_billed, Some(600.0));
                assert_eq!(eob.line_items.len(), 1);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn malformed_containers_degrade_to_absent_fields() {
        let doc: ProcessedDocument = serde_json::from_value(json!({
            "envelope": {"doc_id": "bill-1", "classified_type": "MEDICAL_BILL"},
            "extracted_data": {
                "provider": "Hospital A",
                "line_items": {"amount": 10},
                "total_charges": [1, 2],
                "balance_due": 50
            }
        }))
        .unwrap();

        let ExtractedData::MedicalBill(bill) = &doc.extracted_data else {
            panic!("expected a medical bill");
        };
        assert_eq!(bill.provider.name, None);
        assert!(bill.line_items.is_empty());
        assert_eq!(bill.total_charges, None);
        assert_eq!(bill.balance_due, Some(50.0));
    }

    #[test]
    fn non_object_payload_yields_empty_schema() {
        let envelope = DocumentEnvelope::new("lab-1", DocumentType::LabReport);
        let doc = ProcessedDocument::from_json(envelope, json!("garbled"));
        assert_eq!(doc.extracted_data, ExtractedData::LabReport(LabReportData::default()));
    }
}
