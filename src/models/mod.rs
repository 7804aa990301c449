pub mod authorization;
pub mod bill;
pub mod claim_form;
pub mod clinical;
pub mod common;
pub mod document;
pub mod eob;
pub mod lenient;
pub mod result;
pub mod summary;

pub use authorization::{AppealDecisionData, AuthorizedService, PriorAuthData};
pub use bill::{BillLineItem, ItemizedCharge, ItemizedStatementData, MedicalBillData};
pub use claim_form::{
    Cms1500Data, Cms1500ServiceLine, DentalClaimData, DentalServiceLine, DiagnosisCode,
    Ub04Data, Ub04RevenueLine,
};
pub use clinical::{LabReportData, LabTestResult, PharmacyReceiptData};
pub use common::{InsuranceInfo, PatientInfo, ProviderInfo};
pub use document::{ClaimsPacket, DocumentEnvelope, DocumentType, ExtractedData, ProcessedDocument};
pub use eob::{EobData, EobLineItem};
pub use result::{CheckKind, Severity, ValidationResult, ValidationStatus};
pub use summary::{FinancialSummary, PacketReport, SeverityCounts};
