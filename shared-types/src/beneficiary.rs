use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Registration payload for a beneficiary. Field validation is the
/// frontend's concern; the API stores what it receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBeneficiaryRequest {
    pub registered_by: i64,
    pub name: String,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub household_size: i64,
    /// Base64-encoded DNI image, stored through the upload service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BeneficiaryView {
    pub id: i64,
    pub registered_by: i64,
    pub name: String,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub household_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni_image: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BeneficiaryListResponse {
    pub beneficiaries: Vec<BeneficiaryView>,
}
