//! Administrative payloads: postal addresses and business identifiers.

use serde::{Deserialize, Serialize};

/// Identifier system used for medical record numbers.
pub const MRN_SYSTEM: &str = "http://www.acme-healthcare.com/mrn";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub resident_id: String,
    #[serde(rename = "use")]
    pub address_use: String,
    #[serde(rename = "type")]
    pub address_type: String,
    pub line: Vec<String>,
    pub city: String,
    pub state: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
    #[serde(rename = "type")]
    pub identifier_type: String,
}

impl Identifier {
    pub fn mrn(value: &str) -> Self {
        Self {
            system: MRN_SYSTEM.to_owned(),
            value: value.to_owned(),
            identifier_type: "MRN".to_owned(),
        }
    }
}
