//! Postal-code lookup collaborator.
//!
//! The pipeline never calls a lookup itself; the form layer merges a hit
//! into its scratch record before the record is queued. A miss (unknown
//! code, malformed code, registry error) leaves the record untouched.

use std::collections::HashMap;

use serde::Deserialize;

use crate::address::{AddressParty, AddressPatch};

/// Number of digits in a Brazilian postal code (CEP).
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Something that resolves a postal code to partial address data.
pub trait AddressLookup {
    /// `postal_code` is already normalised to [`POSTAL_CODE_DIGITS`] digits.
    fn lookup(&self, postal_code: &str) -> Option<AddressPatch>;
}

/// Strip non-digits and accept only complete codes.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == POSTAL_CODE_DIGITS).then_some(digits)
}

/// Resolve the party's postal code and return the merged record, or an
/// unchanged copy when the code is malformed or unknown.
pub fn apply_lookup(party: &AddressParty, lookup: &dyn AddressLookup) -> AddressParty {
    let Some(code) = normalize_postal_code(&party.postal_code) else {
        log::debug!("Skipping lookup for malformed postal code {:?}", party.postal_code);
        return party.clone();
    };
    match lookup.lookup(&code) {
        Some(patch) => party.merged_with(&patch),
        None => {
            log::debug!("Postal code {code} not found");
            party.clone()
        }
    }
}

/// Response body of the ViaCEP registry (`/ws/<cep>/json/`).
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    /// Present (as `true` or `"true"`) when the code does not exist.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// Decode a ViaCEP response body. Error markers and undecodable bodies are
/// both treated as "not found".
pub fn parse_viacep_response(body: &str) -> Option<AddressPatch> {
    let resp: ViaCepResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Unreadable postal-code response: {e}");
            return None;
        }
    };
    if resp.erro.as_ref().is_some_and(is_error_marker) {
        return None;
    }
    Some(AddressPatch {
        postal_code: resp.cep,
        street: resp.logradouro,
        district: resp.bairro,
        city: resp.localidade,
        state: resp.uf,
    })
}

/// ViaCEP flags unknown codes with `"erro": true` (older API: `"true"`).
fn is_error_marker(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => s == "true",
        _ => false,
    }
}

/// In-memory directory keyed by normalised postal code.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, AddressPatch>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Malformed codes are ignored.
    pub fn insert(&mut self, postal_code: &str, patch: AddressPatch) {
        if let Some(code) = normalize_postal_code(postal_code) {
            self.entries.insert(code, patch);
        }
    }
}

impl AddressLookup for StaticDirectory {
    fn lookup(&self, postal_code: &str) -> Option<AddressPatch> {
        self.entries.get(postal_code).cloned()
    }
}
