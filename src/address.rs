//! Address records – the postal parties (sender and recipients) and the
//! content-declaration items a recipient carries.
//!
//! Records are plain values. Every edit produces a new record
//! ([`AddressParty::merged_with`], [`AddressParty::normalized`]) so queued
//! copies are never affected by later edits to the scratch record.

use serde::{Deserialize, Serialize};

/// Kind of phone number printed on the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneKind {
    #[default]
    Mobile,
    Landline,
}

/// Whether a party lives inside the home country or abroad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    #[default]
    Domestic,
    International,
}

/// One line of a content declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationItem {
    pub description: String,
    pub quantity: u32,
    /// Unit value in BRL.
    pub unit_value: f64,
}

impl DeclarationItem {
    pub fn new(description: impl Into<String>, quantity: u32, unit_value: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_value,
        }
    }

    /// `quantity × unit_value`.
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_value
    }
}

/// Fields returned by an address lookup. `None` fields are left untouched
/// when merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressPatch {
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// One postal actor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressParty {
    pub name: String,
    pub phone: String,
    pub phone_kind: PhoneKind,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub destination: DestinationKind,
    /// ISO country code. Only meaningful when `destination` is
    /// [`DestinationKind::International`].
    pub country_code: Option<String>,
    /// Declared contents, in display order. Only recipients declare items.
    pub declaration_items: Vec<DeclarationItem>,
}

impl AddressParty {
    pub fn new(name: impl Into<String>, postal_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            postal_code: postal_code.into(),
            ..Self::default()
        }
    }

    pub fn is_international(&self) -> bool {
        self.destination == DestinationKind::International
    }

    /// Country code of an international party; always `None` for domestic
    /// ones, whatever the raw field holds.
    pub fn destination_country(&self) -> Option<&str> {
        if !self.is_international() {
            return None;
        }
        self.country_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Return a copy with the record invariants applied: the country code is
    /// cleared for domestic parties and upper-cased otherwise, and unit
    /// values are clamped to finite non-negative numbers.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.country_code = self.destination_country().map(str::to_uppercase);
        for item in &mut out.declaration_items {
            if !item.unit_value.is_finite() || item.unit_value < 0.0 {
                item.unit_value = 0.0;
            }
        }
        out
    }

    /// Return a copy with every `Some` field of `patch` applied.
    pub fn merged_with(&self, patch: &AddressPatch) -> Self {
        let mut out = self.clone();
        let fields = [
            (&mut out.postal_code, &patch.postal_code),
            (&mut out.street, &patch.street),
            (&mut out.district, &patch.district),
            (&mut out.city, &patch.city),
            (&mut out.state, &patch.state),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                *field = v.clone();
            }
        }
        out
    }

    /// First mandatory identifying field that is blank, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.postal_code.trim().is_empty() {
            Some("postal_code")
        } else {
            None
        }
    }

    /// Postal code with every non-digit stripped.
    pub fn postal_digits(&self) -> String {
        self.postal_code.chars().filter(char::is_ascii_digit).collect()
    }

    /// Sum of declared quantities.
    pub fn declared_quantity(&self) -> u64 {
        self.declaration_items
            .iter()
            .map(|i| u64::from(i.quantity))
            .sum()
    }

    /// Sum of declared line totals, in BRL.
    pub fn declared_value(&self) -> f64 {
        self.declaration_items.iter().map(DeclarationItem::line_total).sum()
    }

    /// `"street, number complement"`, as printed on every label.
    pub fn street_line(&self) -> String {
        format!("{}, {} {}", self.street, self.number, self.complement)
            .trim_end()
            .to_string()
    }

    /// `"district - city/state"`.
    pub fn locality_line(&self) -> String {
        format!("{} - {}/{}", self.district, self.city, self.state)
    }
}
