//! Print settings chosen once per print job.

use serde::{Deserialize, Serialize};

/// How the mail piece is shipped; decides both the label expansion and the
/// page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMode {
    /// Boxed parcel: shipping label plus content declaration per recipient.
    #[default]
    Parcel,
    /// Envelope: small address labels only.
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    pub mode: ShippingMode,
    /// Receipt acknowledgement (AR): print duplicate compact address labels.
    pub receipt_ack: bool,
}

impl PrintSettings {
    pub fn new(mode: ShippingMode, receipt_ack: bool) -> Self {
        Self { mode, receipt_ack }
    }

    pub fn letter() -> Self {
        Self::new(ShippingMode::Letter, false)
    }

    pub fn parcel() -> Self {
        Self::new(ShippingMode::Parcel, false)
    }

    pub fn with_receipt_ack(self) -> Self {
        Self {
            receipt_ack: true,
            ..self
        }
    }
}
