//! Label-set builder – expands the recipient queue into the units the page
//! chunker groups.
//!
//! The two shipping modes use different units:
//! - **letter**: one [`Slot`] per printed address block; each recipient
//!   contributes a (sender, recipient) pair, twice with receipt
//!   acknowledgement.
//! - **parcel**: one [`ParcelBlock`] per recipient, since a shipping label
//!   and its declaration are printed together in a single band.

use serde::{Deserialize, Serialize};

use crate::address::AddressParty;
use crate::settings::{PrintSettings, ShippingMode};

/// Which side of the shipment an address block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    Sender,
    Recipient,
}

impl SlotRole {
    /// Heading printed above the address block.
    pub fn heading(self) -> &'static str {
        match self {
            SlotRole::Sender => "REMETENTE",
            SlotRole::Recipient => "DESTINATÁRIO",
        }
    }
}

/// One renderable address block in letter mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub party: AddressParty,
    pub role: SlotRole,
}

/// A sender/recipient pair printed as one parcel band. The recipient
/// carries the declaration items for this band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelBlock {
    pub sender: AddressParty,
    pub recipient: AddressParty,
}

/// The expanded label set of a print job.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSet {
    Letter(Vec<Slot>),
    Parcel(Vec<ParcelBlock>),
}

impl LabelSet {
    /// Number of units (slots or blocks) in the set.
    pub fn len(&self) -> usize {
        match self {
            LabelSet::Letter(slots) => slots.len(),
            LabelSet::Parcel(blocks) => blocks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Letter-mode expansion: `(sender, recipient)` per recipient, repeated
/// immediately when receipt acknowledgement is on.
pub fn build_slots(
    sender: &AddressParty,
    recipients: &[AddressParty],
    settings: &PrintSettings,
) -> Vec<Slot> {
    let copies = if settings.receipt_ack { 2 } else { 1 };
    let mut slots = Vec::with_capacity(recipients.len() * 2 * copies);
    for recipient in recipients {
        for _ in 0..copies {
            slots.push(Slot {
                party: sender.clone(),
                role: SlotRole::Sender,
            });
            slots.push(Slot {
                party: recipient.clone(),
                role: SlotRole::Recipient,
            });
        }
    }
    slots
}

/// Parcel-mode expansion: each recipient becomes one sender/recipient block.
pub fn build_parcel_blocks(sender: &AddressParty, recipients: &[AddressParty]) -> Vec<ParcelBlock> {
    recipients
        .iter()
        .map(|recipient| ParcelBlock {
            sender: sender.clone(),
            recipient: recipient.clone(),
        })
        .collect()
}

/// Expand according to the shipping mode.
pub fn build_label_set(
    sender: &AddressParty,
    recipients: &[AddressParty],
    settings: &PrintSettings,
) -> LabelSet {
    match settings.mode {
        ShippingMode::Letter => LabelSet::Letter(build_slots(sender, recipients, settings)),
        ShippingMode::Parcel => LabelSet::Parcel(build_parcel_blocks(sender, recipients)),
    }
}
