//! Print jobs – everything one print/preview request needs, passed into the
//! pipeline explicitly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::AddressParty;
use crate::error::Result;
use crate::queue::RecipientQueue;
use crate::settings::PrintSettings;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrintJob {
    pub sender: AddressParty,
    pub recipients: RecipientQueue,
    pub settings: PrintSettings,
    /// Date printed on declarations; the CLI fills in today when absent.
    pub issued_on: Option<NaiveDate>,
}

impl PrintJob {
    pub fn new(sender: AddressParty, recipients: RecipientQueue, settings: PrintSettings) -> Self {
        Self {
            sender,
            recipients,
            settings,
            issued_on: None,
        }
    }

    /// Parse a job from JSON. Recipients go through
    /// [`RecipientQueue::confirm`] in file order, so an incomplete record
    /// rejects the whole job.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawJob = serde_json::from_str(json)?;
        let mut recipients = RecipientQueue::new();
        for recipient in &raw.recipients {
            recipients.confirm(recipient)?;
        }
        Ok(Self {
            sender: raw.sender.normalized(),
            recipients,
            settings: raw.settings,
            issued_on: raw.issued_on,
        })
    }

    /// Document title handed to the print trigger.
    pub fn title(&self) -> Option<String> {
        self.issued_on.map(job_title)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawJob {
    sender: AddressParty,
    recipients: Vec<AddressParty>,
    settings: PrintSettings,
    issued_on: Option<NaiveDate>,
}

/// `Etiquetas-Correios-YYYY-MM-DD`.
pub fn job_title(date: NaiveDate) -> String {
    format!("Etiquetas-Correios-{}", date.format("%Y-%m-%d"))
}
