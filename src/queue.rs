//! The ordered queue of confirmed recipients.

use serde::{Deserialize, Serialize};

use crate::address::AddressParty;
use crate::error::{LabelError, Result};

/// Recipients confirmed for printing, in insertion order.
///
/// Records are stored by value: confirming copies the caller's scratch
/// record, so later edits to it never reach the queue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientQueue {
    recipients: Vec<AddressParty>,
}

impl RecipientQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a normalised copy of `recipient`.
    ///
    /// Rejects records without a name or postal code; the queue is left
    /// unchanged in that case.
    pub fn confirm(&mut self, recipient: &AddressParty) -> Result<()> {
        if let Some(field) = recipient.missing_required() {
            return Err(LabelError::IncompleteRecord { field });
        }
        self.recipients.push(recipient.normalized());
        log::debug!("Queued recipient #{}", self.recipients.len());
        Ok(())
    }

    /// Remove the recipient at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<AddressParty> {
        (index < self.recipients.len()).then(|| self.recipients.remove(index))
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn as_slice(&self) -> &[AddressParty] {
        &self.recipients
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressParty> {
        self.recipients.iter()
    }
}

impl<'a> IntoIterator for &'a RecipientQueue {
    type Item = &'a AddressParty;
    type IntoIter = std::slice::Iter<'a, AddressParty>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_copies_the_record() {
        let mut scratch = AddressParty::new("Ana", "01001-000");
        let mut queue = RecipientQueue::new();
        queue.confirm(&scratch).unwrap();
        scratch.name = "Bruno".into();
        assert_eq!(queue.as_slice()[0].name, "Ana");
    }

    #[test]
    fn incomplete_records_are_rejected() {
        let mut queue = RecipientQueue::new();
        let err = queue.confirm(&AddressParty::new("Ana", "")).unwrap_err();
        assert!(matches!(err, LabelError::IncompleteRecord { field: "postal_code" }));
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_by_index_keeps_order() {
        let mut queue = RecipientQueue::new();
        for name in ["A", "B", "C"] {
            queue.confirm(&AddressParty::new(name, "01001-000")).unwrap();
        }
        assert_eq!(queue.remove(1).map(|r| r.name), Some("B".to_string()));
        assert_eq!(queue.remove(7), None);
        let names: Vec<_> = queue.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }
}
