//! Declaration paginator – splits recipients whose content declaration does
//! not fit one printed form.

use crate::address::AddressParty;
use crate::pagination::chunk;
use crate::settings::ShippingMode;

/// Default maximum number of declaration items printed on one form.
pub const DECLARATION_CAPACITY: usize = 7;

/// Expand recipients with oversized declarations into one record per
/// declaration page.
///
/// In letter mode declarations are not printed and the input is returned
/// unchanged. In parcel mode a recipient with more than `capacity` items is
/// replaced by clones that each carry one contiguous chunk of its items, in
/// order. A `capacity` of 0 disables splitting.
pub fn paginate_declarations(
    recipients: &[AddressParty],
    mode: ShippingMode,
    capacity: usize,
) -> Vec<AddressParty> {
    if mode == ShippingMode::Letter {
        return recipients.to_vec();
    }
    if capacity == 0 {
        log::warn!("Declaration capacity is 0; declarations will not be split");
        return recipients.to_vec();
    }

    let mut out = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        if recipient.declaration_items.len() <= capacity {
            out.push(recipient.clone());
            continue;
        }
        let pages = chunk(&recipient.declaration_items, capacity);
        log::debug!(
            "Splitting declaration of {:?} ({} items) into {} forms",
            recipient.name,
            recipient.declaration_items.len(),
            pages.len()
        );
        out.extend(pages.into_iter().map(|items| AddressParty {
            declaration_items: items,
            ..recipient.clone()
        }));
    }
    out
}
