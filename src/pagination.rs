//! Pagination – groups the expanded label set into physical pages.
//!
//! Every page template has a fixed number of units per sheet (16 small
//! labels in letter mode, 2 bands in parcel mode); pages are filled in
//! order and the last page may be partially filled.

use crate::pipeline::PipelineConfig;
use crate::slots::{LabelSet, ParcelBlock, Slot};

/// Split `items` into contiguous groups of `capacity`, the last possibly
/// shorter. Empty input yields no pages.
///
/// A `capacity` of 0 is treated as unbounded: everything lands on one page.
pub fn chunk<T: Clone>(items: &[T], capacity: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    if capacity == 0 {
        return vec![items.to_vec()];
    }
    items.chunks(capacity).map(<[T]>::to_vec).collect()
}

/// Label units grouped per physical page.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelPages {
    Letter(Vec<Vec<Slot>>),
    Parcel(Vec<Vec<ParcelBlock>>),
}

impl LabelPages {
    pub fn page_count(&self) -> usize {
        match self {
            LabelPages::Letter(pages) => pages.len(),
            LabelPages::Parcel(pages) => pages.len(),
        }
    }
}

/// Group a label set using the per-page capacity of its template.
pub fn paginate(labels: &LabelSet, config: &PipelineConfig) -> LabelPages {
    let pages = match labels {
        LabelSet::Letter(slots) => LabelPages::Letter(chunk(slots, config.letter_capacity())),
        LabelSet::Parcel(blocks) => LabelPages::Parcel(chunk(blocks, config.parcel_capacity())),
    };
    log::debug!("Paginated {} label units into {} pages", labels.len(), pages.page_count());
    pages
}
