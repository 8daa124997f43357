//! Layout selector – picks the page template for a job and assigns each
//! page's label units to the template's regions.
//!
//! Three templates exist:
//! - **Letter**: a grid of small address labels, filled row-major.
//! - **Parcel**: stacked bands of shipping label + content declaration.
//! - **Parcel with receipt**: as parcel, with the label column preceded by
//!   a sender slip and a recipient slip for the acknowledgement of receipt.
//!
//! Regions are fixed per template. A partially filled page keeps every
//! region and leaves the unused ones empty.

use serde::{Deserialize, Serialize};

use crate::geometry::{RegionFrame, TemplateGeometry};
use crate::layout_config::{BlockStyle, PageLayout, Region, RegionContent, RegionKind};
use crate::pagination::LabelPages;
use crate::settings::{PrintSettings, ShippingMode};
use crate::slots::{ParcelBlock, Slot, SlotRole};

/// Physical page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    Letter,
    Parcel,
    ParcelWithReceipt,
}

impl PageTemplate {
    /// Region kinds making up one fill unit (grid cell or band), top to
    /// bottom then left to right.
    pub fn unit_regions(self) -> &'static [RegionKind] {
        match self {
            PageTemplate::Letter => &[RegionKind::LetterCell],
            PageTemplate::Parcel => &[RegionKind::ShippingLabel, RegionKind::Declaration],
            PageTemplate::ParcelWithReceipt => &[
                RegionKind::SenderReceipt,
                RegionKind::RecipientReceipt,
                RegionKind::ShippingLabel,
                RegionKind::Declaration,
            ],
        }
    }
}

/// Choose the template for the given settings.
pub fn select_template(settings: &PrintSettings) -> PageTemplate {
    match (settings.mode, settings.receipt_ack) {
        (ShippingMode::Letter, _) => PageTemplate::Letter,
        (ShippingMode::Parcel, false) => PageTemplate::Parcel,
        (ShippingMode::Parcel, true) => PageTemplate::ParcelWithReceipt,
    }
}

fn letter_content(frame: &RegionFrame, slots: &[Slot]) -> Option<RegionContent> {
    let slot = slots.get(frame.group)?;
    match frame.kind {
        RegionKind::LetterCell => Some(RegionContent::AddressBlock {
            role: slot.role,
            party: slot.party.clone(),
            style: BlockStyle::Compact,
        }),
        _ => None,
    }
}

fn parcel_content(frame: &RegionFrame, blocks: &[ParcelBlock]) -> Option<RegionContent> {
    let block = blocks.get(frame.group)?;
    let content = match frame.kind {
        RegionKind::ShippingLabel => RegionContent::ShippingLabel {
            sender: block.sender.clone(),
            recipient: block.recipient.clone(),
        },
        RegionKind::Declaration => RegionContent::Declaration {
            sender: block.sender.clone(),
            recipient: block.recipient.clone(),
        },
        RegionKind::SenderReceipt => RegionContent::AddressBlock {
            role: SlotRole::Sender,
            party: block.sender.clone(),
            style: BlockStyle::Receipt,
        },
        RegionKind::RecipientReceipt => RegionContent::AddressBlock {
            role: SlotRole::Recipient,
            party: block.recipient.clone(),
            style: BlockStyle::Receipt,
        },
        RegionKind::LetterCell => return None,
    };
    Some(content)
}

fn place(frame: &RegionFrame, content: Option<RegionContent>) -> Region {
    Region {
        kind: frame.kind,
        group: frame.group,
        x: frame.x,
        y: frame.y,
        width: frame.width,
        height: frame.height,
        content,
    }
}

/// Assign every page's units to the regions of `geometry`.
///
/// Units beyond the template's capacity are never placed; pages are
/// expected to come from [`crate::pagination::paginate`] with the same
/// configuration. Units whose kind does not match the template leave their
/// regions empty.
pub fn layout_pages(pages: &LabelPages, geometry: &TemplateGeometry) -> Vec<PageLayout> {
    let page_layout = |page_index: usize, regions: Vec<Region>| PageLayout {
        page_index,
        regions,
        cut_lines: geometry.cut_lines.clone(),
    };

    match pages {
        LabelPages::Letter(pages) => pages
            .iter()
            .enumerate()
            .map(|(i, slots)| {
                let regions = geometry
                    .frames
                    .iter()
                    .map(|f| place(f, letter_content(f, slots)))
                    .collect();
                page_layout(i, regions)
            })
            .collect(),
        LabelPages::Parcel(pages) => pages
            .iter()
            .enumerate()
            .map(|(i, blocks)| {
                let regions = geometry
                    .frames
                    .iter()
                    .map(|f| place(f, parcel_content(f, blocks)))
                    .collect();
                page_layout(i, regions)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressParty;
    use crate::geometry::compute_geometry;
    use crate::pagination::paginate;
    use crate::pipeline::PipelineConfig;
    use crate::slots::build_label_set;

    fn recipients(n: usize) -> Vec<AddressParty> {
        (0..n).map(|i| AddressParty::new(format!("R{i}"), "20040-002")).collect()
    }

    fn run(n: usize, settings: PrintSettings) -> Vec<PageLayout> {
        let config = PipelineConfig::default();
        let sender = AddressParty::new("Loja", "01001-000");
        let set = build_label_set(&sender, &recipients(n), &settings);
        let pages = paginate(&set, &config);
        let geometry = compute_geometry(select_template(&settings), &config).unwrap();
        layout_pages(&pages, &geometry)
    }

    #[test]
    fn template_selection() {
        assert_eq!(select_template(&PrintSettings::letter()), PageTemplate::Letter);
        assert_eq!(
            select_template(&PrintSettings::letter().with_receipt_ack()),
            PageTemplate::Letter
        );
        assert_eq!(select_template(&PrintSettings::parcel()), PageTemplate::Parcel);
        assert_eq!(
            select_template(&PrintSettings::parcel().with_receipt_ack()),
            PageTemplate::ParcelWithReceipt
        );
    }

    #[test]
    fn partial_letter_page_keeps_empty_cells() {
        let pages = run(3, PrintSettings::letter());
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.regions.len(), 16);
        assert!(page.regions[..6].iter().all(|r| r.content.is_some()));
        assert!(page.regions[6..].iter().all(|r| r.content.is_none()));
    }

    #[test]
    fn letter_cells_alternate_sender_and_recipient() {
        let pages = run(2, PrintSettings::letter());
        let roles: Vec<_> = pages[0]
            .contents(RegionKind::LetterCell)
            .map(|c| match c {
                RegionContent::AddressBlock { role, .. } => *role,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            roles,
            [SlotRole::Sender, SlotRole::Recipient, SlotRole::Sender, SlotRole::Recipient]
        );
    }

    #[test]
    fn single_parcel_leaves_second_band_empty() {
        let pages = run(1, PrintSettings::parcel());
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.regions.len(), 4);
        for region in &page.regions {
            assert_eq!(region.content.is_some(), region.group == 0, "{region:?}");
        }
        assert_eq!(page.cut_lines.len(), 1);
    }

    #[test]
    fn receipt_band_fills_slips_with_own_parties() {
        let pages = run(1, PrintSettings::parcel().with_receipt_ack());
        let page = &pages[0];
        let slip = |kind| page.contents(kind).next().cloned();
        match slip(RegionKind::SenderReceipt) {
            Some(RegionContent::AddressBlock { role, party, style }) => {
                assert_eq!(role, SlotRole::Sender);
                assert_eq!(party.name, "Loja");
                assert_eq!(style, BlockStyle::Receipt);
            }
            other => panic!("unexpected {other:?}"),
        }
        match slip(RegionKind::RecipientReceipt) {
            Some(RegionContent::AddressBlock { party, .. }) => assert_eq!(party.name, "R0"),
            other => panic!("unexpected {other:?}"),
        };
    }

    #[test]
    fn no_recipients_no_pages() {
        assert!(run(0, PrintSettings::letter()).is_empty());
        assert!(run(0, PrintSettings::parcel()).is_empty());
    }

    #[test]
    fn unit_regions_match_geometry() {
        let config = PipelineConfig::default();
        for template in [PageTemplate::Letter, PageTemplate::Parcel, PageTemplate::ParcelWithReceipt] {
            let g = compute_geometry(template, &config).unwrap();
            let band0: Vec<_> = g.frames.iter().filter(|f| f.group == 0).map(|f| f.kind).collect();
            assert_eq!(band0, template.unit_regions());
        }
    }
}
