//! Layout config – the intermediate representation between the layout
//! selector and PDF rendering. This is the "frozen" structure that encodes
//! exactly what goes on each page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::AddressParty;
use crate::error::Result;
use crate::geometry::TemplateGeometry;
use crate::slots::SlotRole;
use crate::templates::PageTemplate;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Template every page of this document uses.
    pub template: PageTemplate,
    /// Date printed on content declarations.
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    /// Ordered list of pages, one per physical sheet.
    pub pages: Vec<PageLayout>,
}

/// One physical sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// Every region of the template, filled or not.
    pub regions: Vec<Region>,
    /// Y positions (from the page top) of dashed cut lines between bands.
    #[serde(default)]
    pub cut_lines: Vec<f32>,
}

/// Named region kinds of the page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// One cell of the letter grid.
    LetterCell,
    /// Full shipping label (left side of a parcel band).
    ShippingLabel,
    /// Content declaration (right side of a parcel band).
    Declaration,
    /// Compact sender slip for receipt acknowledgement.
    SenderReceipt,
    /// Compact recipient slip for receipt acknowledgement.
    RecipientReceipt,
}

/// How an address block is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    /// Small letter label.
    Compact,
    /// Receipt-acknowledgement slip: centred, tighter type.
    Receipt,
}

/// What a region displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionContent {
    AddressBlock {
        role: SlotRole,
        party: AddressParty,
        style: BlockStyle,
    },
    ShippingLabel {
        sender: AddressParty,
        recipient: AddressParty,
    },
    Declaration {
        sender: AddressParty,
        recipient: AddressParty,
    },
}

/// A positioned template region with optional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    /// Fill index: grid cell for letter pages, band for parcel pages.
    pub group: usize,
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `None` when the page has fewer units than the template holds.
    pub content: Option<RegionContent>,
}

impl LayoutConfig {
    /// Create an empty layout sized and typed after a resolved template.
    pub fn for_geometry(geometry: &TemplateGeometry, title: &str) -> Self {
        Self {
            title: title.to_string(),
            page_width_pt: geometry.page_width,
            page_height_pt: geometry.page_height,
            template: geometry.template,
            issued_on: None,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Etiquetas".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of regions holding content, across all pages.
    pub fn filled_regions(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.regions)
            .filter(|r| r.content.is_some())
            .count()
    }
}

impl PageLayout {
    /// Filled regions of the given kind, in fill order.
    pub fn contents(&self, kind: RegionKind) -> impl Iterator<Item = &RegionContent> {
        self.regions
            .iter()
            .filter(move |r| r.kind == kind)
            .filter_map(|r| r.content.as_ref())
    }
}
