//! # label-forge – shipping label and content declaration pagination
//!
//! This crate turns a print job (sender, queue of recipients, print
//! settings) into printable A4 sheets. The pipeline stages are:
//!
//! 1. **Split declarations** – recipients with too many declared items
//!    become one record per declaration form ([`declaration`])
//! 2. **Expand** – recipients become letter slots or parcel blocks
//!    ([`slots`])
//! 3. **Paginate** – units are grouped per sheet ([`pagination`])
//! 4. **Lay out** – each sheet's units are assigned to the regions of its
//!    page template ([`templates`], geometry in [`geometry`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! Stages 1–4 are pure and deterministic; [`pipeline::compose_layout`]
//! exposes them without rendering.

pub mod address;
pub mod barcode;
pub mod compose;
pub mod countries;
pub mod declaration;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod job;
pub mod layout_config;
pub mod lookup;
pub mod pagination;
pub mod pipeline;
pub mod queue;
pub mod render;
pub mod settings;
pub mod slots;
pub mod templates;

// Re-exports for convenience
pub use address::{AddressParty, DeclarationItem};
pub use error::LabelError;
pub use job::PrintJob;
pub use pipeline::{compose_layout, generate_pdf, PipelineConfig};
pub use settings::{PrintSettings, ShippingMode};
