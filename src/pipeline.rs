//! Pipeline – ties together declaration splitting, label expansion,
//! pagination, template layout and rendering into a single function call.

use serde::{Deserialize, Serialize};

use crate::declaration::{paginate_declarations, DECLARATION_CAPACITY};
use crate::error::Result;
use crate::geometry::compute_geometry;
use crate::job::PrintJob;
use crate::layout_config::LayoutConfig;
use crate::pagination::paginate;
use crate::render::render_pdf;
use crate::slots::build_label_set;
use crate::templates::{layout_pages, select_template};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Most letter grid columns (or rows) a sheet may be split into.
pub const MAX_GRID_TRACKS: usize = 64;

/// Most parcel bands a sheet may hold.
pub const MAX_PARCEL_BANDS: usize = 16;

/// Configuration for the label pipeline. Lengths are in points.
///
/// The defaults describe A4 sheets: 7 declaration items per form, a 2 × 8
/// grid of letter labels and 2 parcel bands per sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Declaration items per printed form before a recipient is split.
    pub declaration_capacity: usize,
    pub letter_columns: usize,
    pub letter_rows: usize,
    /// Sheet padding around the letter grid.
    pub letter_padding: f32,
    /// Horizontal gap between letter grid columns.
    pub letter_gap: f32,
    /// Parcel bands stacked on one sheet.
    pub parcel_bands_per_page: usize,
    /// Share of the band width taken by the shipping-label column.
    pub label_column_fraction: f32,
    /// Height of each receipt-acknowledgement slip.
    pub receipt_slip_height: f32,
    /// Inner padding applied by the renderer inside every region.
    pub region_padding: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "Etiquetas".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            declaration_capacity: DECLARATION_CAPACITY,
            letter_columns: 2,
            letter_rows: 8,
            letter_padding: 5.0 * PT_PER_MM,
            letter_gap: 1.0 * PT_PER_MM,
            parcel_bands_per_page: 2,
            label_column_fraction: 0.4,
            receipt_slip_height: 25.0 * PT_PER_MM,
            region_padding: 6.0,
        }
    }
}

impl PipelineConfig {
    /// Grid dimensions of the letter sheet, between one and
    /// [`MAX_GRID_TRACKS`] cells each way.
    pub fn letter_grid(&self) -> (usize, usize) {
        (
            self.letter_columns.clamp(1, MAX_GRID_TRACKS),
            self.letter_rows.clamp(1, MAX_GRID_TRACKS),
        )
    }

    /// Letter labels per sheet.
    pub fn letter_capacity(&self) -> usize {
        let (columns, rows) = self.letter_grid();
        columns.saturating_mul(rows)
    }

    /// Parcel bands per sheet, between one and [`MAX_PARCEL_BANDS`].
    pub fn parcel_capacity(&self) -> usize {
        self.parcel_bands_per_page.clamp(1, MAX_PARCEL_BANDS)
    }

    /// Deserialise from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Run the layout half of the pipeline: print job → frozen page structure.
///
/// Identical inputs always produce an identical [`LayoutConfig`].
pub fn compose_layout(job: &PrintJob, config: &PipelineConfig) -> Result<LayoutConfig> {
    let settings = job.settings;

    // 1. Split oversized declarations
    let recipients = paginate_declarations(
        job.recipients.as_slice(),
        settings.mode,
        config.declaration_capacity,
    );

    // 2. Expand into label units
    let labels = build_label_set(&job.sender, &recipients, &settings);

    // 3. Group into sheets
    let pages = paginate(&labels, config);

    // 4. Place units into template regions
    let template = select_template(&settings);
    let geometry = compute_geometry(template, config)?;
    let pages = layout_pages(&pages, &geometry);

    log::debug!(
        "Composed {} recipients into {} {template:?} pages",
        job.recipients.len(),
        pages.len()
    );

    let mut layout = LayoutConfig::for_geometry(&geometry, &config.title);
    layout.issued_on = job.issued_on;
    layout.pages = pages;
    Ok(layout)
}

/// Full pipeline: print job → PDF bytes.
///
/// Returns `(pdf_bytes, layout_config)`.
pub fn generate_pdf(job: &PrintJob, config: &PipelineConfig) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = compose_layout(job, config)?;
    let bytes = render_pdf(&layout, config.region_padding)?;
    Ok((bytes, layout))
}
