//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Each filled region is composed into blocks ([`crate::compose`]) and drawn
//! top to bottom inside the region's padding. Blocks that do not fit are
//! clipped at the region's bottom edge; text wider than its cell is
//! truncated with an ellipsis.

use printpdf::*;

use crate::compose::{compose, Align, Block, TextRow};
use crate::error::{LabelError, Result};
use crate::fonts::{line_height, measure_text_width, truncate_to_width};
use crate::layout_config::{LayoutConfig, Region, RegionKind};

const PT_TO_MM: f32 = 0.352778;
const LINE_HEIGHT_FACTOR: f32 = 1.25;
/// Widest bar module of the postal barcode.
const MAX_MODULE_WIDTH: f32 = 1.4;
const CUT_DASH: f32 = 4.0;
const CUT_GAP: f32 = 3.0;

/// Render a LayoutConfig into PDF bytes.
///
/// Empty regions draw nothing. A layout without pages still yields a
/// one-page document.
pub fn render_pdf(config: &LayoutConfig, region_padding: f32) -> Result<Vec<u8>> {
    if !(config.page_width_pt > 0.0 && config.page_height_pt > 0.0) {
        return Err(LabelError::Render(format!(
            "invalid page size {}×{} pt",
            config.page_width_pt, config.page_height_pt
        )));
    }
    let page_w = Mm(config.page_width_pt * PT_TO_MM); // pt → mm
    let page_h = Mm(config.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&config.title);

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::new();

    for page_layout in &config.pages {
        let mut ops = Vec::new();

        for region in &page_layout.regions {
            render_region(&mut ops, region, config, region_padding);
        }
        for &y in &page_layout.cut_lines {
            draw_cut_line(&mut ops, y, config.page_width_pt, config.page_height_pt);
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    log::debug!("Rendering {} pages", pages.len());
    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());

    Ok(bytes)
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn black() -> Color {
    Color::Rgb(Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Border weight per region kind; letter cells print without a frame.
fn border_weight(kind: RegionKind) -> Option<f32> {
    match kind {
        RegionKind::LetterCell => None,
        RegionKind::ShippingLabel => Some(1.0),
        RegionKind::Declaration => Some(1.5),
        RegionKind::SenderReceipt | RegionKind::RecipientReceipt => Some(0.5),
    }
}

/// Outline a rectangle given in top-left page coordinates.
fn stroke_rect(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, h: f32, page_height: f32, weight: f32) {
    // PDF coordinate system: origin at bottom-left.
    let top = page_height - y;
    let bottom = top - h;
    ops.push(Op::SetOutlineColor { col: black() });
    ops.push(Op::SetOutlineThickness { pt: Pt(weight) });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                point(x, top),
                point(x + w, top),
                point(x + w, bottom),
                point(x, bottom),
            ],
            is_closed: true,
        },
    });
}

/// Fill a rectangle given in top-left page coordinates.
fn fill_rect(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, h: f32, page_height: f32) {
    let top = page_height - y;
    let bottom = top - h;
    ops.push(Op::SetFillColor { col: black() });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    point(x, bottom),
                    point(x + w, bottom),
                    point(x + w, top),
                    point(x, top),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Horizontal line at top-left coordinate `y`.
fn hline(ops: &mut Vec<Op>, x1: f32, x2: f32, y: f32, page_height: f32, weight: f32) {
    let pdf_y = page_height - y;
    ops.push(Op::SetOutlineColor { col: black() });
    ops.push(Op::SetOutlineThickness { pt: Pt(weight) });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![point(x1, pdf_y), point(x2, pdf_y)],
            is_closed: false,
        },
    });
}

fn draw_cut_line(ops: &mut Vec<Op>, y: f32, page_width: f32, page_height: f32) {
    let mut x = 0.0;
    while x < page_width {
        hline(ops, x, (x + CUT_DASH).min(page_width), y, page_height, 1.0);
        x += CUT_DASH + CUT_GAP;
    }
}

fn write_text(ops: &mut Vec<Op>, text: &str, x: f32, baseline: f32, font_size: f32, bold: bool) {
    let font = if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    };
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(baseline),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(font_size),
        font,
    });
    ops.push(Op::SetFillColor { col: black() });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_winlatin(text))],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn write_row(ops: &mut Vec<Op>, row: &TextRow, inner_x: f32, inner_w: f32, top: f32, page_height: f32) {
    // Baseline ≈ top of line + ascender (approx 0.75 × font_size)
    let baseline = page_height - top - row.font_size * 0.75;
    for cell in &row.cells {
        let cell_x = inner_x + cell.offset * inner_w;
        let cell_w = cell.span * inner_w;
        let text = truncate_to_width(&cell.text, row.font_size, row.bold, cell_w);
        if text.is_empty() {
            continue;
        }
        let text_w = measure_text_width(&text, row.font_size, row.bold);
        let x = match cell.align {
            Align::Left => cell_x,
            Align::Center => cell_x + (cell_w - text_w).max(0.0) / 2.0,
            Align::Right => cell_x + (cell_w - text_w).max(0.0),
        };
        write_text(ops, &text, x, baseline, row.font_size, row.bold);
    }
}

fn draw_barcode(ops: &mut Vec<Op>, modules: &[bool], x: f32, y: f32, max_w: f32, h: f32, page_height: f32) {
    if modules.is_empty() {
        return;
    }
    let module_w = (max_w / modules.len() as f32).min(MAX_MODULE_WIDTH);
    let mut i = 0;
    while i < modules.len() {
        if !modules[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < modules.len() && modules[i] {
            i += 1;
        }
        let bar_x = x + start as f32 * module_w;
        fill_rect(ops, bar_x, y, (i - start) as f32 * module_w, h, page_height);
    }
}

/// Draw one region: frame, then its composed blocks.
fn render_region(ops: &mut Vec<Op>, region: &Region, config: &LayoutConfig, padding: f32) {
    let Some(content) = &region.content else {
        return;
    };
    let page_height = config.page_height_pt;

    if let Some(weight) = border_weight(region.kind) {
        stroke_rect(ops, region.x, region.y, region.width, region.height, page_height, weight);
    }

    let inner_x = region.x + padding;
    let inner_w = (region.width - 2.0 * padding).max(0.0);
    let bottom = region.y + region.height - padding;
    let mut cursor = region.y + padding;

    for block in compose(content, inner_w, config.issued_on) {
        let (needed, spacing) = match &block {
            Block::Text(row) => (line_height(row.font_size, LINE_HEIGHT_FACTOR), 0.0),
            Block::Rule { weight } => (*weight, 2.0),
            Block::Underlines(_) => (1.0, 2.0),
            Block::Barcode { height, .. } => (*height, 2.0),
            Block::Gap(g) => (*g, 0.0),
        };
        if cursor + needed > bottom {
            log::debug!("Clipping {:?} region {} at its bottom edge", region.kind, region.group);
            break;
        }
        match &block {
            Block::Text(row) => write_row(ops, row, inner_x, inner_w, cursor, page_height),
            Block::Rule { weight } => {
                hline(ops, inner_x, inner_x + inner_w, cursor + weight / 2.0, page_height, *weight)
            }
            Block::Underlines(spans) => {
                for &(offset, span) in spans {
                    let x = inner_x + offset * inner_w;
                    hline(ops, x, x + span * inner_w, cursor, page_height, 0.5);
                }
            }
            Block::Barcode { modules, height } => {
                draw_barcode(ops, modules, inner_x, cursor, inner_w, *height, page_height)
            }
            Block::Gap(_) => {}
        }
        cursor += needed + spacing;
    }
}
