//! Template geometry – uses Taffy to resolve the fixed regions of each page
//! template into page-absolute rectangles.
//!
//! Geometry depends only on the template and the sheet configuration, never
//! on the labels, so it is computed once per job and shared by every page.

use std::collections::HashMap;

use taffy::prelude::*;

use crate::error::{LabelError, Result};
use crate::layout_config::RegionKind;
use crate::pipeline::PipelineConfig;
use crate::templates::PageTemplate;

/// A region rectangle in page coordinates (points, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFrame {
    pub kind: RegionKind,
    /// Grid cell (letter) or band (parcel) the region belongs to.
    pub group: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Resolved regions of one template, in fill order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateGeometry {
    pub template: PageTemplate,
    pub page_width: f32,
    pub page_height: f32,
    pub frames: Vec<RegionFrame>,
    /// Y positions of cut lines between bands.
    pub cut_lines: Vec<f32>,
}

struct GeometryBuilder {
    taffy: TaffyTree<()>,
    tags: HashMap<NodeId, (RegionKind, usize)>,
}

impl GeometryBuilder {
    fn new() -> Self {
        let mut taffy = TaffyTree::new();
        // Frames are in points; pixel snapping would make grid cells unequal.
        taffy.disable_rounding();
        Self {
            taffy,
            tags: HashMap::new(),
        }
    }

    fn region(&mut self, style: Style, kind: RegionKind, group: usize) -> Result<NodeId> {
        let node = self.taffy.new_leaf(style).map_err(layout_err)?;
        self.tags.insert(node, (kind, group));
        Ok(node)
    }

    fn container(&mut self, style: Style, children: &[NodeId]) -> Result<NodeId> {
        self.taffy.new_with_children(style, children).map_err(layout_err)
    }

    /// Walk the computed tree, accumulating parent offsets, and collect the
    /// tagged leaves in tree order.
    fn extract(&self, node: NodeId, offset_x: f32, offset_y: f32, out: &mut Vec<RegionFrame>) -> Result<()> {
        let layout = self.taffy.layout(node).map_err(layout_err)?;
        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        if let Some(&(kind, group)) = self.tags.get(&node) {
            out.push(RegionFrame {
                kind,
                group,
                x,
                y,
                width: layout.size.width,
                height: layout.size.height,
            });
        }

        for child in self.taffy.children(node).map_err(layout_err)? {
            self.extract(child, x, y, out)?;
        }
        Ok(())
    }
}

fn layout_err(e: taffy::TaffyError) -> LabelError {
    LabelError::Layout(e.to_string())
}

fn uniform(v: f32) -> taffy::Rect<taffy::LengthPercentage> {
    taffy::Rect {
        left: taffy::LengthPercentage::Length(v),
        right: taffy::LengthPercentage::Length(v),
        top: taffy::LengthPercentage::Length(v),
        bottom: taffy::LengthPercentage::Length(v),
    }
}

fn page_style(config: &PipelineConfig) -> Style {
    Style {
        size: Size {
            width: Dimension::Length(config.page_width),
            height: Dimension::Length(config.page_height),
        },
        ..Default::default()
    }
}

/// Letter grid: `columns × rows` equal cells, auto-placed row-major.
fn build_letter(builder: &mut GeometryBuilder, config: &PipelineConfig) -> Result<NodeId> {
    let (columns, rows) = config.letter_grid();

    let cells = (0..columns * rows)
        .map(|i| {
            let style = Style {
                min_size: Size {
                    width: Dimension::Length(0.0),
                    height: Dimension::Length(0.0),
                },
                ..Default::default()
            };
            builder.region(style, RegionKind::LetterCell, i)
        })
        .collect::<Result<Vec<_>>>()?;

    let grid = Style {
        display: taffy::Display::Grid,
        padding: uniform(config.letter_padding),
        gap: Size {
            width: taffy::LengthPercentage::Length(config.letter_gap),
            height: taffy::LengthPercentage::Length(0.0),
        },
        grid_template_columns: vec![taffy::TrackSizingFunction::from_flex(1.0); columns],
        grid_template_rows: vec![taffy::TrackSizingFunction::from_flex(1.0); rows],
        ..page_style(config)
    };
    builder.container(grid, &cells)
}

/// Parcel sheet: bands stacked top to bottom, each split into a label
/// column and a declaration column.
fn build_parcel(builder: &mut GeometryBuilder, config: &PipelineConfig, receipt: bool) -> Result<NodeId> {
    let bands = config.parcel_capacity();
    let band_height = config.page_height / bands as f32;
    let label_fraction = config.label_column_fraction.clamp(0.0, 1.0);

    let mut band_nodes = Vec::with_capacity(bands);
    for band in 0..bands {
        let label_width = Size {
            width: Dimension::Percent(label_fraction),
            height: Dimension::Auto,
        };

        let left = if receipt {
            let slip = Style {
                size: Size {
                    width: Dimension::Auto,
                    height: Dimension::Length(config.receipt_slip_height),
                },
                flex_shrink: 0.0,
                ..Default::default()
            };
            let sender_slip = builder.region(slip.clone(), RegionKind::SenderReceipt, band)?;
            let recipient_slip = builder.region(slip, RegionKind::RecipientReceipt, band)?;
            let label = builder.region(
                Style {
                    flex_grow: 1.0,
                    min_size: Size {
                        width: Dimension::Auto,
                        height: Dimension::Length(0.0),
                    },
                    ..Default::default()
                },
                RegionKind::ShippingLabel,
                band,
            )?;
            builder.container(
                Style {
                    display: taffy::Display::Flex,
                    flex_direction: taffy::FlexDirection::Column,
                    size: Size {
                        width: Dimension::Percent(label_fraction),
                        height: Dimension::Percent(1.0),
                    },
                    flex_shrink: 0.0,
                    ..Default::default()
                },
                &[sender_slip, recipient_slip, label],
            )?
        } else {
            builder.region(
                Style {
                    size: label_width,
                    flex_shrink: 0.0,
                    ..Default::default()
                },
                RegionKind::ShippingLabel,
                band,
            )?
        };

        let right = builder.region(
            Style {
                flex_grow: 1.0,
                flex_basis: Dimension::Length(0.0),
                ..Default::default()
            },
            RegionKind::Declaration,
            band,
        )?;

        let band_node = builder.container(
            Style {
                display: taffy::Display::Flex,
                flex_direction: taffy::FlexDirection::Row,
                size: Size {
                    width: Dimension::Percent(1.0),
                    height: Dimension::Length(band_height),
                },
                flex_shrink: 0.0,
                ..Default::default()
            },
            &[left, right],
        )?;
        band_nodes.push(band_node);
    }

    let sheet = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Column,
        ..page_style(config)
    };
    builder.container(sheet, &band_nodes)
}

/// Every fill unit must resolve to the template's region kinds, in order,
/// and the sheet must hold exactly the configured number of units.
fn check_frames(template: PageTemplate, config: &PipelineConfig, frames: &[RegionFrame]) -> Result<()> {
    let units = match template {
        PageTemplate::Letter => config.letter_capacity(),
        PageTemplate::Parcel | PageTemplate::ParcelWithReceipt => config.parcel_capacity(),
    };
    let kinds = template.unit_regions();
    if frames.len() != units * kinds.len() {
        return Err(LabelError::Layout(format!(
            "{template:?} resolved {} regions, expected {}",
            frames.len(),
            units * kinds.len()
        )));
    }
    for (group, unit) in frames.chunks(kinds.len()).enumerate() {
        let matches = unit
            .iter()
            .zip(kinds)
            .all(|(f, kind)| f.kind == *kind && f.group == group);
        if !matches {
            return Err(LabelError::Layout(format!(
                "{template:?} unit {group} has unexpected regions"
            )));
        }
    }
    Ok(())
}

/// Resolve the regions of `template` on a sheet described by `config`.
pub fn compute_geometry(template: PageTemplate, config: &PipelineConfig) -> Result<TemplateGeometry> {
    let mut builder = GeometryBuilder::new();
    let root = match template {
        PageTemplate::Letter => build_letter(&mut builder, config)?,
        PageTemplate::Parcel => build_parcel(&mut builder, config, false)?,
        PageTemplate::ParcelWithReceipt => build_parcel(&mut builder, config, true)?,
    };

    builder
        .taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(config.page_width),
                height: AvailableSpace::Definite(config.page_height),
            },
        )
        .map_err(layout_err)?;

    let mut frames = Vec::new();
    builder.extract(root, 0.0, 0.0, &mut frames)?;
    check_frames(template, config, &frames)?;

    let cut_lines = match template {
        PageTemplate::Letter => Vec::new(),
        PageTemplate::Parcel | PageTemplate::ParcelWithReceipt => {
            let bands = config.parcel_capacity();
            let band_height = config.page_height / bands as f32;
            (1..bands).map(|b| b as f32 * band_height).collect()
        }
    };

    log::debug!("{template:?} template resolved to {} regions", frames.len());
    Ok(TemplateGeometry {
        template,
        page_width: config.page_width,
        page_height: config.page_height,
        frames,
        cut_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.5;

    fn frames_of(geometry: &TemplateGeometry, kind: RegionKind) -> Vec<RegionFrame> {
        geometry.frames.iter().copied().filter(|f| f.kind == kind).collect()
    }

    #[test]
    fn letter_grid_is_uniform_and_row_major() {
        let config = PipelineConfig::default();
        let g = compute_geometry(PageTemplate::Letter, &config).unwrap();
        assert_eq!(g.frames.len(), 16);
        let w = g.frames[0].width;
        let h = g.frames[0].height;
        assert!(w > 0.0 && h > 0.0);
        for (i, f) in g.frames.iter().enumerate() {
            assert_eq!(f.group, i);
            assert!((f.width - w).abs() < EPS && (f.height - h).abs() < EPS);
        }
        // Row-major: cell 1 is right of cell 0, cell 2 is below cell 0.
        assert!(g.frames[1].x > g.frames[0].x);
        assert!((g.frames[1].y - g.frames[0].y).abs() < EPS);
        assert!(g.frames[2].y > g.frames[0].y);
        assert!((g.frames[2].x - g.frames[0].x).abs() < EPS);
        assert!(g.cut_lines.is_empty());
    }

    #[test]
    fn parcel_bands_split_forty_sixty() {
        let config = PipelineConfig::default();
        let g = compute_geometry(PageTemplate::Parcel, &config).unwrap();
        let labels = frames_of(&g, RegionKind::ShippingLabel);
        let decls = frames_of(&g, RegionKind::Declaration);
        assert_eq!(labels.len(), 2);
        assert_eq!(decls.len(), 2);
        let half = config.page_height / 2.0;
        for band in 0..2 {
            let (l, d) = (labels[band], decls[band]);
            assert!((l.width - config.page_width * 0.4).abs() < EPS);
            assert!((d.width - config.page_width * 0.6).abs() < EPS);
            assert!((l.height - half).abs() < EPS && (d.height - half).abs() < EPS);
            assert!((l.y - band as f32 * half).abs() < EPS);
            assert!((d.x - l.width).abs() < EPS);
        }
        assert_eq!(g.cut_lines.len(), 1);
        assert!((g.cut_lines[0] - half).abs() < EPS);
    }

    #[test]
    fn receipt_column_stacks_slips_above_label() {
        let config = PipelineConfig::default();
        let g = compute_geometry(PageTemplate::ParcelWithReceipt, &config).unwrap();
        assert_eq!(g.frames.len(), 8);
        let band0: Vec<_> = g.frames.iter().filter(|f| f.group == 0).collect();
        let kinds: Vec<_> = band0.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            [
                RegionKind::SenderReceipt,
                RegionKind::RecipientReceipt,
                RegionKind::ShippingLabel,
                RegionKind::Declaration,
            ]
        );
        let slip = config.receipt_slip_height;
        let half = config.page_height / 2.0;
        assert!((band0[0].height - slip).abs() < EPS);
        assert!((band0[1].y - slip).abs() < EPS);
        assert!((band0[2].y - 2.0 * slip).abs() < EPS);
        assert!((band0[2].height - (half - 2.0 * slip)).abs() < EPS);
        assert!((band0[3].height - half).abs() < EPS);
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let config = PipelineConfig::default();
        let mut frames = compute_geometry(PageTemplate::Parcel, &config).unwrap().frames;
        assert!(check_frames(PageTemplate::Parcel, &config, &frames).is_ok());
        assert!(check_frames(PageTemplate::ParcelWithReceipt, &config, &frames).is_err());
        frames.swap(0, 1);
        assert!(matches!(
            check_frames(PageTemplate::Parcel, &config, &frames),
            Err(LabelError::Layout(_))
        ));
        frames.pop();
        assert!(check_frames(PageTemplate::Parcel, &config, &frames).is_err());
    }

    #[test]
    fn frames_keep_fractional_points() {
        const TIGHT: f32 = 0.01;
        let config = PipelineConfig::default();

        let g = compute_geometry(PageTemplate::Letter, &config).unwrap();
        assert!((g.frames[0].x - config.letter_padding).abs() < TIGHT, "{:?}", g.frames[0]);
        assert!((g.frames[0].y - config.letter_padding).abs() < TIGHT, "{:?}", g.frames[0]);
        let h = g.frames[0].height;
        for f in &g.frames {
            assert!((f.height - h).abs() < TIGHT, "{f:?}");
        }
        let cell_h = (config.page_height - 2.0 * config.letter_padding) / config.letter_rows as f32;
        assert!((h - cell_h).abs() < TIGHT);

        let g = compute_geometry(PageTemplate::Parcel, &config).unwrap();
        let second_band = frames_of(&g, RegionKind::ShippingLabel)[1];
        assert!((second_band.y - g.cut_lines[0]).abs() < TIGHT, "{second_band:?}");
    }

    #[test]
    fn geometry_is_deterministic() {
        let config = PipelineConfig::default();
        for template in [PageTemplate::Letter, PageTemplate::Parcel, PageTemplate::ParcelWithReceipt] {
            assert_eq!(
                compute_geometry(template, &config).unwrap(),
                compute_geometry(template, &config).unwrap()
            );
        }
    }
}
