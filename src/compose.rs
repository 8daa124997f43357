//! Region composition – turns the content of one template region into a
//! top-to-bottom list of drawable blocks (text rows, rules, barcode).
//!
//! Composition is pure: the renderer owns positioning and clipping, so a
//! region whose blocks run past its bottom edge is simply cut off there.

use chrono::NaiveDate;

use crate::address::AddressParty;
use crate::barcode::encode_code128;
use crate::countries::find_country;
use crate::fonts::wrap_text;
use crate::layout_config::{BlockStyle, RegionContent};
use crate::slots::SlotRole;

/// Minimum postal-code digits before a barcode is printed.
const BARCODE_MIN_DIGITS: usize = 5;

const STATEMENT: &str = "Declaro que não me enquadro no conceito de contribuinte previsto no art. 4º da \
Lei Complementar nº 87/1996, uma vez que não realizo, com habitualidade ou em volume que caracterize \
intuito comercial, operações de circulação de mercadoria, ainda que se iniciem no exterior, ou estou \
dispensado da emissão da nota fiscal por força da legislação tributária vigente, responsabilizando-me, \
nos termos da lei e a quem de direito, por informações inverídicas. Declaro que não envio objeto que \
ponha em risco o transporte aéreo, nem objeto proibido no fluxo postal, assumindo responsabilidade pela \
informação prestada, e ciente de que o descumprimento pode configurar crime, conforme artigo 261 do \
Código Penal Brasileiro. Declaro, ainda, estar ciente da lista de proibições e restrições, disponível \
no site dos Correios: https://www.correios.com.br/enviar/proibicoes-e-restricoes/proibicoes-e-restricoes";

const OBSERVATION: &str = "OBSERVAÇÃO: Constitui crime contra a ordem tributária suprimir ou reduzir \
tributo, ou contribuição social e qualquer acessório (Lei 8.137/90 Art. 1º, V).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text placed in a horizontal slice of the region.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    pub text: String,
    /// Start of the cell as a fraction of the inner width.
    pub offset: f32,
    /// Width of the cell as a fraction of the inner width.
    pub span: f32,
    pub align: Align,
}

/// One line of text, possibly split into cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    pub cells: Vec<TextCell>,
    pub font_size: f32,
    pub bold: bool,
}

impl TextRow {
    fn line(text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        Self::aligned(text, font_size, bold, Align::Left)
    }

    fn aligned(text: impl Into<String>, font_size: f32, bold: bool, align: Align) -> Self {
        Self {
            cells: vec![cell(text, 0.0, 1.0, align)],
            font_size,
            bold,
        }
    }

    fn columns(cells: Vec<TextCell>, font_size: f32, bold: bool) -> Self {
        Self {
            cells,
            font_size,
            bold,
        }
    }

    /// Text of all cells, joined by a space.
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn cell(text: impl Into<String>, offset: f32, span: f32, align: Align) -> TextCell {
    TextCell {
        text: text.into(),
        offset,
        span,
        align,
    }
}

/// A drawable unit, stacked top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextRow),
    /// Horizontal rule across the inner width.
    Rule { weight: f32 },
    /// Short rules over slices of the inner width (signature lines).
    Underlines(Vec<(f32, f32)>),
    /// Barcode modules, `true` for a bar.
    Barcode { modules: Vec<bool>, height: f32 },
    /// Vertical space.
    Gap(f32),
}

/// Compose the content of a region whose inner width is `inner_width`.
pub fn compose(content: &RegionContent, inner_width: f32, issued_on: Option<NaiveDate>) -> Vec<Block> {
    match content {
        RegionContent::AddressBlock {
            role,
            party,
            style: BlockStyle::Compact,
        } => compact_label(*role, party),
        RegionContent::AddressBlock {
            role,
            party,
            style: BlockStyle::Receipt,
        } => receipt_slip(*role, party),
        RegionContent::ShippingLabel { sender, recipient } => shipping_label(sender, recipient),
        RegionContent::Declaration { sender, recipient } => {
            declaration(sender, recipient, inner_width, issued_on)
        }
    }
}

fn compact_label(role: SlotRole, party: &AddressParty) -> Vec<Block> {
    let mut postal = vec![cell(&party.postal_code, 0.0, 0.6, Align::Left)];
    if let Some(code) = party.destination_country() {
        postal.push(cell(code, 0.6, 0.4, Align::Right));
    }
    vec![
        Block::Text(TextRow::line(role.heading(), 7.0, true)),
        Block::Text(TextRow::line(party.name.to_uppercase(), 10.0, true)),
        Block::Text(TextRow::line(party.street_line(), 8.0, false)),
        Block::Text(TextRow::line(party.locality_line(), 8.0, false)),
        Block::Text(TextRow::columns(postal, 9.0, true)),
    ]
}

fn receipt_slip(role: SlotRole, party: &AddressParty) -> Vec<Block> {
    let centered = |text: String, size, bold| Block::Text(TextRow::aligned(text, size, bold, Align::Center));
    let mut blocks = vec![
        centered(format!("{} (AR)", role.heading()), 7.0, true),
        centered(party.name.to_uppercase(), 8.0, true),
        centered(party.street_line(), 7.0, false),
        centered(party.locality_line(), 7.0, false),
        centered(party.postal_code.clone(), 8.0, true),
    ];
    if let Some(code) = party.destination_country() {
        blocks.push(centered(code.to_string(), 6.0, true));
    }
    blocks
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn phone_line(party: &AddressParty) -> Option<String> {
    let phone = party.phone.trim();
    (!phone.is_empty()).then(|| format!("FONE: {phone}"))
}

fn shipping_label(sender: &AddressParty, recipient: &AddressParty) -> Vec<Block> {
    let mut header = vec![cell("DESTINATÁRIO", 0.0, 0.7, Align::Left)];
    if recipient.is_international() {
        header.push(cell("INTL", 0.7, 0.3, Align::Right));
    }

    let mut blocks = vec![
        Block::Text(TextRow::columns(header, 14.0, true)),
        Block::Rule { weight: 1.5 },
        Block::Text(TextRow::line(
            or_placeholder(&recipient.name, "NOME DO DESTINATÁRIO").to_uppercase(),
            12.0,
            true,
        )),
    ];
    if let Some(phone) = phone_line(recipient) {
        blocks.push(Block::Text(TextRow::line(phone, 11.0, true)));
    }
    blocks.push(Block::Text(TextRow::line(
        format!("{}, {}", recipient.street, recipient.number),
        9.0,
        false,
    )));
    if !recipient.complement.trim().is_empty() {
        blocks.push(Block::Text(TextRow::line(&recipient.complement, 9.0, false)));
    }
    blocks.push(Block::Text(TextRow::line(&recipient.district, 9.0, false)));
    blocks.push(Block::Text(TextRow::line(
        format!("{} / {}", recipient.city, recipient.state),
        9.0,
        false,
    )));
    blocks.push(Block::Gap(4.0));
    blocks.push(Block::Text(TextRow::line(
        or_placeholder(&recipient.postal_code, "00000-000"),
        14.0,
        true,
    )));

    let digits = recipient.postal_digits();
    if digits.len() >= BARCODE_MIN_DIGITS {
        if let Some(modules) = encode_code128(&digits) {
            blocks.push(Block::Barcode { modules, height: 30.0 });
        }
    }

    if let Some(code) = recipient.destination_country() {
        blocks.push(Block::Gap(4.0));
        blocks.push(Block::Rule { weight: 1.5 });
        match find_country(code) {
            Some(country) => {
                blocks.push(Block::Text(TextRow::line(country.pt.to_uppercase(), 11.0, true)));
                blocks.push(Block::Text(TextRow::line(country.en.to_uppercase(), 9.0, true)));
            }
            None => {
                log::warn!("Unknown country code {code:?}; printing the code");
                blocks.push(Block::Text(TextRow::line(code, 11.0, true)));
            }
        }
    }

    blocks.push(Block::Gap(6.0));
    blocks.push(Block::Rule { weight: 3.0 });
    blocks.push(Block::Gap(2.0));
    blocks.push(Block::Text(TextRow::line("REMETENTE", 9.0, true)));
    blocks.push(Block::Text(TextRow::line(
        or_placeholder(&sender.name, "NOME DO REMETENTE").to_uppercase(),
        8.0,
        true,
    )));
    if let Some(phone) = phone_line(sender) {
        blocks.push(Block::Text(TextRow::line(phone, 8.0, true)));
    }
    blocks.push(Block::Text(TextRow::line(sender.street_line(), 8.0, false)));
    blocks.push(Block::Text(TextRow::line(
        format!("{} - {} / {}", sender.district, sender.city, sender.state),
        8.0,
        false,
    )));
    blocks.push(Block::Text(TextRow::line(
        format!("{}  BRASIL", sender.postal_code),
        8.0,
        true,
    )));
    blocks
}

/// Lines of one party in the declaration header, with their weight.
fn declaration_party(heading: &str, party: &AddressParty) -> Vec<(String, bool)> {
    let mut lines = vec![(heading.to_string(), true), (party.name.clone(), true)];
    if let Some(phone) = phone_line(party) {
        lines.push((phone, true));
    }
    lines.push((party.street_line(), false));
    lines.push((party.locality_line(), false));
    lines.push((format!("CEP: {}", party.postal_code), false));
    lines
}

fn declaration(
    sender: &AddressParty,
    recipient: &AddressParty,
    inner_width: f32,
    issued_on: Option<NaiveDate>,
) -> Vec<Block> {
    let mut blocks = vec![
        Block::Text(TextRow::columns(
            vec![
                cell("DECLARAÇÃO DE CONTEÚDO", 0.0, 0.75, Align::Left),
                cell("CORREIOS", 0.75, 0.25, Align::Right),
            ],
            11.0,
            true,
        )),
        Block::Rule { weight: 0.8 },
    ];

    // Parties side by side
    let left = declaration_party("REMETENTE:", sender);
    let right = declaration_party("DESTINATÁRIO:", recipient);
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i);
        let r = right.get(i);
        let bold = l.map_or(false, |(_, b)| *b) || r.map_or(false, |(_, b)| *b);
        let text = |side: Option<&(String, bool)>| side.map(|(t, _)| t.clone()).unwrap_or_default();
        blocks.push(Block::Text(TextRow::columns(
            vec![
                cell(text(l), 0.0, 0.48, Align::Left),
                cell(text(r), 0.52, 0.48, Align::Left),
            ],
            7.5,
            bold,
        )));
    }
    blocks.push(Block::Rule { weight: 0.8 });

    // Item table
    let columns = |item: String, qty: String, unit: String, total: String| {
        vec![
            cell(item, 0.0, 0.55, Align::Left),
            cell(qty, 0.55, 0.1, Align::Center),
            cell(unit, 0.65, 0.17, Align::Right),
            cell(total, 0.82, 0.18, Align::Right),
        ]
    };
    blocks.push(Block::Text(TextRow::columns(
        columns(
            "ITEM".into(),
            "QTD".into(),
            "VALOR UN (R$)".into(),
            "TOTAL (R$)".into(),
        ),
        6.5,
        true,
    )));
    blocks.push(Block::Rule { weight: 0.5 });
    if recipient.declaration_items.is_empty() {
        blocks.push(Block::Text(TextRow::aligned(
            "Nenhum item declarado",
            8.0,
            false,
            Align::Center,
        )));
    }
    for item in &recipient.declaration_items {
        blocks.push(Block::Text(TextRow::columns(
            columns(
                item.description.clone(),
                item.quantity.to_string(),
                format_decimal(item.unit_value),
                format_decimal(item.line_total()),
            ),
            8.0,
            false,
        )));
    }

    // Totals
    blocks.push(Block::Gap(4.0));
    blocks.push(Block::Rule { weight: 1.5 });
    blocks.push(Block::Text(TextRow::columns(
        vec![
            cell(
                format!("TOTAL DE ITENS: {}", recipient.declared_quantity()),
                0.0,
                0.45,
                Align::Left,
            ),
            cell(
                format!("VALOR TOTAL: {}", format_brl(recipient.declared_value())),
                0.45,
                0.55,
                Align::Right,
            ),
        ],
        9.0,
        true,
    )));

    // Statement
    blocks.push(Block::Gap(3.0));
    for line in wrap_text(STATEMENT, 5.5, false, inner_width) {
        blocks.push(Block::Text(TextRow::line(line, 5.5, false)));
    }
    for line in wrap_text(OBSERVATION, 5.5, true, inner_width) {
        blocks.push(Block::Text(TextRow::line(line, 5.5, true)));
    }

    // Signature
    let date = issued_on
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    blocks.push(Block::Gap(8.0));
    blocks.push(Block::Text(TextRow::columns(
        vec![cell(date, 0.3, 0.25, Align::Center)],
        8.0,
        false,
    )));
    blocks.push(Block::Underlines(vec![(0.0, 0.25), (0.3, 0.25), (0.6, 0.4)]));
    blocks.push(Block::Text(TextRow::columns(
        vec![
            cell("Cidade/UF", 0.0, 0.25, Align::Center),
            cell("Data", 0.3, 0.25, Align::Center),
            cell("Assinatura do Declarante", 0.6, 0.4, Align::Center),
        ],
        6.5,
        true,
    )));
    blocks
}

/// Format with two decimals, `.` thousands and `,` decimal separators.
pub fn format_decimal(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let int = (cents / 100).to_string();

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped},{:02}", cents % 100)
}

/// Format as Brazilian reais.
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{DeclarationItem, DestinationKind};

    fn texts(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(row) => Some(row.text()),
                _ => None,
            })
            .collect()
    }

    fn party(name: &str) -> AddressParty {
        AddressParty {
            street: "Rua das Flores".into(),
            number: "12".into(),
            district: "Centro".into(),
            city: "Curitiba".into(),
            state: "PR".into(),
            ..AddressParty::new(name, "80010-000")
        }
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_decimal(0.0), "0,00");
        assert_eq!(format_decimal(1234.5), "1.234,50");
        assert_eq!(format_decimal(1_234_567.891), "1.234.567,89");
        assert_eq!(format_decimal(999.999), "1.000,00");
        assert_eq!(format_brl(35.9), "R$ 35,90");
    }

    #[test]
    fn compact_label_lines() {
        let content = RegionContent::AddressBlock {
            role: SlotRole::Recipient,
            party: party("Joana"),
            style: BlockStyle::Compact,
        };
        let lines = texts(&compose(&content, 250.0, None));
        assert_eq!(
            lines,
            [
                "DESTINATÁRIO",
                "JOANA",
                "Rua das Flores, 12",
                "Centro - Curitiba/PR",
                "80010-000",
            ]
        );
    }

    #[test]
    fn receipt_slip_is_marked() {
        let content = RegionContent::AddressBlock {
            role: SlotRole::Sender,
            party: party("Loja"),
            style: BlockStyle::Receipt,
        };
        let lines = texts(&compose(&content, 200.0, None));
        assert_eq!(lines[0], "REMETENTE (AR)");
    }

    #[test]
    fn shipping_label_has_barcode_and_placeholders() {
        let content = RegionContent::ShippingLabel {
            sender: AddressParty::default(),
            recipient: party(""),
        };
        let blocks = compose(&content, 220.0, None);
        let lines = texts(&blocks);
        assert!(lines.contains(&"NOME DO DESTINATÁRIO".to_string()));
        assert!(lines.contains(&"NOME DO REMETENTE".to_string()));
        assert!(blocks.iter().any(|b| matches!(b, Block::Barcode { .. })));
    }

    #[test]
    fn international_label_names_country() {
        let mut recipient = party("John");
        recipient.destination = DestinationKind::International;
        recipient.country_code = Some("US".into());
        recipient.postal_code = "1001".into();
        let content = RegionContent::ShippingLabel {
            sender: party("Loja"),
            recipient,
        };
        let blocks = compose(&content, 220.0, None);
        let lines = texts(&blocks);
        assert!(lines.contains(&"DESTINATÁRIO INTL".to_string()));
        assert!(lines.contains(&"ESTADOS UNIDOS".to_string()));
        assert!(lines.contains(&"UNITED STATES".to_string()));
        // Too few digits for a barcode.
        assert!(!blocks.iter().any(|b| matches!(b, Block::Barcode { .. })));
    }

    #[test]
    fn declaration_lists_items_and_totals() {
        let mut recipient = party("Ana");
        recipient.declaration_items = vec![
            DeclarationItem::new("Livro", 2, 35.9),
            DeclarationItem::new("Caneca", 1, 1200.0),
        ];
        let content = RegionContent::Declaration {
            sender: party("Loja"),
            recipient,
        };
        let lines = texts(&compose(&content, 320.0, NaiveDate::from_ymd_opt(2025, 3, 14)));
        assert!(lines.contains(&"Livro 2 35,90 71,80".to_string()));
        assert!(lines.contains(&"Caneca 1 1.200,00 1.200,00".to_string()));
        assert!(lines.contains(&"TOTAL DE ITENS: 3 VALOR TOTAL: R$ 1.271,80".to_string()));
        assert!(lines.contains(&"14/03/2025".to_string()));
    }

    #[test]
    fn empty_declaration_says_so() {
        let content = RegionContent::Declaration {
            sender: party("Loja"),
            recipient: party("Ana"),
        };
        let lines = texts(&compose(&content, 320.0, None));
        assert!(lines.contains(&"Nenhum item declarado".to_string()));
        assert!(lines.contains(&"TOTAL DE ITENS: 0 VALOR TOTAL: R$ 0,00".to_string()));
    }
}
