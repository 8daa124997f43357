//! Code 128 encoder for the postal-code barcode printed on shipping labels.
//!
//! Even-length digit strings use code set C (two digits per symbol), which
//! keeps an 8-digit CEP short enough for the label column; everything else
//! falls back to code set B.

/// Bar/space widths of symbols 0..=105. Each symbol spans 11 modules and
/// starts with a bar.
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];

/// Stop pattern, including the terminating bar.
const STOP: &str = "2331112";

const START_B: u8 = 104;
const START_C: u8 = 105;

/// Symbol values (start, data, checksum) for `data`, or `None` when it holds
/// characters outside printable ASCII.
pub fn code128_symbols(data: &str) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }
    let digits_only = data.bytes().all(|b| b.is_ascii_digit());
    let mut symbols = Vec::with_capacity(data.len() + 2);

    if digits_only && data.len() % 2 == 0 {
        symbols.push(START_C);
        for pair in data.as_bytes().chunks(2) {
            symbols.push((pair[0] - b'0') * 10 + (pair[1] - b'0'));
        }
    } else {
        symbols.push(START_B);
        for b in data.bytes() {
            if !(b' '..=b'~').contains(&b) {
                return None;
            }
            symbols.push(b - b' ');
        }
    }

    let weighted: u32 = symbols
        .iter()
        .enumerate()
        .map(|(i, &s)| u32::from(s) * (i as u32).max(1))
        .sum();
    symbols.push((weighted % 103) as u8);
    Some(symbols)
}

/// Encode `data` as a run of modules, `true` for a dark module.
pub fn encode_code128(data: &str) -> Option<Vec<bool>> {
    let symbols = code128_symbols(data)?;
    let mut modules = Vec::with_capacity(symbols.len() * 11 + 13);
    let patterns = symbols
        .iter()
        .map(|&s| PATTERNS[usize::from(s)])
        .chain(std::iter::once(STOP));
    for pattern in patterns {
        for (i, w) in pattern.bytes().enumerate() {
            let dark = i % 2 == 0;
            modules.extend(std::iter::repeat(dark).take(usize::from(w - b'0')));
        }
    }
    Some(modules)
}
