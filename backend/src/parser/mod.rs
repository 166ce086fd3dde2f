//! Cell coercion and CSV sheet decoding.
//!
//! Two concerns live here:
//!
//! - lenient integer coercion of raw cells ([`parse_leading_int`],
//!   [`coerce_cell`]), which never fails on bad input
//! - turning CSV bytes of unknown encoding and delimiter into a
//!   [`RawGrid`] ([`parse_grid_bytes`])

use crate::error::GridError;
use crate::models::{CellValue, RawGrid};

// =============================================================================
// Lenient Integer Coercion
// =============================================================================

/// Parse a base-10 integer prefix, ignoring whatever follows it.
///
/// Leading whitespace and a single sign are accepted. Returns `None` when no
/// digit follows. Digit runs too long for `i64` saturate.
///
/// ```
/// use lottosheet::parser::parse_leading_int;
///
/// assert_eq!(parse_leading_int(" 12abc"), Some(12));
/// assert_eq!(parse_leading_int("-7"), Some(-7));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start_matches(is_js_whitespace);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Whitespace and line terminators skipped before a number: ASCII blanks,
/// U+FEFF, and the space separators, but not U+0085.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

/// Coerce a numeric cell the way its canonical text would be parsed.
///
/// Inside `[1e-6, 1e21)` the text is plain decimal notation, so this is a
/// truncation. Outside that band it is exponent notation and only the
/// leading mantissa digit survives.
pub fn coerce_number(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let magnitude = n.abs();
    if n == 0.0 || (1e-6..1e21).contains(&magnitude) {
        // `as` saturates, which keeps huge values out of range
        return Some(n.trunc() as i64);
    }
    parse_leading_int(&format!("{:e}", n))
}

/// Coerce one raw cell to an integer, `None` for blanks and garbage.
pub fn coerce_cell(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Empty => None,
        CellValue::Text(s) => parse_leading_int(s),
        CellValue::Number(n) => coerce_number(*n),
    }
}

// =============================================================================
// CSV Sheets
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "euc-kr" | "cp949" | "uhc" => "euc-kr".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// A UTF-8 byte order mark is stripped. Unknown labels fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Result<String, GridError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let lowered = encoding.to_lowercase();
    let label = match lowered.as_str() {
        "utf-8" | "utf8" | "ascii" => {
            return Ok(String::from_utf8(bytes.to_vec())
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()));
        }
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-15",
        other => other,
    };

    match encoding_rs::Encoding::for_label(label.as_bytes()) {
        Some(enc) => {
            let (text, _, had_errors) = enc.decode(bytes);
            if had_errors && enc != encoding_rs::UTF_8 {
                return Err(GridError::Encoding(format!(
                    "content is not valid {}",
                    enc.name()
                )));
            }
            Ok(text.into_owned())
        }
        None => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Defaults to a comma, the spreadsheet export default.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = b',';
    let mut best_count = 0;

    for sep in [b',', b';', b'\t', b'|'] {
        let count = first_line.bytes().filter(|&b| b == sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse already-decoded CSV text into raw rows. There is no header row;
/// rows keep their own lengths.
pub fn parse_grid(content: &str, delimiter: u8) -> Result<RawGrid, GridError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }
    Ok(rows)
}

/// Encoding assumed for non-UTF-8 sheets that chardet cannot place.
const LEGACY_ENCODING: &str = "euc-kr";

/// Pick a decoder for bytes already known not to be UTF-8.
///
/// chardet labels short legacy files as UTF-8; that guess is impossible here,
/// so those fall back to [`LEGACY_ENCODING`].
pub fn detect_legacy_encoding(bytes: &[u8]) -> String {
    match detect_encoding(bytes).as_str() {
        "utf-8" => LEGACY_ENCODING.to_string(),
        other => other.to_string(),
    }
}

/// Parse CSV bytes with encoding and delimiter auto-detection.
///
/// Valid UTF-8 is taken as is; detection only runs for legacy exports.
pub fn parse_grid_bytes(bytes: &[u8]) -> Result<RawGrid, GridError> {
    let content = match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{FEFF}').to_string(),
        Err(_) => decode_content(bytes, &detect_legacy_encoding(bytes))?,
    };
    let delimiter = detect_delimiter(&content);
    parse_grid(&content, delimiter)
}
