//! Number-format lookup used to tell date cells from plain numbers.

use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Days between 1899-12-30 (serial 0 after the 1900 leap-year bug) and 1970-01-01.
const EPOCH_OFFSET_DAYS: i64 = 25_569;

/// Days between the 1900 and 1904 date systems.
const DATE1904_OFFSET_DAYS: f64 = 1_462.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Cell formats parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell formats in `cellXfs` order: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from `xl/styles.xml` content.
    ///
    /// Malformed style parts degrade to "no date formats" rather than failing
    /// the whole workbook.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e, reader.decoder()),
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id(e).unwrap_or(0)),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"numFmt" if in_num_fmts => styles.add_num_fmt(e, reader.decoder()),
                    b"xf" if in_cell_xfs => styles.cell_xfs.push(num_fmt_id(e).unwrap_or(0)),
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "stopping styles parse early");
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    fn add_num_fmt(&mut self, e: &BytesStart<'_>, decoder: quick_xml::encoding::Decoder) {
        let mut code = None;
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"formatCode" {
                code = attr.decode_and_unescape_value(decoder).ok().map(|v| v.into_owned());
            }
        }
        if let (Some(id), Some(code)) = (num_fmt_id(e), code) {
            self.num_fmts.insert(id, code);
        }
    }

    /// Check whether the cell style at `style_index` displays a date or time.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.cell_xfs
            .get(style_index)
            .is_some_and(|&id| self.is_date_format(id))
    }

    /// Check if a numFmtId represents a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        if let Some(code) = self.num_fmts.get(&num_fmt_id) {
            return is_date_format_code(code);
        }

        // Built-in ids: 14-22 dates/times, 45-47 times, 27-36 and 50-58 East Asian dates
        matches!(num_fmt_id, 14..=22 | 27..=36 | 45..=47 | 50..=58)
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.trim().parse().ok())
}

/// Check if a format code displays a date or time.
///
/// Only the first section is inspected. Quoted literals, escaped characters,
/// and bracketed modifiers such as colors or locales are ignored, except
/// elapsed-time brackets like `[h]`.
fn is_date_format_code(code: &str) -> bool {
    let section = code.split(';').next().unwrap_or_default();
    let mut chars = section.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&b| b != ']').collect();
                let inner = inner.to_ascii_lowercase();
                if !inner.is_empty() && inner.chars().all(|b| matches!(b, 'h' | 'm' | 's')) {
                    return true;
                }
            }
            _ => {
                if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') {
                    return true;
                }
            }
        }
    }

    false
}

/// Render an Excel serial date as text.
///
/// Whole days render as `YYYY-MM-DD`, values below one day as `HH:MM:SS`,
/// and everything else as `YYYY-MM-DD HH:MM:SS`. Returns `None` for
/// negative or non-finite serials.
pub fn format_serial_date(serial: f64, date1904: bool) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    if serial < 1.0 && !date1904 {
        let secs = (serial * SECONDS_PER_DAY as f64).round() as i64 % SECONDS_PER_DAY;
        return Some(format_time(secs));
    }

    let serial = if date1904 {
        serial + DATE1904_OFFSET_DAYS
    } else if serial < 61.0 {
        // Excel counts the nonexistent 1900-02-29 as serial 60
        serial + 1.0
    } else {
        serial
    };

    let total = (serial * SECONDS_PER_DAY as f64).round() as i64;
    let days = total.div_euclid(SECONDS_PER_DAY);
    let secs = total.rem_euclid(SECONDS_PER_DAY);

    let (year, month, day) = civil_from_days(days - EPOCH_OFFSET_DAYS);
    let date = format!("{year:04}-{month:02}-{day:02}");

    if secs == 0 {
        Some(date)
    } else {
        Some(format!("{date} {}", format_time(secs)))
    }
}

fn format_time(secs: i64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Convert days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
