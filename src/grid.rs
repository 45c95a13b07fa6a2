// src/grid.rs

use std::collections::BTreeMap;

/// Rectangular string grid as returned by the remote store. Row 0 is the
/// header row; header entries are field names verbatim (no normalization,
/// no uniqueness check — duplicate headers collide and the last value wins).
pub type RawGrid = Vec<Vec<String>>;

/// One data row keyed by header name. Built fresh per fetch, never mutated
/// afterwards, discarded on the next fetch.
pub type MappedRecord = BTreeMap<String, String>;

/// Map a raw grid into records. A grid with fewer than 2 rows (no header,
/// or header only) yields nothing. Cells past the end of a short row map to
/// the empty string, not to an absent key. No coercion, no trimming.
pub fn map_rows(grid: &RawGrid) -> Vec<MappedRecord> {
    if grid.len() < 2 {
        return Vec::new();
    }
    let headers = &grid[0];
    grid[1..]
        .iter()
        .map(|row| {
            let mut record = MappedRecord::new();
            for (idx, header) in headers.iter().enumerate() {
                let value = row.get(idx).cloned().unwrap_or_default();
                record.insert(header.clone(), value);
            }
            record
        })
        .collect()
}

/// Parse comma-delimited text into records, same shape as [`map_rows`].
///
/// Deliberately naive: splits on every comma and strips double quotes, so
/// quoted commas and embedded newlines are not handled. Blank lines are
/// skipped.
pub fn parse_csv(text: &str) -> Vec<MappedRecord> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some(header_line) = lines.first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().replace('"', ""))
        .collect();

    lines[1..]
        .iter()
        .map(|line| {
            let values: Vec<String> = line
                .split(',')
                .map(|v| v.trim().replace('"', ""))
                .collect();
            let mut record = MappedRecord::new();
            for (idx, header) in headers.iter().enumerate() {
                record.insert(header.clone(), values.get(idx).cloned().unwrap_or_default());
            }
            record
        })
        .collect()
}
