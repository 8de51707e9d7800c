//! CSV loading for the ad and web-traffic datasets.
//!
//! Both loaders are all-or-nothing: the first missing file, missing column or
//! unparseable cell aborts the load with an [`InsightsError`] and no partial
//! dataset is returned. So does a row that pushes a column total out of
//! range, which keeps every aggregate over a loaded dataset finite.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use insights_core::error::{InsightsError, Result};
use insights_core::models::{AdDataset, AdRecord, TrafficDataset, TrafficRecord};
use insights_core::settings::SourcePaths;
use tracing::debug;

// ── Column catalogue ──────────────────────────────────────────────────────────

/// A logical column: its canonical header plus accepted aliases.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const DATE: Column = Column { name: "fecha", aliases: &["date"] };
pub const CHANNEL: Column = Column { name: "canal", aliases: &["channel"] };
pub const CAMPAIGN: Column = Column {
    name: "campana",
    aliases: &["campaña", "campaign"],
};
pub const IMPRESSIONS: Column = Column {
    name: "impresiones",
    aliases: &["impressions"],
};
pub const CLICKS: Column = Column { name: "clicks", aliases: &["clics"] };
pub const CONVERSIONS: Column = Column {
    name: "conversiones",
    aliases: &["conversions"],
};
pub const SPEND: Column = Column {
    name: "gasto_ars",
    aliases: &["spend", "spend_amount"],
};
pub const REVENUE: Column = Column {
    name: "ingresos_ars",
    aliases: &["revenue", "revenue_amount"],
};
pub const USERS: Column = Column { name: "usuarios", aliases: &["users"] };

/// Columns the ad dataset must carry.
pub const AD_COLUMNS: [Column; 8] = [
    DATE,
    CHANNEL,
    CAMPAIGN,
    IMPRESSIONS,
    CLICKS,
    CONVERSIONS,
    SPEND,
    REVENUE,
];

/// Columns the traffic dataset must carry.
pub const TRAFFIC_COLUMNS: [Column; 3] = [DATE, CHANNEL, USERS];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load both datasets. Existence of both files is checked before either is
/// read.
pub fn load_datasets(paths: &SourcePaths) -> Result<(AdDataset, TrafficDataset)> {
    for path in [&paths.ads, &paths.traffic] {
        ensure_exists(path)?;
    }
    let ads = load_ad_dataset(&paths.ads)?;
    let traffic = load_traffic_dataset(&paths.traffic)?;
    Ok((ads, traffic))
}

/// Parse the ad CSV at `path` into [`AdRecord`]s, keeping file order.
pub fn load_ad_dataset(path: &Path) -> Result<AdDataset> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();
    let header_map = HeaderMap::new(&headers);
    let idx = header_map.require_all(&AD_COLUMNS, path)?;

    let mut records = Vec::new();
    let mut totals = AdTotals::default();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let cells = RowCells::new(&row, path, i);
        let record = AdRecord {
            date: cells.date(idx[0], DATE)?,
            channel: cells.text(idx[1]),
            campaign: cells.text(idx[2]),
            impressions: cells.count(idx[3], IMPRESSIONS)?,
            clicks: cells.count(idx[4], CLICKS)?,
            conversions: cells.count(idx[5], CONVERSIONS)?,
            spend_amount: cells.amount(idx[6], SPEND)?,
            revenue_amount: cells.amount(idx[7], REVENUE)?,
        };
        totals.add(&record, &cells, &idx)?;
        records.push(record);
    }

    debug!("Loaded {} ad rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse the traffic CSV at `path` into [`TrafficRecord`]s, keeping file
/// order. Unrecognised columns are carried verbatim in `extra`.
pub fn load_traffic_dataset(path: &Path) -> Result<TrafficDataset> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();
    let header_map = HeaderMap::new(&headers);
    let idx = header_map.require_all(&TRAFFIC_COLUMNS, path)?;

    let extra_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !idx.contains(i))
        .map(|(i, h)| (i, normalize_header(h)))
        .collect();

    let mut records = Vec::new();
    let mut users_total: u64 = 0;
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let cells = RowCells::new(&row, path, i);
        let extra: BTreeMap<String, String> = extra_columns
            .iter()
            .map(|(col, name)| (name.clone(), cells.text(*col)))
            .collect();
        let users = cells.count(idx[2], USERS)?;
        users_total = cells.add_count(users_total, users, idx[2], USERS)?;
        records.push(TrafficRecord {
            date: cells.date(idx[0], DATE)?,
            channel: cells.text(idx[1]),
            users,
            extra,
        });
    }

    debug!("Loaded {} traffic rows from {}", records.len(), path.display());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(InsightsError::SourceNotFound(path.to_path_buf()))
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    ensure_exists(path)?;
    let file = File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Lowercase, trim, and strip a UTF-8 BOM from a header cell.
fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Header name → column index.
struct HeaderMap {
    index: HashMap<String, usize>,
}

impl HeaderMap {
    fn new(headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins on duplicate headers.
            index.entry(normalize_header(h)).or_insert(i);
        }
        Self { index }
    }

    fn resolve(&self, column: Column) -> Option<usize> {
        std::iter::once(column.name)
            .chain(column.aliases.iter().copied())
            .find_map(|name| self.index.get(name).copied())
    }

    fn require_all<const N: usize>(&self, columns: &[Column; N], path: &Path) -> Result<[usize; N]> {
        let mut out = [0usize; N];
        for (slot, column) in out.iter_mut().zip(columns.iter()) {
            *slot = self
                .resolve(*column)
                .ok_or_else(|| InsightsError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.name.to_string(),
                })?;
        }
        Ok(out)
    }
}

/// One data row plus what is needed to report a bad cell.
struct RowCells<'a> {
    row: &'a StringRecord,
    path: &'a Path,
    line: usize,
}

impl<'a> RowCells<'a> {
    fn new(row: &'a StringRecord, path: &'a Path, index: usize) -> Self {
        // Header is line 1; fall back to that when the reader has no position.
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);
        Self { row, path, line }
    }

    fn raw(&self, col: usize) -> &'a str {
        self.row.get(col).unwrap_or("")
    }

    fn text(&self, col: usize) -> String {
        self.raw(col).to_string()
    }

    fn invalid(&self, column: Column, value: &str) -> InsightsError {
        InsightsError::InvalidValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column: column.name.to_string(),
            value: value.to_string(),
        }
    }

    fn date(&self, col: usize, column: Column) -> Result<NaiveDate> {
        let raw = self.raw(col);
        parse_date(raw).ok_or_else(|| self.invalid(column, raw))
    }

    fn count(&self, col: usize, column: Column) -> Result<u64> {
        let raw = self.raw(col);
        parse_count(raw).ok_or_else(|| self.invalid(column, raw))
    }

    fn out_of_range(&self, col: usize, column: Column) -> InsightsError {
        InsightsError::OutOfRange {
            path: self.path.to_path_buf(),
            line: self.line,
            column: column.name.to_string(),
            value: self.raw(col).to_string(),
        }
    }

    fn add_count(&self, total: u64, value: u64, col: usize, column: Column) -> Result<u64> {
        total
            .checked_add(value)
            .ok_or_else(|| self.out_of_range(col, column))
    }

    fn add_amount(&self, total: f64, value: f64, col: usize, column: Column) -> Result<f64> {
        let sum = total + value.abs();
        if sum.is_finite() {
            Ok(sum)
        } else {
            Err(self.out_of_range(col, column))
        }
    }

    /// Empty cells are absent amounts; anything else must be a finite number.
    fn amount(&self, col: usize, column: Column) -> Result<Option<f64>> {
        let raw = self.raw(col);
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(column, raw)),
        }
    }
}

/// Running column totals for the ad loader.
///
/// Amounts are summed by magnitude, which bounds the sum over any subset of
/// rows a filter can select.
#[derive(Default)]
struct AdTotals {
    impressions: u64,
    clicks: u64,
    conversions: u64,
    spend: f64,
    revenue: f64,
}

impl AdTotals {
    fn add(&mut self, record: &AdRecord, cells: &RowCells, idx: &[usize; 8]) -> Result<()> {
        self.impressions = cells.add_count(self.impressions, record.impressions, idx[3], IMPRESSIONS)?;
        self.clicks = cells.add_count(self.clicks, record.clicks, idx[4], CLICKS)?;
        self.conversions = cells.add_count(self.conversions, record.conversions, idx[5], CONVERSIONS)?;
        self.spend = cells.add_amount(self.spend, record.spend(), idx[6], SPEND)?;
        self.revenue = cells.add_amount(self.revenue, record.revenue(), idx[7], REVENUE)?;

        // Per-row ROAS must be finite too.
        let spend = record.spend();
        if spend != 0.0 && !(record.revenue() / spend).is_finite() {
            return Err(cells.out_of_range(idx[7], REVENUE));
        }
        Ok(())
    }
}

/// Parse a calendar date from the formats the source exports use. Timestamps
/// are accepted and truncated to their date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a non-negative whole number. `"12.0"` is accepted, `"12.5"` is not.
pub fn parse_count(s: &str) -> Option<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
