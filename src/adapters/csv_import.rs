use crate::adapters::memory_store::InMemoryRangeStore;
use crate::core::canonicalizer::Canonicalizer;
use crate::domain::model::{NormalizedKey, SerialRange};
use crate::utils::error::{HologramError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

const SERIAL_COLUMNS: usize = 6;
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Serials,
    Invalids,
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sheet::Serials => f.write_str("SERIALS"),
            Sheet::Invalids => f.write_str("INVALIDS"),
        }
    }
}

/// A row that was skipped; the rest of the import goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowError {
    pub sheet: Sheet,
    /// 1-based line in the source file, the header being line 1.
    pub line: u64,
    pub reason: String,
}

impl fmt::Display for ImportRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error inserting line {} from sheet {}: {}",
            self.line, self.sheet, self.reason
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub serials_imported: usize,
    pub invalids_imported: usize,
    pub errors: Vec<ImportRowError>,
}

/// Locations of the two sheets backing a range store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPaths {
    pub serials: PathBuf,
    pub invalids: PathBuf,
}

impl SheetPaths {
    pub fn new(serials: impl Into<PathBuf>, invalids: impl Into<PathBuf>) -> Self {
        Self {
            serials: serials.into(),
            invalids: invalids.into(),
        }
    }
}

/// Parsed rows of one sheet plus the rows that were rejected.
#[derive(Debug, Clone)]
pub struct ParsedSheet<T> {
    pub rows: Vec<T>,
    pub errors: Vec<ImportRowError>,
}

/// 讀取試算表匯出的 CSV，於匯入時完成正規化
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvImporter {
    canonicalizer: Canonicalizer,
}

impl CsvImporter {
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }

    /// Columns: row, reference, description, start, end, date.
    pub fn parse_serials<R: Read>(&self, reader: R) -> Result<ParsedSheet<SerialRange>> {
        let mut rows = Vec::new();
        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for_each_row(reader, Sheet::Serials, &mut errors, |record| {
            let range = self.parse_serial_row(record)?;
            if !seen_ids.insert(range.row_id) {
                return Err(format!("duplicate row id {}", range.row_id));
            }
            rows.push(range);
            Ok(())
        })?;

        Ok(ParsedSheet { rows, errors })
    }

    /// One code per row.
    pub fn parse_invalids<R: Read>(&self, reader: R) -> Result<ParsedSheet<NormalizedKey>> {
        let mut rows = Vec::new();
        let mut errors = Vec::new();

        for_each_row(reader, Sheet::Invalids, &mut errors, |record| {
            if record.iter().skip(1).any(|field| !field.is_empty()) {
                return Err(format!("expected 1 column, found {}", record.len()));
            }
            let code = record.get(0).unwrap_or_default();
            if code.is_empty() {
                return Err("empty invalid serial".to_string());
            }
            rows.push(self.canonicalizer.normalize(code).map_err(|e| e.to_string())?);
            Ok(())
        })?;

        Ok(ParsedSheet { rows, errors })
    }

    /// Parses both sheets completely, then replaces the store contents in one step.
    pub fn import_into<S: Read, I: Read>(
        &self,
        store: &InMemoryRangeStore,
        serials: S,
        invalids: I,
    ) -> Result<ImportReport> {
        let serials = self.parse_serials(serials)?;
        let invalids = self.parse_invalids(invalids)?;

        let mut errors = serials.errors;
        errors.extend(invalids.errors);

        let report = ImportReport {
            serials_imported: serials.rows.len(),
            invalids_imported: invalids.rows.len(),
            errors,
        };

        store.replace(serials.rows, invalids.rows);

        tracing::info!(
            "📥 Imported {} serial ranges and {} invalid codes ({} rows rejected)",
            report.serials_imported,
            report.invalids_imported,
            report.errors.len()
        );

        Ok(report)
    }

    pub fn import_files(
        &self,
        store: &InMemoryRangeStore,
        serials_path: impl AsRef<Path>,
        invalids_path: impl AsRef<Path>,
    ) -> Result<ImportReport> {
        let serials = open(serials_path.as_ref())?;
        let invalids = open(invalids_path.as_ref())?;
        self.import_into(store, serials, invalids)
    }

    /// Imports `sources` into `store`, then installs the same bytes at
    /// `destination` so every later load reads the new data. Nothing is
    /// written when the import fails as a whole.
    pub fn import_and_install(
        &self,
        store: &InMemoryRangeStore,
        sources: &SheetPaths,
        destination: &SheetPaths,
    ) -> Result<ImportReport> {
        let serials = read_sheet(&sources.serials)?;
        let invalids = read_sheet(&sources.invalids)?;

        let report = self.import_into(store, serials.as_slice(), invalids.as_slice())?;

        install_sheet(&serials, &destination.serials)?;
        install_sheet(&invalids, &destination.invalids)?;
        tracing::info!(
            "💾 Installed sheets at {} and {}",
            destination.serials.display(),
            destination.invalids.display()
        );

        Ok(report)
    }

    fn parse_serial_row(&self, record: &StringRecord) -> std::result::Result<SerialRange, String> {
        if record.len() != SERIAL_COLUMNS {
            return Err(format!(
                "expected {} columns, found {}",
                SERIAL_COLUMNS,
                record.len()
            ));
        }

        let row_id = parse_row_id(&record[0])?;
        let start = self.normalize_bound("start", &record[3])?;
        let end = self.normalize_bound("end", &record[4])?;
        let issued_on = parse_date(&record[5])?;

        Ok(SerialRange {
            row_id,
            reference: record[1].to_string(),
            description: record[2].to_string(),
            start,
            end,
            issued_on,
        })
    }

    fn normalize_bound(&self, name: &str, raw: &str) -> std::result::Result<NormalizedKey, String> {
        if raw.is_empty() {
            return Err(format!("empty {} serial", name));
        }
        self.canonicalizer
            .normalize(raw)
            .map_err(|e| format!("{} serial: {}", name, e))
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| HologramError::ImportError {
        message: format!("cannot open {}: {}", path.display(), e),
    })
}

fn read_sheet(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| HologramError::ImportError {
        message: format!("cannot read {}: {}", path.display(), e),
    })
}

/// 先寫暫存檔再 rename，讀取端不會看到寫一半的檔案
fn install_sheet(content: &[u8], destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = destination.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = destination.with_file_name(temp_name);

    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, destination) {
        let _ = fs::remove_file(&temp_path);
        return Err(HologramError::ImportError {
            message: format!("cannot install {}: {}", destination.display(), e),
        });
    }
    Ok(())
}

fn for_each_row<R, F>(
    reader: R,
    sheet: Sheet,
    errors: &mut Vec<ImportRowError>,
    mut handle: F,
) -> Result<()>
where
    R: Read,
    F: FnMut(&StringRecord) -> std::result::Result<(), String>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| HologramError::ImportError {
        message: format!("cannot read header of sheet {}: {}", sheet, e),
    })?;
    if headers.is_empty() {
        return Err(HologramError::ImportError {
            message: format!("sheet {} is empty", sheet),
        });
    }

    for (index, result) in csv_reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let outcome = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
                handle(&record).map_err(|reason| (line, reason))
            }
            Err(e) if e.is_io_error() => return Err(HologramError::CsvError(e)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                Err((line, e.to_string()))
            }
        };

        if let Err((line, reason)) = outcome {
            tracing::debug!("Skipping line {} of sheet {}: {}", line, sheet, reason);
            errors.push(ImportRowError {
                sheet,
                line,
                reason,
            });
        }
    }

    Ok(())
}

fn parse_row_id(raw: &str) -> std::result::Result<u64, String> {
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }
    // 試算表常把整數匯出成 "12.0"
    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(format!("invalid row id '{}'", raw)),
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| format!("invalid date '{}'", raw))
}
