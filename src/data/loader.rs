use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

/// Public copy of the SpaceX launch table the dashboard was designed around.
pub const DEFAULT_SOURCE: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

// Column names are part of the input contract.
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why the dataset could not be loaded. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot fetch {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("invalid CSV")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),
    #[error("invalid Parquet")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("invalid Arrow data")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl LoadError {
    /// Whether the source itself could not be reached (as opposed to bad content).
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            LoadError::Io { .. } | LoadError::Http { .. } | LoadError::HttpStatus { .. }
        )
    }

    fn malformed(row: usize, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            row,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Table formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    /// Pick a format from the extension of a path or URL.
    /// URLs without a recognised extension are read as CSV.
    pub fn detect(source: &str) -> Result<Self, LoadError> {
        let remote = is_url(source);
        let name = if remote {
            let path = source.split(['?', '#']).next().unwrap_or(source);
            path.rsplit('/').next().unwrap_or(path)
        } else {
            source
        };
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            _ if remote => Ok(Format::Csv),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load the launch table from a local path or an `http(s)://` URL.
pub fn load(source: &str) -> Result<LaunchDataset, LoadError> {
    let format = Format::detect(source)?;
    log::info!("Loading launch records from {source} as {format:?}");

    let dataset = if is_url(source) {
        load_url(source, format)?
    } else {
        load_path(Path::new(source), format)?
    };

    log::info!(
        "Loaded {} launches from {} sites, payload {}..{} kg",
        dataset.len(),
        dataset.sites.len(),
        dataset.bounds.min,
        dataset.bounds.max
    );
    log::debug!("Launch sites: {:?}", dataset.sites);
    Ok(dataset)
}

fn is_url(source: &str) -> bool {
    let scheme = |prefix: &str| {
        source
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    scheme("http://") || scheme("https://")
}

fn load_path(path: &Path, format: Format) -> Result<LaunchDataset, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let name = path.display().to_string();

    match format {
        Format::Csv => load_csv(file, &name),
        Format::Json => load_json(file, &name),
        Format::Parquet => load_parquet(file, &name),
    }
}

fn load_url(url: &str, format: Format) -> Result<LaunchDataset, LoadError> {
    let http_err = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(http_err)?;
    let response = client.get(url).send().map_err(http_err)?;

    if !response.status().is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    match format {
        Format::Csv => load_csv(response, url),
        Format::Json => load_json(response, url),
        Format::Parquet => load_parquet(response.bytes().map_err(http_err)?, url),
    }
}

// ---------------------------------------------------------------------------
// Cell-level validation shared by every format
// ---------------------------------------------------------------------------

/// A raw cell before it is interpreted for its column.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(v) if v.fract() == 0.0 => Some(format!("{v:.0}")),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Missing => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.parse().ok(),
            Cell::Missing => None,
        }
    }
}

/// The cells of one row that the dashboard cares about.
struct RawRow {
    site: Cell,
    payload: Cell,
    class: Cell,
    booster_category: Cell,
    flight_number: Cell,
}

impl RawRow {
    /// Validate and convert. `row` is the 1-based data row number.
    fn into_record(self, row: usize) -> Result<LaunchRecord, LoadError> {
        let launch_site = self
            .site
            .into_text()
            .ok_or_else(|| LoadError::malformed(row, format!("empty '{COL_LAUNCH_SITE}'")))?;

        let payload_mass_kg = self
            .payload
            .as_number()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| {
                LoadError::malformed(
                    row,
                    format!("'{COL_PAYLOAD}' is not a non-negative number: {:?}", self.payload),
                )
            })?;

        let outcome = match &self.class {
            Cell::Text(s) => Outcome::from_class(s),
            Cell::Number(v) if *v == 0.0 => Some(Outcome::Failure),
            Cell::Number(v) if *v == 1.0 => Some(Outcome::Success),
            _ => None,
        }
        .ok_or_else(|| {
            LoadError::malformed(row, format!("'{COL_CLASS}' must be 0 or 1, got {:?}", self.class))
        })?;

        let booster_version_category = self.booster_category.into_text().ok_or_else(|| {
            LoadError::malformed(row, format!("empty '{COL_BOOSTER_CATEGORY}'"))
        })?;

        let flight_number = self
            .flight_number
            .as_number()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32);

        Ok(LaunchRecord {
            launch_site,
            payload_mass_kg,
            outcome,
            booster_version_category,
            flight_number,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. The four required columns may
/// appear anywhere; other columns (such as a leading unnamed index) are ignored.
pub fn load_csv<R: Read>(input: R, source: &str) -> Result<LaunchDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require =
        |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

    let site_idx = require(COL_LAUNCH_SITE)?;
    let payload_idx = require(COL_PAYLOAD)?;
    let class_idx = require(COL_CLASS)?;
    let booster_idx = require(COL_BOOSTER_CATEGORY)?;
    let flight_idx = find(COL_FLIGHT_NUMBER);

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|j| record.get(j))
                .map(Cell::from_text)
                .unwrap_or(Cell::Missing)
        };
        let raw = RawRow {
            site: cell(Some(site_idx)),
            payload: cell(Some(payload_idx)),
            class: cell(Some(class_idx)),
            booster_category: cell(Some(booster_idx)),
            flight_number: cell(flight_idx),
        };
        records.push(raw.into_record(i + 1)?);
    }

    Ok(LaunchDataset::from_records(records, source))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
pub fn load_json<R: Read>(input: R, source: &str) -> Result<LaunchDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(input)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::malformed(0, "expected a top-level JSON array"))?;

    if let Some(first) = rows.first().and_then(|r| r.as_object()) {
        for name in [COL_LAUNCH_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER_CATEGORY] {
            if !first.contains_key(name) {
                return Err(LoadError::MissingColumn(name.to_string()));
            }
        }
    }

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::malformed(i + 1, "not a JSON object"))?;
        let cell = |name: &str| obj.get(name).map(json_cell).unwrap_or(Cell::Missing);
        let raw = RawRow {
            site: cell(COL_LAUNCH_SITE),
            payload: cell(COL_PAYLOAD),
            class: cell(COL_CLASS),
            booster_category: cell(COL_BOOSTER_CATEGORY),
            flight_number: cell(COL_FLIGHT_NUMBER),
        };
        records.push(raw.into_record(i + 1)?);
    }

    Ok(LaunchDataset::from_records(records, source))
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::from_text(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
        JsonValue::Null => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same named columns as the CSV layout.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn load_parquet<T: ChunkReader + 'static>(
    input: T,
    source: &str,
) -> Result<LaunchDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)?;

    // Columns are resolved from the file schema so an empty file is checked too.
    let schema = builder.schema().clone();
    let find = |name: &str| schema.index_of(name).ok();
    let require =
        |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

    let site_idx = require(COL_LAUNCH_SITE)?;
    let payload_idx = require(COL_PAYLOAD)?;
    let class_idx = require(COL_CLASS)?;
    let booster_idx = require(COL_BOOSTER_CATEGORY)?;
    let flight_idx = find(COL_FLIGHT_NUMBER);

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let site = batch.column(site_idx);
        let payload = batch.column(payload_idx);
        let class = batch.column(class_idx);
        let booster = batch.column(booster_idx);
        let flight = flight_idx.map(|i| batch.column(i));

        for row in 0..batch.num_rows() {
            let raw = RawRow {
                site: arrow_cell(site, row),
                payload: arrow_cell(payload, row),
                class: arrow_cell(class, row),
                booster_category: arrow_cell(booster, row),
                flight_number: flight
                    .map(|c| arrow_cell(c, row))
                    .unwrap_or(Cell::Missing),
            };
            let row_no = records.len() + 1;
            records.push(raw.into_record(row_no)?);
        }
    }

    Ok(LaunchDataset::from_records(records, source))
}

/// Read a single cell from an Arrow column.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::from_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::from_text(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Number(if col.as_boolean().value(row) { 1.0 } else { 0.0 }),
        _ => arrow::util::display::array_value_to_string(col.as_ref(), row)
            .map(|s| Cell::from_text(&s))
            .unwrap_or(Cell::Missing),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    // Header and first rows of the public launch table.
    const SAMPLE_CSV: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,4,CCAFS LC-40,0,500.0,F9 v1.0  B0006,v1.0
4,5,CCAFS LC-40,0,677.0,F9 v1.0  B0007,v1.0
5,7,VAFB SLC-4E,0,500.0,F9 v1.1B1003,v1.1
6,8,CCAFS LC-40,1,3170.0,F9 v1.1,v1.1
7,20,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
";

    fn csv_err(text: &str) -> LoadError {
        load_csv(text.as_bytes(), "inline").unwrap_err()
    }

    #[test]
    fn csv_loads_records_and_derived_values() {
        let ds = load_csv(SAMPLE_CSV.as_bytes(), "inline").unwrap();
        assert_eq!(ds.len(), 8);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.bounds.min, 0.0);
        assert_eq!(ds.bounds.max, 3170.0);
        assert_eq!(ds.source, "inline");

        let last = &ds.records[7];
        assert_eq!(last.launch_site, "KSC LC-39A");
        assert_eq!(last.outcome, Outcome::Success);
        assert_eq!(last.booster_version_category, "FT");
        assert_eq!(last.flight_number, Some(20));
    }

    #[test]
    fn csv_with_only_required_columns() {
        let ds = load_csv(
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nKSC,3000,1,v1.1\n".as_bytes(),
            "inline",
        )
        .unwrap();
        assert_eq!(ds.records, vec![LaunchRecord::new("KSC", 3000.0, Outcome::Success, "v1.1")]);
    }

    #[test]
    fn header_only_csv_is_an_empty_dataset() {
        let ds = load_csv(
            "Launch Site,Payload Mass (kg),class,Booster Version Category\n".as_bytes(),
            "inline",
        )
        .unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = csv_err("Launch Site,class,Booster Version Category\nKSC,1,FT\n");
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == COL_PAYLOAD));
    }

    #[test]
    fn non_numeric_payload_is_malformed() {
        let err = csv_err(
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nKSC,1000,1,FT\nKSC,heavy,1,FT\n",
        );
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn negative_payload_and_bad_class_are_malformed() {
        let header = "Launch Site,Payload Mass (kg),class,Booster Version Category\n";
        assert!(matches!(
            csv_err(&format!("{header}KSC,-5,1,FT\n")),
            LoadError::Malformed { row: 1, .. }
        ));
        assert!(matches!(
            csv_err(&format!("{header}KSC,5,2,FT\n")),
            LoadError::Malformed { row: 1, .. }
        ));
    }

    #[test]
    fn format_detection() {
        assert_eq!(Format::detect("data/launches.CSV").unwrap(), Format::Csv);
        assert_eq!(Format::detect("launches.pq").unwrap(), Format::Parquet);
        assert_eq!(Format::detect("https://host/x/launches.json?dl=1").unwrap(), Format::Json);
        assert_eq!(Format::detect("https://host/export").unwrap(), Format::Csv);
        assert_eq!(Format::detect("HTTPS://Host/Export").unwrap(), Format::Csv);
        assert!(matches!(
            Format::detect("launches.xlsx"),
            Err(LoadError::UnsupportedFormat(ref e)) if e == "xlsx"
        ));
    }

    #[test]
    fn missing_local_file_is_unreachable() {
        let err = load("/definitely/not/here/launches.csv").unwrap_err();
        assert!(err.is_unreachable());
    }

    #[test]
    fn load_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let ds = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(ds.len(), 8);
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"Launch Site": "CCAFS", "Payload Mass (kg)": 500, "class": 1, "Booster Version Category": "v1.0"},
            {"Launch Site": "KSC", "Payload Mass (kg)": "3000.5", "class": 0.0, "Booster Version Category": "FT", "Flight Number": 12}
        ]"#;
        let ds = load_json(text.as_bytes(), "inline").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].payload_mass_kg, 3000.5);
        assert_eq!(ds.records[1].outcome, Outcome::Failure);
        assert_eq!(ds.records[1].flight_number, Some(12));
    }

    #[test]
    fn json_missing_column() {
        let text = r#"[{"Launch Site": "CCAFS", "class": 1, "Booster Version Category": "v1.0"}]"#;
        let err = load_json(text.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == COL_PAYLOAD));
    }

    #[test]
    fn parquet_file_loads_same_shape() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_CLASS, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCAFS", "CCAFS", "KSC"])),
                Arc::new(Float64Array::from(vec![500.0, 2000.0, 3000.0])),
                Arc::new(Int64Array::from(vec![1, 0, 1])),
                Arc::new(StringArray::from(vec!["v1.0", "v1.0", "v1.1"])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(ds.sites, vec!["CCAFS", "KSC"]);
        assert_eq!(ds.records[1], LaunchRecord::new("CCAFS", 2000.0, Outcome::Failure, "v1.0"));
        assert_eq!(ds.bounds.max, 3000.0);
    }

    #[test]
    fn url_scheme_is_case_insensitive() {
        assert!(is_url("HTTPS://example.com/launches.csv"));
        assert!(is_url("Http://example.com/launches.csv"));
        assert!(!is_url("https:/example.com"));
        assert!(!is_url("data/http.csv"));
        assert!(!is_url("htt"));
    }

    #[test]
    fn empty_parquet_file_still_checks_columns() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            COL_LAUNCH_SITE,
            DataType::Utf8,
            false,
        )]));
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        let err = load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == COL_PAYLOAD));
    }

    #[test]
    fn empty_parquet_file_with_all_columns_is_empty_dataset() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_CLASS, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        ]));
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        let ds = load(file.path().to_str().unwrap()).unwrap();
        assert!(ds.is_empty());
    }
}
