//! Read-only Google Sheets table store.
//!
//! Each data kind served from Sheets maps to one cell range, configured as
//!
//! ```yaml
//! googlesheets:
//!   token: ya29...            # OAuth bearer token, or
//!   api-key: AIza...          # an API key for public sheets
//!   enriched-library:
//!     spreadsheet: 1AbC...
//!     sheetname: Library
//!     range: A1:AD
//! ```
//!
//! The first row of the range is the header. Sheets omits trailing empty
//! cells, so shorter rows are padded.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use teamforge_config::Configuration;
use teamforge_core::{Cell, Table};
use tracing::debug;

use crate::error::StoreError;
use crate::kind::DataKind;
use crate::TableStore;

const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const STORE_NAME: &str = "googlesheets";

/// Spreadsheet, sheet and A1 range of one data kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub spreadsheet: String,
    pub sheet_name: String,
    pub range: String,
}

impl SheetLocation {
    /// Reads `googlesheets.<kind>.{spreadsheet,sheetname,range}`.
    pub fn from_config(config: &Configuration, kind: DataKind) -> Result<Self, StoreError> {
        let prefix = format!("{}.{}", STORE_NAME, kind);
        Ok(Self {
            spreadsheet: config.require(&format!("{}.spreadsheet", prefix))?,
            sheet_name: config.require(&format!("{}.sheetname", prefix))?,
            range: config.require(&format!("{}.range", prefix))?,
        })
    }

    /// `<sheet>!<range>` in A1 notation.
    pub fn a1(&self) -> String {
        format!("{}!{}", self.sheet_name, self.range)
    }
}

#[derive(Debug, Clone)]
enum Credentials {
    Bearer(String),
    ApiKey(String),
    Anonymous,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Tables read through the Sheets `values.get` endpoint.
#[derive(Debug)]
pub struct SheetsStore {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    config: Configuration,
}

impl SheetsStore {
    pub fn from_config(config: &Configuration) -> Result<Self, StoreError> {
        let credentials = if let Some(token) = config.get_opt::<String>("googlesheets.token")? {
            Credentials::Bearer(token)
        } else if let Some(key) = config.get_opt::<String>("googlesheets.api-key")? {
            Credentials::ApiKey(key)
        } else {
            Credentials::Anonymous
        };
        let endpoint = config.get_or("googlesheets.endpoint", DEFAULT_ENDPOINT.to_string())?;
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
            config: config.clone(),
        })
    }

    fn fetch(&self, location: &SheetLocation) -> Result<ValueRange, StoreError> {
        let url = format!(
            "{}/{}/values/{}",
            self.endpoint.trim_end_matches('/'),
            location.spreadsheet,
            location.a1()
        );
        debug!(event = "sheets_fetch", url = %url);
        let mut request = self.client.get(&url);
        request = match &self.credentials {
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::ApiKey(key) => request.query(&[("key", key)]),
            Credentials::Anonymous => request,
        };
        let response = request.send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

impl TableStore for SheetsStore {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    fn read(&self, kind: DataKind, key: Option<&str>) -> Result<Table, StoreError> {
        if key.is_some_and(|k| !k.is_empty()) {
            return Err(StoreError::unsupported(STORE_NAME, "Pagination"));
        }
        let location = SheetLocation::from_config(&self.config, kind)?;
        table_from_values(self.fetch(&location)?.values)
    }

    fn write(&self, _kind: DataKind, _key: Option<&str>, _table: &Table) -> Result<(), StoreError> {
        Err(StoreError::unsupported(STORE_NAME, "Writing"))
    }

    fn contains(&self, kind: DataKind, key: Option<&str>) -> Result<bool, StoreError> {
        if key.is_some_and(|k| !k.is_empty()) {
            return Err(StoreError::unsupported(STORE_NAME, "Pagination"));
        }
        Ok(self
            .config
            .contains(&format!("{}.{}.spreadsheet", STORE_NAME, kind)))
    }
}

/// Builds a table from a `values` array whose first row is the header.
fn table_from_values(values: Vec<Vec<serde_json::Value>>) -> Result<Table, StoreError> {
    let mut rows = values.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns: Vec<String> = header.iter().map(value_text).collect();
    let width = columns.len();
    let mut table = Table::new(columns);

    for (index, row) in rows.enumerate() {
        if row.len() > width {
            return Err(StoreError::Malformed {
                store: STORE_NAME,
                reason: format!("row {} has {} cells for {} columns", index, row.len(), width),
            });
        }
        let mut cells: Vec<Cell> = row.iter().map(value_cell).collect();
        cells.resize(width, Cell::Empty);
        table.push_row(cells)?;
    }
    Ok(table)
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_cell(value: &serde_json::Value) -> Cell {
    match value {
        serde_json::Value::Null => Cell::Empty,
        serde_json::Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::Number),
        serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
        serde_json::Value::String(s) => Cell::parse(s),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teamforge_core::ErrorKind;

    fn values(doc: serde_json::Value) -> Vec<Vec<serde_json::Value>> {
        serde_json::from_value::<ValueRange>(doc).unwrap().values
    }

    #[test]
    fn test_header_and_numbers() {
        let table = table_from_values(values(json!({
            "range": "Library!A1:C3",
            "majorDimension": "ROWS",
            "values": [
                ["Name", "CP", "DPT"],
                ["Ivysaur", "944", "8.65"],
                ["Charmander", "549"]
            ]
        })))
        .unwrap();

        assert_eq!(table.columns(), ["Name", "CP", "DPT"]);
        assert_eq!(table.len(), 2);
        let row = table.row(0).unwrap();
        assert_eq!(row.text("Name").unwrap(), "Ivysaur");
        assert_eq!(row.number("CP").unwrap(), 944.0);
        assert_eq!(table.row(1).unwrap().optional_number("DPT").unwrap(), None);
    }

    #[test]
    fn test_missing_values_is_blank() {
        let table = table_from_values(values(json!({ "range": "A1:B2" }))).unwrap();
        assert!(table.is_blank());
    }

    #[test]
    fn test_overlong_row_is_malformed() {
        let err = table_from_values(values(json!({
            "values": [["a"], ["1", "2"]]
        })))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataContract);
    }

    #[test]
    fn test_location_from_config() {
        let config = Configuration::from_yaml_str(
            "googlesheets:\n  evaluation:\n    spreadsheet: abc\n    sheetname: Models\n    range: A1:K20\n",
        )
        .unwrap();
        let location = SheetLocation::from_config(&config, DataKind::Evaluation).unwrap();
        assert_eq!(location.a1(), "Models!A1:K20");

        let err = SheetLocation::from_config(&config, DataKind::Result).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_read_only() {
        let store = SheetsStore::from_config(&Configuration::new()).unwrap();
        let err = store.write(DataKind::Result, None, &Table::default()).unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { .. }));
        let err = store.read(DataKind::Result, Some("m")).unwrap_err();
        assert_eq!(err.to_string(), "Pagination not supported for googlesheets storage");
        assert!(!store.contains(DataKind::Result, None).unwrap());
    }
}
