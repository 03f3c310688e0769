// 📒 Car Ledger - append-only delimited store
//
// Row layout (no header):  brand,color,price,dd-mm-yyyy
// Fields holding the delimiter or quotes are quoted by the csv writer.
//
// Appends from one process are serialized through the ledger's lock and each
// row goes out in a single write on an append-mode handle. Separate processes
// appending to the same file get no stronger guarantee than that.

use crate::config::{StoreConfig, LEDGER_DATE_FORMAT};
use crate::error::{Result, StoreError};
use crate::records::Car;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Message written by `display_all` for an empty listing
pub const EMPTY_LISTING: &str = "Error: the car list is empty.";

const FIELD_COUNT: usize = 4;

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Result of a lenient load: whatever could be read, plus what went wrong
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Cars in file order
    pub cars: Vec<Car>,

    /// Set when the store could not be opened or read at all
    pub failure: Option<String>,

    /// Rows that were present but malformed
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none() && self.skipped.is_empty()
    }
}

// ============================================================================
// CAR LEDGER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CarLedger {
    path: PathBuf,
    delimiter: u8,
    lock: Arc<Mutex<()>>,
}

impl CarLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CarLedger {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        CarLedger {
            path: config.ledger_path.clone(),
            delimiter: config.delimiter_byte(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one car as one row, creating the store if absent
    ///
    /// A NaN or infinite price is refused before the store is touched.
    pub fn append(&self, car: &Car) -> Result<()> {
        if !car.price.is_finite() {
            return Err(StoreError::InvalidPrice(car.price));
        }

        let row = self.encode_row(car)?;

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StoreError::Unavailable {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(&row)?;
        file.flush()?;

        tracing::info!(path = %self.path.display(), brand = %car.brand, "car appended to ledger");
        Ok(())
    }

    fn encode_row(&self, car: &Car) -> Result<Vec<u8>> {
        let price = car.price.to_string();
        let date = car.date.format(LEDGER_DATE_FORMAT).to_string();

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record([car.brand.as_str(), car.color.as_str(), price.as_str(), date.as_str()])?;
        writer
            .into_inner()
            .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))
    }

    fn open_reader(&self) -> Result<csv::Reader<File>> {
        let file = File::open(&self.path).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        Ok(ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(file))
    }

    /// Read every row in file order, failing on the first bad one
    pub fn read_all(&self) -> Result<Vec<Car>> {
        let mut reader = self.open_reader()?;
        let mut cars = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = line_of(&record, index);
            let car = self
                .parse_row(&record)
                .map_err(|reason| StoreError::InvalidRow { line, reason })?;
            cars.push(car);
        }

        Ok(cars)
    }

    /// Read every row in file order, never failing
    ///
    /// A missing or unreadable store gives an empty list and a failure message.
    /// Malformed rows are skipped and listed.
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport {
            cars: Vec::new(),
            failure: None,
            skipped: Vec::new(),
        };

        let mut reader = match self.open_reader() {
            Ok(reader) => reader,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ledger unavailable");
                report.failure = Some(format!("Error: {}", err));
                return report;
            }
        };

        for (index, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(err) if err.is_io_error() => {
                    tracing::warn!(path = %self.path.display(), error = %err, "ledger read aborted");
                    report.failure = Some(format!("Error: {}", err));
                    break;
                }
                Err(err) => {
                    let line = err
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(index as u64 + 1);
                    report.skipped.push(SkippedRow {
                        line,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let line = line_of(&record, index);
            match self.parse_row(&record) {
                Ok(car) => report.cars.push(car),
                Err(reason) => {
                    tracing::warn!(line, reason = %reason, "skipping malformed ledger row");
                    report.skipped.push(SkippedRow { line, reason });
                }
            }
        }

        report
    }

    fn parse_row(&self, record: &StringRecord) -> std::result::Result<Car, String> {
        if record.len() != FIELD_COUNT {
            return Err(format!("expected {} fields, found {}", FIELD_COUNT, record.len()));
        }

        let price_field = record[2].trim();
        let price = price_field
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| format!("invalid price '{}'", price_field))?;

        let date_field = record[3].trim();
        let date = NaiveDate::parse_from_str(date_field, LEDGER_DATE_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", date_field, e))?;

        Ok(Car {
            brand: record[0].to_string(),
            color: record[1].to_string(),
            price,
            date,
        })
    }
}

fn line_of(record: &StringRecord, index: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(index as u64 + 1)
}

/// Write every car's listing block, each followed by a blank line
///
/// Returns `false` after writing `EMPTY_LISTING` when there is nothing to list.
pub fn display_all<W: Write>(cars: &[Car], out: &mut W) -> io::Result<bool> {
    if cars.is_empty() {
        writeln!(out, "{}", EMPTY_LISTING)?;
        return Ok(false);
    }

    for car in cars {
        writeln!(out, "{}", car)?;
        writeln!(out)?;
    }

    Ok(true)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_car(brand: &str, color: &str, price: f64) -> Car {
        Car::new(brand, color).with_price(price).with_date(date(2024, 1, 15))
    }

    #[test]
    fn test_append_creates_store_and_writes_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        let ledger = CarLedger::new(&path);

        ledger.append(&create_test_car("Ford", "red", 20000.0)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Ford,red,20000,15-01-2024\n");
    }

    #[test]
    fn test_round_trip_last_element() {
        let dir = TempDir::new().unwrap();
        let ledger = CarLedger::new(dir.path().join("autos.csv"));

        ledger.append(&create_test_car("Fiat", "white", 9000.5)).unwrap();
        let appended = create_test_car("Ford", "red", 20000.0);
        ledger.append(&appended).unwrap();

        let cars = ledger.read_all().unwrap();
        let last = cars.last().unwrap();

        assert_eq!(cars.len(), 2);
        assert_eq!(last.brand, appended.brand);
        assert_eq!(last.color, appended.color);
        assert_eq!(last.price, appended.price);
        assert_eq!(last.date, appended.date);
        assert_eq!(cars[0].price, 9000.5);
    }

    #[test]
    fn test_delimiter_in_field_is_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        let ledger = CarLedger::new(&path);

        ledger
            .append(&create_test_car("Mercedes, Benz", "black \"matte\"", 50000.0))
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("\"Mercedes, Benz\",\"black \"\"matte\"\"\","));

        let cars = ledger.read_all().unwrap();
        assert_eq!(cars[0].brand, "Mercedes, Benz");
        assert_eq!(cars[0].color, "black \"matte\"");
    }

    #[test]
    fn test_load_missing_store_reports_failure() {
        let dir = TempDir::new().unwrap();
        let ledger = CarLedger::new(dir.path().join("nope.csv"));

        let report = ledger.load_all();

        assert!(report.cars.is_empty());
        assert!(report.failure.is_some());
        assert!(!report.is_ok());
        assert!(matches!(ledger.read_all(), Err(StoreError::Unavailable { .. })));
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        fs::write(
            &path,
            "Ford,red,20000,15-01-2024\nFiat,white,cheap,01-02-2024\nVW,blue,100\nRenault,grey,7000,2024-03-01\nKia,green,15000,10-03-2024\n",
        )
        .unwrap();
        let ledger = CarLedger::new(&path);

        let report = ledger.load_all();

        assert_eq!(report.cars.len(), 2);
        assert_eq!(report.cars[1].brand, "Kia");
        assert!(report.failure.is_none());
        assert_eq!(
            report.skipped.iter().map(|s| s.line).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert!(report.skipped[0].reason.contains("invalid price"));

        assert!(matches!(
            ledger.read_all(),
            Err(StoreError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        fs::write(&path, "").unwrap();

        let report = CarLedger::new(&path).load_all();

        assert!(report.cars.is_empty());
        assert!(report.is_ok());
    }

    #[test]
    fn test_custom_delimiter_from_config() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            ledger_path: dir.path().join("autos.csv"),
            delimiter: ';',
            ..StoreConfig::default()
        };
        let ledger = CarLedger::from_config(&config);

        ledger.append(&create_test_car("Ford", "red", 1.5)).unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "Ford;red;1.5;15-01-2024\n"
        );
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_appends_keep_rows_whole() {
        let dir = TempDir::new().unwrap();
        let ledger = CarLedger::new(dir.path().join("autos.csv"));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let ledger = ledger.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let car = create_test_car(&format!("Brand{}", t), "red", i as f64);
                        ledger.append(&car).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cars = ledger.read_all().unwrap();
        assert_eq!(cars.len(), 100);
    }

    #[test]
    fn test_worked_scenario() {
        let dir = TempDir::new().unwrap();
        let ledger = CarLedger::new(dir.path().join("autos.csv"));
        let ford = create_test_car("Ford", "red", 20000.0);

        ledger.append(&ford).unwrap();
        let report = ledger.load_all();

        assert!(report.is_ok());
        assert_eq!(report.cars.len(), 1);
        assert_eq!(report.cars[0], ford);

        let loaded = &report.cars[0];
        let blue = Car::new("Ford", "blue").with_price(5000.0);
        let red = Car::new("Ford", "red").with_price(5000.0);

        let mismatch = Car::add(loaded, &blue).unwrap_err();
        assert!(mismatch.color.is_some());
        assert_eq!(Car::add(loaded, &red), Ok(25000.0));
    }

    #[test]
    fn test_date_layout_ignores_config_file_keys() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("store.json");
        let ledger_path = dir.path().join("autos.csv");
        fs::write(
            &config_path,
            serde_json::json!({
                "ledger_path": ledger_path,
                "date_format": "%m-%Y",
            })
            .to_string(),
        )
        .unwrap();

        let config = StoreConfig::from_file(&config_path).unwrap();
        let ledger = CarLedger::from_config(&config);
        ledger.append(&create_test_car("Ford", "red", 20000.0)).unwrap();

        assert_eq!(
            fs::read_to_string(&ledger_path).unwrap(),
            "Ford,red,20000,15-01-2024\n"
        );
        assert_eq!(ledger.read_all().unwrap()[0].date, date(2024, 1, 15));
    }

    #[test]
    fn test_append_rejects_non_finite_price() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        let ledger = CarLedger::new(&path);

        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = ledger.append(&create_test_car("Ford", "red", price));
            assert!(matches!(result, Err(StoreError::InvalidPrice(_))));
        }

        assert!(!path.exists());

        ledger.append(&create_test_car("Ford", "red", 20000.0)).unwrap();
        assert!(matches!(
            ledger.append(&create_test_car("Fiat", "white", f64::NAN)),
            Err(StoreError::InvalidPrice(_))
        ));
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_loaded_rows_keep_stored_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autos.csv");
        fs::write(&path, "Ford,red,20000,01-01-1990\n").unwrap();

        let cars = CarLedger::new(&path).read_all().unwrap();

        assert_eq!(cars[0].brand, "Ford");
        assert_eq!(cars[0].color, "red");
        assert_eq!(cars[0].price, 20000.0);
        assert_eq!(cars[0].date, date(1990, 1, 1));
    }

    #[test]
    fn test_display_all() {
        let cars = vec![create_test_car("Ford", "red", 20000.0)];
        let mut out = Vec::new();

        assert!(display_all(&cars, &mut out).unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Brand: Ford\nColor: red\nPrice: $20000\nDate: 2024-01-15\n\n"
        );
    }

    #[test]
    fn test_display_all_empty() {
        let mut out = Vec::new();

        assert!(!display_all(&[], &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", EMPTY_LISTING));
    }
}
