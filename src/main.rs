use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use typed_record_store::config::LEDGER_DATE_FORMAT;
use typed_record_store::{
    display_all, logging, mean, validate_person, validate_vehicle, Car, CarLedger, CarMismatch, Person,
    RecordStore, StoreConfig, TypedRecord, Vehicle,
};

const USAGE: &str = "\
Usage: record-store [--config <file.json>] <command>

Commands:
  append <brand> <color> [price] [dd-mm-yyyy]   Append a car to the ledger
  list                                          List every car in the ledger
  demo                                          Run the car walkthrough against the ledger
  vehicles <file.json>                          Load vehicles and print a summary
  people <file.json>                            Load people and print a summary";

fn main() -> Result<()> {
    logging::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(&mut args)?;

    match args.first().map(String::as_str) {
        Some("append") => run_append(&config, &args[1..]),
        Some("list") => run_list(&config),
        Some("demo") => run_demo(&config),
        Some("vehicles") => run_vehicles(&config, args.get(1)),
        Some("people") => run_people(&config, args.get(1)),
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

/// Pull `--config <file>` out of the args, then apply env overrides
fn load_config(args: &mut Vec<String>) -> Result<StoreConfig> {
    let config = match args.iter().position(|a| a == "--config") {
        Some(pos) => {
            if pos + 1 >= args.len() {
                bail!("--config needs a file path");
            }
            let path = args.remove(pos + 1);
            args.remove(pos);
            StoreConfig::from_file(&path).with_context(|| format!("Failed to load config: {}", path))?
        }
        None => StoreConfig::default(),
    };

    Ok(config.with_env_overrides()?)
}

fn run_append(config: &StoreConfig, args: &[String]) -> Result<()> {
    let (brand, color) = match args {
        [brand, color, ..] => (brand, color),
        _ => bail!("append needs at least <brand> <color>\n\n{}", USAGE),
    };

    let mut car = Car::new(brand.as_str(), color.as_str());

    if let Some(price) = args.get(2) {
        let price: f64 = price
            .parse()
            .with_context(|| format!("Invalid price: {}", price))?;
        if !price.is_finite() {
            bail!("Invalid price (must be a finite number): {}", price);
        }
        car = car.with_price(price);
    }

    if let Some(date) = args.get(3) {
        let date = NaiveDate::parse_from_str(date, LEDGER_DATE_FORMAT)
            .with_context(|| format!("Invalid date (expected dd-mm-yyyy): {}", date))?;
        car = car.with_date(date);
    }

    let ledger = CarLedger::from_config(config);
    ledger.append(&car)?;
    println!("✓ Car saved to '{}'", ledger.path().display());

    Ok(())
}

fn run_list(config: &StoreConfig) -> Result<()> {
    let ledger = CarLedger::from_config(config);
    let report = ledger.load_all();

    if let Some(failure) = &report.failure {
        eprintln!("❌ {}", failure);
    }
    for skipped in &report.skipped {
        eprintln!("⚠️  line {}: {}", skipped.line, skipped.reason);
    }

    let stdout = io::stdout();
    display_all(&report.cars, &mut stdout.lock())?;

    Ok(())
}

fn run_demo(config: &StoreConfig) -> Result<()> {
    println!("🚗 Car walkthrough");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).context("invalid demo date")?;

    // Same brand, different color
    let first = Car::new("Ford", "red").with_price(20000.0).with_date(jan_15);
    let second = Car::new("Ford", "blue").with_price(5000.0);

    // Same brand and color, different price
    let mut third = Car::new("Ford", "red").with_price(5000.0);
    let mut fourth = Car::new("Ford", "red").with_price(7500.0);

    // Remaining overload: brand, color, price and date
    let mut fifth = Car::new("Fiat", "white").with_price(9000.0).with_date(jan_15);

    print_sum(&first, &second);
    print_sum(&first, &third);

    for car in [&mut third, &mut fourth, &mut fifth] {
        car.add_taxes(1500.0);
    }
    println!("\n🧾 Taxes of $1500 added to the last three");
    print_sum(&third, &fourth);

    println!("\n🔍 Equality (brand only)");
    println!("   first == second: {}", first.equals(&second));
    println!("   first == fifth:  {}", first.equals(&fifth));

    println!("\n📋 Odd cars");
    for car in [&first, &third, &fifth] {
        println!("{}\n", car);
    }

    let ledger = CarLedger::from_config(config);
    ledger.append(&first)?;
    ledger.append(&fifth)?;
    println!("💾 Saved 2 cars to '{}'", ledger.path().display());

    let report = ledger.load_all();
    println!("✓ Ledger holds {} cars ({} rows skipped)", report.cars.len(), report.skipped.len());

    Ok(())
}

fn print_sum(a: &Car, b: &Car) {
    match Car::add(a, b) {
        Ok(total) => println!("➕ {} {} + {} {} = ${}", a.brand, a.color, b.brand, b.color, total),
        Err(mismatch) => {
            println!("⚠️  {}", mismatch);
            println!("   result: ${}", CarMismatch::NEUTRAL);
        }
    }
}

fn read_input(path: Option<&String>) -> Result<String> {
    let path = path.context("missing <file.json> argument")?;
    fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read: {}", path))
}

fn run_vehicles(config: &StoreConfig, path: Option<&String>) -> Result<()> {
    let text = read_input(path)?;
    let (store, rejected) = RecordStore::<Vehicle>::from_json(&text, config.partial_pairs)?;

    println!("🚦 {} vehicles loaded, {} rejected", store.len(), rejected.len());
    for r in &rejected {
        println!("   ✗ entry {}: {}", r.index, r.reason);
    }

    for kind in ["land", "air", "base"] {
        let group = store.filter_kind(kind);
        println!(
            "   {:<5} {:>3}  avg max speed {:.2}",
            kind,
            group.len(),
            mean(group.iter().copied(), |v| v.max_speed)
        );
    }
    println!("   all   {:>3}  avg max speed {:.2}", store.len(), store.mean_of(|v| v.max_speed));

    for vehicle in store.iter() {
        let issues = validate_vehicle(vehicle);
        if !issues.is_empty() {
            println!("   ⚠️  #{}: {} issue(s)", vehicle.id(), issues.len());
        }
    }

    Ok(())
}

fn run_people(config: &StoreConfig, path: Option<&String>) -> Result<()> {
    let text = read_input(path)?;
    let (store, rejected) = RecordStore::<Person>::from_json(&text, config.partial_pairs)?;

    println!("👥 {} people loaded, {} rejected", store.len(), rejected.len());
    for r in &rejected {
        println!("   ✗ entry {}: {}", r.index, r.reason);
    }

    for person in store.iter() {
        println!("   {}", person);
        for issue in validate_person(person, config) {
            println!("      ⚠️  {}", issue.message);
        }
    }
    println!("   avg age {:.1}", store.mean_of(|p| f64::from(p.age)));

    Ok(())
}
