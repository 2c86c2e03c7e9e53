//! # Seed Data Generator
//!
//! Populates a SQLite store with sample suppliers, vehicles and ratings,
//! then runs one discovery against it.
//!
//! ## Usage
//! ```bash
//! # Seed ./ridehub_dev.db
//! cargo run -p ridehub-engine --bin seed
//!
//! # Specify database path
//! cargo run -p ridehub-engine --bin seed -- --db ./data/ridehub.db
//! ```

use std::env;
use std::sync::Arc;

use chrono::Utc;
use ridehub_core::filter::{DiscoveryFilter, SortOrder};
use ridehub_core::{
    GeoCoordinate, Money, Rating, RatingTarget, Supplier, Vehicle, VehicleCategory,
};
use ridehub_engine::collections::{RATINGS, SUPPLIERS, VEHICLES};
use ridehub_engine::telemetry::init_tracing;
use ridehub_engine::{EngineConfig, RentalEngine, StaticIdentity};
use ridehub_store::{generate_id, to_data, DocumentStore, SqliteConfig, SqliteStore, WriteBatch};

/// (id, business name, address, coordinate)
const SUPPLIERS_DATA: &[(&str, &str, &str, Option<(f64, f64)>)] = &[
    ("sup-cebu", "Island Wheels", "Osmeña Blvd, Cebu City", Some((10.3157, 123.8854))),
    ("sup-mandaue", "Mandaue Motor Rentals", "A.C. Cortes Ave, Mandaue", Some((10.3236, 123.9223))),
    ("sup-lapu", "Mactan Ride Hub", "M.L. Quezon Hwy, Lapu-Lapu", Some((10.3103, 123.9494))),
    ("sup-remote", "Backroad Rentals", "Somewhere in the hills", None),
];

/// (name, brand, category, cc, price per day in pesos, owner)
const VEHICLES_DATA: &[(&str, &str, VehicleCategory, u32, i64, &str)] = &[
    ("Honda Click 125i", "Honda", VehicleCategory::TwoWheel, 125, 450, "sup-cebu"),
    ("Yamaha NMAX 155", "Yamaha", VehicleCategory::TwoWheel, 155, 700, "sup-cebu"),
    ("Suzuki Raider R150", "Suzuki", VehicleCategory::TwoWheel, 150, 600, "sup-mandaue"),
    ("Toyota Vios", "Toyota", VehicleCategory::FourWheel, 1300, 1800, "sup-mandaue"),
    ("Mitsubishi Mirage G4", "Mitsubishi", VehicleCategory::FourWheel, 1200, 1500, "sup-lapu"),
    ("Honda BeAT", "Honda", VehicleCategory::TwoWheel, 110, 350, "sup-lapu"),
    ("Kawasaki Barako II", "Kawasaki", VehicleCategory::TwoWheel, 175, 500, "sup-remote"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./ridehub_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("RideHub Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ridehub_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();

    println!("🌱 RideHub Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let store = Arc::new(SqliteStore::connect(SqliteConfig::new(&db_path)).await?);
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.list_all(VEHICLES).await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} vehicles", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut batch = WriteBatch::new();

    for (id, name, address, coord) in SUPPLIERS_DATA {
        let supplier = Supplier {
            id: id.to_string(),
            business_name: name.to_string(),
            business_address: Some(address.to_string()),
            business_coordinate: coord.map(|(lat, lng)| GeoCoordinate::new(lat, lng)),
            verified: coord.is_some(),
            business_email: None,
            contact_number: None,
            business_profile: None,
        };
        batch = batch.set(SUPPLIERS, id, to_data(&supplier)?);
    }

    let now = Utc::now();
    for (idx, (name, brand, category, cc, price, owner)) in VEHICLES_DATA.iter().enumerate() {
        let vehicle_id = format!("veh-{:03}", idx + 1);
        let vehicle = Vehicle {
            id: vehicle_id.clone(),
            name: name.to_string(),
            brand: Some(brand.to_string()),
            category: *category,
            displacement_cc: *cc,
            price_per_day: Money::from_major(*price),
            images: vec![],
            owner_id: owner.to_string(),
        };
        batch = batch.set(VEHICLES, &vehicle_id, to_data(&vehicle)?);

        // A few historical ratings so summaries are non-empty.
        for n in 0..(idx % 3) {
            for (target, target_id) in [
                (RatingTarget::Vehicle, vehicle_id.as_str()),
                (RatingTarget::Supplier, *owner),
            ] {
                let rating = Rating {
                    id: generate_id(),
                    target_type: target,
                    target_id: target_id.to_string(),
                    booking_id: format!("seed-{}-{}", vehicle_id, n),
                    score: 3 + ((idx + n) % 3) as u8,
                    comment: None,
                    author_id: "seed".to_string(),
                    created_at: now,
                };
                batch = batch.create(RATINGS, &rating.id, to_data(&rating)?);
            }
        }
    }

    let writes = batch.len();
    store.commit(batch).await?;
    println!("✓ Wrote {} documents", writes);

    // Discovery from Cebu City center, nearest first.
    println!();
    println!("Running discovery (nearest to Cebu City)...");
    let engine = RentalEngine::new(
        store,
        Arc::new(StaticIdentity::anonymous()),
        &EngineConfig::default(),
    )?;
    let filter = DiscoveryFilter::new().with_sort_order(SortOrder::Nearest);
    let results = engine
        .discover(Some(GeoCoordinate::new(10.2936, 123.9015)), &filter, None)
        .await?;

    for vm in &results {
        let distance = vm
            .distance_km
            .map_or_else(|| "   n/a".to_string(), |d| format!("{:6.2}", d));
        println!(
            "  {} km  {:<22} {:>10}/day  {:<22} {:.1} ({})",
            distance,
            vm.vehicle.name,
            vm.vehicle.price_per_day.to_string(),
            vm.supplier.business_name,
            vm.vehicle_rating.average,
            vm.vehicle_rating.label(),
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
