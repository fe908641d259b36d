//! # Seed Data Loader
//!
//! Populates the database with the dev catalog for manual testing.
//!
//! ## Usage
//! ```bash
//! cargo run -p herba-db --bin seed
//!
//! # Specify database path
//! cargo run -p herba-db --bin seed -- --db ./data/herba.db
//! ```
//!
//! ## Seeded Data
//! - Categories: Herbal, Suplemen, Bahan Baku
//! - Product: Temulawak Gold 500mg (HBL-001), priced per segment
//!   (retail 75.000 / pharmacy 65.000 / distributor 55.000)
//! - Customers: one pharmacy, one distributor
//! - Opening stock: BATCH-001, 100 units, expiry 2026-12-31

use std::env;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use herba_core::CustomerSegment;
use herba_db::ledger::ReceiveGoods;
use herba_db::repository::customer::new_customer;
use herba_db::repository::product::new_product;
use herba_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./herba_dev.db");

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
                println!("Herba POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./herba_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Herba POS Seed Data Loader");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Categories
    let herbal_category = Uuid::new_v4().to_string();
    db.products()
        .insert_category(&herbal_category, "Herbal", Some("Produk herbal tradisional"))
        .await?;
    db.products()
        .insert_category(
            &Uuid::new_v4().to_string(),
            "Suplemen",
            Some("Suplemen kesehatan harian"),
        )
        .await?;
    db.products()
        .insert_category(&Uuid::new_v4().to_string(), "Bahan Baku", Some("Raw material jamu"))
        .await?;

    // Product with per-segment prices
    let mut product = new_product("HBL-001", "Temulawak Gold 500mg", "botol", 10);
    product.barcode = Some("8991234567890".to_string());
    product.category_id = Some(herbal_category);
    db.products().insert(&product).await?;

    db.prices()
        .upsert(&product.id, CustomerSegment::Retail, 75_000)
        .await?;
    db.prices()
        .upsert(&product.id, CustomerSegment::Pharmacy, 65_000)
        .await?;
    db.prices()
        .upsert(&product.id, CustomerSegment::Distributor, 55_000)
        .await?;

    println!("✓ Product {} seeded with segment prices", product.sku);

    // Customers
    db.customers()
        .insert(&new_customer("Apotek Sehat Sentosa", CustomerSegment::Pharmacy))
        .await?;
    db.customers()
        .insert(&new_customer("CV Sumber Waras", CustomerSegment::Distributor))
        .await?;

    println!("✓ Customers seeded");

    // Opening stock through the ledger, so the movement log starts
    // consistent with the batch table.
    let batch = db
        .ledger()
        .receive_goods(ReceiveGoods {
            product_id: product.id.clone(),
            batch_number: "BATCH-001".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            quantity: 100,
            user_id: "seed".to_string(),
            notes: Some("Opening stock".to_string()),
        })
        .await?;

    println!("✓ Opening batch {} ({} units)", batch.batch_number, batch.quantity);

    let total = db.batches().total_stock(&product.id).await?;
    println!();
    println!("✓ Seed complete. {} on hand: {} {}", product.name, total, product.unit);

    Ok(())
}
