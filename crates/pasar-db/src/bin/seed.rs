//! # Seed Data Generator
//!
//! Populates a database with demo users and a catalog for development.
//!
//! ## Usage
//! ```bash
//! # Default catalog (every product in the table below)
//! cargo run -p pasar-db --bin seed
//!
//! # Repeat the catalog in several pack sizes
//! cargo run -p pasar-db --bin seed -- --variants 3
//!
//! # Specify database path
//! cargo run -p pasar-db --bin seed -- --db ./data/pasar.db
//! ```
//!
//! ## Generated Data
//! - `admin@pasar.test` (admin) and `pembeli@pasar.test` (shopper), each
//!   with an empty cart
//! - Grocery products with Indonesian names, prices from Rp 5.000 up,
//!   discounts of 0-25% and weights of at least 100 g
//!
//! Every product goes through the same validation and price derivation as
//! the admin API, so seeded rows look exactly like real ones.

use std::env;

use anyhow::Context;
use pasar_core::metadata::Metadata;
use pasar_core::{NewProduct, NewUser, PageDirection, PageLimit, ProductInput};
use pasar_db::{Database, DbConfig, ProductGateway, ProductRecord, UserGateway};

/// (name, base price in rupiah, weight in grams)
const CATALOG: &[(&str, i64, f64)] = &[
    ("Kopi Gayo Arabika", 85_000, 250.0),
    ("Kopi Toraja Sapan", 92_000, 250.0),
    ("Teh Melati Wangi", 12_500, 100.0),
    ("Gula Aren Bubuk", 30_000, 500.0),
    ("Beras Pandan Wangi", 78_000, 5_000.0),
    ("Minyak Kelapa Murni", 45_000, 1_000.0),
    ("Sambal Bawang Bu Rudy", 35_000, 150.0),
    ("Kerupuk Udang Sidoarjo", 27_000, 500.0),
    ("Rendang Daging Kaleng", 65_000, 400.0),
    ("Madu Hutan Sumbawa", 120_000, 650.0),
    ("Keripik Tempe Malang", 18_000, 200.0),
    ("Bumbu Rawon Instan", 9_500, 100.0),
];

/// (suffix, price multiplier, weight multiplier)
const PACK_SIZES: &[(&str, i64, f64)] = &[("", 1, 1.0), ("Isi 2", 2, 2.0), ("Isi 6", 6, 6.0)];

const DISCOUNTS: &[i64] = &[0, 5, 10, 15, 25];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut variants: usize = 1;
    let mut db_path = String::from("./pasar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--variants" | "-v" => {
                if i + 1 < args.len() {
                    variants = args[i + 1].parse().unwrap_or(1).clamp(1, PACK_SIZES.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("pasar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -v, --variants <N>  Pack sizes per product, 1-3 (default: 1)");
                println!("  -d, --db <PATH>     Database file path (default: ./pasar_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 pasar Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", CATALOG.len() * variants);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .context("opening database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Creating users...");
    let users = db.users();
    for (auth_uid, email, name, is_admin) in [
        ("seed-admin", "admin@pasar.test", "Admin Pasar", true),
        ("seed-shopper", "pembeli@pasar.test", "Pembeli Setia", false),
    ] {
        let new_user = NewUser::new(auth_uid, email)?.with_name(name);
        let user = users
            .create_user(&new_user, is_admin)
            .await
            .with_context(|| format!("creating {email}"))?;
        println!("  {} ({}) uid={}", user.email, if is_admin { "admin" } else { "shopper" }, user.uid);
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (seq, (name, base_price, weight)) in CATALOG.iter().enumerate() {
        for (suffix, price_factor, weight_factor) in PACK_SIZES.iter().take(variants) {
            let input = product_input(seq, name, suffix, base_price * price_factor, weight * weight_factor);
            let label = input.name.clone();

            let record = NewProduct::new(input)
                .map_err(anyhow::Error::from)
                .and_then(|product| ProductRecord::derive(&product).map_err(anyhow::Error::from))
                .with_context(|| format!("deriving {label}"))?;

            if let Err(e) = db.products().create(&Metadata::generate(), &record).await {
                eprintln!("Failed to insert {}: {}", label, e);
                continue;
            }

            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Walk the first page back as a smoke test of the keyset query
    let page = db
        .products()
        .list(PageLimit::new(5)?, 0, PageDirection::First)
        .await?;
    println!();
    println!("First page:");
    for product in &page {
        println!("  {:<32} {:>12} {:>10}", product.name, product.offer_price, product.weight);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds admin-style input for one catalog entry.
fn product_input(seq: usize, name: &str, suffix: &str, base_price: i64, weight: f64) -> ProductInput {
    let full_name = if suffix.is_empty() {
        name.to_string()
    } else {
        format!("{name} {suffix}")
    };

    let sku_stem: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase();

    ProductInput {
        sku: Some(format!("{}-{:03}-{}", sku_stem, seq, full_name.len())),
        description: format!(
            "{full_name}, produk pilihan dari pemasok lokal. Dikemas rapat dan dikirim setiap hari."
        ),
        images: vec![format!(
            "https://cdn.pasar.test/products/{}.jpg",
            pasar_core::metadata::slugify(&full_name)
        )],
        weight_value: weight,
        base_price_value: base_price,
        discount: DISCOUNTS[seq % DISCOUNTS.len()],
        stock: ((seq * 37) % 120) as i64,
        status: "ACTIVE".to_string(),
        name: full_name,
    }
}
