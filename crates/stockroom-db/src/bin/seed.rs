//! # Seed Data Generator
//!
//! Populates a development database with categories, suppliers, items and
//! an `admin` account.
//!
//! ## Usage
//! ```bash
//! # Default: ./StockRoom.db, 200 items
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p stockroom-db --bin seed -- --count 1000 --db ./data/StockRoom.db
//! ```
//!
//! ## Generated Items
//! ```text
//!   SKU          {CAT}-{NAME3}-{NNN}     e.g. OFF-STA-007
//!   cost         $0.50 - $40.49
//!   selling      cost × 1.3 - 1.9
//!   quantity     0 - 120
//!   minimum      5 - 14, reorder = minimum + 5
//! ```

use clap::Parser;
use std::path::PathBuf;
use stockroom_core::{ItemInput, NewCategory, NewSupplier, NewUser, UserRole};
use stockroom_db::{Database, DbConfig};

/// Category code, name and item names.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "OFF",
        "Office Supplies",
        &[
            "Stapler", "Staples", "Blue Pen", "Black Pen", "Red Pen", "Pencil HB",
            "Eraser", "Ruler 30cm", "Sticky Notes", "Paper Clips", "Binder A4",
            "Copy Paper A4", "Envelope C5", "Highlighter", "Scissors",
        ],
    ),
    (
        "ELE",
        "Electrical",
        &[
            "AA Battery", "AAA Battery", "USB Cable", "Extension Lead", "LED Bulb",
            "Fuse 13A", "Cable Ties", "Power Adapter", "HDMI Cable", "Torch",
        ],
    ),
    (
        "CLN",
        "Cleaning",
        &[
            "Bin Bags", "Hand Soap", "Paper Towels", "Disinfectant", "Glass Cleaner",
            "Mop Head", "Sponges", "Gloves M", "Gloves L", "Floor Cleaner",
        ],
    ),
    (
        "TOL",
        "Tools",
        &[
            "Hammer", "Screwdriver Set", "Tape Measure", "Utility Knife", "Pliers",
            "Spanner Set", "Drill Bits", "Spirit Level", "Allen Keys", "Wood Glue",
        ],
    ),
];

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("Acme Wholesale", "Jane Porter", "orders@acme.example"),
    ("Northwind Trading", "Sam Reyes", "sales@northwind.example"),
    ("Bolt & Co", "Lee Chan", "hello@boltco.example"),
];

const UNITS: &[&str] = &["pcs", "box", "pack", "roll"];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Stock Room seed data generator")]
struct Args {
    /// Number of items to generate
    #[arg(short, long, default_value_t = 200)]
    count: usize,

    /// Database file path
    #[arg(short, long, default_value = "./StockRoom.db")]
    db: PathBuf,

    /// Password for the admin account
    #[arg(long, default_value = "admin123")]
    admin_password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("🌱 Stock Room Seed Data Generator");
    println!("=================================");
    println!("Database: {}", args.db.display());
    println!("Items:    {}", args.count);
    println!();

    let db = Database::new(DbConfig::new(&args.db).create_if_missing(true)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    if db.users().bootstrap_admin(&args.admin_password).await?.is_some() {
        println!("✓ Created user 'admin'");
    }
    if db.users().get_by_username("viewer").await?.is_none() {
        db.users()
            .create(&NewUser {
                username: "viewer".to_string(),
                password: "viewer123".to_string(),
                full_name: "Read Only".to_string(),
                role: UserRole::Viewer,
                ..Default::default()
            })
            .await?;
        println!("✓ Created user 'viewer'");
    }

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, contact, email) in SUPPLIERS {
        let id = db
            .suppliers()
            .create(&NewSupplier {
                name: name.to_string(),
                contact_person: contact.to_string(),
                email: email.to_string(),
                country: "United Kingdom".to_string(),
                ..Default::default()
            })
            .await?;
        supplier_ids.push(id);
    }
    println!("✓ Created {} suppliers", supplier_ids.len());

    let mut category_ids = Vec::with_capacity(CATALOG.len());
    for (_, name, _) in CATALOG {
        let id = db
            .categories()
            .create(&NewCategory {
                name: name.to_string(),
                description: String::new(),
            })
            .await?;
        category_ids.push(id);
    }
    println!("✓ Created {} categories", category_ids.len());

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut seed = 0;

    'outer: loop {
        for (idx, (code, _, names)) in CATALOG.iter().enumerate() {
            for name in names.iter() {
                if generated >= args.count {
                    break 'outer;
                }

                let input = generate_item(
                    code,
                    name,
                    seed,
                    category_ids[idx],
                    supplier_ids[seed % supplier_ids.len()],
                );
                seed += 1;

                if let Err(e) = db.inventory().create(&input).await {
                    eprintln!("Failed to insert {}: {}", input.sku, e);
                    continue;
                }

                generated += 1;
                if generated % 100 == 0 {
                    println!("  Generated {} items...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);

    let stats = db.dashboard().stats().await?;
    println!();
    println!("Dashboard check:");
    println!("  Active items:    {}", stats.total_items);
    println!("  Low stock:       {}", stats.low_stock_items);
    println!("  Inventory value: {}", stats.total_inventory_value);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one item with deterministic pseudo-random values.
fn generate_item(code: &str, name: &str, seed: usize, category: i64, supplier: i64) -> ItemInput {
    let short: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}-{:03}", code, short, seed);

    let round = seed / 45;
    let display_name = if round == 0 {
        name.to_string()
    } else {
        format!("{} #{}", name, round + 1)
    };

    let cost_price_cents = 50 + ((seed * 37) % 4000) as i64;
    let markup_pct = 130 + (seed % 7) as i64 * 10;
    let minimum_stock = 5 + (seed % 10) as i64;

    ItemInput {
        name: display_name,
        description: format!("{} ({})", name, code),
        sku,
        barcode: format!("500{:010}", seed),
        category_id: Some(category),
        supplier_id: Some(supplier),
        quantity: ((seed * 13) % 121) as i64,
        minimum_stock,
        reorder_level: minimum_stock + 5,
        unit: UNITS[seed % UNITS.len()].to_string(),
        cost_price_cents,
        selling_price_cents: cost_price_cents * markup_pct / 100,
        location: format!("Aisle {}", 1 + seed % 8),
        ..Default::default()
    }
}
