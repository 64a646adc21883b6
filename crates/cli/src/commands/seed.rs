//! Catalog seeding command.
//!
//! Inserts a small set of sample products for local development. Skips
//! seeding when the catalog already has rows so it is safe to run twice.

use rust_decimal::Decimal;

use super::CommandError;

/// Sample products: (name, price in cents, quantity).
const SAMPLE_PRODUCTS: &[(&str, i64, i32)] = &[
    ("Walnut Desk Organizer", 3499, 25),
    ("Brass Desk Lamp", 8900, 10),
    ("Recycled Paper Notebook", 650, 120),
    ("Mechanical Pencil 0.5mm", 1250, 60),
    ("Felt Laptop Sleeve 14\"", 4200, 18),
    ("Ceramic Pour-Over Set", 6750, 8),
];

/// Seed the catalog with sample products.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;

    if existing > 0 {
        tracing::info!("Catalog already has {existing} products, skipping seed");
        return Ok(());
    }

    for (name, price_cents, quantity) in SAMPLE_PRODUCTS {
        let price = Decimal::new(*price_cents, 2);
        sqlx::query("INSERT INTO products (name, price, quantity) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(price)
            .bind(quantity)
            .execute(&pool)
            .await?;
    }

    tracing::info!("Seeded {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}
