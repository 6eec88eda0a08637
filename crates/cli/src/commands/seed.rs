//! Seed the database with demo data.
//!
//! Creates a demo user, a handful of categories, and a few items so a fresh
//! environment has something to browse. Safe to run once against an empty
//! database; re-running fails on the unique username.

use bazaar_api::db::items::ItemFields;
use bazaar_api::db::{self, CategoryRepository, ItemRepository, UserRepository};
use bazaar_api::services::auth::hash_password;
use bazaar_core::Email;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

const DEMO_PASSWORD: &str = "demo-password";

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BAZAAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "BAZAAR_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let email = Email::parse("demo@example.com")?;
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let user = UserRepository::new(&pool)
        .create("demo", &email, "Demo", "User", &password_hash)
        .await?;
    info!(user_id = %user.id, "Created demo user");

    let categories = CategoryRepository::new(&pool);
    let electronics = categories
        .create("Electronics", "Gadgets and devices", Some("cpu"))
        .await?;
    let books = categories
        .create("Books", "Printed and digital books", Some("book"))
        .await?;
    let home = categories
        .create("Home & Garden", "Everything for the house", Some("home"))
        .await?;
    info!("Created categories");

    let items = ItemRepository::new(&pool);
    for (title, description, category, price) in [
        (
            "Mechanical Keyboard",
            "Tenkeyless board with hot-swappable switches",
            electronics.id,
            "89.99",
        ),
        (
            "USB-C Hub",
            "7-in-1 hub with HDMI and card reader",
            electronics.id,
            "34.50",
        ),
        (
            "The Rust Programming Language",
            "Second edition, paperback",
            books.id,
            "39.95",
        ),
        (
            "Ceramic Planter",
            "Hand-glazed planter, 20cm",
            home.id,
            "18.00",
        ),
    ] {
        let item = items
            .create(
                user.id,
                &ItemFields {
                    title,
                    description,
                    category_id: category,
                    price: price.parse::<Decimal>()?,
                    image: None,
                    is_available: true,
                },
            )
            .await?;
        info!(item_id = %item.id, title, "Created item");
    }

    info!("Seeding complete!");
    info!("  Demo login: demo / {DEMO_PASSWORD}");

    Ok(())
}
