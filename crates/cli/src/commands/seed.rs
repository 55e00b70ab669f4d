//! Seed the database with a small demo data set.
//!
//! Inserts one customer, one product, and one order holding that product,
//! all in a single transaction: either everything lands or nothing does.

use chrono::NaiveDate;
use tracing::info;

use shopfront_api::db::{OrderProductRepository, OrderRepository, ProductRepository, UserRepository};
use shopfront_api::models::{OrderInput, ProductInput, UserInput};
use shopfront_core::{Email, Price};

use super::{CommandError, connect};

/// Insert the demo rows.
///
/// # Errors
///
/// Returns an error if the email is invalid, already registered, or the
/// database rejects any insert.
pub async fn run(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let price = Price::from_f64(1.5).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let order_date = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));

    let pool = connect().await?;
    shopfront_api::db::run_migrations(&pool).await?;

    let mut tx = pool.begin().await?;

    let user = UserRepository::new(&mut tx)
        .create(&UserInput {
            name: "Ann".to_string(),
            address: None,
            email,
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "Seeded user");

    let product = ProductRepository::new(&mut tx)
        .create(&ProductInput {
            product_name: "Pen".to_string(),
            price,
        })
        .await?;
    info!(product_id = %product.id, "Seeded product");

    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date,
            user_id: user.id,
        })
        .await?;
    OrderProductRepository::new(&mut tx)
        .add(order.id, product.id)
        .await?;
    info!(order_id = %order.id, "Seeded order");

    tx.commit().await?;

    info!("Seed complete");
    Ok(())
}
