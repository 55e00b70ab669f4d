//! Repository tests against a real `PostgreSQL` database.
//!
//! Each test works inside one transaction and drops it at the end, so no
//! rows survive the run.

use chrono::NaiveDate;
use shopfront_api::db::{
    OrderProductRepository, OrderRepository, ProductRepository, RepositoryError, UserRepository,
};
use shopfront_api::models::{OrderInput, ProductInput, User, UserInput};
use shopfront_core::{Email, OrderId, Price, ProductId, UserId};
use shopfront_integration_tests::{test_pool, unique_email};
use sqlx::{Connection, PgConnection};

fn user_input(name: &str) -> UserInput {
    UserInput {
        name: name.to_string(),
        address: None,
        email: Email::parse(&unique_email(name)).expect("valid email"),
    }
}

fn pen() -> ProductInput {
    ProductInput {
        product_name: "Pen".to_string(),
        price: Price::from_f64(1.5).expect("valid price"),
    }
}

async fn create_user(conn: &mut PgConnection, name: &str) -> User {
    UserRepository::new(conn)
        .create(&user_input(name))
        .await
        .expect("Failed to create user")
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_user_round_trip() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let input = UserInput {
        address: Some("1 Main St".to_string()),
        ..user_input("ann")
    };
    let created = UserRepository::new(&mut tx).create(&input).await.expect("create");
    let fetched = UserRepository::new(&mut tx)
        .get_by_id(created.id)
        .await
        .expect("get")
        .expect("user exists");

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "ann");
    assert_eq!(fetched.address.as_deref(), Some("1 Main St"));
    assert_eq!(fetched.email, input.email);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_email_is_conflict() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let input = user_input("dup");
    let mut users = UserRepository::new(&mut tx);
    users.create(&input).await.expect("first create");
    let err = users.create(&input).await.expect_err("second create");

    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_update_missing_user() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let err = UserRepository::new(&mut tx)
        .update(UserId::new(i32::MAX), &user_input("ghost"))
        .await
        .expect_err("no such user");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_update_clears_omitted_address() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let input = UserInput {
        address: Some("old".to_string()),
        ..user_input("mover")
    };
    let user = UserRepository::new(&mut tx).create(&input).await.expect("create");
    let updated = UserRepository::new(&mut tx)
        .update(user.id, &user_input("mover"))
        .await
        .expect("update");

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.address, None);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_user_with_orders_cannot_be_deleted() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "owner").await;
    OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: user.id,
        })
        .await
        .expect("create order");

    let err = UserRepository::new(&mut tx)
        .delete(user.id)
        .await
        .expect_err("user still has orders");
    assert!(matches!(err, RepositoryError::Conflict(ref msg) if msg.contains("still has orders")));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_delete_user() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "leaver").await;
    let mut users = UserRepository::new(&mut tx);
    assert!(users.delete(user.id).await.expect("delete"));
    assert!(!users.delete(user.id).await.expect("second delete"));
    assert!(users.get_by_id(user.id).await.expect("get").is_none());
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_product_update_and_missing() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let mut products = ProductRepository::new(&mut tx);
    let product = products.create(&pen()).await.expect("create");
    assert_eq!(product.price, Price::from_f64(1.5).expect("price"));

    let updated = products
        .update(
            product.id,
            &ProductInput {
                product_name: "Marker".to_string(),
                price: Price::ZERO,
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.product_name, "Marker");
    assert_eq!(updated.price, Price::ZERO);

    let err = products
        .update(ProductId::new(i32::MAX), &pen())
        .await
        .expect_err("no such product");
    assert!(matches!(err, RepositoryError::NotFound));
}

// =============================================================================
// Orders and memberships
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_order_for_unknown_user() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let err = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: UserId::new(i32::MAX),
        })
        .await
        .expect_err("unknown user");
    assert!(matches!(err, RepositoryError::InvalidReference(_)));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_order_keeps_given_date() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "dated").await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date");
    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: Some(date),
            user_id: user.id,
        })
        .await
        .expect("create order");

    assert_eq!(order.order_date, date);
    assert_eq!(order.user_id, user.id);

    let listed = OrderRepository::new(&mut tx)
        .list_for_user(user.id)
        .await
        .expect("list");
    assert_eq!(listed, vec![order]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_membership() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "buyer").await;
    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: user.id,
        })
        .await
        .expect("create order");
    let product = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");

    OrderProductRepository::new(&mut tx)
        .add(order.id, product.id)
        .await
        .expect("first add");

    // The failed insert aborts its savepoint, not the outer transaction
    let mut savepoint = Connection::begin(&mut *tx).await.expect("savepoint");
    let err = OrderProductRepository::new(&mut savepoint)
        .add(order.id, product.id)
        .await
        .expect_err("second add");
    drop(savepoint);

    assert!(matches!(err, RepositoryError::Conflict(ref msg) if msg == "Product already in order"));
    let mut memberships = OrderProductRepository::new(&mut tx);
    assert_eq!(memberships.count(order.id).await.expect("count"), 1);
    assert_eq!(
        memberships.products(order.id).await.expect("products"),
        vec![product]
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_remove_absent_membership_leaves_others() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "keeper").await;
    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: user.id,
        })
        .await
        .expect("create order");
    let kept = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");
    let other = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");

    let mut memberships = OrderProductRepository::new(&mut tx);
    memberships.add(order.id, kept.id).await.expect("add");

    assert!(!memberships.remove(order.id, other.id).await.expect("remove"));
    assert!(memberships.contains(order.id, kept.id).await.expect("contains"));
    assert_eq!(memberships.count(order.id).await.expect("count"), 1);

    assert!(memberships.remove(order.id, kept.id).await.expect("remove"));
    assert_eq!(memberships.count(order.id).await.expect("count"), 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_deleting_order_removes_memberships() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "shopper").await;
    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: user.id,
        })
        .await
        .expect("create order");
    let product = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");
    OrderProductRepository::new(&mut tx)
        .add(order.id, product.id)
        .await
        .expect("add");

    assert!(OrderRepository::new(&mut tx).delete(order.id).await.expect("delete"));

    let mut memberships = OrderProductRepository::new(&mut tx);
    assert!(memberships.products(order.id).await.expect("products").is_empty());
    assert_eq!(memberships.count(order.id).await.expect("count"), 0);
    assert!(
        !OrderRepository::new(&mut tx)
            .exists(order.id)
            .await
            .expect("exists")
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_deleting_product_removes_memberships() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let user = create_user(&mut tx, "collector").await;
    let order = OrderRepository::new(&mut tx)
        .create(&OrderInput {
            order_date: None,
            user_id: user.id,
        })
        .await
        .expect("create order");
    let product = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");
    OrderProductRepository::new(&mut tx)
        .add(order.id, product.id)
        .await
        .expect("add");

    assert!(
        ProductRepository::new(&mut tx)
            .delete(product.id)
            .await
            .expect("delete")
    );
    assert_eq!(
        OrderProductRepository::new(&mut tx)
            .count(order.id)
            .await
            .expect("count"),
        0
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_membership_with_missing_order() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.expect("begin");

    let product = ProductRepository::new(&mut tx)
        .create(&pen())
        .await
        .expect("create product");
    let err = OrderProductRepository::new(&mut tx)
        .add(OrderId::new(i32::MAX), product.id)
        .await
        .expect_err("missing order");
    assert!(matches!(err, RepositoryError::InvalidReference(_)));
}
