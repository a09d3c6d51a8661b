//! Test fixtures: an in-memory database seeded with the usual cast

use shared::models::{Customer, CustomerInput, Product, ProductInput, User, UserRole};
use sqlx::SqlitePool;

use crate::auth::RequestContext;
use crate::auth::password::hash_password;
use crate::db::DbService;
use crate::db::repository::{customer, product, user};

pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const STAFF_PASSWORD: &str = "staff-pass";

pub struct Seed {
    pub db: DbService,
    pub admin: User,
    pub staff: User,
    /// Jane Doe, +230 5123 4567
    pub customer: Customer,
    /// Chocolate Cake, 500.00
    pub product: Product,
}

impl Seed {
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

pub async fn seeded() -> Seed {
    let db = DbService::in_memory().await.unwrap();
    let pool = &db.pool;

    let admin = user::create(
        pool,
        "admin",
        &hash_password(ADMIN_PASSWORD).unwrap(),
        "Shop Owner",
        Some("owner@sweetcreations.mu"),
        UserRole::Admin,
    )
    .await
    .unwrap();
    let staff = user::create(
        pool,
        "staff",
        &hash_password(STAFF_PASSWORD).unwrap(),
        "Counter Staff",
        None,
        UserRole::Staff,
    )
    .await
    .unwrap();
    let customer = customer::create(
        pool,
        &CustomerInput {
            full_name: "Jane Doe".into(),
            phone_number: "+230 5123 4567".into(),
            email: Some("jane@example.mu".into()),
            address: Some("12 Royal Road, Curepipe".into()),
            notes: None,
        },
    )
    .await
    .unwrap();
    let product = product::create(
        pool,
        &ProductInput {
            cake_name: "Chocolate Cake".into(),
            base_price: Some(500.0),
            category: Some("Birthday".into()),
            description: Some("Rich dark chocolate sponge".into()),
            custom_available: true,
            size_options: Some("6 inch, 8 inch".into()),
        },
        500.0,
    )
    .await
    .unwrap();

    Seed {
        db,
        admin,
        staff,
        customer,
        product,
    }
}

pub fn ctx(user: &User) -> RequestContext {
    RequestContext {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    }
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
