//! In-memory repositories and an HTTP harness for unit tests.
//!
//! [`InMemoryStore`] implements every repository trait with the same
//! `created_at DESC, id ASC` ordering and the same counts as the Postgres
//! queries, so services and routers can be exercised without a database.
//! Its clock only moves on [`InMemoryStore::tick`]; in Postgres the equivalent
//! tie comes from whole-second `TIMESTAMPTZ(0)` columns and a shared `NOW()`
//! inside one transaction. The `pg_*` seeders at the bottom are for the
//! `#[sqlx::test]` repository tests.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderValue;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rust_decimal::Decimal;

use crate::core::app::{build_router, AppServices};
use crate::core::config::{AppConfig, AuthConfig};
use crate::core::error::Result;
use crate::features::auth::JwtValidator;
use crate::features::categories::dtos::CategoryProductDto;
use crate::features::categories::models::Category;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::dashboard::dtos::{
    OrderListItemDto, OrderProductDto, ProductListItemDto, SiteStatsDto, UserListItemDto,
    UserStatsDto,
};
use crate::features::dashboard::repositories::DashboardRepository;
use crate::features::users::models::{User, UserRole};
use crate::features::users::repositories::UserRepository;
use crate::shared::types::PageQuery;

/// Password of every user seeded through [`InMemoryStore::add_user`]
pub const TEST_PASSWORD: &str = "rahasia-123";

pub const TEST_LOGIN_URL: &str = "/login";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key".to_string(),
        issuer: "lapak-core-test".to_string(),
        token_ttl: Duration::from_secs(3600),
        jwt_leeway: Duration::from_secs(5),
        secure_cookie: false,
    }
}

pub fn test_app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["*".to_string()],
        max_request_body_size: 1024 * 1024,
        login_url: TEST_LOGIN_URL.to_string(),
    }
}

fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| bcrypt::hash(TEST_PASSWORD, 4).expect("bcrypt hash"))
}

#[derive(Clone)]
struct ProductRow {
    id: i64,
    user_id: i64,
    name: String,
    brand: String,
    amount: i32,
    price: Decimal,
    category_slug: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct OrderRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    total: Decimal,
    sent: bool,
    address: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    products: Vec<ProductRow>,
    orders: Vec<OrderRow>,
    rates: Vec<(i64, i64)>,
    categories: Vec<Category>,
    category_product: Vec<(i64, i64)>,
    role_writes: usize,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Rows are stamped with a shared clock that only moves on [`InMemoryStore::tick`],
/// so rows seeded together tie on `created_at` like rows inserted in one
/// transaction.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    clock: Mutex<DateTime<Utc>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock: Mutex::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        *self.clock.lock().unwrap()
    }

    /// Advance the clock by one second
    pub fn tick(&self) {
        *self.clock.lock().unwrap() += chrono::Duration::seconds(1);
    }

    pub fn add_user(&self, name: &str, role: UserRole) -> User {
        let now = self.now();
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let user = User {
            id,
            name: name.to_string(),
            email: format!("{}.{}@example.com", name.to_lowercase().replace(' ', "."), id),
            password_hash: test_password_hash().to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        user
    }

    pub fn add_product(&self, user_id: i64, name: &str) -> i64 {
        let now = self.now();
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.products.push(ProductRow {
            id,
            user_id,
            name: name.to_string(),
            brand: CompanyName().fake(),
            amount: (1..100).fake(),
            price: Decimal::new((1_000..500_000).fake::<i64>(), 2),
            category_slug: None,
            created_at: now,
        });
        id
    }

    pub fn add_order(&self, user_id: i64, product_id: i64, total: Decimal, sent: bool) -> i64 {
        let now = self.now();
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.orders.push(OrderRow {
            id,
            user_id,
            product_id,
            total,
            sent,
            address: StreetName().fake(),
            created_at: now,
        });
        id
    }

    pub fn add_rate(&self, user_id: i64, product_id: i64) {
        let mut tables = self.tables.lock().unwrap();
        tables.rates.push((user_id, product_id));
    }

    /// Slug is the lowercased name with spaces turned into dashes
    pub fn add_category(&self, name: &str, parent: Option<i64>) -> i64 {
        let now = self.now();
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.categories.push(Category {
            id,
            category_id: parent,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            created_at: now,
        });
        id
    }

    pub fn attach(&self, category_id: i64, product_id: i64) {
        let mut tables = self.tables.lock().unwrap();
        let slug = tables
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.slug.clone());
        if let Some(product) = tables.products.iter_mut().find(|p| p.id == product_id) {
            product.category_slug = slug;
        }
        tables.category_product.push((category_id, product_id));
    }

    pub fn role_of(&self, user_id: i64) -> Option<UserRole> {
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.role)
    }

    /// Number of role writes that changed a row
    pub fn role_writes(&self) -> usize {
        self.tables.lock().unwrap().role_writes
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first, ties by id, then cut the requested page
fn paginate<T, K>(mut rows: Vec<T>, page: &PageQuery, key: K) -> Vec<T>
where
    K: Fn(&T) -> (DateTime<Utc>, i64),
{
    rows.sort_by(|a, b| {
        let (a_at, a_id) = key(a);
        let (b_at, b_id) = key(b);
        b_at.cmp(&a_at).then(a_id.cmp(&b_id))
    });

    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(0);
    rows.into_iter().skip(offset).take(limit).collect()
}

fn count<T>(rows: impl Iterator<Item = T>) -> i64 {
    rows.count() as i64
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn set_role(&self, id: i64, role: UserRole) -> Result<bool> {
        let now = self.now();
        let mut tables = self.tables.lock().unwrap();
        let changed = match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) if user.role != role => {
                user.role = role;
                user.updated_at = now;
                true
            }
            _ => false,
        };
        if changed {
            tables.role_writes += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn user_stats(&self, user_id: i64) -> Result<UserStatsDto> {
        let tables = self.tables.lock().unwrap();
        let orders: Vec<&OrderRow> = tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .collect();

        Ok(UserStatsDto {
            orders_count: orders.len() as i64,
            sent_orders_count: count(orders.iter().filter(|o| o.sent)),
            products_count: count(tables.products.iter().filter(|p| p.user_id == user_id)),
            total_paid: orders.iter().map(|o| o.total).sum(),
        })
    }

    async fn site_stats(&self) -> Result<SiteStatsDto> {
        let tables = self.tables.lock().unwrap();
        Ok(SiteStatsDto {
            products_count: tables.products.len() as i64,
            orders_count: tables.orders.len() as i64,
            users_count: tables.users.len() as i64,
            rates_count: tables.rates.len() as i64,
        })
    }

    async fn list_user_orders(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<OrderListItemDto>, i64)> {
        let tables = self.tables.lock().unwrap();
        let rows: Vec<OrderRow> = tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        let total = rows.len() as i64;

        let items = paginate(rows, page, |o| (o.created_at, o.id))
            .into_iter()
            .filter_map(|o| {
                let product = tables.products.iter().find(|p| p.id == o.product_id)?;
                Some(OrderListItemDto {
                    id: o.id,
                    total: o.total,
                    sent: o.sent,
                    address: o.address,
                    created_at: o.created_at,
                    product: OrderProductDto {
                        id: product.id,
                        name: product.name.clone(),
                        brand: product.brand.clone(),
                    },
                })
            })
            .collect();

        Ok((items, total))
    }

    async fn list_user_products(
        &self,
        user_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<ProductListItemDto>, i64)> {
        let tables = self.tables.lock().unwrap();
        let rows: Vec<ProductRow> = tables
            .products
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        let total = rows.len() as i64;

        let items = paginate(rows, page, |p| (p.created_at, p.id))
            .into_iter()
            .map(|p| {
                let orders: Vec<&OrderRow> = tables
                    .orders
                    .iter()
                    .filter(|o| o.product_id == p.id)
                    .collect();
                ProductListItemDto {
                    id: p.id,
                    name: p.name,
                    brand: p.brand,
                    amount: p.amount,
                    price: p.price,
                    category_slug: p.category_slug,
                    created_at: p.created_at,
                    orders_count: orders.len() as i64,
                    orders_total: orders.iter().map(|o| o.total).sum(),
                }
            })
            .collect();

        Ok((items, total))
    }

    async fn list_users(&self, page: &PageQuery) -> Result<(Vec<UserListItemDto>, i64)> {
        let tables = self.tables.lock().unwrap();
        let total = tables.users.len() as i64;

        let items = paginate(tables.users.clone(), page, |u| (u.created_at, u.id))
            .into_iter()
            .map(|u| UserListItemDto {
                products_count: count(tables.products.iter().filter(|p| p.user_id == u.id)),
                orders_count: count(tables.orders.iter().filter(|o| o.user_id == u.id)),
                id: u.id,
                name: u.name,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
            })
            .collect();

        Ok((items, total))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        let tables = self.tables.lock().unwrap();
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_products(
        &self,
        category_id: i64,
        page: &PageQuery,
    ) -> Result<(Vec<CategoryProductDto>, i64)> {
        let tables = self.tables.lock().unwrap();
        let rows: Vec<ProductRow> = tables
            .products
            .iter()
            .filter(|p| tables.category_product.contains(&(category_id, p.id)))
            .cloned()
            .collect();
        let total = rows.len() as i64;

        let items = paginate(rows, page, |p| (p.created_at, p.id))
            .into_iter()
            .map(|p| CategoryProductDto {
                id: p.id,
                seller_id: p.user_id,
                name: p.name,
                brand: p.brand,
                amount: p.amount,
                price: p.price,
                created_at: p.created_at,
            })
            .collect();

        Ok((items, total))
    }
}

// =============================================================================
// HTTP HARNESS
// =============================================================================

/// Full application router over the given store
pub fn test_server(store: &Arc<InMemoryStore>) -> TestServer {
    let services = AppServices::new(
        &test_auth_config(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    TestServer::new(build_router(services, &test_app_config())).expect("test server")
}

fn token_for(user: &User) -> String {
    JwtValidator::new(&test_auth_config())
        .issue_token(user.id)
        .expect("sign token")
        .access_token
}

/// `Authorization: Bearer <token>` for the given user
pub fn bearer(user: &User) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token_for(user))).expect("header value")
}

/// `Cookie: auth_token=<token>` for the given user
pub fn session_cookie(user: &User) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}",
        crate::shared::constants::AUTH_COOKIE,
        token_for(user)
    ))
    .expect("header value")
}

// =============================================================================
// POSTGRES SEEDERS
// =============================================================================

/// Insert a user with a unique email. Works on a pool or inside a transaction.
pub async fn pg_user<'e, E>(executor: E, name: &str, role: UserRole) -> User
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(format!(
        "{}.{}@example.com",
        name.to_lowercase().replace(' ', "."),
        uuid::Uuid::new_v4().simple()
    ))
    .bind(test_password_hash())
    .bind(role)
    .fetch_one(executor)
    .await
    .expect("insert user")
}

pub async fn pg_product<'e, E>(executor: E, user_id: i64, name: &str) -> i64
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO products (user_id, name, brand, amount, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(CompanyName().fake::<String>())
    .bind((1..100).fake::<i32>())
    .bind(Decimal::new((1_000..500_000).fake::<i64>(), 2))
    .fetch_one(executor)
    .await
    .expect("insert product")
}

pub async fn pg_order<'e, E>(
    executor: E,
    user_id: i64,
    product_id: i64,
    total: Decimal,
    sent: bool,
) -> i64
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO orders (user_id, product_id, total, sent, address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(total)
    .bind(sent)
    .bind(StreetName().fake::<String>())
    .fetch_one(executor)
    .await
    .expect("insert order")
}

pub async fn pg_rate<'e, E>(executor: E, user_id: i64, product_id: i64)
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query("INSERT INTO rates (user_id, product_id, rating) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(product_id)
        .bind((1..=5).fake::<i16>())
        .execute(executor)
        .await
        .expect("insert rate");
}

/// Slug is the lowercased name with spaces turned into dashes
pub async fn pg_category<'e, E>(executor: E, name: &str, parent: Option<i64>) -> i64
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (category_id, name, slug) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(parent)
    .bind(name)
    .bind(name.to_lowercase().replace(' ', "-"))
    .fetch_one(executor)
    .await
    .expect("insert category")
}

pub async fn pg_attach<'e, E>(executor: E, category_id: i64, product_id: i64)
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query("INSERT INTO category_product (category_id, product_id) VALUES ($1, $2)")
        .bind(category_id)
        .bind(product_id)
        .execute(executor)
        .await
        .expect("attach product");
}
