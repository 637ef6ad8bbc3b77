//! MySQL-based catalog store implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use tracing::info;

use crate::config::Config;
use crate::models::catalog::now;
use crate::models::{Inventory, NewProduct, Product};
use crate::store::{CatalogStore, ProductPage, StoreError, StoreResult};

/// Schema statements, applied one at a time at connect.
///
/// `product_inventory.product_id` is indexed but carries no foreign key
/// constraint, so deleting a product leaves its inventory row in place.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        sku VARCHAR(100) NOT NULL,
        name VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        price DECIMAL(10, 2) NOT NULL,
        created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
        UNIQUE KEY idx_products_sku (sku)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_inventory (
        inventory_id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        product_id BIGINT NOT NULL,
        stock_quantity INT NOT NULL DEFAULT 0,
        warehouse_location VARCHAR(255) NOT NULL DEFAULT '',
        updated_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
        KEY idx_inventory_product (product_id)
    )
    "#,
];

const PRODUCT_COLUMNS: &str = "product_id, sku, name, description, price, created_at";
const INVENTORY_COLUMNS: &str =
    "inventory_id, product_id, stock_quantity, warehouse_location, updated_at";

/// MySQL-based catalog store. Owns the connection pool; call `close` on
/// shutdown to release it.
pub struct MySqlCatalogStore {
    pool: Pool<MySql>,
}

impl MySqlCatalogStore {
    /// Opens the pool described by `config` and applies the schema.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        // Log connection info without password
        info!(
            host = %config.db_host,
            port = config.db_port,
            database = %config.db_name,
            username = %config.db_user,
            max_connections = config.db_max_connections,
            min_idle = config.db_min_idle,
            "Connecting to MySQL"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_idle.min(config.db_max_connections))
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(connect_options(config))
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("MySQL pool closed");
    }
}

/// Connection options built from the individual settings, so credentials
/// never pass through a URL and need no escaping.
fn connect_options(config: &Config) -> MySqlConnectOptions {
    let mut opts = MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .database(&config.db_name)
        .username(&config.db_user);

    if !config.db_password.is_empty() {
        opts = opts.password(&config.db_password);
    }
    opts
}

fn map_unique_violation(err: sqlx::Error, sku: &str) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(format!("product with SKU {} already exists", sku))
        }
        other => other.into(),
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalogStore {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE product_id = ?", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE sku = ?", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_products(&self, offset: u64, limit: u32) -> StoreResult<ProductPage> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM products ORDER BY product_id LIMIT ? OFFSET ?",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(ProductPage { products, total })
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let created_at = now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (sku, name, description, price, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &product.sku))?;

        Ok(Product {
            product_id: result.last_insert_id() as i64,
            sku: product.sku,
            name: product.name,
            description: product.description,
            price: product.price,
            created_at,
        })
    }

    async fn update_product(&self, product: &Product) -> StoreResult<Product> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ? WHERE product_id = ?",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.product_id)
        .execute(&self.pool)
        .await?;

        // The connection negotiates FOUND_ROWS, so an unchanged row still counts
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product".to_string()));
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product".to_string()));
        }
        Ok(())
    }

    async fn get_inventory(&self, product_id: i64) -> StoreResult<Option<Inventory>> {
        let sql = format!(
            "SELECT {} FROM product_inventory WHERE product_id = ? ORDER BY inventory_id LIMIT 1",
            INVENTORY_COLUMNS
        );
        let row = sqlx::query_as::<_, Inventory>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        let updated_at = now();
        let result = sqlx::query(
            r#"
            INSERT INTO product_inventory (product_id, stock_quantity, warehouse_location, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(inventory.product_id)
        .bind(inventory.stock_quantity)
        .bind(&inventory.warehouse_location)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(Inventory {
            inventory_id: result.last_insert_id() as i64,
            updated_at,
            ..inventory.clone()
        })
    }

    async fn update_inventory(&self, inventory: &Inventory) -> StoreResult<Inventory> {
        let updated_at = now();
        sqlx::query(
            r#"
            UPDATE product_inventory
            SET product_id = ?, stock_quantity = ?, warehouse_location = ?, updated_at = ?
            WHERE inventory_id = ?
            "#,
        )
        .bind(inventory.product_id)
        .bind(inventory.stock_quantity)
        .bind(&inventory.warehouse_location)
        .bind(updated_at)
        .bind(inventory.inventory_id)
        .execute(&self.pool)
        .await?;

        Ok(Inventory {
            updated_at,
            ..inventory.clone()
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
