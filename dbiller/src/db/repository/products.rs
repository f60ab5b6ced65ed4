use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};

use crate::error::{BillerError, Result};
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, image_url, category, created_at";

pub struct ProductRepository;

impl ProductRepository {
    pub async fn create(conn: &Connection, fields: &NewProduct) -> Result<Product> {
        let created_at = Utc::now();
        conn.execute(
            r#"
            INSERT INTO products (name, price, stock, image_url, category, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                fields.name.clone(),
                fields.price,
                fields.stock,
                fields.image_url.clone(),
                fields.category.clone(),
                created_at.to_rfc3339(),
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();
        Ok(Product {
            id,
            name: fields.name.clone(),
            price: fields.price,
            stock: fields.stock,
            image_url: fields.image_url.clone(),
            category: fields.category.clone(),
            created_at,
        })
    }

    pub async fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Product>> {
        let mut rows = conn
            .query(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_product(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<Product>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ?1 OFFSET ?2"
                ),
                params![limit as i64, offset as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_product(&row)?);
        }
        Ok(results)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM products", ()).await?;
        if let Some(row) = rows.next().await? {
            let count: i64 = row.get(0)?;
            Ok(count as u64)
        } else {
            Ok(0)
        }
    }

    pub async fn update(conn: &Connection, id: i64, fields: &NewProduct) -> Result<Option<Product>> {
        let rows_affected = conn
            .execute(
                r#"
                UPDATE products SET
                    name = ?2,
                    price = ?3,
                    stock = ?4,
                    image_url = ?5,
                    category = ?6
                WHERE id = ?1
                "#,
                params![
                    id,
                    fields.name.clone(),
                    fields.price,
                    fields.stock,
                    fields.image_url.clone(),
                    fields.category.clone(),
                ],
            )
            .await?;

        if rows_affected == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id).await
    }

    pub async fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .await?;

        Ok(rows_affected > 0)
    }

    /// Disjunctive substring match: an entry qualifies when any token is
    /// contained (case-insensitively) in its name or its category. Capped at
    /// `cap` entries in id order. `instr` is used instead of LIKE so tokens
    /// containing `%` or `_` match literally.
    pub async fn find_by_tokens(
        conn: &Connection,
        tokens: &[String],
        cap: usize,
    ) -> Result<Vec<Product>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut conditions = Vec::with_capacity(tokens.len());
        let mut params: Vec<libsql::Value> = Vec::with_capacity(tokens.len() * 2);
        for (i, token) in tokens.iter().enumerate() {
            let name_idx = i * 2 + 1;
            let category_idx = i * 2 + 2;
            conditions.push(format!(
                "(instr(lower(name), ?{name_idx}) > 0 \
                 OR instr(lower(coalesce(category, '')), ?{category_idx}) > 0)"
            ));
            let lowered = token.to_lowercase();
            params.push(libsql::Value::from(lowered.clone()));
            params.push(libsql::Value::from(lowered));
        }

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {} ORDER BY id LIMIT {}",
            conditions.join(" OR "),
            cap
        );

        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_product(&row)?);
        }
        Ok(results)
    }

    pub async fn list_all(conn: &Connection) -> Result<Vec<Product>> {
        let mut rows = conn
            .query(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"),
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_product(&row)?);
        }
        Ok(results)
    }

    fn row_to_product(row: &Row) -> Result<Product> {
        let created_at: String = row.get(6)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| BillerError::Internal(format!("Invalid created_at timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            stock: row.get(3)?,
            image_url: row.get(4)?,
            category: row.get(5)?,
            created_at,
        })
    }
}
