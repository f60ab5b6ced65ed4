//! Catalog store tests against a real libsql database.

use pretty_assertions::assert_eq;

use dbiller::config::DatabaseConfig;
use dbiller::db::{CatalogBackend, CatalogReader, Database, LibSqlCatalog, ProductStore};
use dbiller::models::NewProduct;

fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: ":memory:".to_string(),
        auth_token: None,
        local_path: None,
    }
}

async fn memory_catalog() -> LibSqlCatalog {
    let db = Database::new(&memory_config()).await.unwrap();
    LibSqlCatalog::new(db)
}

fn new_product(name: &str, category: Option<&str>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: 4.5,
        stock: 3,
        image_url: None,
        category: category.map(String::from),
    }
}

#[tokio::test]
async fn create_and_get_roundtrip() {
    let catalog = memory_catalog().await;

    let created = catalog
        .create_product(&new_product("Amul Milk 2L", Some("Dairy")))
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = catalog.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Amul Milk 2L");
    assert_eq!(fetched.category.as_deref(), Some("Dairy"));
    assert_eq!(fetched.price, 4.5);
    assert_eq!(fetched.stock, 3);
}

#[tokio::test]
async fn get_missing_product_returns_none() {
    let catalog = memory_catalog().await;
    assert!(catalog.get_product(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_pages_in_id_order() {
    let catalog = memory_catalog().await;
    for i in 1..=5 {
        catalog
            .create_product(&new_product(&format!("Product {i}"), None))
            .await
            .unwrap();
    }

    let page = catalog.list_products(2, 1).await.unwrap();
    let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 3]);

    assert_eq!(catalog.count_products().await.unwrap(), 5);
}

#[tokio::test]
async fn update_replaces_fields() {
    let catalog = memory_catalog().await;
    let created = catalog
        .create_product(&new_product("Bread", Some("Bakery")))
        .await
        .unwrap();

    let updated = catalog
        .update_product(
            created.id,
            &NewProduct {
                name: "Brown Bread".to_string(),
                price: 5.0,
                stock: 7,
                image_url: Some("https://img.example/bread.png".to_string()),
                category: Some("Bakery".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Brown Bread");
    assert_eq!(updated.price, 5.0);
    assert_eq!(updated.stock, 7);
    assert_eq!(
        updated.image_url.as_deref(),
        Some("https://img.example/bread.png")
    );
}

#[tokio::test]
async fn update_missing_product_returns_none() {
    let catalog = memory_catalog().await;
    let result = catalog
        .update_product(99, &new_product("Ghost", None))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_reports_whether_row_existed() {
    let catalog = memory_catalog().await;
    let created = catalog
        .create_product(&new_product("Bread", None))
        .await
        .unwrap();

    assert!(catalog.delete_product(created.id).await.unwrap());
    assert!(!catalog.delete_product(created.id).await.unwrap());
    assert!(catalog.get_product(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_tokens_matches_name_and_category_case_insensitively() {
    let catalog = memory_catalog().await;
    catalog
        .create_product(&new_product("Amul Milk 2L", Some("Dairy")))
        .await
        .unwrap();
    catalog
        .create_product(&new_product("Bread", Some("Bakery")))
        .await
        .unwrap();
    catalog
        .create_product(&new_product("Cheddar", Some("Dairy")))
        .await
        .unwrap();

    // "MILK" hits product 1 by name; "dairy" hits 1 and 3 by category.
    let found = catalog
        .find_by_tokens(&["milk".to_string(), "dairy".to_string()], 10)
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn find_by_tokens_caps_results_in_id_order() {
    let catalog = memory_catalog().await;
    for i in 1..=15 {
        catalog
            .create_product(&new_product(&format!("Milk {i}"), None))
            .await
            .unwrap();
    }

    let found = catalog
        .find_by_tokens(&["milk".to_string()], 10)
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn find_by_tokens_treats_wildcards_literally() {
    let catalog = memory_catalog().await;
    catalog
        .create_product(&new_product("Plain Milk", None))
        .await
        .unwrap();

    // A `%` token must not act as a LIKE wildcard.
    let found = catalog
        .find_by_tokens(&["%".to_string()], 10)
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn find_by_tokens_with_no_tokens_is_empty() {
    let catalog = memory_catalog().await;
    catalog
        .create_product(&new_product("Bread", None))
        .await
        .unwrap();

    let found = catalog.find_by_tokens(&[], 10).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn list_all_returns_snapshot_in_id_order() {
    let catalog = memory_catalog().await;
    for name in ["Cereal", "Apples", "Bread"] {
        catalog.create_product(&new_product(name, None)).await.unwrap();
    }

    let all = catalog.list_all().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(all[0].name, "Cereal");
}

#[tokio::test]
async fn ping_succeeds_on_live_database() {
    let catalog = memory_catalog().await;
    assert!(catalog.ping().await.is_ok());
}

#[tokio::test]
async fn file_backed_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let config = DatabaseConfig {
        url: format!("file:{}", path.display()),
        auth_token: None,
        local_path: None,
    };

    {
        let catalog = LibSqlCatalog::new(Database::new(&config).await.unwrap());
        catalog
            .create_product(&new_product("Amul Milk 2L", Some("Dairy")))
            .await
            .unwrap();
    }

    let reopened = LibSqlCatalog::new(Database::new(&config).await.unwrap());
    let all = reopened.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Amul Milk 2L");
}
