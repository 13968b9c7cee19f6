#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Live database integration tests.
//!
//! These run against a real PostgreSQL instance and are ignored by
//! default. Provide `DATABASE_URL` and run with `cargo test -- --ignored`.

use sqlx::PgPool;
use stockroom_kernel::db::TransactionManager;
use stockroom_kernel::error::AppError;
use stockroom_kernel::models::{
    Category, NewCategory, NewProduct, NewSupplier, Product, ProductSearch, Supplier,
};
use stockroom_kernel::query::{Page, SortDirection, SortSpec};
use uuid::Uuid;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for live tests");
    PgPool::connect(&url).await.expect("database connection")
}

async fn seed_refs(tm: &TransactionManager) -> (Category, Supplier) {
    let category = Category::create(
        tm,
        NewCategory {
            name: format!("live-test-category-{}", Uuid::now_v7()),
            status: "active".to_string(),
        },
    )
    .await
    .unwrap();

    let supplier = Supplier::create(
        tm,
        NewSupplier {
            name: format!("live-test-supplier-{}", Uuid::now_v7()),
        },
    )
    .await
    .unwrap();

    (category, supplier)
}

fn new_product(name: &str, category: &Category, supplier: &Supplier) -> NewProduct {
    NewProduct {
        reference: None,
        name: name.to_string(),
        category_id: category.id,
        price: 12.5,
        status: "Available".to_string(),
        stock_city: "Lyon".to_string(),
        supplier_id: supplier.id,
        quantity: 40,
    }
}

#[tokio::test]
#[ignore]
async fn product_crud_round_trip() {
    let pool = connect().await;
    let tm = TransactionManager::new(pool.clone());
    let (category, supplier) = seed_refs(&tm).await;

    // Create with a generated reference.
    let created = Product::create(&pool, &tm, new_product("Live Test Widget", &category, &supplier))
        .await
        .unwrap();
    assert!(created.reference.starts_with("PROD-"));

    // Read back, joined.
    let detail = Product::detail_by_reference(&pool, &created.reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.product_name, "Live Test Widget");
    assert_eq!(detail.category, category.name);
    assert_eq!(detail.supplier.as_deref(), Some(supplier.name.as_str()));

    // Search by exact reference.
    let search = ProductSearch {
        page: Page::new(1, 10),
        sort: SortSpec {
            field: "added_date".to_string(),
            direction: SortDirection::Desc,
        },
        reference: Some(created.reference.clone()),
        name: None,
        category_id: None,
        supplier_id: None,
        stock_city: None,
        min_price: None,
        max_price: None,
        added_from: None,
        added_to: None,
        status: None,
    };
    let (rows, pagination) = Product::search(&pool, &search).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(pagination.total_rows, 1);
    assert_eq!(pagination.total_pages, 1);

    // Delete, then the reference no longer resolves.
    Product::delete(&pool, &tm, &created.reference).await.unwrap();
    assert!(
        Product::find_by_reference(&pool, &created.reference)
            .await
            .unwrap()
            .is_none()
    );

    let err = Product::delete(&pool, &tm, &created.reference)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
#[ignore]
async fn create_rejects_missing_foreign_keys() {
    let pool = connect().await;
    let tm = TransactionManager::new(pool.clone());
    let (category, supplier) = seed_refs(&tm).await;

    let mut input = new_product("Live Test Orphan", &category, &supplier);
    input.category_id = Uuid::now_v7();

    let err = Product::create(&pool, &tm, input).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::ForeignKeyNotFound {
            entity: "category",
            ..
        }
    ));
}

#[tokio::test]
#[ignore]
async fn failed_scope_rolls_back_all_writes() {
    let pool = connect().await;
    let tm = TransactionManager::new(pool.clone());

    let supplier = Supplier {
        id: Uuid::now_v7(),
        name: format!("live-test-rollback-{}", Uuid::now_v7()),
    };

    let row = supplier.clone();
    let result: Result<(), AppError> = tm
        .run(move |conn| {
            Box::pin(async move {
                Supplier::insert(conn, &row).await?;
                // Abort the scope after a successful write.
                Err(AppError::NotFound)
            })
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert!(!Supplier::exists(&pool, supplier.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn committed_scope_persists_writes() {
    let pool = connect().await;
    let tm = TransactionManager::new(pool.clone());

    let supplier = Supplier {
        id: Uuid::now_v7(),
        name: format!("live-test-commit-{}", Uuid::now_v7()),
    };

    let row = supplier.clone();
    tm.run(move |conn| {
        Box::pin(async move {
            Supplier::insert(conn, &row).await?;
            Ok(())
        })
    })
    .await
    .unwrap();

    assert!(Supplier::exists(&pool, supplier.id).await.unwrap());
}
