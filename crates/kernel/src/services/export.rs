//! Product sheet export.
//!
//! Renders a product's detail sheet through a [`DocumentRenderer`], writes
//! the file under the configured storage directory, and records the
//! resulting [`Document`] row inside a transaction scope. The rendering
//! format is a collaborator behind the trait; the shipped renderer emits a
//! plain-text sheet.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::TransactionManager;
use crate::error::{AppError, AppResult};
use crate::models::{Document, Product, ProductDetail};

/// Renders a product detail sheet into file bytes.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, product: &ProductDetail) -> Vec<u8>;

    /// File extension (without dot) for rendered output.
    fn extension(&self) -> &'static str;
}

/// Plain-text product sheet renderer.
pub struct TextSheetRenderer;

impl DocumentRenderer for TextSheetRenderer {
    fn render(&self, product: &ProductDetail) -> Vec<u8> {
        let mut sheet = String::from("Product Information\n\n");
        let _ = writeln!(sheet, "UUID: {}", product.id);
        let _ = writeln!(sheet, "Reference: {}", product.reference);
        let _ = writeln!(sheet, "Name: {}", product.product_name);
        let _ = writeln!(sheet, "Status: {}", product.status);
        let _ = writeln!(sheet, "Category Name: {}", product.category);
        let _ = writeln!(sheet, "Price: ${:.2}", product.price);
        let _ = writeln!(sheet, "Quantity: {}", product.quantity);
        let _ = writeln!(
            sheet,
            "Supplier Name: {}",
            product.supplier.as_deref().unwrap_or("-")
        );
        let _ = writeln!(sheet, "Date Added: {}", product.added_date);
        sheet.into_bytes()
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// Exports product sheets and records their document rows.
#[derive(Clone)]
pub struct ExportService {
    storage_dir: PathBuf,
    renderer: Arc<dyn DocumentRenderer>,
}

impl ExportService {
    pub fn new(storage_dir: PathBuf, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            storage_dir,
            renderer,
        }
    }

    /// Export the product identified by `reference`.
    ///
    /// Fails with `NotFound` when the reference does not resolve. The file
    /// is written before the document row is recorded; a failed insert
    /// leaves no row behind.
    pub async fn export_product(
        &self,
        pool: &PgPool,
        tm: &TransactionManager,
        reference: &str,
    ) -> AppResult<Document> {
        let detail = Product::detail_by_reference(pool, reference)
            .await?
            .ok_or(AppError::NotFound)?;

        let bytes = self.renderer.render(&detail);

        tokio::fs::create_dir_all(&self.storage_dir)
            .await
            .context("failed to create export storage directory")?;

        let filename = format!(
            "product_{}_{}.{}",
            detail.reference,
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.renderer.extension()
        );
        let path = self.storage_dir.join(&filename);

        tokio::fs::write(&path, &bytes)
            .await
            .context("failed to write export file")?;

        let document = Document {
            id: Uuid::now_v7(),
            filename,
            path: path.to_string_lossy().into_owned(),
            product_id: Some(detail.id),
            uploaded_at: Utc::now().naive_utc(),
        };

        let row = document.clone();
        tm.run(move |conn| {
            Box::pin(async move {
                Document::insert(conn, &row).await?;
                Ok(())
            })
        })
        .await?;

        Ok(document)
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_detail() -> ProductDetail {
        ProductDetail {
            id: Uuid::nil(),
            reference: "PROD-2024-01-0001".to_string(),
            product_name: "Crunchy Munch".to_string(),
            category: "Food".to_string(),
            price: 12.5,
            status: "Available".to_string(),
            stock_location: Some("Brookstone".to_string()),
            added_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 28).unwrap(),
            quantity: 10,
            supplier: Some("KFC".to_string()),
        }
    }

    #[test]
    fn text_sheet_contains_product_fields() {
        let bytes = TextSheetRenderer.render(&sample_detail());
        let sheet = String::from_utf8(bytes).unwrap();

        assert!(sheet.starts_with("Product Information"));
        assert!(sheet.contains("Reference: PROD-2024-01-0001"));
        assert!(sheet.contains("Name: Crunchy Munch"));
        assert!(sheet.contains("Status: Available"));
        assert!(sheet.contains("Category Name: Food"));
        assert!(sheet.contains("Price: $12.50"));
        assert!(sheet.contains("Quantity: 10"));
        assert!(sheet.contains("Supplier Name: KFC"));
        assert!(sheet.contains("Date Added: 2024-01-28"));
    }

    #[test]
    fn missing_supplier_renders_placeholder() {
        let mut detail = sample_detail();
        detail.supplier = None;
        let sheet = String::from_utf8(TextSheetRenderer.render(&detail)).unwrap();
        assert!(sheet.contains("Supplier Name: -"));
    }

    #[test]
    fn renderer_extension() {
        assert_eq!(TextSheetRenderer.extension(), "txt");
    }
}
