//! Entity models and repositories.

mod category;
mod document;
mod product;
mod supplier;

pub use category::{CATEGORY_STATUSES, Category, CategorySearch, NewCategory};
pub use document::Document;
pub use product::{
    NewProduct, PRODUCT_STATUSES, Product, ProductDetail, ProductSearch, UpdateProduct,
};
pub use supplier::{NewSupplier, Supplier, SupplierSearch};
