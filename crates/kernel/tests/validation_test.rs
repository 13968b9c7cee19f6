#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Request validation integration tests.
//!
//! Request types validate at the HTTP boundary; nothing past the routes
//! layer should ever see an out-of-range page or an unknown status.

use chrono::NaiveDate;
use stockroom_kernel::error::AppError;
use stockroom_kernel::routes::category::{CreateCategoryRequest, SearchCategoryQuery};
use stockroom_kernel::routes::product::{
    CreateProductRequest, SearchProductQuery, UpdateProductRequest,
};
use stockroom_kernel::routes::supplier::CreateSupplierRequest;
use stockroom_test_utils::test_product;
use uuid::Uuid;

fn search_query() -> SearchProductQuery {
    SearchProductQuery {
        page: 1,
        size: 10,
        sort_by: None,
        sort_order: None,
        reference: None,
        product_name: None,
        category_id: None,
        supplier_id: None,
        stock_city: None,
        min_price: None,
        max_price: None,
        date_added_from: None,
        date_added_to: None,
        status: None,
    }
}

fn create_request() -> CreateProductRequest {
    let fixture = test_product("PROD-2025-01-0001", "Steel Bolts");
    CreateProductRequest {
        reference: Some(fixture.reference),
        product_name: fixture.name,
        category_id: fixture.category_id,
        price: fixture.price,
        status: fixture.status,
        stock_location: fixture.stock_city.unwrap(),
        supplier_id: fixture.supplier_id,
        quantity: fixture.quantity,
    }
}

// -------------------------------------------------------------------------
// Product search validation
// -------------------------------------------------------------------------

#[test]
fn well_formed_search_passes() {
    assert!(search_query().validate().is_empty());
    assert!(search_query().into_search().is_ok());
}

#[test]
fn page_below_one_rejected() {
    let mut query = search_query();
    query.page = 0;

    let violations = query.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "page");
}

#[test]
fn size_out_of_range_rejected() {
    let mut query = search_query();
    query.size = 101;

    let violations = query.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "size");

    query.size = 9;
    assert_eq!(query.validate().len(), 1);
}

#[test]
fn malformed_reference_filter_rejected() {
    let mut query = search_query();
    query.reference = Some("prod_2025".to_string());

    let violations = query.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "reference");
}

#[test]
fn unknown_status_filter_rejected() {
    let mut query = search_query();
    query.status = Some("Discontinued".to_string());

    let violations = query.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "status");
}

#[test]
fn violations_accumulate_across_fields() {
    let mut query = search_query();
    query.page = 0;
    query.size = 5;
    query.status = Some("Discontinued".to_string());

    assert_eq!(query.validate().len(), 3);
}

#[test]
fn into_search_surfaces_validation_error() {
    let mut query = search_query();
    query.page = 0;

    let err = query.into_search().unwrap_err();
    assert!(matches!(err, AppError::Validation(ref v) if v.len() == 1));
}

#[test]
fn into_search_rejects_unknown_sort_field() {
    let mut query = search_query();
    query.sort_by = Some("stock_city".to_string());

    let err = query.into_search().unwrap_err();
    assert!(matches!(err, AppError::InvalidSortField(ref f) if f == "stock_city"));
}

#[test]
fn into_search_rejects_unknown_sort_direction() {
    let mut query = search_query();
    query.sort_order = Some("upward".to_string());

    let err = query.into_search().unwrap_err();
    assert!(matches!(err, AppError::InvalidSortDirection(_)));
}

// -------------------------------------------------------------------------
// Product create/update validation
// -------------------------------------------------------------------------

#[test]
fn well_formed_create_passes() {
    assert!(create_request().validate().is_empty());
}

#[test]
fn create_without_reference_passes() {
    // Absent reference means the server generates one.
    let mut request = create_request();
    request.reference = None;

    assert!(request.validate().is_empty());
}

#[test]
fn lowercase_reference_rejected() {
    let mut request = create_request();
    request.reference = Some("prod-2025-01-0001".to_string());

    let violations = request.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "reference");
}

#[test]
fn short_product_name_rejected() {
    let mut request = create_request();
    request.product_name = "ab".to_string();

    let violations = request.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "product_name");
}

#[test]
fn long_product_name_rejected() {
    let mut request = create_request();
    request.product_name = "x".repeat(101);

    assert_eq!(request.validate().len(), 1);
}

#[test]
fn non_positive_price_rejected() {
    let mut request = create_request();
    request.price = 0.0;
    assert_eq!(request.validate()[0].field, "price");

    request.price = -1.5;
    assert_eq!(request.validate()[0].field, "price");
}

#[test]
fn non_positive_quantity_rejected() {
    let mut request = create_request();
    request.quantity = 0;

    assert_eq!(request.validate()[0].field, "quantity");
}

#[test]
fn unknown_status_rejected_on_create() {
    let mut request = create_request();
    request.status = "available".to_string();

    assert_eq!(request.validate()[0].field, "status");
}

#[test]
fn update_validates_same_field_rules() {
    let update = UpdateProductRequest {
        product_name: "ab".to_string(),
        category_id: Uuid::now_v7(),
        price: -1.0,
        status: "Nope".to_string(),
        stock_location: String::new(),
        added_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        supplier_id: Uuid::now_v7(),
        quantity: 0,
    };

    assert_eq!(update.validate().len(), 5);
}

// -------------------------------------------------------------------------
// Category and supplier validation
// -------------------------------------------------------------------------

#[test]
fn category_status_whitelisted() {
    let active = CreateCategoryRequest {
        name: "Hardware".to_string(),
        status: "active".to_string(),
    };
    assert!(active.validate().is_empty());

    let bad = CreateCategoryRequest {
        name: "Hardware".to_string(),
        status: "archived".to_string(),
    };
    assert_eq!(bad.validate()[0].field, "status");
}

#[test]
fn category_search_validates_page_and_status() {
    let query = SearchCategoryQuery {
        page: 0,
        size: 10,
        sort_by: None,
        sort_order: None,
        name: None,
        status: Some("archived".to_string()),
    };

    assert_eq!(query.validate().len(), 2);
}

#[test]
fn empty_supplier_name_rejected() {
    let request = CreateSupplierRequest {
        name: String::new(),
    };

    assert_eq!(request.validate()[0].field, "name");
}
