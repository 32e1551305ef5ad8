use mongodb::bson::DateTime;
use rust_decimal::Decimal;

use crate::{
    database::Store,
    models::{CreateProductRequest, Product, ProductResponse, UpdateProductRequest},
    storefront::search,
    utils::{parse_object_id, AppError},
};

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    Ok(name.to_string())
}

fn validate_price(price: Decimal) -> Result<Decimal, AppError> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }
    Ok(price)
}

/// GET /api/products - opcionalmente filtrado por `keyword` (nome)
pub async fn list_products(
    store: &dyn Store,
    keyword: Option<&str>,
) -> Result<Vec<ProductResponse>, AppError> {
    let products = store.list_products().await?;
    let keyword = keyword.unwrap_or_default();

    Ok(products
        .into_iter()
        .filter(|product| search::name_matches(&product.name, keyword))
        .map(ProductResponse::from)
        .collect())
}

pub async fn get_product(store: &dyn Store, id: &str) -> Result<ProductResponse, AppError> {
    let id = parse_object_id(id, "product")?;
    store
        .find_product(&id)
        .await?
        .map(ProductResponse::from)
        .ok_or_else(not_found)
}

pub async fn create_product(
    store: &dyn Store,
    request: CreateProductRequest,
) -> Result<ProductResponse, AppError> {
    let now = DateTime::now();
    let product = Product {
        id: None,
        name: validate_name(&request.name)?,
        description: request.description,
        price: validate_price(request.price)?,
        image: request.image,
        category: request.category,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let product = store.insert_product(product).await?;
    log::info!("✅ Product created: {}", product.name);
    Ok(ProductResponse::from(product))
}

pub async fn update_product(
    store: &dyn Store,
    id: &str,
    request: UpdateProductRequest,
) -> Result<ProductResponse, AppError> {
    let id = parse_object_id(id, "product")?;
    let mut product = store.find_product(&id).await?.ok_or_else(not_found)?;

    if let Some(name) = request.name {
        product.name = validate_name(&name)?;
    }
    if let Some(description) = request.description {
        product.description = description;
    }
    if let Some(price) = request.price {
        product.price = validate_price(price)?;
    }
    if let Some(image) = request.image {
        product.image = image;
    }
    if request.category.is_some() {
        product.category = request.category;
    }
    product.updated_at = Some(DateTime::now());

    if !store.replace_product(&product).await? {
        return Err(not_found());
    }
    Ok(ProductResponse::from(product))
}

pub async fn delete_product(store: &dyn Store, id: &str) -> Result<(), AppError> {
    let id = parse_object_id(id, "product")?;
    if !store.delete_product(&id).await? {
        return Err(not_found());
    }
    log::info!("🗑️ Product removed: {}", id);
    Ok(())
}
