use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rfc3339;

/// Produto do catálogo (armazenado no MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Preço sem moeda fixa (o frontend exibe em ₹)
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// URL ou caminho da imagem
    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Request para criar produto
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub category: Option<String>,
}

/// Request para atualizar produto (todos os campos opcionais)
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Produto como o cliente enxerga (ids em hex)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
            category: product.category,
            created_at: rfc3339(product.created_at),
            updated_at: rfc3339(product.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_hex_id_and_numeric_price() {
        let id = ObjectId::new();
        let product = Product {
            id: Some(id),
            name: "Lavender Bliss".into(),
            description: "Calming lavender".into(),
            price: Decimal::new(49950, 2),
            image: "/images/lavender.jpg".into(),
            category: None,
            created_at: Some(DateTime::from_millis(0)),
            updated_at: None,
        };

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();

        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["price"], serde_json::json!(499.5));
        assert!(json["createdAt"].as_str().unwrap().starts_with("1970-01-01T00:00:00"));
        assert_eq!(json["updatedAt"], "");
        assert!(json.get("category").is_none());
    }
}
