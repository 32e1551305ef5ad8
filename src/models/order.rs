use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rfc3339;

/// Item do pedido: snapshot do produto no momento do checkout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub product: ObjectId,
}

impl OrderItem {
    /// `None` when price × quantity overflows
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Pedido persistido. Imutável depois de criado.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderItem>,
    #[serde(rename = "totalPrice", with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Item como chega do cliente. `id` vira a referência `product`;
/// qualquer `_id` enviado é ignorado.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct IncomingOrderItem {
    #[serde(default, alias = "product")]
    pub id: Option<String>,
    pub name: String,
    #[serde(alias = "qty")]
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// 🛒 POST /api/orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "orderItems", default, skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<IncomingOrderItem>>,
    #[serde(
        rename = "totalPrice",
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrderItemResponse {
    pub name: String,
    pub quantity: u32,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub product: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderItemResponse>,
    #[serde(rename = "totalPrice", with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: order.user.to_hex(),
            order_items: order
                .order_items
                .into_iter()
                .map(|item| OrderItemResponse {
                    name: item.name,
                    quantity: item.quantity,
                    image: item.image,
                    price: item.price,
                    product: item.product.to_hex(),
                })
                .collect(),
            total_price: order.total_price,
            created_at: rfc3339(order.created_at),
            updated_at: rfc3339(order.updated_at),
        }
    }
}
