use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;

use crate::{
    database::Store,
    models::{CreateOrderRequest, IncomingOrderItem, Order, OrderItem, OrderResponse},
    services::auth_service::Claims,
    utils::{parse_object_id, AppError},
};

fn to_order_item(position: usize, item: IncomingOrderItem) -> Result<OrderItem, AppError> {
    let line = position + 1;

    let product = item
        .id
        .as_deref()
        .and_then(|id| ObjectId::parse_str(id).ok())
        .ok_or_else(|| AppError::BadRequest(format!("Order item {} has an invalid product id", line)))?;

    let quantity = u32::try_from(item.quantity)
        .ok()
        .filter(|qty| *qty >= 1)
        .ok_or_else(|| AppError::BadRequest(format!("Order item {} must have a quantity of at least 1", line)))?;

    if item.price.is_sign_negative() {
        return Err(AppError::BadRequest(format!("Order item {} has a negative price", line)));
    }

    Ok(OrderItem {
        name: item.name,
        quantity,
        image: item.image,
        price: item.price,
        product,
    })
}

/// Valida o payload do checkout e monta o pedido a ser persistido.
///
/// The stored total is always recomputed from the items; a client-supplied
/// `totalPrice` that disagrees (to the cent) is rejected.
pub fn build_order(user: ObjectId, request: CreateOrderRequest) -> Result<Order, AppError> {
    let items = match request.order_items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(AppError::BadRequest("No order items".to_string())),
    };

    let order_items = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| to_order_item(position, item))
        .collect::<Result<Vec<_>, _>>()?;

    let total_price = order_items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal()?))
        .ok_or_else(|| AppError::BadRequest("Order total out of range".to_string()))?;

    if let Some(supplied) = request.total_price {
        if supplied.round_dp(2) != total_price.round_dp(2) {
            return Err(AppError::BadRequest(format!(
                "Total price mismatch: items add up to {}, got {}",
                total_price, supplied
            )));
        }
    }

    let now = DateTime::now();
    Ok(Order {
        id: None,
        user,
        order_items,
        total_price,
        created_at: Some(now),
        updated_at: Some(now),
    })
}

/// POST /api/orders
pub async fn create_order(
    store: &dyn Store,
    claims: &Claims,
    request: CreateOrderRequest,
) -> Result<OrderResponse, AppError> {
    let user = parse_object_id(&claims.sub, "user")?;
    let order = build_order(user, request)?;

    let order = store.insert_order(order).await?;
    log::info!(
        "🛒 Order created for user {} ({} items, total {})",
        claims.sub,
        order.order_items.len(),
        order.total_price
    );
    Ok(OrderResponse::from(order))
}

/// GET /api/orders/myorders
pub async fn my_orders(store: &dyn Store, claims: &Claims) -> Result<Vec<OrderResponse>, AppError> {
    let user = parse_object_id(&claims.sub, "user")?;
    let orders = store.orders_for_user(&user).await?;
    Ok(orders.into_iter().map(OrderResponse::from).collect())
}

/// GET /api/orders/{id} - dono do pedido ou admin
pub async fn get_order(store: &dyn Store, claims: &Claims, id: &str) -> Result<OrderResponse, AppError> {
    let order_id = parse_object_id(id, "order")?;
    let order = store
        .find_order(&order_id)
        .await?
        .filter(|order| claims.is_admin || order.user.to_hex() == claims.sub)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    Ok(OrderResponse::from(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn item(id: &str, price: i64, quantity: i64) -> IncomingOrderItem {
        IncomingOrderItem {
            id: Some(id.to_string()),
            name: "Candle".into(),
            quantity,
            image: String::new(),
            price: Decimal::from(price),
        }
    }

    fn claims_for(user: ObjectId, is_admin: bool) -> Claims {
        Claims {
            sub: user.to_hex(),
            email: "buyer@flickrly.com".into(),
            name: "Buyer".into(),
            is_admin,
            iat: 0,
            exp: usize::MAX,
            jti: "test".into(),
        }
    }

    #[test]
    fn test_empty_and_missing_items_rejected() {
        let user = ObjectId::new();
        let empty = CreateOrderRequest {
            order_items: Some(vec![]),
            total_price: Some(Decimal::ZERO),
        };

        match build_order(user, empty) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "No order items"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            build_order(user, CreateOrderRequest::default()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_total_is_recomputed_and_verified() {
        let a = ObjectId::new().to_hex();
        let b = ObjectId::new().to_hex();
        let user = ObjectId::new();

        let order = build_order(
            user,
            CreateOrderRequest {
                order_items: Some(vec![item(&a, 100, 2), item(&b, 50, 1)]),
                total_price: Some(Decimal::from(250)),
            },
        )
        .unwrap();
        assert_eq!(order.total_price, Decimal::from(250));
        assert_eq!(order.order_items[0].product.to_hex(), a);
        assert_eq!(order.user, user);

        let tampered = build_order(
            user,
            CreateOrderRequest {
                order_items: Some(vec![item(&a, 100, 2)]),
                total_price: Some(Decimal::from(1)),
            },
        );
        assert!(matches!(tampered, Err(AppError::BadRequest(_))));

        let omitted = build_order(
            user,
            CreateOrderRequest {
                order_items: Some(vec![item(&a, 100, 3)]),
                total_price: None,
            },
        )
        .unwrap();
        assert_eq!(omitted.total_price, Decimal::from(300));
    }

    #[test]
    fn test_bad_items_rejected() {
        let user = ObjectId::new();
        let id = ObjectId::new().to_hex();

        for bad in [item("not-an-id", 10, 1), item(&id, 10, 0), item(&id, -5, 1)] {
            let request = CreateOrderRequest {
                order_items: Some(vec![bad]),
                total_price: None,
            };
            assert!(matches!(build_order(user, request), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let user = ObjectId::new();
        let id = ObjectId::new().to_hex();

        let mut line = item(&id, 0, 10);
        line.price = Decimal::MAX;
        let multiplied = CreateOrderRequest {
            order_items: Some(vec![line.clone()]),
            total_price: None,
        };
        line.quantity = 1;
        let summed = CreateOrderRequest {
            order_items: Some(vec![line.clone(), line]),
            total_price: None,
        };

        for request in [multiplied, summed] {
            match build_order(user, request) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Order total out of range"),
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_orders_visible_to_owner_and_admin_only() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let request = CreateOrderRequest {
            order_items: Some(vec![item(&ObjectId::new().to_hex(), 120, 1)]),
            total_price: Some(Decimal::from(120)),
        };

        let created = create_order(&store, &claims_for(owner, false), request).await.unwrap();

        assert!(get_order(&store, &claims_for(owner, false), &created.id).await.is_ok());
        assert!(get_order(&store, &claims_for(ObjectId::new(), true), &created.id).await.is_ok());
        assert!(matches!(
            get_order(&store, &claims_for(ObjectId::new(), false), &created.id).await,
            Err(AppError::NotFound(_))
        ));

        let mine = my_orders(&store, &claims_for(owner, false)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, created.id);
    }
}
