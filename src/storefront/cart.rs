//! Client-local shopping cart.
//!
//! The cart holds at most one line per product id and every line has a
//! quantity of at least 1. Totals are derived on demand.

use rust_decimal::Decimal;

use crate::models::{CreateOrderRequest, IncomingOrderItem, ProductResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: ProductResponse,
    pub quantity: u32,
}

impl CartLine {
    /// `None` when price × quantity does not fit in a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ações aceitas pelo reducer do carrinho
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add(ProductResponse),
    Remove(String),
    UpdateQuantity { product_id: String, delta: i64 },
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(product) => self.add(product),
            CartAction::Remove(product_id) => self.remove(&product_id),
            CartAction::UpdateQuantity { product_id, delta } => {
                self.update_quantity(&product_id, delta)
            }
            CartAction::Clear => self.lines.clear(),
        }
    }

    /// Existing line gets +1, otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: ProductResponse) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product,
                quantity: 1,
            }),
        }
    }

    /// No-op when the product is not in the cart.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Clamps at 1; a line is only ever deleted through `remove`.
    pub fn update_quantity(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.line_mut(product_id) {
            let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
            line.quantity = next as u32;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (the header badge)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Σ price × quantity; `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal()?))
    }

    /// Payload for POST /api/orders
    pub fn to_order_request(&self) -> CreateOrderRequest {
        CreateOrderRequest {
            order_items: Some(
                self.lines
                    .iter()
                    .map(|line| IncomingOrderItem {
                        id: Some(line.product.id.clone()),
                        name: line.product.name.clone(),
                        quantity: i64::from(line.quantity),
                        image: line.product.image.clone(),
                        price: line.product.price,
                    })
                    .collect(),
            ),
            total_price: self.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn product(id: &str, price: i64) -> ProductResponse {
        ProductResponse {
            id: id.into(),
            name: format!("Candle {}", id),
            description: String::new(),
            price: Decimal::from(price),
            image: format!("/images/{}.jpg", id),
            category: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_one_line_per_product_with_add_count_as_quantity() {
        let mut cart = Cart::new();
        let sequence = ["a", "b", "a", "c", "a", "b"];
        for id in sequence {
            cart.apply(CartAction::Add(product(id, 10)));
        }

        let mut expected: HashMap<&str, u32> = HashMap::new();
        for id in sequence {
            *expected.entry(id).or_default() += 1;
        }

        assert_eq!(cart.line_count(), expected.len());
        for (id, count) in expected {
            assert_eq!(cart.line(id).map(|l| l.quantity), Some(count));
        }
        // insertion order preserved
        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quantity_clamped_at_one() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(product("a", 10));
        }

        cart.apply(CartAction::UpdateQuantity {
            product_id: "a".into(),
            delta: -100,
        });

        assert_eq!(cart.line("a").map(|l| l.quantity), Some(1));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_update_quantity_increments_and_ignores_unknown() {
        let mut cart = Cart::new();
        cart.add(product("a", 10));
        cart.update_quantity("a", 4);
        let before = cart.clone();
        cart.update_quantity("zzz", 3);

        assert_eq!(cart.line("a").map(|l| l.quantity), Some(5));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 10));
        let before = cart.clone();

        cart.apply(CartAction::Remove("missing".into()));
        assert_eq!(cart, before);

        cart.remove("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_for_two_lines() {
        let mut cart = Cart::new();
        cart.add(product("A", 100));
        cart.add(product("A", 100));
        cart.add(product("B", 50));

        assert_eq!(cart.total(), Some(Decimal::from(250)));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_order_request_mirrors_lines() {
        let mut cart = Cart::new();
        cart.add(product("A", 100));
        cart.update_quantity("A", 1);
        cart.add(product("B", 50));

        let request = cart.to_order_request();
        let items = request.order_items.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("A"));
        assert_eq!(items[0].quantity, 2);
        assert_eq!(request.total_price, Some(Decimal::from(250)));

        cart.apply(CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_overflow_is_none() {
        let mut huge = product("A", 0);
        huge.price = Decimal::MAX;
        let mut cart = Cart::new();
        cart.add(huge.clone());
        assert_eq!(cart.total(), Some(Decimal::MAX));

        cart.add(huge);
        assert_eq!(cart.line("A").and_then(CartLine::subtotal), None);
        assert_eq!(cart.total(), None);
        assert_eq!(cart.to_order_request().total_price, None);
    }
}
