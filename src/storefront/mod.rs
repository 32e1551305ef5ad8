//! Storefront-side state: catalogue, cart, search and page navigation.
//!
//! Nothing here is persisted; a fresh `Storefront` is an empty session.

pub mod cart;
pub mod client;
pub mod routes;
pub mod search;

pub use cart::{Cart, CartAction, CartLine};
pub use client::{ClientError, StorefrontClient};
pub use routes::{Page, ROUTES};

use crate::models::{OrderResponse, ProductResponse};

#[derive(Debug, Clone, Default)]
pub struct Storefront {
    products: Vec<ProductResponse>,
    cart: Cart,
    search_query: String,
    page: Page,
    menu_open: bool,
}

impl Storefront {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the catalogue once. On failure the current list is kept.
    pub async fn load_products(&mut self, client: &StorefrontClient) -> Result<usize, ClientError> {
        match client.fetch_products().await {
            Ok(products) => {
                self.products = products;
                Ok(self.products.len())
            }
            Err(e) => {
                log::error!("Failed to fetch products: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_products(&mut self, products: Vec<ProductResponse>) {
        self.products = products;
    }

    pub fn products(&self) -> &[ProductResponse] {
        &self.products
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn visible_products(&self) -> Vec<&ProductResponse> {
        search::filter_products(&self.products, &self.search_query)
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn navigate(&mut self, path: &str) -> Page {
        self.go(Page::resolve(path))
    }

    /// Switching pages always closes the mobile menu
    pub fn go(&mut self, page: Page) -> Page {
        self.page = page;
        self.menu_open = false;
        page
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn dispatch(&mut self, action: CartAction) {
        self.cart.apply(action);
    }

    /// Adds a catalogue product by id; false when it is not loaded
    pub fn add_to_cart(&mut self, product_id: &str) -> bool {
        match self.products.iter().find(|p| p.id == product_id) {
            Some(product) => {
                self.cart.add(product.clone());
                true
            }
            None => false,
        }
    }

    /// Submits the cart and empties it only once the server accepted the order
    pub async fn checkout(
        &mut self,
        client: &StorefrontClient,
        token: &str,
    ) -> Result<OrderResponse, ClientError> {
        let order = client.place_order(token, &self.cart).await?;
        self.cart.clear();
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn catalogue() -> Vec<ProductResponse> {
        ["Lavender Bliss", "Vanilla Dream", "Rose Garden"]
            .iter()
            .enumerate()
            .map(|(i, name)| ProductResponse {
                id: format!("p{}", i),
                name: name.to_string(),
                description: String::new(),
                price: Decimal::from(100 * (i as i64 + 1)),
                image: String::new(),
                category: None,
                created_at: String::new(),
                updated_at: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_navigation_closes_menu() {
        let mut session = Storefront::new();
        assert_eq!(session.page(), Page::Home);

        session.toggle_menu();
        assert!(session.is_menu_open());

        assert_eq!(session.navigate("/cart"), Page::Cart);
        assert!(!session.is_menu_open());
        assert_eq!(session.navigate("/does-not-exist"), Page::Home);
    }

    #[test]
    fn test_visible_products_follow_search() {
        let mut session = Storefront::new();
        session.set_products(catalogue());

        assert_eq!(session.visible_products().len(), 3);
        session.set_search_query("DREAM");
        let visible = session.visible_products();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Vanilla Dream");
    }

    #[test]
    fn test_add_to_cart_from_catalogue() {
        let mut session = Storefront::new();
        session.set_products(catalogue());

        assert!(session.add_to_cart("p0"));
        assert!(session.add_to_cart("p0"));
        assert!(session.add_to_cart("p2"));
        assert!(!session.add_to_cart("missing"));

        assert_eq!(session.cart().line_count(), 2);
        assert_eq!(session.cart().total(), Some(Decimal::from(500)));

        session.dispatch(CartAction::Remove("p2".into()));
        assert_eq!(session.cart().total(), Some(Decimal::from(200)));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_fails_locally() {
        let mut session = Storefront::new();
        let client = StorefrontClient::new("http://127.0.0.1:9");

        let result = session.checkout(&client, "token").await;
        assert!(matches!(result, Err(ClientError::EmptyCart)));
    }
}
