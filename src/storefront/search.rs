//! Catalogue search: case-insensitive substring match on the product name.
//! Description is never searched. No index; recomputed per call.

use crate::models::ProductResponse;

/// An empty query matches every name. The query is used as typed,
/// surrounding spaces included.
pub fn name_matches(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Keeps catalogue order.
pub fn filter_products<'a>(products: &'a [ProductResponse], query: &str) -> Vec<&'a ProductResponse> {
    products
        .iter()
        .filter(|product| name_matches(&product.name, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, description: &str) -> ProductResponse {
        ProductResponse {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.into(),
            description: description.into(),
            price: Decimal::from(100),
            image: String::new(),
            category: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let products = vec![product("Lavender Bliss", ""), product("Vanilla Dream", "")];

        let found = filter_products(&products, "LAV");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lavender Bliss");
    }

    #[test]
    fn test_description_is_not_searched() {
        let products = vec![product("Ocean Breeze", "hints of lavender")];
        assert!(filter_products(&products, "lavender").is_empty());
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let products = vec![
            product("Rose Garden", ""),
            product("Citrus Sunrise", ""),
            product("Sandalwood Serenity", ""),
        ];

        let names: Vec<&str> = filter_products(&products, "")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(names, vec!["Rose Garden", "Citrus Sunrise", "Sandalwood Serenity"]);
    }

    #[test]
    fn test_query_is_not_trimmed() {
        assert!(name_matches("Lavender Bliss", "Bliss"));
        assert!(name_matches("Lavender Bliss", "der Bl"));
        assert!(!name_matches("Lavender Bliss", "Bliss "));
        assert!(!name_matches("Lavender", " "));
    }
}
