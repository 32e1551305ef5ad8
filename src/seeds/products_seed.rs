use mongodb::bson::DateTime;
use rust_decimal::Decimal;

use crate::database::Store;
use crate::models::Product;

/// Seed do catálogo padrão de velas.
/// Só insere se a collection `products` estiver vazia.
pub async fn seed_default_products(store: &dyn Store) {
    let count = match store.count_products().await {
        Ok(count) => count,
        Err(e) => {
            log::error!("❌ Product seed: could not count products: {}", e);
            return;
        }
    };

    if count > 0 {
        log::info!("🕯️ Products: {} already in store, skipping seed", count);
        return;
    }

    let products = build_default_products();
    log::info!("🕯️ Products: seeding {} default candles...", products.len());

    let mut inserted = 0;
    for product in products {
        let name = product.name.clone();
        match store.insert_product(product).await {
            Ok(_) => inserted += 1,
            Err(e) => log::error!("   ❌ Failed to seed {}: {}", name, e),
        }
    }
    log::info!("   ✅ Inserted {} default products", inserted);
}

fn candle(name: &str, description: &str, price: i64, image: &str, category: &str, now: DateTime) -> Product {
    Product {
        id: None,
        name: name.into(),
        description: description.into(),
        price: Decimal::from(price),
        image: image.into(),
        category: Some(category.into()),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

fn build_default_products() -> Vec<Product> {
    let now = DateTime::now();
    vec![
        candle(
            "Lavender Bliss",
            "Soy wax candle with French lavender essential oil. Around 40 hours of burn time.",
            499,
            "/images/lavender-bliss.jpg",
            "Floral",
            now,
        ),
        candle(
            "Vanilla Dream",
            "Warm Madagascar vanilla in a hand-poured amber jar.",
            449,
            "/images/vanilla-dream.jpg",
            "Sweet",
            now,
        ),
        candle(
            "Sandalwood Serenity",
            "Creamy sandalwood with a hint of cedar, wooden wick.",
            599,
            "/images/sandalwood-serenity.jpg",
            "Woody",
            now,
        ),
        candle(
            "Rose Garden",
            "Fresh-cut rose petals and geranium.",
            549,
            "/images/rose-garden.jpg",
            "Floral",
            now,
        ),
        candle(
            "Citrus Sunrise",
            "Bright orange, grapefruit and lemongrass.",
            399,
            "/images/citrus-sunrise.jpg",
            "Fresh",
            now,
        ),
        candle(
            "Ocean Breeze",
            "Sea salt and driftwood in a frosted glass tumbler.",
            479,
            "/images/ocean-breeze.jpg",
            "Fresh",
            now,
        ),
    ]
}
