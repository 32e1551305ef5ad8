//! Flickrly: a storefront for hand-poured candles.
//!
//! The crate carries both tiers. [`api`] is the actix-web backend over a
//! [`database::Store`]; [`storefront`] is the client-side state (cart,
//! search, page routing) and the HTTP client that talks to the backend.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod seeds;
pub mod services;
pub mod storefront;
pub mod utils;
