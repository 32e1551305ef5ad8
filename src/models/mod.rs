pub mod order;
pub mod product;
pub mod subscription;
pub mod user;

pub use order::*;
pub use product::*;
pub use subscription::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Corpo padrão de resposta para mensagens simples e erros
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Converte um timestamp BSON para RFC 3339 (vazio se fora do intervalo)
pub(crate) fn rfc3339(value: Option<mongodb::bson::DateTime>) -> String {
    value
        .and_then(|dt| dt.try_to_rfc3339_string().ok())
        .unwrap_or_default()
}
