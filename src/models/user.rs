use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento de la colección `users`; nunca se envía al frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbUser {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Datos del usuario dentro de LoginResult (sin el hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserData {
    pub username: String,
    pub email: String,
}

/// Resultado de login enviado al frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub user: AuthUserData,
    pub session_token: String,
    pub login_at: String,
}
