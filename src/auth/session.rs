use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub username: String,
    pub email: String,
    pub login_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: HashMap<String, SessionData>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime_mins: i64) -> Self {
        Self {
            sessions: HashMap::new(),
            lifetime: Duration::minutes(lifetime_mins),
        }
    }

    /// Crea una sesión nueva y devuelve el session token (UUID v4).
    pub fn create(&mut self, username: String, email: String) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        self.sessions.insert(
            token.clone(),
            SessionData {
                username,
                email,
                login_at: now,
                expires_at: now + self.lifetime,
            },
        );
        token
    }

    /// Valida el session token: existe y no está expirado.
    pub fn validate(&self, token: &str) -> Result<&SessionData, String> {
        match self.sessions.get(token) {
            None => Err("Sesión no válida, inicie sesión nuevamente.".into()),
            Some(s) if Utc::now() > s.expires_at => {
                Err("La sesión ha expirado, inicie sesión nuevamente.".into())
            }
            Some(s) => Ok(s),
        }
    }

    /// Elimina la sesión (logout).
    pub fn destroy(&mut self, token: &str) {
        self.sessions.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_validate() {
        let mut store = SessionStore::new(60);
        let token = store.create("jorge".into(), "jorge@taller.com".into());

        let session = store.validate(&token).unwrap();
        assert_eq!(session.username, "jorge");
    }

    #[test]
    fn test_unknown_token_rejected() {
        let store = SessionStore::new(60);
        assert!(store.validate("no-existe").is_err());
    }

    #[test]
    fn test_expired_session_rejected() {
        let mut store = SessionStore::new(60);
        let token = store.create("jorge".into(), "jorge@taller.com".into());

        store.sessions.get_mut(&token).unwrap().expires_at = Utc::now() - Duration::minutes(1);
        assert!(store.validate(&token).is_err());
    }

    #[test]
    fn test_destroy() {
        let mut store = SessionStore::new(60);
        let token = store.create("jorge".into(), "jorge@taller.com".into());
        store.destroy(&token);
        assert!(store.validate(&token).is_err());
    }
}
