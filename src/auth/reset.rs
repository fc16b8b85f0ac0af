//! Password-reset sessions
//!
//! The recovery flow spans three screens (email → code → new password). The
//! state between them lives here, keyed by an opaque token the frontend
//! carries along, with the emailed code and a short TTL.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResetSession {
    pub email: String,
    code: String,
    expires_at: DateTime<Utc>,
    verified: bool,
}

pub struct PasswordResetStore {
    sessions: HashMap<String, ResetSession>,
    ttl: Duration,
}

impl PasswordResetStore {
    pub fn new(ttl_mins: i64) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::minutes(ttl_mins),
        }
    }

    /// Abre una sesión de recuperación para el correo dado. Devuelve el
    /// token opaco para el frontend y el código de 6 dígitos a enviar.
    pub fn create(&mut self, email: String) -> (String, String) {
        self.purge_expired();

        let token = uuid::Uuid::new_v4().to_string();
        let code = format!("{:06}", rand::thread_rng().gen_range(100_000..=999_999));

        self.sessions.insert(
            token.clone(),
            ResetSession {
                email,
                code: code.clone(),
                expires_at: Utc::now() + self.ttl,
                verified: false,
            },
        );

        (token, code)
    }

    /// Compara el código introducido; si coincide, marca la sesión como
    /// verificada. Código incorrecto y sesión vencida son mensajes distintos.
    pub fn verify(&mut self, token: &str, code: &str) -> Result<(), String> {
        let session = self
            .sessions
            .get_mut(token)
            .ok_or("La solicitud de recuperación no es válida. Vuelva a comenzar.")?;

        if Utc::now() > session.expires_at {
            self.sessions.remove(token);
            return Err("El código ha expirado. Solicite uno nuevo.".into());
        }

        if session.code != code.trim() {
            return Err(
                "El código introducido no es válido. Verifique e intente nuevamente.".into(),
            );
        }

        session.verified = true;
        Ok(())
    }

    /// Consume una sesión ya verificada y devuelve su correo. La sesión se
    /// elimina sea cual sea el resultado del cambio de contraseña posterior.
    pub fn take_verified(&mut self, token: &str) -> Result<String, String> {
        let session = self
            .sessions
            .remove(token)
            .ok_or("La solicitud de recuperación no es válida. Vuelva a comenzar.")?;

        if Utc::now() > session.expires_at {
            return Err("El código ha expirado. Solicite uno nuevo.".into());
        }

        if !session.verified {
            return Err("Primero debe verificar el código de seguridad.".into());
        }

        Ok(session.email)
    }

    fn purge_expired(&mut self) {
        let now = Utc::now();
        self.sessions.retain(|_, s| s.expires_at >= now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut store = PasswordResetStore::new(10);
        let (token, code) = store.create("jorge@taller.com".into());

        assert_eq!(code.len(), 6);
        store.verify(&token, &code).unwrap();
        assert_eq!(store.take_verified(&token).unwrap(), "jorge@taller.com");
        // consumida: no se puede reutilizar
        assert!(store.take_verified(&token).is_err());
    }

    #[test]
    fn test_wrong_code_rejected() {
        let mut store = PasswordResetStore::new(10);
        let (token, code) = store.create("jorge@taller.com".into());

        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert!(store.verify(&token, wrong).is_err());
        // la sesión sigue viva para reintentar
        store.verify(&token, &code).unwrap();
    }

    #[test]
    fn test_unverified_session_cannot_complete() {
        let mut store = PasswordResetStore::new(10);
        let (token, _code) = store.create("jorge@taller.com".into());
        assert!(store.take_verified(&token).is_err());
    }

    #[test]
    fn test_expired_session_rejected() {
        let mut store = PasswordResetStore::new(10);
        let (token, code) = store.create("jorge@taller.com".into());

        store.sessions.get_mut(&token).unwrap().expires_at = Utc::now() - Duration::minutes(1);
        assert!(store.verify(&token, &code).is_err());
        // verify descarta la sesión vencida
        assert!(!store.sessions.contains_key(&token));
    }

    #[test]
    fn test_code_is_six_digits() {
        let mut store = PasswordResetStore::new(10);
        for _ in 0..50 {
            let (_, code) = store.create("a@b.c".into());
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }
}
