use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::get_config;

/// Entry para rate limiting
#[derive(Clone, Debug)]
struct RateLimitEntry {
    count: u32,
    window_start: DateTime<Utc>,
}

/// Rate limiter con sliding window, keyed por username.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    max_attempts: u32,
    window_seconds: i64,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window_seconds: i64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_attempts,
            window_seconds,
        }
    }

    /// Registra un intento. Ok(()) si está permitido, Err(mensaje) si la
    /// cuenta quedó bloqueada en esta ventana.
    pub fn check(&self, key: &str) -> Result<(), String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "No se pudo obtener el lock del rate limiter")?;

        let now = Utc::now();
        let window = Duration::seconds(self.window_seconds);

        let entry = entries.entry(key.to_string()).or_insert_with(|| RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now >= entry.window_start + window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;

        if entry.count > self.max_attempts {
            let retry_after = (entry.window_start + window - now).num_seconds();
            return Err(format!(
                "Demasiados intentos fallidos. Intente nuevamente en {} segundos.",
                retry_after.max(0)
            ));
        }

        Ok(())
    }

    /// Un login correcto limpia los intentos acumulados.
    pub fn clear(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

lazy_static::lazy_static! {
    /// Límite de intentos de login, desde la configuración de seguridad.
    pub static ref LOGIN_LIMIT: RateLimiter = {
        let security = &get_config().security;
        RateLimiter::new(security.max_login_attempts, security.login_window_secs)
    };
}
