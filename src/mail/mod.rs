//! Outbound mail boundary
//!
//! Delivery is an external collaborator: production deployments inject a
//! transport-backed implementation at startup, the default only writes the
//! code to the application log so the recovery flow can be exercised in
//! development without any relay configured.

use crate::config::get_config;

pub trait Mailer: Send + Sync {
    /// Envía el código de recuperación al correo indicado.
    fn send_reset_code(&self, recipient: &str, code: &str) -> Result<(), String>;
}

/// Development mailer: logs instead of sending.
pub struct DevMailer;

impl Mailer for DevMailer {
    fn send_reset_code(&self, recipient: &str, code: &str) -> Result<(), String> {
        let sender = &get_config().mail.sender;
        crate::log_info!(
            "MAIL",
            "Código de recuperación (modo desarrollo, no enviado)",
            serde_json::json!({
                "from": sender,
                "to": recipient,
                "reset_code": code,
            })
        );
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::Mailer;
    use std::sync::Mutex;

    /// Mailer de prueba: registra los envíos en memoria.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send_reset_code(&self, recipient: &str, code: &str) -> Result<(), String> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), code.to_string()));
            Ok(())
        }
    }
}
