use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error de base de datos: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Error de autenticación: {0}")]
    Auth(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Validación fallida: {0}")]
    Validation(String),

    #[error("Error al enviar el correo: {0}")]
    Mail(String),

    #[error("Error: {0}")]
    Internal(String),
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
