//! Recuperación de contraseña en tres pasos: correo → código → contraseña.
//!
//! El estado entre pantallas viaja en un token opaco emitido por
//! [`crate::auth::reset::PasswordResetStore`]; el código nunca sale del
//! backend salvo por el correo.

use mongodb::bson::doc;

use crate::config::get_config;
use crate::database;
use crate::errors::AppError;
use crate::validation;
use crate::AppState;
use crate::{log_error, log_info};

/// Paso 1: comprueba el correo, genera el código y lo envía.
/// Devuelve el token de la solicitud para los pasos siguientes.
#[tauri::command]
pub async fn request_password_reset(
    state: tauri::State<'_, AppState>,
    email: String,
) -> Result<String, String> {
    validation::validate_email(&email)?;
    let email = email.trim().to_string();

    let user = match database::users(&state.db)
        .find_one(doc! { "email": email.as_str() })
        .await
    {
        Ok(found) => found,
        Err(e) => {
            log_error!("RECOVERY", "Error al verificar el correo en la base de datos", e.to_string());
            return Err(AppError::Database(e).into());
        }
    };

    if user.is_none() {
        return Err(AppError::NotFound(
            "El correo electrónico no está registrado en el sistema.".into(),
        )
        .into());
    }

    let (token, code) = state
        .resets
        .lock()
        .map_err(|e| e.to_string())?
        .create(email.clone());

    state
        .mailer
        .send_reset_code(&email, &code)
        .map_err(AppError::Mail)?;

    log_info!("RECOVERY", "Código de recuperación emitido");

    Ok(token)
}

/// Paso 2: valida el código introducido contra la solicitud.
#[tauri::command]
pub async fn verify_reset_code(
    state: tauri::State<'_, AppState>,
    reset_token: String,
    code: String,
) -> Result<(), String> {
    if code.trim().is_empty() {
        return Err("Por favor, introduce el código de seguridad.".into());
    }

    state
        .resets
        .lock()
        .map_err(|e| e.to_string())?
        .verify(&reset_token, &code)
}

/// Paso 3: fija la nueva contraseña y consume la solicitud.
#[tauri::command]
pub async fn complete_password_reset(
    state: tauri::State<'_, AppState>,
    reset_token: String,
    new_password: String,
) -> Result<(), String> {
    validation::validate_password(&new_password, get_config().security.min_password_length)?;

    let email = state
        .resets
        .lock()
        .map_err(|e| e.to_string())?
        .take_verified(&reset_token)?;

    let password_hash =
        bcrypt::hash(&new_password, 12).map_err(|e| AppError::Internal(e.to_string()))?;

    let result = database::users(&state.db)
        .update_one(
            doc! { "email": email.as_str() },
            doc! { "$set": { "password_hash": password_hash } },
        )
        .await
        .map_err(AppError::Database)?;

    if result.modified_count == 0 {
        return Err("No se pudo actualizar la contraseña. Por favor, inténtalo de nuevo.".into());
    }

    log_info!("RECOVERY", "Contraseña actualizada");

    Ok(())
}
