use mongodb::bson::doc;

use crate::config::get_config;
use crate::database;
use crate::errors::AppError;
use crate::models::user::{AuthUserData, DbUser, LoginResult};
use crate::rate_limiter::LOGIN_LIMIT;
use crate::validation;
use crate::AppState;
use crate::{log_error, log_info, log_warn};

/// Primer arranque: todavía no hay ningún usuario registrado.
#[tauri::command]
pub async fn check_first_run(state: tauri::State<'_, AppState>) -> Result<bool, String> {
    let count = database::users(&state.db)
        .count_documents(doc! {})
        .await
        .map_err(AppError::Database)?;
    Ok(count == 0)
}

/// Crea la cuenta inicial (solo disponible mientras no exista ninguna).
#[tauri::command]
pub async fn register_first_user(
    state: tauri::State<'_, AppState>,
    username: String,
    email: String,
    password: String,
) -> Result<(), String> {
    let users = database::users(&state.db);

    let count = users
        .count_documents(doc! {})
        .await
        .map_err(AppError::Database)?;
    if count > 0 {
        return Err("Ya existe un usuario registrado.".into());
    }

    let username = username.trim().to_string();
    if username.len() < 4 {
        return Err("El usuario debe tener al menos 4 caracteres.".into());
    }
    validation::validate_email(&email)?;
    validation::validate_password(&password, get_config().security.min_password_length)?;

    let password_hash = bcrypt::hash(&password, 12).map_err(|e| AppError::Internal(e.to_string()))?;

    users
        .insert_one(DbUser {
            id: None,
            username: username.clone(),
            password_hash,
            email: email.trim().to_string(),
        })
        .await
        .map_err(AppError::Database)?;

    log_info!("AUTH", "Cuenta inicial creada", serde_json::json!({ "username": username }));

    Ok(())
}

/// Login de usuario: verifica credenciales y crea la sesión.
#[tauri::command]
pub async fn login(
    state: tauri::State<'_, AppState>,
    username: String,
    password: String,
) -> Result<LoginResult, String> {
    let username = username.trim().to_string();

    if username.is_empty() || password.is_empty() {
        return Err("Por favor, completa todos los campos.".into());
    }

    LOGIN_LIMIT.check(&username)?;

    let user = match database::users(&state.db)
        .find_one(doc! { "username": username.as_str() })
        .await
    {
        Ok(found) => found,
        Err(e) => {
            log_error!("AUTH", "Error al conectar con la base de datos", e.to_string());
            return Err(AppError::Database(e).into());
        }
    };

    // mismo mensaje para usuario inexistente y contraseña incorrecta
    let user =
        user.ok_or_else(|| AppError::Auth("Usuario o contraseña incorrectos.".into()))?;

    let valid = bcrypt::verify(&password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        log_warn!("AUTH", "Intento de login fallido");
        return Err(AppError::Auth("Usuario o contraseña incorrectos.".into()).into());
    }

    LOGIN_LIMIT.clear(&username);

    let token = state
        .sessions
        .lock()
        .map_err(|e| e.to_string())?
        .create(user.username.clone(), user.email.clone());

    log_info!("AUTH", "Login correcto", serde_json::json!({ "username": user.username }));

    Ok(LoginResult {
        user: AuthUserData {
            username: user.username,
            email: user.email,
        },
        session_token: token,
        login_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Logout: elimina la sesión.
#[tauri::command]
pub async fn logout(state: tauri::State<'_, AppState>, session_token: String) -> Result<(), String> {
    state
        .sessions
        .lock()
        .map_err(|e| e.to_string())?
        .destroy(&session_token);

    log_info!("AUTH", "Logout");

    Ok(())
}

/// Comprueba si la sesión sigue viva (auto-login al recargar la ventana).
#[tauri::command]
pub async fn check_session(
    state: tauri::State<'_, AppState>,
    session_token: String,
) -> Result<AuthUserData, String> {
    let session = crate::auth::guard::validate_session(&state, &session_token)?;
    Ok(AuthUserData {
        username: session.username,
        email: session.email,
    })
}
