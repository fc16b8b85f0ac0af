pub mod auth;
pub mod commands;
pub mod config;
pub mod database;
pub mod errors;
pub mod listing;
pub mod logger;
pub mod mail;
pub mod models;
pub mod rate_limiter;
pub mod validation;

use std::path::Path;
use std::sync::Mutex;

use auth::reset::PasswordResetStore;
use auth::session::SessionStore;
use mail::Mailer;
use tauri::Manager;

/// State global de la aplicación, managed por Tauri.
pub struct AppState {
    pub db: mongodb::Database,
    pub sessions: Mutex<SessionStore>,
    pub resets: Mutex<PasswordResetStore>,
    pub mailer: Box<dyn Mailer>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_handle = app.handle().clone();
            tauri::async_runtime::block_on(async move {
                let app_data_dir = app_handle
                    .path()
                    .app_data_dir()
                    .expect("No se pudo obtener el directorio de datos de la aplicación");

                // .env opcional junto al directorio de trabajo
                config::AppConfig::load_from_file(Path::new(".env"));
                let config = config::init_config();
                let _ = config.validate();

                if let Err(e) = logger::init_global_logger(&app_data_dir, &config.logging) {
                    eprintln!("⚠️  Warning: no se pudo inicializar el logger: {}", e);
                }

                crate::log_info!("APP", "Aplicación iniciando", serde_json::json!({
                    "version": config.version,
                    "environment": config.environment.as_str(),
                }));

                let db = database::connection::init_db()
                    .await
                    .expect("No se pudo configurar la conexión a MongoDB");

                // el ping fallido no es fatal: cada operación reporta su propio error
                if let Err(e) = database::connection::health_check(&db).await {
                    crate::log_warn!(
                        "DATABASE",
                        &format!("MongoDB no responde al ping inicial: {}", e)
                    );
                }

                app_handle.manage(AppState {
                    db,
                    sessions: Mutex::new(SessionStore::new(config.security.session_timeout_mins)),
                    resets: Mutex::new(PasswordResetStore::new(config.security.reset_code_ttl_mins)),
                    mailer: Box::new(mail::DevMailer),
                });
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Auth
            commands::auth_cmd::check_first_run,
            commands::auth_cmd::register_first_user,
            commands::auth_cmd::login,
            commands::auth_cmd::logout,
            commands::auth_cmd::check_session,
            // Recuperación de contraseña
            commands::recovery_cmd::request_password_reset,
            commands::recovery_cmd::verify_reset_code,
            commands::recovery_cmd::complete_password_reset,
            // Inventario
            commands::product_cmd::get_inventory,
            commands::product_cmd::search_inventory,
            commands::product_cmd::save_product,
            commands::product_cmd::load_product_for_edit,
            commands::product_cmd::delete_product,
            commands::product_cmd::resort_inventory,
        ])
        .run(tauri::generate_context!())
        .expect("No se pudo iniciar la aplicación");
}
