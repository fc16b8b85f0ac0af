use super::session::SessionData;
use crate::AppState;

/// Helper: valida la sesión desde AppState y devuelve un clone de SessionData.
pub fn validate_session(state: &AppState, token: &str) -> Result<SessionData, String> {
    let store = state.sessions.lock().map_err(|e| e.to_string())?;
    store.validate(token).cloned()
}
