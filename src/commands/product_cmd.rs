use chrono::Local;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use crate::database;
use crate::errors::AppError;
use crate::listing::{self, SortCriterion};
use crate::models::product::{
    InventoryRow, ProductDoc, ProductForEdit, SaveProductPayload, SupplierRef, DATE_FORMAT,
};
use crate::models::supplier::SupplierDoc;
use crate::validation::{self, placeholder, SaveProductInput};
use crate::AppState;
use crate::{log_error, log_info};

/// Listado completo del inventario, agrupado por proveedor.
#[tauri::command]
pub async fn get_inventory(
    state: tauri::State<'_, AppState>,
    session_token: String,
) -> Result<Vec<InventoryRow>, String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    let (products, suppliers) = load_collections(&state).await?;

    Ok(listing::build_full_listing(&products, &suppliers))
}

/// Búsqueda por nombre de autoparte y/o nombre de proveedor.
#[tauri::command]
pub async fn search_inventory(
    state: tauri::State<'_, AppState>,
    session_token: String,
    name: Option<String>,
    supplier: Option<String>,
) -> Result<Vec<InventoryRow>, String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    // campos que siguen mostrando su placeholder cuentan como vacíos
    let name = name.filter(|v| !validation::is_unfilled(v, placeholder::PRODUCT_NAME));
    let supplier = supplier.filter(|v| !validation::is_unfilled(v, placeholder::SUPPLIER));

    let (products, suppliers) = load_collections(&state).await?;

    listing::build_filtered_listing(&products, &suppliers, name.as_deref(), supplier.as_deref())
        .map_err(|e| e.to_string())
}

/// Guarda una autoparte: alta nueva o actualización del producto en edición.
/// Toda la validación ocurre antes de tocar la base de datos.
#[tauri::command]
pub async fn save_product(
    state: tauri::State<'_, AppState>,
    session_token: String,
    payload: SaveProductPayload,
) -> Result<(), String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    let (price, stock) = validation::validate_save_product(&SaveProductInput {
        name: &payload.name,
        price_raw: &payload.price,
        stock_raw: &payload.stock,
        serial: &payload.serial,
        supplier_name: &payload.supplier,
    })?;

    let supplier_ref = resolve_or_create_supplier(&state, payload.supplier.trim()).await?;

    let products = database::products(&state.db);

    match &payload.edit_id {
        Some(edit_id) => {
            let oid = ObjectId::parse_str(edit_id).map_err(|_| {
                AppError::Validation("El producto en edición ya no es válido.".into())
            })?;

            let update = doc! { "$set": {
                "nombre": payload.name.trim(),
                "precio_unitario": price,
                "stock": stock,
                "serial": payload.serial.trim(),
                "codigo_proveedor": supplier_ref.as_str(),
            }};

            let result = products
                .update_one(doc! { "_id": oid }, update)
                .await
                .map_err(AppError::Database)?;

            if result.modified_count == 0 {
                return Err(
                    "No se pudo actualizar el producto. Por favor, intente nuevamente.".into(),
                );
            }

            log_info!("INVENTORY", "Producto actualizado", serde_json::json!({
                "serial": payload.serial.trim(),
            }));
        }
        None => {
            products
                .insert_one(ProductDoc {
                    id: None,
                    name: Some(payload.name.trim().to_string()),
                    unit_price: Some(price),
                    stock: Some(stock),
                    ingestion_date: Some(Local::now().format(DATE_FORMAT).to_string()),
                    serial: Some(payload.serial.trim().to_string()),
                    supplier_ref: Some(SupplierRef::parse(&supplier_ref)),
                })
                .await
                .map_err(AppError::Database)?;

            log_info!("INVENTORY", "Producto guardado", serde_json::json!({
                "serial": payload.serial.trim(),
            }));
        }
    }

    Ok(())
}

/// Carga un producto por serial para editarlo en el formulario.
#[tauri::command]
pub async fn load_product_for_edit(
    state: tauri::State<'_, AppState>,
    session_token: String,
    serial: String,
) -> Result<ProductForEdit, String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    let product = database::products(&state.db)
        .find_one(doc! { "serial": serial.trim() })
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| {
            AppError::NotFound("No se pudo encontrar el producto en la base de datos.".into())
        })?;

    let edit_id = product
        .id
        .map(|oid| oid.to_hex())
        .ok_or_else(|| AppError::Internal("El producto no tiene identificador.".into()))?;

    let supplier_name = match &product.supplier_ref {
        Some(reference) if !reference.is_blank() => database::suppliers(&state.db)
            .find_one(reference.id_filter())
            .await
            .map_err(AppError::Database)?
            .map(|supplier| supplier.name)
            .unwrap_or_default(),
        _ => String::new(),
    };

    Ok(ProductForEdit {
        edit_id,
        name: product.name.unwrap_or_default(),
        price: product
            .unit_price
            .map(|p| p.to_string())
            .unwrap_or_default(),
        stock: product.stock.map(|s| s.to_string()).unwrap_or_default(),
        serial: product.serial.unwrap_or_default(),
        supplier_name,
    })
}

/// Elimina una autoparte por serial, exactamente una vez.
#[tauri::command]
pub async fn delete_product(
    state: tauri::State<'_, AppState>,
    session_token: String,
    serial: String,
) -> Result<(), String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    let result = database::products(&state.db)
        .delete_one(doc! { "serial": serial.trim() })
        .await
        .map_err(AppError::Database)?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound(
            "No se pudo eliminar el producto. Es posible que ya haya sido eliminado.".into(),
        )
        .into());
    }

    log_info!("INVENTORY", "Producto eliminado", serde_json::json!({
        "serial": serial.trim(),
    }));

    Ok(())
}

/// Reordena en memoria las filas ya mostradas; no toca la base de datos.
#[tauri::command]
pub async fn resort_inventory(
    state: tauri::State<'_, AppState>,
    session_token: String,
    mut rows: Vec<InventoryRow>,
    criterion: SortCriterion,
) -> Result<Vec<InventoryRow>, String> {
    crate::auth::guard::validate_session(&state, &session_token)?;

    listing::resort(&mut rows, criterion);

    Ok(rows)
}

/// Lee ambas colecciones completas; el armado de filas es trabajo de `listing`.
async fn load_collections(
    state: &tauri::State<'_, AppState>,
) -> Result<(Vec<ProductDoc>, Vec<SupplierDoc>), String> {
    let products = match all_products(state).await {
        Ok(docs) => docs,
        Err(e) => {
            log_error!("INVENTORY", "Error al cargar los productos", e.to_string());
            return Err(AppError::Database(e).into());
        }
    };

    let suppliers = match all_suppliers(state).await {
        Ok(docs) => docs,
        Err(e) => {
            log_error!("INVENTORY", "Error al cargar los proveedores", e.to_string());
            return Err(AppError::Database(e).into());
        }
    };

    Ok((products, suppliers))
}

async fn all_products(
    state: &tauri::State<'_, AppState>,
) -> Result<Vec<ProductDoc>, mongodb::error::Error> {
    database::products(&state.db)
        .find(doc! {})
        .await?
        .try_collect()
        .await
}

async fn all_suppliers(
    state: &tauri::State<'_, AppState>,
) -> Result<Vec<SupplierDoc>, mongodb::error::Error> {
    database::suppliers(&state.db)
        .find(doc! {})
        .await?
        .try_collect()
        .await
}

/// Get-or-create del proveedor por nombre exacto. Devuelve el valor que se
/// guarda en `codigo_proveedor`. La carrera con otro escritor concurrente
/// puede duplicar nombres; limitación aceptada.
async fn resolve_or_create_supplier(
    state: &tauri::State<'_, AppState>,
    supplier_name: &str,
) -> Result<String, String> {
    let suppliers = database::suppliers(&state.db);
    let filter = doc! { "nombre": supplier_name };

    let existing = suppliers
        .find_one(filter.clone())
        .await
        .map_err(AppError::Database)?;

    let supplier = match existing {
        Some(supplier) => supplier,
        None => {
            suppliers
                .insert_one(SupplierDoc {
                    id: None,
                    name: supplier_name.to_string(),
                    registered_at: Some(Local::now().format(DATE_FORMAT).to_string()),
                })
                .await
                .map_err(AppError::Database)?;

            // re-lectura para obtener el _id generado
            suppliers
                .find_one(filter)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::Internal("No se pudo registrar el proveedor.".into()))?
        }
    };

    supplier
        .reference_string()
        .ok_or_else(|| AppError::Internal("El proveedor no tiene identificador.".into()).into())
}
