use chrono::NaiveDateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Wire format of `fecha` / `fecha_registro` in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Referencia hacia `proveedores`, tal como viaja en `codigo_proveedor`.
///
/// The store holds it as a plain string that is usually the hex form of the
/// supplier's ObjectId, but legacy documents carry arbitrary raw keys. The
/// two shapes are told apart once, here, on deserialization; lookups go
/// through [`crate::models::supplier::SupplierDoc::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SupplierRef {
    Id(ObjectId),
    Raw(String),
}

impl SupplierRef {
    pub fn parse(value: &str) -> Self {
        match ObjectId::parse_str(value) {
            Ok(oid) => SupplierRef::Id(oid),
            Err(_) => SupplierRef::Raw(value.to_string()),
        }
    }

    /// Blank references never resolve and never join a supplier group.
    pub fn is_blank(&self) -> bool {
        matches!(self, SupplierRef::Raw(s) if s.trim().is_empty())
    }

    pub fn display(&self) -> String {
        self.clone().into()
    }

    /// Store-side counterpart of [`crate::models::supplier::SupplierDoc::matches`].
    pub fn id_filter(&self) -> mongodb::bson::Document {
        match self {
            SupplierRef::Id(oid) => mongodb::bson::doc! { "_id": *oid },
            SupplierRef::Raw(raw) => mongodb::bson::doc! { "_id": raw.as_str() },
        }
    }
}

impl From<String> for SupplierRef {
    fn from(value: String) -> Self {
        SupplierRef::parse(&value)
    }
}

impl From<SupplierRef> for String {
    fn from(reference: SupplierRef) -> String {
        match reference {
            SupplierRef::Id(oid) => oid.to_hex(),
            SupplierRef::Raw(raw) => raw,
        }
    }
}

/// Documento de la colección `productos`.
///
/// Every data field is optional on read: the store enforces no schema and
/// legacy documents may miss any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "precio_unitario", default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,

    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub ingestion_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(rename = "codigo_proveedor", default, skip_serializing_if = "Option::is_none")]
    pub supplier_ref: Option<SupplierRef>,
}

/// Fila desnormalizada para la grilla de inventario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub name: String,
    pub stock: i64,
    pub unit_price: f64,
    pub ingestion_date: NaiveDateTime,
    pub serial: String,
    pub supplier_ref: String,
    pub supplier_name: String,
    /// Transient banding group; 0 when the reference did not resolve.
    pub supplier_group: i32,
}

/// Raw form fields sent by the registration panel. Price and stock arrive as
/// typed text and are parsed by the validation layer before any store access.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProductPayload {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub serial: String,
    pub supplier: String,
    /// Hex id of the document being edited; `None` creates a new product.
    pub edit_id: Option<String>,
}

/// Form prefill returned when a product is loaded for editing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductForEdit {
    pub edit_id: String,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub serial: String,
    pub supplier_name: String,
}
