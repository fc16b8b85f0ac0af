use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use super::product::SupplierRef;

/// Documento de la colección `proveedores`.
///
/// `_id` stays untyped: generated suppliers get an ObjectId, but the store
/// also tolerates legacy documents keyed by a raw string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "fecha_registro", default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
}

impl SupplierDoc {
    /// The single comparison site between a product reference and a
    /// supplier identity.
    pub fn matches(&self, reference: &SupplierRef) -> bool {
        match (&self.id, reference) {
            (Some(Bson::ObjectId(oid)), SupplierRef::Id(wanted)) => oid == wanted,
            (Some(Bson::String(key)), SupplierRef::Raw(wanted)) => key == wanted,
            _ => false,
        }
    }

    /// String form of the identity, as stored into `codigo_proveedor`.
    pub fn reference_string(&self) -> Option<String> {
        match &self.id {
            Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
            Some(Bson::String(key)) => Some(key.clone()),
            _ => None,
        }
    }
}
