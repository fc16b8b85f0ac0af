pub mod connection;

use mongodb::{Collection, Database};

use crate::models::product::ProductDoc;
use crate::models::supplier::SupplierDoc;
use crate::models::user::DbUser;

/// Collection names as they exist in the deployed database.
pub const PRODUCTS: &str = "productos";
pub const SUPPLIERS: &str = "proveedores";
pub const USERS: &str = "users";

pub fn products(db: &Database) -> Collection<ProductDoc> {
    db.collection(PRODUCTS)
}

pub fn suppliers(db: &Database) -> Collection<SupplierDoc> {
    db.collection(SUPPLIERS)
}

pub fn users(db: &Database) -> Collection<DbUser> {
    db.collection(USERS)
}
