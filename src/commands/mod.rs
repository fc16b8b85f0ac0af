pub mod auth_cmd;
pub mod product_cmd;
pub mod recovery_cmd;
