//! Input validation module
//!
//! Centralized validation for the registration and search forms. The frontend
//! shows sentinel placeholder texts inside empty fields; a field whose value
//! still equals its placeholder counts as unfilled, so every check here runs
//! before any store access.

/// Validation result type
pub type ValidationResult = Result<(), String>;

/// Placeholder sentinels shown by the frontend inside empty fields.
pub mod placeholder {
    pub const PRODUCT_NAME: &str = "Nombre de Autoparte";
    pub const PRICE: &str = "Precio";
    pub const STOCK: &str = "Stock";
    pub const SUPPLIER: &str = "Proveedor";
    pub const SERIAL: &str = "Código";
}

/// A field is unfilled when blank or still holding its placeholder text.
pub fn is_unfilled(value: &str, placeholder: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == placeholder
}

fn require_filled(value: &str, placeholder: &str) -> ValidationResult {
    if is_unfilled(value, placeholder) {
        return Err("Por favor, complete todos los campos antes de guardar.".into());
    }
    Ok(())
}

/// Parse a unit price typed into the form.
/// Must be a finite, non-negative decimal.
pub fn parse_price(raw: &str) -> Result<f64, String> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| "El precio debe ser un valor numérico.".to_string())?;

    if !price.is_finite() || price < 0.0 {
        return Err("El precio no puede ser negativo.".into());
    }

    Ok(price)
}

/// Parse a stock quantity typed into the form.
/// Must be a non-negative integer.
pub fn parse_stock(raw: &str) -> Result<i64, String> {
    let stock: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "El stock debe ser un valor numérico entero.".to_string())?;

    if stock < 0 {
        return Err("El stock no puede ser negativo.".into());
    }

    Ok(stock)
}

/// Validate a product name
pub fn validate_product_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();

    if trimmed.len() > 200 {
        return Err("El nombre del producto es demasiado largo (máx. 200 caracteres).".into());
    }

    Ok(())
}

/// Validate a serial
/// - Allowed: alphanumeric plus -_.
pub fn validate_serial(serial: &str) -> ValidationResult {
    let trimmed = serial.trim();

    if trimmed.len() > 50 {
        return Err("El serial es demasiado largo (máx. 50 caracteres).".into());
    }

    if !trimmed.chars().all(|c| c.is_alphanumeric() || "-_.".contains(c)) {
        return Err("El serial solo puede contener letras, números y los caracteres -_.".into());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err("Por favor, introduce un correo electrónico válido.".into());
    }

    if trimmed.len() > 254 {
        return Err("El correo es demasiado largo (máx. 254 caracteres).".into());
    }

    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 {
        return Err("El formato del correo no es válido.".into());
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        return Err("El formato del correo no es válido.".into());
    }

    if !domain.contains('.') {
        return Err("El dominio del correo no es válido.".into());
    }

    Ok(())
}

/// Validate password strength
/// - Must contain: uppercase, lowercase, number
pub fn validate_password(password: &str, min_length: usize) -> ValidationResult {
    if password.is_empty() {
        return Err("Por favor, introduce una nueva contraseña válida.".into());
    }

    if password.len() < min_length {
        return Err(format!("La contraseña debe tener al menos {} caracteres.", min_length));
    }

    if password.len() > 128 {
        return Err("La contraseña es demasiado larga (máx. 128 caracteres).".into());
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());

    if !has_upper || !has_lower || !has_digit {
        return Err("La contraseña debe contener mayúsculas, minúsculas y números.".into());
    }

    Ok(())
}

/// Raw form fields of the product registration panel.
pub struct SaveProductInput<'a> {
    pub name: &'a str,
    pub price_raw: &'a str,
    pub stock_raw: &'a str,
    pub serial: &'a str,
    pub supplier_name: &'a str,
}

/// Combined validation for saving a product. Returns the parsed numeric
/// fields so callers never re-parse.
pub fn validate_save_product(input: &SaveProductInput<'_>) -> Result<(f64, i64), String> {
    require_filled(input.name, placeholder::PRODUCT_NAME)?;
    require_filled(input.price_raw, placeholder::PRICE)?;
    require_filled(input.stock_raw, placeholder::STOCK)?;
    require_filled(input.supplier_name, placeholder::SUPPLIER)?;
    require_filled(input.serial, placeholder::SERIAL)?;

    let price = parse_price(input.price_raw)?;
    let stock = parse_stock(input.stock_raw)?;

    validate_product_name(input.name)?;
    validate_serial(input.serial)?;

    Ok((price, stock))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        name: &'a str,
        price: &'a str,
        stock: &'a str,
        serial: &'a str,
        supplier: &'a str,
    ) -> SaveProductInput<'a> {
        SaveProductInput {
            name,
            price_raw: price,
            stock_raw: stock,
            serial,
            supplier_name: supplier,
        }
    }

    #[test]
    fn test_placeholder_counts_as_unfilled() {
        assert!(is_unfilled("Proveedor", placeholder::SUPPLIER));
        assert!(is_unfilled("   ", placeholder::SUPPLIER));
        assert!(!is_unfilled("Repuestos García", placeholder::SUPPLIER));
    }

    #[test]
    fn test_save_rejects_placeholder_fields() {
        let result = validate_save_product(&input(
            "Nombre de Autoparte",
            "100",
            "5",
            "BRK-001",
            "García",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_rejects_non_numeric_price() {
        let result = validate_save_product(&input("Pastilla de freno", "abc", "5", "BRK-001", "García"));
        assert!(result.unwrap_err().contains("numérico"));
    }

    #[test]
    fn test_save_rejects_negative_values() {
        assert!(parse_price("-1").is_err());
        assert!(parse_stock("-3").is_err());
        assert!(parse_stock("2.5").is_err());
    }

    #[test]
    fn test_save_accepts_valid_input() {
        let (price, stock) =
            validate_save_product(&input("Pastilla de freno", "149.90", "12", "BRK-001", "García"))
                .unwrap();
        assert_eq!(price, 149.90);
        assert_eq!(stock, 12);
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("jorge@taller.com").is_ok());
        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("dos@@arrobas.com").is_err());
        assert!(validate_email("a@sinpunto").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Abc12345", 8).is_ok());
        assert!(validate_password("corta1A", 8).is_err());
        assert!(validate_password("sinmayusculas1", 8).is_err());
        assert!(validate_password("SINMINUSCULAS1", 8).is_err());
        assert!(validate_password("SinNumeros", 8).is_err());
    }
}
