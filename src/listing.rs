//! Inventory view builder
//!
//! Turns the raw `productos` + `proveedores` collections into the ordered,
//! denormalized rows the grid displays. Grouping, supplier resolution and
//! every sort applied to the grid live here; nothing in this module touches
//! the store.

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::product::{InventoryRow, ProductDoc, SupplierRef, DATE_FORMAT};
use crate::models::supplier::SupplierDoc;

/// Internal sort key for rows whose supplier reference did not resolve;
/// keeps them clustered after every real group.
const UNGROUPED_SORT_KEY: i32 = 999;

/// Resultado de una búsqueda sin filas que mostrar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No se encontraron proveedores con el nombre '{0}'.")]
    SupplierNotFound(String),

    #[error("No se encontraron productos que coincidan con los criterios de búsqueda.")]
    NoResults,
}

/// Criterios del menú de ordenamiento de la grilla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    NameAsc,
    NameDesc,
    StockDesc,
    StockAsc,
    PriceDesc,
    PriceAsc,
    DateDesc,
    DateAsc,
}

/// Full, unfiltered listing: supplier groups in first-seen order, newest
/// first within each group, unresolved suppliers clustered at the end. Row
/// order drives the alternating group banding in the grid.
pub fn build_full_listing(products: &[ProductDoc], suppliers: &[SupplierDoc]) -> Vec<InventoryRow> {
    let groups = assign_supplier_groups(products);

    let mut rows: Vec<InventoryRow> = products
        .iter()
        .map(|product| build_row(product, suppliers, &groups))
        .collect();

    rows.sort_by(|a, b| {
        group_sort_key(a)
            .cmp(&group_sort_key(b))
            .then_with(|| b.ingestion_date.cmp(&a.ingestion_date))
    });

    rows
}

/// Filtered listing. Both criteria blank falls back to the full listing;
/// otherwise rows satisfy every present criterion and come back newest
/// first, without group banding.
pub fn build_filtered_listing(
    products: &[ProductDoc],
    suppliers: &[SupplierDoc],
    name_query: Option<&str>,
    supplier_query: Option<&str>,
) -> Result<Vec<InventoryRow>, SearchError> {
    let name_query = normalize_query(name_query);
    let supplier_query = normalize_query(supplier_query);

    if name_query.is_none() && supplier_query.is_none() {
        return Ok(build_full_listing(products, suppliers));
    }

    // Resolve the supplier criterion first: a query that matches no supplier
    // is reported as such, not as an empty result set.
    let matched_suppliers = match supplier_query {
        Some(query) => {
            let matched: Vec<&SupplierDoc> = suppliers
                .iter()
                .filter(|supplier| contains_ci(&supplier.name, query))
                .collect();

            if matched.is_empty() {
                return Err(SearchError::SupplierNotFound(query.to_string()));
            }

            Some(matched)
        }
        None => None,
    };

    let no_groups = HashMap::new();
    let mut rows: Vec<InventoryRow> = products
        .iter()
        .filter(|product| {
            if let Some(query) = name_query {
                if !contains_ci(product.name.as_deref().unwrap_or(""), query) {
                    return false;
                }
            }

            match &matched_suppliers {
                Some(matched) => match &product.supplier_ref {
                    Some(reference) => matched.iter().any(|supplier| supplier.matches(reference)),
                    None => false,
                },
                None => true,
            }
        })
        .map(|product| build_row(product, suppliers, &no_groups))
        .collect();

    if rows.is_empty() {
        return Err(SearchError::NoResults);
    }

    rows.sort_by(|a, b| b.ingestion_date.cmp(&a.ingestion_date));

    Ok(rows)
}

/// Pure in-memory re-sort of already-built rows.
pub fn resort(rows: &mut [InventoryRow], criterion: SortCriterion) {
    match criterion {
        SortCriterion::NameAsc => {
            rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortCriterion::NameDesc => {
            rows.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
        SortCriterion::StockDesc => rows.sort_by(|a, b| b.stock.cmp(&a.stock)),
        SortCriterion::StockAsc => rows.sort_by(|a, b| a.stock.cmp(&b.stock)),
        SortCriterion::PriceDesc => rows.sort_by(|a, b| b.unit_price.total_cmp(&a.unit_price)),
        SortCriterion::PriceAsc => rows.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price)),
        SortCriterion::DateDesc => rows.sort_by(|a, b| b.ingestion_date.cmp(&a.ingestion_date)),
        SortCriterion::DateAsc => rows.sort_by(|a, b| a.ingestion_date.cmp(&b.ingestion_date)),
    }
}

/// First pass over the unfiltered product set: every distinct non-blank
/// reference gets an increasing group id, first-seen order, starting at 1.
fn assign_supplier_groups(products: &[ProductDoc]) -> HashMap<SupplierRef, i32> {
    let mut groups = HashMap::new();
    let mut counter = 1;

    for product in products {
        if let Some(reference) = &product.supplier_ref {
            if !reference.is_blank() && !groups.contains_key(reference) {
                groups.insert(reference.clone(), counter);
                counter += 1;
            }
        }
    }

    groups
}

fn build_row(
    product: &ProductDoc,
    suppliers: &[SupplierDoc],
    groups: &HashMap<SupplierRef, i32>,
) -> InventoryRow {
    let (supplier_ref, supplier_group, supplier_name) = match &product.supplier_ref {
        Some(reference) if !reference.is_blank() => (
            reference.display(),
            groups.get(reference).copied().unwrap_or(0),
            suppliers
                .iter()
                .find(|supplier| supplier.matches(reference))
                .map(|supplier| supplier.name.clone())
                .unwrap_or_default(),
        ),
        Some(reference) => (reference.display(), 0, String::new()),
        None => (String::new(), 0, String::new()),
    };

    InventoryRow {
        name: product.name.clone().unwrap_or_default(),
        stock: product.stock.unwrap_or(0),
        unit_price: product.unit_price.unwrap_or(0.0),
        ingestion_date: parse_date_or_now(product.ingestion_date.as_deref()),
        serial: product.serial.clone().unwrap_or_default(),
        supplier_ref,
        supplier_name,
        supplier_group,
    }
}

fn group_sort_key(row: &InventoryRow) -> i32 {
    if row.supplier_group == 0 {
        UNGROUPED_SORT_KEY
    } else {
        row.supplier_group
    }
}

/// Absent or unparsable dates fall back to "now"; tolerated, not an error.
fn parse_date_or_now(raw: Option<&str>) -> NaiveDateTime {
    raw.and_then(|value| {
        NaiveDateTime::parse_from_str(value, DATE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    })
    .unwrap_or_else(|| Local::now().naive_local())
}

fn normalize_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::Bson;

    fn product(name: &str, serial: &str, date: &str, supplier_ref: Option<&str>) -> ProductDoc {
        ProductDoc {
            id: None,
            name: Some(name.to_string()),
            unit_price: Some(10.0),
            stock: Some(1),
            ingestion_date: Some(date.to_string()),
            serial: Some(serial.to_string()),
            supplier_ref: supplier_ref.map(SupplierRef::parse),
        }
    }

    fn supplier(id: Bson, name: &str) -> SupplierDoc {
        SupplierDoc {
            id: Some(id),
            name: name.to_string(),
            registered_at: Some("2024-01-01 08:00:00".to_string()),
        }
    }

    #[test]
    fn test_groups_assigned_in_first_seen_order() {
        let products = vec![
            product("Filtro", "F1", "2024-05-01 10:00:00", Some("S1")),
            product("Bujía", "B1", "2024-05-02 10:00:00", Some("S2")),
            product("Correa", "C1", "2024-05-03 10:00:00", Some("S1")),
        ];

        let rows = build_full_listing(&products, &[]);

        let filtro = rows.iter().find(|r| r.serial == "F1").unwrap();
        let bujia = rows.iter().find(|r| r.serial == "B1").unwrap();
        let correa = rows.iter().find(|r| r.serial == "C1").unwrap();

        assert_eq!(filtro.supplier_group, 1);
        assert_eq!(correa.supplier_group, 1);
        assert_eq!(bujia.supplier_group, 2);
    }

    #[test]
    fn test_full_listing_order_group_then_date_desc() {
        let products = vec![
            product("A", "A1", "2024-05-01 10:00:00", Some("S1")),
            product("B", "B1", "2024-05-03 10:00:00", Some("S2")),
            product("C", "C1", "2024-05-02 10:00:00", Some("S1")),
            product("D", "D1", "2024-05-04 10:00:00", Some("S2")),
        ];

        let rows = build_full_listing(&products, &[]);

        let serials: Vec<&str> = rows.iter().map(|r| r.serial.as_str()).collect();
        // grupo 1 (C más reciente que A), luego grupo 2 (D más reciente que B)
        assert_eq!(serials, vec!["C1", "A1", "D1", "B1"]);

        for pair in rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(group_sort_key(a) <= group_sort_key(b));
            if a.supplier_group == b.supplier_group {
                assert!(a.ingestion_date >= b.ingestion_date);
            }
        }
    }

    #[test]
    fn test_unresolved_suppliers_cluster_last() {
        let products = vec![
            product("Suelto", "X1", "2024-05-09 10:00:00", None),
            product("Con grupo", "G1", "2024-05-01 10:00:00", Some("S1")),
            product("Blanco", "X2", "2024-05-08 10:00:00", Some("")),
        ];

        let rows = build_full_listing(&products, &[]);

        assert_eq!(rows[0].serial, "G1");
        assert_eq!(rows[0].supplier_group, 1);
        // los sin grupo quedan al final, entre ellos por fecha descendente
        assert_eq!(rows[1].serial, "X1");
        assert_eq!(rows[2].serial, "X2");
        assert_eq!(rows[1].supplier_group, 0);
        assert_eq!(rows[2].supplier_group, 0);
    }

    #[test]
    fn test_blank_reference_consumes_no_group_id() {
        let products = vec![
            product("Blanco", "X1", "2024-05-01 10:00:00", Some("")),
            product("Real", "R1", "2024-05-02 10:00:00", Some("S1")),
        ];

        let rows = build_full_listing(&products, &[]);
        let real = rows.iter().find(|r| r.serial == "R1").unwrap();
        assert_eq!(real.supplier_group, 1);
    }

    #[test]
    fn test_supplier_name_resolution_and_fallback() {
        let oid = ObjectId::new();
        let suppliers = vec![
            supplier(Bson::ObjectId(oid), "Repuestos García"),
            supplier(Bson::String("ACME-01".to_string()), "ACME"),
        ];
        let products = vec![
            product("P1", "P1", "2024-05-01 10:00:00", Some(&oid.to_hex())),
            product("P2", "P2", "2024-05-02 10:00:00", Some("ACME-01")),
            product("P3", "P3", "2024-05-03 10:00:00", Some("desconocido")),
        ];

        let rows = build_full_listing(&products, &suppliers);

        let by_serial = |s: &str| rows.iter().find(|r| r.serial == s).unwrap();
        assert_eq!(by_serial("P1").supplier_name, "Repuestos García");
        assert_eq!(by_serial("P2").supplier_name, "ACME");
        // referencia que no resuelve: nombre vacío, no es un error
        assert_eq!(by_serial("P3").supplier_name, "");
        assert_eq!(by_serial("P3").supplier_group, 3);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let bare = ProductDoc {
            id: None,
            name: None,
            unit_price: None,
            stock: None,
            ingestion_date: Some("esto no es una fecha".to_string()),
            serial: None,
            supplier_ref: None,
        };

        let rows = build_full_listing(&[bare], &[]);
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].stock, 0);
        assert_eq!(rows[0].unit_price, 0.0);
        // fecha inválida cae en "ahora"
        assert!(rows[0].ingestion_date <= Local::now().naive_local());
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let products = vec![
            product("Brake Pad", "B1", "2024-05-01 10:00:00", None),
            product("BRAKE Fluid", "B2", "2024-05-02 10:00:00", None),
            product("Clutch", "C1", "2024-05-03 10:00:00", None),
        ];

        let rows = build_filtered_listing(&products, &[], Some("Brake"), None).unwrap();

        let serials: Vec<&str> = rows.iter().map(|r| r.serial.as_str()).collect();
        assert_eq!(serials, vec!["B2", "B1"]);
    }

    #[test]
    fn test_filtered_sorts_by_date_desc_without_banding() {
        let products = vec![
            product("Brake Pad", "B1", "2024-05-01 10:00:00", Some("S2")),
            product("Brake Fluid", "B2", "2024-05-02 10:00:00", Some("S1")),
        ];

        let rows = build_filtered_listing(&products, &[], Some("brake"), None).unwrap();

        assert_eq!(rows[0].serial, "B2");
        assert!(rows.iter().all(|r| r.supplier_group == 0));
    }

    #[test]
    fn test_supplier_query_without_match_is_distinct_signal() {
        let suppliers = vec![supplier(Bson::ObjectId(ObjectId::new()), "Repuestos García")];
        let products = vec![product("Filtro", "F1", "2024-05-01 10:00:00", None)];

        let err = build_filtered_listing(&products, &suppliers, None, Some("inexistente"))
            .unwrap_err();
        assert_eq!(err, SearchError::SupplierNotFound("inexistente".to_string()));
    }

    #[test]
    fn test_combined_filters_are_logical_and() {
        let oid = ObjectId::new();
        let suppliers = vec![
            supplier(Bson::ObjectId(oid), "Repuestos García"),
            supplier(Bson::String("ACME-01".to_string()), "ACME"),
        ];
        let products = vec![
            product("Brake Pad", "B1", "2024-05-01 10:00:00", Some(&oid.to_hex())),
            product("Brake Fluid", "B2", "2024-05-02 10:00:00", Some("ACME-01")),
            product("Clutch", "C1", "2024-05-03 10:00:00", Some(&oid.to_hex())),
        ];

        let rows =
            build_filtered_listing(&products, &suppliers, Some("brake"), Some("garcía")).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].serial, "B1");
    }

    #[test]
    fn test_no_results_is_distinct_from_supplier_not_found() {
        let suppliers = vec![supplier(Bson::ObjectId(ObjectId::new()), "Repuestos García")];
        let products = vec![product("Clutch", "C1", "2024-05-01 10:00:00", None)];

        let err = build_filtered_listing(&products, &suppliers, Some("brake"), Some("garcía"))
            .unwrap_err();
        assert_eq!(err, SearchError::NoResults);
    }

    #[test]
    fn test_blank_queries_fall_back_to_full_listing() {
        let products = vec![
            product("A", "A1", "2024-05-01 10:00:00", Some("S1")),
            product("B", "B1", "2024-05-02 10:00:00", Some("S2")),
        ];

        let filtered = build_filtered_listing(&products, &[], Some("   "), None).unwrap();
        let full = build_full_listing(&products, &[]);
        assert_eq!(filtered, full);
        // la variante sin filtros conserva el agrupamiento
        assert_eq!(filtered[0].supplier_group, 1);
    }

    #[test]
    fn test_resort_criteria() {
        let products = vec![
            product("zeta", "Z1", "2024-05-01 10:00:00", None),
            product("Alfa", "A1", "2024-05-03 10:00:00", None),
            product("media", "M1", "2024-05-02 10:00:00", None),
        ];
        let mut rows = build_full_listing(&products, &[]);

        resort(&mut rows, SortCriterion::NameAsc);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alfa", "media", "zeta"]);

        resort(&mut rows, SortCriterion::NameDesc);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "media", "Alfa"]);

        resort(&mut rows, SortCriterion::DateAsc);
        let serials: Vec<&str> = rows.iter().map(|r| r.serial.as_str()).collect();
        assert_eq!(serials, vec!["Z1", "M1", "A1"]);
    }

    #[test]
    fn test_resort_price_and_stock() {
        let mut rows = build_full_listing(
            &[
                product("A", "A1", "2024-05-01 10:00:00", None),
                product("B", "B1", "2024-05-02 10:00:00", None),
            ],
            &[],
        );
        // orden inicial: B1 (más reciente), A1
        rows[0].unit_price = 99.5;
        rows[0].stock = 3;
        rows[1].unit_price = 12.0;
        rows[1].stock = 40;

        resort(&mut rows, SortCriterion::PriceAsc);
        assert_eq!(rows[0].serial, "A1");

        resort(&mut rows, SortCriterion::PriceDesc);
        assert_eq!(rows[0].serial, "B1");

        resort(&mut rows, SortCriterion::StockDesc);
        assert_eq!(rows[0].serial, "A1");

        resort(&mut rows, SortCriterion::StockAsc);
        assert_eq!(rows[0].serial, "B1");
    }

    #[test]
    fn test_saved_product_round_trips_into_listing() {
        // misma forma de documento que escribe save_product
        let saved = ProductDoc {
            id: None,
            name: Some("Pastilla de freno".to_string()),
            unit_price: Some(149.90),
            stock: Some(12),
            ingestion_date: Some("2024-06-01 09:30:00".to_string()),
            serial: Some("BRK-001".to_string()),
            supplier_ref: Some(SupplierRef::parse("ACME-01")),
        };

        let rows = build_full_listing(&[saved], &[]);

        assert_eq!(rows[0].name, "Pastilla de freno");
        assert_eq!(rows[0].stock, 12);
        assert_eq!(rows[0].unit_price, 149.90);
        assert_eq!(rows[0].serial, "BRK-001");
    }
}
