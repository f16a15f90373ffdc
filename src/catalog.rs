use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::PriceEntry;

/// Loads the full price list from the catalog file. The file is re-read per
/// request; the catalog is small and edits take effect without a restart.
pub fn load(path: &str) -> Result<Vec<PriceEntry>> {
    let raw = std::fs::read_to_string(Path::new(path)).map_err(|e| {
        AppError::Internal(format!("failed to read price catalog {}: {}", path, e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::Internal(format!("failed to parse price catalog {}: {}", path, e))
    })
}

/// Keyed lookup by item id over the catalog file.
pub fn find(path: &str, item_id: i64) -> Result<PriceEntry> {
    load(path)?
        .into_iter()
        .find(|entry| entry.id == item_id)
        .ok_or_else(|| AppError::NotFound(format!("No product with id {}", item_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn load_returns_all_entries() {
        let file = catalog_file(r#"[{"id":1,"price":0.99},{"id":2,"price":4.99}]"#);
        let entries = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], PriceEntry { id: 1, price: 0.99 });
    }

    #[test]
    fn find_returns_exactly_the_requested_entry() {
        let file = catalog_file(r#"[{"id":1,"price":0.99},{"id":2,"price":4.99}]"#);
        let entry = find(file.path().to_str().unwrap(), 2).unwrap();
        assert_eq!(entry, PriceEntry { id: 2, price: 4.99 });
    }

    #[test]
    fn find_misses_with_not_found() {
        let file = catalog_file(r#"[{"id":1,"price":0.99}]"#);
        match find(file.path().to_str().unwrap(), 42) {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn unreadable_or_malformed_catalog_is_internal() {
        match load("/nonexistent/prices.json") {
            Err(AppError::Internal(_)) => {}
            other => panic!("expected Internal, got {:?}", other),
        }
        let file = catalog_file("not json at all");
        match load(file.path().to_str().unwrap()) {
            Err(AppError::Internal(_)) => {}
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
