//! Database schema definition

use crate::error::StoreError;

/// Default table holding one fingerprint record per monitored URI
pub const DEFAULT_TABLE: &str = "fingerprints";

/// Whether `name` can be interpolated into SQL as a table name
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// SQL schema for the fingerprint table
///
/// `hash` is nullable: a record without a hash reads back as an empty hash.
pub fn schema(table: &str) -> Result<String, StoreError> {
    if !is_valid_table_name(table) {
        return Err(StoreError::InvalidTable(table.to_string()));
    }

    Ok(format!(
        r#"
-- Latest fingerprint per monitored URI
CREATE TABLE IF NOT EXISTS {table} (
    uri TEXT PRIMARY KEY,
    hash TEXT,
    updated_at INTEGER NOT NULL
);
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert!(is_valid_table_name("fingerprints"));
        assert!(is_valid_table_name("_page_hashes2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2hashes"));
        assert!(!is_valid_table_name("hashes; DROP TABLE x"));
        assert!(!is_valid_table_name("page-hashes"));
    }

    #[test]
    fn test_schema_rejects_bad_table() {
        assert!(matches!(schema("a b"), Err(StoreError::InvalidTable(_))));
        assert!(schema(DEFAULT_TABLE).unwrap().contains("CREATE TABLE IF NOT EXISTS fingerprints"));
    }
}
