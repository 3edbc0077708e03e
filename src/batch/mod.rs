pub mod load;

/// In-memory row batch assembled from one or more part files: an ordered
/// header plus rows of optional text cells. `None` is a real NULL, distinct
/// from an empty string, and is what an empty CSV cell becomes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A batch with no rows means there is nothing to import, even if a
    /// header was present.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Strip warehouse namespace prefixes from the header: keep only the
    /// final dot-delimited segment, so `value.first_name` becomes
    /// `first_name` and `meta.id` becomes `id`. Bare names pass through.
    pub fn strip_column_prefixes(&mut self) {
        for col in &mut self.columns {
            if let Some(dot) = col.rfind('.') {
                *col = col[dot + 1..].to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_with_columns(columns: &[&str]) -> RowBatch {
        RowBatch {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn prefixes_are_stripped_to_the_last_segment() {
        let mut batch =
            batch_with_columns(&["value.first_name", "meta.id", "key.account", "plain"]);
        batch.strip_column_prefixes();
        assert_eq!(batch.columns, vec!["first_name", "id", "account", "plain"]);
    }

    #[test]
    fn multi_dot_names_keep_only_the_tail() {
        let mut batch = batch_with_columns(&["value.meta.created_at"]);
        batch.strip_column_prefixes();
        assert_eq!(batch.columns, vec!["created_at"]);
    }

    #[test]
    fn empty_batch_has_no_id_column() {
        let batch = RowBatch::empty();
        assert!(batch.is_empty());
        assert!(!batch.has_column("id"));
    }

    #[test]
    fn null_cells_are_not_empty_strings() {
        let batch = RowBatch {
            columns: vec!["id".into(), "email".into()],
            rows: vec![vec![Some("1".into()), None]],
        };
        assert_ne!(batch.rows[0][1], Some(String::new()));
        assert_eq!(batch.rows[0][1], None);
    }
}
