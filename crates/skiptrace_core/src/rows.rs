/// One business record as returned by the results endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRow {
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    /// Comma-separated list of phone numbers.
    pub contact_numbers: Option<String>,
    pub search_resources: Option<String>,
}

impl ResultRow {
    fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            self.business_name.as_deref(),
            self.business_address.as_deref(),
            self.contact_numbers.as_deref(),
            self.search_resources.as_deref(),
        ]
    }

    pub fn has_contacts(&self) -> bool {
        self.contact_numbers
            .as_deref()
            .is_some_and(|numbers| !numbers.trim().is_empty())
    }

    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.searchable_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Splits a comma-separated contact field into trimmed, non-empty tokens.
pub fn contact_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Indices of rows matching `query` case-insensitively in any searchable field.
///
/// An empty query selects every row. Order is preserved.
pub fn filter_indices(rows: &[ResultRow], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..rows.len()).collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.matches(&needle))
        .map(|(index, _)| index)
        .collect()
}
