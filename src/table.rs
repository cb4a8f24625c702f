use indexmap::{IndexMap, IndexSet};

/// One harvested row: column label to cell value. Per-row key order is
/// irrelevant; the owning [`RecordSet`] holds the authoritative column order.
pub type Record = IndexMap<String, String>;

/// A flat set of records with an insertion-ordered column list. Columns
/// absent from a given row are missing values, not empty strings.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    columns: IndexSet<String>,
    rows: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// First column whose label contains `fragment`.
    pub fn find_column(&self, fragment: &str) -> Option<String> {
        self.columns.iter().find(|name| name.contains(fragment)).cloned()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Append a row, extending the column list with any labels not seen yet.
    pub fn push(&mut self, record: Record) {
        for column in record.keys() {
            if !self.columns.contains(column) {
                self.columns.insert(column.clone());
            }
        }
        self.rows.push(record);
    }

    /// Concatenate another set onto this one. The column list becomes the
    /// insertion-ordered union of both sides.
    pub fn append(&mut self, other: RecordSet) {
        for column in other.columns {
            if !self.columns.contains(&column) {
                self.columns.insert(column);
            }
        }
        self.rows.extend(other.rows);
    }

    /// Remove a column, returning its per-row values (empty where absent).
    pub fn take_column(&mut self, name: &str) -> Option<Vec<String>> {
        if !self.columns.shift_remove(name) {
            return None;
        }
        Some(
            self.rows
                .iter_mut()
                .map(|row| row.shift_remove(name).unwrap_or_default())
                .collect(),
        )
    }

    /// Per-row values of a column (empty where absent).
    pub fn column_values(&self, name: &str) -> Option<Vec<String>> {
        if !self.columns.contains(name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(name).cloned().unwrap_or_default())
                .collect(),
        )
    }

    /// Insert a column at `index` with one value per row, replacing any
    /// column already carrying the same label.
    pub fn insert_column_at(&mut self, index: usize, name: &str, values: Vec<String>) {
        self.columns.shift_remove(name);
        self.columns.shift_insert(index.min(self.columns.len()), name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(name.to_string(), value);
        }
    }

    pub fn sort_rows_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Record, &Record) -> std::cmp::Ordering,
    {
        self.rows.sort_by(|a, b| compare(a, b));
    }
}
