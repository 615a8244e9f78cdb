use crate::error::ModelError;
use ahash::{AHashMap, AHashSet};
use ndarray::{Array1, Array2, ArrayView1, Axis, s};

/// A dense numeric table with named columns.
///
/// Rows are samples and columns are features. One-hot encoded categorical
/// features are ordinary 0/1 columns named `<prefix>_<level>`.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shopper_intent::dataset::Table;
///
/// let table = Table::new(
///     vec!["PageValues".to_string(), "Month_Nov".to_string()],
///     array![[0.0, 1.0], [12.5, 0.0]],
/// )
/// .unwrap();
/// assert_eq!(table.column_index("Month_Nov"), Some(1));
/// assert_eq!(table.column("PageValues").unwrap()[1], 12.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    column_names: Vec<String>,
    values: Array2<f64>,
    index: AHashMap<String, usize>,
}

impl Table {
    /// Creates a table from column names and a `(n_rows, n_columns)` matrix.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the number of names does not match the
    ///   number of matrix columns, or a column name is repeated
    pub fn new(column_names: Vec<String>, values: Array2<f64>) -> Result<Self, ModelError> {
        if column_names.len() != values.ncols() {
            return Err(ModelError::InputValidationError(format!(
                "Number of column names does not match data, names: {}, columns: {}",
                column_names.len(),
                values.ncols()
            )));
        }

        let mut index = AHashMap::with_capacity(column_names.len());
        for (i, name) in column_names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ModelError::InputValidationError(format!(
                    "Duplicate column name '{}'",
                    name
                )));
            }
        }

        Ok(Table {
            column_names,
            values,
            index,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|i| self.values.column(i))
    }

    /// Returns a new table holding exactly `names`, in that order.
    ///
    /// # Errors
    ///
    /// - `ModelError::SchemaMismatch` - If any requested column is absent
    pub fn select_columns(&self, names: &[String]) -> Result<Table, ModelError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    ModelError::SchemaMismatch(format!("Column '{}' is missing from the table", name))
                })
            })
            .collect::<Result<Vec<usize>, ModelError>>()?;

        Table::new(names.to_vec(), self.values.select(Axis(1), &indices))
    }

    /// Keeps the columns that also appear in `names`, preserving this table's column order.
    ///
    /// Names that do not exist in the table are ignored.
    pub fn select_intersection(&self, names: &[String]) -> Table {
        let wanted: AHashSet<&str> = names.iter().map(String::as_str).collect();
        let indices: Vec<usize> = self
            .column_names
            .iter()
            .enumerate()
            .filter(|(_, name)| wanted.contains(name.as_str()))
            .map(|(i, _)| i)
            .collect();
        let kept_names: Vec<String> = indices
            .iter()
            .map(|&i| self.column_names[i].clone())
            .collect();
        let index = kept_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        // names are a subset of already unique columns
        Table {
            column_names: kept_names,
            values: self.values.select(Axis(1), &indices),
            index,
        }
    }

    /// Returns the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            column_names: self.column_names.clone(),
            values: self.values.select(Axis(0), indices),
            index: self.index.clone(),
        }
    }

    /// Copies the matrix with a constant-1 bias column appended after the last feature.
    pub fn with_bias_column(&self) -> Array2<f64> {
        let (n_rows, n_cols) = self.values.dim();
        let mut augmented = Array2::ones((n_rows, n_cols + 1));
        augmented.slice_mut(s![.., ..n_cols]).assign(&self.values);
        augmented
    }
}

/// A feature table paired with one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub features: Table,
    pub labels: Array1<f64>,
}

impl LabeledTable {
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the label count differs from the row count
    pub fn new(features: Table, labels: Array1<f64>) -> Result<Self, ModelError> {
        if features.nrows() != labels.len() {
            return Err(ModelError::InputValidationError(format!(
                "Feature table and labels have different lengths, rows: {}, labels: {}",
                features.nrows(),
                labels.len()
            )));
        }
        Ok(LabeledTable { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn select_rows(&self, indices: &[usize]) -> LabeledTable {
        LabeledTable {
            features: self.features.select_rows(indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }

    /// Restricts the features to a subset of column names, see [`Table::select_intersection`].
    pub fn select_intersection(&self, names: &[String]) -> LabeledTable {
        LabeledTable {
            features: self.features.select_intersection(names),
            labels: self.labels.clone(),
        }
    }
}
