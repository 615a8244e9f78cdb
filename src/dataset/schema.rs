use crate::error::{IoError, ModelError};
use crate::{Deserialize, Serialize};
use ahash::AHashSet;
use std::path::Path;

/// Numerical feature names of the shoppers dataset.
pub const SHOPPERS_NUMERICAL: [&str; 22] = [
    "Administrative",
    "Informational",
    "ProductRelated",
    "total_pages_viewed",
    "Administrative_Duration",
    "Informational_Duration",
    "ProductRelated_Duration",
    "Administrative_%",
    "Informational_%",
    "ProductRelated_%",
    "total_duration",
    "Administrative_Duration_%",
    "Informational_Duration_%",
    "ProductRelated_Duration_%",
    "Administrative_Duration_avg",
    "Informational_Duration_avg",
    "ProductRelated_Duration_avg",
    "page_values_x_bounce_rate",
    "BounceRates",
    "ExitRates",
    "PageValues",
    "SpecialDay",
];

/// Prefixes of the one-hot encoded categorical features of the shoppers dataset.
pub const SHOPPERS_CATEGORICAL: [&str; 7] = [
    "Month",
    "yearQuarter",
    "OperatingSystems",
    "Browser",
    "Region",
    "TrafficType",
    "VisitorType",
];

/// Partition of table columns into numerical and categorical features.
///
/// Categorical columns are one-hot encoded and named `<prefix>_<level>`. By default
/// a column is categorical when the text before its first underscore is one of
/// `categorical`; setting `categorical_columns` replaces that convention with an
/// explicit list.
///
/// # Fields
///
/// - `numerical` - Names of numerical columns
/// - `categorical` - Categorical variable prefixes
/// - `categorical_columns` - Optional explicit list of categorical column names
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeatureSchema {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_columns: Option<Vec<String>>,
}

/// Column names of a table split according to a [`FeatureSchema`], in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
}

impl Default for FeatureSchema {
    /// The shoppers dataset schema.
    fn default() -> Self {
        FeatureSchema::new(
            SHOPPERS_NUMERICAL.iter().map(|s| s.to_string()).collect(),
            SHOPPERS_CATEGORICAL.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl FeatureSchema {
    pub fn new(numerical: Vec<String>, categorical: Vec<String>) -> Self {
        FeatureSchema {
            numerical,
            categorical,
            categorical_columns: None,
        }
    }

    /// Uses an explicit categorical column list instead of prefix matching.
    pub fn with_categorical_columns(mut self, columns: Vec<String>) -> Self {
        self.categorical_columns = Some(columns);
        self
    }

    /// Loads a schema from a JSON file with `numerical`, `categorical` and
    /// optional `categorical_columns` keys.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        crate::persistence::load_json(path)
    }

    /// Splits `columns` into numerical and categorical features.
    ///
    /// A column listed as numerical is never categorical. Columns matching neither
    /// set are left out.
    ///
    /// # Errors
    ///
    /// - `ModelError::SchemaMismatch` - If an explicit categorical column is not in `columns`
    pub fn resolve(&self, columns: &[String]) -> Result<ResolvedColumns, ModelError> {
        let numerical_set: AHashSet<&str> = self.numerical.iter().map(String::as_str).collect();

        let numerical: Vec<String> = columns
            .iter()
            .filter(|c| numerical_set.contains(c.as_str()))
            .cloned()
            .collect();

        let categorical: Vec<String> = match &self.categorical_columns {
            Some(explicit) => {
                let present: AHashSet<&str> = columns.iter().map(String::as_str).collect();
                if let Some(missing) = explicit.iter().find(|c| !present.contains(c.as_str())) {
                    return Err(ModelError::SchemaMismatch(format!(
                        "Categorical column '{}' is missing from the table",
                        missing
                    )));
                }
                let explicit_set: AHashSet<&str> = explicit.iter().map(String::as_str).collect();
                columns
                    .iter()
                    .filter(|c| explicit_set.contains(c.as_str()))
                    .filter(|c| !numerical_set.contains(c.as_str()))
                    .cloned()
                    .collect()
            }
            None => {
                let prefixes: AHashSet<&str> =
                    self.categorical.iter().map(String::as_str).collect();
                columns
                    .iter()
                    .filter(|c| prefixes.contains(column_prefix(c)))
                    .filter(|c| !numerical_set.contains(c.as_str()))
                    .cloned()
                    .collect()
            }
        };

        Ok(ResolvedColumns {
            numerical,
            categorical,
        })
    }
}

/// Text before the first underscore of a column name, or the whole name.
///
/// # Examples
/// ```rust
/// use shopper_intent::dataset::column_prefix;
///
/// assert_eq!(column_prefix("VisitorType_Returning_Visitor"), "VisitorType");
/// assert_eq!(column_prefix("Browser"), "Browser");
/// ```
pub fn column_prefix(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}
