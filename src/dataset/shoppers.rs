use super::csv_reader::read_csv;
use super::table::LabeledTable;
use crate::error::IoError;
use crate::{Deserialize, Serialize};
use log::info;
use std::path::Path;
use std::str::FromStr;

/// Label column of the shoppers dataset.
pub const LABEL_COLUMN: &str = "Revenue";

/// Held-out test split shared by every training variant.
pub const TEST_FILE: &str = "Test_data.csv";

/// Training split variants of the shoppers dataset.
///
/// # Variants
///
/// - `Unbalanced` - The original class distribution (`Train_data.csv`)
/// - `Smote` - Oversampled with SMOTE (`balanced_train_data_smote.csv`)
/// - `Rbo` - Oversampled with radial-based oversampling (`balanced_train_data_rbo.csv`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Unbalanced,
    #[default]
    Smote,
    Rbo,
}

impl DatasetKind {
    pub fn train_file(&self) -> &'static str {
        match self {
            DatasetKind::Unbalanced => "Train_data.csv",
            DatasetKind::Smote => "balanced_train_data_smote.csv",
            DatasetKind::Rbo => "balanced_train_data_rbo.csv",
        }
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unbalanced" => Ok(DatasetKind::Unbalanced),
            "smote" => Ok(DatasetKind::Smote),
            "rbo" => Ok(DatasetKind::Rbo),
            _ => Err(format!(
                "Unknown dataset kind: {}. Expected one of: unbalanced, smote, rbo",
                s
            )),
        }
    }
}

/// Reads the training split selected by `kind` and the shared test split from `dir`.
///
/// # Returns
///
/// - `Ok((train, test))` - Both splits as labeled tables
pub fn read_dataset<P: AsRef<Path>>(
    dir: P,
    kind: DatasetKind,
    label_column: &str,
) -> Result<(LabeledTable, LabeledTable), IoError> {
    let dir = dir.as_ref();
    let train = read_csv(dir.join(kind.train_file()), label_column)?;
    let test = read_csv(dir.join(TEST_FILE), label_column)?;

    info!(
        "Loaded {:?} dataset: {} training rows, {} test rows, {} features",
        kind,
        train.len(),
        test.len(),
        train.features.ncols()
    );

    Ok((train, test))
}

/// Loads a selected feature subset stored as a JSON array of column names.
pub fn load_feature_subset<P: AsRef<Path>>(path: P) -> Result<Vec<String>, IoError> {
    crate::persistence::load_json(path)
}
