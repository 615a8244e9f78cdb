use crate::error::IoError;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
///
/// # Examples
/// ```rust
/// use shopper_intent::machine_learning::LogisticRegressionParams;
/// use shopper_intent::persistence::{load_json, save_json};
///
/// let path = std::env::temp_dir().join("shopper_intent_doc_params.json");
/// save_json(&path, &LogisticRegressionParams::default()).unwrap();
/// let loaded: LogisticRegressionParams = load_json(&path).unwrap();
/// assert_eq!(loaded, LogisticRegressionParams::default());
/// ```
pub fn save_json<P, T>(path: P, value: &T) -> Result<(), IoError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let mut writer = IoError::create_buf_writer(&path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    debug!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Reads a JSON document from `path`.
pub fn load_json<P, T>(path: P) -> Result<T, IoError>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let reader = IoError::load_in_buf_reader(&path)?;
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}
