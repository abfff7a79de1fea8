use std::{fs, io::Read, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{Result, SimError};

/// Loads a JSON document from `path`, or from stdin if `path` is a dash (-).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = path.display().to_string();
    let content = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| SimError::InputLoad { file: "stdin".to_string(), source })?;
        buffer
    } else {
        fs::read_to_string(path)
            .map_err(|source| SimError::InputLoad { file: file.clone(), source })?
    };

    serde_json::from_str(&content).map_err(|source| SimError::JsonParse { file, source })
}

/// Writes `value` as pretty JSON to `output`, or prints it when no file is given.
pub fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            debug!(target: "account_sim", output = %path.display(), "writing output");
            fs::write(path, json).map_err(|source| SimError::OutputWrite {
                file: path.display().to_string(),
                source,
            })
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
