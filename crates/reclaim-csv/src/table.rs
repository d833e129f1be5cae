// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Header-keyed CSV decoding.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::IngestError;

/// Decode every record of the CSV file at `path` into `T`, matching columns
/// by header name. Surrounding whitespace in headers and fields is ignored.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, IngestError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(IngestError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file)
        .deserialize()
        .map(|record| {
            record.map_err(|source| IngestError::Parse {
                path: path.to_path_buf(),
                line: source.position().map_or(0, csv::Position::line),
                source,
            })
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
}
