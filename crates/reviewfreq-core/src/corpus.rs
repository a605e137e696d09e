//! Labeled corpus ingestion
//!
//! Reads reviews from JSON lines (one object per line) or a single JSON
//! array. Every record must carry both the text and the label field;
//! a missing or mistyped field is reported with the record index instead
//! of being defaulted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::freqs::Document;

/// Names of the record fields holding the review text and its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusFields {
    pub text_field: String,
    pub label_field: String,
}

impl Default for CorpusFields {
    fn default() -> Self {
        Self {
            text_field: "review_body".to_string(),
            label_field: "sentiment".to_string(),
        }
    }
}

/// Convert one JSON record into a document
pub fn parse_record<L: DeserializeOwned>(
    index: usize,
    record: &Value,
    fields: &CorpusFields,
) -> Result<Document<L>> {
    let object = record
        .as_object()
        .ok_or_else(|| Error::malformed(index, "record is not a JSON object"))?;

    let text = object
        .get(&fields.text_field)
        .ok_or_else(|| Error::malformed(index, format!("missing field `{}`", fields.text_field)))?
        .as_str()
        .ok_or_else(|| {
            Error::malformed(index, format!("field `{}` is not a string", fields.text_field))
        })?;

    let label = object
        .get(&fields.label_field)
        .ok_or_else(|| Error::malformed(index, format!("missing field `{}`", fields.label_field)))?;
    let label = L::deserialize(label).map_err(|e| {
        Error::malformed(index, format!("invalid field `{}`: {}", fields.label_field, e))
    })?;

    Ok(Document::new(text, label))
}

/// Lazily parse a JSON-lines corpus; blank lines are skipped
pub fn iter_jsonl<'a, R, L>(
    reader: R,
    fields: &'a CorpusFields,
) -> impl Iterator<Item = Result<Document<L>>> + 'a
where
    R: BufRead + 'a,
    L: DeserializeOwned + 'a,
{
    reader
        .lines()
        .enumerate()
        .filter_map(move |(index, line)| {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            if line.trim().is_empty() {
                return None;
            }
            let record = serde_json::from_str::<Value>(&line)
                .map_err(|e| Error::malformed(index, format!("invalid JSON: {}", e)));
            Some(record.and_then(|record| parse_record(index, &record, fields)))
        })
}

/// Read a whole JSON-lines corpus
pub fn read_jsonl<R, L>(reader: R, fields: &CorpusFields) -> Result<Vec<Document<L>>>
where
    R: BufRead,
    L: DeserializeOwned,
{
    let docs = iter_jsonl(reader, fields).collect::<Result<Vec<_>>>()?;
    debug!(documents = docs.len(), "read JSON-lines corpus");
    Ok(docs)
}

/// Open and read a JSON-lines corpus file
pub fn open_jsonl<L: DeserializeOwned>(
    path: impl AsRef<Path>,
    fields: &CorpusFields,
) -> Result<Vec<Document<L>>> {
    let file = File::open(path.as_ref())?;
    read_jsonl(BufReader::new(file), fields)
}

/// Read a corpus stored as a single JSON array of records
pub fn read_json_array<R, L>(reader: R, fields: &CorpusFields) -> Result<Vec<Document<L>>>
where
    R: Read,
    L: DeserializeOwned,
{
    let records: Vec<Value> = serde_json::from_reader(reader)?;
    let docs = records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record, fields))
        .collect::<Result<Vec<_>>>()?;
    debug!(documents = docs.len(), "read JSON array corpus");
    Ok(docs)
}
