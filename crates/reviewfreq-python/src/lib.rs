//! Python bindings for reviewfreq Rust components

use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use reviewfreq_core::corpus::{self, CorpusFields};
use reviewfreq_core::freqs::{Document, FrequencyTable as CoreFrequencyTable};
use reviewfreq_core::{build_freqs as core_build_freqs, Error};
use std::collections::HashMap;

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Io(e) => PyOSError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Pull `(text, label)` out of every mapping in a Python iterable
fn extract_documents(
    reviews: &Bound<'_, PyAny>,
    text_field: &str,
    label_field: &str,
) -> PyResult<Vec<Document<i64>>> {
    let mut docs = Vec::new();
    for (index, review) in reviews.iter()?.enumerate() {
        let review = review?;
        let text: String = review
            .get_item(text_field)
            .and_then(|v| v.extract())
            .map_err(|e| to_py_err(Error::malformed(index, format!("field `{}`: {}", text_field, e))))?;
        let label: i64 = review
            .get_item(label_field)
            .and_then(|v| v.extract())
            .map_err(|e| to_py_err(Error::malformed(index, format!("field `{}`: {}", label_field, e))))?;
        docs.push(Document::new(text, label));
    }
    Ok(docs)
}

/// Python-exposed frequency table
#[pyclass]
pub struct FrequencyTable {
    table: CoreFrequencyTable<i64>,
}

#[pymethods]
impl FrequencyTable {
    /// Count for a (token, label) pair
    ///
    /// Args:
    ///     token: Stemmed token
    ///     label: Sentiment label
    fn get(&self, token: &str, label: i64) -> u64 {
        self.table.get(token, &label)
    }

    /// Convert to a dict keyed by (token, label) tuples
    fn to_dict(&self) -> HashMap<(String, i64), u64> {
        self.table
            .iter()
            .map(|((token, &label), count)| ((token.to_string(), label), count))
            .collect()
    }

    /// Get table statistics
    ///
    /// Returns:
    ///     Dictionary with num_keys, num_tokens, total_count
    fn stats(&self) -> HashMap<String, PyObject> {
        let stats = self.table.stats();
        Python::with_gil(|py| {
            let mut map = HashMap::new();
            map.insert("num_keys".to_string(), stats.num_keys.to_object(py));
            map.insert("num_tokens".to_string(), stats.num_tokens.to_object(py));
            map.insert("total_count".to_string(), stats.total_count.to_object(py));
            map
        })
    }

    fn __len__(&self) -> usize {
        self.table.len()
    }

    fn __repr__(&self) -> String {
        let stats = self.table.stats();
        format!(
            "FrequencyTable(num_keys={}, num_tokens={}, total_count={})",
            stats.num_keys, stats.num_tokens, stats.total_count
        )
    }
}

/// Clean a review into stemmed tokens
#[pyfunction]
fn normalize(text: &str) -> Vec<String> {
    reviewfreq_core::normalize(text)
}

/// Count (token, label) frequencies over an iterable of review mappings
///
/// Args:
///     reviews: Iterable of dicts holding text and an integer label
///     text_field: Key of the review text (default: "review_body")
///     label_field: Key of the label (default: "sentiment")
///
/// Returns:
///     Dict mapping (token, label) tuples to counts
#[pyfunction]
#[pyo3(signature = (reviews, text_field="review_body", label_field="sentiment"))]
fn build_freqs(
    reviews: &Bound<'_, PyAny>,
    text_field: &str,
    label_field: &str,
) -> PyResult<HashMap<(String, i64), u64>> {
    let docs = extract_documents(reviews, text_field, label_field)?;
    Ok(core_build_freqs(&docs).into_inner().into_iter().collect())
}

/// Like `build_freqs`, but returns a FrequencyTable object
#[pyfunction]
#[pyo3(signature = (reviews, text_field="review_body", label_field="sentiment"))]
fn build_table(
    reviews: &Bound<'_, PyAny>,
    text_field: &str,
    label_field: &str,
) -> PyResult<FrequencyTable> {
    let docs = extract_documents(reviews, text_field, label_field)?;
    Ok(FrequencyTable {
        table: core_build_freqs(&docs),
    })
}

/// Build a FrequencyTable from a JSON-lines file
#[pyfunction]
#[pyo3(signature = (path, text_field="review_body", label_field="sentiment"))]
fn build_table_from_jsonl(path: &str, text_field: &str, label_field: &str) -> PyResult<FrequencyTable> {
    let fields = CorpusFields {
        text_field: text_field.to_string(),
        label_field: label_field.to_string(),
    };
    let docs: Vec<Document<i64>> = corpus::open_jsonl(path, &fields).map_err(to_py_err)?;
    Ok(FrequencyTable {
        table: core_build_freqs(&docs),
    })
}

/// Python module
#[pymodule]
fn reviewfreq_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(build_freqs, m)?)?;
    m.add_function(wrap_pyfunction!(build_table, m)?)?;
    m.add_function(wrap_pyfunction!(build_table_from_jsonl, m)?)?;
    m.add_class::<FrequencyTable>()?;
    Ok(())
}
