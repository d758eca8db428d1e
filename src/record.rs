//! Flat input records and caller-side fan-out helpers

use serde_json::{Map, Value};

/// One input record: `<class>_<property>` keys for every class the schema
/// declares, e.g. `article_title`, `article_keywords`, `author_name`.
pub type FlatRecord = Map<String, Value>;

/// Split a delimiter-joined string into trimmed values.
pub fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(|part| part.trim().to_string())
        .collect()
}

/// Fan a record with a delimiter-joined string field out into one record
/// per value.
///
/// The loader resolves exactly one object per class per call, so a source
/// row like `{"article_title": "A", "author_name": "Smith, Jones"}` must
/// become two records differing only in `author_name` before loading (the
/// shared article is deduplicated by the loader). Records without the
/// field, or with a non-string value in it, pass through unchanged.
pub fn explode(record: &FlatRecord, field: &str, delimiter: char) -> Vec<FlatRecord> {
    let Some(Value::String(joined)) = record.get(field) else {
        return vec![record.clone()];
    };

    split_list(joined, delimiter)
        .into_iter()
        .map(|value| {
            let mut expanded = record.clone();
            expanded.insert(field.to_string(), Value::String(value));
            expanded
        })
        .collect()
}
