//! Validated parse of the store's raw schema document
//!
//! Wire form, as the store reports it:
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "class": "Article",
//!       "properties": [
//!         {"name": "title",      "dataType": ["string"]},
//!         {"name": "hasAuthors", "dataType": ["Author"]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A property is a cross-reference iff its single `dataType` entry names a
//! declared class. The store's convention makes this unambiguous: class
//! names are capitalized, scalar type names (`string`, `text`, `string[]`,
//! `int`, ...) are lowercase. Anything capitalized that does not match a
//! declared class is an error, not a scalar.

use crate::error::SchemaError;
use crate::schema::types::{ClassSchema, ReferenceProperty, ScalarProperty, Schema};
use serde_json::Value;
use std::collections::HashSet;

/// Parse and validate a schema document. Fails on the first structural
/// problem; a schema that parses is safe to drive the loader with.
pub fn parse_schema(document: &Value) -> Result<Schema, SchemaError> {
    let entries = document
        .get("classes")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingClasses)?;

    // First pass: collect declared class names so references can be
    // resolved regardless of declaration order.
    let mut declared: HashSet<&str> = HashSet::new();
    let mut named: Vec<(&str, &Value)> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let name = entry
            .get("class")
            .and_then(Value::as_str)
            .ok_or(SchemaError::UnnamedClass { index })?;
        if !declared.insert(name) {
            return Err(SchemaError::DuplicateClass {
                class: name.to_string(),
            });
        }
        named.push((name, entry));
    }

    let mut classes = Vec::with_capacity(named.len());
    for (name, entry) in named {
        classes.push(parse_class(name, entry, &declared)?);
    }

    Ok(Schema { classes })
}

fn parse_class(
    name: &str,
    entry: &Value,
    declared: &HashSet<&str>,
) -> Result<ClassSchema, SchemaError> {
    let mut scalars = Vec::new();
    let mut references = Vec::new();

    let properties = entry
        .get("properties")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for property in properties {
        let property_name = property
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::UnnamedProperty {
                class: name.to_string(),
            })?;

        let data_types = property
            .get("dataType")
            .and_then(Value::as_array)
            .filter(|types| !types.is_empty())
            .ok_or_else(|| SchemaError::MissingDataType {
                class: name.to_string(),
                property: property_name.to_string(),
            })?;
        if data_types.len() > 1 {
            return Err(SchemaError::AmbiguousDataType {
                class: name.to_string(),
                property: property_name.to_string(),
                count: data_types.len(),
            });
        }
        let data_type =
            data_types[0]
                .as_str()
                .ok_or_else(|| SchemaError::MissingDataType {
                    class: name.to_string(),
                    property: property_name.to_string(),
                })?;

        if is_class_name(data_type) {
            if !declared.contains(data_type) {
                return Err(SchemaError::UnknownTarget {
                    class: name.to_string(),
                    property: property_name.to_string(),
                    target: data_type.to_string(),
                });
            }
            references.push(ReferenceProperty {
                name: property_name.to_string(),
                target: data_type.to_string(),
            });
        } else {
            scalars.push(ScalarProperty {
                name: property_name.to_string(),
                accessor: format!("{}_{}", name.to_lowercase(), property_name),
            });
        }
    }

    Ok(ClassSchema {
        name: name.to_string(),
        scalars,
        references,
    })
}

fn is_class_name(data_type: &str) -> bool {
    data_type.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_author_document() -> Value {
        json!({
            "classes": [
                {
                    "class": "Article",
                    "properties": [
                        {"name": "title", "dataType": ["string"]},
                        {"name": "keywords", "dataType": ["string[]"]},
                        {"name": "hasAuthors", "dataType": ["Author"]}
                    ]
                },
                {
                    "class": "Author",
                    "properties": [
                        {"name": "name", "dataType": ["string"]},
                        {"name": "wroteArticles", "dataType": ["Article"]}
                    ]
                }
            ]
        })
    }

    #[test]
    fn parses_scalars_and_references() {
        let schema = parse_schema(&article_author_document()).unwrap();

        assert_eq!(schema.classes.len(), 2);

        let article = schema.class("Article").unwrap();
        assert_eq!(
            article.scalars,
            vec![
                ScalarProperty {
                    name: "title".into(),
                    accessor: "article_title".into()
                },
                ScalarProperty {
                    name: "keywords".into(),
                    accessor: "article_keywords".into()
                },
            ]
        );
        assert_eq!(
            article.references,
            vec![ReferenceProperty {
                name: "hasAuthors".into(),
                target: "Author".into()
            }]
        );

        // `wroteArticles` has no `has...s` shape but still resolves through
        // its class-typed dataType entry
        let author = schema.class("Author").unwrap();
        assert_eq!(author.references[0].target, "Article");
    }

    #[test]
    fn keeps_document_order() {
        let schema = parse_schema(&article_author_document()).unwrap();
        let names: Vec<&str> = schema.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Article", "Author"]);
    }

    #[test]
    fn rejects_unknown_target() {
        let document = json!({
            "classes": [
                {
                    "class": "Article",
                    "properties": [
                        {"name": "hasAuthors", "dataType": ["Author"]}
                    ]
                }
            ]
        });

        match parse_schema(&document) {
            Err(SchemaError::UnknownTarget { class, property, target }) => {
                assert_eq!(class, "Article");
                assert_eq!(property, "hasAuthors");
                assert_eq!(target, "Author");
            }
            other => panic!("expected UnknownTarget, got {other:?}"),
        }
    }

    #[test]
    fn rejects_ambiguous_data_type() {
        let document = json!({
            "classes": [
                {
                    "class": "Article",
                    "properties": [
                        {"name": "related", "dataType": ["Author", "Article"]}
                    ]
                },
                {"class": "Author", "properties": []}
            ]
        });

        assert!(matches!(
            parse_schema(&document),
            Err(SchemaError::AmbiguousDataType { count: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_data_type() {
        let document = json!({
            "classes": [
                {"class": "Article", "properties": [{"name": "title"}]}
            ]
        });

        assert!(matches!(
            parse_schema(&document),
            Err(SchemaError::MissingDataType { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_class() {
        let document = json!({
            "classes": [
                {"class": "Article", "properties": []},
                {"class": "Article", "properties": []}
            ]
        });

        assert!(matches!(
            parse_schema(&document),
            Err(SchemaError::DuplicateClass { .. })
        ));
    }

    #[test]
    fn rejects_document_without_classes() {
        assert!(matches!(
            parse_schema(&json!({})),
            Err(SchemaError::MissingClasses)
        ));
    }

    #[test]
    fn class_without_properties_is_empty() {
        let document = json!({"classes": [{"class": "Article"}]});
        let schema = parse_schema(&document).unwrap();
        let article = schema.class("Article").unwrap();
        assert!(article.scalars.is_empty());
        assert!(article.references.is_empty());
    }
}
