//! Typed builder for the store's GraphQL `Get` queries
//!
//! Covers the shapes the store's nearest-neighbor surface accepts: near-text
//! concepts with a certainty floor, raw near-vector input, a where filter
//! on a property path, and a result limit. [`GetQuery::to_graphql`] renders
//! the call; [`crate::store::HttpStore::query`] submits it.

use serde_json::Value;

#[derive(Debug, Clone)]
struct NearText {
    concepts: Vec<String>,
    certainty: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOperator {
    Equal,
    Like,
}

impl WhereOperator {
    fn as_graphql(self) -> &'static str {
        match self {
            WhereOperator::Equal => "Equal",
            WhereOperator::Like => "Like",
        }
    }
}

#[derive(Debug, Clone)]
struct WhereFilter {
    operator: WhereOperator,
    path: Vec<String>,
    values: Vec<String>,
}

/// A `Get` query against one class.
#[derive(Debug, Clone)]
pub struct GetQuery {
    class: String,
    properties: Vec<String>,
    additional: Vec<String>,
    near_text: Option<NearText>,
    near_vector: Option<Vec<f32>>,
    where_filter: Option<WhereFilter>,
    limit: Option<usize>,
}

impl GetQuery {
    pub fn new(class: impl Into<String>) -> Self {
        GetQuery {
            class: class.into(),
            properties: Vec::new(),
            additional: Vec::new(),
            near_text: None,
            near_vector: None,
            where_filter: None,
            limit: None,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Add one property to the result selection.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    pub fn properties(mut self, names: &[&str]) -> Self {
        self.properties.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Request a metadata field under `_additional`, e.g. `certainty`.
    pub fn with_additional(mut self, field: impl Into<String>) -> Self {
        self.additional.push(field.into());
        self
    }

    /// Vector search by text concepts.
    pub fn near_text(mut self, concepts: &[&str]) -> Self {
        self.near_text = Some(NearText {
            concepts: concepts.iter().map(|c| c.to_string()).collect(),
            certainty: None,
        });
        self
    }

    /// Certainty floor for near-text matches. No effect without
    /// [`near_text`](GetQuery::near_text).
    pub fn certainty(mut self, certainty: f64) -> Self {
        if let Some(near_text) = &mut self.near_text {
            near_text.certainty = Some(certainty);
        }
        self
    }

    /// Vector search by a raw embedding.
    pub fn near_vector(mut self, vector: Vec<f32>) -> Self {
        self.near_vector = Some(vector);
        self
    }

    /// Keep only candidates whose property at `path` equals one of
    /// `values`.
    pub fn where_equal(self, path: &[&str], values: &[&str]) -> Self {
        self.where_filter(WhereOperator::Equal, path, values)
    }

    pub fn where_like(self, path: &[&str], values: &[&str]) -> Self {
        self.where_filter(WhereOperator::Like, path, values)
    }

    fn where_filter(mut self, operator: WhereOperator, path: &[&str], values: &[&str]) -> Self {
        self.where_filter = Some(WhereFilter {
            operator,
            path: path.iter().map(|p| p.to_string()).collect(),
            values: values.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query in the store's GraphQL syntax.
    pub fn to_graphql(&self) -> String {
        let mut arguments = Vec::new();

        if let Some(near_text) = &self.near_text {
            let mut fields = format!("concepts: {}", string_list(&near_text.concepts));
            if let Some(certainty) = near_text.certainty {
                fields.push_str(&format!(", certainty: {certainty}"));
            }
            arguments.push(format!("nearText: {{{fields}}}"));
        }

        if let Some(vector) = &self.near_vector {
            let rendered: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
            arguments.push(format!("nearVector: {{vector: [{}]}}", rendered.join(", ")));
        }

        if let Some(filter) = &self.where_filter {
            arguments.push(format!(
                "where: {{operator: {}, path: {}, valueText: {}}}",
                filter.operator.as_graphql(),
                string_list(&filter.path),
                string_list(&filter.values),
            ));
        }

        if let Some(limit) = self.limit {
            arguments.push(format!("limit: {limit}"));
        }

        let arguments = if arguments.is_empty() {
            String::new()
        } else {
            format!("({})", arguments.join(", "))
        };

        let mut selection = self.properties.join(" ");
        if !self.additional.is_empty() {
            if !selection.is_empty() {
                selection.push(' ');
            }
            selection.push_str(&format!("_additional {{ {} }}", self.additional.join(" ")));
        }

        format!(
            "{{ Get {{ {}{} {{ {} }} }} }}",
            self.class, arguments, selection
        )
    }
}

// GraphQL string literals share JSON's escaping rules
fn string_list(values: &[String]) -> String {
    let rendered: Vec<String> = values
        .iter()
        .map(|value| Value::String(value.clone()).to_string())
        .collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_near_text_with_filter_and_limit() {
        let query = GetQuery::new("Article")
            .properties(&["title", "keywords"])
            .with_additional("certainty")
            .near_text(&["banks hedge funds predictions"])
            .certainty(0.5)
            .where_equal(&["keywords"], &["bonds"])
            .limit(3);

        assert_eq!(
            query.to_graphql(),
            "{ Get { Article(\
                nearText: {concepts: [\"banks hedge funds predictions\"], certainty: 0.5}, \
                where: {operator: Equal, path: [\"keywords\"], valueText: [\"bonds\"]}, \
                limit: 3\
            ) { title keywords _additional { certainty } } } }"
        );
    }

    #[test]
    fn renders_near_vector() {
        let query = GetQuery::new("Article")
            .property("title")
            .near_vector(vec![0.25, -1.0])
            .limit(1);

        assert_eq!(
            query.to_graphql(),
            "{ Get { Article(nearVector: {vector: [0.25, -1]}, limit: 1) { title } } }"
        );
    }

    #[test]
    fn escapes_string_arguments() {
        let query = GetQuery::new("Article")
            .property("title")
            .near_text(&["he said \"bonds\""]);

        assert!(query
            .to_graphql()
            .contains("concepts: [\"he said \\\"bonds\\\"\"]"));
    }

    #[test]
    fn bare_query_has_no_argument_list() {
        let query = GetQuery::new("Author").property("name");
        assert_eq!(query.to_graphql(), "{ Get { Author { name } } }");
    }
}
