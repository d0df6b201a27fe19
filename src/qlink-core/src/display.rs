//! Tree rendering of schemas.

use std::fmt;

use common_display::{truncate_string, DisplayTree, TextNode, TreeNode};

use crate::schema::{Key, Query, Schema, Table};

const DEFAULT_MAX_CONDITION_LEN: usize = 48;

/// A [`TreeNode`] view of a schema.
pub struct SchemaTree<'a, T> {
    schema: &'a Schema<T>,
    max_condition_len: usize,
}

impl<T> Schema<T> {
    /// A tree view of this schema for [`DisplayTree`].
    pub fn tree(&self) -> SchemaTree<'_, T> {
        SchemaTree {
            schema: self,
            max_condition_len: DEFAULT_MAX_CONDITION_LEN,
        }
    }
}

impl<T> SchemaTree<'_, T> {
    /// Truncate condition text to `len` characters.
    #[must_use]
    pub const fn with_max_condition_len(mut self, len: usize) -> Self {
        self.max_condition_len = len;
        self
    }
}

impl<T: fmt::Display> fmt::Display for SchemaTree<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DisplayTree::new(self))
    }
}

fn type_list<T: fmt::Display>(types: &[T]) -> String {
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

fn key_node(role: &str, key: &Key) -> TextNode {
    let mut label = format!("{role} {}", key.name);
    if key.output_name() != key.name {
        label.push_str(&format!(" as {}", key.output_name()));
    }
    if key.desc {
        label.push_str(" desc");
    }
    let node = TextNode::new(label);
    if key.has_type_override() {
        node.with_details(key.type_name.clone())
    } else {
        node
    }
}

impl<T: fmt::Display> TreeNode for SchemaTree<'_, T> {
    fn label(&self) -> String {
        "schema".to_string()
    }

    fn details(&self) -> Option<String> {
        let state = if self.schema.is_prepared() {
            "prepared"
        } else {
            "unresolved"
        };
        Some(format!(
            "{} tables, {} queries, {state}",
            self.schema.tables().len(),
            self.schema.queries().len()
        ))
    }

    fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
        let tables = self
            .schema
            .tables()
            .iter()
            .map(|table| Box::new(TableNode(table)) as Box<dyn TreeNode + '_>);
        let queries = self.schema.queries().iter().map(|query| {
            Box::new(QueryNode {
                schema: self.schema,
                query,
                max_condition_len: self.max_condition_len,
            }) as Box<dyn TreeNode + '_>
        });
        tables.chain(queries).collect()
    }
}

struct TableNode<'a, T>(&'a Table<T>);

impl<T: fmt::Display> TreeNode for TableNode<'_, T> {
    fn label(&self) -> String {
        format!("table {}", self.0.name)
    }

    fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
        let table = self.0;
        let mut nodes: Vec<Box<dyn TreeNode + '_>> = Vec::new();
        for field in &table.fields {
            let ty = field
                .resolved_type()
                .map_or_else(|| field.type_name.clone(), ToString::to_string);
            nodes.push(Box::new(
                TextNode::new(format!("field {}", field.name)).with_details(ty),
            ));
        }
        for key in &table.history_keys {
            nodes.push(Box::new(key_node("history_key", key)));
        }
        for key in &table.keys {
            nodes.push(Box::new(key_node("key", key)));
        }
        nodes
    }
}

struct QueryNode<'a, T> {
    schema: &'a Schema<T>,
    query: &'a Query<T>,
    max_condition_len: usize,
}

impl<T: fmt::Display> TreeNode for QueryNode<'_, T> {
    fn label(&self) -> String {
        format!("query {}", self.query.identifier)
    }

    fn details(&self) -> Option<String> {
        let mut details = format!("table {}", self.query.table_name);
        if self.query.max_results > 0 {
            details.push_str(&format!(", max {}", self.query.max_results));
        }
        if self.query.is_state {
            details.push_str(", state");
        }
        Some(details)
    }

    fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
        let query = self.query;
        let mut nodes: Vec<Box<dyn TreeNode + '_>> = Vec::new();
        for key in &query.args {
            nodes.push(Box::new(key_node("arg", key)));
        }
        for key in &query.sort_keys {
            nodes.push(Box::new(key_node("sort_key", key)));
        }
        if self.schema.is_prepared() {
            nodes.push(Box::new(
                TextNode::new("range").with_details(type_list(query.resolved_range_types())),
            ));
            nodes.push(Box::new(
                TextNode::new("result").with_details(type_list(query.resolved_result_types())),
            ));
        }
        if let Some(join_table) = query.join_table() {
            let target = query
                .join_query_identifier
                .map(|name| name.to_string())
                .unwrap_or_default();
            nodes.push(Box::new(
                TextNode::new(format!("join {join_table}")).with_details(format!("via {target}")),
            ));
            for key in &query.join_key_values {
                nodes.push(Box::new(key_node("join_key_value", key)));
            }
            for key in &query.fields_from_join {
                nodes.push(Box::new(key_node("field_from_join", key)));
            }
        }
        for condition in &query.conditions {
            nodes.push(Box::new(TextNode::new(format!(
                "condition {}",
                truncate_string(condition, self.max_condition_len)
            ))));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{registry, sample_schema};

    #[test]
    fn test_unresolved_tree() {
        let schema = sample_schema();
        let output = schema.tree().to_string();
        assert!(output.starts_with("schema (2 tables, 3 queries, unresolved)\n"));
        assert!(output.contains("table accounts"));
        assert!(output.contains("field balance (asset)"));
        assert!(!output.contains("result ("));
    }

    #[test]
    fn test_prepared_tree() {
        let mut schema = sample_schema();
        schema.prepare(&registry()).unwrap();
        let output = schema.tree().to_string();
        assert!(output.contains("prepared"));
        assert!(output.contains("query getaccount (table accounts, max 100)"));
        assert!(output.contains("range ([uint64])"));
        assert!(output.contains("result ([uint64, asset, symbol])"));
        assert!(output.contains("join tokens (via gettoken)"));
    }

    #[test]
    fn test_condition_truncation() {
        let schema = sample_schema();
        let output = schema.tree().with_max_condition_len(10).to_string();
        assert!(output.contains("condition balance..."));
    }
}
