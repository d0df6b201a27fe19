//! Output formatting for resolved schemas.

use common_config::DisplayConfig;
use common_display::truncate_string;
use qlink_core::{Schema, TypeDescriptor};

fn type_list(types: &[TypeDescriptor]) -> String {
    let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
    format!("[{}]", names.join(", "))
}

/// One line per query: its range and result types.
pub fn format_summary(schema: &Schema) -> String {
    let mut out = format!(
        "{} tables, {} queries\n",
        schema.tables().len(),
        schema.queries().len()
    );
    for query in schema.queries() {
        out.push_str(&format!(
            "{:<14} {:<16} range {} result {}",
            query.identifier.to_string(),
            truncate_string(&query.table_name, 16),
            type_list(query.resolved_range_types()),
            type_list(query.resolved_result_types()),
        ));
        if let Some(join) = schema.query_join_query(query) {
            out.push_str(&format!(" join {}", join.identifier));
        }
        out.push('\n');
    }
    out
}

/// Render `schema` as the summary, or as a tree when `tree` or the display
/// config asks for one.
pub fn render(schema: &Schema, display: &DisplayConfig, tree: bool) -> String {
    if tree || display.tree {
        let mut out = schema
            .tree()
            .with_max_condition_len(display.max_condition_len)
            .to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    } else {
        format_summary(schema)
    }
}
