//! Tree rendering for resolved schemas.

use std::fmt;

/// A node in a display tree.
pub trait TreeNode {
    /// Text shown for this node.
    fn label(&self) -> String;

    /// Child nodes, in display order.
    fn children(&self) -> Vec<Box<dyn TreeNode + '_>> {
        Vec::new()
    }

    /// Extra detail appended in parentheses.
    fn details(&self) -> Option<String> {
        None
    }
}

/// A leaf with a fixed label, for nodes that only carry text.
#[derive(Debug, Clone)]
pub struct TextNode {
    label: String,
    details: Option<String>,
}

impl TextNode {
    /// Create a leaf with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            details: None,
        }
    }

    /// Attach details to the leaf.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl TreeNode for TextNode {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn details(&self) -> Option<String> {
        self.details.clone()
    }
}

/// Renders a [`TreeNode`] hierarchy with box-drawing connectors.
pub struct DisplayTree<'a> {
    root: &'a dyn TreeNode,
    max_depth: Option<usize>,
}

impl<'a> DisplayTree<'a> {
    /// Create a new display tree.
    pub fn new(root: &'a dyn TreeNode) -> Self {
        Self {
            root,
            max_depth: None,
        }
    }

    /// Stop descending below `depth` levels under the root.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn write_line(f: &mut fmt::Formatter<'_>, node: &dyn TreeNode) -> fmt::Result {
        write!(f, "{}", node.label())?;
        if let Some(details) = node.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)
    }

    fn fmt_children(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &dyn TreeNode,
        prefix: &str,
        depth: usize,
    ) -> fmt::Result {
        if self.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }

        let children = node.children();
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            let is_last = i + 1 == count;
            let connector = if is_last { "└─ " } else { "├─ " };
            write!(f, "{prefix}{connector}")?;
            Self::write_line(f, child.as_ref())?;

            let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
            self.fmt_children(f, child.as_ref(), &child_prefix, depth + 1)?;
        }

        Ok(())
    }
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_line(f, self.root)?;
        self.fmt_children(f, self.root, "", 0)
    }
}
