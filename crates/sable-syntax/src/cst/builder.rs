use smol_str::SmolStr;

use super::node::{Node, NodeId, SyntaxTree};
use crate::line_index::LineIndex;

/// Assembles a [`SyntaxTree`] from the engine's rule-enter/rule-exit events.
///
/// The engine drives `push`/`pop` in strict nested order; the currently-open
/// node is always the top of the open-node stack. A `pop` with
/// `succeeded = false` rolls the whole subtree back.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    source: &'a str,
    tree: SyntaxTree,
    open: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        TreeBuilder {
            source,
            tree: SyntaxTree::default(),
            open: Vec::new(),
        }
    }

    /// Opens a new node and appends it to the currently-open node, or makes
    /// it the root if no node is open.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty — that marks a broken engine integration,
    /// not malformed input.
    pub fn push(
        &mut self,
        name: &str,
        is_token: bool,
        start: usize,
        end: usize,
        line_index: &LineIndex,
    ) -> NodeId {
        assert!(!name.is_empty(), "rule name must not be empty");
        let (line, column) = line_index.position(start);
        let text = is_token.then(|| {
            SmolStr::new(
                self.source
                    .get(start..end.min(self.source.len()))
                    .unwrap_or_default(),
            )
        });
        let parent = self.open.last().copied();
        let id = self.tree.nodes.alloc(Node::new(
            name,
            is_token,
            start,
            end.saturating_sub(start),
            line,
            column,
            text,
            parent,
        ));
        match parent {
            Some(parent) => self.tree.nodes[parent].children.push(id),
            None => {
                debug_assert!(self.tree.root.is_none(), "event stream produced a second root");
                self.tree.root = Some(id);
            }
        }
        self.open.push(id);
        id
    }

    /// Closes the currently-open node. When the grammar backtracked
    /// (`succeeded = false`) the node and its whole subtree are detached;
    /// their arena rows stay behind, unreachable and harmless.
    ///
    /// # Panics
    ///
    /// Panics if no node is open.
    pub fn pop(&mut self, name: &str, succeeded: bool) {
        let id = self.open.pop().expect("pop without a matching push");
        debug_assert_eq!(self.tree.nodes[id].name, name, "unbalanced rule events");
        if !succeeded {
            match self.tree.nodes[id].parent {
                Some(parent) => {
                    let children = &mut self.tree.nodes[parent].children;
                    if let Some(pos) = children.iter().rposition(|&child| child == id) {
                        children.remove(pos);
                    }
                }
                None => self.tree.root = None,
            }
        }
    }

    /// `true` while at least one node is open.
    pub fn in_progress(&self) -> bool {
        !self.open.is_empty()
    }

    /// Reads out the finished tree once the event stream ends.
    ///
    /// # Panics
    ///
    /// Panics if nodes are still open.
    pub fn finish(self) -> SyntaxTree {
        assert!(self.open.is_empty(), "unclosed nodes at end of event stream");
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_rule(builder: &mut TreeBuilder<'_>, name: &str, index: &LineIndex) {
        builder.push(name, false, 0, 0, index);
    }

    #[test]
    fn test_node_count_matches_push_count() {
        let index = LineIndex::new();
        let mut builder = TreeBuilder::new("");
        push_rule(&mut builder, "a", &index);
        push_rule(&mut builder, "b", &index);
        push_rule(&mut builder, "c", &index);
        builder.pop("c", true);
        builder.pop("b", true);
        push_rule(&mut builder, "d", &index);
        builder.pop("d", true);
        builder.pop("a", true);

        let tree = builder.finish();
        assert_eq!(tree.node_count(), 4);
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).name, "a");
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn test_shape_mirrors_nesting() {
        let index = LineIndex::new();
        let mut builder = TreeBuilder::new("");
        push_rule(&mut builder, "outer", &index);
        push_rule(&mut builder, "inner", &index);
        push_rule(&mut builder, "leaf", &index);
        builder.pop("leaf", true);
        builder.pop("inner", true);
        builder.pop("outer", true);

        let tree = builder.finish();
        let outer = tree.root().unwrap();
        let inner = tree.children(outer)[0];
        let leaf = tree.children(inner)[0];
        assert_eq!(tree.node(inner).name, "inner");
        assert_eq!(tree.node(leaf).name, "leaf");
        assert!(tree.children(leaf).is_empty());
    }

    #[test]
    fn test_failed_pop_discards_whole_subtree() {
        let index = LineIndex::new();
        let mut builder = TreeBuilder::new("");
        push_rule(&mut builder, "root", &index);
        push_rule(&mut builder, "kept", &index);
        builder.pop("kept", true);
        push_rule(&mut builder, "speculative", &index);
        push_rule(&mut builder, "partial", &index);
        builder.pop("partial", true);
        builder.pop("speculative", false);
        builder.pop("root", true);

        let tree = builder.finish();
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.node(tree.children(root)[0]).name, "kept");
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_failed_root_pop_leaves_no_tree() {
        let index = LineIndex::new();
        let mut builder = TreeBuilder::new("");
        push_rule(&mut builder, "root", &index);
        builder.pop("root", false);
        assert!(builder.finish().root().is_none());
    }

    #[test]
    fn test_empty_stream_is_empty_source() {
        let builder = TreeBuilder::new("");
        assert!(builder.finish().root().is_none());
    }

    #[test]
    fn test_position_resolution_on_push() {
        let mut index = LineIndex::new();
        index.record_newline(4);
        let mut builder = TreeBuilder::new("ab\r\ncd");
        builder.push("word", true, 4, 6, &index);
        builder.pop("word", true);

        let tree = builder.finish();
        let word = tree.root().unwrap();
        assert_eq!(tree.node(word).line, 1);
        assert_eq!(tree.node(word).column, 0);
        assert_eq!(tree.token_text(word), "cd");
    }

    #[test]
    #[should_panic(expected = "rule name must not be empty")]
    fn test_empty_rule_name_panics() {
        let index = LineIndex::new();
        let mut builder = TreeBuilder::new("");
        builder.push("", false, 0, 0, &index);
    }
}
