use std::fmt::{self, Display, Write};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::{
    arena::{Arena, ArenaId},
    span::Span,
};

pub type NodeId = ArenaId<Node>;

/// One grammar rule activation or one terminal match.
///
/// `len` is provisional while the subtree is still being built; it becomes
/// final during [`SyntaxTree::seal`], together with the name-keyed child
/// cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Current rule name; rewritten by the optimizer when a wrapper collapses.
    pub name: SmolStr,
    /// Rule name before optimization, kept for diagnostics.
    pub original_name: SmolStr,
    pub start: usize,
    pub len: usize,
    pub line: u32,
    pub column: usize,
    pub is_token: bool,
    /// Raw matched text, present on token nodes only.
    pub text: Option<SmolStr>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) named: FxHashMap<SmolStr, Vec<NodeId>>,
}

impl Node {
    pub(crate) fn new(
        name: &str,
        is_token: bool,
        start: usize,
        len: usize,
        line: u32,
        column: usize,
        text: Option<SmolStr>,
        parent: Option<NodeId>,
    ) -> Self {
        Node {
            name: SmolStr::new(name),
            original_name: SmolStr::new(name),
            start,
            len,
            line,
            column,
            is_token,
            text,
            parent,
            children: Vec::new(),
            named: FxHashMap::default(),
        }
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end(), self.line, self.column)
    }

    /// `true` if the optimizer substituted this node for a collapsed wrapper.
    #[inline(always)]
    pub fn is_relabelled(&self) -> bool {
        self.name != self.original_name
    }
}

/// The assembled parse tree: an arena of nodes plus an optional root.
///
/// Nodes discarded by grammar backtracking stay allocated but unreachable;
/// consumers must traverse from the root, never iterate the arena.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    pub(crate) nodes: Arena<Node>,
    pub(crate) root: Option<NodeId>,
    sealed: bool,
}

impl SyntaxTree {
    /// The single root, or `None` for an empty source.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Direct children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Direct children carrying the given rule name, in document order.
    /// Only valid on a sealed tree.
    pub fn children_named(&self, id: NodeId, name: &str) -> &[NodeId] {
        debug_assert!(self.sealed, "name queries require a sealed tree");
        self.nodes[id]
            .named
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First direct child with the given rule name, if any.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(id, name).first().copied()
    }

    /// Matched text of a token node, `""` for interior nodes.
    pub fn token_text(&self, id: NodeId) -> &str {
        self.nodes[id].text.as_deref().unwrap_or_default()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        fn count(tree: &SyntaxTree, id: NodeId) -> usize {
            1 + tree.nodes[id]
                .children
                .iter()
                .map(|&child| count(tree, child))
                .sum::<usize>()
        }
        self.root.map(|root| count(self, root)).unwrap_or(0)
    }

    /// Finalizes the tree after construction (and optimization): fixes each
    /// interior node's length to `last child's end - own start` and fills the
    /// per-node name-keyed child grouping. The tree is read-only afterwards.
    pub fn seal(&mut self) {
        if let Some(root) = self.root {
            self.seal_node(root);
        }
        self.sealed = true;
    }

    fn seal_node(&mut self, id: NodeId) {
        let children = self.nodes[id].children.clone();
        for &child in &children {
            self.seal_node(child);
        }
        if let Some(&last) = children.last() {
            let last_end = self.nodes[last].end();
            let node = &mut self.nodes[id];
            node.len = last_end - node.start;
        }
        let mut named: FxHashMap<SmolStr, Vec<NodeId>> = FxHashMap::default();
        for &child in &children {
            named
                .entry(self.nodes[child].name.clone())
                .or_default()
                .push(child);
        }
        self.nodes[id].named = named;
    }

    fn fmt_node(&self, id: NodeId, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.nodes[id];
        for _ in 0..level {
            f.write_str("  ")?;
        }
        if node.is_token {
            f.write_str("- ")?;
        } else {
            f.write_str("+ ")?;
        }
        f.write_str(&node.name)?;
        if node.is_relabelled() {
            write!(f, ": {}", node.original_name)?;
        }
        if node.is_token {
            write!(f, " ({})", node.text.as_deref().unwrap_or_default())?;
        }
        f.write_char('\n')?;
        for &child in &node.children {
            self.fmt_node(child, level + 1, f)?;
        }
        Ok(())
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_node(root, 0, f),
            None => Ok(()),
        }
    }
}
