use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::node::{NodeId, SyntaxTree};

/// Whether the configured rule names select wrappers to collapse or wrappers
/// to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseMode {
    /// Collapse exactly the listed rules.
    Include,
    /// Collapse every rule except the listed ones.
    Exclude,
}

/// The optimizer's only knob: a rule-name set plus inclusion/exclusion mode.
#[derive(Debug, Clone)]
pub struct CollapseRules {
    mode: CollapseMode,
    rules: FxHashSet<SmolStr>,
}

impl CollapseRules {
    /// Rules named here collapse when they wrap a single child.
    pub fn collapse<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(CollapseMode::Include, rules)
    }

    /// Rules named here survive; every other single-child wrapper collapses.
    pub fn keep<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(CollapseMode::Exclude, rules)
    }

    pub fn new<I, S>(mode: CollapseMode, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CollapseRules {
            mode,
            rules: rules
                .into_iter()
                .map(|rule| SmolStr::new(rule.as_ref()))
                .collect(),
        }
    }

    pub fn should_collapse(&self, name: &str) -> bool {
        let listed = self.rules.contains(name);
        match self.mode {
            CollapseMode::Include => listed,
            CollapseMode::Exclude => !listed,
        }
    }
}

/// Rewrites a tree into a new one with uninformative single-child wrapper
/// nodes collapsed.
///
/// The input tree is never mutated. Bottom-up: a single-child node whose
/// *current* rule name matches the collapse decision is replaced by its
/// optimized child, relabelled so that `original_name` remembers the wrapper.
/// Testing the current name (never the substituted annotation) makes the
/// transform idempotent.
pub fn optimize(tree: &SyntaxTree, rules: &CollapseRules) -> SyntaxTree {
    let mut out = SyntaxTree::default();
    out.root = tree
        .root()
        .map(|root| copy_optimized(tree, root, None, rules, &mut out));
    out
}

fn copy_optimized(
    tree: &SyntaxTree,
    id: NodeId,
    parent: Option<NodeId>,
    rules: &CollapseRules,
    out: &mut SyntaxTree,
) -> NodeId {
    let node = tree.node(id);
    if node.children.len() == 1 && rules.should_collapse(&node.name) {
        let new_id = copy_optimized(tree, node.children[0], parent, rules, out);
        out.nodes[new_id].original_name = node.name.clone();
        return new_id;
    }

    let new_id = out.nodes.alloc(super::node::Node {
        parent,
        children: Vec::new(),
        // The copy is sealed again later; never carry a stale cache over.
        named: rustc_hash::FxHashMap::default(),
        ..node.clone()
    });
    let children = node
        .children
        .iter()
        .map(|&child| copy_optimized(tree, child, Some(new_id), rules, out))
        .collect();
    out.nodes[new_id].children = children;
    new_id
}
