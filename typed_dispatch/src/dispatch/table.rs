//! Dispatch table: a prefix tree over argument positions.
//!
//! Each level of the tree is one argument position. Signatures that share a
//! leading run of identical parameters share the corresponding path. Every
//! node orders its edges by static specificity (single concrete type, then
//! unions by width, then `any`, ties by declaration order). Variadic
//! parameters are self-looping edges kept apart from positional edges.

use crate::signature::{Param, ParsedSignature};

#[derive(Debug, Default)]
pub(crate) struct Node {
    pub(crate) edges: Vec<Edge>,
    pub(crate) rest: Vec<RestEdge>,
    /// Signature entries whose fixed parameters end exactly at this node.
    pub(crate) leaves: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct Edge {
    pub(crate) param: Param,
    /// Declaration index of the first signature that created this edge.
    pub(crate) order: usize,
    pub(crate) child: Node,
}

/// Matches every remaining argument against `param`, then accepts `leaf`.
#[derive(Debug)]
pub(crate) struct RestEdge {
    pub(crate) param: Param,
    pub(crate) leaf: usize,
}

impl Edge {
    fn specificity_key(&self) -> (bool, usize, usize) {
        (self.param.is_any(), self.param.width(), self.order)
    }
}

#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
    pub(crate) root: Node,
}

impl DispatchTable {
    /// Build the tree from signatures in declaration order; `signatures[i]`
    /// becomes leaf `i`. Optional parameters are expanded first.
    pub(crate) fn build(signatures: &[&ParsedSignature]) -> Self {
        let mut root = Node::default();
        for (entry, signature) in signatures.iter().enumerate() {
            for expanded in signature.expand() {
                insert(&mut root, &expanded, entry);
            }
        }
        sort_edges(&mut root);
        Self { root }
    }

    /// Number of nodes, for diagnostics.
    pub(crate) fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.edges.iter().map(|e| count(&e.child)).sum::<usize>()
        }
        count(&self.root)
    }

    /// Indented dump of the tree, one edge per line.
    #[cfg(test)]
    pub(crate) fn render(&self) -> String {
        fn walk(node: &Node, depth: usize, out: &mut String) {
            use std::fmt::Write as _;

            let pad = "  ".repeat(depth);
            for leaf in &node.leaves {
                let _ = writeln!(out, "{}=> #{}", pad, leaf);
            }
            for rest in &node.rest {
                let _ = writeln!(out, "{}{} => #{}", pad, rest.param, rest.leaf);
            }
            for edge in &node.edges {
                let _ = writeln!(out, "{}{}", pad, edge.param);
                walk(&edge.child, depth + 1, out);
            }
        }
        let mut out = String::new();
        walk(&self.root, 0, &mut out);
        out
    }
}

fn insert(root: &mut Node, signature: &ParsedSignature, entry: usize) {
    let mut node = root;
    for param in signature.fixed_params() {
        let existing = node.edges.iter().position(|e| e.param.types == param.types);
        let index = match existing {
            Some(i) => i,
            None => {
                node.edges.push(Edge {
                    param: param.clone(),
                    order: entry,
                    child: Node::default(),
                });
                node.edges.len() - 1
            }
        };
        node = &mut node.edges[index].child;
    }
    match signature.rest_param() {
        Some(rest) => node.rest.push(RestEdge {
            param: rest.clone(),
            leaf: entry,
        }),
        None => node.leaves.push(entry),
    }
}

fn sort_edges(node: &mut Node) {
    node.edges.sort_by_key(Edge::specificity_key);
    for edge in &mut node.edges {
        sort_edges(&mut edge.child);
    }
}
