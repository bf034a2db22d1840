use color_eyre::{eyre::eyre, Result};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Direction;

use crate::error::Error;
use crate::structs::Multicolor;

/// The species tree over the leaf genomes.
///
/// Every edge is a branch carrying a T-consistent color: the multicolor of
/// exactly the genomes descending from it. The colors of all branches form a
/// laminar family mirroring the topology, and the branch enumeration order is
/// fixed by the tree text, so downstream iteration is deterministic.
#[derive(Debug, Clone)]
pub struct Phylogeny {
    tree: Graph<String, ()>,
    branches: Vec<(NodeIndex, NodeIndex)>,
    colors: Vec<Multicolor>,
}

impl Phylogeny {
    /// Parses a parenthesized tree such as `(A,(B,C))`. Leaf labels must
    /// match `genome_names`, each exactly once.
    pub fn parse(text: &str, genome_names: &[String]) -> Result<Self> {
        let mut tree = Graph::new();
        let mut cursor = Cursor {
            text: text.trim().as_bytes(),
            pos: 0,
        };
        let root = parse_node(&mut cursor, &mut tree)?;
        if cursor.peek() == Some(b';') {
            cursor.pos += 1;
        }
        if cursor.pos != cursor.text.len() {
            return Err(parse_error(format!(
                "unexpected trailing input at byte {}",
                cursor.pos
            )));
        }

        let branches: Vec<(NodeIndex, NodeIndex)> = tree
            .edge_indices()
            .filter_map(|e| tree.edge_endpoints(e))
            .collect();

        let mut colors = Vec::with_capacity(branches.len());
        for (_, child) in &branches {
            colors.push(subtree_color(&tree, *child, genome_names)?);
        }

        let full: Multicolor = (0..genome_names.len()).collect();
        let covered = subtree_color(&tree, root, genome_names)?;
        if covered != full {
            return Err(parse_error(format!(
                "tree does not name every genome exactly once: found {covered}, expected {full}"
            )));
        }

        Ok(Self {
            tree,
            branches,
            colors,
        })
    }

    pub fn n_branches(&self) -> usize {
        self.branches.len()
    }

    /// T-consistent colors, one per branch, in the fixed enumeration order.
    pub fn branch_colors(&self) -> &[Multicolor] {
        &self.colors
    }

    pub fn branch_color(&self, branch: usize) -> &Multicolor {
        &self.colors[branch]
    }

    /// Two branches are tree-adjacent when their edges share a node.
    pub fn are_adjacent_branches(&self, a: usize, b: usize) -> bool {
        let (p1, c1) = self.branches[a];
        let (p2, c2) = self.branches[b];
        p1 == p2 || p1 == c2 || c1 == p2 || c1 == c2
    }

    pub fn n_leaves(&self) -> usize {
        self.tree
            .node_indices()
            .filter(|n| {
                self.tree
                    .neighbors_directed(*n, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .count()
    }
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }
}

fn parse_error(reason: String) -> color_eyre::Report {
    eyre!(Error::TreeParse { reason })
}

fn parse_node(cursor: &mut Cursor, tree: &mut Graph<String, ()>) -> Result<NodeIndex> {
    if cursor.peek() == Some(b'(') {
        cursor.pos += 1;
        let node = tree.add_node(String::new());
        let mut children = 0;
        loop {
            let child = parse_node(cursor, tree)?;
            tree.add_edge(node, child, ());
            children += 1;
            match cursor.peek() {
                Some(b',') => cursor.pos += 1,
                Some(b')') => {
                    cursor.pos += 1;
                    break;
                }
                other => {
                    return Err(parse_error(format!(
                        "expected ',' or ')' at byte {}, found {:?}",
                        cursor.pos,
                        other.map(char::from)
                    )))
                }
            }
        }
        if children < 2 {
            return Err(parse_error(
                "internal nodes must have at least two children".to_string(),
            ));
        }
        Ok(node)
    } else {
        let start = cursor.pos;
        while cursor
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-')
        {
            cursor.pos += 1;
        }
        if cursor.pos == start {
            return Err(parse_error(format!(
                "expected a leaf name at byte {start}"
            )));
        }
        let name = std::str::from_utf8(&cursor.text[start..cursor.pos])
            .map_err(|_| parse_error("tree text is not valid utf-8".to_string()))?;
        Ok(tree.add_node(name.to_string()))
    }
}

fn subtree_color(
    tree: &Graph<String, ()>,
    node: NodeIndex,
    genome_names: &[String],
) -> Result<Multicolor> {
    let mut children = tree.neighbors_directed(node, Direction::Outgoing).peekable();
    if children.peek().is_none() {
        let label = &tree[node];
        let index = genome_names
            .iter()
            .position(|n| n == label)
            .ok_or_else(|| eyre!(Error::UnknownGenome { name: label.clone() }))?;
        return Ok(Multicolor::single(index));
    }
    let mut color = Multicolor::new();
    for child in children {
        color = color.union(&subtree_color(tree, child, genome_names)?);
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_branch_colors() {
        let phylogeny = Phylogeny::parse("(A,(B,C))", &names(&["A", "B", "C"])).unwrap();

        let colors: Vec<String> = phylogeny
            .branch_colors()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(colors, vec!["{0}", "{1}", "{2}", "{1,2}"]);
        assert_eq!(phylogeny.n_branches(), 4);
        assert_eq!(phylogeny.n_leaves(), 3);
    }

    #[test]
    fn test_laminar_family() {
        let phylogeny =
            Phylogeny::parse("((A,B),(C,D))", &names(&["A", "B", "C", "D"])).unwrap();
        let colors = phylogeny.branch_colors();
        for a in colors {
            for b in colors {
                let disjoint = a.intersection(b).is_empty();
                assert!(disjoint || a.includes(b) || b.includes(a));
            }
        }
    }

    #[test]
    fn test_adjacency() {
        // Branches: {A}=0, {B}=1, {C}=2, {B,C}=3.
        let phylogeny = Phylogeny::parse("(A,(B,C))", &names(&["A", "B", "C"])).unwrap();
        assert!(phylogeny.are_adjacent_branches(0, 3));
        assert!(phylogeny.are_adjacent_branches(1, 3));
        assert!(phylogeny.are_adjacent_branches(1, 2));
        assert!(!phylogeny.are_adjacent_branches(0, 1));
        assert!(!phylogeny.are_adjacent_branches(0, 2));
    }

    #[test]
    fn test_parse_errors() {
        let n = names(&["A", "B"]);
        assert!(Phylogeny::parse("(A,(B,C))", &n).is_err()); // unknown leaf
        assert!(Phylogeny::parse("(A)", &n).is_err()); // unary node
        assert!(Phylogeny::parse("(A,B", &n).is_err()); // unbalanced
        assert!(Phylogeny::parse("(A,B))", &n).is_err()); // trailing input
        assert!(Phylogeny::parse("(A,A)", &n).is_err()); // B missing
    }

    #[test]
    fn test_trailing_semicolon_accepted() {
        let phylogeny = Phylogeny::parse("(A,B);", &names(&["A", "B"])).unwrap();
        assert_eq!(phylogeny.n_branches(), 2);
    }
}
