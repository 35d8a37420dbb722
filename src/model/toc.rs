//! Table-of-contents tree.

/// A navigation point. The tree is built bottom-up by value, so it is always acyclic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocNode {
    pub id: Option<String>,
    pub label: String,
    /// Target href, relative to the content directory.
    pub path: String,
    /// Play order for sorting (from NCX playOrder attribute)
    pub play_order: Option<usize>,
    pub children: Vec<TocNode>,
}

impl TocNode {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<TocNode>) -> Self {
        self.children = children;
        self
    }

    /// This node and its descendants in depth-first pre-order.
    pub fn iter(&self) -> TocIter<'_> {
        TocIter { stack: vec![self] }
    }

    /// Number of nodes in the tree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth of the deepest node below `self` (a leaf has depth 0).
    pub fn depth(&self) -> usize {
        self.children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }
}

pub struct TocIter<'a> {
    stack: Vec<&'a TocNode>,
}

impl<'a> Iterator for TocIter<'a> {
    type Item = &'a TocNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TocNode {
        TocNode::new("Book", "toc.ncx").with_children(vec![
            TocNode::new("Part I", "part1.xhtml").with_children(vec![
                TocNode::new("Chapter 1", "ch1.xhtml"),
                TocNode::new("Chapter 2", "ch2.xhtml"),
            ]),
            TocNode::new("Part II", "part2.xhtml"),
        ])
    }

    #[test]
    fn test_preorder_iteration() {
        let toc = sample();
        let labels: Vec<_> = toc.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Book", "Part I", "Chapter 1", "Chapter 2", "Part II"]);
        assert_eq!(toc.node_count(), 5);
    }

    #[test]
    fn test_depth() {
        let toc = sample();
        assert_eq!(toc.depth(), 2);
        assert!(toc.children[1].is_leaf());
        assert_eq!(toc.children[1].depth(), 0);
    }
}
