//! In-place transliteration of document trees.
//!
//! The walk is written against [`DocumentNode`] so it works on any tree
//! that can tell text leaves from containers: the HTML fragments of
//! `salt-client`, or a host application's own DOM mirror.

use crate::scheme::UnknownSchemeError;
use crate::translit::{convert, Transliterator};

/// A node of a document tree.
pub trait DocumentNode: Sized {
    /// The text content, if this node is a text leaf.
    fn text_mut(&mut self) -> Option<&mut String>;

    /// Child nodes in document order. Text leaves have none.
    fn children_mut(&mut self) -> &mut [Self];
}

/// Transliterate every text leaf below `root` (inclusive).
///
/// Pre-order, depth-first. Containers keep their tag names, attributes and
/// structure. Returns the number of text leaves rewritten; identical schemes
/// leave the tree untouched and return 0.
pub fn transliterate_tree<N: DocumentNode>(
    translit: &Transliterator<'_>,
    root: &mut N,
    from: &str,
    to: &str,
) -> Result<usize, UnknownSchemeError> {
    transliterate_tree_where(translit, root, from, to, |_| true)
}

/// Like [`transliterate_tree`], but only inside subtrees whose root
/// `select` accepts. Selected subtrees are converted whole and not
/// searched further; `select` may annotate the node it accepts.
pub fn transliterate_tree_where<N, F>(
    translit: &Transliterator<'_>,
    root: &mut N,
    from: &str,
    to: &str,
    mut select: F,
) -> Result<usize, UnknownSchemeError>
where
    N: DocumentNode,
    F: FnMut(&mut N) -> bool,
{
    let Some((from, to)) = translit.resolve_pair(from, to)? else {
        return Ok(0);
    };
    let mut rewrite = |node: &mut N| {
        let mut count = 0;
        walk(node, &mut |text: &mut String| {
            *text = convert(text, from, to);
            count += 1;
        });
        count
    };
    Ok(find(root, &mut select, &mut rewrite))
}

fn find<N, F, R>(node: &mut N, select: &mut F, rewrite: &mut R) -> usize
where
    N: DocumentNode,
    F: FnMut(&mut N) -> bool,
    R: FnMut(&mut N) -> usize,
{
    if select(node) {
        return rewrite(node);
    }
    node.children_mut()
        .iter_mut()
        .map(|child| find(child, select, rewrite))
        .sum()
}

fn walk<N: DocumentNode>(node: &mut N, visit: &mut dyn FnMut(&mut String)) {
    if let Some(text) = node.text_mut() {
        visit(text);
        return;
    }
    for child in node.children_mut() {
        walk(child, visit);
    }
}
