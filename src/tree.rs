use crate::types::*;

/// Nearest enclosing workspace of the container with the given id. A
/// workspace is considered its own workspace.
pub fn workspace_of(root: &Container, id: i64) -> Option<&Container> {
    fn walk<'a>(node: &'a Container, id: i64, ws: Option<&'a Container>) -> Option<&'a Container> {
        let ws = if node.kind == NodeKind::Workspace { Some(node) } else { ws };
        if node.id == id {
            return ws;
        }
        node.nodes
            .iter()
            .chain(node.floating_nodes.iter())
            .find_map(|child| walk(child, id, ws))
    }
    walk(root, id, None)
}

/// The leaf covering the most screen area, first in tree order on ties.
/// This is the "master" window as far as the master operations are concerned.
pub fn biggest(container: &Container) -> Option<&Container> {
    let mut best: Option<&Container> = None;
    for leaf in container.leaves() {
        let area = leaf.rect.width as i64 * leaf.rect.height as i64;
        match best {
            Some(b) if b.rect.width as i64 * b.rect.height as i64 >= area => {}
            _ => best = Some(leaf),
        }
    }
    best
}

/// Indented id/layout dump, for debug logs only.
pub fn tree_str(container: &Container, indent: &str) -> String {
    let mut out = format!("{}{} {:?}\n", indent, container.id, container.layout);
    let deeper = format!("{indent}  ");
    for node in &container.nodes {
        out.push_str(&tree_str(node, &deeper));
    }
    out
}
