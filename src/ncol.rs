use anyhow::Result;

use crate::cycle;
use crate::layout::{self, Engine, Layout, LayoutKind};
use crate::tree;
use crate::types::*;
use crate::window_ops;

fn column_count(layout: &Layout) -> usize {
    match layout.kind {
        LayoutKind::NCol { n_columns } => n_columns,
        LayoutKind::Nop => 1,
    }
}

/// Moves one leaf between two adjacent columns when the left one holds the
/// wrong number. At most one side runs per call. The passed-in column
/// snapshots are patched immediately so that later columns of the same
/// reflow round see the tentative shape, even though the live tree has
/// already moved on.
fn balance(
    eng: &mut Engine,
    col1: &mut Container,
    col1_expected: usize,
    col2: &mut Container,
) -> Result<bool> {
    log::debug!(
        "balancing column {} ({} nodes, expected {}) against column {} ({} nodes)",
        col1.id,
        col1.nodes.len(),
        col1_expected,
        col2.id,
        col2.nodes.len()
    );

    if col1.nodes.len() < col1_expected && !col2.nodes.is_empty() {
        let node = col2.nodes.remove(0);
        window_ops::move_container(eng, node.id, col1.id)?;
        col1.nodes.push(node);
        return Ok(true);
    }

    if col1.nodes.len() > col1_expected && col1.nodes.len() > 1 {
        let node = col1.nodes.pop().expect("column checked non-empty");
        window_ops::add_node_to_front(eng, col2, node.id)?;
        col2.nodes.insert(0, node);
        return Ok(true);
    }

    Ok(false)
}

fn pair_mut(cols: &mut [Container], i: usize, j: usize) -> (&mut Container, &mut Container) {
    debug_assert!(i < j);
    let (head, tail) = cols.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// One round of rewriting towards canonical form. Returns whether any window
/// was moved; the caller loops until a round comes back clean.
pub fn reflow(l: &Layout, eng: &mut Engine, workspace: &Container) -> Result<bool> {
    if workspace.leaves().len() <= 1 {
        return Ok(false);
    }

    let split_cmd = l.transform_command("splitv")?;
    for node in &workspace.nodes {
        window_ops::ensure_split(eng, node, &split_cmd)?;
    }

    let Some(mut workspace) = eng.refetch(workspace.id)? else { return Ok(false) };

    let n_columns = column_count(l);
    let n_leaves = workspace.leaves().len();
    let n_slaves = n_leaves.saturating_sub(l.n_masters);
    let slaves_per_col = n_slaves.div_ceil(n_columns.saturating_sub(1).max(1));
    log::debug!(
        "reflowing {} leaves into {} masters and {} slaves, {} per column",
        n_leaves,
        l.n_masters,
        n_slaves,
        slaves_per_col
    );

    // Under a reflection the displayed order is the reverse of the tree
    // order, so the column walk runs right to left.
    let reversed = (l.transforms.reflect_x && workspace.layout == ConLayout::Splith)
        || (l.transforms.reflect_y && workspace.layout == ConLayout::Splitv);
    let mut cols: Vec<Container> = workspace.nodes.clone();
    if reversed {
        cols.reverse();
    }

    let mut caused_mutation = false;
    let len = cols.len();
    for i in 0..len {
        log::debug!("examining column {} (container {}, {} nodes)", i, cols[i].id, cols[i].nodes.len());
        if i == len - 1 && i > 0 {
            // Last column. The master column never gets filled from here.
            if i > 1 {
                let (prev, cur) = pair_mut(&mut cols, i - 1, i);
                caused_mutation |= balance(eng, prev, slaves_per_col, cur)?;
            }
            if cols[i].nodes.len() > 1 && len != n_columns {
                let (node_id, command) = if len < n_columns {
                    (cols[i].nodes.last().map(|n| n.id), l.transform_command("move right")?)
                } else {
                    (cols[i].nodes.first().map(|n| n.id), l.transform_command("move left")?)
                };
                if let Some(node_id) = node_id {
                    log::debug!("found {} columns but expected {}, nudging container {}", len, n_columns, node_id);
                    eng.move_counter.increment();
                    // The move focuses the moved container, so put focus back
                    // where it was.
                    let focused_id = workspace.find_focused().map(|f| f.id);
                    eng.conn.send_to(node_id, &command)?;
                    if let Some(focused_id) = focused_id {
                        eng.conn.send_to(focused_id, "focus")?;
                    }
                    caused_mutation = true;
                    if let Some(fresh) = eng.refetch(workspace.id)? {
                        workspace = fresh;
                    }
                }
            }
        } else if i == 0 {
            // Master column.
            if cols[0].nodes.len() > l.n_masters && len == 1 {
                let node_id = cols[0].nodes[0].id;
                let command = l.transform_command("move left")?;
                log::debug!(
                    "single column holds {} containers but expected {}, breaking container {} out",
                    cols[0].nodes.len(),
                    l.n_masters,
                    node_id
                );
                eng.move_counter.increment();
                let focused_id = workspace.find_focused().map(|f| f.id);
                eng.conn.send_to(node_id, &command)?;
                if let Some(focused_id) = focused_id {
                    eng.conn.send_to(focused_id, "focus")?;
                }
                caused_mutation = true;
                if let Some(fresh) = eng.refetch(workspace.id)? {
                    workspace = fresh;
                }
            }
            if len > 1 {
                let (master, next) = pair_mut(&mut cols, 0, 1);
                caused_mutation |= balance(eng, master, l.n_masters, next)?;
            }
        } else {
            let (cur, next) = pair_mut(&mut cols, i, i + 1);
            caused_mutation |= balance(eng, cur, slaves_per_col, next)?;
        }
    }

    Ok(caused_mutation)
}

/// The event driver: pre-reflow bookkeeping per event kind, the reflow loop,
/// refocusing and the queued post actions.
pub fn layout(l: &mut Layout, eng: &mut Engine, event: Option<&WindowEvent>) -> Result<()> {
    let Some(mut workspace) = eng.refetch(l.workspace_id)? else {
        log::debug!("workspace {} no longer exists, skipping layout", l.workspace_id);
        return Ok(());
    };
    if l.old_workspace.is_none() {
        l.old_workspace = Some(workspace.clone());
    }
    log::debug!("running layout for workspace {}", workspace.id);

    let mut post_actions: Vec<PostAction> = Vec::new();

    if let Some(event) = event {
        match event.change {
            WindowChange::New => {
                // Dialogs are created tiled and floated a moment later, so
                // refetch and compare leaf sets before displacing anything.
                let Some(fresh) = eng.refetch(l.workspace_id)? else { return Ok(()) };
                workspace = fresh;
                let old_ids = l.old_workspace.as_ref().map(|ws| ws.leaf_ids()).unwrap_or_default();
                if old_ids != workspace.leaf_ids() {
                    // The new window takes over the slot of the previously
                    // focused one instead of stacking below it.
                    cycle::swap_with_window(eng, -1, None, true)?;
                }
                // Same race for windows that start fullscreen.
                if let Some(con) = workspace.find_by_id(event.container.id) {
                    if con.fullscreen_mode == 1 {
                        log::debug!("container {} came up fullscreen, re-asserting after reflow", con.id);
                        post_actions.push(PostAction::Fullscreen(con.id));
                    }
                }
            }
            WindowChange::Close => {
                let closed = &event.container;
                if Some(workspace.id) == eng.focused_workspace_id()? && !closed.is_floating() {
                    // Focus the next window in the pre-close cycle order
                    // rather than whatever sway last had focused.
                    if let Some(old_ws) = l.old_workspace.as_ref() {
                        let old_leaves = old_ws.leaves();
                        let survivors = workspace.leaf_ids();
                        if let Some(index) = old_leaves.iter().position(|leaf| leaf.id == closed.id) {
                            let len = old_leaves.len();
                            for step in 1..=len {
                                let candidate = old_leaves[(index + step) % len];
                                if survivors.contains(&candidate.id) {
                                    eng.conn.send_to(candidate.id, "focus")?;
                                    if closed.fullscreen_mode == 1 {
                                        post_actions.push(PostAction::Fullscreen(candidate.id));
                                    }
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            WindowChange::Move => {
                if eng.move_counter.value() > 0 {
                    log::debug!("move event is an echo of our own move, dropping it");
                    eng.move_counter.decrement();
                    return Ok(());
                }
                // A user moved a window here. Swap it into place, fix up the
                // workspace it left, and switch back to wherever the user was
                // once everything has flushed.
                let origin = eng
                    .conn
                    .get_workspaces()?
                    .into_iter()
                    .find(|ws| ws.focused)
                    .map(|ws| ws.name);
                let moved = eng.refetch(event.container.id)?;
                cycle::swap_with_window(eng, -1, moved, false)?;
                layout::relayout_old_workspace(eng, workspace.id)?;
                if let Some(name) = origin {
                    post_actions.push(PostAction::SwitchWorkspace(name));
                }
            }
        }
    }

    loop {
        let Some(fresh) = eng.refetch(l.workspace_id)? else { break };
        workspace = fresh;
        if !reflow(l, eng, &workspace)? {
            break;
        }
    }

    if Some(workspace.id) == eng.focused_workspace_id()? {
        if let Some(focused) = workspace.find_focused().cloned() {
            log::debug!("refocusing container {}", focused.id);
            cycle::refocus_window(eng, &focused)?;
        }
    }

    for action in post_actions {
        match action {
            PostAction::Fullscreen(id) => eng.conn.send_to(id, "fullscreen")?,
            PostAction::SwitchWorkspace(name) => eng.conn.send(&format!("workspace {name}"))?,
        }
    }

    l.old_workspace = eng.refetch(l.workspace_id)?;
    if let Some(ws) = &l.old_workspace {
        log::trace!("workspace {} settled as:\n{}", ws.id, tree::tree_str(ws, ""));
    }
    Ok(())
}
