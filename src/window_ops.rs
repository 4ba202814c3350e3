use anyhow::Result;

use crate::layout::Engine;
use crate::tree;
use crate::types::*;

/// The one mark name this process uses for move-by-mark. Always removed again
/// right after the move.
pub const MARK: &str = "__swaymonad__mark";

/// Moves `node_id` into the container `dest_id` by marking the destination.
/// Every call costs one move counter increment because sway will echo the
/// move back as an event.
pub fn move_container(eng: &mut Engine, node_id: i64, dest_id: i64) -> Result<()> {
    eng.move_counter.increment();
    eng.conn.send_to(dest_id, &format!("mark {MARK}"))?;
    eng.conn.send_to(node_id, &format!("move window to mark {MARK}"))?;
    eng.conn.send_to(dest_id, &format!("unmark {MARK}"))?;
    Ok(())
}

/// Moves `node_id` into `container` and bubbles it to the front. The caller's
/// snapshot of `container` predates the move, so swapping against every
/// existing child back to front lands the new node at index 0.
pub fn add_node_to_front(eng: &mut Engine, container: &Container, node_id: i64) -> Result<()> {
    move_container(eng, node_id, container.id)?;
    for old in container.nodes.iter().rev() {
        eng.conn.send_to(node_id, &format!("swap container with con_id {}", old.id))?;
    }
    Ok(())
}

/// Reverses the children of `container` from `starting_idx` onward with
/// pairwise swaps, skipping the middle element and self-swaps.
pub fn reverse_nodes(eng: &mut Engine, container: &Container, starting_idx: usize) -> Result<()> {
    let len = container.nodes.len();
    let half = len.div_ceil(2);
    for (i, idx) in (starting_idx..half).enumerate() {
        let node = container.nodes[idx].id;
        let target = container.nodes[len - 1 - i].id;
        if node != target {
            eng.conn.send_to(node, &format!("swap container with con_id {target}"))?;
        }
    }
    Ok(())
}

/// Issues `split_cmd` on the container unless its layout already matches.
pub fn ensure_split(eng: &mut Engine, container: &Container, split_cmd: &str) -> Result<()> {
    let wanted = match split_cmd {
        "splith" => Some(ConLayout::Splith),
        "splitv" => Some(ConLayout::Splitv),
        _ => None,
    };
    if wanted != Some(container.layout) {
        eng.conn.send_to(container.id, split_cmd)?;
    }
    Ok(())
}

/// Focuses the biggest leaf of the focused workspace.
pub fn focus_master(eng: &mut Engine) -> Result<()> {
    let Some(workspace) = eng.focused_workspace()? else { return Ok(()) };
    let Some(master) = tree::biggest(&workspace) else { return Ok(()) };
    eng.conn.send_to(master.id, "focus")
}

/// Resizes the biggest leaf of the focused workspace with the given
/// `resize` arguments.
pub fn resize_master(eng: &mut Engine, args: &[String]) -> Result<()> {
    let Some(workspace) = eng.focused_workspace()? else { return Ok(()) };
    let Some(master) = tree::biggest(&workspace) else { return Ok(()) };
    eng.conn.send_to(master.id, &format!("resize {}", args.join(" ")))
}

/// Swaps the focused window with the biggest leaf and keeps it focused, so
/// the focused window takes over the master slot.
pub fn promote_window(eng: &mut Engine) -> Result<()> {
    let Some(workspace) = eng.focused_workspace()? else { return Ok(()) };
    let Some(focused) = workspace.find_focused().cloned() else { return Ok(()) };
    let Some(master) = tree::biggest(&workspace) else { return Ok(()) };
    let master_id = master.id;
    eng.conn.send_to(focused.id, &format!("swap container with con_id {master_id}"))?;
    eng.conn.send_to(focused.id, "focus")?;
    if focused.fullscreen_mode == 1 {
        eng.conn.send_to(focused.id, "fullscreen")?;
    }
    Ok(())
}
