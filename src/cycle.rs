use anyhow::Result;

use crate::layout::Engine;
use crate::tree;
use crate::types::*;

/// The leaf `offset` steps away from `con_id` along the workspace's leaf
/// order, wrapping at the ends. Floating containers are not part of that
/// order, so they have no neighbours.
pub fn find_offset_window(root: &Container, con_id: i64, offset: i64) -> Option<&Container> {
    let workspace = tree::workspace_of(root, con_id)?;
    let leaves = workspace.leaves();
    let index = leaves.iter().position(|leaf| leaf.id == con_id)?;
    let len = leaves.len() as i64;
    Some(leaves[(index as i64 + offset).rem_euclid(len) as usize])
}

/// Focuses the cycle neighbour of `window` (or of the focused window),
/// carrying fullscreen along.
pub fn focus_window(eng: &mut Engine, offset: i64, window: Option<&Container>) -> Result<()> {
    let source = match window {
        Some(w) => w.clone(),
        None => match eng.focused_window()? {
            Some(w) => w,
            None => return Ok(()),
        },
    };
    let tree = eng.conn.get_tree()?;
    if let Some(target) = find_offset_window(&tree, source.id, offset) {
        let target_id = target.id;
        eng.conn.send_to(target_id, "focus")?;
        if source.fullscreen_mode == 1 {
            eng.conn.send_to(target_id, "fullscreen")?;
        }
    }
    Ok(())
}

/// Swaps `window` (or the focused window) with its cycle neighbour.
pub fn swap_with_window(
    eng: &mut Engine,
    offset: i64,
    window: Option<Container>,
    focus_after_swap: bool,
) -> Result<()> {
    let source = match window {
        Some(w) => w,
        None => match eng.focused_window()? {
            Some(w) => w,
            None => return Ok(()),
        },
    };
    let tree = eng.conn.get_tree()?;
    if let Some(target) = find_offset_window(&tree, source.id, offset) {
        let target_id = target.id;
        eng.conn.send_to(source.id, &format!("swap container with con_id {target_id}"))?;
        if focus_after_swap {
            eng.conn.send_to(source.id, "focus")?;
            if source.fullscreen_mode == 1 {
                eng.conn.send_to(target_id, "fullscreen")?;
            }
        }
    }
    Ok(())
}

/// Plain `focus` can leave the pointer on a window border; hopping to the
/// next window and back lands it in the middle of `window`.
pub fn refocus_window(eng: &mut Engine, window: &Container) -> Result<()> {
    focus_window(eng, 1, Some(window))?;
    eng.conn.send_to(window.id, "focus")?;
    if window.fullscreen_mode == 1 {
        eng.conn.send_to(window.id, "fullscreen")?;
    }
    Ok(())
}
