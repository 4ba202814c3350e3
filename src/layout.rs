use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};

use crate::ipc::Conn;
use crate::move_counter::MoveCounter;
use crate::ncol;
use crate::transform::{self, Transformation, Transforms};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Master/stack tiling with a fixed column count.
    NCol { n_columns: usize },
    /// Auto-tiling disabled; events only trigger refocusing.
    Nop,
}

/// Per-workspace layout state. The window tree itself belongs to sway; the
/// stored workspace snapshot is only the previous pass's view, kept around to
/// diff leaf sets and recover pre-event ordering.
pub struct Layout {
    pub workspace_id: i64,
    pub kind: LayoutKind,
    pub n_masters: usize,
    pub transforms: Transforms,
    pub old_workspace: Option<Container>,
}

impl Layout {
    pub fn new(kind: LayoutKind, workspace_id: i64, n_masters: usize, transforms: Transforms) -> Self {
        Layout { workspace_id, kind, n_masters, transforms, old_workspace: None }
    }

    /// Rewrites a command for this workspace's active transformations.
    pub fn transform_command(&self, command: &str) -> Result<String> {
        transform::apply(self.transforms, command)
    }

    /// Runs one full layout pass for `event` (or a forced pass on `None`).
    pub fn layout(&mut self, eng: &mut Engine, event: Option<&WindowEvent>) -> Result<()> {
        match self.kind {
            LayoutKind::NCol { .. } => ncol::layout(self, eng, event),
            LayoutKind::Nop => self.nop_layout(eng, event),
        }
    }

    fn nop_layout(&mut self, eng: &mut Engine, event: Option<&WindowEvent>) -> Result<()> {
        let tree = eng.conn.get_tree()?;
        let Some(workspace) = tree.find_by_id(self.workspace_id) else { return Ok(()) };
        let workspace_id = workspace.id;
        let focused_id = workspace.find_focused().map(|f| f.id);
        if matches!(event, Some(e) if e.change == WindowChange::Move) {
            relayout_old_workspace(eng, workspace_id)?;
        }
        if let Some(id) = focused_id {
            eng.conn.send_to(id, "focus")?;
        }
        Ok(())
    }

    /// Moves the focused window one step: focus the neighbour in `direction`,
    /// then swap the two and restore focus. The nop layout falls back to a
    /// plain sway move.
    pub fn move_window(&mut self, eng: &mut Engine, direction: &str) -> Result<()> {
        if self.kind == LayoutKind::Nop {
            return eng.conn.send(&format!("move {direction}"));
        }
        let Some(focused) = eng.focused_window()? else { return Ok(()) };
        eng.conn.send(&format!("focus {direction}"))?;
        let Some(target) = eng.focused_window()? else { return Ok(()) };
        eng.conn.send_to(focused.id, &format!("swap container with con_id {}", target.id))?;
        eng.conn.send_to(focused.id, "focus")
    }

    pub fn increment_masters(&mut self) -> usize {
        self.n_masters += 1;
        log::debug!("workspace {} now has {} masters", self.workspace_id, self.n_masters);
        self.n_masters
    }

    pub fn decrement_masters(&mut self) -> usize {
        self.n_masters = self.n_masters.saturating_sub(1).max(1);
        log::debug!("workspace {} now has {} masters", self.workspace_id, self.n_masters);
        self.n_masters
    }
}

/// Builds a layout by registry name: `tall`, `3_col` or `nop`.
pub fn construct_layout(
    name: &str,
    workspace_id: i64,
    n_masters: usize,
    transforms: Transforms,
) -> Option<Layout> {
    let kind = match name {
        "tall" => LayoutKind::NCol { n_columns: 2 },
        "3_col" => LayoutKind::NCol { n_columns: 3 },
        "nop" => LayoutKind::Nop,
        _ => return None,
    };
    Some(Layout::new(kind, workspace_id, n_masters, transforms))
}

/// Everything a handler needs: the command connection, the per-workspace
/// layout table and the echo suppression counter.
pub struct Engine {
    pub conn: Conn,
    pub layouts: HashMap<i64, Layout>,
    pub default_layout: String,
    pub move_counter: MoveCounter,
    in_flight: HashSet<i64>,
}

impl Engine {
    pub fn new(conn: Conn, default_layout: impl Into<String>) -> Self {
        Engine {
            conn,
            layouts: HashMap::new(),
            default_layout: default_layout.into(),
            move_counter: MoveCounter::default(),
            in_flight: HashSet::new(),
        }
    }

    fn new_default_layout(&self, workspace_id: i64) -> Layout {
        construct_layout(&self.default_layout, workspace_id, 1, Transforms::default())
            .unwrap_or_else(|| Layout::new(LayoutKind::NCol { n_columns: 2 }, workspace_id, 1, Transforms::default()))
    }

    fn ensure_layout(&mut self, workspace_id: i64) {
        if !self.layouts.contains_key(&workspace_id) {
            log::debug!("workspace {workspace_id} has no layout yet, using {:?}", self.default_layout);
            let layout = self.new_default_layout(workspace_id);
            self.layouts.insert(workspace_id, layout);
        }
    }

    /// Runs the workspace's layout for `event`. The layout is taken out of
    /// the table for the duration of the pass so it can re-enter the engine,
    /// which happens when a move event fans out to another workspace. A pass
    /// already running for this workspace makes the nested call a no-op; the
    /// outer pass reflows right after anyway.
    pub fn run_layout(&mut self, workspace_id: i64, event: Option<&WindowEvent>) -> Result<()> {
        if !self.in_flight.insert(workspace_id) {
            log::debug!("workspace {workspace_id} is already being laid out");
            return Ok(());
        }
        self.ensure_layout(workspace_id);
        let result = match self.layouts.remove(&workspace_id) {
            Some(mut layout) => {
                let result = layout.layout(self, event);
                self.layouts.insert(workspace_id, layout);
                result
            }
            None => Ok(()),
        };
        self.in_flight.remove(&workspace_id);
        result
    }

    pub fn focused_workspace_id(&mut self) -> Result<Option<i64>> {
        Ok(self.conn.get_workspaces()?.into_iter().find(|ws| ws.focused).map(|ws| ws.id))
    }

    pub fn focused_workspace(&mut self) -> Result<Option<Container>> {
        let Some(id) = self.focused_workspace_id()? else { return Ok(None) };
        self.refetch(id)
    }

    pub fn focused_window(&mut self) -> Result<Option<Container>> {
        Ok(self.focused_workspace()?.and_then(|ws| ws.find_focused().cloned()))
    }

    /// Fresh snapshot of a container, or `None` once it has left the tree.
    pub fn refetch(&mut self, id: i64) -> Result<Option<Container>> {
        Ok(self.conn.get_tree()?.find_by_id(id).cloned())
    }
}

/// Replaces the focused workspace's layout, keeping its master count and
/// transformations, then lays the workspace out fresh.
pub fn set_layout(eng: &mut Engine, name: &str) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.ensure_layout(workspace_id);
    let (n_masters, transforms) = eng
        .layouts
        .get(&workspace_id)
        .map(|l| (l.n_masters, l.transforms))
        .unwrap_or((1, Transforms::default()));
    let Some(layout) = construct_layout(name, workspace_id, n_masters, transforms) else {
        bail!("unknown layout: {name:?}");
    };
    log::debug!("workspace {workspace_id} switches layout to {name:?}");
    eng.layouts.insert(workspace_id, layout);
    eng.conn.send("mode default")?;
    eng.run_layout(workspace_id, None)
}

pub fn increment_masters(eng: &mut Engine) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.ensure_layout(workspace_id);
    if let Some(layout) = eng.layouts.get_mut(&workspace_id) {
        layout.increment_masters();
    }
    eng.run_layout(workspace_id, None)
}

pub fn decrement_masters(eng: &mut Engine) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.ensure_layout(workspace_id);
    if let Some(layout) = eng.layouts.get_mut(&workspace_id) {
        layout.decrement_masters();
    }
    eng.run_layout(workspace_id, None)
}

/// Layout-aware move of the focused window.
pub fn move_focused(eng: &mut Engine, direction: &str) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.ensure_layout(workspace_id);
    let Some(mut layout) = eng.layouts.remove(&workspace_id) else { return Ok(()) };
    let result = layout.move_window(eng, direction);
    eng.layouts.insert(workspace_id, layout);
    result
}

/// Toggles a transformation on the focused workspace, rewrites the live tree
/// to match and runs a fresh layout pass.
pub fn toggle_transformation(eng: &mut Engine, t: Transformation) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.ensure_layout(workspace_id);
    if let Some(layout) = eng.layouts.get_mut(&workspace_id) {
        let active = layout.transforms.toggle(t);
        log::debug!("workspace {workspace_id} transformation {t:?} now {active}");
    }
    apply_transformation(eng, t)?;
    eng.run_layout(workspace_id, None)
}

fn apply_transformation(eng: &mut Engine, t: Transformation) -> Result<()> {
    match t {
        Transformation::ReflectX => reflect_workspace(eng, ConLayout::Splith),
        Transformation::ReflectY => reflect_workspace(eng, ConLayout::Splitv),
        Transformation::Transpose => transpose_workspace(eng),
    }
}

fn reflect_workspace(eng: &mut Engine, split_filter: ConLayout) -> Result<()> {
    let Some(workspace) = eng.focused_workspace()? else { return Ok(()) };
    transform::reflect_container(eng, &workspace, split_filter)
}

/// An active reflection would be baked into the transposed tree, so it is
/// undone before the transpose and reapplied afterwards.
fn transpose_workspace(eng: &mut Engine) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    let transforms = eng.layouts.get(&workspace_id).map(|l| l.transforms).unwrap_or_default();
    if transforms.reflect_x {
        reflect_workspace(eng, ConLayout::Splith)?;
    }
    if transforms.reflect_y {
        reflect_workspace(eng, ConLayout::Splitv)?;
    }
    if let Some(workspace) = eng.focused_workspace()? {
        transform::transpose_container(eng, &workspace)?;
    }
    if transforms.reflect_x {
        reflect_workspace(eng, ConLayout::Splith)?;
    }
    if transforms.reflect_y {
        reflect_workspace(eng, ConLayout::Splitv)?;
    }
    Ok(())
}

/// A window that moved here came from somewhere: lay the source workspace out
/// again. When source and destination report the same id the move crossed
/// outputs, and the real source is found via `workspace back_and_forth`.
pub fn relayout_old_workspace(eng: &mut Engine, new_workspace_id: i64) -> Result<()> {
    let Some(mut old_id) = eng.focused_workspace_id()? else { return Ok(()) };
    if old_id == new_workspace_id {
        eng.conn.send("workspace back_and_forth")?;
        if let Some(id) = eng.focused_workspace_id()? {
            old_id = id;
        }
        eng.conn.send("workspace back_and_forth")?;
    }
    log::debug!("relaying out previous workspace {old_id} after a move into {new_workspace_id}");
    eng.run_layout(old_id, None)
}

/// Toggles fullscreen on the focused window and refreshes the stored
/// snapshot so the next event diffs against the right state.
pub fn fullscreen(eng: &mut Engine) -> Result<()> {
    let Some(workspace_id) = eng.focused_workspace_id()? else { return Ok(()) };
    eng.conn.send("fullscreen")?;
    eng.ensure_layout(workspace_id);
    let snapshot = eng.refetch(workspace_id)?;
    if let Some(layout) = eng.layouts.get_mut(&workspace_id) {
        layout.old_workspace = snapshot;
    }
    Ok(())
}
