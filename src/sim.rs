//! A scripted stand-in for sway used by the tests: it executes the command
//! strings the engine emits, mutates its own container tree the way sway
//! would, records every command, and queues the window events a real
//! compositor would send back.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use crate::commands;
use crate::ipc::{Conn, Transport};
use crate::layout::Engine;
use crate::tree;
use crate::types::*;

pub struct Sim {
    pub root: Container,
    pub focused: i64,
    pub prev_workspace: Option<i64>,
    pub marks: HashMap<String, i64>,
    pub commands: Vec<String>,
    pub events: VecDeque<WindowEvent>,
    next_id: i64,
}

fn con(id: i64, kind: NodeKind, layout: ConLayout) -> Container {
    Container {
        id,
        name: None,
        kind,
        layout,
        rect: Rect { x: 0, y: 0, width: 100, height: 100 },
        fullscreen_mode: 0,
        floating: None,
        focused: false,
        focus: Vec::new(),
        nodes: Vec::new(),
        floating_nodes: Vec::new(),
    }
}

fn find_mut(node: &mut Container, id: i64) -> Option<&mut Container> {
    if node.id == id {
        return Some(node);
    }
    for child in node.nodes.iter_mut().chain(node.floating_nodes.iter_mut()) {
        if let Some(found) = find_mut(child, id) {
            return Some(found);
        }
    }
    None
}

/// Parent of `id` together with its index and whether it floats.
fn parent_of(node: &mut Container, id: i64) -> Option<(&mut Container, usize, bool)> {
    if let Some(pos) = node.nodes.iter().position(|c| c.id == id) {
        return Some((node, pos, false));
    }
    if let Some(pos) = node.floating_nodes.iter().position(|c| c.id == id) {
        return Some((node, pos, true));
    }
    for child in node.nodes.iter_mut() {
        if let Some(found) = parent_of(child, id) {
            return Some(found);
        }
    }
    None
}

impl Sim {
    pub fn new() -> Self {
        let mut root = con(1, NodeKind::Root, ConLayout::Splith);
        let mut output = con(2, NodeKind::Output, ConLayout::Output);
        let mut workspace = con(3, NodeKind::Workspace, ConLayout::Splith);
        workspace.name = Some("1".to_string());
        output.nodes.push(workspace);
        root.nodes.push(output);
        Sim {
            root,
            focused: 3,
            prev_workspace: None,
            marks: HashMap::new(),
            commands: Vec::new(),
            events: VecDeque::new(),
            next_id: 100,
        }
    }

    pub fn workspace_id(&self) -> i64 {
        3
    }

    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn snapshot(&self) -> Container {
        let mut copy = self.root.clone();
        fn mark(node: &mut Container, focused: i64) {
            node.focused = node.id == focused;
            for child in node.nodes.iter_mut().chain(node.floating_nodes.iter_mut()) {
                mark(child, focused);
            }
        }
        mark(&mut copy, self.focused);
        copy
    }

    pub fn focused_workspace_id(&self) -> Option<i64> {
        tree::workspace_of(&self.root, self.focused).map(|ws| ws.id)
    }

    pub fn workspaces_reply(&self) -> Vec<WorkspaceInfo> {
        let focused_ws = self.focused_workspace_id();
        let mut out = Vec::new();
        for output in &self.root.nodes {
            for ws in &output.nodes {
                out.push(WorkspaceInfo {
                    id: ws.id,
                    name: ws.name.clone().unwrap_or_default(),
                    focused: Some(ws.id) == focused_ws,
                });
            }
        }
        out
    }

    // ---- window lifecycle, driven by the tests ----

    /// Opens a new window the way sway does: as the next sibling of the
    /// focused window, focused, with a `new` event queued.
    pub fn open_window(&mut self) -> i64 {
        let id = self.alloc_id();
        let window = con(id, NodeKind::Con, ConLayout::None);
        let focus = self.focused;
        let focused_is_leaf = self
            .root
            .find_by_id(focus)
            .map(|n| n.kind == NodeKind::Con && n.nodes.is_empty() && !n.is_floating())
            .unwrap_or(false);
        if focused_is_leaf {
            let (parent, idx, _) = parent_of(&mut self.root, focus).expect("focused leaf has a parent");
            parent.nodes.insert(idx + 1, window.clone());
        } else {
            let ws_id = self.focused_workspace_id().unwrap_or(self.workspace_id());
            find_mut(&mut self.root, ws_id).expect("workspace exists").nodes.push(window.clone());
        }
        self.focused = id;
        self.events.push_back(WindowEvent { change: WindowChange::New, container: window });
        id
    }

    /// Opens a window that is already floating by the time its event lands.
    pub fn open_floating(&mut self) -> i64 {
        let id = self.alloc_id();
        let mut window = con(id, NodeKind::FloatingCon, ConLayout::None);
        window.floating = Some(FloatingState::UserOn);
        let ws_id = self.focused_workspace_id().unwrap_or(self.workspace_id());
        find_mut(&mut self.root, ws_id)
            .expect("workspace exists")
            .floating_nodes
            .push(window.clone());
        self.focused = id;
        self.events.push_back(WindowEvent { change: WindowChange::New, container: window });
        id
    }

    pub fn close_window(&mut self, id: i64) {
        let Some(snapshot) = self.root.find_by_id(id).cloned() else { return };
        let ws_id = tree::workspace_of(&self.root, id).map(|ws| ws.id);
        self.remove_node(id);
        self.prune();
        if self.focused == id {
            self.focused = ws_id
                .and_then(|ws| {
                    let ws = self.root.find_by_id(ws)?;
                    ws.leaves().first().map(|leaf| leaf.id).or(Some(ws.id))
                })
                .unwrap_or(self.workspace_id());
        }
        self.events.push_back(WindowEvent { change: WindowChange::Close, container: snapshot });
    }

    /// A user-initiated `move container to workspace`: no mark, no counter
    /// increment on the engine side, so the resulting event is not an echo.
    pub fn user_move_to_workspace(&mut self, id: i64, name: &str) {
        let source_ws = tree::workspace_of(&self.root, id).map(|ws| ws.id);
        let Some(node) = self.remove_node(id) else { return };
        let target = self.workspace_by_name(name);
        find_mut(&mut self.root, target).expect("workspace exists").nodes.push(node);
        self.prune();
        if self.focused == id {
            self.focused = source_ws
                .and_then(|ws| {
                    let ws = self.root.find_by_id(ws)?;
                    ws.leaves().first().map(|leaf| leaf.id).or(Some(ws.id))
                })
                .unwrap_or(self.workspace_id());
        }
        self.emit_move(id);
    }

    /// Direct mutable access for tests that shape the tree by hand.
    pub fn node_mut(&mut self, id: i64) -> Option<&mut Container> {
        find_mut(&mut self.root, id)
    }

    /// Rips the given leaves out of wherever they are and stacks them, in
    /// order, into a fresh splitv column appended to the workspace. Used by
    /// tests to set up arbitrary starting shapes.
    pub fn make_column(&mut self, ws_id: i64, leaf_ids: &[i64]) -> i64 {
        let column_id = self.alloc_id();
        let mut column = con(column_id, NodeKind::Con, ConLayout::Splitv);
        for &leaf in leaf_ids {
            if let Some(node) = self.remove_node(leaf) {
                column.nodes.push(node);
            }
        }
        if let Some(ws) = find_mut(&mut self.root, ws_id) {
            ws.nodes.push(column);
        }
        self.prune();
        column_id
    }

    /// Finds a workspace by name, creating it on the first output on demand.
    pub fn workspace_by_name(&mut self, name: &str) -> i64 {
        for output in &self.root.nodes {
            for ws in &output.nodes {
                if ws.name.as_deref() == Some(name) {
                    return ws.id;
                }
            }
        }
        let id = self.alloc_id();
        let mut ws = con(id, NodeKind::Workspace, ConLayout::Splith);
        ws.name = Some(name.to_string());
        self.root.nodes[0].nodes.push(ws);
        id
    }

    // ---- command execution ----

    pub fn exec(&mut self, payload: &str) {
        for part in payload.split(';') {
            let command = part.trim();
            if command.is_empty() {
                continue;
            }
            self.commands.push(command.to_string());
            self.exec_one(command);
        }
    }

    fn exec_one(&mut self, command: &str) {
        let (target, rest) = match command.strip_prefix("[con_id=") {
            Some(tail) => match tail.split_once(']') {
                Some((id, rest)) => (id.parse::<i64>().ok(), rest.trim_start()),
                None => (None, command),
            },
            None => (None, command),
        };
        let words: Vec<&str> = rest.split_whitespace().collect();
        match words.as_slice() {
            ["focus"] => {
                if let Some(id) = target {
                    if self.root.find_by_id(id).is_some() {
                        self.focused = id;
                    }
                }
            }
            ["focus", dir] if is_direction(dir) => self.focus_dir(dir),
            ["move", "window", "to", "mark", mark] => {
                if let Some(id) = target {
                    self.move_to_mark(id, mark);
                }
            }
            ["move", dir] if is_direction(dir) => {
                let id = target.unwrap_or(self.focused);
                self.move_dir(id, dir);
            }
            ["mark", mark] => {
                if let Some(id) = target {
                    self.marks.insert(mark.to_string(), id);
                }
            }
            ["unmark", mark] => {
                self.marks.remove(*mark);
            }
            ["swap", "container", "with", "con_id", other] => {
                if let (Some(id), Ok(other)) = (target, other.parse::<i64>()) {
                    self.swap(id, other);
                }
            }
            ["splitv"] | ["split", "v"] | ["split", "vertical"] => {
                self.wrap(target.unwrap_or(self.focused), ConLayout::Splitv);
            }
            ["splith"] | ["split", "h"] | ["split", "horizontal"] => {
                self.wrap(target.unwrap_or(self.focused), ConLayout::Splith);
            }
            ["layout", "toggle", "split"] => self.toggle_split(target.unwrap_or(self.focused)),
            ["fullscreen"] => self.toggle_fullscreen(target.unwrap_or(self.focused)),
            ["workspace", "back_and_forth"] => self.back_and_forth(),
            ["workspace", ..] => {
                let name = rest["workspace".len()..].trim().to_string();
                if !name.is_empty() {
                    self.switch_workspace(&name);
                }
            }
            // mode changes, resizes and nops only get recorded
            _ => {}
        }
    }

    fn emit_move(&mut self, id: i64) {
        // relocating a container takes it out of fullscreen
        if let Some(node) = find_mut(&mut self.root, id) {
            node.fullscreen_mode = 0;
        }
        if let Some(snapshot) = self.root.find_by_id(id).cloned() {
            self.events.push_back(WindowEvent { change: WindowChange::Move, container: snapshot });
        }
    }

    fn remove_node(&mut self, id: i64) -> Option<Container> {
        let (parent, idx, floating) = parent_of(&mut self.root, id)?;
        Some(if floating { parent.floating_nodes.remove(idx) } else { parent.nodes.remove(idx) })
    }

    /// Split containers left without children disappear, as in sway.
    fn prune(&mut self) {
        fn walk(node: &mut Container) {
            for child in node.nodes.iter_mut() {
                walk(child);
            }
            node.nodes
                .retain(|c| !(c.kind == NodeKind::Con && c.layout != ConLayout::None && c.nodes.is_empty()));
        }
        walk(&mut self.root);
    }

    fn id_path(&self, id: i64) -> Option<Vec<i64>> {
        fn walk(node: &Container, id: i64, path: &mut Vec<i64>) -> bool {
            if node.nodes.iter().any(|c| c.id == id) {
                path.push(node.id);
                return true;
            }
            path.push(node.id);
            for child in &node.nodes {
                if walk(child, id, path) {
                    return true;
                }
            }
            path.pop();
            false
        }
        let mut path = Vec::new();
        walk(&self.root, id, &mut path).then_some(path)
    }

    fn move_to_mark(&mut self, id: i64, mark: &str) {
        let Some(&dest) = self.marks.get(mark) else { return };
        if id == dest || self.root.find_by_id(dest).is_none() {
            return;
        }
        if self.root.find_by_id(id).map_or(true, |n| n.find_by_id(dest).is_some()) {
            return;
        }
        let Some(node) = self.remove_node(id) else { return };
        let dest_is_leaf = self
            .root
            .find_by_id(dest)
            .map(|d| d.nodes.is_empty() && d.layout == ConLayout::None)
            .unwrap_or(false);
        if dest_is_leaf {
            if let Some((parent, idx, floating)) = parent_of(&mut self.root, dest) {
                if !floating {
                    parent.nodes.insert(idx + 1, node);
                }
            }
        } else if let Some(dest) = find_mut(&mut self.root, dest) {
            dest.nodes.push(node);
        }
        self.prune();
        self.emit_move(id);
    }

    /// Directional move with sway's escalation rules: try siblings at each
    /// ancestor whose orientation matches, entering adjacent containers at
    /// the near edge, and pop out of the enclosing container at tree edges.
    fn move_dir(&mut self, id: i64, dir: &str) {
        let horizontal = matches!(dir, "left" | "right");
        let forward = matches!(dir, "right" | "down");
        let Some(path) = self.id_path(id) else { return };
        let mut chain = id;
        for level in (0..path.len()).rev() {
            let parent_id = path[level];
            let Some(parent) = self.root.find_by_id(parent_id) else { return };
            if matches!(parent.kind, NodeKind::Root | NodeKind::Output) {
                return;
            }
            let parent_horizontal = matches!(parent.layout, ConLayout::Splith | ConLayout::Tabbed);
            let Some(idx) = parent.nodes.iter().position(|c| c.id == chain) else { return };
            let at_workspace = parent.kind == NodeKind::Workspace;
            if parent_horizontal != horizontal {
                if at_workspace {
                    return;
                }
                chain = parent_id;
                continue;
            }
            let target_idx = if forward {
                (idx + 1 < parent.nodes.len()).then_some(idx + 1)
            } else {
                idx.checked_sub(1)
            };
            match target_idx {
                Some(t) => {
                    let sibling = &parent.nodes[t];
                    let sibling_id = sibling.id;
                    let sibling_is_container = !sibling.nodes.is_empty();
                    if let Some(node) = self.remove_node(id) {
                        if sibling_is_container {
                            // enter the adjacent container at the near edge
                            if let Some(sibling) = find_mut(&mut self.root, sibling_id) {
                                if forward {
                                    sibling.nodes.insert(0, node);
                                } else {
                                    sibling.nodes.push(node);
                                }
                            }
                        } else if let Some(parent) = find_mut(&mut self.root, parent_id) {
                            let insert_at = if chain == id {
                                // hop over the leaf sibling
                                if forward { idx + 1 } else { idx - 1 }
                            } else {
                                // escaped a nested container, land beside it
                                if forward { idx + 1 } else { idx }
                            };
                            parent.nodes.insert(insert_at, node);
                        }
                        self.finish_move(id);
                    }
                    return;
                }
                None => {
                    if chain != id {
                        // pop out of the enclosing container at the edge
                        let insert_at = if forward { idx + 1 } else { idx };
                        if let Some(node) = self.remove_node(id) {
                            if let Some(parent) = find_mut(&mut self.root, parent_id) {
                                parent.nodes.insert(insert_at, node);
                            }
                            self.finish_move(id);
                        }
                        return;
                    }
                    if at_workspace {
                        return; // sway would look at the next output here
                    }
                    chain = parent_id;
                }
            }
        }
    }

    fn finish_move(&mut self, id: i64) {
        self.prune();
        // moving focuses the moved container
        self.focused = id;
        self.emit_move(id);
    }

    fn focus_dir(&mut self, dir: &str) {
        let horizontal = matches!(dir, "left" | "right");
        let forward = matches!(dir, "right" | "down");
        let id = self.focused;
        let Some(path) = self.id_path(id) else { return };
        let mut chain = id;
        for level in (0..path.len()).rev() {
            let parent_id = path[level];
            let Some(parent) = self.root.find_by_id(parent_id) else { return };
            if matches!(parent.kind, NodeKind::Root | NodeKind::Output) {
                return;
            }
            let parent_horizontal = matches!(parent.layout, ConLayout::Splith | ConLayout::Tabbed);
            let Some(idx) = parent.nodes.iter().position(|c| c.id == chain) else { return };
            let at_workspace = parent.kind == NodeKind::Workspace;
            if parent_horizontal == horizontal {
                let target_idx = if forward {
                    (idx + 1 < parent.nodes.len()).then_some(idx + 1)
                } else {
                    idx.checked_sub(1)
                };
                if let Some(t) = target_idx {
                    let sibling = &parent.nodes[t];
                    self.focused = sibling.leaves().first().map(|leaf| leaf.id).unwrap_or(sibling.id);
                    return;
                }
            }
            if at_workspace {
                return;
            }
            chain = parent_id;
        }
    }

    fn swap(&mut self, a: i64, b: i64) {
        if a == b {
            return;
        }
        let Some(mut node_a) = self.root.find_by_id(a).cloned() else { return };
        let Some(mut node_b) = self.root.find_by_id(b).cloned() else { return };
        if node_a.find_by_id(b).is_some() || node_b.find_by_id(a).is_some() {
            return;
        }
        // swapping relocates both containers, which drops fullscreen
        node_a.fullscreen_mode = 0;
        node_b.fullscreen_mode = 0;
        let Some((parent_a, idx_a, float_a)) = parent_of(&mut self.root, a).map(|(p, i, f)| (p.id, i, f)) else {
            return;
        };
        let Some((parent_b, idx_b, float_b)) = parent_of(&mut self.root, b).map(|(p, i, f)| (p.id, i, f)) else {
            return;
        };
        if float_a || float_b {
            return;
        }
        if let Some(parent) = find_mut(&mut self.root, parent_a) {
            parent.nodes[idx_a] = node_b;
        }
        if let Some(parent) = find_mut(&mut self.root, parent_b) {
            parent.nodes[idx_b] = node_a;
        }
    }

    fn wrap(&mut self, id: i64, layout: ConLayout) {
        if self.root.find_by_id(id).map_or(true, |n| n.kind != NodeKind::Con) {
            return;
        }
        let wrapper_id = self.alloc_id();
        let Some((parent, idx, floating)) = parent_of(&mut self.root, id) else { return };
        if floating {
            return;
        }
        let old = parent.nodes.remove(idx);
        let mut wrapper = con(wrapper_id, NodeKind::Con, layout);
        wrapper.nodes.push(old);
        parent.nodes.insert(idx, wrapper);
    }

    fn toggle_split(&mut self, id: i64) {
        let toggled = |layout: ConLayout| match layout {
            ConLayout::Splith => ConLayout::Splitv,
            ConLayout::Splitv => ConLayout::Splith,
            other => other,
        };
        let is_split = self
            .root
            .find_by_id(id)
            .map(|n| !n.nodes.is_empty())
            .unwrap_or(false);
        if is_split {
            if let Some(node) = find_mut(&mut self.root, id) {
                node.layout = toggled(node.layout);
            }
        } else if let Some((parent, _, _)) = parent_of(&mut self.root, id) {
            parent.layout = toggled(parent.layout);
        }
    }

    fn toggle_fullscreen(&mut self, id: i64) {
        let Some(ws_id) = tree::workspace_of(&self.root, id).map(|ws| ws.id) else { return };
        let currently = self.root.find_by_id(id).map(|n| n.fullscreen_mode).unwrap_or(0);
        if currently == 1 {
            if let Some(node) = find_mut(&mut self.root, id) {
                node.fullscreen_mode = 0;
            }
            return;
        }
        // one fullscreen window per workspace
        fn clear(node: &mut Container) {
            node.fullscreen_mode = 0;
            for child in node.nodes.iter_mut().chain(node.floating_nodes.iter_mut()) {
                clear(child);
            }
        }
        if let Some(ws) = find_mut(&mut self.root, ws_id) {
            clear(ws);
        }
        if let Some(node) = find_mut(&mut self.root, id) {
            node.fullscreen_mode = 1;
        }
    }

    fn switch_workspace(&mut self, name: &str) {
        let target = self.workspace_by_name(name);
        let current = self.focused_workspace_id();
        if current != Some(target) {
            self.prev_workspace = current;
        }
        self.focused = self
            .root
            .find_by_id(target)
            .and_then(|ws| ws.leaves().first().map(|leaf| leaf.id))
            .unwrap_or(target);
    }

    fn back_and_forth(&mut self) {
        let Some(prev) = self.prev_workspace else { return };
        let current = self.focused_workspace_id();
        self.focused = self
            .root
            .find_by_id(prev)
            .and_then(|ws| ws.leaves().first().map(|leaf| leaf.id))
            .unwrap_or(prev);
        self.prev_workspace = current;
    }
}

fn is_direction(word: &str) -> bool {
    matches!(word, "left" | "right" | "up" | "down")
}

#[derive(Clone)]
pub struct SimHandle(pub Rc<RefCell<Sim>>);

impl Transport for SimHandle {
    fn run_command(&mut self, payload: &str) -> Result<()> {
        self.0.borrow_mut().exec(payload);
        Ok(())
    }

    fn get_tree(&mut self) -> Result<Container> {
        Ok(self.0.borrow().snapshot())
    }

    fn get_workspaces(&mut self) -> Result<Vec<WorkspaceInfo>> {
        Ok(self.0.borrow().workspaces_reply())
    }
}

/// Engine wired to a fresh simulator. Returns the engine, the shared
/// simulator handle and the id of the initial workspace.
pub fn harness(default_layout: &str) -> (Engine, Rc<RefCell<Sim>>, i64) {
    let sim = Rc::new(RefCell::new(Sim::new()));
    let ws_id = sim.borrow().workspace_id();
    let conn = Conn::new(Box::new(SimHandle(sim.clone())), Duration::ZERO);
    (Engine::new(conn, default_layout), sim, ws_id)
}

/// Feeds queued window events (including echoes of the engine's own moves)
/// back through the dispatcher until the stream is quiet.
pub fn drain_events(eng: &mut Engine, sim: &Rc<RefCell<Sim>>) {
    for _ in 0..256 {
        let event = sim.borrow_mut().events.pop_front();
        let Some(event) = event else { return };
        commands::dispatch_window_event(eng, &event).expect("event handler failed");
    }
    panic!("event stream did not drain");
}

/// Top-level columns of a workspace as lists of leaf ids; a bare leaf child
/// shows up as a single-entry column.
pub fn column_ids(ws: &Container) -> Vec<Vec<i64>> {
    ws.nodes
        .iter()
        .map(|child| {
            if child.nodes.is_empty() {
                vec![child.id]
            } else {
                child.leaves().iter().map(|leaf| leaf.id).collect()
            }
        })
        .collect()
}

/// Asserts the canonical master/stack shape for the given parameters.
pub fn assert_canonical(ws: &Container, n_columns: usize, n_masters: usize) {
    let leaves = ws.leaves().len();
    if leaves <= 1 {
        return;
    }
    let n_slaves = leaves.saturating_sub(n_masters);
    let expected_cols = 1 + n_slaves.min(n_columns - 1);
    let cols = column_ids(ws);
    assert_eq!(cols.len(), expected_cols, "column count for {leaves} leaves: {cols:?}");
    for child in &ws.nodes {
        assert_eq!(child.layout, ConLayout::Splitv, "column {} is not a splitv", child.id);
    }
    assert_eq!(cols[0].len(), n_masters.min(leaves), "master column size: {cols:?}");
    if expected_cols > 1 {
        let per_col = n_slaves.div_ceil(n_columns - 1);
        for (i, col) in cols.iter().enumerate().skip(1) {
            if i + 1 < expected_cols {
                assert_eq!(col.len(), per_col, "interior column size: {cols:?}");
            } else {
                assert_eq!(col.len(), n_slaves - per_col * (expected_cols - 2), "last column size: {cols:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_move_pops_out_of_a_single_column() {
        let mut sim = Sim::new();
        let a = sim.open_window();
        let b = sim.open_window();
        sim.exec(&format!("[con_id={a}] splitv"));
        // b joins a's column so the workspace has one column of two
        let col = sim.root.find_by_id(3).unwrap().nodes[0].id;
        sim.marks.insert("m".to_string(), col);
        sim.exec(&format!("[con_id={b}] move window to mark m"));
        assert_eq!(column_ids(sim.root.find_by_id(3).unwrap()), vec![vec![a, b]]);

        sim.exec(&format!("[con_id={a}] move left"));
        assert_eq!(column_ids(sim.root.find_by_id(3).unwrap()), vec![vec![a], vec![b]]);
    }

    #[test]
    fn directional_move_enters_the_adjacent_column() {
        let mut sim = Sim::new();
        let a = sim.open_window();
        let b = sim.open_window();
        sim.exec(&format!("[con_id={a}] splitv"));
        sim.exec(&format!("[con_id={b}] splitv"));
        sim.exec(&format!("[con_id={b}] move left"));
        let ws = sim.root.find_by_id(3).unwrap();
        assert_eq!(column_ids(ws), vec![vec![a, b]]);
    }

    #[test]
    fn swap_exchanges_subtrees() {
        let mut sim = Sim::new();
        let a = sim.open_window();
        let b = sim.open_window();
        sim.exec(&format!("[con_id={a}] swap container with con_id {b}"));
        let ws = sim.root.find_by_id(3).unwrap();
        assert_eq!(ws.nodes[0].id, b);
        assert_eq!(ws.nodes[1].id, a);
    }

    #[test]
    fn fullscreen_is_exclusive_per_workspace() {
        let mut sim = Sim::new();
        let a = sim.open_window();
        let b = sim.open_window();
        sim.exec(&format!("[con_id={a}] fullscreen"));
        sim.exec(&format!("[con_id={b}] fullscreen"));
        assert_eq!(sim.root.find_by_id(a).unwrap().fullscreen_mode, 0);
        assert_eq!(sim.root.find_by_id(b).unwrap().fullscreen_mode, 1);
    }
}
