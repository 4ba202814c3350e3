use std::collections::HashSet;

use serde::{Serialize, Deserialize};

/// A node in sway's container tree: outputs, workspaces, split containers,
/// windows and floats all share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub layout: ConLayout,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub fullscreen_mode: u8,
    #[serde(default)]
    pub floating: Option<FloatingState>,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub focus: Vec<i64>,
    #[serde(default)]
    pub nodes: Vec<Container>,
    #[serde(default)]
    pub floating_nodes: Vec<Container>,
}

impl Container {
    /// All descendant windows in left-to-right tree order. Floats live in
    /// `floating_nodes` and are therefore never part of the result.
    pub fn leaves(&self) -> Vec<&Container> {
        fn walk<'a>(node: &'a Container, out: &mut Vec<&'a Container>) {
            for child in &node.nodes {
                if child.kind == NodeKind::Con && child.nodes.is_empty() {
                    out.push(child);
                } else {
                    walk(child, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    pub fn leaf_ids(&self) -> HashSet<i64> {
        self.leaves().iter().map(|leaf| leaf.id).collect()
    }

    /// Looks through tiled and floating children alike.
    pub fn find_by_id(&self, id: i64) -> Option<&Container> {
        if self.id == id {
            return Some(self);
        }
        self.nodes
            .iter()
            .chain(self.floating_nodes.iter())
            .find_map(|child| child.find_by_id(id))
    }

    pub fn find_focused(&self) -> Option<&Container> {
        if self.focused {
            return Some(self);
        }
        self.nodes
            .iter()
            .chain(self.floating_nodes.iter())
            .find_map(|child| child.find_focused())
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.floating, Some(FloatingState::UserOn) | Some(FloatingState::AutoOn))
            || self.kind == NodeKind::FloatingCon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Output,
    Workspace,
    Con,
    FloatingCon,
    Dockarea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConLayout {
    Splith,
    Splitv,
    Tabbed,
    Stacked,
    Output,
    Dockarea,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingState {
    AutoOn,
    AutoOff,
    UserOn,
    UserOff,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One entry of the workspace list reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    New,
    Close,
    Move,
}

/// A window event as delivered by sway. The embedded container is a snapshot
/// taken when the event fired and may be stale by the time it is handled.
#[derive(Debug, Clone)]
pub struct WindowEvent {
    pub change: WindowChange,
    pub container: Container,
}

/// Deferred actions that run after a layout pass has flushed its commands.
#[derive(Debug, Clone)]
pub enum PostAction {
    Fullscreen(i64),
    SwitchWorkspace(String),
}
