use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::types::*;

/// The slice of the sway IPC surface the tiler needs. The live implementation
/// wraps a `swayipc::Connection`; tests substitute a scripted simulator.
pub trait Transport {
    fn run_command(&mut self, payload: &str) -> Result<()>;
    fn get_tree(&mut self) -> Result<Container>;
    fn get_workspaces(&mut self) -> Result<Vec<WorkspaceInfo>>;
}

/// Command connection with write buffering. While buffering is on, commands
/// accumulate and are submitted as one `;`-joined batch; any tree or
/// workspace query flushes the batch first so reads see prior writes.
pub struct Conn {
    transport: Box<dyn Transport>,
    buffering: bool,
    buffer: Vec<String>,
    delay: Duration,
}

impl Conn {
    pub fn new(transport: Box<dyn Transport>, delay: Duration) -> Self {
        Conn { transport, buffering: false, buffer: Vec::new(), delay }
    }

    pub fn send(&mut self, command: &str) -> Result<()> {
        if self.buffering {
            log::debug!("buffering command: {command}");
            self.buffer.push(command.to_string());
            return Ok(());
        }
        log::debug!("executing command: {command}");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.transport.run_command(command)
    }

    /// Sends `command` addressed at a specific container.
    pub fn send_to(&mut self, con_id: i64, command: &str) -> Result<()> {
        self.send(&format!("[con_id={con_id}] {command}"))
    }

    pub fn enable_buffering(&mut self) {
        self.buffering = true;
    }

    /// Turns buffering off and flushes whatever was queued.
    pub fn disable_buffering(&mut self) -> Result<()> {
        self.buffering = false;
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.buffer).join(";");
        self.send(&batch)
    }

    pub fn get_tree(&mut self) -> Result<Container> {
        self.disable_buffering()?;
        let tree = self.transport.get_tree();
        self.enable_buffering();
        tree
    }

    pub fn get_workspaces(&mut self) -> Result<Vec<WorkspaceInfo>> {
        self.disable_buffering()?;
        let workspaces = self.transport.get_workspaces();
        self.enable_buffering();
        workspaces
    }
}

pub struct SwayTransport {
    conn: swayipc::Connection,
}

impl SwayTransport {
    pub fn connect() -> Result<Self> {
        let conn = swayipc::Connection::new().context("failed to connect to the sway socket")?;
        Ok(SwayTransport { conn })
    }
}

impl Transport for SwayTransport {
    fn run_command(&mut self, payload: &str) -> Result<()> {
        // Individual outcomes of a `;`-chain can fail for stale containers;
        // that is routine while the tree is being rewritten under us.
        for outcome in self.conn.run_command(payload).context("run_command failed")? {
            if let Err(err) = outcome {
                log::warn!("sway rejected a command: {err}");
            }
        }
        Ok(())
    }

    fn get_tree(&mut self) -> Result<Container> {
        let tree = self.conn.get_tree().context("get_tree failed")?;
        Ok(node_to_container(&tree))
    }

    fn get_workspaces(&mut self) -> Result<Vec<WorkspaceInfo>> {
        let workspaces = self.conn.get_workspaces().context("get_workspaces failed")?;
        Ok(workspaces
            .into_iter()
            .map(|ws| WorkspaceInfo { id: ws.id, name: ws.name, focused: ws.focused })
            .collect())
    }
}

pub fn node_to_container(node: &swayipc::Node) -> Container {
    let kind = match node.node_type {
        swayipc::NodeType::Root => NodeKind::Root,
        swayipc::NodeType::Output => NodeKind::Output,
        swayipc::NodeType::Workspace => NodeKind::Workspace,
        swayipc::NodeType::FloatingCon => NodeKind::FloatingCon,
        _ => NodeKind::Con,
    };
    let layout = match node.layout {
        swayipc::NodeLayout::SplitH => ConLayout::Splith,
        swayipc::NodeLayout::SplitV => ConLayout::Splitv,
        swayipc::NodeLayout::Stacked => ConLayout::Stacked,
        swayipc::NodeLayout::Tabbed => ConLayout::Tabbed,
        swayipc::NodeLayout::Output => ConLayout::Output,
        _ => ConLayout::None,
    };
    Container {
        id: node.id,
        name: node.name.clone(),
        kind,
        layout,
        rect: Rect {
            x: node.rect.x,
            y: node.rect.y,
            width: node.rect.width,
            height: node.rect.height,
        },
        fullscreen_mode: node.fullscreen_mode.unwrap_or(0),
        // sway reports floats through the node type; the i3 floating
        // attribute is not part of its tree replies.
        floating: None,
        focused: node.focused,
        focus: node.focus.clone(),
        nodes: node.nodes.iter().map(node_to_container).collect(),
        floating_nodes: node.floating_nodes.iter().map(node_to_container).collect(),
    }
}

/// Maps a sway window event into the subset the layouts react to.
pub fn window_event(event: &swayipc::WindowEvent) -> Option<WindowEvent> {
    let change = match event.change {
        swayipc::WindowChange::New => WindowChange::New,
        swayipc::WindowChange::Close => WindowChange::Close,
        swayipc::WindowChange::Move => WindowChange::Move,
        _ => return None,
    };
    Some(WindowEvent { change, container: node_to_container(&event.container) })
}
