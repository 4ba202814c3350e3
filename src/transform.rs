use anyhow::{Result, bail};

use crate::layout::Engine;
use crate::types::*;
use crate::window_ops;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    ReflectX,
    ReflectY,
    Transpose,
}

/// The set of transformations active on a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transforms {
    pub reflect_x: bool,
    pub reflect_y: bool,
    pub transpose: bool,
}

impl Transforms {
    /// Flips one flag and reports whether it is now active.
    pub fn toggle(&mut self, t: Transformation) -> bool {
        let flag = match t {
            Transformation::ReflectX => &mut self.reflect_x,
            Transformation::ReflectY => &mut self.reflect_y,
            Transformation::Transpose => &mut self.transpose,
        };
        *flag = !*flag;
        *flag
    }
}

/// Rewrites a direction-bearing command for the active transformations.
/// Composition order is fixed: transpose first, then the reflections.
pub fn apply(transforms: Transforms, command: &str) -> Result<String> {
    let mut command = command.to_string();
    if transforms.transpose {
        command = transpose_command(&command)?;
    }
    if transforms.reflect_x {
        command = reflectx_command(&command)?;
    }
    if transforms.reflect_y {
        command = reflecty_command(&command)?;
    }
    Ok(command)
}

pub fn reflectx_direction(direction: &str) -> Result<&'static str> {
    match direction {
        "right" => Ok("left"),
        "left" => Ok("right"),
        "up" => Ok("up"),
        "down" => Ok("down"),
        _ => bail!("invalid direction: {direction:?}"),
    }
}

pub fn reflecty_direction(direction: &str) -> Result<&'static str> {
    match direction {
        "up" => Ok("down"),
        "down" => Ok("up"),
        "left" => Ok("left"),
        "right" => Ok("right"),
        _ => bail!("invalid direction: {direction:?}"),
    }
}

pub fn transpose_direction(direction: &str) -> Result<&'static str> {
    match direction {
        "right" => Ok("down"),
        "down" => Ok("left"),
        "left" => Ok("up"),
        "up" => Ok("right"),
        _ => bail!("invalid direction: {direction:?}"),
    }
}

fn rewrite_move(command: &str, map: fn(&str) -> Result<&'static str>) -> Result<String> {
    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("move"), Some(direction)) => Ok(format!("move {}", map(direction)?)),
        _ => Ok(command.to_string()),
    }
}

pub fn reflectx_command(command: &str) -> Result<String> {
    rewrite_move(command, reflectx_direction)
}

pub fn reflecty_command(command: &str) -> Result<String> {
    rewrite_move(command, reflecty_direction)
}

/// Swaps the split orientation named by a `split` command, in all three
/// spellings sway accepts.
pub fn transpose_split(command: &str) -> &str {
    match command {
        "splitv" => "splith",
        "split v" => "split h",
        "split vertical" => "split horizontal",
        "splith" => "splitv",
        "split h" => "split v",
        "split horizontal" => "split vertical",
        other => other,
    }
}

pub fn transpose_command(command: &str) -> Result<String> {
    let first = command.split_whitespace().next().unwrap_or("");
    if first == "move" {
        rewrite_move(command, transpose_direction)
    } else if first.starts_with("split") {
        Ok(transpose_split(command).to_string())
    } else {
        Ok(command.to_string())
    }
}

/// Reverses the child order of every container whose layout matches
/// `split_filter`, swapping pairs in place. REFLECTX passes `Splith`,
/// REFLECTY passes `Splitv`.
pub fn reflect_container(eng: &mut Engine, container: &Container, split_filter: ConLayout) -> Result<()> {
    if container.layout == split_filter {
        window_ops::reverse_nodes(eng, container, 0)?;
    }
    for node in &container.nodes {
        reflect_container(eng, node, split_filter)?;
    }
    Ok(())
}

/// Swaps the row and column roles of a workspace by toggling splits down the
/// tree and rotating the first child out of the old orientation. The moves
/// involved only change splits, no window changes columns, so no move events
/// come back and the move counter stays untouched.
pub fn transpose_container(eng: &mut Engine, container: &Container) -> Result<()> {
    let focused = eng.focused_window()?;
    transpose_rec(eng, container)?;
    if let Some(focused) = focused {
        eng.conn.send_to(focused.id, "focus")?;
    }
    Ok(())
}

fn transpose_rec(eng: &mut Engine, container: &Container) -> Result<()> {
    if container.kind == NodeKind::Workspace && !container.nodes.is_empty() {
        let first = container.nodes[0].id;
        eng.conn.send_to(first, "layout toggle split")?;
        match container.layout {
            ConLayout::Splith => eng.conn.send_to(first, "move up")?,
            ConLayout::Splitv => eng.conn.send_to(first, "move left")?,
            _ => {}
        }
        window_ops::reverse_nodes(eng, container, 1)?;
    } else if !container.nodes.is_empty() {
        eng.conn.send_to(container.nodes[0].id, "layout toggle split")?;
    }
    for node in &container.nodes {
        transpose_rec(eng, node)?;
    }
    Ok(())
}
