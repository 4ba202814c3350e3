use anyhow::{Result, bail};

use crate::cycle;
use crate::layout::{self, Engine};
use crate::transform::Transformation;
use crate::tree;
use crate::types::*;
use crate::window_ops;

/// Splits a binding string into commands, respecting quoted arguments.
/// Unquoted `;` and `,` both end a command, matching how sway chains them.
pub fn parse_binding(binding: &str) -> Vec<Vec<String>> {
    let mut commands: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut token = String::new();
    let mut in_quotes: Option<char> = None;
    let mut escape_next = false;

    fn flush_token(current: &mut Vec<String>, token: &mut String) {
        if !token.is_empty() {
            current.push(std::mem::take(token));
        }
    }

    for c in binding.chars() {
        if escape_next {
            token.push(c);
            escape_next = false;
            continue;
        }
        match in_quotes {
            Some(quote) => {
                if c == quote {
                    in_quotes = None;
                } else if c == '\\' {
                    escape_next = true;
                } else {
                    token.push(c);
                }
            }
            None => match c {
                '\\' => escape_next = true,
                '"' | '\'' => in_quotes = Some(c),
                ';' | ',' => {
                    flush_token(&mut current, &mut token);
                    if !current.is_empty() {
                        commands.push(std::mem::take(&mut current));
                    }
                }
                c if c.is_whitespace() => flush_token(&mut current, &mut token),
                _ => token.push(c),
            },
        }
    }
    flush_token(&mut current, &mut token);
    if !current.is_empty() {
        commands.push(current);
    }
    commands
}

/// The commands addressed to this process: those starting with `nop`, with
/// the `nop` stripped. Everything else belongs to sway itself.
pub fn nop_commands(binding: &str) -> Vec<Vec<String>> {
    parse_binding(binding)
        .into_iter()
        .filter_map(|mut command| {
            if command.first().map(String::as_str) == Some("nop") {
                command.remove(0);
                (!command.is_empty()).then_some(command)
            } else {
                None
            }
        })
        .collect()
}

/// Runs every `nop` command of a binding in one buffered batch.
pub fn dispatch_binding(eng: &mut Engine, binding: &str) -> Result<()> {
    log::debug!("parsing binding command: {binding:?}");
    let commands = nop_commands(binding);
    if commands.is_empty() {
        return Ok(());
    }
    eng.conn.enable_buffering();
    let result = commands
        .iter()
        .try_for_each(|command| run_command(eng, &command[0], &command[1..]));
    let flushed = eng.conn.disable_buffering();
    result.and(flushed)
}

fn run_command(eng: &mut Engine, name: &str, args: &[String]) -> Result<()> {
    log::debug!("dispatching command {name:?} with args {args:?}");
    match name {
        "promote_window" => window_ops::promote_window(eng),
        "focus_master" => window_ops::focus_master(eng),
        "resize_master" => window_ops::resize_master(eng, args),
        "reflectx" => layout::toggle_transformation(eng, Transformation::ReflectX),
        "reflecty" => layout::toggle_transformation(eng, Transformation::ReflectY),
        "transpose" => layout::toggle_transformation(eng, Transformation::Transpose),
        "focus_next_window" => cycle::focus_window(eng, 1, None),
        "focus_prev_window" => cycle::focus_window(eng, -1, None),
        "swap_with_next_window" => cycle::swap_with_window(eng, 1, None, true),
        "swap_with_prev_window" => cycle::swap_with_window(eng, -1, None, true),
        "set_layout" => {
            let Some(layout_name) = args.first() else { bail!("set_layout requires a layout name") };
            layout::set_layout(eng, layout_name)
        }
        "increment_masters" => layout::increment_masters(eng),
        "decrement_masters" => layout::decrement_masters(eng),
        "move" => {
            let Some(direction) = args.first() else { bail!("move requires a direction") };
            layout::move_focused(eng, direction)
        }
        "fullscreen" => layout::fullscreen(eng),
        _ => {
            log::debug!("ignoring unknown command {name:?}");
            Ok(())
        }
    }
}

/// Routes a window event to the layout of the workspace it happened on,
/// falling back to the focused workspace when the container is already gone.
pub fn dispatch_window_event(eng: &mut Engine, event: &WindowEvent) -> Result<()> {
    log::debug!("received {:?} event for container {}", event.change, event.container.id);
    let tree = eng.conn.get_tree()?;
    let workspace_id = match tree::workspace_of(&tree, event.container.id).map(|ws| ws.id) {
        Some(id) => Some(id),
        None => eng.focused_workspace_id()?,
    };
    let Some(workspace_id) = workspace_id else {
        log::debug!("event has no workspace and none is focused, ignoring");
        return Ok(());
    };
    eng.conn.enable_buffering();
    let result = eng.run_layout(workspace_id, Some(event));
    let flushed = eng.conn.disable_buffering();
    result.and(flushed)
}
