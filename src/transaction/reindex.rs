//! Command-list rewriting.
//!
//! Replacing one command with `n` others moves every later command by
//! `n - 1` positions; `Result`/`NestedResult` arguments that point past the
//! replaced slot are shifted to match, and arguments that pointed at the
//! replaced command itself are redirected to the replacement's output.

use super::argument::Argument;
use super::command::Command;
use crate::error::WasmSuiError;

/// Apply `f` to every argument of every command, with the command's index.
pub fn map_arguments<F>(commands: &mut [Command], mut f: F) -> Result<(), WasmSuiError>
where
    F: FnMut(&mut Argument, usize) -> Result<(), WasmSuiError>,
{
    for (index, command) in commands.iter_mut().enumerate() {
        for arg in command.arguments_mut() {
            f(arg, index)?;
        }
    }
    Ok(())
}

fn to_index(value: usize) -> Result<u16, WasmSuiError> {
    u16::try_from(value)
        .map_err(|_| WasmSuiError::resolution(format!("command index {} out of range", value)))
}

/// Replace `commands[index]` with `replacement`.
///
/// With `result` unset, `Result(index)` becomes `NestedResult(last, 0)` and
/// `NestedResult(index, j)` becomes `NestedResult(last, j)`, where `last` is
/// the final replacement command. With `result` set, `Result(index)` and
/// `NestedResult(index, 0)` become that argument.
pub fn replace_command(
    commands: &mut Vec<Command>,
    index: usize,
    replacement: Vec<Command>,
    result: Option<Argument>,
) -> Result<(), WasmSuiError> {
    if index >= commands.len() {
        return Err(WasmSuiError::resolution(format!(
            "no command at index {} (have {})",
            index,
            commands.len()
        )));
    }
    let count = replacement.len();
    let replaced = to_index(index)?;
    let last = match count {
        0 => None,
        n => Some(to_index(index + n - 1)?),
    };
    let shift = |i: u16| -> Result<u16, WasmSuiError> { to_index(i as usize + count - 1) };

    commands.splice(index..=index, replacement);

    map_arguments(&mut commands[index + count..], |arg, _| {
        let rewritten = match *arg {
            Argument::Result(i) if i == replaced => match (result, last) {
                (Some(result), _) => result,
                (None, Some(last)) => Argument::NestedResult(last, 0),
                (None, None) => {
                    return Err(WasmSuiError::resolution(format!(
                        "result of removed command {} is still referenced",
                        index
                    )))
                }
            },
            Argument::NestedResult(i, j) if i == replaced => match (result, last) {
                (Some(result), _) if j == 0 => result,
                (Some(_), _) => {
                    return Err(WasmSuiError::resolution(format!(
                        "command {} has a single result, NestedResult({}, {}) is invalid",
                        index, i, j
                    )))
                }
                (None, Some(last)) => Argument::NestedResult(last, j),
                (None, None) => {
                    return Err(WasmSuiError::resolution(format!(
                        "result of removed command {} is still referenced",
                        index
                    )))
                }
            },
            Argument::Result(i) if i > replaced => Argument::Result(shift(i)?),
            Argument::NestedResult(i, j) if i > replaced => Argument::NestedResult(shift(i)?, j),
            other => other,
        };
        *arg = rewritten;
        Ok(())
    })
}
