//! Segmenter: split one raw capture into per-command output blocks
//!
//! A line-by-line state machine. A prompt followed by a command, or a bare
//! line whose text is a registered command, opens a block. A bare prompt
//! closes it. Text before the first command is discarded. Pagination
//! artifacts and vendor decoration lines are removed while accumulating.

use crate::dialect::CliDialect;
use crate::errors::{CheckError, Result};
use crate::model::CommandId;
use crate::schema::SchemaRegistry;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;

/// Output of one command as captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentedBlock {
    pub command: CommandId,
    pub output: String,
    /// 1-based line of the command echo; 0 when the transport pre-split blocks
    pub line: usize,
    /// False when the registry has no schema for the command
    pub schematized: bool,
}

/// A command echoed again after its first block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedCommand {
    pub command: CommandId,
    pub line: usize,
}

/// Blocks in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Segmentation {
    blocks: Vec<SegmentedBlock>,
    repeated: Vec<RepeatedCommand>,
}

impl Segmentation {
    pub fn blocks(&self) -> &[SegmentedBlock] {
        &self.blocks
    }

    pub fn get(&self, command: &CommandId) -> Option<&SegmentedBlock> {
        self.blocks.iter().find(|b| &b.command == command)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandId> {
        self.blocks.iter().map(|b| &b.command)
    }

    pub fn unschematized(&self) -> impl Iterator<Item = &SegmentedBlock> {
        self.blocks.iter().filter(|b| !b.schematized)
    }

    /// Later echoes of an already captured command; their output was dropped
    pub fn repeated(&self) -> &[RepeatedCommand] {
        &self.repeated
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn close(&mut self, open: OpenBlock, registry: &SchemaRegistry) {
        if self.get(&open.command).is_some() {
            self.repeated.push(RepeatedCommand {
                command: open.command,
                line: open.line,
            });
            return;
        }
        let schematized = registry.contains(&open.command);
        self.blocks.push(SegmentedBlock {
            schematized,
            command: open.command,
            output: join_output(&open.lines),
            line: open.line,
        });
    }
}

struct OpenBlock {
    command: CommandId,
    line: usize,
    lines: Vec<String>,
}

enum State {
    SeekingCommand,
    InOutput(OpenBlock),
}

/// Split a session transcript into command blocks
///
/// # Errors
///
/// `ERR_SEGMENTATION` when no command boundary is found anywhere.
pub fn segment(text: &str, dialect: &dyn CliDialect, registry: &SchemaRegistry) -> Result<Segmentation> {
    log_op_start!("segment", vendor = %dialect.vendor());
    let start = std::time::Instant::now();

    let mut segmentation = Segmentation::default();
    let mut state = State::SeekingCommand;
    let mut line_count = 0usize;

    for (idx, raw_line) in text.lines().enumerate() {
        line_count += 1;
        let Some(line) = dialect.strip_pagination(raw_line.trim_end_matches('\r')) else {
            continue;
        };
        let line = line.trim_end();

        let opened = match dialect.prompt_command(line) {
            Some(typed) if typed.is_empty() => {
                if let State::InOutput(open) = std::mem::replace(&mut state, State::SeekingCommand) {
                    segmentation.close(open, registry);
                }
                continue;
            }
            Some(typed) => Some(CommandId::new(typed)),
            None => bare_echo(line, registry),
        };

        if let Some(command) = opened {
            if let State::InOutput(open) = std::mem::replace(&mut state, State::SeekingCommand) {
                segmentation.close(open, registry);
            }
            state = State::InOutput(OpenBlock {
                command,
                line: idx + 1,
                lines: Vec::new(),
            });
            continue;
        }

        if let State::InOutput(open) = &mut state {
            if !dialect.is_noise(line) {
                open.lines.push(line.to_string());
            }
        }
    }
    if let State::InOutput(open) = state {
        segmentation.close(open, registry);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    if segmentation.is_empty() {
        let err = CheckError::Segmentation { line_count };
        log_op_error!("segment", err.clone(), duration_ms = duration_ms);
        return Err(err.into());
    }
    report_warnings(&segmentation);
    log_op_end!(
        "segment",
        duration_ms = duration_ms,
        block_count = segmentation.len()
    );
    Ok(segmentation)
}

/// Normalize blocks the transport already split by command
///
/// # Errors
///
/// `ERR_SEGMENTATION` when `blocks` is empty.
pub fn segment_blocks(
    blocks: &[(String, String)],
    dialect: &dyn CliDialect,
    registry: &SchemaRegistry,
) -> Result<Segmentation> {
    log_op_start!("segment", vendor = %dialect.vendor(), presplit = true);
    let start = std::time::Instant::now();

    let mut segmentation = Segmentation::default();
    for (typed, output) in blocks {
        let command = CommandId::new(dialect.prompt_command(typed).unwrap_or(typed));
        if command.is_empty() {
            continue;
        }
        let lines: Vec<String> = output
            .lines()
            .filter_map(|l| dialect.strip_pagination(l.trim_end_matches('\r')))
            .map(|l| l.trim_end().to_string())
            .filter(|l| !dialect.is_noise(l))
            .collect();
        segmentation.close(
            OpenBlock {
                command,
                line: 0,
                lines,
            },
            registry,
        );
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    if segmentation.is_empty() {
        let err = CheckError::Segmentation { line_count: 0 };
        log_op_error!("segment", err.clone(), duration_ms = duration_ms);
        return Err(err.into());
    }
    report_warnings(&segmentation);
    log_op_end!(
        "segment",
        duration_ms = duration_ms,
        block_count = segmentation.len()
    );
    Ok(segmentation)
}

/// A line with no prompt that is exactly a registered command
fn bare_echo(line: &str, registry: &SchemaRegistry) -> Option<CommandId> {
    if line.is_empty() || line.starts_with(char::is_whitespace) {
        return None;
    }
    let candidate = CommandId::new(line);
    registry.contains(&candidate).then_some(candidate)
}

/// Trailing and leading blank lines are not part of the output
fn join_output(lines: &[String]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn report_warnings(segmentation: &Segmentation) {
    for block in segmentation.unschematized() {
        tracing::warn!(
            command = %block.command,
            line = block.line,
            "captured command has no schema, skipping"
        );
    }
    for repeat in segmentation.repeated() {
        tracing::warn!(
            command = %repeat.command,
            line = repeat.line,
            "command echoed again, keeping first block"
        );
    }
}
