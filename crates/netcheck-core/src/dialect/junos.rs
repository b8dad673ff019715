use super::{dialect_pattern, CliDialect, Vendor};
use regex::Regex;
use std::sync::OnceLock;

/// Optional routing-engine tag, `user@host`, then `>` or `#`
const PROMPT: &str = r"^\s*(?:\{[^}\s]+\}\s*)?[A-Za-z0-9][\w.-]*@[A-Za-z0-9][\w.-]*[>#](?P<command>.*)$";
/// The marker swallows the blanks Junos prints before redrawing the line
const MORE: &str = r"---\(more(?: \d+%)?\)---\s*";
/// `{master}`, `{backup}`, `{master:0}`, `{primary:node0}`
const RE_TAG: &str = r"^\{[^}\s]+\}$";

static PROMPT_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MORE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static RE_TAG_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Juniper Junos
///
/// Prompts look like `user@host>` (operational) or `user@host#` (configuration).
/// Pagination prints `---(more)---` or `---(more 42%)---`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunosDialect;

impl CliDialect for JunosDialect {
    fn vendor(&self) -> Vendor {
        Vendor::Junos
    }

    fn prompt_command<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = dialect_pattern(&PROMPT_RE, PROMPT)?.captures(line)?;
        caps.name("command").map(|m| m.as_str().trim())
    }

    fn strip_pagination(&self, line: &str) -> Option<String> {
        let Some(more) = dialect_pattern(&MORE_RE, MORE).filter(|re| re.is_match(line)) else {
            return Some(line.to_string());
        };
        let out = more.replace_all(line, "");
        if out.trim().is_empty() {
            None
        } else {
            Some(out.into_owned())
        }
    }

    fn is_noise(&self, line: &str) -> bool {
        let trimmed = line.trim();
        dialect_pattern(&RE_TAG_RE, RE_TAG).is_some_and(|re| re.is_match(trimmed))
            || trimmed.starts_with("[edit")
    }
}
