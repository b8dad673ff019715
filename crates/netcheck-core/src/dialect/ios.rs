use super::{dialect_pattern, CliDialect, Vendor};
use regex::Regex;
use std::sync::OnceLock;

/// Hostname, optional `(config…)` mode, then `>` or `#`
const PROMPT: &str = r"^[A-Za-z0-9][\w.\-()/:]*[>#](?P<command>.*)$";
/// ` --More-- ` and the backspaces that erase it
const MORE: &str = r"--More--|\x08";
/// Exec-timestamp lines printed ahead of show output
const NOISE: &str = r"^\s*(?:Load for five secs:|Time source is )";

static PROMPT_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MORE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static NOISE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Cisco IOS / IOS-XE
///
/// Prompts look like `host>` or `host#` (with `(config…)` in configuration
/// mode). Pagination prints ` --More-- ` then erases it with backspaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct IosDialect;

impl CliDialect for IosDialect {
    fn vendor(&self) -> Vendor {
        Vendor::Ios
    }

    fn prompt_command<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = dialect_pattern(&PROMPT_RE, PROMPT)?.captures(line)?;
        caps.name("command").map(|m| m.as_str().trim())
    }

    fn strip_pagination(&self, line: &str) -> Option<String> {
        let Some(more) = dialect_pattern(&MORE_RE, MORE).filter(|re| re.is_match(line)) else {
            return Some(line.to_string());
        };
        let cleaned = more.replace_all(line, "");
        let cleaned = cleaned.trim_start();
        if cleaned.trim().is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }

    fn is_noise(&self, line: &str) -> bool {
        dialect_pattern(&NOISE_RE, NOISE).is_some_and(|re| re.is_match(line))
    }
}
