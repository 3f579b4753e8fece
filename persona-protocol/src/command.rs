//! Command parsing
//!
//! Commands are `VERB:ARGUMENT` or a bare word. Verbs and the fixed
//! arguments (`list`, `next`, `on`, `off`) are matched ignoring ASCII case;
//! names are passed through untouched so the registry decides how to
//! compare them.

/// Mood verb prefix
pub const MOOD_PREFIX: &str = "MOOD:";

/// Autocycle verb prefix
pub const AUTOCYCLE_PREFIX: &str = "AUTOCYCLE:";

/// Status verb
pub const STATUS_VERB: &str = "STATUS";

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// `MOOD:<name>` - select a persona by name
    Select(&'a str),
    /// `MOOD:list` - enumerate personas
    List,
    /// `MOOD:next` - advance to the next persona in table order
    Next,
    /// `STATUS` - report liveness
    Status,
    /// `AUTOCYCLE:on` / `AUTOCYCLE:off`
    AutoCycle(bool),
    /// Anything else, trimmed
    ///
    /// Style cycling treats a bare word as a persona name; everything
    /// else reports it as unknown.
    Other(&'a str),
}

/// Parse a command line
///
/// Leading and trailing whitespace is ignored. Returns `None` for a
/// blank line.
pub fn parse_command(line: &str) -> Option<Command<'_>> {
    let cmd = line.trim();
    if cmd.is_empty() {
        return None;
    }

    if let Some(arg) = strip_prefix_ignore_case(cmd, MOOD_PREFIX) {
        let command = if arg.eq_ignore_ascii_case("list") {
            Command::List
        } else if arg.eq_ignore_ascii_case("next") {
            Command::Next
        } else {
            Command::Select(arg)
        };
        return Some(command);
    }

    if let Some(arg) = strip_prefix_ignore_case(cmd, AUTOCYCLE_PREFIX) {
        if arg.eq_ignore_ascii_case("on") {
            return Some(Command::AutoCycle(true));
        }
        if arg.eq_ignore_ascii_case("off") {
            return Some(Command::AutoCycle(false));
        }
        return Some(Command::Other(cmd));
    }

    if cmd.eq_ignore_ascii_case(STATUS_VERB) {
        return Some(Command::Status);
    }

    Some(Command::Other(cmd))
}

/// Strip `prefix` from `s` ignoring ASCII case
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
