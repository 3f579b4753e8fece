//! Reply lines sent back to the host
//!
//! Each reply renders to exactly one line via [`core::fmt::Display`];
//! transports append the line ending.

use core::fmt;

/// Which command family a reply belongs to
///
/// Mood mode answers with `MOOD:` lines, style cycling with `STYLE:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Interactive live-reload personas
    Mood,
    /// Autonomous restart-based style cycling
    Style,
}

impl Channel {
    /// Line prefix for this channel
    pub const fn tag(self) -> &'static str {
        match self {
            Channel::Mood => "MOOD",
            Channel::Style => "STYLE",
        }
    }
}

/// A reply line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply<'a> {
    /// Live reload accepted
    Switching { name: &'a str },
    /// Restart into a new style is imminent
    Rebooting { name: &'a str },
    /// Name did not match any persona
    UnknownName { channel: Channel, name: &'a str },
    /// Header before the persona listing
    ListHeader(Channel),
    /// One persona in the listing
    ListEntry {
        name: &'a str,
        bundle: &'a str,
        current: bool,
    },
    /// Active persona, closes the listing
    Current { channel: Channel, name: &'a str },
    /// Autocycle state
    AutoCycle(bool),
    /// Mood mode status report
    MoodStatus {
        mood: &'a str,
        frames: u32,
        free_ram: usize,
    },
    /// Style cycling status report
    StyleStatus {
        style: &'a str,
        index: usize,
        count: usize,
        autocycle: bool,
        frames: u32,
        free_ram: usize,
    },
    /// Line was not understood
    UnknownCommand(&'a str),
    /// Boot banner for style cycling
    Banner {
        style: &'a str,
        index: usize,
        count: usize,
        autocycle: bool,
    },
    /// Command summary printed at boot
    Help(Channel),
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

impl fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Switching { name } => write!(f, "MOOD:SWITCHING:{}", name),
            Reply::Rebooting { name } => write!(f, "STYLE:REBOOTING:{}", name),
            Reply::UnknownName { channel, name } => {
                write!(f, "UNKNOWN:{}:{}", channel.tag(), name)
            }
            Reply::ListHeader(channel) => write!(f, "{}:LIST", channel.tag()),
            Reply::ListEntry {
                name,
                bundle,
                current,
            } => write!(
                f,
                "  {} -> {}{}",
                name,
                bundle,
                if current { " [current]" } else { "" }
            ),
            Reply::Current { channel, name } => write!(f, "{}:CURRENT:{}", channel.tag(), name),
            Reply::AutoCycle(on) => write!(f, "AUTOCYCLE:{}", on_off(on)),
            Reply::MoodStatus {
                mood,
                frames,
                free_ram,
            } => write!(f, "STATUS:mood={},frames={},freeRAM={}", mood, frames, free_ram),
            Reply::StyleStatus {
                style,
                index,
                count,
                autocycle,
                frames,
                free_ram,
            } => write!(
                f,
                "STATUS:style={},index={}/{},autocycle={},frames={},freeRAM={}",
                style,
                index,
                count,
                on_off(autocycle),
                frames,
                free_ram
            ),
            Reply::UnknownCommand(text) => write!(f, "UNKNOWN:CMD:{}", text),
            Reply::Banner {
                style,
                index,
                count,
                autocycle,
            } => write!(
                f,
                "Eye style: {} ({}/{}) autocycle={}",
                style,
                index,
                count,
                if autocycle { "on (2 min)" } else { "off" }
            ),
            Reply::Help(Channel::Mood) => f.write_str("Commands: MOOD:<name|list|next>, STATUS"),
            Reply::Help(Channel::Style) => {
                f.write_str("Commands: MOOD:<name|list|next>, STATUS, AUTOCYCLE:<on|off>")
            }
        }
    }
}

/// Destination for reply lines
pub trait ReplySink {
    /// Emit one reply line
    fn send(&mut self, reply: &Reply<'_>);
}
