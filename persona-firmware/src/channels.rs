//! Inter-task communication channels
//!
//! The serial tasks only move lines; all command handling happens in the
//! eye task so it never races a reload.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use persona_core::reload::PipelineGate;
use persona_protocol::Line;

/// Longest reply line
pub const REPLY_LEN: usize = 96;

/// Rendered reply, without line ending
pub type ReplyLine = heapless::String<REPLY_LEN>;

/// Channel capacity for received command lines
const LINE_CHANNEL_SIZE: usize = 4;

/// Channel capacity for reply lines (fits a full style listing)
const REPLY_CHANNEL_SIZE: usize = 24;

/// Complete command lines from the serial console
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> =
    Channel::new();

/// Reply lines for the serial console
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, ReplyLine, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Render pipeline gate, closed while a reload runs
pub static PIPELINE_GATE: PipelineGate = PipelineGate::new();
