//! Serial command protocol
//!
//! This crate defines the text protocol spoken over the USB/UART console
//! at 115200 baud. It is deliberately tiny: one ASCII command per line in,
//! zero or more reply lines out.
//!
//! # Protocol Overview
//!
//! ```text
//! host  → device   MOOD:angry\n
//! device → host    MOOD:SWITCHING:angry\r\n
//! ```
//!
//! Verbs are matched case-insensitively. Anything the device does not
//! understand is echoed back as `UNKNOWN:CMD:<text>`; nothing a host can
//! send makes the device stop rendering.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod reply;

pub use command::{parse_command, Command};
pub use line::{Line, LineBuffer, LINE_BUFFER_SIZE, MAX_LINE_LEN, REPLACEMENT};
pub use reply::{Channel, Reply, ReplySink};
