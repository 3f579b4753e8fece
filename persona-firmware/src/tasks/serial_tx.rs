//! Serial console transmit task

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use persona_protocol::{Reply, ReplySink};

use crate::channels::{ReplyLine, REPLY_CHANNEL};

/// Queues replies for [`serial_tx_task`]
///
/// Never blocks: a full channel drops the line.
pub struct ChannelSink;

impl ReplySink for ChannelSink {
    fn send(&mut self, reply: &Reply<'_>) {
        debug!("TX: {:?}", reply);
        let mut line = ReplyLine::new();
        if write!(line, "{}", reply).is_err() {
            warn!("Reply truncated");
        }
        if REPLY_CHANNEL.try_send(line).is_err() {
            warn!("Reply channel full, dropping line");
        }
    }
}

/// Serial TX task - writes reply lines with CRLF endings
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let line = REPLY_CHANNEL.receive().await;
        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send reply: {:?}", e);
            continue;
        }
        if let Err(e) = tx.write_all(b"\r\n").await {
            warn!("Failed to send line ending: {:?}", e);
        }
    }
}
