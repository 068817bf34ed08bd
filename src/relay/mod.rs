//! Message relay between Gitter and Matrix.
//!
//! - `formatter`: markup escaping, mention stripping, sender framing
//! - `diff`: edit reconstruction and the per-sender message cache
//! - `inbound`: Gitter -> Matrix
//! - `outbound`: Matrix -> Gitter, plus echo to sibling Matrix rooms

pub mod diff;
pub mod formatter;
pub mod inbound;
pub mod outbound;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::common::metrics::SENT_MESSAGES;
use crate::common::{Counters, HomeMessageContent, Side};
use crate::network::HomeSender;

pub use diff::{diff_edit, EditCache, EditDiff};
pub use inbound::{build_home_content, IgnoreReason, InboundOutcome, InboundRelay};
pub use outbound::relay_home_message;

/// Result of sending one message to several Matrix rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
}

/// Send `content` to every room in `targets` concurrently.
///
/// A failing room is logged and reported; it never holds back the others.
/// Each delivery bumps `sent_messages` for `side`.
pub(crate) async fn fan_out(
    sender: &dyn HomeSender,
    targets: &[String],
    content: &HomeMessageContent,
    counters: &dyn Counters,
    side: Side,
) -> FanOutReport {
    let sends = targets.iter().map(|room_id| async move {
        let result = sender.send_message(room_id, content).await;
        (room_id, result)
    });

    let mut report = FanOutReport::default();
    for (room_id, result) in join_all(sends).await {
        match result {
            Ok(()) => {
                counters.inc_counter(SENT_MESSAGES, side);
                debug!(target_room = %room_id, "Delivered message");
                report.delivered.push(room_id.clone());
            }
            Err(e) => {
                warn!(target_room = %room_id, "Failed to deliver message: {}", e);
                report.failed.push(room_id.clone());
            }
        }
    }
    report
}
