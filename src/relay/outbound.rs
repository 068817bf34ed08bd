//! Matrix -> Gitter relay.
//!
//! Gitter supports Markdown, so the sender label is framed in code notation
//! and emotes are wrapped in emphasis. The message is also echoed by the bot
//! to every other Matrix room linked to the same Gitter room.

use tracing::{info, warn};

use crate::common::metrics::{RECEIVED_MESSAGES, SENT_MESSAGES};
use crate::common::{BridgeError, BridgeResult, HomeMessage, HomeMessageContent, Side};
use crate::network::{RemoteRoom, Services};

use super::formatter::{code_prefixed, code_prefixed_html, emote_for_remote};
use super::{fan_out, FanOutReport};

/// Relay a Matrix message into the Gitter room and echo it to sibling rooms.
///
/// The echo runs even when the Gitter send fails; that failure is returned
/// afterwards.
pub async fn relay_home_message(
    room: &dyn RemoteRoom,
    room_name: &str,
    services: &Services,
    targets: &[String],
    message: &HomeMessage,
) -> BridgeResult<FanOutReport> {
    let counters = services.counters.as_ref();
    counters.inc_counter(RECEIVED_MESSAGES, Side::Home);

    let label = services.mangler.mangle_home_user_id(&message.user_id);
    let body = &message.content.body;

    let sent = if message.content.is_emote() {
        room.send_status(&emote_for_remote(&label, body)).await
    } else {
        room.send(&code_prefixed(&label, body)).await
    };

    let remote_result = match sent {
        Ok(()) => {
            counters.inc_counter(SENT_MESSAGES, Side::Remote);
            info!(room = %room_name, "matrix->{} from {}: {}", room_name, label, body);
            Ok(())
        }
        Err(source) => {
            warn!(room = %room_name, "Failed to send message from {} to Gitter: {}", label, source);
            Err(BridgeError::RemoteSend {
                room: room_name.to_string(),
                source,
            })
        }
    };

    let siblings: Vec<String> = targets
        .iter()
        .filter(|room_id| **room_id != message.room_id)
        .cloned()
        .collect();
    let echo = HomeMessageContent::text(code_prefixed(&label, body))
        .with_html(code_prefixed_html(&label, body));
    let report = fan_out(services.bot.as_ref(), &siblings, &echo, counters, Side::Remote).await;

    remote_result.map(|()| report)
}
