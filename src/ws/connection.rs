//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::{QuoteResponse, parse_address, parse_amount};
use crate::domain::{EventFeed, FeedItem};
use crate::error::GatewayError;
use crate::service::PoolService;

/// Error code sent when the client fell behind and events were dropped.
pub const LAGGED_CODE: u32 = 410;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events of the subscribed types from `feed`, each carrying its
///   sequence number.
pub async fn run_connection(
    socket: WebSocket,
    mut feed: EventFeed,
    pool_service: Arc<PoolService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        let outgoing = tokio::select! {
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    handle_text_message(&text, &mut subs, &pool_service).await
                }
                Some(Ok(Message::Close(_))) | None => break,
                _ => None,
            },
            item = feed.next_matching(|event| subs.matches(event.event_type_str())) => match item {
                Some(FeedItem::Event(event)) => {
                    let msg = WsMessage::new(
                        uuid::Uuid::new_v4().to_string(),
                        WsMessageType::Event,
                        serde_json::to_value(&event).unwrap_or_default(),
                    );
                    serde_json::to_string(&msg).ok()
                }
                Some(FeedItem::Lagged { missed }) => {
                    tracing::warn!(missed, "ws client lagged behind event bus");
                    let msg = WsMessage::new(
                        String::new(),
                        WsMessageType::Error,
                        serde_json::json!({
                            "code": LAGGED_CODE,
                            "message": "events were dropped, re-sync with get_state",
                            "missed": missed,
                        }),
                    );
                    serde_json::to_string(&msg).ok()
                }
                None => break,
            },
        };

        if let Some(json) = outgoing
            && ws_tx.send(Message::text(json)).await.is_err()
        {
            break;
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    pool_service: &PoolService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error(String::new(), 400, "malformed JSON"))
            .ok();
    };
    if msg.msg_type != WsMessageType::Command {
        return serde_json::to_string(&WsMessage::error(
            msg.id,
            400,
            "only command messages are accepted",
        ))
        .ok();
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let reply = match command {
        WsCommand::Subscribe { events } => {
            let rejected = subs.subscribe(&events);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.subscribed(),
                    "wildcard": subs.is_subscribed_all(),
                    "rejected": rejected,
                }),
            )
        }
        WsCommand::Unsubscribe { events } => {
            subs.unsubscribe(&events);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": subs.subscribed(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::GetState => {
            let last_sequence = pool_service.event_bus().last_sequence();
            let snapshot = pool_service.snapshot().await;
            let mut state = serde_json::to_value(&snapshot).unwrap_or_default();
            if let Some(fields) = state.as_object_mut() {
                fields.insert("last_sequence".to_string(), last_sequence.into());
            }
            WsMessage::new(msg.id, WsMessageType::Response, state)
        }
        WsCommand::Quote {
            asset_in,
            amount_in,
        } => match quote(pool_service, &asset_in, &amount_in).await {
            Ok(quote) => WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::to_value(&quote).unwrap_or_default(),
            ),
            Err(err) => WsMessage::error(msg.id, err.error_code(), &err.to_string()),
        },
    };
    serde_json::to_string(&reply).ok()
}

async fn quote(
    pool_service: &PoolService,
    asset_in: &str,
    amount_in: &str,
) -> Result<QuoteResponse, GatewayError> {
    let asset_in = parse_address("asset_in", asset_in)?;
    let amount_in = parse_amount("amount_in", amount_in)?;
    let quote = pool_service.quote(asset_in, amount_in).await?;
    Ok(QuoteResponse::from(quote))
}
