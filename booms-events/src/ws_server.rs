//! WebSocket surface for the event bus (C10). Adapted from the
//! teacher's single global connection map into one broadcast
//! subscription per connection, scoped to the topic the client asks
//! for in the URL.

use std::sync::Arc;

use axum::{
    extract::{ws::{Message, WebSocket}, Path, State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};

use crate::bus::EventBus;
use crate::event::Topic;

async fn healthcheck() -> &'static str {
    "ok"
}

pub fn router(bus: Arc<EventBus>) -> Router {
    Router::new()
        .route("/", get(healthcheck))
        .route("/ws/user/:user_id", get(user_handler))
        .route("/ws/boom/:boom_id", get(boom_handler))
        .route("/ws/treasury", get(treasury_handler))
        .with_state(bus)
}

pub async fn serve(bus: Arc<EventBus>, port: u16) -> std::io::Result<()> {
    let app = router(bus);
    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "event bus listening");
    axum::serve(listener, app).await
}

async fn user_handler(
    ws: WebSocketUpgrade,
    State(bus): State<Arc<EventBus>>,
    Path(user_id): Path<i64>,
) -> Response {
    ws.on_upgrade(move |socket| stream_topic(socket, bus, Topic::User(user_id)))
}

async fn boom_handler(
    ws: WebSocketUpgrade,
    State(bus): State<Arc<EventBus>>,
    Path(boom_id): Path<i64>,
) -> Response {
    ws.on_upgrade(move |socket| stream_topic(socket, bus, Topic::Boom(boom_id)))
}

async fn treasury_handler(ws: WebSocketUpgrade, State(bus): State<Arc<EventBus>>) -> Response {
    ws.on_upgrade(move |socket| stream_topic(socket, bus, Topic::Treasury))
}

async fn stream_topic(mut socket: WebSocket, bus: Arc<EventBus>, topic: Topic) {
    let mut receiver = bus.subscribe(topic);
    loop {
        tokio::select! {
            event = receiver.recv() => {
                match event {
                    Ok(event) => {
                        let payload = match serde_json::to_string(&event) {
                            Ok(payload) => payload,
                            Err(err) => {
                                tracing::error!(%err, "failed to serialize event");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber lagged, some events were dropped");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                if incoming.is_none() {
                    break;
                }
            }
        }
    }
}
