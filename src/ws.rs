use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use tracing::debug;

use crate::AppState;

/// Upgrade to a WebSocket and stream change events to the client until it
/// disconnects. Each connection gets its own forwarding task; a failed send
/// means the peer went away and simply ends the session.
pub async fn ws_handler(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let (response, mut session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let hub = state.hub.clone();
    let (client_id, mut events) = hub.subscribe();
    debug!(
        %client_id,
        subscribers = hub.subscriber_count(),
        "change feed subscriber connected"
    );

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(payload) => {
                        if session.text(payload).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                msg = msg_stream.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                },
            }
        }

        hub.unsubscribe(&client_id);
        let _ = session.close(None).await;
        debug!(
            %client_id,
            subscribers = hub.subscriber_count(),
            "change feed subscriber disconnected"
        );
    });

    Ok(response)
}
