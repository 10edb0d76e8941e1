//! Live listing over Server-Sent Events.

use std::convert::Infallible;

use actix_web::{HttpResponse, http::header, web};
use futures::stream;

use approval_core::domain::Post;
use approval_shared::dto::PostResponse;

use super::posts::post_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Encode one snapshot as a `posts` event.
fn snapshot_event(posts: &[Post]) -> Option<web::Bytes> {
    let body: Vec<PostResponse> = posts.iter().cloned().map(post_response).collect();
    match serde_json::to_string(&body) {
        Ok(json) => Some(web::Bytes::from(format!("event: posts\ndata: {json}\n\n"))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode post snapshot");
            None
        }
    }
}

/// GET /api/posts/live
///
/// Streams the full post list, newest first, now and after every change.
/// The subscription lives as long as the response stream: when the client
/// disconnects, actix drops the stream and the session with it.
pub async fn live(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let session = state.listing.activate().await?;

    let events = stream::unfold(session, |mut session| async move {
        let event = snapshot_event(session.refresh().await?)?;
        Some((Ok::<_, Infallible>(event), session))
    });

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events))
}
