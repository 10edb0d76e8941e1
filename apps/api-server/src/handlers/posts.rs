//! Post submission and client review handlers.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use uuid::Uuid;

use approval_core::domain::{Post, PostDraft};
use approval_core::workflow::{ReviewView, Reviewed};
use approval_shared::dto::{
    DecisionResponse, FeedbackRequest, PostResponse, SubmitPostRequest, SubmittedResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        status: post.status().to_string(),
        feedback: post.feedback().map(str::to_string),
        image: post.image,
        text: post.text,
        date: post.date,
        created_at: post.created_at,
    }
}

fn decision_response(reviewed: Reviewed) -> DecisionResponse {
    DecisionResponse {
        message: reviewed.confirmation.message().to_string(),
        post: post_response(reviewed.post),
    }
}

/// A malformed id in a link resolves to nothing, like an unknown one.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!(post_id = %raw, "Malformed post id");
        AppError::NotFound("This post does not exist or is no longer available.".to_string())
    })
}

fn origin(state: &AppState, req: &HttpRequest) -> String {
    match &state.public_origin {
        Some(origin) => origin.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

/// POST /api/posts
pub async fn submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SubmitPostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let draft = PostDraft {
        image: body.image,
        text: body.text,
        date: body.date,
    };

    let submitted = state.submissions.submit(draft, &origin(&state, &req)).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/posts/{}", submitted.post.id)))
        .json(SubmittedResponse {
            post: post_response(submitted.post),
            link: submitted.link,
        }))
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .listing
        .current()
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    match state.reviews.load(id).await? {
        ReviewView::Found(post) => Ok(HttpResponse::Ok().json(post_response(post))),
        ReviewView::NotFound => Err(AppError::NotFound(
            "This post does not exist or is no longer available.".to_string(),
        )),
    }
}

/// POST /api/posts/{id}/approve
pub async fn approve(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let reviewed = state.reviews.approve(id).await?;

    Ok(HttpResponse::Ok().json(decision_response(reviewed)))
}

/// POST /api/posts/{id}/feedback
pub async fn feedback(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FeedbackRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let text = body.into_inner().feedback.unwrap_or_default();
    let reviewed = state.reviews.submit_feedback(id, &text).await?;

    Ok(HttpResponse::Ok().json(decision_response(reviewed)))
}
