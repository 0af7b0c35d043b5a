use crate::infra::{AppState, Community, SharedCommunity};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use staffdesk::error::AppError;
use staffdesk::workflows::identity::{ChannelId, UserId};
use staffdesk::workflows::jobs::{
    JobPostingRegistry, JobsError, PayRate, PostingChannels, PostingId, PostingKind,
};
use staffdesk::workflows::venues::{VenueError, SIGNUP_EXTRA_SLOTS};
use std::sync::MutexGuard;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateVenueRequest {
    pub(crate) name: String,
    pub(crate) creator: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignupRequest {
    pub(crate) name: String,
    pub(crate) creator: UserId,
    #[serde(default)]
    pub(crate) co_owners: Vec<UserId>,
    #[serde(default)]
    pub(crate) owner_confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportVenueRequest {
    pub(crate) name: String,
    pub(crate) requesting_user: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VenueDetailQuery {
    pub(crate) requesting_user: UserId,
    #[serde(default)]
    pub(crate) admin: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorizeRequest {
    pub(crate) user: UserId,
    pub(crate) requesting_user: UserId,
    #[serde(default)]
    pub(crate) admin: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeauthorizeRequest {
    pub(crate) user: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostVenueRequest {
    pub(crate) requesting_user: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostChannelRequest {
    pub(crate) channel: ChannelId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePostingRequest {
    pub(crate) venue: String,
    pub(crate) contact: UserId,
}

/// Absent fields are left untouched; schedule fields cannot be cleared over
/// PATCH, only replaced.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdatePostingRequest {
    pub(crate) description: Option<String>,
    pub(crate) kind: Option<PostingKind>,
    pub(crate) position: Option<String>,
    pub(crate) pay_rate: Option<PayRate>,
    pub(crate) start: Option<DateTime<Utc>>,
    pub(crate) end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostingChannelsRequest {
    pub(crate) temporary: Option<ChannelId>,
    pub(crate) permanent: Option<ChannelId>,
}

/// Router over the community state. Static segments (`signup`,
/// `post-channel`, `channels`) win over the parameterized routes beside
/// them.
pub(crate) fn community_router(community: SharedCommunity) -> Router {
    Router::new()
        .route(
            "/api/v1/venues",
            post(create_venue_handler).get(venue_report_handler),
        )
        .route("/api/v1/venues/signup", post(signup_handler))
        .route("/api/v1/venues/import", post(import_venue_handler))
        .route("/api/v1/venues/post-channel", put(set_post_channel_handler))
        .route(
            "/api/v1/venues/:name",
            get(venue_detail_handler).delete(remove_venue_handler),
        )
        .route(
            "/api/v1/venues/:name/users",
            post(authorize_handler).delete(deauthorize_handler),
        )
        .route("/api/v1/venues/:name/approve", post(approve_venue_handler))
        .route("/api/v1/venues/:name/post", post(post_venue_handler))
        .route("/api/v1/postings", post(create_posting_handler))
        .route(
            "/api/v1/postings/channels",
            put(set_posting_channels_handler),
        )
        .route(
            "/api/v1/postings/:posting_id",
            get(posting_detail_handler)
                .patch(update_posting_handler)
                .delete(delete_posting_handler),
        )
        .route(
            "/api/v1/postings/:posting_id/publish",
            post(publish_posting_handler),
        )
        .with_state(community)
}

pub(crate) fn with_service_routes(community: SharedCommunity) -> Router {
    community_router(community)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn lock(community: &SharedCommunity) -> MutexGuard<'_, Community> {
    community.lock().expect("community mutex poisoned")
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn create_venue_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<CreateVenueRequest>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.create(&request.name, request.creator) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn signup_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<SignupRequest>,
) -> Response {
    if request.co_owners.len() > SIGNUP_EXTRA_SLOTS {
        return AppError::from(VenueError::TooManyUsers(request.name)).into_response();
    }
    let mut co_owners = [None; SIGNUP_EXTRA_SLOTS];
    for (slot, user) in co_owners.iter_mut().zip(request.co_owners.iter()) {
        *slot = Some(*user);
    }

    let mut guard = lock(&community);
    match guard.venues.self_service_signup(
        &request.name,
        request.creator,
        co_owners,
        request.owner_confirmed,
    ) {
        Ok(view) => (StatusCode::ACCEPTED, Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn import_venue_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<ImportVenueRequest>,
) -> Response {
    let mut guard = lock(&community);
    let directory = guard.directory.clone();
    match guard
        .venues
        .import_from_external(&request.name, request.requesting_user, directory.as_ref())
    {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn venue_report_handler(State(community): State<SharedCommunity>) -> Response {
    let guard = lock(&community);
    (StatusCode::OK, Json(guard.venues.build_report())).into_response()
}

pub(crate) async fn venue_detail_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
    Query(query): Query<VenueDetailQuery>,
) -> Response {
    let guard = lock(&community);
    match guard.venues.detail(&name, query.requesting_user, query.admin) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn remove_venue_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.remove(&name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn authorize_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
    Json(request): Json<AuthorizeRequest>,
) -> Response {
    let mut guard = lock(&community);
    match guard
        .venues
        .authorize(&name, request.user, request.requesting_user, request.admin)
    {
        Ok(outcome) => {
            (StatusCode::OK, Json(json!({ "outcome": outcome.label() }))).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn deauthorize_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
    Json(request): Json<DeauthorizeRequest>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.deauthorize(&name, request.user) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn approve_venue_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.approve(&name) {
        Ok(()) => match guard.venues.by_name(&name) {
            Some(venue) => (StatusCode::OK, Json(venue.to_view())).into_response(),
            None => AppError::from(VenueError::NotFound(name)).into_response(),
        },
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn post_venue_handler(
    State(community): State<SharedCommunity>,
    Path(name): Path<String>,
    Json(request): Json<PostVenueRequest>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.post_venue(&name, request.requesting_user) {
        Ok(outcome) => {
            (StatusCode::OK, Json(json!({ "outcome": outcome.label() }))).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn set_post_channel_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<PostChannelRequest>,
) -> Response {
    let mut guard = lock(&community);
    match guard.venues.set_post_channel(request.channel) {
        Ok(()) => (StatusCode::OK, Json(json!({ "channel": request.channel }))).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn create_posting_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<CreatePostingRequest>,
) -> Response {
    let mut guard = lock(&community);
    let Some(venue_id) = guard
        .venues
        .by_name(&request.venue)
        .map(|venue| venue.id.clone())
    else {
        return AppError::from(JobsError::VenueNotFound(request.venue)).into_response();
    };
    match guard.jobs.create(venue_id, request.contact) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn posting_detail_handler(
    State(community): State<SharedCommunity>,
    Path(posting_id): Path<String>,
) -> Response {
    let id = PostingId(posting_id);
    let guard = lock(&community);
    match guard.jobs.get(&id) {
        Some(posting) => (StatusCode::OK, Json(posting.to_view())).into_response(),
        None => AppError::from(JobsError::NotFound(id)).into_response(),
    }
}

pub(crate) async fn update_posting_handler(
    State(community): State<SharedCommunity>,
    Path(posting_id): Path<String>,
    Json(request): Json<UpdatePostingRequest>,
) -> Response {
    let id = PostingId(posting_id);
    let mut guard = lock(&community);
    match apply_posting_update(&mut guard.jobs, &id, request) {
        Ok(()) => match guard.jobs.get(&id) {
            Some(posting) => (StatusCode::OK, Json(posting.to_view())).into_response(),
            None => AppError::from(JobsError::NotFound(id)).into_response(),
        },
        Err(err) => AppError::from(err).into_response(),
    }
}

fn apply_posting_update(
    jobs: &mut JobPostingRegistry,
    id: &PostingId,
    update: UpdatePostingRequest,
) -> Result<(), JobsError> {
    let UpdatePostingRequest {
        description,
        kind,
        position,
        pay_rate,
        start,
        end,
    } = update;

    if let Some(description) = description {
        jobs.set_description(id, description)?;
    }
    if let Some(kind) = kind {
        jobs.set_kind(id, kind)?;
    }
    if let Some(position) = position {
        jobs.set_position(id, position)?;
    }
    if let Some(pay_rate) = pay_rate {
        jobs.set_pay_rate(id, pay_rate)?;
    }
    if let Some(start) = start {
        jobs.set_start(id, Some(start))?;
    }
    if let Some(end) = end {
        jobs.set_end(id, Some(end))?;
    }
    Ok(())
}

pub(crate) async fn publish_posting_handler(
    State(community): State<SharedCommunity>,
    Path(posting_id): Path<String>,
) -> Response {
    let id = PostingId(posting_id);
    let mut guard = lock(&community);
    let Some(venue_id) = guard.jobs.get(&id).map(|posting| posting.venue.clone()) else {
        return AppError::from(JobsError::NotFound(id)).into_response();
    };
    let Some(venue_name) = guard
        .venues
        .by_id(&venue_id)
        .map(|venue| venue.name.clone())
    else {
        return AppError::from(JobsError::VenueNotFound(venue_id.0)).into_response();
    };
    let channels = guard.posting_channels;
    match guard.jobs.publish(&id, &venue_name, channels) {
        Ok(outcome) => {
            (StatusCode::OK, Json(json!({ "outcome": outcome.label() }))).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn delete_posting_handler(
    State(community): State<SharedCommunity>,
    Path(posting_id): Path<String>,
) -> Response {
    let id = PostingId(posting_id);
    let mut guard = lock(&community);
    match guard.jobs.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn set_posting_channels_handler(
    State(community): State<SharedCommunity>,
    Json(request): Json<PostingChannelsRequest>,
) -> Response {
    let mut guard = lock(&community);
    guard.posting_channels = PostingChannels {
        temporary: request.temporary,
        permanent: request.permanent,
    };
    (
        StatusCode::OK,
        Json(json!({
            "temporary": guard.posting_channels.temporary,
            "permanent": guard.posting_channels.permanent,
        })),
    )
        .into_response()
}
