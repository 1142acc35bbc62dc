use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::models::{ListMentorsQuery, MentorListResponse};
use crate::routes::{authorize, ApiError, AppState};

/// Configure profile lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/mentees/{mentee_id}", web::get().to(get_mentee))
        .route("/mentors", web::get().to(list_mentors))
        .route("/mentors/{mentor_id}", web::get().to(get_mentor));
}

/// GET /api/v1/mentees/{mentee_id}
async fn get_mentee(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authorize(&state, &http_req)?;

    let mentee = state.store.get_mentee(&path).await?;
    Ok(HttpResponse::Ok().json(mentee))
}

/// GET /api/v1/mentors?areaId={areaId}
///
/// Unranked listing, in store order.
async fn list_mentors(
    state: web::Data<AppState>,
    query: web::Query<ListMentorsQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authorize(&state, &http_req)?;
    query
        .validate()
        .map_err(|errors| ApiError::Validation(errors.to_string()))?;

    let mentors = state.store.list_mentors(&query.area_id).await?;
    tracing::debug!("Listing {} mentors for area {}", mentors.len(), query.area_id);

    Ok(HttpResponse::Ok().json(MentorListResponse {
        total: mentors.len(),
        mentors,
    }))
}

/// GET /api/v1/mentors/{mentor_id}
async fn get_mentor(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authorize(&state, &http_req)?;

    let mentor = state.store.get_mentor(&path).await?;
    Ok(HttpResponse::Ok().json(mentor))
}
