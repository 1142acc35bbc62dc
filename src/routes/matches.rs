use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::models::{FindMatchesRequest, FindMatchesResponse};
use crate::routes::{authorize, ApiError, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/find", web::post().to(find_matches));
}

/// Find matching mentors endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "menteeId": "string",
///   "areaId": "string",
///   "limit": 20
/// }
/// ```
///
/// Responds with the area's mentors ranked best-first, each carrying its
/// `matchScore`. No mentors in the area is a successful, empty result.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = authorize(&state, &http_req)?;

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: field_errors={:?}", errors);
        return Err(ApiError::Validation(errors.to_string()));
    }

    let limit = state.matching_settings.resolve_limit(req.limit);

    tracing::info!(
        "Finding mentors for mentee {} in area {} (caller: {}, limit: {:?})",
        req.mentee_id,
        req.area_id,
        caller.user_id,
        limit
    );

    let result = state
        .matching
        .find_mentors(&req.mentee_id, &req.area_id, limit)
        .await?;

    tracing::info!(
        "Returning {} mentors for mentee {} (from {} candidates)",
        result.matches.len(),
        req.mentee_id,
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    }))
}
