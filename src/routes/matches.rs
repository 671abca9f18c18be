use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Matcher, Normalizer};
use crate::models::{
    ErrorResponse, HealthResponse, Profile, RankRequest, RankResponse, RiskRequest, RiskResponse,
};
use crate::services::RiskCache;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub normalizer: Normalizer,
    pub risk_cache: RiskCache,
    pub max_limit: u16,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/risk", web::post().to(industry_risk));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank candidates endpoint
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "anchorRole": "exporter",
///   "anchor": { "source": "account", "id": "u-1", "tradeProfile": { "industry": "Textiles" } },
///   "candidates": [{ "source": "dataset", "Buyer_ID": "BUY_001", "Country": "USA" }],
///   "events": [{ "industry": "Textiles", "impactLevel": "High", "tariffChange": 0.1 }],
///   "limit": 20
/// }
/// ```
async fn rank_matches(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let candidate_role = req.anchor_role.opposite();

    let anchor = state.normalizer.normalize(&req.anchor, req.anchor_role);
    let candidates: Vec<Profile> = req
        .candidates
        .iter()
        .map(|record| state.normalizer.normalize(record, candidate_role))
        .collect();

    tracing::info!(
        "Ranking {} {} candidates for {} {} against {} events",
        candidates.len(),
        candidate_role,
        req.anchor_role,
        anchor.id,
        req.events.len()
    );

    let risk = match state.risk_cache.get_or_compute(&state.matcher, &req.events).await {
        Ok(risk) => risk,
        Err(e) => {
            tracing::error!("Failed to aggregate industry risk: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to aggregate industry risk".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let mut matches = state.matcher.rank_with_risk(&anchor, &candidates, &risk);

    let limit = req.limit.unwrap_or(state.max_limit).min(state.max_limit) as usize;
    matches.truncate(limit);

    let response = RankResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        scoring_version: state.matcher.version().to_string(),
        total_candidates: candidates.len(),
        matches,
    };

    tracing::info!(
        "Returning {} matches for {} (from {} candidates)",
        response.matches.len(),
        anchor.id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Aggregate industry risk endpoint
///
/// POST /api/v1/risk
async fn industry_risk(
    state: web::Data<AppState>,
    req: web::Json<RiskRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.risk_cache.get_or_compute(&state.matcher, &req.events).await {
        Ok(risk) => {
            let industries = risk
                .iter()
                .map(|(industry, value)| (industry.clone(), *value))
                .collect();
            HttpResponse::Ok().json(RiskResponse { industries })
        }
        Err(e) => {
            tracing::error!("Failed to aggregate industry risk: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to aggregate industry risk".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    fn state(max_limit: u16) -> web::Data<AppState> {
        web::Data::new(AppState {
            matcher: Matcher::default(),
            normalizer: Normalizer::default(),
            risk_cache: RiskCache::new(16, 60),
            max_limit,
        })
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().app_data(state(10)).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
    }

    #[actix_web::test]
    async fn test_limit_capped_by_settings() {
        let app = test::init_service(App::new().app_data(state(2)).configure(configure)).await;
        let candidates: Vec<serde_json::Value> = (0..5)
            .map(|i| serde_json::json!({ "source": "dataset", "Buyer_ID": format!("BUY_{:03}", i) }))
            .collect();
        let req = test::TestRequest::post()
            .uri("/matches/rank")
            .set_json(serde_json::json!({
                "anchorRole": "exporter",
                "anchor": { "source": "dataset", "Exporter_ID": "EXP_1" },
                "candidates": candidates,
                "limit": 50
            }))
            .to_request();
        let resp: RankResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_candidates, 5);
        assert_eq!(resp.matches.len(), 2);
    }
}
