// Integration tests for Trade Match

use actix_web::{http::StatusCode, test as actix_test, web, App};
use trade_match::config::{Settings, WeightsConfig};
use trade_match::core::{
    generate_reason, normalize, rank, MatchingConfig, Matcher, Normalizer, ReasonTier, ScoringConfig,
};
use trade_match::models::{
    AccountRecord, AccountTradeProfile, CertificationList, DatasetRow, ErrorResponse, FlagValue, ImpactLevel,
    LooseNumber, NewsEvent, Profile, RankResponse, RiskResponse, TradeRole,
};
use trade_match::routes::{self, matches::AppState};
use trade_match::services::RiskCache;

fn create_account(id: &str, industry: &str, country: &str, volume: f64, role: TradeRole) -> Profile {
    let record = AccountRecord {
        id: id.to_string(),
        role: Some(role.to_string()),
        trade_profile: Some(AccountTradeProfile {
            industry: Some(industry.to_string()),
            country: Some(country.to_string()),
            region: Some("Punjab".to_string()),
            capacity: Some(LooseNumber::Number(volume)),
            quantity_required: Some(LooseNumber::Number(volume)),
            ..Default::default()
        }),
    };
    normalize(&record.into(), role)
}

fn create_importer_row(id: &str, industry: &str, country: &str, seed: usize) -> Profile {
    let unit = |k: usize| ((seed * 37 + k * 11) % 101) as f64 / 100.0;
    let row = DatasetRow {
        buyer_id: Some(id.to_string()),
        industry: Some(industry.to_string()),
        country: Some(country.to_string()),
        avg_order_tons: Some(5.0 + (seed * 13 % 400) as f64),
        revenue_size_usd: Some(50_000.0 * (1 + seed % 40) as f64),
        team_size: Some((5 + seed % 300) as f64),
        certification: Some(CertificationList::Text(
            ["ISO 9001", "CE", "FDA", "GMP"][..seed % 5].join(","),
        )),
        intent_score: Some(unit(1)),
        good_payment_history: Some(unit(2)),
        prompt_response: Some(unit(3)),
        response_probability: Some(unit(4)),
        engagement_spike: Some(unit(5)),
        decision_maker_change: Some(unit(6)),
        hiring_growth: Some(unit(7)),
        war_event: Some(unit(8)),
        msme_udyam: Some(FlagValue::Number((seed % 2) as f64)),
        ..Default::default()
    };
    normalize(&row.into(), TradeRole::Importer)
}

fn create_exporter_row(id: &str, industry: &str, capacity: f64) -> Profile {
    let row = DatasetRow {
        exporter_id: Some(id.to_string()),
        industry: Some(industry.to_string()),
        state: Some("Maharashtra".to_string()),
        manufacturing_capacity_tons: Some(capacity),
        ..Default::default()
    };
    normalize(&row.into(), TradeRole::Exporter)
}

fn sample_events() -> Vec<NewsEvent> {
    vec![
        NewsEvent::new("Textiles", ImpactLevel::High)
            .with_tariff_change(-0.15)
            .with_published_at("2024-12-01"),
        NewsEvent::new("Chemicals", ImpactLevel::Medium)
            .with_war()
            .with_published_at("2024-03-10 08:00:00"),
        NewsEvent::new("Solar", ImpactLevel::Low).with_natural_calamity(),
    ]
}

#[test]
fn test_integration_range_and_breakdown_bounds() {
    let industries = ["Textiles", "Chemicals", "Solar", "Spices"];
    let countries = ["USA", "Germany", "Australia", "Brazil", "UK"];
    let candidates: Vec<Profile> = (0..200)
        .map(|i| {
            create_importer_row(
                &format!("BUY_{:04}", i),
                industries[i % industries.len()],
                countries[i % countries.len()],
                i,
            )
        })
        .collect();
    let events = sample_events();

    for (n, capacity) in [1.0, 80.0, 1000.0, 250_000.0].iter().enumerate() {
        let anchor = create_exporter_row(&format!("EXP_{}", n), industries[n], *capacity);
        let results = rank(&anchor, &candidates, &events);

        assert_eq!(results.len(), candidates.len());
        for r in &results {
            assert!((45..=98).contains(&r.score), "Score {} out of range for {}", r.score, r.candidate_id);
            for (name, value) in r.breakdown.entries() {
                assert!(value <= 100, "{} = {} for {}", name, value, r.candidate_id);
            }
        }
    }
}

#[test]
fn test_integration_sort_invariant_with_ties() {
    let anchor = create_exporter_row("EXP_1", "Textiles", 700.0);
    // Checksum-equal ids with identical fields produce identical scores
    let mut candidates = vec![
        create_importer_row("XY", "Textiles", "USA", 3),
        create_importer_row("BUY_0100", "Textiles", "Brazil", 9),
        create_importer_row("YX", "Textiles", "USA", 3),
    ];
    candidates.extend((0..30).map(|i| create_importer_row(&format!("B{}", i), "Textiles", "UK", i)));

    let results = rank(&anchor, &candidates, &[]);

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score, "Not sorted: {} then {}", pair[0].score, pair[1].score);
    }

    let xy = results.iter().position(|r| r.candidate_id == "XY").unwrap();
    let yx = results.iter().position(|r| r.candidate_id == "YX").unwrap();
    assert_eq!(results[xy].score, results[yx].score);
    assert!(xy < yx, "Ties must keep input order");
}

#[test]
fn test_integration_rank_twice_is_byte_identical() {
    let anchor = create_account("anchor", "Chemicals", "India", 900.0, TradeRole::Exporter);
    let candidates: Vec<Profile> = (0..50)
        .map(|i| create_importer_row(&format!("BUY_{:03}", i), "Chemicals", "Germany", i))
        .collect();
    let events = sample_events();

    let first = serde_json::to_string(&rank(&anchor, &candidates, &events)).unwrap();
    let second = serde_json::to_string(&rank(&anchor, &candidates, &events)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_scenario_high_corridor_oversupply() {
    let exporter = create_account("exp-1", "Textiles", "India", 1000.0, TradeRole::Exporter);
    let importer = create_account("imp-1", "Textiles", "USA", 50.0, TradeRole::Importer);

    let results = rank(&exporter, &[importer.clone()], &[]);
    let top = &results[0];

    assert!(top.score > 70, "Expected strong tier, got {}", top.score);
    assert!(top.breakdown.demand_fit >= 80);
    assert_eq!(top.breakdown.geo_fit, 73);
    assert_eq!(ReasonTier::select(top.score, &top.breakdown), ReasonTier::Strong);
    assert_eq!(top.reason, generate_reason(top.score, &top.breakdown, &importer));
    assert!(top.reason.contains("Textiles") && top.reason.contains("USA"));
}

#[test]
fn test_scenario_no_overlap_neutral_defaults() {
    let exporter = create_exporter_row("EXP_42", "Textiles", 1000.0);
    // BUY_001 has zero jitter
    let row = DatasetRow {
        buyer_id: Some("BUY_001".to_string()),
        industry: Some("Chemicals".to_string()),
        country: Some("Brazil".to_string()),
        ..Default::default()
    };
    let importer = normalize(&row.into(), TradeRole::Importer);

    let results = rank(&exporter, &[importer], &[]);
    let only = &results[0];

    assert!(only.score >= 45 && only.score <= 70, "Expected near the floor, got {}", only.score);
    assert_eq!(ReasonTier::select(only.score, &only.breakdown), ReasonTier::Baseline);
    assert!(only.reason.starts_with("Verified lead"), "{}", only.reason);
}

#[test]
fn test_anchor_role_flips_exporter_side() {
    let importer_anchor = create_account("buyer", "Solar", "Australia", 120.0, TradeRole::Importer);
    let exporters = vec![
        create_exporter_row("EXP_A", "Solar", 360.0),
        create_exporter_row("EXP_B", "Solar", 40_000.0),
    ];

    let results = rank(&importer_anchor, &exporters, &[]);
    let a = results.iter().find(|r| r.candidate_id == "EXP_A").unwrap();
    let b = results.iter().find(|r| r.candidate_id == "EXP_B").unwrap();

    // 3x oversupply is still a perfect fit; 333x is not
    assert!(a.breakdown.demand_fit > b.breakdown.demand_fit);
}

#[test]
fn test_fixture_weights_from_toml() {
    let weights: WeightsConfig = toml::from_str(
        r#"
        version = "fixture-demand-only"
        demand_fit = 1.0
        geo_fit = 0.0
        behavioral_fit = 0.0
        reliability = 0.0
        scale_fit = 0.0
        outreach_receptiveness = 0.0
        momentum = 0.0
        trade_signal = 0.0
        safety_score = 0.0
        "#,
    )
    .unwrap();

    let matcher = Matcher::new(MatchingConfig {
        scoring: ScoringConfig {
            weights: weights.to_weights(),
            ..ScoringConfig::default()
        },
        version: weights.version.clone(),
        ..MatchingConfig::default()
    });

    let exporter = create_exporter_row("EXP_1", "Textiles", 100.0);
    // Need 50, ratio 2, perfect demand fit; zero jitter for BUY_001
    let mut importer = create_importer_row("BUY_001", "Textiles", "USA", 0);
    importer.need = Some(50.0);

    let results = matcher.rank(&exporter, &[importer], &[]);

    assert_eq!(matcher.version(), "fixture-demand-only");
    assert_eq!(results[0].score, 98);
}

#[test]
fn test_default_config_file_matches_builtin_tables() {
    let settings: Settings = toml::from_str(include_str!("../config/default.toml")).unwrap();

    assert!(settings.matching.validate().is_ok());
    assert_eq!(settings.matching.weights.to_weights(), trade_match::ScoringWeights::default());
    assert_eq!(settings.matching.corridor_table(), trade_match::core::CorridorTable::default());
    assert_eq!(settings.server.port, 8080);
}

fn app_state(max_limit: u16) -> web::Data<AppState> {
    web::Data::new(AppState {
        matcher: Matcher::default(),
        normalizer: Normalizer::default(),
        risk_cache: RiskCache::new(64, 60),
        max_limit,
    })
}

#[actix_web::test]
async fn test_http_rank_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(100))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(serde_json::json!({
            "anchorRole": "exporter",
            "anchor": {
                "source": "account",
                "_id": "acc-1",
                "tradeProfile": { "industry": "Textiles", "country": "India", "capacity": "1,000 tons" }
            },
            "candidates": [
                { "source": "dataset", "Buyer_ID": "BUY_001", "Industry": "Chemicals", "Country": "Brazil" },
                { "source": "account", "id": "imp-1", "tradeProfile": { "industry": "Textiles", "country": "USA", "quantityRequired": 50 } },
                { "source": "dataset", "Buyer_ID": "BUY_010", "Industry": "Textiles", "Country": "UK", "MSME_Udyam": "1" }
            ],
            "events": [
                { "Affected_Industry": "Textiles", "Impact_Level": "High", "Tariff_Change": 0.1, "Date": "2024-12-15" }
            ],
            "limit": 2
        }))
        .to_request();

    let resp: RankResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.scoring_version, "cc-2025.1");
    assert_eq!(resp.total_candidates, 3);
    assert_eq!(resp.matches.len(), 2);
    assert!(resp.matches[0].score >= resp.matches[1].score);
    assert!(uuid::Uuid::parse_str(&resp.request_id).is_ok());
}

#[actix_web::test]
async fn test_http_rank_validation_error() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(100))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(serde_json::json!({
            "anchorRole": "importer",
            "anchor": { "source": "dataset", "Buyer_ID": "BUY_9" },
            "limit": 0
        }))
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.error, "Validation failed");
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_http_malformed_json() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(100))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"anchorRole\": \"admin\"")
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");
}

#[actix_web::test]
async fn test_http_risk_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(100))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/risk")
        .set_json(serde_json::json!({
            "events": [
                { "industry": "Solar", "impactLevel": "High", "warFlag": 1, "publishedAt": "2025-01-01" },
                { "industry": "Textiles", "impactLevel": "Medium", "tariffChange": 0.4 }
            ]
        }))
        .to_request();

    let resp: RiskResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.industries.len(), 2);
    assert!((resp.industries["Solar"] - 0.30).abs() < 1e-9);
    assert!((resp.industries["Textiles"] - 0.10).abs() < 1e-9);
}

#[actix_web::test]
async fn test_http_health() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(100))
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert!(resp.status().is_success());
}
