use super::types::{ApiError, IngestParams};
use crate::config::Config;
use crate::error::ProdexError;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[test]
fn params_fold_server_defaults_into_options() {
    let cfg = Config::default();
    let params = IngestParams {
        url: Some("https://shop.example.com/p/1".to_string()),
        minpx: None,
        excludepng: None,
        ..Default::default()
    };
    let opts = params.to_options(&cfg);
    assert_eq!(opts.minpx, Some(cfg.min_image_px));
    assert_eq!(opts.excludepng, Some(cfg.exclude_png));
    assert!(opts.harvest);
    assert!(opts.sanitize);
    assert!(!opts.mainonly);
}

#[test]
fn explicit_params_override_defaults() {
    let cfg = Config::default();
    let params = IngestParams {
        minpx: Some(500),
        excludepng: Some(true),
        harvest: Some(false),
        mainonly: Some(true),
        ..Default::default()
    };
    let opts = params.to_options(&cfg);
    assert_eq!(opts.minpx, Some(500));
    assert_eq!(opts.excludepng, Some(true));
    assert!(!opts.harvest);
    assert!(opts.mainonly);
}

#[test]
fn input_errors_map_to_400() {
    for err in [
        ProdexError::InvalidUrl("x".into()),
        ProdexError::BlockedHost("127.0.0.1".into()),
    ] {
        let resp = ApiError(err).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn insufficiency_maps_to_422_not_5xx() {
    let resp = ApiError(ProdexError::Insufficient).into_response();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn upstream_failures_map_to_502() {
    let render = ProdexError::render_error(Some(503), "upstream said no");
    assert_eq!(
        ApiError(render).into_response().status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ApiError(ProdexError::Timeout("t".into())).into_response().status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ApiError(ProdexError::BodyTooLarge { bytes: 10, limit: 1 })
            .into_response()
            .status(),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn upstream_error_bodies_are_truncated() {
    let huge = "x".repeat(5_000);
    match ProdexError::render_error(Some(502), &huge) {
        ProdexError::Render { body, .. } => assert!(body.len() <= 512),
        other => panic!("unexpected: {other:?}"),
    }
}
