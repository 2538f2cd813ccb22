use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use promopal_db::models::{Channel, PromoCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::subscriptions;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

fn user_id_required() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: "User ID required".to_string(),
        }),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct PromocodesQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromocodesResponse {
    pub access: bool,
    pub promocodes: Vec<PromoCode>,
    pub channels: Vec<Channel>,
}

/// `GET /api/promocodes?user_id=<id>` — the full available-code list plus
/// the required channels. Codes are withheld when access is denied; channels
/// are always returned so the client can render subscribe prompts.
pub async fn promocodes(
    State(state): State<AppState>,
    Query(query): Query<PromocodesQuery>,
) -> impl IntoResponse {
    let Some(user_id) = query.user_id.filter(|s| !s.is_empty()) else {
        return user_id_required();
    };

    let channels = state.catalog.required_channels().await;
    let access = subscriptions::all_subscribed(&user_id, &channels).await;
    let promocodes = if access {
        state.catalog.available_promocodes().await
    } else {
        Vec::new()
    };

    Json(PromocodesResponse {
        access,
        promocodes,
        channels,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CheckSubscriptionsRequest {
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CheckSubscriptionsResponse {
    pub subscribed: bool,
    pub message: String,
}

/// `POST /api/check_subscriptions` with body `{"user_id": ...}`.
pub async fn check_subscriptions(
    State(state): State<AppState>,
    Json(payload): Json<CheckSubscriptionsRequest>,
) -> impl IntoResponse {
    let user_id = match payload.user_id {
        Some(v) if !v.is_null() => v.to_string().trim_matches('"').to_string(),
        _ => return user_id_required(),
    };
    if user_id.is_empty() {
        return user_id_required();
    }

    let channels = state.catalog.required_channels().await;
    let subscribed = subscriptions::all_subscribed(&user_id, &channels).await;
    let message = if subscribed {
        "All subscriptions confirmed!".to_string()
    } else {
        "Please join the required channels first".to_string()
    };

    Json(CheckSubscriptionsResponse {
        subscribed,
        message,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promopal_db::Catalog;
    use promopal_db::models::NewPromoCode;
    use promopal_db::sqlx::sqlite::SqlitePoolOptions;
    use serde_json::json;

    async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        promopal_db::db::init_schema(&pool).await.unwrap();
        AppState {
            catalog: Catalog::new(pool),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn promocodes_requires_user_id() {
        let state = test_state().await;

        for query in [
            PromocodesQuery { user_id: None },
            PromocodesQuery {
                user_id: Some(String::new()),
            },
        ] {
            let response = promocodes(State(state.clone()), Query(query))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["error"], "User ID required");
        }
    }

    #[tokio::test]
    async fn promocodes_returns_catalog_with_access() {
        let state = test_state().await;
        state
            .catalog
            .add_promocode(&NewPromoCode {
                store: "TestStore".into(),
                code: "ABC123".into(),
                description: Some("10% off".into()),
                expires_at: Some("2099-01-01".parse().unwrap()),
            })
            .await
            .unwrap();
        state
            .catalog
            .add_channel("Daily Deals", "dailydeals")
            .await
            .unwrap();

        let response = promocodes(
            State(state),
            Query(PromocodesQuery {
                user_id: Some("42".into()),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["access"], true);
        assert_eq!(body["promocodes"].as_array().unwrap().len(), 1);
        assert_eq!(body["promocodes"][0]["store"], "TestStore");
        assert_eq!(body["promocodes"][0]["code"], "ABC123");
        assert_eq!(body["channels"][0]["username"], "dailydeals");
    }

    #[tokio::test]
    async fn check_subscriptions_requires_user_id() {
        let state = test_state().await;

        let response = check_subscriptions(
            State(state.clone()),
            Json(CheckSubscriptionsRequest { user_id: None }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = check_subscriptions(
            State(state.clone()),
            Json(CheckSubscriptionsRequest {
                user_id: Some(serde_json::Value::Null),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // An empty string is as good as missing, same as the GET endpoint.
        let response = check_subscriptions(
            State(state),
            Json(CheckSubscriptionsRequest {
                user_id: Some(json!("")),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "User ID required");
    }

    #[tokio::test]
    async fn check_subscriptions_reports_subscribed() {
        let state = test_state().await;
        state
            .catalog
            .add_channel("Daily Deals", "dailydeals")
            .await
            .unwrap();

        let response = check_subscriptions(
            State(state),
            Json(CheckSubscriptionsRequest {
                user_id: Some(json!(42)),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["subscribed"], true);
        assert!(body["message"].as_str().unwrap().contains("confirmed"));
    }
}
