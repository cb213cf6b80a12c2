//! Slot suggestions for coordinators: weekday windows at preferred hours.
//!
//! ```text
//! GET /api/v1/slot-suggestions
//! ```

use actix_web::{get, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::polls::DEFAULT_DURATION_MINUTES;
use crate::domain::{ApiResult, Error, suggest_slots};

/// Days scanned when the request does not say how far to look ahead.
const DEFAULT_SUGGESTION_DAYS: u32 = 14;

/// Upper bound on the scan horizon.
const MAX_SUGGESTION_DAYS: u32 = 90;

/// Query parameters accepted by the suggestions endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsQuery {
    pub duration_minutes: Option<u32>,
    pub days: Option<u32>,
}

/// One proposed candidate window.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSlotBody {
    #[schema(format = "date-time")]
    pub start_time: String,
    #[schema(format = "date-time")]
    pub end_time: String,
}

/// Response payload for slot suggestions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotSuggestionsResponseBody {
    pub slots: Vec<SuggestedSlotBody>,
}

/// Propose candidate windows on upcoming weekdays.
///
/// Suggestions start tomorrow so a same-day window cannot land in the past.
#[utoipa::path(
    get,
    path = "/api/v1/slot-suggestions",
    params(
        ("durationMinutes" = Option<u32>, Query, description = "Window length in minutes; defaults to 30"),
        ("days" = Option<u32>, Query, description = "Calendar days to scan; defaults to 14, capped at 90")
    ),
    responses(
        (status = 200, description = "Proposed weekday windows", body = SlotSuggestionsResponseBody),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["polls"],
    operation_id = "suggestSlots"
)]
#[get("/slot-suggestions")]
pub async fn slot_suggestions(
    query: web::Query<SuggestionsQuery>,
) -> ApiResult<web::Json<SlotSuggestionsResponseBody>> {
    let query = query.into_inner();
    let duration_minutes = query.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    if duration_minutes == 0 {
        return Err(
            Error::invalid_request("durationMinutes must be at least 1").with_details(json!({
                "field": "durationMinutes",
                "code": "invalid_duration",
            })),
        );
    }
    let days = query.days.unwrap_or(DEFAULT_SUGGESTION_DAYS);
    if days > MAX_SUGGESTION_DAYS {
        return Err(Error::invalid_request(format!(
            "days must not exceed {MAX_SUGGESTION_DAYS}"
        ))
        .with_details(json!({
            "field": "days",
            "code": "invalid_horizon",
        })));
    }

    let from = Utc::now()
        .date_naive()
        .succ_opt()
        .ok_or_else(|| Error::internal("calendar overflow computing tomorrow"))?;
    let slots = suggest_slots(from, days, duration_minutes)
        .into_iter()
        .map(|slot| SuggestedSlotBody {
            start_time: slot.start_time.to_rfc3339(),
            end_time: slot.end_time.to_rfc3339(),
        })
        .collect();
    Ok(web::Json(SlotSuggestionsResponseBody { slots }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::DateTime;
    use serde_json::Value;

    use super::*;
    use crate::domain::polls::PREFERRED_HOURS;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().service(web::scope("/api/v1").service(slot_suggestions))
    }

    #[actix_web::test]
    async fn defaults_cover_a_fortnight_of_weekdays() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/slot-suggestions")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let slots = body["slots"].as_array().expect("slots array");
        // Any 14 consecutive days hold exactly ten weekdays.
        assert_eq!(slots.len(), 10 * PREFERRED_HOURS.len());
    }

    #[actix_web::test]
    async fn suggestions_start_tomorrow_or_later() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/slot-suggestions?days=7")
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        let first = body["slots"][0]["startTime"].as_str().expect("start time");
        let start = DateTime::parse_from_rfc3339(first).expect("rfc3339 start");
        assert!(start.date_naive() > Utc::now().date_naive());
    }

    #[actix_web::test]
    async fn requested_duration_shapes_the_windows() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/slot-suggestions?durationMinutes=60&days=7")
                .to_request(),
        )
        .await;

        let body: Value = actix_test::read_body_json(response).await;
        let slot = &body["slots"][0];
        let start = DateTime::parse_from_rfc3339(slot["startTime"].as_str().expect("start"))
            .expect("rfc3339 start");
        let end = DateTime::parse_from_rfc3339(slot["endTime"].as_str().expect("end"))
            .expect("rfc3339 end");
        assert_eq!((end - start).num_minutes(), 60);
    }

    #[actix_web::test]
    async fn zero_duration_is_rejected() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/slot-suggestions?durationMinutes=0")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn oversized_horizons_are_rejected() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/slot-suggestions?days=365")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], serde_json::json!("days"));
    }
}
