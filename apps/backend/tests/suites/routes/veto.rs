// Player-facing veto endpoints.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::test;
use serde_json::{json, Value};
use veto_backend::domain::types::VetoStatus;
use veto_backend::realtime::VetoEvent;

use super::call_json;
use crate::common::{assert_problem, assert_problem_details_structure};
use crate::support::fixtures::{BO1_MATCH, BO3_MATCH, MAP_POOL, TEAM_A, USER_A, USER_B};
use crate::support::{create_test_app, test_env};

const USER_HEADER: &str = "x-user-id";

fn team_user(team_id: i64) -> i64 {
    if team_id == TEAM_A {
        USER_A
    } else {
        USER_B
    }
}

fn turn_of(view: &Value) -> i64 {
    view["session"]["current_turn_team_id"]
        .as_i64()
        .expect("a team holds the turn")
}

#[actix_web::test]
async fn create_returns_201_then_200() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO1_MATCH}/veto"))
        .to_request();
    let (status, first) = call_json(&app, req).await;
    assert_eq!(status, 201);
    assert_eq!(first["session"]["status"], "pending");
    assert_eq!(first["session"]["match_id"], BO1_MATCH);
    assert_eq!(first["session"]["order"]["format"], "bo1");
    assert_eq!(first["remaining_maps"].as_array().map(Vec::len), Some(7));

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO1_MATCH}/veto"))
        .to_request();
    let (status, second) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(second["session"]["id"], first["session"]["id"]);
    Ok(())
}

#[actix_web::test]
async fn view_carries_etag_and_honors_if_none_match() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO1_MATCH}/veto"))
        .to_request();
    let (_, created) = call_json(&app, req).await;
    let id = created["session"]["id"].as_i64().expect("session id");

    let req = test::TestRequest::get()
        .uri(&format!("/api/veto/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let etag = resp
        .headers()
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .expect("view carries an ETag")
        .to_string();
    assert_eq!(etag, format!("\"veto-{id}-v1\""));

    let req = test::TestRequest::get()
        .uri(&format!("/api/veto/{id}"))
        .insert_header((IF_NONE_MATCH, etag.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 304);

    // After a roll the old tag no longer matches.
    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/roll"))
        .insert_header((USER_HEADER, USER_A.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/veto/{id}"))
        .insert_header((IF_NONE_MATCH, etag.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get(ETAG).and_then(|v| v.to_str().ok()),
        Some(format!("\"veto-{id}-v2\"").as_str())
    );
    Ok(())
}

#[actix_web::test]
async fn bo1_over_http_publishes_events_after_commit() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let mut events = env.events.subscribe();
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO1_MATCH}/veto"))
        .to_request();
    let (_, created) = call_json(&app, req).await;
    let id = created["session"]["id"].as_i64().expect("session id");
    assert!(matches!(
        events.try_recv(),
        Ok(VetoEvent::SessionCreated { match_id: BO1_MATCH, .. })
    ));

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/roll"))
        .insert_header((USER_HEADER, USER_B.to_string()))
        .to_request();
    let (status, mut view) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(view["session"]["status"], "banning");
    assert_eq!(view["next_action"], "ban");
    assert!(matches!(events.try_recv(), Ok(VetoEvent::DiceRolled { .. })));
    assert!(matches!(
        events.try_recv(),
        Ok(VetoEvent::PhaseChanged {
            status: VetoStatus::Banning,
            ..
        })
    ));

    for map in &MAP_POOL[..6] {
        let user = team_user(turn_of(&view));
        let req = test::TestRequest::post()
            .uri(&format!("/api/veto/{id}/actions"))
            .insert_header((USER_HEADER, user.to_string()))
            .set_json(json!({ "map_id": map }))
            .to_request();
        let (status, next) = call_json(&app, req).await;
        assert_eq!(status, 200, "{next}");
        view = next;
    }

    assert_eq!(view["session"]["status"], "completed");
    assert_eq!(view["next_action"], Value::Null);
    let ledger = view["actions"].as_array().expect("actions array");
    assert_eq!(ledger.len(), 7);
    assert_eq!(ledger[6]["map_id"], "icebox");
    assert_eq!(ledger[6]["action"], "pick");
    assert_eq!(ledger[6]["team_id"], Value::Null);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    let recorded = received
        .iter()
        .filter(|e| matches!(e, VetoEvent::ActionRecorded { .. }))
        .count();
    assert_eq!(recorded, 7);
    assert!(matches!(
        received.last(),
        Some(VetoEvent::PhaseChanged {
            status: VetoStatus::Completed,
            current_turn_team_id: None,
            ..
        })
    ));
    Ok(())
}

#[actix_web::test]
async fn bo3_side_choice_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO3_MATCH}/veto"))
        .to_request();
    let (_, created) = call_json(&app, req).await;
    let id = created["session"]["id"].as_i64().expect("session id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/roll"))
        .insert_header((USER_HEADER, USER_A.to_string()))
        .to_request();
    let (_, mut view) = call_json(&app, req).await;
    let home = view["session"]["home_team_id"].as_i64().expect("home assigned");
    let away = view["session"]["away_team_id"].as_i64().expect("away assigned");

    for map in MAP_POOL {
        let req = test::TestRequest::post()
            .uri(&format!("/api/veto/{id}/actions"))
            .insert_header((USER_HEADER, team_user(turn_of(&view)).to_string()))
            .set_json(json!({ "map_id": map }))
            .to_request();
        let (status, next) = call_json(&app, req).await;
        assert_eq!(status, 200, "{next}");
        view = next;
    }
    assert_eq!(view["session"]["status"], "side_choice");

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/side"))
        .insert_header((USER_HEADER, team_user(away).to_string()))
        .set_json(json!({ "side": "attack" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 403, "NOT_HOME_TEAM").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/side"))
        .insert_header((USER_HEADER, team_user(home).to_string()))
        .set_json(json!({ "side": "attack" }))
        .to_request();
    let (status, done) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(done["session"]["status"], "completed");
    assert_eq!(done["actions"][6]["side"], "attack");
    Ok(())
}

#[actix_web::test]
async fn protocol_errors_are_problem_details() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{BO1_MATCH}/veto"))
        .to_request();
    let (_, created) = call_json(&app, req).await;
    let id = created["session"]["id"].as_i64().expect("session id");

    // Banning before the roll.
    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/actions"))
        .insert_header((USER_HEADER, USER_A.to_string()))
        .set_json(json!({ "map_id": "ascent" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 409, "WRONG_PHASE").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/roll"))
        .insert_header((USER_HEADER, USER_A.to_string()))
        .to_request();
    let (_, view) = call_json(&app, req).await;
    let home = turn_of(&view);
    let away_user = if team_user(home) == USER_A { USER_B } else { USER_A };

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/actions"))
        .insert_header((USER_HEADER, away_user.to_string()))
        .set_json(json!({ "map_id": "ascent" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 409, "NOT_YOUR_TURN").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/actions"))
        .insert_header((USER_HEADER, team_user(home).to_string()))
        .set_json(json!({ "map_id": "dust2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "UNKNOWN_MAP").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/veto/{id}/roll"))
        .insert_header((USER_HEADER, USER_A.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 409, "ALREADY_ROLLED").await;
    Ok(())
}

#[actix_web::test]
async fn request_errors_are_problem_details() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::post()
        .uri("/api/veto/1/roll")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_structure(resp, 400, "INVALID_HEADER", "Missing X-User-Id header").await;

    let req = test::TestRequest::get().uri("/api/veto/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "INVALID_ID").await;

    let req = test::TestRequest::get().uri("/api/veto/0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "INVALID_ID").await;

    let req = test::TestRequest::get().uri("/api/veto/4242").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 404, "SESSION_NOT_FOUND").await;

    let req = test::TestRequest::post()
        .uri("/api/matches/999/veto")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 404, "MATCH_NOT_FOUND").await;

    let req = test::TestRequest::post()
        .uri("/api/veto/1/actions")
        .insert_header((USER_HEADER, USER_A.to_string()))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "BAD_REQUEST").await;
    Ok(())
}

#[actix_web::test]
async fn inbound_request_id_becomes_the_trace_id() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/veto/4242")
        .insert_header(("x-request-id", "gateway-abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem(resp, 404, "SESSION_NOT_FOUND").await;
    assert_eq!(problem["trace_id"], "gateway-abc-123");
    Ok(())
}
