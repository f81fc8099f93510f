use actix_web::test;

use super::call_json;
use crate::support::{create_test_app, test_env};

#[actix_web::test]
async fn health_reports_db_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let env = test_env().await?;
    let app = create_test_app(env.state.clone()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert_ne!(body["migrations"], "unknown");
    assert!(body["time"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}
