mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_api() -> Result<()> {
    let server = common::spawn_server().await?;

    let body: Value = server.client.get(server.url("/")).send().await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "city-info-api");
    Ok(())
}

#[tokio::test]
async fn authenticate_issues_usable_token() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/authentication/authenticate"))
        .json(&json!({"username": "rhea", "password": "secret"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let token = body["data"]["token"].as_str().expect("token").to_string();
    assert_eq!(body["data"]["expires_in"], 24 * 3600);

    let res = server.client.get(server.url("/api/cities")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn authenticate_rejects_blank_credentials() -> Result<()> {
    let server = common::spawn_server().await?;

    for body in [json!({"username": "rhea"}), json!({"username": "", "password": "x"}), json!({})] {
        let res = server
            .client
            .post(server.url("/api/authentication/authenticate"))
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "body {}", body);
    }
    Ok(())
}

#[tokio::test]
async fn cities_require_a_valid_token() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/api/cities")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");

    let res = server
        .client
        .get(server.url("/api/cities/1"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Signed with a different secret
    let mut foreign = server.config.clone();
    foreign.security.jwt_secret = "someone-elses-secret".into();
    let claims = city_info_api::auth::Claims::new("1".into(), "A".into(), "B".into(), None, &foreign.security);
    let token = city_info_api::auth::generate_jwt(&claims, &foreign.security)?;
    let res = server.client.get(server.url("/api/cities")).bearer_auth(token).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn points_of_interest_require_a_valid_token() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/api/cities/1/pointsofinterest"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
