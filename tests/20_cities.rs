mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|cities| cities.iter().filter_map(|c| c["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn pagination(res: &reqwest::Response) -> Value {
    let header = res.headers().get("X-Pagination").expect("X-Pagination header");
    serde_json::from_str(header.to_str().expect("ascii header")).expect("json header")
}

#[tokio::test]
async fn list_is_ordered_by_name_with_pagination_header() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/api/cities")).bearer_auth(server.token()).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        pagination(&res),
        json!({"totalItemCount": 3, "pageSize": 10, "currentPage": 1, "totalPages": 1})
    );

    let body: Value = res.json().await?;
    assert_eq!(names(&body), vec!["Antwerp", "New York City", "Paris"]);
    assert!(body["data"][0].get("pointsOfInterest").is_none());
    Ok(())
}

#[tokio::test]
async fn paging_walks_the_whole_set_once() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token();

    let mut seen = Vec::new();
    for page in 1..=2 {
        let res = server
            .client
            .get(server.url("/api/cities"))
            .query(&[("pageNumber", page), ("pageSize", 2)])
            .bearer_auth(&token)
            .send()
            .await?;
        let meta = pagination(&res);
        assert_eq!(meta["totalPages"], 2);
        assert_eq!(meta["currentPage"], page);
        seen.extend(names(&res.json().await?));
    }
    assert_eq!(seen, vec!["Antwerp", "New York City", "Paris"]);

    let res = server
        .client
        .get(server.url("/api/cities"))
        .query(&[("pageNumber", 5), ("pageSize", 2)])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(pagination(&res)["totalItemCount"], 3);
    assert!(names(&res.json().await?).is_empty());
    Ok(())
}

#[tokio::test]
async fn page_size_is_capped_at_twenty() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/api/cities"))
        .query(&[("pageSize", 100)])
        .bearer_auth(server.token())
        .send()
        .await?;
    assert_eq!(pagination(&res)["pageSize"], 20);

    let res = server
        .client
        .get(server.url("/api/cities"))
        .query(&[("pageSize", 0), ("pageNumber", -3)])
        .bearer_auth(server.token())
        .send()
        .await?;
    let meta = pagination(&res);
    assert_eq!(meta["pageSize"], 1);
    assert_eq!(meta["currentPage"], 1);
    Ok(())
}

#[tokio::test]
async fn name_filter_is_exact_and_search_is_case_sensitive() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token();

    let get = |params: Vec<(&'static str, &'static str)>| {
        server.client.get(server.url("/api/cities")).query(&params).bearer_auth(&token).send()
    };

    assert_eq!(names(&get(vec![("name", " Paris ")]).await?.json().await?), vec!["Paris"]);
    assert!(names(&get(vec![("name", "paris")]).await?.json().await?).is_empty());
    assert_eq!(names(&get(vec![("searchQuery", "big")]).await?.json().await?), vec!["New York City", "Paris"]);
    assert!(names(&get(vec![("searchQuery", "Big")]).await?.json().await?).is_empty());
    assert_eq!(
        names(&get(vec![("name", "Paris"), ("searchQuery", "tower")]).await?.json().await?),
        vec!["Paris"]
    );
    assert!(names(&get(vec![("name", "Antwerp"), ("searchQuery", "park")]).await?.json().await?).is_empty());
    assert_eq!(names(&get(vec![("name", "   ")]).await?.json().await?).len(), 3);
    Ok(())
}

#[tokio::test]
async fn get_city_optionally_includes_points_of_interest() -> Result<()> {
    let server = common::spawn_server().await?;
    let paris = server.city_id("Paris").await?;

    let res = server
        .client
        .get(server.url(&format!("/api/cities/{}", paris)))
        .query(&[("includePointsOfInterest", "true")])
        .bearer_auth(server.token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["pointsOfInterest"].as_array().map(Vec::len), Some(2));

    let body: Value = server
        .client
        .get(server.url(&format!("/api/cities/{}", paris)))
        .bearer_auth(server.token())
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["name"], "Paris");
    assert!(body["data"].get("pointsOfInterest").is_none());

    let res = server
        .client
        .get(server.url("/api/cities/999"))
        .bearer_auth(server.token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn city_crud_round_trip() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token();

    let res = server
        .client
        .post(server.url("/api/cities"))
        .bearer_auth(&token)
        .json(&json!({"name": "Manila", "description": "Pearl of the Orient"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()["location"].to_str()?.to_string();
    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_i64().expect("id");
    assert_eq!(location, format!("/api/cities/{}", id));

    let res = server
        .client
        .put(server.url(&location))
        .bearer_auth(&token)
        .json(&json!({"name": "Manila", "description": null}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .patch(server.url(&location))
        .bearer_auth(&token)
        .json(&json!([{"op": "replace", "path": "/Description", "value": "Capital of the Philippines"}]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = server.client.get(server.url(&location)).bearer_auth(&token).send().await?.json().await?;
    assert_eq!(body["data"]["description"], "Capital of the Philippines");

    let res = server.client.delete(server.url(&location)).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = server.client.get(server.url(&location)).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_city_payloads_are_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token();

    let res = server
        .client
        .post(server.url("/api/cities"))
        .bearer_auth(&token)
        .json(&json!({"description": "no name"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["field_errors"]["name"], "You must provide a name.");

    let res = server
        .client
        .post(server.url("/api/cities"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .get(server.url("/api/cities/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn deleting_a_city_removes_its_points_of_interest() -> Result<()> {
    let server = common::spawn_server().await?;
    let paris = server.city_id("Paris").await?;
    let paris_token = server.token_for_city(Some("Paris"));

    let res = server
        .client
        .delete(server.url(&format!("/api/cities/{}", paris)))
        .bearer_auth(&paris_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .get(server.url(&format!("/api/cities/{}/pointsofinterest/5", paris)))
        .bearer_auth(&paris_token)
        .send()
        .await?;
    // The city is gone, so the name check can no longer succeed
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
