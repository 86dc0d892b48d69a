mod common;

use std::{sync::Arc, time::Duration};

use mockito::{Matcher, Server};
use serde_json::json;
use spothelper::{
    AppError,
    spotify::{self, LIKED_SONGS, PlaylistRef, SpotifyClient},
};

use common::{TOKEN, ids, test_client, test_config, track_item};

fn refs(ids: &[&str]) -> Vec<PlaylistRef> {
    ids.iter().map(|id| PlaylistRef::parse(id).unwrap()).collect()
}

#[tokio::test]
async fn add_tracks_routes_playlists_and_liked_songs() {
    let mut server = Server::new_async().await;
    let playlist = server
        .mock("POST", "/playlists/P1/tracks")
        .match_header("authorization", "Bearer valid-token")
        .match_body(Matcher::Json(json!({
            "uris": ["spotify:track:A", "spotify:track:B"]
        })))
        .with_status(201)
        .with_body(r#"{"snapshot_id":"s2"}"#)
        .expect(1)
        .create_async()
        .await;
    let liked = server
        .mock("PUT", "/me/tracks")
        .match_body(Matcher::Json(json!({ "ids": ["A", "B"] })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    spotify::batch::add_tracks(&client, &ids(&["A", "B"]), &refs(&["P1", LIKED_SONGS]), TOKEN)
        .await
        .unwrap();

    playlist.assert_async().await;
    liked.assert_async().await;
}

#[tokio::test]
async fn add_tracks_issues_one_call_per_chunk_and_target() {
    let mut server = Server::new_async().await;
    let playlist = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(201)
        .expect(3)
        .create_async()
        .await;
    let liked = server
        .mock("PUT", "/me/tracks")
        .with_status(200)
        .expect(3)
        .create_async()
        .await;

    let track_ids: Vec<String> = (0..120).map(|i| format!("t{i}")).collect();
    let client = test_client(&server.url());
    spotify::batch::add_tracks(&client, &track_ids, &refs(&["P1", LIKED_SONGS]), TOKEN)
        .await
        .unwrap();

    playlist.assert_async().await;
    liked.assert_async().await;
}

#[tokio::test]
async fn add_tracks_last_partial_chunk_is_flushed() {
    let track_ids: Vec<String> = (0..51).map(|i| format!("t{i}")).collect();
    let head_uris: Vec<String> = track_ids[..50]
        .iter()
        .map(|id| format!("spotify:track:{id}"))
        .collect();

    let mut server = Server::new_async().await;
    let head = server
        .mock("POST", "/playlists/P1/tracks")
        .match_body(Matcher::Json(json!({ "uris": head_uris })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let tail = server
        .mock("POST", "/playlists/P1/tracks")
        .match_body(Matcher::Json(json!({ "uris": ["spotify:track:t50"] })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    spotify::batch::add_tracks(&client, &track_ids, &refs(&["P1"]), TOKEN)
        .await
        .unwrap();

    head.assert_async().await;
    tail.assert_async().await;
}

#[tokio::test]
async fn add_tracks_aborts_on_first_failure_without_rollback() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let failing = server
        .mock("POST", "/playlists/P2/tracks")
        .with_status(403)
        .with_body(r#"{"error":{"status":403,"message":"You cannot add tracks to a playlist you don't own."}}"#)
        .expect(1)
        .create_async()
        .await;
    let never = server
        .mock("POST", "/playlists/P3/tracks")
        .expect(0)
        .create_async()
        .await;
    let no_rollback = server
        .mock("DELETE", "/playlists/P1/tracks")
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let err = spotify::batch::add_tracks(&client, &ids(&["A"]), &refs(&["P1", "P2", "P3"]), TOKEN)
        .await
        .unwrap_err();

    match &err {
        AppError::Upstream { status, body } => {
            assert_eq!(*status, 403);
            assert!(body.contains("don't own"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("403"));

    first.assert_async().await;
    failing.assert_async().await;
    never.assert_async().await;
    no_rollback.assert_async().await;
}

#[tokio::test]
async fn add_tracks_rejects_non_created_success_status() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(202)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let err = spotify::batch::add_tracks(&client, &ids(&["A"]), &refs(&["P1"]), TOKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 202, .. }));
}

#[tokio::test]
async fn add_tracks_validates_before_calling_upstream() {
    let mut server = Server::new_async().await;
    let never = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let no_tracks = spotify::batch::add_tracks(&client, &[], &refs(&["P1"]), TOKEN).await;
    let no_targets = spotify::batch::add_tracks(&client, &ids(&["A"]), &[], TOKEN).await;

    assert!(matches!(no_tracks, Err(AppError::Validation(_))));
    assert!(matches!(no_targets, Err(AppError::Validation(_))));
    never.assert_async().await;
}

#[tokio::test]
async fn remove_tracks_from_playlist_sends_uris_and_snapshot() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("DELETE", "/playlists/P1/tracks")
        .match_body(Matcher::Json(json!({
            "tracks": [{ "uri": "spotify:track:A" }, { "uri": "spotify:track:B" }],
            "snapshot_id": "snap-1"
        })))
        .with_status(200)
        .with_body(r#"{"snapshot_id":"snap-2"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse("P1").unwrap();
    spotify::batch::remove_tracks(&client, &ids(&["A", "B"]), &origin, "snap-1", TOKEN)
        .await
        .unwrap();

    m.assert_async().await;
}

#[tokio::test]
async fn remove_tracks_from_liked_songs_sends_ids() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("DELETE", "/me/tracks")
        .match_body(Matcher::Json(json!({ "ids": ["A", "B"] })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse(LIKED_SONGS).unwrap();
    spotify::batch::remove_tracks(&client, &ids(&["A", "B"]), &origin, LIKED_SONGS, TOKEN)
        .await
        .unwrap();

    m.assert_async().await;
}

#[tokio::test]
async fn remove_tracks_surfaces_snapshot_conflict() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("DELETE", "/playlists/P1/tracks")
        .with_status(400)
        .with_body(r#"{"error":{"status":400,"message":"Invalid snapshot id"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse("P1").unwrap();
    let err = spotify::batch::remove_tracks(&client, &ids(&["A"]), &origin, "stale", TOKEN)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid snapshot id"));
    m.assert_async().await;
}

#[tokio::test]
async fn remove_tracks_from_playlist_issues_one_call_per_chunk() {
    let track_ids: Vec<String> = (0..120).map(|i| format!("t{i}")).collect();

    let mut server = Server::new_async().await;
    let mut chunks = Vec::new();
    for range in [0..50, 50..100, 100..120] {
        let tracks: Vec<serde_json::Value> = track_ids[range]
            .iter()
            .map(|id| json!({ "uri": format!("spotify:track:{id}") }))
            .collect();
        let m = server
            .mock("DELETE", "/playlists/P1/tracks")
            .match_body(Matcher::Json(json!({ "tracks": tracks, "snapshot_id": "snap-1" })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        chunks.push(m);
    }

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse("P1").unwrap();
    spotify::batch::remove_tracks(&client, &track_ids, &origin, "snap-1", TOKEN)
        .await
        .unwrap();

    for m in chunks {
        m.assert_async().await;
    }
}

#[tokio::test]
async fn remove_tracks_from_liked_songs_flushes_partial_chunk() {
    let track_ids: Vec<String> = (0..51).map(|i| format!("t{i}")).collect();

    let mut server = Server::new_async().await;
    let head = server
        .mock("DELETE", "/me/tracks")
        .match_body(Matcher::Json(json!({ "ids": &track_ids[..50] })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let tail = server
        .mock("DELETE", "/me/tracks")
        .match_body(Matcher::Json(json!({ "ids": ["t50"] })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    spotify::batch::remove_tracks(&client, &track_ids, &PlaylistRef::LikedSongs, LIKED_SONGS, TOKEN)
        .await
        .unwrap();

    head.assert_async().await;
    tail.assert_async().await;
}

#[tokio::test]
async fn move_tracks_skips_remove_when_add_fails() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/playlists/P2/tracks")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/playlists/P1/tracks")
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse("P1").unwrap();
    let result =
        spotify::batch::move_tracks(&client, &ids(&["A"]), &origin, "snap", &refs(&["P2"]), TOKEN)
            .await;

    assert!(matches!(result, Err(AppError::Upstream { status: 500, .. })));
    add.assert_async().await;
    remove.assert_async().await;
}

#[tokio::test]
async fn fetch_page_routes_by_playlist_kind() {
    let mut server = Server::new_async().await;
    let playlist = server
        .mock("GET", "/playlists/P1/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("offset".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [
                    track_item(Some("A"), "Song A", Some("Artist"), 1),
                    track_item(Some("A"), "Song A", Some("Artist"), 1),
                ],
                "total": 102
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let saved = server
        .mock("GET", "/me/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [track_item(Some("B"), "Song B", Some("Artist"), 1)],
                "total": 1
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());

    let page = spotify::tracks::fetch_page(&client, &PlaylistRef::parse("P1").unwrap(), 100, TOKEN)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.get("A").unwrap().duplicates, 1);
    assert!(!page.get("A").unwrap().liked);

    let liked = spotify::tracks::fetch_page(&client, &PlaylistRef::LikedSongs, 0, TOKEN)
        .await
        .unwrap();
    assert!(liked.get("B").unwrap().liked);

    playlist.assert_async().await;
    saved.assert_async().await;
}

#[tokio::test]
async fn total_tracks_reads_total() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/me/tracks")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"items":[],"total":731}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let total = spotify::tracks::total_tracks(&client, &PlaylistRef::LikedSongs, TOKEN)
        .await
        .unwrap();

    assert_eq!(total, 731);
    m.assert_async().await;
}

#[tokio::test]
async fn total_tracks_without_total_is_an_upstream_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/playlists/P1/tracks")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items":[]}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let origin = PlaylistRef::parse("P1").unwrap();
    let err = spotify::tracks::total_tracks(&client, &origin, TOKEN)
        .await
        .unwrap_err();

    match err {
        AppError::Upstream { status, body } => {
            assert_eq!(status, 200);
            assert_eq!(body, r#"{"items":[]}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn list_playlists_requests_first_page_only() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(200)
        .with_body(
            json!({
                "items": [{
                    "id": "P1",
                    "name": "",
                    "images": null,
                    "snapshot_id": "s1",
                    "tracks": { "href": "https://api.spotify.com/v1/playlists/P1/tracks", "total": 2 },
                    "owner": { "display_name": null }
                }],
                "next": "https://api.spotify.com/v1/me/playlists?offset=50&limit=50",
                "total": 80
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let listing = spotify::playlists::list_playlists(&client, TOKEN).await.unwrap();

    assert_eq!(listing.len(), 2);
    let p1 = listing.get("P1").unwrap();
    assert_eq!(p1.title, "Unnamed 0");
    assert!(p1.image_url.is_empty());
    assert_eq!(p1.owner, "");
    assert_eq!(listing.last().unwrap().id, LIKED_SONGS);
    m.assert_async().await;
}

#[tokio::test]
async fn check_liked_sends_single_comma_joined_query() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/me/tracks/contains")
        .match_query(Matcher::UrlEncoded("ids".into(), "A,B,C".into()))
        .with_status(200)
        .with_body("[true,false,true]")
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let liked = spotify::library::check_liked(&client, &ids(&["A", "B", "C"]), TOKEN)
        .await
        .unwrap();

    assert_eq!(liked, vec![true, false, true]);
    m.assert_async().await;
}

#[tokio::test]
async fn current_user_defaults_missing_display_name() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/me")
        .with_status(200)
        .with_body(r#"{"id":"amir","display_name":null,"uri":"spotify:user:amir"}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let user = spotify::user::current_user(&client, TOKEN).await.unwrap();

    assert_eq!(user.display_name, "userName");
    assert_eq!(user.id, "amir");
    assert_eq!(user.uri, "spotify:user:amir");
}

#[tokio::test]
async fn upstream_unauthorized_keeps_status() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/me")
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let err = spotify::user::current_user(&client, TOKEN).await.unwrap_err();

    assert!(matches!(err, AppError::Upstream { status: 401, .. }));
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("The access token expired"));
}

#[tokio::test]
async fn rate_limited_call_is_retried_after_retry_after() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("GET", "/me")
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/me")
        .with_status(200)
        .with_body(r#"{"id":"amir","display_name":"Amir","uri":"spotify:user:amir"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.max_retries = 2;
    let client = SpotifyClient::new(Arc::new(config)).unwrap();

    let user = spotify::user::current_user(&client, TOKEN).await.unwrap();
    assert_eq!(user.display_name, "Amir");

    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn server_errors_are_retried_with_backoff_then_surfaced() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/me")
        .with_status(503)
        .with_body("upstream unavailable")
        .expect(3)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.max_retries = 2;
    config.retry_backoff = Duration::from_millis(5);
    let client = SpotifyClient::new(Arc::new(config)).unwrap();

    let err = spotify::user::current_user(&client, TOKEN).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 503, .. }));
    m.assert_async().await;
}

#[tokio::test]
async fn server_errors_on_post_are_not_retried() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(502)
        .expect(1)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.max_retries = 3;
    config.retry_backoff = Duration::from_millis(5);
    let client = SpotifyClient::new(Arc::new(config)).unwrap();

    let err = spotify::batch::add_tracks(&client, &ids(&["A"]), &refs(&["P1"]), TOKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 502, .. }));
    m.assert_async().await;
}

#[tokio::test]
async fn rate_limited_post_is_retried() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/playlists/P1/tracks")
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.max_retries = 2;
    let client = SpotifyClient::new(Arc::new(config)).unwrap();

    spotify::batch::add_tracks(&client, &ids(&["A"]), &refs(&["P1"]), TOKEN)
        .await
        .unwrap();

    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn excessive_retry_after_is_not_waited_for() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/me")
        .with_status(429)
        .with_header("retry-after", "86400")
        .expect(1)
        .create_async()
        .await;

    let mut config = test_config(&server.url());
    config.max_retries = 3;
    config.max_retry_after = Duration::from_secs(5);
    let client = SpotifyClient::new(Arc::new(config)).unwrap();

    let err = spotify::user::current_user(&client, TOKEN).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 429, .. }));
    m.assert_async().await;
}

#[tokio::test]
async fn exchange_code_posts_authorization_code_grant() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .match_header("authorization", "Basic Y2lkOnNlY3JldA==")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("grant_type=authorization_code".into()),
            Matcher::Regex("code=the-code".into()),
            Matcher::Regex("redirect_uri=".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"at","token_type":"Bearer","refresh_token":"rt","expires_in":3600,"scope":""}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let before = spothelper::utils::now_timestamp();
    let token = spotify::auth::exchange_code(&client, "the-code").await.unwrap();

    assert_eq!(token.access_token, "at");
    assert_eq!(token.refresh_token, "rt");
    assert!(token.expires_at >= before + 3600.0);
    assert!(token.expires_at < before + 3700.0);
    m.assert_async().await;
}

#[tokio::test]
async fn exchange_code_fails_on_non_ok_status() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let err = spotify::auth::exchange_code(&client, "bad").await.unwrap_err();

    assert!(matches!(err, AppError::Auth(_)));
    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn refresh_token_keeps_refresh_token() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("grant_type=refresh_token".into()),
            Matcher::Regex("refresh_token=rt-old".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"at-new","token_type":"Bearer","refresh_token":"rt-rotated","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server.url());
    let token = spotify::auth::refresh_token(&client, "rt-old").await.unwrap();

    assert_eq!(token.access_token, "at-new");
    assert_eq!(token.refresh_token, "rt-old");
    m.assert_async().await;
}

#[tokio::test]
async fn authorize_url_carries_client_and_dialog_flag() {
    let config = test_config("http://localhost:9");

    let url = spotify::auth::authorize_url(&config, true).unwrap();
    assert!(url.starts_with("http://localhost:9/authorize?"));
    assert!(url.contains("client_id=cid"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("show_dialog=true"));
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A5000%2Fcallback"));
    assert!(url.contains("state="));

    let url = spotify::auth::authorize_url(&config, false).unwrap();
    assert!(url.contains("show_dialog=false"));
}
