//! End-to-end flows through `CaptionApp` with the real HTTP client.

mod common;

use image_caption::config::{Credential, MISSING_CREDENTIAL_MESSAGE};
use image_caption::core::{
    HISTORY_CAPACITY, ImageFile, TOO_LARGE_MESSAGE, UNSUPPORTED_TYPE_MESSAGE,
};
use image_caption::error::TRANSPORT_FAILURE_MESSAGE;
use image_caption::{AppEvent, RequestStatus};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    CAPTION_PATH, app_for, app_with_credential, ascii_jpeg, error_body, ok_body, png_image,
};

async fn server_answering(body: serde_json::Value, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CAPTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_photo_is_captioned_and_recorded() {
    let server = server_answering(ok_body("a dog on a beach"), 1).await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(ascii_jpeg("photo.jpg", 2_000_000)));
    let state = app.generate().await;

    assert_eq!(state.caption(), Some("a dog on a beach"));
    assert_eq!(state.status(), &RequestStatus::Success);
    assert_eq!(state.history().len(), 1);
    let entry = state.history().get(0).unwrap();
    assert_eq!(entry.caption, "a dog on a beach");
    assert_eq!(entry.image_url, state.selected().unwrap().preview().url());

    let view = app.view();
    assert!(view.show_result());
    assert!(view.generate_enabled);
    assert_eq!(view.history.len(), 1);
}

#[tokio::test]
async fn test_service_error_keeps_image_and_history() {
    let server = server_answering(error_body("invalid image"), 1).await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(png_image("broken.png")));
    let state = app.generate().await;

    assert_eq!(state.error(), Some("invalid image"));
    assert_eq!(state.caption(), None);
    assert!(state.history().is_empty());
    assert_eq!(state.selected().unwrap().file().name(), "broken.png");
}

#[tokio::test]
async fn test_transport_failure_shows_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CAPTION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(png_image("photo.png")));
    let state = app.generate().await;

    assert_eq!(state.error(), Some(TRANSPORT_FAILURE_MESSAGE));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let server = server_answering(ok_body("unused"), 0).await;
    let placeholder = Credential::from_raw(Some("your-api-key-here"));
    let (mut app, _) = app_with_credential(&server, placeholder);

    app.dispatch(AppEvent::FileSelected(png_image("photo.png")));
    let state = app.generate().await;

    assert_eq!(state.error(), Some(MISSING_CREDENTIAL_MESSAGE));
    assert!(!state.is_loading());
    assert!(state.history().is_empty());
}

#[tokio::test]
async fn test_generate_without_image_sends_nothing() {
    let server = server_answering(ok_body("unused"), 0).await;
    let (mut app, _) = app_for(&server);

    assert!(!app.view().generate_enabled);
    let state = app.generate().await;

    assert_eq!(state.status(), &RequestStatus::Idle);
    assert!(state.caption().is_none());
}

#[tokio::test]
async fn test_rejected_files_never_reach_the_service() {
    let server = server_answering(ok_body("unused"), 0).await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(ImageFile::new(
        "notes.txt",
        "text/plain",
        b"hello".to_vec(),
    )));
    assert_eq!(app.state().error(), Some(UNSUPPORTED_TYPE_MESSAGE));

    app.dispatch(AppEvent::FileDropped(vec![ascii_jpeg("huge.jpg", 6 * 1024 * 1024)]));
    assert_eq!(app.state().error(), Some(TOO_LARGE_MESSAGE));

    let state = app.generate().await;
    assert!(state.selected().is_none());
}

#[tokio::test]
async fn test_history_keeps_ten_newest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CAPTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": { "caption": "same caption" }
        })))
        .expect(11)
        .mount(&server)
        .await;
    let (mut app, _) = app_for(&server);

    let mut urls = Vec::new();
    for i in 0..11 {
        app.dispatch(AppEvent::FileSelected(png_image(&format!("img-{i}.png"))));
        urls.push(app.state().selected().unwrap().preview().url().to_string());
        app.generate().await;
    }

    let history = app.state().history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.get(0).unwrap().image_url, urls[10]);
    assert_eq!(history.get(9).unwrap().image_url, urls[1]);
    assert!(history.iter().all(|entry| entry.image_url != urls[0]));
}

#[tokio::test]
async fn test_copy_writes_current_caption() {
    let server = server_answering(ok_body("a cat on a sofa"), 1).await;
    let (mut app, clipboard) = app_for(&server);

    app.dispatch(AppEvent::CaptionCopied);
    assert_eq!(clipboard.last(), None);

    app.dispatch(AppEvent::FileSelected(png_image("cat.png")));
    app.generate().await;
    app.dispatch(AppEvent::CaptionCopied);

    assert_eq!(clipboard.last().as_deref(), Some("a cat on a sofa"));
    assert_eq!(app.state().caption(), Some("a cat on a sofa"));
}

#[tokio::test]
async fn test_pending_request_completes_on_another_task() {
    let server = server_answering(ok_body("spawned"), 1).await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(png_image("photo.png")));
    let pending = app.dispatch(AppEvent::GenerateRequested).unwrap();
    assert!(app.state().is_loading());
    assert!(app.dispatch(AppEvent::GenerateRequested).is_none());

    let result = tokio::spawn(pending.send()).await.unwrap();
    app.complete(result);

    assert_eq!(app.state().caption(), Some("spawned"));
    assert_eq!(app.state().history().len(), 1);
}

#[tokio::test]
async fn test_clear_after_success_keeps_history() {
    let server = server_answering(ok_body("kept"), 1).await;
    let (mut app, _) = app_for(&server);

    app.dispatch(AppEvent::FileSelected(png_image("photo.png")));
    app.generate().await;
    app.dispatch(AppEvent::ImageCleared);

    let view = app.view();
    assert!(view.show_upload_area());
    assert!(!view.show_result());
    assert_eq!(view.history.len(), 1);
    assert!(view.history[0].preview.thumbnail().is_some());
}
