// Test: HTTP status codes and what the handler posts to the event loop
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use painter::color::Color;
use painter::config::DisplayConfig;
use painter::display::HeadlessDisplay;
use painter::geometry::{Point, Size};
use painter::lang::{router, CommandService, Parser};
use painter::painter::EventLoop;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct Harness {
    display: Arc<HeadlessDisplay>,
    event_loop: EventLoop,
    router: Router,
}

fn harness(max_body_bytes: usize) -> Harness {
    let display = HeadlessDisplay::new(&DisplayConfig::default(), Size::new(800, 800)).unwrap();
    let mut event_loop = EventLoop::new(display.clone());
    event_loop.start_with(display.clone()).unwrap();
    let service = CommandService::new(event_loop.handle(), Parser::default(), max_body_bytes);
    Harness {
        display,
        event_loop,
        router: router(service),
    }
}

fn request(method: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn commands_are_accepted_and_executed() {
    let mut h = harness(1024);

    let response = h
        .router
        .clone()
        .oneshot(request("POST", Body::from("white\nfigure 100 100\nupdate\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    h.event_loop.stop_and_wait().unwrap();
    assert!(h.display.wait_for_frames(1, Duration::from_secs(5)));
    assert_eq!(h.display.last_frame_pixel(Point::new(100, 100)), Some(Color::YELLOW));
    assert_eq!(h.display.last_frame_pixel(Point::new(700, 700)), Some(Color::WHITE));
}

#[tokio::test]
async fn empty_get_is_ok() {
    let h = harness(1024);
    let response = h
        .router
        .clone()
        .oneshot(request("GET", Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unrecognized_lines_still_answer_ok() {
    let mut h = harness(1024);
    let response = h
        .router
        .clone()
        .oneshot(request("PUT", Body::from("bgrect 1 2 3\npaint\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    h.event_loop.stop_and_wait().unwrap();
    assert!(!h.display.wait_for_frames(1, Duration::from_millis(50)));
}

#[tokio::test]
async fn unreadable_body_is_server_error() {
    let h = harness(1024);
    let stream = futures::stream::iter(vec![
        Ok(Bytes::from_static(b"white\n")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away")),
    ]);
    let response = h
        .router
        .clone()
        .oneshot(request("POST", Body::from_stream(stream)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn invalid_utf8_is_server_error() {
    let h = harness(1024);
    let response = h
        .router
        .clone()
        .oneshot(request("POST", Body::from(vec![0xff, 0xfe, b'\n'])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_body_is_server_error() {
    let h = harness(8);
    let response = h
        .router
        .clone()
        .oneshot(request("POST", Body::from("white\ngreen\nupdate\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stopped_loop_is_unavailable() {
    let mut h = harness(1024);
    h.event_loop.stop_and_wait().unwrap();

    let response = h
        .router
        .clone()
        .oneshot(request("POST", Body::from("white\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn shutdown_follows_the_signal() {
    use futures::FutureExt;

    let fired = painter::lang::http::shutdown_on(async { Ok(()) });
    assert_eq!(fired.now_or_never(), Some(()));
}

#[tokio::test]
async fn failed_signal_keeps_serving() {
    use futures::FutureExt;

    let broken = painter::lang::http::shutdown_on(async {
        Err(io::Error::new(io::ErrorKind::Unsupported, "no signal handler"))
    });
    assert_eq!(broken.now_or_never(), None);
}
