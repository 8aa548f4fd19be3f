use std::time::Duration;

use trading_dashboard::dashboard::model::{Widget, WidgetKind};
use trading_dashboard::feeds::views::{ConvictionView, WidgetView};
use trading_dashboard::feeds::{Endpoint, FeedClient, FeedHub, WidgetStatus};

fn client_for(server: &mockito::ServerGuard) -> FeedClient {
    FeedClient::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[test]
fn client_fetches_json() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/api/analytics/hourly")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"label":"09:00","pnl":4.5}]"#)
        .create();

    let value = client_for(&server).fetch(Endpoint::HourlyAnalytics).unwrap();
    assert_eq!(value[0]["pnl"], 4.5);
    m.assert();
}

#[test]
fn client_reports_http_errors() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/history_grouped")
        .with_status(503)
        .create();

    let err = client_for(&server)
        .fetch(Endpoint::HistoryGrouped)
        .unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[test]
fn hub_delivers_widget_views() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/conviction")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ORB":{"HIGH":{"wins":3,"total":4}},"trades":[]}"#)
        .create();

    let mut hub = FeedHub::new(client_for(&server));
    hub.mount(&Widget::new("sniper", WidgetKind::Sniper, "BTCUSDT"));
    assert_eq!(hub.status("sniper"), Some(&WidgetStatus::Loading));

    let (id, status) = hub.wait(Duration::from_secs(5)).expect("feed result");
    assert_eq!(id, "sniper");
    let WidgetStatus::Ready(WidgetView::Conviction(ConvictionView { rows })) = status else {
        panic!("expected conviction rows");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "ORB HIGH");
    assert_eq!(rows[0].win_rate, 75.0);
}

#[test]
fn hub_surfaces_failures_per_widget() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/morning_levels")
        .with_status(500)
        .create();

    let mut hub = FeedHub::new(client_for(&server));
    hub.set_refresh(WidgetKind::SentimentHeatmap, None);
    hub.mount(&Widget::new("sentiment", WidgetKind::SentimentHeatmap, ""));

    let (_, status) = hub.wait(Duration::from_secs(5)).expect("feed result");
    assert!(matches!(status, WidgetStatus::Failed(ref msg) if msg.contains("500")));
    assert_eq!(hub.diagnostics().snapshot()[0].failures, 1);
}

#[test]
fn unmounted_widget_result_is_dropped() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/api/history")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let mut hub = FeedHub::new(client_for(&server));
    hub.mount(&Widget::new("performance", WidgetKind::Performance, ""));
    hub.unmount("performance");

    assert!(hub.wait(Duration::from_millis(500)).is_none());
    assert!(hub.status("performance").is_none());
}
