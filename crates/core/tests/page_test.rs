// Integration tests for PageHandle over the recording engine.
//
// Tests cover:
// - the five open() shapes and their canonical requests
// - handler rebinding keeps one native subscription
// - close() releases every subscription
// - load waiter completion
// - options merged over engine defaults

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use webpage::{
	Error, Handler, LoadStatus, OpenArg, Operation, PageEvent, PageHandle, PageOptions,
	PageSettings, RecordingPage, SignalKind,
};

fn setup() -> (Arc<RecordingPage>, PageHandle) {
	let native = Arc::new(RecordingPage::new());
	let page = PageHandle::new(native.clone(), PageOptions::new()).expect("page");
	(native, page)
}

fn counter(hits: &Arc<AtomicUsize>) -> OpenArg {
	let hits = Arc::clone(hits);
	OpenArg::callback(move |event| {
		if matches!(event, PageEvent::LoadFinished { .. }) {
			hits.fetch_add(1, Ordering::SeqCst);
		}
	})
}

#[test]
fn test_open_shapes_normalize() {
	let (native, page) = setup();
	let hits = Arc::new(AtomicUsize::new(0));
	let url = "http://localhost/echo";

	let cases: Vec<(Vec<OpenArg>, Operation, Option<serde_json::Value>, bool)> = vec![
		(vec![], Operation::Get, None, false),
		(vec![counter(&hits)], Operation::Get, None, true),
		(vec!["post".into(), counter(&hits)], Operation::Post, None, true),
		(vec!["post".into(), "a=1".into()], Operation::Post, Some(json!("a=1")), false),
		(
			vec!["post".into(), "a=1".into(), counter(&hits)],
			Operation::Post,
			Some(json!("a=1")),
			true,
		),
	];

	for (args, operation, data, binds_callback) in cases {
		page.clear_handler(SignalKind::LoadFinished);
		page.open(url, args).unwrap();

		let nav = native.last_navigation().unwrap();
		assert_eq!(nav.url(), url);
		assert_eq!(nav.operation(), &operation);
		assert_eq!(nav.data(), data.as_ref());
		assert_eq!(page.handler(SignalKind::LoadFinished).is_some(), binds_callback);
	}

	assert_eq!(native.navigations().len(), 5);
}

#[test]
fn test_open_callback_receives_load_finished() {
	let (native, page) = setup();
	let hits = Arc::new(AtomicUsize::new(0));

	page.open("http://localhost/", vec![counter(&hits)]).unwrap();
	native.complete_navigation(LoadStatus::Success).unwrap();

	assert_eq!(hits.load(Ordering::SeqCst), 1);
	assert_eq!(page.url(), "http://localhost/");
}

#[test]
fn test_too_many_arguments_is_usage_error() {
	let (native, page) = setup();
	let hits = Arc::new(AtomicUsize::new(0));

	let err = page
		.open(
			"http://localhost/",
			vec!["post".into(), "a".into(), counter(&hits), counter(&hits)],
		)
		.unwrap_err();

	assert!(matches!(err, Error::InvalidUsage(_)));
	assert!(native.navigations().is_empty());
}

#[test]
fn test_rebinding_each_signal_keeps_one_subscription() {
	let (native, page) = setup();

	for signal in SignalKind::ALL {
		let first = Arc::new(AtomicUsize::new(0));
		let second = Arc::new(AtomicUsize::new(0));

		let f = Arc::clone(&first);
		let h1: Handler = Arc::new(move |_: &PageEvent| {
			f.fetch_add(1, Ordering::SeqCst);
		});
		let s = Arc::clone(&second);
		let h2: Handler = Arc::new(move |_: &PageEvent| {
			s.fetch_add(1, Ordering::SeqCst);
		});

		page.set_handler(signal, h1).unwrap();
		page.set_handler(signal, h2.clone()).unwrap();

		assert_eq!(native.subscription_count(signal), 1, "{signal}");
		assert!(Arc::ptr_eq(&page.handler(signal).unwrap(), &h2));
	}

	native.emit(PageEvent::alert("hello"));
	assert_eq!(native.total_subscriptions(), SignalKind::ALL.len());
}

#[test]
fn test_rebinding_by_property_name() {
	let (native, page) = setup();
	let alerts = Arc::new(AtomicUsize::new(0));

	page.on_alert(|_| {}).unwrap();
	let a = Arc::clone(&alerts);
	page.set_handler_by_name(
		"onAlert",
		Arc::new(move |_: &PageEvent| {
			a.fetch_add(1, Ordering::SeqCst);
		}),
	)
	.unwrap();

	native.emit(PageEvent::alert("x"));
	assert_eq!(alerts.load(Ordering::SeqCst), 1);
	assert_eq!(native.subscription_count(SignalKind::Alert), 1);
}

#[test]
fn test_close_releases_subscriptions() {
	let (native, page) = setup();
	page.on_load_started(|| {}).unwrap();
	page.on_load_finished(|_| {}).unwrap();
	page.on_confirm(|_| true).unwrap();

	page.close().unwrap();
	page.close().unwrap();

	assert_eq!(native.total_subscriptions(), 0);
	assert!(native.is_closed());
	assert!(page.is_closed());
	assert!(page.on_alert(|_| {}).unwrap_err().is_target_closed());
}

#[tokio::test]
async fn test_open_waiter_completes() {
	let (native, page) = setup();

	let waiter = page
		.open_waiter("http://localhost/slow", Duration::from_secs(5))
		.unwrap();
	native.complete_navigation(LoadStatus::Fail).unwrap();

	assert_eq!(waiter.wait().await.unwrap(), LoadStatus::Fail);
}

#[tokio::test]
async fn test_open_and_wait_times_out() {
	let (_native, page) = setup();

	let err = page
		.open_and_wait("http://localhost/never", Duration::from_millis(20))
		.await
		.unwrap_err();

	assert!(err.is_timeout());
}

#[test]
fn test_options_deep_merge() {
	let native = Arc::new(RecordingPage::with_default_settings(PageSettings {
		user_agent: "engine".to_string(),
		..PageSettings::default()
	}));
	let page = PageHandle::new(
		native.clone(),
		PageOptions::new()
			.setting("javascriptEnabled", false)
			.custom_header("X-Test", "1")
			.zoom_factor(1.5),
	)
	.unwrap();

	let props = page.properties();
	assert!(!props.settings.javascript_enabled);
	assert!(props.settings.load_images);
	assert_eq!(props.settings.user_agent, "engine");
	assert_eq!(props.custom_headers.get("X-Test").map(String::as_str), Some("1"));
	assert_eq!(props.zoom_factor, 1.5);

	page.open_url("http://localhost/").unwrap();
	let nav = native.last_navigation().unwrap();
	assert!(!nav.settings().javascript_enabled);
}
