//! Replays the bundled sample scenario end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use regroup_harness::{Report, Scenario, replay};
use regroup_layout::EntityId;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

fn sample() -> Scenario {
    Scenario::load(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/sample.toml")).unwrap()
}

fn orders(report: &Report) -> Vec<String> {
    report
        .commits
        .iter()
        .map(|commit| {
            commit
                .sections
                .iter()
                .map(|s| format!("{}[{}]", s.id, s.items.join(" ")))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

// ============================================================================
// Tracing capture
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let layer = EventCapture::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().unwrap().clone();
    (result, events)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn sample_scenario_commits_three_orders() {
    let report = replay(&sample()).unwrap();
    assert_eq!(report.name, "groceries and hardware");
    assert_eq!(
        orders(&report),
        [
            "groceries[bread milk eggs] hardware[nails tape]",
            "groceries[bread eggs] hardware[milk nails tape]",
            "hardware[milk nails tape] groceries[bread eggs]",
        ]
    );
    let steps: Vec<_> = report.commits.iter().map(|c| c.step).collect();
    assert_eq!(steps, [3, 8, 12]);
}

#[test]
fn sample_scenario_settles_into_committed_layout() {
    let report = replay(&sample()).unwrap();
    let frame = &report.final_frame;
    assert!(frame.moving_item.is_none());
    assert_eq!(frame.content_height, 5.0 * 50.0 + 2.0 * 40.0);

    let hardware = frame.section(&EntityId::from("hardware")).unwrap();
    let groceries = frame.section(&EntityId::from("groceries")).unwrap();
    assert_eq!(hardware.visual.top, 0.0);
    assert_eq!(hardware.visual.height, 190.0);
    assert_eq!(groceries.visual.top, 190.0);
    assert_eq!(
        hardware.visual_item_order(),
        vec![
            EntityId::from("milk"),
            EntityId::from("nails"),
            EntityId::from("tape"),
        ]
    );
    assert_eq!(
        hardware.item(&EntityId::from("tape")).unwrap().visual.top,
        140.0
    );

    let labels: Vec<_> = report.snapshots.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["bread-first", "final"]);
    let first = &report.snapshots[0].frame;
    let groceries = first.section(&EntityId::from("groceries")).unwrap();
    assert_eq!(
        groceries.visual_item_order(),
        vec![
            EntityId::from("bread"),
            EntityId::from("milk"),
            EntityId::from("eggs"),
        ]
    );
}

#[test]
fn commits_are_logged_at_info() {
    let (report, events) = with_captured_events(|| replay(&sample()).unwrap());
    assert_eq!(report.commits.len(), 3);

    let committed: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .filter(|e| {
            e.fields
                .get("message")
                .is_some_and(|m| m.ends_with("reorder committed"))
        })
        .collect();
    assert_eq!(committed.len(), 3);
    assert_eq!(
        committed[1].fields.get("to_section").map(String::as_str),
        Some("hardware")
    );
}

#[test]
fn json_scenarios_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.json");
    let scenario = sample();
    std::fs::write(&path, serde_json::to_string(&scenario).unwrap()).unwrap();
    let loaded = Scenario::load(&path).unwrap();
    assert_eq!(loaded, scenario);
}
