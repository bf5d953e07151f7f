mod common;

use std::fmt;
use std::sync::{Arc, Mutex};

use blackjack_table::ParticipantId;
use common::{stacked, table};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct LogEntry {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

impl LogEntry {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Default)]
struct Capture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.entries.lock().unwrap().push(LogEntry {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

fn captured<F: FnOnce()>(f: F) -> Vec<LogEntry> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    let entries = capture.entries.lock().unwrap().clone();
    entries
}

#[test]
fn resolution_is_logged_with_outcome() {
    let entries = captured(|| {
        let mut table = table(0);
        let id = table
            .new_round_with_deck(stacked(&[
                "10_of_hearts", "6_of_clubs",
                "10_of_spades", "5_of_hearts",
                "6_of_diamonds",
            ]))
            .unwrap();
        table.stand(id).unwrap();
    });

    let resolved = entries
        .iter()
        .find(|e| e.message == "round resolved")
        .expect("resolution event");
    assert_eq!(resolved.level, Level::INFO);
    assert_eq!(resolved.field("outcome"), Some("Win (Dealer Bust)"));
    assert_eq!(resolved.field("dealer_total"), Some("22"));
    assert_eq!(resolved.field("status"), Some("Resolved"));

    let dealt = entries.iter().filter(|e| e.message == "card dealt").count();
    assert_eq!(dealt, 5);
}

#[test]
fn rejected_actions_and_empty_deck_warn() {
    let entries = captured(|| {
        let mut table = table(0);
        let id = table
            .new_round_with_deck(stacked(&[
                "10_of_hearts", "6_of_clubs",
                "10_of_spades", "8_of_hearts",
            ]))
            .unwrap();
        let _ = table.hit(id, ParticipantId::Dealer);
        let _ = table.stand(id);
    });

    let warnings: Vec<&str> = entries
        .iter()
        .filter(|e| e.level == Level::WARN)
        .map(|e| e.message.as_str())
        .collect();
    assert!(warnings.contains(&"hit rejected"));
    assert!(warnings.contains(&"draw from empty deck"));
    assert!(warnings.contains(&"stand did not resolve"));
}
