//! In-memory capture of log events for test assertions

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::schema;

/// One recorded event: its level and every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(schema::FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(schema::FIELD_EVENT)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(schema::FIELD_COMPONENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct TextFields<'a>(&'a mut BTreeMap<String, String>);

// Integers and bools fall back to `record_debug`, which prints them bare.
impl Visit for TextFields<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer(Buffer);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut TextFields(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut buffer) = self.0.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct LogCapture(Buffer);

impl LogCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Boundary events one flow evaluation emitted for `op`
    pub fn for_flow(&self, op: &str, flow_name: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op) && e.field(schema::FIELD_FLOW_NAME) == Some(flow_name))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics when no `op`/`event` pair was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {}/{} event among {} captured",
            op,
            event,
            events.len()
        );
    }
}

static CAPTURE: OnceLock<LogCapture> = OnceLock::new();

/// Install the capture subscriber once per test binary and return its handle
///
/// The buffer is shared by every test in the binary; filter on a flow name
/// or an operation only one test uses.
///
/// ```
/// use flowdiff_core::logging_facility::init_test_capture;
/// use flowdiff_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> LogCapture {
    CAPTURE
        .get_or_init(|| {
            let buffer = Buffer::default();
            tracing_subscriber::registry()
                .with(CaptureLayer(Arc::clone(&buffer)))
                .try_init()
                .ok();
            LogCapture(buffer)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors_read_schema_fields() {
        let mut fields = BTreeMap::new();
        fields.insert(schema::FIELD_OP.to_string(), "evaluate_flow".to_string());
        fields.insert(schema::FIELD_EVENT.to_string(), schema::EVENT_START.to_string());
        fields.insert(schema::FIELD_FLOW_NAME.to_string(), "ingest".to_string());
        let event = CapturedEvent {
            level: Level::INFO,
            fields,
        };
        assert!(event.is("evaluate_flow", schema::EVENT_START));
        assert_eq!(event.field(schema::FIELD_FLOW_NAME), Some("ingest"));
        assert_eq!(event.component(), None);
    }
}
