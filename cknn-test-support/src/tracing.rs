//! In-memory `tracing` layer for asserting on instrumentation.

use std::{
    collections::HashMap,
    error::Error,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// Field name to rendered value.
pub type Fields = HashMap<String, String>;

/// A span captured when it closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Name from the span metadata, e.g. `cknn.build`.
    pub name: String,
    /// Fields given at creation plus any recorded later.
    pub fields: Fields,
}

/// An event captured when it was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Verbosity level.
    pub level: Level,
    /// Event fields; the formatted text is stored under `message`.
    pub fields: Fields,
}

#[derive(Default)]
struct Captured {
    spans: Vec<SpanRecord>,
    events: Vec<EventRecord>,
}

/// Layer that stores closed spans and emitted events in memory.
///
/// Clones share storage, so install one clone in a subscriber and read
/// the captured data back through another:
///
/// ```
/// use cknn_test_support::tracing::RecordingLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = RecordingLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let _guard = tracing::info_span!("outer", size = 3).entered();
///     tracing::info!(rounds = 2, "done");
/// });
///
/// assert_eq!(layer.spans()[0].name, "outer");
/// assert_eq!(layer.events()[0].fields["rounds"], "2");
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    captured: Arc<Mutex<Captured>>,
}

impl RecordingLayer {
    /// Closed spans, oldest first.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> { self.lock().spans.clone() }

    /// Emitted events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> { self.lock().events.clone() }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        // A test that panicked mid-record still leaves usable data behind.
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct PendingSpan(SpanRecord);

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::new();
        attrs.record(&mut FieldCollector(&mut fields));
        span.extensions_mut().insert(PendingSpan(SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields,
        }));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id)
            && let Some(pending) = span.extensions_mut().get_mut::<PendingSpan>()
        {
            values.record(&mut FieldCollector(&mut pending.0.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id)
            && let Some(PendingSpan(record)) = span.extensions_mut().remove::<PendingSpan>()
        {
            self.lock().spans.push(record);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut FieldCollector(&mut fields));
        self.lock().events.push(EventRecord {
            level: *event.metadata().level(),
            fields,
        });
    }
}

/// Renders every field with `Display` where one exists, `Debug` otherwise.
struct FieldCollector<'a>(&'a mut Fields);

impl FieldCollector<'_> {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for FieldCollector<'_> {
    fn record_f64(&mut self, field: &Field, value: f64) { self.put(field, value.to_string()); }

    fn record_i64(&mut self, field: &Field, value: i64) { self.put(field, value.to_string()); }

    fn record_u64(&mut self, field: &Field, value: u64) { self.put(field, value.to_string()); }

    fn record_bool(&mut self, field: &Field, value: bool) { self.put(field, value.to_string()); }

    fn record_str(&mut self, field: &Field, value: &str) { self.put(field, value.to_owned()); }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}
