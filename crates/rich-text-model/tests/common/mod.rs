#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use rich_text_model::{LookupError, ReferenceKey, Resolve, ResolvedFields, ResourceKind};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fake_entry(id: &str) -> ResolvedFields {
    ResolvedFields::new("en-US")
        .with_content_type("article")
        .with_field("title", "en-US", format!("Title of {id}"))
        .with_field("title", "de-DE", format!("Titel von {id}"))
}

pub fn fake_asset(id: &str) -> ResolvedFields {
    ResolvedFields::new("en-US").with_field(
        "file",
        "en-US",
        json!({
            "url": format!("https://assets.example.com/{id}.png"),
            "contentType": "image/png",
        }),
    )
}

/// In-memory resolver that counts every lookup it serves.
pub struct CountingResolver {
    known: HashSet<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CountingResolver {
    pub fn new<'a>(known: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            known: known.into_iter().map(str::to_string).collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every lookup open for `delay`, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve for CountingResolver {
    fn lookup(&self, key: &ReferenceKey) -> Result<ResolvedFields, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if !self.known.contains(&key.id) {
            return Err(LookupError::NotFound);
        }
        Ok(match key.kind {
            ResourceKind::Entry => fake_entry(&key.id),
            ResourceKind::Asset => fake_asset(&key.id),
        })
    }
}
