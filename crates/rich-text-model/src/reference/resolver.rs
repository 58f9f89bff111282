use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use parking_lot::Mutex;
use rich_text_config::{Config, DEFAULT_LOCALE};

use crate::document::Document;
use crate::error::{LookupError, UnresolvedError};
use crate::model::NodePath;
use crate::reference::{ReferenceKey, ResolvedFields, ResourceReference};

/// Caller-supplied lookup of an entry or asset by id and kind.
///
/// Implementations may fail for any reason (missing resource, storage or
/// network trouble, their own timeout); the failure is reported to whoever
/// asked for the resolution. Closures of the right shape implement this
/// trait directly.
pub trait Resolve: Send + Sync {
    fn lookup(&self, key: &ReferenceKey) -> Result<ResolvedFields, LookupError>;
}

impl<F> Resolve for F
where
    F: Fn(&ReferenceKey) -> Result<ResolvedFields, LookupError> + Send + Sync,
{
    fn lookup(&self, key: &ReferenceKey) -> Result<ResolvedFields, LookupError> {
        self(key)
    }
}

/// A reference together with the fields it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub key: ReferenceKey,
    pub fields: Arc<ResolvedFields>,
}

type Slot = Arc<Mutex<Option<Arc<ResolvedFields>>>>;

/// Lookups started through [`resolve`] that have not settled yet.
static IN_FLIGHT: LazyLock<DashMap<ReferenceKey, Slot>> = LazyLock::new(DashMap::new);

/// Resolve a single reference.
///
/// An already-resolved reference returns its attached fields without calling
/// `resolver`. Concurrent calls for the same [`ReferenceKey`], whether through
/// one reference or several, wait for the first lookup instead of issuing
/// their own. Fields without a default locale get [`DEFAULT_LOCALE`], as with
/// a [`ReferenceResolver`] built from the default config. On failure nothing
/// is attached and a later call retries.
pub fn resolve<R>(
    reference: &ResourceReference,
    resolver: &R,
) -> Result<ResolvedReference, UnresolvedError>
where
    R: Resolve + ?Sized,
{
    let key = reference.key();

    // Lock order is always reference slot, then in-flight slot.
    let mut own = reference.slot().lock();
    if let Some(fields) = own.as_ref() {
        return Ok(ResolvedReference {
            key: key.clone(),
            fields: Arc::clone(fields),
        });
    }

    let gate = Arc::clone(IN_FLIGHT.entry(key.clone()).or_default().value());
    let outcome = {
        let mut shared = gate.lock();
        match shared.as_ref() {
            Some(fields) => Ok(Arc::clone(fields)),
            None => lookup(resolver, key, DEFAULT_LOCALE).map(|fields| {
                let fields = Arc::new(fields);
                *shared = Some(Arc::clone(&fields));
                fields
            }),
        }
    };

    // A failed gate stays while other callers still wait on it, so their
    // retries stay serialized with any newcomer.
    IN_FLIGHT.remove_if(key, |_, slot| {
        Arc::ptr_eq(slot, &gate) && (outcome.is_ok() || Arc::strong_count(slot) == 2)
    });

    let fields = outcome?;
    *own = Some(Arc::clone(&fields));
    Ok(ResolvedReference {
        key: key.clone(),
        fields,
    })
}

fn lookup<R>(
    resolver: &R,
    key: &ReferenceKey,
    default_locale: &str,
) -> Result<ResolvedFields, UnresolvedError>
where
    R: Resolve + ?Sized,
{
    let mut fields = resolver.lookup(key).map_err(|cause| {
        log::warn!("Failed to resolve {key}: {cause}");
        UnresolvedError {
            key: key.clone(),
            cause,
        }
    })?;
    if fields.default_locale().is_empty() {
        fields.set_default_locale(default_locale);
    }
    Ok(fields)
}

/// Resolver wrapper with a per-id single-resolution cache.
///
/// Every distinct [`ReferenceKey`] is looked up at most once successfully,
/// however many references share it and however many threads ask at the same
/// time. Failures are not cached.
pub struct ReferenceResolver<R> {
    resolver: R,
    slots: DashMap<ReferenceKey, Slot>,
    default_locale: String,
}

impl<R: Resolve> ReferenceResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            slots: DashMap::new(),
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn from_config(resolver: R, config: &Config) -> Self {
        Self::new(resolver).with_default_locale(&config.default_locale)
    }

    /// Locale assigned to resolved fields that arrive without one.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Resolve one reference, attaching the result to it.
    pub fn resolve(
        &self,
        reference: &ResourceReference,
    ) -> Result<ResolvedReference, UnresolvedError> {
        let key = reference.key();

        // Lock order is always reference slot, then shared slot.
        let mut own = reference.slot().lock();
        if let Some(fields) = own.as_ref() {
            return Ok(ResolvedReference {
                key: key.clone(),
                fields: Arc::clone(fields),
            });
        }

        let shared = self.slot_for(key);
        let mut shared = shared.lock();
        let fields = match shared.as_ref() {
            Some(fields) => {
                log::debug!("Resolved {key} from cache");
                Arc::clone(fields)
            }
            None => {
                let fields = Arc::new(lookup(&self.resolver, key, &self.default_locale)?);
                *shared = Some(Arc::clone(&fields));
                fields
            }
        };

        *own = Some(Arc::clone(&fields));
        Ok(ResolvedReference {
            key: key.clone(),
            fields,
        })
    }

    /// Resolve every embedded reference of `document`, in document order.
    ///
    /// A failing reference never stops the others; each gets its own outcome.
    pub fn resolve_document(&self, document: &Document) -> Resolution {
        let outcomes: Vec<ReferenceOutcome> = document
            .references()
            .map(|(path, reference)| ReferenceOutcome {
                path,
                key: reference.key().clone(),
                result: self.resolve(reference),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        log::debug!(
            "Resolved {} of {} references",
            outcomes.len() - failed,
            outcomes.len()
        );
        Resolution { outcomes }
    }

    pub fn cached(&self, key: &ReferenceKey) -> Option<Arc<ResolvedFields>> {
        let slot = self.slots.get(key).map(|slot| Arc::clone(slot.value()))?;
        slot.lock().clone()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn slot_for(&self, key: &ReferenceKey) -> Slot {
        Arc::clone(self.slots.entry(key.clone()).or_default().value())
    }
}

/// Outcome of resolving one embedded reference of a document.
#[derive(Debug)]
pub struct ReferenceOutcome {
    pub path: NodePath,
    pub key: ReferenceKey,
    pub result: Result<ResolvedReference, UnresolvedError>,
}

/// Per-reference report of a document-wide resolution. Partial results are
/// valid: some references may resolve while others fail.
#[derive(Debug)]
pub struct Resolution {
    outcomes: Vec<ReferenceOutcome>,
}

impl Resolution {
    pub fn outcomes(&self) -> &[ReferenceOutcome] {
        &self.outcomes
    }

    pub fn get(&self, path: &NodePath) -> Option<&ReferenceOutcome> {
        self.outcomes.iter().find(|o| &o.path == path)
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedReference> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnresolvedError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
