//! Deferred output values
//!
//! A declared resource's attributes are not known until something outside
//! this repository provisions it (or the preview engine fabricates
//! placeholders). `Output<T>` is the handle for such a value: it resolves at
//! most once, derived values fire exactly once when every input has resolved,
//! and each output remembers which resources it came from so that consuming
//! one establishes a dependency edge in the graph.

use crate::error::{GraphError, Result};
use crate::resource::Urn;
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Notify;

/// Placeholder emitted when a still-pending output is serialized into a
/// declaration snapshot.
pub const COMPUTED: &str = "<computed>";

type Callback<T> = Box<dyn FnOnce(T) + Send>;

struct State<T> {
    value: Option<T>,
    callbacks: Vec<Callback<T>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

/// A single-shot deferred value.
pub struct Output<T> {
    inner: Arc<Inner<T>>,
    deps: Vec<Urn>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            deps: self.deps.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Output<T> {
    /// A pending output with no resource provenance.
    pub fn pending() -> Self {
        Self::with_deps(Vec::new())
    }

    /// A pending output produced by the given resource. Consuming this value
    /// in another declaration makes that declaration depend on `urn`.
    pub fn pending_for(urn: &Urn) -> Self {
        Self::with_deps(vec![urn.clone()])
    }

    /// An output that is already known.
    pub fn resolved(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    value: Some(value),
                    callbacks: Vec::new(),
                }),
                notify: Notify::new(),
            }),
            deps: Vec::new(),
        }
    }

    fn with_deps(deps: Vec<Urn>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    value: None,
                    callbacks: Vec::new(),
                }),
                notify: Notify::new(),
            }),
            deps,
        }
    }

    /// Resolve the output. At most once: a second call is an error.
    pub fn resolve(&self, value: T) -> Result<()> {
        let callbacks = {
            let mut state = self.inner.state.lock();
            if state.value.is_some() {
                return Err(GraphError::OutputAlreadyResolved);
            }
            state.value = Some(value.clone());
            std::mem::take(&mut state.callbacks)
        };
        for callback in callbacks {
            callback(value.clone());
        }
        self.inner.notify.notify_waiters();
        Ok(())
    }

    /// The value, if resolution has happened.
    pub fn try_get(&self) -> Option<T> {
        self.inner.state.lock().value.clone()
    }

    /// Wait until the output resolves.
    pub async fn get(&self) -> T {
        loop {
            let notified = self.inner.notify.notified();
            if let Some(value) = self.try_get() {
                return value;
            }
            notified.await;
        }
    }

    /// Run `f` when the value becomes available (immediately if it already
    /// is). Fires exactly once.
    pub fn on_resolve(&self, f: impl FnOnce(T) + Send + 'static) {
        let mut state = self.inner.state.lock();
        if let Some(value) = state.value.clone() {
            drop(state);
            f(value);
        } else {
            state.callbacks.push(Box::new(f));
        }
    }

    /// Derive a new output from this one. Inherits resource provenance.
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let derived = Output::with_deps(self.deps.clone());
        let target = derived.clone();
        self.on_resolve(move |value| {
            // the derived cell is only ever resolved from this callback
            let _ = target.resolve(f(value));
        });
        derived
    }

    /// Join two outputs: `f` fires exactly once, when both have resolved.
    /// The result carries the union of both inputs' provenance.
    pub fn join2<A, B, F>(a: &Output<A>, b: &Output<B>, f: F) -> Output<T>
    where
        A: Clone + Send + 'static,
        B: Clone + Send + 'static,
        F: FnOnce(A, B) -> T + Send + 'static,
    {
        let mut deps = a.deps.clone();
        for dep in &b.deps {
            if !deps.contains(dep) {
                deps.push(dep.clone());
            }
        }
        let derived = Output::with_deps(deps);

        let join = Arc::new(Mutex::new(Join {
            left: None,
            right: None,
            f: Some(f),
        }));

        {
            let join = Arc::clone(&join);
            let target = derived.clone();
            a.on_resolve(move |value| {
                join.lock().left = Some(value);
                fire(&join, &target);
            });
        }
        {
            let join = Arc::clone(&join);
            let target = derived.clone();
            b.on_resolve(move |value| {
                join.lock().right = Some(value);
                fire(&join, &target);
            });
        }

        derived
    }

    /// The resources this value is (transitively) derived from.
    pub fn dependencies(&self) -> &[Urn] {
        &self.deps
    }
}

struct Join<A, B, F> {
    left: Option<A>,
    right: Option<B>,
    f: Option<F>,
}

fn fire<A, B, T, F>(join: &Mutex<Join<A, B, F>>, target: &Output<T>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    T: Clone + Send + 'static,
    F: FnOnce(A, B) -> T + Send + 'static,
{
    let computed = {
        let mut guard = join.lock();
        if guard.left.is_some() && guard.right.is_some() {
            // `f` is gone once the join has fired
            guard
                .f
                .take()
                .zip(guard.left.take())
                .zip(guard.right.take())
                .map(|((f, left), right)| f(left, right))
        } else {
            None
        }
    };
    if let Some(value) = computed {
        let _ = target.resolve(value);
    }
}

impl<T> Serialize for Output<T>
where
    T: Serialize + Clone + Send + 'static,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.try_get() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str(COMPUTED),
        }
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.inner.state.lock().value.is_some();
        f.debug_struct("Output")
            .field("resolved", &resolved)
            .field("deps", &self.deps)
            .finish()
    }
}
