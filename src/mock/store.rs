use std::{collections::BTreeMap, fmt, sync::Arc};

use parking_lot::Mutex;

use super::{
    expectations::{Erased, Expectations},
    stub::Stub,
    Method,
};
use crate::{
    error::{self, MockError},
    matcher::InvocationMatcher,
};

/// Call-recording store shared by every mocked method of a mock.
///
/// Each method owns an ordered list of stubs and a log of the
/// arguments it was called with. Methods are keyed by name and kept in
/// name order so failure reports are deterministic.
///
/// Every method is locked on its own: a call only blocks calls to the
/// same method.
#[derive(Default)]
pub struct Store {
    methods: Mutex<BTreeMap<&'static str, Arc<Mutex<Box<dyn Erased>>>>>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Registers a stub for `method`, after any existing ones.
    pub(crate) fn add_stub<R, I, O>(&self, method: Method<R, I, O>, stub: Stub<I, O>)
    where
        I: fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        tracing::debug!(method = method.name(), ?stub, "registering expectation");

        let expectations = self
            .methods
            .lock()
            .entry(method.name())
            .or_insert_with(|| {
                let erased: Box<dyn Erased> = Box::new(Expectations::<I, O>::new());
                Arc::new(Mutex::new(erased))
            })
            .clone();

        let mut guard = expectations.lock();
        match guard.as_any_mut().downcast_mut::<Expectations<I, O>>() {
            Some(expectations) => expectations.add_stub(stub),
            None => error::fail(MockError::TypeMismatch {
                method: method.name(),
            }),
        }
    }

    /// Answers a call to `method`, failing the test if no
    /// expectation accepts it.
    ///
    /// `receiver` is what the method returns when it was told to
    /// [`then_return_self`](crate::When::then_return_self); pass
    /// `None` for methods that do not chain.
    ///
    /// The stub is run while the method is locked so it must not call
    /// back into the same method.
    pub fn call<R, I, O>(&self, method: Method<R, I, O>, args: I, receiver: Option<O>) -> O
    where
        I: Clone + fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        let mut args = args;
        self.call_mut(method, &mut args, receiver)
    }

    /// Analog of [`call`](Store::call) for methods with `&mut`
    /// destinations.
    ///
    /// The call is recorded with `args` as passed in. A stub programmed
    /// with [`fill`](crate::When::fill) then writes into `args`, and the
    /// caller copies them back into its destinations.
    pub fn call_mut<R, I, O>(
        &self,
        method: Method<R, I, O>,
        args: &mut I,
        receiver: Option<O>,
    ) -> O
    where
        I: Clone + fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        match self.try_call_mut(method, args, receiver) {
            Ok(output) => output,
            Err(e) => error::fail(e),
        }
    }

    /// Answers a call to a method whose only argument is the `&mut`
    /// destination `dest`, writing back what the stub filled in.
    pub fn call_into<R, D, O>(&self, method: Method<R, (D,), O>, dest: &mut D) -> O
    where
        D: Clone + fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        let mut args = (dest.clone(),);
        let output = self.call_mut(method, &mut args, None);
        *dest = args.0;
        output
    }

    /// Analog of [`call`](Store::call) that returns the harness
    /// failure instead of panicking.
    pub fn try_call<R, I, O>(
        &self,
        method: Method<R, I, O>,
        args: I,
        receiver: Option<O>,
    ) -> Result<O, MockError>
    where
        I: Clone + fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        let mut args = args;
        self.try_call_mut(method, &mut args, receiver)
    }

    /// Analog of [`call_mut`](Store::call_mut) that returns the harness
    /// failure instead of panicking.
    pub fn try_call_mut<R, I, O>(
        &self,
        method: Method<R, I, O>,
        args: &mut I,
        receiver: Option<O>,
    ) -> Result<O, MockError>
    where
        I: Clone + fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        tracing::trace!(method = method.name(), ?args, "mocked call");

        let expectations = match self.method(method.name()) {
            Some(expectations) => expectations,
            None => {
                return Err(MockError::Unregistered {
                    method: method.name(),
                    args: format!("{:?}", args),
                })
            }
        };

        let mut guard = expectations.lock();
        let expectations = guard
            .as_any_mut()
            .downcast_mut::<Expectations<I, O>>()
            .ok_or(MockError::TypeMismatch {
                method: method.name(),
            })?;

        expectations.call(method.name(), args, receiver)
    }

    /// Returns a copy of the arguments of every recorded call to
    /// `method`, oldest first.
    pub fn calls<R, I, O>(&self, method: Method<R, I, O>) -> Vec<I>
    where
        I: Clone + 'static,
        O: 'static,
    {
        self.method(method.name())
            .and_then(|expectations| {
                let expectations = expectations.lock();
                expectations
                    .as_any()
                    .downcast_ref::<Expectations<I, O>>()
                    .map(|expectations| expectations.calls().to_vec())
            })
            .unwrap_or_default()
    }

    /// Number of recorded calls to `method`, regardless of arguments.
    pub fn call_count<R, I, O>(&self, method: Method<R, I, O>) -> usize {
        self.method(method.name())
            .map_or(0, |expectations| expectations.lock().call_count())
    }

    /// Number of recorded calls to `method` accepted by `matcher`.
    pub(crate) fn count_matching<R, I, O>(
        &self,
        method: Method<R, I, O>,
        matcher: &dyn InvocationMatcher<I>,
    ) -> usize
    where
        I: 'static,
        O: 'static,
    {
        self.method(method.name()).map_or(0, |expectations| {
            let expectations = expectations.lock();
            expectations
                .as_any()
                .downcast_ref::<Expectations<I, O>>()
                .map_or(0, |expectations| expectations.count_matching(matcher))
        })
    }

    /// Debug representation of every recorded call to `method`.
    pub(crate) fn recorded<R, I, O>(&self, method: Method<R, I, O>) -> String {
        self.method(method.name())
            .map(|expectations| expectations.lock().recorded())
            .unwrap_or_default()
    }

    fn method(&self, name: &str) -> Option<Arc<Mutex<Box<dyn Erased>>>> {
        self.methods.lock().get(name).cloned()
    }

    // snapshot so no method is locked while the map is
    fn methods(&self) -> Vec<(&'static str, Arc<Mutex<Box<dyn Erased>>>)> {
        self.methods
            .lock()
            .iter()
            .map(|(name, expectations)| (*name, expectations.clone()))
            .collect()
    }

    /// Checks that every non-optional expectation was fully used.
    pub fn verify(&self) -> Result<(), MockError> {
        let unsatisfied: Vec<_> = self
            .methods()
            .into_iter()
            .flat_map(|(name, expectations)| {
                let reasons = expectations.lock().unsatisfied();
                reasons
                    .into_iter()
                    .map(move |reason| format!("  `{}` {}", name, reason))
            })
            .collect();

        if unsatisfied.is_empty() {
            Ok(())
        } else {
            Err(MockError::Unsatisfied(unsatisfied))
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.methods()
                    .into_iter()
                    .map(|(name, e)| (name, e.lock().call_count())),
            )
            .finish()
    }
}
