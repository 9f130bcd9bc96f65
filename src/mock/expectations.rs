use std::{any::Any, fmt};

use super::stub::{self, Stub};
use crate::{error::MockError, matcher::InvocationMatcher};

/// Stubs and call log of a single mocked method.
pub struct Expectations<I, O> {
    stubs: Vec<Stub<I, O>>,
    calls: Vec<I>,
}

impl<I, O> Expectations<I, O> {
    pub fn new() -> Self {
        Expectations {
            stubs: vec![],
            calls: vec![],
        }
    }

    pub fn add_stub(&mut self, stub: Stub<I, O>) {
        self.stubs.push(stub)
    }

    pub fn calls(&self) -> &[I] {
        &self.calls
    }

    /// Answers an invocation with the first registered stub that
    /// matches the arguments and is not exhausted.
    ///
    /// The arguments are recorded as they were passed in, before the
    /// stub fills them.
    pub fn call(
        &mut self,
        method: &'static str,
        input: &mut I,
        mut receiver: Option<O>,
    ) -> Result<O, MockError>
    where
        I: Clone + fmt::Debug,
    {
        if self.stubs.is_empty() {
            return Err(MockError::Unregistered {
                method,
                args: format!("{:?}", input),
            });
        }

        let mut mismatches = vec![];
        let mut exhausted = false;
        let position = self.stubs.iter().position(|stub| match stub.matches(input) {
            Ok(()) if stub.is_exhausted() => {
                exhausted = true;
                false
            }
            Ok(()) => true,
            Err(mismatch) => {
                mismatches.push(mismatch);
                false
            }
        });

        let stub = match position {
            Some(index) => &mut self.stubs[index],
            None if exhausted => {
                return Err(MockError::Exhausted {
                    method,
                    args: format!("{:?}", input),
                })
            }
            None => {
                return Err(MockError::Unmatched {
                    method,
                    args: format!("{:?}", input),
                    report: mismatches
                        .iter()
                        .map(|mismatch| format!("✗ {}", mismatch))
                        .collect::<Vec<_>>()
                        .join("\n"),
                })
            }
        };

        if stub.returns_receiver() && receiver.is_none() {
            return Err(MockError::NoReceiver { method });
        }

        self.calls.push(input.clone());
        stub.answer(input, &mut receiver).map_err(|e| match e {
            stub::Error::Exhausted => MockError::Exhausted {
                method,
                args: format!("{:?}", self.calls.last()),
            },
            stub::Error::NoReceiver => MockError::NoReceiver { method },
        })
    }

    /// Number of recorded calls accepted by `matcher`.
    pub fn count_matching(&self, matcher: &dyn InvocationMatcher<I>) -> usize {
        self.calls
            .iter()
            .filter(|call| matcher.matches(call).is_ok())
            .count()
    }
}

/// An [`Expectations`] with its generics erased.
///
/// This allows the expectations of every method of a mock to be
/// saved in the same collection. The typed view is recovered through
/// [`Any`] downcasting.
pub trait Erased: Send {
    fn call_count(&self) -> usize;
    fn recorded(&self) -> String;
    fn unsatisfied(&self) -> Vec<String>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<I, O> Erased for Expectations<I, O>
where
    I: fmt::Debug + Send + 'static,
    O: Send + 'static,
{
    fn call_count(&self) -> usize {
        self.calls.len()
    }

    fn recorded(&self) -> String {
        self.calls
            .iter()
            .map(|call| format!("{:?}", call))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn unsatisfied(&self) -> Vec<String> {
        self.stubs.iter().filter_map(Stub::unsatisfied).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<I, O> fmt::Debug for Expectations<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectations")
            .field("stubs", &self.stubs)
            .field("calls", &self.calls.len())
            .finish()
    }
}
