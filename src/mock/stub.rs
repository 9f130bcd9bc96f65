use std::{
    fmt::{self, Formatter},
    num::NonZeroUsize,
};

use crate::matcher::InvocationMatcher;

/// Writes into the `&mut` destinations of a call before it is answered.
pub type Fill<I> = Box<dyn FnMut(&mut I) + Send>;

pub struct Stub<I, O> {
    matcher: Box<dyn InvocationMatcher<I> + Send>,
    answer: Answer<I, O>,
    fill: Option<Fill<I>>,
    limit: Option<NonZeroUsize>,
    answered: usize,
    optional: bool,
}

pub enum Answer<I, O> {
    Exhausted,
    Once(Box<dyn FnOnce(I) -> O + Send>),
    Many {
        stub: Box<dyn FnMut(I) -> O + Send>,
        times: Times,
    },
    Receiver {
        times: Times,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum Times {
    Always,
    Times(NonZeroUsize),
}

#[derive(Debug)]
pub enum Error {
    Exhausted,
    NoReceiver,
}

impl Times {
    pub const ONCE: Times = match NonZeroUsize::new(1) {
        Some(n) => Times::Times(n),
        None => Times::Always,
    };

    pub fn decrement(self) -> Option<Self> {
        match self {
            Times::Always => Some(self),
            Times::Times(n) => NonZeroUsize::new(n.get() - 1).map(Times::Times),
        }
    }

    fn limit(self) -> Option<NonZeroUsize> {
        match self {
            Times::Always => None,
            Times::Times(n) => Some(n),
        }
    }
}

impl<I, O> Stub<I, O> {
    pub fn new(
        answer: Answer<I, O>,
        matcher: Box<dyn InvocationMatcher<I> + Send>,
        fill: Option<Fill<I>>,
        optional: bool,
    ) -> Self {
        let limit = match &answer {
            Answer::Exhausted => NonZeroUsize::new(1),
            Answer::Once(_) => NonZeroUsize::new(1),
            Answer::Many { times, .. } | Answer::Receiver { times } => times.limit(),
        };

        Stub {
            matcher,
            answer,
            fill,
            limit,
            answered: 0,
            optional,
        }
    }

    /// Checks the arguments against this stub's matcher, returning a
    /// formatted report when they do not match.
    pub fn matches(&self, input: &I) -> Result<(), String> {
        self.matcher
            .matches(input)
            .map_err(|e| e.formatted(self.matcher.expectations()).to_string())
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.answer, Answer::Exhausted)
    }

    pub fn returns_receiver(&self) -> bool {
        matches!(self.answer, Answer::Receiver { .. })
    }

    /// Runs the fill on `input`, if any, then answers with the filled
    /// arguments.
    pub fn answer(&mut self, input: &mut I, receiver: &mut Option<O>) -> Result<O, Error>
    where
        I: Clone,
    {
        if let Some(fill) = &mut self.fill {
            fill(input);
        }
        let output = self.answer.call(input.clone(), receiver)?;
        self.answered += 1;
        Ok(output)
    }

    /// Describes why this stub is not yet satisfied, if it is not.
    pub fn unsatisfied(&self) -> Option<String> {
        if self.optional {
            return None;
        }

        let expectations = self.matcher.expectations().join(", ");
        match self.limit {
            None if self.answered == 0 => Some(format!(
                "({}) expected at least one call but was never called",
                expectations
            )),
            Some(limit) if self.answered < limit.get() => Some(format!(
                "({}) expected {} call(s) but was called {} time(s)",
                expectations, limit, self.answered
            )),
            _ => None,
        }
    }
}

impl<I, O> Answer<I, O> {
    fn call(&mut self, input: I, receiver: &mut Option<O>) -> Result<O, Error> {
        // no need to replace if we can keep decrementing
        match self {
            Answer::Many { stub, times } => {
                if let Some(decremented) = times.decrement() {
                    *times = decremented;
                    return Ok(stub(input));
                }
            }
            Answer::Receiver { times } => {
                let receiver = receiver.take().ok_or(Error::NoReceiver)?;
                if let Some(decremented) = times.decrement() {
                    *times = decremented;
                } else {
                    *self = Answer::Exhausted;
                }
                return Ok(receiver);
            }
            _ => {}
        }

        // otherwise replace it with an exhaust
        match std::mem::replace(self, Answer::Exhausted) {
            Answer::Exhausted | Answer::Receiver { .. } => Err(Error::Exhausted),
            Answer::Once(stub) => Ok(stub(input)),
            Answer::Many { mut stub, .. } => Ok(stub(input)),
        }
    }
}

impl<I, O> fmt::Debug for Stub<I, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stub")
            .field("expectations", &self.matcher.expectations())
            .field(
                "answer",
                match &self.answer {
                    Answer::Exhausted => &"Exhausted",
                    Answer::Once(_) => &"Once",
                    Answer::Many { .. } => &"Many",
                    Answer::Receiver { .. } => &"Receiver",
                },
            )
            .field("fills", &self.fill.is_some())
            .field("answered", &self.answered)
            .finish()
    }
}
