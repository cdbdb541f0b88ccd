//! Communication event: one action by one unit.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single communication event.
///
/// `order` is only comparable between events of the same context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<U, C> {
    pub unit: U,
    pub context: Option<C>,
    pub order: Option<i64>,
    /// Event intensity. Defaults to 1.
    pub value: f64,
}

impl<U, C> Event<U, C> {
    pub fn new(unit: U) -> Self {
        Self { unit, context: None, order: None, value: 1.0 }
    }

    /// Event inside `context`, with default weight and no order.
    pub fn in_context(unit: U, context: C) -> Self {
        Self::new(unit).with_context(context)
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// The context, or an `InvalidInput` error naming the event position.
    pub fn require_context(&self, position: usize) -> Result<&C> {
        self.context.as_ref().ok_or_else(|| Error::InvalidInput {
            argument: "context",
            message: format!("event {position} has no context"),
        })
    }

    /// The order, or an `InvalidInput` error naming the event position.
    pub fn require_order(&self, position: usize) -> Result<i64> {
        self.order.ok_or_else(|| Error::InvalidInput {
            argument: "order",
            message: format!("event {position} has no order"),
        })
    }
}

/// Build events from parallel sequences.
///
/// `contexts`, `orders` and `values` are optional; when given they must have
/// the same length as `units`.
pub fn events_from_columns<U, C>(
    units: Vec<U>,
    contexts: Option<Vec<C>>,
    orders: Option<Vec<i64>>,
    values: Option<Vec<f64>>,
) -> Result<Vec<Event<U, C>>> {
    let n = units.len();
    check_len("contexts", n, contexts.as_ref().map(Vec::len))?;
    check_len("orders", n, orders.as_ref().map(Vec::len))?;
    check_len("values", n, values.as_ref().map(Vec::len))?;

    let mut contexts = contexts.map(Vec::into_iter);
    let mut orders = orders.map(Vec::into_iter);
    let mut values = values.map(Vec::into_iter);

    Ok(units
        .into_iter()
        .map(|unit| Event {
            unit,
            context: contexts.as_mut().and_then(Iterator::next),
            order: orders.as_mut().and_then(Iterator::next),
            value: values.as_mut().and_then(Iterator::next).unwrap_or(1.0),
        })
        .collect())
}

pub(crate) fn check_len(argument: &'static str, expected: usize, got: Option<usize>) -> Result<()> {
    match got {
        Some(got) if got != expected => Err(Error::LengthMismatch { argument, expected, got }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let e: Event<&str, u32> = Event::new("alice");
        assert_eq!(e.value, 1.0);
        assert!(e.context.is_none());
        let e = e.with_context(7).with_order(3).with_value(2.5);
        assert_eq!(e.context, Some(7));
        assert_eq!(e.order, Some(3));
        assert_eq!(e.value, 2.5);
    }

    #[test]
    fn test_columns_zip() {
        let events = events_from_columns(
            vec!["a", "b"],
            Some(vec!["t1", "t1"]),
            Some(vec![1, 2]),
            None,
        )
        .unwrap();
        assert_eq!(events[1], Event::in_context("b", "t1").with_order(2));
    }

    #[test]
    fn test_columns_length_mismatch_names_argument() {
        let err = events_from_columns(vec!["a", "b"], Some(vec!["t1"]), None, None).unwrap_err();
        match err {
            Error::LengthMismatch { argument, expected, got } => {
                assert_eq!(argument, "contexts");
                assert_eq!((expected, got), (2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_context_is_invalid() {
        let e: Event<&str, &str> = Event::new("a");
        assert!(e.require_context(4).unwrap_err().is_invalid_input());
    }
}
