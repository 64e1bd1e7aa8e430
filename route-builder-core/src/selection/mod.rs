//! Click-driven selection of street edges

mod machine;

pub use machine::{RejectReason, SelectionEvent, SelectionStateMachine, Transition};
