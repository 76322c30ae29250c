//! Marker traits for state and trigger enums.
//!
//! Any `Copy + Eq + Hash + Debug` enum qualifies via the blanket impls;
//! agent kinds never implement these by hand.

use std::fmt::Debug;
use std::hash::Hash;

/// A state enumerant: one named mode of an agent's behavior.
pub trait StateKind: Copy + Eq + Hash + Debug + 'static {}
impl<S: Copy + Eq + Hash + Debug + 'static> StateKind for S {}

/// A trigger enumerant: one named event that may cause a transition.
pub trait TriggerKind: Copy + Eq + Hash + Debug + 'static {}
impl<T: Copy + Eq + Hash + Debug + 'static> TriggerKind for T {}
