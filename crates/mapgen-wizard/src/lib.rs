//! Wizard controller for building mapping projects step by step.
//!
//! The wizard walks a fixed sequence of [`WizardStep`]s, owns the
//! [`Project`](mapgen_model::Project) being edited, and notifies subscribed
//! [`WizardObserver`]s whenever state changes or a step is entered.

mod error;
mod filter;
mod observer;
mod step;
mod wizard;

pub use error::{Result, WizardError};
pub use filter::{MatchMode, NameFilter, filter_names};
pub use observer::{StateChange, WizardObserver};
pub use step::WizardStep;
pub use wizard::{ExternalKeys, Wizard};
