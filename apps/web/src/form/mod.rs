//! The match form: state machine, score tiers, the page view model and the
//! handlers that drive them.

pub mod handlers;
pub mod state;
pub mod tier;
pub mod view;
