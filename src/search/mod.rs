//! # Search Core
//!
//! The query-driven fetch lifecycle: normalized queries, the generation-owning
//! lifecycle manager, the observable result snapshot, and the input adapter.

pub mod controller;
pub mod lifecycle;
pub mod query;
pub mod state;

pub use controller::QueryController;
pub use lifecycle::{EmptyQueryPolicy, FetchLifecycleManager, SearchCompletion};
pub use query::Query;
pub use state::ResultState;
