//! # Marquee - Interactive Movie Search for the Terminal
//!
//! Looks up a remote movie catalog as the user types and lets them rate and
//! file results on a watched list. Lookups complete out of order; the fetch
//! lifecycle guarantees that only the most recently intended query's outcome
//! ever becomes visible.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  input text   ┌──────────────────┐  tagged lookups  ┌──────────┐
//! │     App     │──────────────▶│ QueryController  │─────────────────▶│ MovieApi │
//! │  (stdin /   │               │        +         │◀─────────────────│  (OMDb)  │
//! │   stdout)   │◀──────────────│ FetchLifecycle   │   completions    └──────────┘
//! └─────────────┘   snapshot    │     Manager      │
//!        ▲                      └──────────────────┘
//!        │  query-changed event          │
//!        └── DetailView closes ◀─────────┘
//! ```
//!
//! The lifecycle manager owns the generation counter and the result
//! snapshot; a completing lookup is applied only if it still belongs to the
//! current generation, which makes stale results harmless regardless of
//! whether the transport honored cancellation.

pub mod api;
pub mod app;
pub mod cmd_args;
pub mod config;
pub mod detail;
pub mod events;
pub mod search;
pub mod watched;

// Re-export main types for easy access
pub use api::{ApiError, MovieApi, MovieDetail, MovieSummary, OmdbClient};
pub use app::AppController;
pub use cmd_args::CommandLineArgs;
pub use detail::DetailView;
pub use events::{SearchEvent, SearchEventBus};
pub use search::{
    EmptyQueryPolicy, FetchLifecycleManager, Query, QueryController, ResultState, SearchCompletion,
};
pub use watched::{WatchedList, WatchedMovie, WatchedSummary};
