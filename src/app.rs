//! # Application Controller
//!
//! Orchestrates the interactive session: a single event loop over stdin
//! lines, search completions, and detail-lookup outcomes. Plain lines are
//! search text; `:`-prefixed lines are commands. Rendering is plain text.

use crate::api::{ApiError, MovieApi, MovieDetail};
use crate::cmd_args::CommandLineArgs;
use crate::detail::DetailView;
use crate::events::SearchEvent;
use crate::search::{EmptyQueryPolicy, FetchLifecycleManager, QueryController};
use crate::watched::{WatchedList, WatchedMovie};
use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outcome of one detail lookup, tagged with the id it was issued for.
struct DetailOutcome {
    id: String,
    outcome: Result<MovieDetail, ApiError>,
}

/// The main application controller wiring search, detail view and watched
/// list together.
pub struct AppController {
    api: Arc<dyn MovieApi>,
    manager: FetchLifecycleManager,
    query_controller: QueryController,
    detail: Arc<Mutex<DetailView>>,
    watched: WatchedList,
    verbose: bool,
    should_quit: bool,
    detail_tx: mpsc::Sender<DetailOutcome>,
    detail_rx: mpsc::Receiver<DetailOutcome>,
}

impl AppController {
    pub fn new(api: Arc<dyn MovieApi>, cmd_args: &CommandLineArgs) -> Self {
        let policy = match cmd_args.default_search() {
            Some(term) => EmptyQueryPolicy::Substitute(term.to_string()),
            None => EmptyQueryPolicy::Skip,
        };
        let mut manager = FetchLifecycleManager::with_policy(Arc::clone(&api), policy);

        // A new search cycle closes the open detail panel; the panel owns
        // its own closing logic, the manager only announces the cycle.
        let detail = Arc::new(Mutex::new(DetailView::new()));
        let closer = Arc::clone(&detail);
        manager.subscribe(Box::new(move |event| {
            if matches!(event, SearchEvent::QueryChanged) {
                closer.lock().unwrap().close();
            }
        }));

        let (detail_tx, detail_rx) = mpsc::channel(10);
        Self {
            api,
            manager,
            query_controller: QueryController::new(),
            detail,
            watched: WatchedList::new(),
            verbose: cmd_args.verbose(),
            should_quit: false,
            detail_tx,
            detail_rx,
        }
    }

    /// Run the main application loop until `:q` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        while !self.should_quit {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => self.handle_line(&line),
                        None => break,
                    }
                }
                completion = self.manager.next_completion() => {
                    if let Some(completion) = completion {
                        self.manager.apply_completion(completion);
                        self.render_results();
                    }
                }
                Some(outcome) = self.detail_rx.recv() => {
                    self.apply_detail_outcome(outcome);
                }
            }
        }

        self.manager.dispose();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        if let Some(command) = line.strip_prefix(':') {
            self.handle_command(command);
        } else {
            self.query_controller.input_changed(line, &mut self.manager);
            if self.manager.snapshot().is_loading() {
                println!("Loading...");
            } else {
                self.render_results();
            }
        }
    }

    fn handle_command(&mut self, command: &str) {
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("q") | Some("quit"), _) => self.should_quit = true,
            (Some("open"), Some(n)) => self.open_result(n),
            (Some("close"), _) => self.detail.lock().unwrap().close(),
            (Some("rate"), Some(n)) => self.rate_selection(n),
            (Some("add"), _) => self.add_to_watched(),
            (Some("rm"), Some(id)) => match self.watched.remove(id) {
                Some(movie) => println!("Removed {}", movie.title),
                None => println!("{id} is not on your watched list"),
            },
            (Some("watched"), _) => self.render_watched(),
            (Some("help"), _) => {
                println!("type search text, or :open N, :close, :rate N, :add, :rm ID, :watched, :q");
            }
            _ => println!("Unknown command :{command} (try :help)"),
        }
    }

    fn open_result(&mut self, index: &str) {
        let Ok(index) = index.parse::<usize>() else {
            println!("Usage: :open N");
            return;
        };
        let Some(item) = self.manager.snapshot().items().get(index.wrapping_sub(1)) else {
            println!("No result #{index}");
            return;
        };

        let id = item.id.clone();
        let title = item.title.clone();
        let mut detail = self.detail.lock().unwrap();
        if detail.toggle(&id) {
            let token = detail.begin_fetch();
            drop(detail);
            println!("Opening {title}...");
            self.spawn_detail_fetch(id, token);
        } else {
            println!("Closed {title}");
        }
    }

    fn spawn_detail_fetch(&self, id: String, token: CancellationToken) {
        let api = Arc::clone(&self.api);
        let tx = self.detail_tx.clone();
        tokio::spawn(async move {
            let outcome = api.detail(&id, token).await;
            let _ = tx.send(DetailOutcome { id, outcome }).await;
        });
    }

    fn apply_detail_outcome(&mut self, outcome: DetailOutcome) {
        match outcome.outcome {
            Ok(movie) => {
                let installed = self.detail.lock().unwrap().set_movie(&outcome.id, movie);
                if installed {
                    self.render_detail();
                }
            }
            // Panel was closed while the lookup was in flight.
            Err(e) if e.is_abort() => {}
            Err(e) => println!("⛔ {e}"),
        }
    }

    fn rate_selection(&mut self, rating: &str) {
        let Ok(rating) = rating.parse::<u8>() else {
            println!("Usage: :rate N (1-10)");
            return;
        };
        let mut detail = self.detail.lock().unwrap();
        if detail.selected_id().is_none() {
            println!("Open a movie first (:open N)");
            return;
        }
        detail.set_user_rating(rating);
        println!(
            "🌟 Rated {} / 10 (:add to put it on your watched list)",
            detail.user_rating().unwrap_or(rating)
        );
    }

    fn add_to_watched(&mut self) {
        let mut detail = self.detail.lock().unwrap();
        let (Some(movie), Some(user_rating)) = (detail.movie(), detail.user_rating()) else {
            println!("Open and rate a movie first");
            return;
        };

        let watched_movie = WatchedMovie {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster_url: movie.poster_url.clone(),
            imdb_rating: movie.imdb_rating_value().unwrap_or(0.0),
            runtime_min: movie.runtime_minutes().unwrap_or(0),
            user_rating,
            rate_decisions: detail.rate_decisions(),
        };
        let title = watched_movie.title.clone();
        if self.watched.add(watched_movie) {
            println!("Added {title} to your watched list");
        } else {
            println!("{title} is already on your watched list");
        }
        detail.close();
    }

    fn render_results(&self) {
        let snapshot = self.manager.snapshot();
        if snapshot.is_loading() {
            println!("Loading...");
            return;
        }
        if let Some(error) = snapshot.error() {
            println!("⛔ {error}");
            return;
        }
        println!("Found {} results", snapshot.items().len());
        for (index, item) in snapshot.items().iter().enumerate() {
            if self.verbose {
                println!("  {}. {} ({}) [{}]", index + 1, item.title, item.year, item.id);
            } else {
                println!("  {}. {} ({})", index + 1, item.title, item.year);
            }
        }
    }

    fn render_detail(&self) {
        let detail = self.detail.lock().unwrap();
        let Some(movie) = detail.movie() else {
            return;
        };
        println!("== {} ({}) ==", movie.title, movie.year);
        println!("{} • {}", movie.released, movie.runtime);
        println!("{}", movie.genre);
        println!("⭐ {} IMDb rating", movie.imdb_rating);
        if let Some(rating) = self.watched.user_rating_for(&movie.id) {
            println!("You already rated this movie {rating} 🌟");
        }
        println!("{}", movie.plot);
        println!("Starring {}", movie.actors);
        println!("Directed by {}", movie.director);
    }

    fn render_watched(&self) {
        let summary = self.watched.summary();
        println!("Movies you watched");
        println!(
            "#️⃣ {} movies  ⭐ {:.1}  🌟 {:.1}  ⏳ {:.0} min",
            summary.count,
            summary.avg_imdb_rating,
            summary.avg_user_rating,
            summary.avg_runtime_min
        );
        for movie in self.watched.movies() {
            println!(
                "  {} — ⭐ {:.1} 🌟 {} ⏳ {} min",
                movie.title, movie.imdb_rating, movie.user_rating, movie.runtime_min
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MovieSummary;
    use async_trait::async_trait;

    struct StubApi;

    #[async_trait]
    impl MovieApi for StubApi {
        async fn search(
            &self,
            query: &str,
            _cancel: CancellationToken,
        ) -> Result<Vec<MovieSummary>, ApiError> {
            Ok(vec![MovieSummary {
                id: "tt0372784".to_string(),
                title: query.to_string(),
                year: "2005".to_string(),
                poster_url: "N/A".to_string(),
            }])
        }

        async fn detail(
            &self,
            id: &str,
            _cancel: CancellationToken,
        ) -> Result<MovieDetail, ApiError> {
            Ok(MovieDetail {
                id: id.to_string(),
                title: "Batman Begins".to_string(),
                runtime: "140 min".to_string(),
                imdb_rating: "8.2".to_string(),
                ..MovieDetail::default()
            })
        }
    }

    fn controller() -> AppController {
        let args = CommandLineArgs::parse_from(["marquee"]);
        AppController::new(Arc::new(StubApi), &args)
    }

    #[tokio::test]
    async fn new_search_should_close_open_detail_panel() {
        let mut app = controller();

        app.handle_line("batman");
        let completion = app.manager.next_completion().await.unwrap();
        app.manager.apply_completion(completion);

        app.handle_line(":open 1");
        assert_eq!(
            app.detail.lock().unwrap().selected_id(),
            Some("tt0372784")
        );

        // Typing again starts a new cycle; the panel must close before the
        // lookup is even issued.
        app.handle_line("superman");
        assert_eq!(app.detail.lock().unwrap().selected_id(), None);
    }

    #[tokio::test]
    async fn rate_then_add_should_file_the_movie() {
        let mut app = controller();

        app.handle_line("batman");
        let completion = app.manager.next_completion().await.unwrap();
        app.manager.apply_completion(completion);

        app.handle_line(":open 1");
        let outcome = app.detail_rx.recv().await.unwrap();
        app.apply_detail_outcome(outcome);

        app.handle_line(":rate 9");
        app.handle_line(":add");

        assert!(app.watched.contains("tt0372784"));
        assert_eq!(app.watched.user_rating_for("tt0372784"), Some(9));
        let filed = &app.watched.movies()[0];
        assert_eq!(filed.runtime_min, 140);
        assert_eq!(filed.imdb_rating, 8.2);
        // Panel closes once the movie is filed.
        assert_eq!(app.detail.lock().unwrap().selected_id(), None);
    }

    #[tokio::test]
    async fn quit_command_should_stop_the_loop() {
        let mut app = controller();
        app.handle_line(":q");
        assert!(app.should_quit);
    }
}
