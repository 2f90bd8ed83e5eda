//! # Marquee Main Entry Point
//!
//! Interactive movie search with a watched list, driven from stdin.

use anyhow::Result;
use marquee::{config, AppController, CommandLineArgs, OmdbClient};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered results.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd_args = CommandLineArgs::parse();

    let profile_path = config::get_profile_path();
    let store = config::IniProfileStore::new(&profile_path);
    let profile = match store.get_profile(cmd_args.profile())? {
        Some(profile) => profile,
        None => {
            tracing::debug!(
                profile = cmd_args.profile().as_str(),
                "profile not found, using blank profile"
            );
            config::get_blank_profile()
        }
    };

    let client = OmdbClient::new(&profile)?;
    let mut app = AppController::new(Arc::new(client), &cmd_args);

    println!("🍿 Marquee");
    println!("Type to search; results update as lookups settle");
    println!("Use ':open N' to open a result, ':rate N' to rate it, ':add' to file it");
    println!("Use ':watched' to see your list, ':q' to quit\n");

    app.run().await?;

    println!("\n👋 Thanks for using Marquee!");
    Ok(())
}
