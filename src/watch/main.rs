/**
 * feed-watch
 *
 * Loads the feed, opens the push channel and logs a one-line summary every
 * time the snapshot changes. Ctrl-C closes the channel and exits.
 *
 * Usage: feed-watch [config.toml]
 */
use post_reactions::client::{Config, FeedState, FeedStore, PushChannel, RemoteGateway};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    tracing::info!(
        "Watching {} (push {}, viewer {})",
        config.api_url(""),
        config.push_url(),
        config.viewer_id().unwrap_or("anonymous")
    );

    let store = Arc::new(FeedStore::new(RemoteGateway::new(config.clone())?));
    let mut updates = store.subscribe();

    loop {
        match store.load().await {
            FeedState::Ready(_) => break,
            FeedState::Failed(message) => {
                tracing::warn!("{} (retrying in {:?})", message, config.reconnect_delay());
                tokio::select! {
                    _ = tokio::time::sleep(config.reconnect_delay()) => {}
                    _ = tokio::signal::ctrl_c() => return Ok(()),
                }
            }
            FeedState::Loading => {}
        }
    }

    let (channel, events) = PushChannel::connect(&config);
    let mut status = channel.watch_status();
    let worker = Arc::clone(&store);
    let consumer = tokio::spawn(async move { worker.run(events).await });

    summarize(&updates.borrow_and_update().clone());
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                summarize(&state);
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                tracing::info!("Push channel: {:?}", *status.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    channel.close().await;
    consumer.await?;
    Ok(())
}

fn summarize(state: &FeedState) {
    match state {
        FeedState::Loading => tracing::info!("Loading posts..."),
        FeedState::Failed(message) => tracing::warn!("{}", message),
        FeedState::Ready(feed) => {
            let comments: usize = feed.iter().map(|p| p.comment_count()).sum();
            let reactions: u64 = feed.iter().map(|p| p.reactions.total()).sum();
            tracing::info!(
                "{} posts, {} comments, {} post reactions",
                feed.len(),
                comments,
                reactions
            );
        }
    }
}
