//! Walks through a list of posts, one bind per "Next Post" press.
//!
//! This example shows:
//! - Loading, fetched and failed states as they are observed
//! - A rapid key change superseding a slow request
//! - Revisiting a post answered from the shared cache
//!
//! This uses `JSONPlaceholder` API (<https://jsonplaceholder.typicode.com/>) as a backend.
//!
//! Run with: `RUST_LOG=fetchstate=debug cargo run --example next_post`

use std::sync::Arc;

use color_eyre::eyre::Result;
use fetchstate::prelude::*;
use futures::StreamExt;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const POST_IDS: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

#[derive(Debug, Clone, Deserialize)]
struct Post {
    id: u32,
    title: String,
    body: String,
}

fn post_key(id: u32) -> RequestKey {
    RequestKey::new(format!("https://jsonplaceholder.typicode.com/posts/{id}"))
}

fn render(state: &FetchState<Post>) {
    match state {
        FetchState::Idle => println!("(nothing selected)"),
        FetchState::Loading => println!("...loading..."),
        FetchState::Fetched(post) => {
            println!("#{} {}", post.id, post.title);
            println!("    {}", post.body.replace('\n', " "));
        }
        FetchState::Failed(error) => println!("error: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache = RequestCache::new();
    let transport = Arc::new(HttpTransport::new()?);
    let mut manager: FetchStateManager<Post> = FetchStateManager::new(cache.clone(), transport);

    // The presentation layer: re-render on every transition.
    let mut states = manager.states();
    let renderer = tokio::spawn(async move {
        while let Some(state) = states.next().await {
            render(&state);
        }
    });

    for (index, id) in POST_IDS.iter().copied().enumerate() {
        manager.bind(Some(post_key(id))).await;
        if index == POST_IDS.len() - 1 {
            println!("reached end of list");
        }
    }

    // Press "Next Post" twice quickly: the first request is superseded.
    let skipped = manager.bind(Some(post_key(9))).spawn();
    manager.bind(Some(post_key(10))).await;
    if let Some(handle) = skipped {
        handle.await?;
    }

    // Going back is served from the cache without a loading flicker.
    let retrieval = manager.bind(Some(post_key(1)));
    println!("revisit from cache: {}", retrieval.is_none());
    retrieval.await;

    println!("{} posts cached", cache.len());

    // Unmount: the renderer's stream ends once the manager is gone.
    drop(manager);
    renderer.await?;

    Ok(())
}
