//! Walks a crab's public timeline and, with an access token, interacts with it.
//!
//! Run with:
//! `CRABBER_API_KEY=... cargo run --example timeline -- jake`
//!
//! Set `CRABBER_ACCESS_TOKEN` as well to like the most recent molt.
//! `CRABBER_BASE_URL` points the demo at another instance, e.g. a local
//! development server.

use crabber::{Client, Error, ListOptions};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crabber=info,timeline=info")),
        )
        .init();

    let api_key = env::var("CRABBER_API_KEY")
        .map_err(|_| Error::ConfigurationError("CRABBER_API_KEY is not set".to_string()))?;
    let username = env::args().nth(1).unwrap_or_else(|| "jake".to_string());

    let mut builder = Client::builder().api_key(api_key).max_attempts(5);
    if let Ok(base_url) = env::var("CRABBER_BASE_URL") {
        builder = builder.base_url(base_url)?;
    }
    if let Ok(token) = env::var("CRABBER_ACCESS_TOKEN") {
        builder = builder.access_token(token);
    }
    let client = builder.build().await?;

    if let Some(me) = client.current_crab() {
        println!("Signed in as @{}", me.username());
    }

    let Some(crab) = client.get_crab_by_username(&username).await? else {
        println!("No crab named @{username}");
        return Ok(());
    };

    println!("=== @{} ===", crab.username());
    println!("Display name: {}", crab.display_name());
    println!(
        "Followers: {}, following: {}",
        crab.follower_count(),
        crab.following_count()
    );
    if let Some(bio) = crab.bio().await? {
        if let Some(description) = bio.description {
            println!("Bio: {description}");
        }
    }
    println!();

    println!("=== Recent molts ===");
    let recent = crab.molts_page(&ListOptions::default().limit(5)).await?;
    for molt in &recent {
        println!(
            "[{}] {} ({} likes, {} remolts)",
            molt.id(),
            molt.content(),
            molt.likes(),
            molt.remolts()
        );
        for reply in molt.replies(&ListOptions::default().limit(3)).await? {
            if let Some(author) = reply.author().await? {
                println!("    @{}: {}", author.username(), reply.content());
            }
        }
    }
    println!();

    if client.current_crab().is_some() {
        if let Some(latest) = recent.first() {
            let liked = latest.like().await?;
            println!("Liked molt {}: {}", latest.id(), liked);
        }
    }

    println!("Client state: {:?}", client);
    Ok(())
}
