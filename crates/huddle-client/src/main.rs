//! # huddle
//!
//! Headless driver for the Huddle client: loads the whole conversation list,
//! fetches the latest message of every chat and prints the two chat lists.

use futures::future::join_all;
use tracing::info;

use huddle_client_lib::{init_tracing, lock, ClientConfig, Huddle};
use huddle_shared::constants::APP_NAME;
use huddle_store::views::ChatCellView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let huddle = Huddle::from_config(&config)?;

    let mut pages = 0;
    while huddle.sync.fetch_chat_list().await.is_some() {
        pages += 1;
    }

    let chat_ids = {
        let guard = lock(&huddle.state);
        guard
            .chats
            .direct_ids
            .iter()
            .chain(&guard.chats.channel_ids)
            .cloned()
            .collect::<Vec<_>>()
    };
    info!(pages, chats = chat_ids.len(), "Chat list loaded");

    join_all(
        chat_ids
            .iter()
            .map(|chat_id| huddle.sync.fetch_last_message(chat_id)),
    )
    .await;

    let guard = lock(&huddle.state);
    println!("Direct messages");
    for cell in guard.direct_cells() {
        print_cell(&cell);
    }
    println!();
    println!("Channels");
    for cell in guard.channel_cells() {
        print_cell(&cell);
    }

    Ok(())
}

fn print_cell(cell: &ChatCellView) {
    let name = cell.name.as_deref().unwrap_or(cell.chat_id.as_str());
    let time = cell.time.as_deref().unwrap_or("     ");
    match cell.unread {
        Some(n) => println!("  {time}  {name} ({n})  {}", cell.preview),
        None => println!("  {time}  {name}  {}", cell.preview),
    }
}
