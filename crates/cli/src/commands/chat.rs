//! `parley chat`: Interactive or single-message chat mode.

use std::sync::Arc;

use parley_agent::Dispatcher;
use parley_channels::{read_line_blocking, ConsoleChannel};
use parley_config::AppConfig;
use parley_core::channel::Channel;
use parley_memory::FormattingMemory;
use parley_providers::ChatClient;

pub async fn run(
    message: Option<String>,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();
    // Nothing else reads stdin yet, so blocking here is fine.
    let (mut config, filled) = AppConfig::load_for_session(
        &path,
        |name| std::env::var(name).ok(),
        |key| {
            read_line_blocking(&format!("Please enter the value for '{key}': "))
                .ok()
                .flatten()
        },
    )
    .map_err(|e| format!("Failed to load config: {e}"))?;
    if !filled.is_empty() {
        println!("Configuration saved to {}", path.display());
    }

    if let Some(user) = user {
        config.user_id = user;
    }

    let provider = parley_providers::build_from_config(&config)?;
    let client = Arc::new(ChatClient::from_config(provider, &config));
    let dispatcher = Dispatcher::from_config(&config, client, Arc::new(FormattingMemory));
    let channel = ConsoleChannel::from_config(&config);
    tracing::debug!(user_id = %config.user_id, model = %config.model, "Dispatcher ready");

    if let Some(msg) = message {
        // Single message mode
        let reply = dispatcher.handle(Some(msg.as_str()), Some(config.user_id.as_str())).await?;
        channel.send(&reply).await?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Parley: interactive mode");
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!("  User:      {}", config.user_id);
    println!();
    println!("  Type your message and press Enter. Pasted blocks are sent as one message.");
    println!("  Type '{}' or Ctrl+D to quit.", parley_channels::console::EXIT_COMMAND);
    println!();

    let mut rx = channel.start().await.map_err(|e| format!("Channel error: {e}"))?;

    while let Some(result) = rx.recv().await {
        match result {
            Ok(chan_msg) => match dispatcher.dispatch(&chan_msg).await {
                Ok(reply) => channel.send(&reply).await?,
                Err(e) => eprintln!("[Error] {e}"),
            },
            Err(e) => {
                eprintln!("[Channel Error] {e}");
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
