use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, info};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use carelog::commands::{CommandContext, CommandRegistry, Invocation};
use carelog::core::{Config, SystemClock};
use carelog::features::reminders::TerminalHost;
use carelog::store::PersistentStore;

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting carelog...");

    let store = PersistentStore::open_or_volatile(&config.database_path);

    let mut changes = store.subscribe();
    tokio::spawn(async move {
        while let Ok(change) = changes.recv().await {
            debug!("Store key '{}' changed", change.key);
        }
    });

    let host = Arc::new(TerminalHost::new(store.clone(), config.initial_permission));
    let ctx = Arc::new(CommandContext::new(
        store,
        host,
        Arc::new(SystemClock),
        &config,
    ));

    let report = ctx.reconcile().await;
    if report.skipped {
        println!("Notifications are not allowed yet; saved reminders will resume after `allow`.");
    } else if !report.rearmed.is_empty() {
        println!("⏰ Restored {} pending reminder(s).", report.rearmed.len());
    }

    let registry = CommandRegistry::with_all_handlers();
    info!("Registered {} commands", registry.len());
    println!("carelog ready. Type `help` for commands.");

    let mut lines = BufReader::new(stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await? {
        let Some(invocation) = Invocation::parse(&line) else {
            prompt();
            continue;
        };
        if matches!(invocation.name.as_str(), "quit" | "exit") {
            break;
        }

        let output = registry.dispatch(ctx.clone(), &invocation).await;
        println!("{output}");
        prompt();
    }

    info!("Shutting down; {} reminder(s) stay saved", ctx.scheduler.pending().len());
    Ok(())
}
