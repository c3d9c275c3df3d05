//! TodoMVC binary
//!
//! Reads commands from stdin, one per line, and prints the visible list after
//! every change. Type `help` for the command list.
//!
//! Run with: `cargo run --bin todomvc`

use futures::StreamExt;
use reactive_todo_runtime::metrics::MetricsServer;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use todomvc::{selectors, AppState, Command, TodoApp, TodoConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todomvc=info,reactive_todo_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TodoConfig::from_env()?;
    info!(?config, "Starting TodoMVC");

    let metrics = match config.metrics_addr {
        Some(addr) => {
            let mut server = MetricsServer::new(addr);
            server.start()?;
            Some(server)
        },
        None => None,
    };

    let app = TodoApp::new(&config);

    // Action log
    let mut actions = app.actions();
    tokio::spawn(async move {
        loop {
            match actions.recv().await {
                Ok(action) => info!(?action, "Action reduced"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Action log fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Remaining count, printed whenever it changes
    let mut remaining = app
        .states()
        .map(|s| selectors::active_count(&s.todos))
        .boxed();
    tokio::spawn(async move {
        let mut last = None;
        while let Some(count) = remaining.next().await {
            if last != Some(count) {
                info!(remaining = count, "Active todos");
                last = Some(count);
            }
        }
    });

    println!("TodoMVC, type `help` for commands");
    render(&app.snapshot().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(todomvc::CommandError::Empty) => continue,
            Err(e) => {
                println!("error: {e}");
                continue;
            },
        };

        match command {
            Command::Add(text) => {
                let id = app.add_todo(text).await?;
                println!("added #{id}");
            },
            Command::Toggle(id) => {
                if app.snapshot().await.get(id).is_none() {
                    println!("no todo #{id}");
                    continue;
                }
                app.toggle(id).await?;
            },
            Command::Filter(filter) => app.set_filter(filter).await?,
            Command::List => {},
            Command::Dump => {
                println!("{}", serde_json::to_string_pretty(&app.snapshot().await)?);
                continue;
            },
            Command::Metrics => {
                match metrics.as_ref().and_then(MetricsServer::render) {
                    Some(text) => println!("{text}"),
                    None => println!("metrics are off, set {}", todomvc::config::METRICS_ADDR_VAR),
                }
                continue;
            },
            Command::Help => {
                println!("{}", todomvc::command::HELP);
                continue;
            },
            Command::Quit => break,
        }

        render(&app.snapshot().await);
    }

    app.shutdown().await?;
    info!("TodoMVC stopped");
    Ok(())
}

fn render(state: &AppState) {
    for todo in selectors::visible_todos(&state.todos, state.visibility_filter) {
        let mark = if todo.completed { 'x' } else { ' ' };
        println!("  [{mark}] #{} {}", todo.id, todo.text);
    }

    let footer: Vec<String> = selectors::filter_links(state)
        .into_iter()
        .map(|link| {
            if link.selected {
                format!("[{}]", link.label)
            } else {
                link.label.to_string()
            }
        })
        .collect();

    println!(
        "  {} left | {}",
        selectors::active_count(&state.todos),
        footer.join(" ")
    );
}
