//! dashboard-runner: headless front-end for the customer transaction dashboard.
//!
//! Usage:
//!   dashboard-runner --config dashboard.json
//!   dashboard-runner --endpoint https://store.example/b/123 --search ann --detail 1
//!   dashboard-runner --document records.json --detail 1
//!   dashboard-runner --config dashboard.json --ipc-mode

mod render;

use anyhow::Result;
use dashboard_core::{
    command::ViewCommand,
    config::DashboardConfig,
    source::{HttpRecordSource, RecordSource, StaticSource},
    types::{Generation, RecordId},
    view::{ViewController, ViewPresentation},
};
use std::env;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    WaitLoaded,
    Command(ViewCommand),
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    generation: Generation,
    #[serde(flatten)]
    view: ViewPresentation,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let search = flag_value(&args, "--search").unwrap_or("");
    let detail = flag_value(&args, "--detail").map(RecordId::parse_lenient);

    let source = build_source(&args)?;

    if !ipc_mode {
        println!("Customer Transactions — dashboard-runner");
        println!("  source:  {}", source.name());
        println!("  search:  {search:?}");
        if let Some(id) = &detail {
            println!("  detail:  {id}");
        }
        println!();
    }

    let mut view = ViewController::mount(source);

    if ipc_mode {
        run_ipc_loop(&mut view).await?;
    } else {
        view.settle().await;
        view.search(search);
        if let Some(id) = &detail {
            view.open_detail(id);
        }
        print_view(&view.state().presentation());
    }

    view.unmount();
    Ok(())
}

fn build_source(args: &[String]) -> Result<Arc<dyn RecordSource>> {
    if let Some(path) = flag_value(args, "--document") {
        let body = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        return Ok(Arc::new(StaticSource::from_json(&body)?));
    }

    let mut config = match flag_value(args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(endpoint) = flag_value(args, "--endpoint") {
        config.endpoint = endpoint.to_string();
    }
    Ok(Arc::new(HttpRecordSource::new(&config)?))
}

async fn run_ipc_loop(view: &mut ViewController) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        view.try_settle();

        let cmd: IpcCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unknown IPC command: {}", line.trim());
                let err_json = serde_json::json!({ "error": e.to_string() });
                stdout.write_all(format!("{err_json}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::WaitLoaded => view.settle().await,
            IpcCommand::Command(command) => view.apply_command(command),
        }

        let state = UiState {
            generation: view.generation(),
            view:       view.state().presentation(),
        };
        stdout
            .write_all(format!("{}\n", serde_json::to_string(&state)?).as_bytes())
            .await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn print_view(view: &ViewPresentation) {
    if let Some(at) = view.loaded_at {
        let took = chrono::Utc::now() - at;
        println!(
            "  loaded:  {} ({} ms ago)",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            took.num_milliseconds()
        );
        println!();
    }
    print!("{}", render::table(&view.table));
    if let Some(detail) = &view.detail {
        println!();
        print!("{}", render::detail(detail));
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
