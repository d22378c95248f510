use tracing_subscriber::EnvFilter;

use healthsync::config::Config;
use healthsync::models::OfflineAction;

const USAGE: &str = "usage: healthsync <enqueue <type> [json-payload] | list | sync | clear>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let synchronizer = healthsync::build_synchronizer(&config).await?;
    let store = synchronizer.store();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["enqueue", kind, rest @ ..] => {
            let payload = match rest.first() {
                Some(raw) => serde_json::from_str(raw)?,
                None => serde_json::json!({}),
            };
            let action = OfflineAction::new(*kind, payload);
            let id = action.id.clone();
            store.append(action).await?;
            println!("{id}");
        }
        ["list"] => {
            for action in store.list().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    action.id,
                    action.created_at.to_rfc3339(),
                    action.kind,
                    action.payload
                );
            }
        }
        ["sync"] => {
            let report = synchronizer
                .run(|progress| tracing::info!("Sync progress: {progress:.0}%"))
                .await?;
            for id in &report.synced {
                println!("synced\t{id}");
            }
            for failed in &report.failed {
                println!("failed\t{}\t{}", failed.id, failed.error);
            }
        }
        ["clear"] => store.clear().await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
