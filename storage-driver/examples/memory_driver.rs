use anyhow::Result;
use shared_types::{Release, Status};
use storage_driver::{Driver, ReleaseFilter, Storage};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("storage_driver=debug".parse()?))
        .init();

    let storage = Storage::memory();
    println!("Using {} release storage", storage.name());

    // Install
    let v1 = Release::new("my-app", 1, Status::Deployed).with_payload(serde_json::json!({
        "chart": "my-app-0.1.0",
        "values": {"replicas": 2, "image": "my-app:0.1.0"}
    }));
    println!("\nInstalling {}", v1);
    storage.create_release(&v1).await?;

    // Upgrade: supersede v1, deploy v2
    let mut previous = storage.deployed("my-app").await?;
    previous.status = Status::Superseded;
    storage.update_release(&previous).await?;

    let version = storage.next_version("my-app").await?;
    let v2 = Release::new("my-app", version, Status::Deployed).with_payload(serde_json::json!({
        "chart": "my-app-0.2.0",
        "values": {"replicas": 3, "image": "my-app:0.2.0"}
    }));
    println!("Upgrading to {}", v2);
    storage.create_release(&v2).await?;

    // History
    println!("\nHistory:");
    for release in storage.history("my-app").await? {
        println!("  - {}", release);
    }

    let deployed = storage.deployed("my-app").await?;
    println!("\nCurrently deployed: {}", deployed);
    println!(
        "Payload: {}",
        serde_json::to_string_pretty(&deployed.payload)?
    );

    let superseded = storage
        .list(&ReleaseFilter::by_status(Status::Superseded))
        .await?;
    println!("\nSuperseded releases: {}", superseded.len());

    // Uninstall
    for release in storage.history("my-app").await? {
        storage.delete_release(&release.name, release.version).await?;
    }
    println!("Remaining versions: {}", storage.query("my-app").await?.len());

    Ok(())
}
