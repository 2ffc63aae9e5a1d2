use harvester_vm_import::dashboard::{AppShell, Pane, View};
use harvester_vm_import::{DashboardConfig, ImportClientBuilder, ImportResult, SourceKind};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ImportResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvester_vm_import=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenvy::dotenv().ok();

    let client = ImportClientBuilder::from_env()?.build()?;
    let shell = AppShell::start(Arc::new(client), DashboardConfig::default()).await;

    if let Some(notice) = shell.capabilities().await.compatibility_notice() {
        println!("{}", notice);
    }

    // give the poller its first fetch
    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("Plans:");
    for row in shell.plan_rows().await {
        println!(
            "  {:<40} {:<20} {:<24} {}",
            row.key.to_string(),
            row.vm_name,
            row.source,
            row.status
        );
    }

    for kind in [SourceKind::Vmware, SourceKind::Ova] {
        println!("{}s:", kind.label());
        for row in shell.source_rows(kind).await {
            println!("  {:<40} {}", row.key.to_string(), row.location);
        }
    }

    if let Some(first) = shell.plan_rows().await.into_iter().next() {
        let inspector = shell.plan_inspector(first.key.clone()).await;
        if let Some(logs) = inspector.toggle(Pane::Logs).await? {
            println!("--- logs of {} ---\n{}", first.key, logs);
        }
        shell.close_view().await;
    }

    shell.navigate(View::About).await;
    Ok(())
}
