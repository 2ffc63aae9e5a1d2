use harvester_vm_import::dashboard::{NamespaceChoice, PlanWizard};
use harvester_vm_import::{ImportClientBuilder, ImportError, ImportResult, ObjectKey};
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Creates a plan for one vCenter VM.
///
/// Reads `IMPORT_SOURCE` (`namespace/name`), `IMPORT_VM`, `IMPORT_NAMESPACE`
/// and optionally `IMPORT_NETWORK` (`namespace/name`, used for every source
/// network) in addition to the gateway settings.
#[tokio::main]
async fn main() -> ImportResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenvy::dotenv().ok();

    let required = |key: &str| {
        env::var(key).map_err(|_| ImportError::Conflict(format!("{} is not set", key)))
    };
    let source: ObjectKey = required("IMPORT_SOURCE")?.parse()?;
    let vm = required("IMPORT_VM")?;
    let namespace = required("IMPORT_NAMESPACE")?;

    let client = ImportClientBuilder::from_env()?.build()?;
    let capabilities = client.capabilities_or_default().await;
    let wizard = PlanWizard::open(Arc::new(client), capabilities).await;

    wizard.select_vmware_source(Some(source)).await?;
    if let Some(error) = wizard.state().await.connection_error {
        return Err(ImportError::Conflict(error));
    }
    wizard.select_vm(&vm).await?;
    wizard.next().await?;

    wizard.set_plan_name(format!("{} migration", vm)).await?;
    wizard
        .set_namespace(NamespaceChoice::Existing(namespace))
        .await?;
    wizard.next().await?;

    if let Ok(network) = env::var("IMPORT_NETWORK") {
        for row in wizard.state().await.network_rows() {
            wizard
                .map_network(&row.source_network, Some(network.clone()))
                .await?;
        }
    }
    wizard.next().await?;

    for (label, value) in wizard.review().await?.lines() {
        println!("{:<20} {}", label, value);
    }
    wizard.submit().await?;
    println!("Plan submitted");
    Ok(())
}
