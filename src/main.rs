use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use optimo::{
    CoordinatorConfig, GatewayConfig, ItemId, NotificationCenter, OptimisticCoordinator, Record,
    SimulatedGateway,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "optimo")]
#[command(about = "Drive an optimistic coordinator against a simulated remote")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Toggle every task concurrently, one optimistic mutation each
    Simulate {
        #[arg(long, default_value_t = 5)]
        items: u64,
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,
        /// Number of remote calls to fail after the initial fetch
        #[arg(long, default_value_t = 0)]
        fail_first: u32,
        /// Replay queued failures once the remote recovers
        #[arg(long)]
        retry: bool,
    },
    /// Mark every task done in a single batch
    Batch {
        #[arg(long, default_value_t = 5)]
        items: u64,
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,
        #[arg(long)]
        fail: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Task {
    id: u64,
    title: String,
    done: bool,
    revision: u64,
}

impl Record for Task {
    type Change = bool;

    fn id(&self) -> ItemId {
        ItemId::from(self.id)
    }

    fn apply(&mut self, done: &bool) {
        self.done = *done;
    }
}

struct Harness {
    gateway: Arc<SimulatedGateway<Task>>,
    center: Arc<NotificationCenter>,
    coordinator: OptimisticCoordinator<Task>,
}

impl Harness {
    fn new(items: u64, delay_ms: u64) -> Self {
        let tasks = (1..=items).map(|id| Task {
            id,
            title: format!("task #{id}"),
            done: false,
            revision: 0,
        });
        let gateway = Arc::new(
            SimulatedGateway::with_config(
                tasks,
                GatewayConfig::new().delay(Duration::from_millis(delay_ms)),
            )
            .with_stamp(|task: &mut Task| task.revision += 1),
        );
        let center = Arc::new(NotificationCenter::new());
        let coordinator: OptimisticCoordinator<Task> = OptimisticCoordinator::with_config(
            gateway.clone(),
            center.clone(),
            CoordinatorConfig::new().labels("task", "tasks"),
        );

        Self {
            gateway,
            center,
            coordinator,
        }
    }

    fn report(&self) -> Result<()> {
        let snapshot = serde_json::to_string_pretty(&self.coordinator.snapshot())
            .context("Failed to encode coordinator snapshot")?;
        println!("{snapshot}");

        println!("notifications:");
        for notification in self.center.all() {
            let retry = notification
                .retry_entry_id
                .map(|id| format!(" [retry {id}]"))
                .unwrap_or_default();
            println!("  {:<7} {}{}", notification.kind, notification.message, retry);
        }
        Ok(())
    }
}

async fn simulate(items: u64, delay_ms: u64, fail_first: u32, retry: bool) -> Result<()> {
    let harness = Harness::new(items, delay_ms);
    harness
        .coordinator
        .fetch_all()
        .await
        .context("Initial fetch failed")?;

    harness.gateway.fail_next(fail_first);
    let ids: Vec<ItemId> = harness.coordinator.get_all().keys().cloned().collect();
    let outcomes = join_all(
        ids.iter()
            .map(|id| harness.coordinator.mutate_one(id, true)),
    )
    .await;
    let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    println!("mutations: {} ok, {} failed", outcomes.len() - failed, failed);

    if retry && failed > 0 {
        let summary = harness.coordinator.retry_all().await;
        println!(
            "retries: {} attempted, {} ok, {} failed",
            summary.attempted, summary.succeeded, summary.failed
        );
    }

    harness.report()
}

async fn batch(items: u64, delay_ms: u64, fail: bool) -> Result<()> {
    let harness = Harness::new(items, delay_ms);
    harness
        .coordinator
        .fetch_all()
        .await
        .context("Initial fetch failed")?;

    harness.gateway.set_failing(fail);
    let updates = (1..=items).map(|id| (ItemId::from(id), true)).collect();
    if let Err(err) = harness.coordinator.mutate_many(updates).await {
        println!("batch failed: {err}");
    }

    harness.report()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            items,
            delay_ms,
            fail_first,
            retry,
        } => simulate(items, delay_ms, fail_first, retry).await,
        Command::Batch {
            items,
            delay_ms,
            fail,
        } => batch(items, delay_ms, fail).await,
    }
}
