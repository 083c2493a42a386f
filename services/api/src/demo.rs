use crate::infra::{
    InMemoryClientDirectory, InMemoryProductCatalog, InMemoryRatingStore, MetricsSignalPublisher,
};
use chrono::Local;
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::catalog::{
    ClientDirectory, ClientId, ClientRecord, ProductCatalog, ProductId, ProductRecord,
};
use storefront::error::AppError;
use storefront::ratings::{
    InteractionEvent, InteractionKind, InteractionLogImporter, InteractionWeights, ProcessOutcome,
    RatingInferenceService, ReplaySummary,
};

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// Interaction log export (Client ID, Product ID, Interaction, Quantity)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the resulting per-pair ratings after the replay
    #[arg(long)]
    pub(crate) list_ratings: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional interaction log to replay after the scripted stream
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    /// Skip the final per-pair ratings table
    #[arg(long)]
    pub(crate) skip_table: bool,
}

type DemoService = RatingInferenceService<
    InMemoryClientDirectory,
    InMemoryProductCatalog,
    InMemoryRatingStore,
    MetricsSignalPublisher,
>;

fn build_infra() -> (
    Arc<InMemoryClientDirectory>,
    Arc<InMemoryProductCatalog>,
    Arc<InMemoryRatingStore>,
    DemoService,
) {
    let clients = Arc::new(InMemoryClientDirectory::default());
    let products = Arc::new(InMemoryProductCatalog::default());
    let store = Arc::new(InMemoryRatingStore::default());
    let service = RatingInferenceService::new(
        clients.clone(),
        products.clone(),
        store.clone(),
        Arc::new(MetricsSignalPublisher),
        InteractionWeights::default(),
    );
    (clients, products, store, service)
}

/// Replay an exported log against a fresh in-memory store. Every client and
/// product mentioned in the file is registered first, so the run reports the
/// log's own outcome mix rather than a wall of unknown-entity failures.
pub(crate) fn run_replay(args: ReplayArgs) -> Result<(), AppError> {
    let events = InteractionLogImporter::parse(std::fs::File::open(&args.file)?)?;
    let (clients, products, store, service) = build_infra();
    register_mentioned_entities(&events, &clients, &products);

    let summary = InteractionLogImporter::replay(events, &service)?;
    println!("Interaction log replay: {}", args.file.display());
    render_summary(&summary);

    if args.list_ratings {
        render_ratings_table(&store);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (clients, products, store, service) = build_infra();
    let today = Local::now().date_naive();

    println!("Rating inference demo");
    for (id, name) in [("client-ada", "Ada"), ("client-bjorn", "Bjorn")] {
        clients
            .register(ClientRecord {
                id: ClientId(id.to_string()),
                display_name: name.to_string(),
                registered_on: today,
            })
            .expect("demo client registers");
    }
    for (id, name, price) in [
        ("kettle-chrome", "Chrome Kettle", 3499),
        ("toaster-retro", "Retro Toaster", 2599),
    ] {
        products
            .register(ProductRecord {
                id: ProductId(id.to_string()),
                name: name.to_string(),
                unit_price_cents: price,
                listed_on: today,
            })
            .expect("demo product registers");
    }

    let stream = [
        ("Ada browses the kettle", demo_event("client-ada", "kettle-chrome", InteractionKind::View, None)),
        ("Ada clicks through", demo_event("client-ada", "kettle-chrome", InteractionKind::Click, None)),
        ("Ada searches again", demo_event("client-ada", "kettle-chrome", InteractionKind::Search, None)),
        ("Ada adds it to her cart", demo_event("client-ada", "kettle-chrome", InteractionKind::AddToCart, None)),
        ("Ada buys it", demo_event("client-ada", "kettle-chrome", InteractionKind::Purchase, Some(1))),
        ("Duplicate purchase delivery", demo_event("client-ada", "kettle-chrome", InteractionKind::Purchase, Some(1))),
        ("Bjorn rates the toaster 4/5", demo_event("client-bjorn", "toaster-retro", InteractionKind::Rating, Some(4))),
        ("Bjorn clicks the toaster", demo_event("client-bjorn", "toaster-retro", InteractionKind::Click, None)),
        ("Unrecognized wishlist event", demo_event("client-bjorn", "toaster-retro", InteractionKind::Other, None)),
        ("Rating without a value", demo_event("client-bjorn", "toaster-retro", InteractionKind::Rating, None)),
        ("Stranger views the kettle", demo_event("client-zoe", "kettle-chrome", InteractionKind::View, None)),
    ];

    println!("\nInteraction stream");
    for (label, event) in stream {
        match service.process(event) {
            Ok(ProcessOutcome::Created(record)) => {
                println!("- {label}: rating created at {:.1}", record.value);
            }
            Ok(ProcessOutcome::Updated(record)) => {
                println!("- {label}: rating upgraded to {:.1}", record.value);
            }
            Ok(ProcessOutcome::Skipped(reason)) => {
                println!("- {label}: skipped ({})", reason.summary());
            }
            Err(err) => {
                println!("- {label}: rejected ({err})");
            }
        }
    }

    if let Some(path) = args.log {
        let events = InteractionLogImporter::parse(std::fs::File::open(&path)?)?;
        register_mentioned_entities(&events, &clients, &products);
        let summary = InteractionLogImporter::replay(events, &service)?;
        println!("\nReplayed {}", path.display());
        render_summary(&summary);
    }

    if !args.skip_table {
        render_ratings_table(&store);
    }

    Ok(())
}

fn demo_event(
    client_id: &str,
    product_id: &str,
    kind: InteractionKind,
    quantity: Option<i32>,
) -> InteractionEvent {
    InteractionEvent {
        client_id: ClientId(client_id.to_string()),
        product_id: ProductId(product_id.to_string()),
        kind,
        quantity,
    }
}

fn register_mentioned_entities(
    events: &[InteractionEvent],
    clients: &InMemoryClientDirectory,
    products: &InMemoryProductCatalog,
) {
    let today = Local::now().date_naive();

    let client_ids: HashSet<_> = events.iter().map(|event| event.client_id.clone()).collect();
    for id in client_ids {
        // Ignore conflicts: the demo may have registered the id already.
        let _ = clients.register(ClientRecord {
            display_name: format!("Shopper {id}"),
            id,
            registered_on: today,
        });
    }

    let product_ids: HashSet<_> = events.iter().map(|event| event.product_id.clone()).collect();
    for id in product_ids {
        let _ = products.register(ProductRecord {
            name: format!("Product {id}"),
            id,
            unit_price_cents: 0,
            listed_on: today,
        });
    }
}

fn render_summary(summary: &ReplaySummary) {
    println!(
        "- {} events: {} created, {} upgraded, {} skipped, {} dropped",
        summary.processed, summary.created, summary.updated, summary.skipped, summary.failed
    );
}

fn render_ratings_table(store: &InMemoryRatingStore) {
    let records = store.all();
    if records.is_empty() {
        println!("\nStored ratings: none");
        return;
    }

    println!("\nStored ratings");
    for record in records {
        println!(
            "- {} x {} -> {:.1} (updated {})",
            record.client_id, record.product_id, record.value, record.updated_at
        );
    }
}
