use crate::cli::args::{Cli, Commands, SourceArgs};
use crate::error::Result;
use crate::processors::{AttributeJoiner, RunReport, SpreadsPipeline};
use crate::readers::{PartitionLocator, ReferenceReader};
use crate::settings::Settings;
use crate::store::{LocalObjectStore, ObjectStore};
use crate::utils::{init_tracing, ProgressReporter, StorageDirectories};
use crate::writers::JsonWriter;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            source,
            references,
            storage,
            max_workers,
            node_concurrency,
            continue_on_error,
            pretty,
            silent,
        } => {
            apply_source(&mut settings, source);
            if let Some(references) = references {
                settings.references = references;
            }
            if let Some(storage) = storage {
                settings = settings.with_storage(storage);
            }
            if let Some(max_workers) = max_workers {
                settings = settings.with_max_workers(max_workers);
            }
            if let Some(node_concurrency) = node_concurrency {
                settings = settings.with_node_concurrency(node_concurrency);
            }
            settings.continue_on_error |= continue_on_error;
            settings.validate()?;

            let report = process(&settings, pretty, silent).await?;
            println!("\n{}", report.generate_summary());

            if !report.failed.is_empty() {
                warn!(failed = report.failed.len(), "some nodes failed");
            }
        }

        Commands::Nodes { source } => {
            apply_source(&mut settings, source);
            settings.validate()?;

            let store = store(&settings);
            let keys = store.list(&settings.prefix)?;
            let nodes = PartitionLocator::with_suffix(settings.shard_suffix.clone()).locate(&keys);

            for node in &nodes {
                println!("{}", node);
            }
            info!(objects = keys.len(), nodes = nodes.len(), "listed nodes");
        }
    }

    Ok(())
}

/// Full run: reset storage, load references, then drive every node through the pipeline.
pub async fn process(settings: &Settings, pretty: bool, silent: bool) -> Result<RunReport> {
    info!(
        source_root = %settings.source_root.display(),
        prefix = %settings.prefix,
        storage = %settings.storage.display(),
        workers = settings.max_workers,
        node_concurrency = settings.node_concurrency,
        "starting run"
    );

    StorageDirectories::reset(&settings.storage)?;

    let references = ReferenceReader::new().read_references(&settings.references)?;
    let joiner = AttributeJoiner::new(references);
    let duplicated = joiner.duplicated_sequences();
    if !duplicated.is_empty() {
        warn!(?duplicated, "reference attributes repeat these sequences");
    }

    let sink = Arc::new(JsonWriter::new(&settings.storage).with_pretty(pretty));
    let pipeline = SpreadsPipeline::new(Arc::new(store(settings)), joiner, sink, settings)?;

    let nodes = pipeline.locate_nodes(&settings.prefix)?;
    let progress = ProgressReporter::new(nodes.len() as u64, "Processing nodes...", silent);

    let report = pipeline.process_nodes(nodes, Some(&progress)).await?;
    progress.finish_with_message(&format!(
        "Wrote {} summaries",
        report.total_documents()
    ));

    Ok(report)
}

fn apply_source(settings: &mut Settings, source: SourceArgs) {
    if let Some(source_root) = source.source_root {
        settings.source_root = source_root;
    }
    if let Some(prefix) = source.prefix {
        settings.prefix = prefix;
    }
    if let Some(shard_suffix) = source.shard_suffix {
        settings.shard_suffix = shard_suffix;
    }
}

fn store(settings: &Settings) -> LocalObjectStore {
    LocalObjectStore::new(&settings.source_root).with_page_size(settings.page_size)
}
