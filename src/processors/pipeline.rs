use crate::error::{ProcessingError, Result};
use crate::models::{ReadingTable, Summary};
use crate::processors::{
    AttributeJoiner, DataMerger, DistributionCalculator, EpochEnricher, ExtremaCalculator,
    GroupExecutor, GroupedMeasures, SummaryAssembler,
};
use crate::readers::{Node, PartitionLocator, PartitionedReader};
use crate::settings::Settings;
use crate::store::ObjectStore;
use crate::utils::progress::ProgressReporter;
use crate::writers::SummarySink;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Outcome of one successfully processed node.
#[derive(Debug, Clone)]
pub struct NodeReport {
    pub node: Node,
    pub shards: usize,
    pub rows: usize,
    pub groups: usize,
    pub documents: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct NodeFailure {
    pub node: Node,
    pub error: ProcessingError,
}

/// Outcome of a run over many nodes.
#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: Vec<NodeReport>,
    pub failed: Vec<NodeFailure>,
}

impl RunReport {
    pub fn total_documents(&self) -> usize {
        self.processed.iter().map(|r| r.documents.len()).sum()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Spreads Run Report ===\n");
        summary.push_str(&format!(
            "Nodes processed: {}\n",
            self.processed.len()
        ));
        summary.push_str(&format!(
            "Rows read: {}\n",
            self.processed.iter().map(|r| r.rows).sum::<usize>()
        ));
        summary.push_str(&format!(
            "Daily groups: {}\n",
            self.processed.iter().map(|r| r.groups).sum::<usize>()
        ));
        summary.push_str(&format!("Documents written: {}\n", self.total_documents()));

        if !self.failed.is_empty() {
            summary.push_str(&format!("\nFailed nodes: {}\n", self.failed.len()));
            for failure in &self.failed {
                summary.push_str(&format!("  {}: {}\n", failure.node, failure.error));
            }
        }

        summary
    }
}

/// Per-node pipeline: read, aggregate, merge, enrich, assemble and persist.
#[derive(Clone)]
pub struct SpreadsPipeline {
    store: Arc<dyn ObjectStore>,
    joiner: Arc<AttributeJoiner>,
    sink: Arc<dyn SummarySink>,
    executor: GroupExecutor,
    shard_suffix: String,
    preview_rows: usize,
    node_concurrency: usize,
    continue_on_error: bool,
}

impl SpreadsPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        joiner: AttributeJoiner,
        sink: Arc<dyn SummarySink>,
        settings: &Settings,
    ) -> Result<Self> {
        Ok(Self {
            store,
            joiner: Arc::new(joiner),
            sink,
            executor: GroupExecutor::with_workers(settings.max_workers)?,
            shard_suffix: settings.shard_suffix.clone(),
            preview_rows: settings.preview_rows,
            node_concurrency: settings.node_concurrency,
            continue_on_error: settings.continue_on_error,
        })
    }

    /// Nodes holding shards under `prefix`
    pub fn locate_nodes(&self, prefix: &str) -> Result<Vec<Node>> {
        let keys = self.store.list(prefix)?;
        let nodes = PartitionLocator::with_suffix(self.shard_suffix.clone()).locate(&keys);
        debug!(prefix, objects = keys.len(), nodes = nodes.len(), "located nodes");
        Ok(nodes)
    }

    pub fn read_node(&self, node: &Node) -> Result<ReadingTable> {
        PartitionedReader::new(self.store.clone(), self.executor.pool().clone()).read_node(node)
    }

    /// Daily spread summaries of a node, without persisting them
    pub fn compute_node(&self, node: &Node) -> Result<(ReadingTable, usize, Vec<Summary>)> {
        let table = self.read_node(node)?;
        let groups = GroupedMeasures::from_table(&table);

        if groups.is_empty() {
            debug!(node = %node, "no groups to aggregate");
            return Ok((table, 0, Vec::new()));
        }

        let distributions = DistributionCalculator::new(self.executor.clone());
        let extrema = ExtremaCalculator::new(self.executor.clone());
        let (quantile_rows, extrema_rows) = self.executor.pool().join(
            || distributions.calculate(&groups),
            || extrema.calculate(&groups),
        );
        let (quantile_rows, extrema_rows) = (quantile_rows?, extrema_rows?);

        let merged = DataMerger::new().merge(&quantile_rows, &extrema_rows);
        if self.preview_rows > 0 {
            let preview: Vec<_> = merged.iter().take(self.preview_rows).collect();
            info!(node = %node, rows = merged.len(), ?preview, "daily spreads");
        }

        let spreads = EpochEnricher::new().enrich(&merged)?;
        let summaries = SummaryAssembler::new(&self.joiner).assemble(&spreads)?;

        Ok((table, groups.len(), summaries))
    }

    /// Compute and persist the summaries of one node.
    ///
    /// A node's documents are all written or none are: when a write fails, the documents
    /// already written for the node are discarded before the error is returned.
    pub fn process_node(&self, node: &Node) -> Result<NodeReport> {
        let (table, groups, summaries) = self.compute_node(node)?;

        let mut documents = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            match self.sink.write(summary) {
                Ok(path) => documents.push(path),
                Err(e) => {
                    self.discard_documents(node, &documents);
                    warn!(node = %node, discarded = documents.len(), error = %e, "summary write failed");
                    return Err(e);
                }
            }
        }

        info!(
            node = %node,
            shards = table.shards,
            rows = table.len(),
            groups,
            documents = documents.len(),
            "processed node"
        );

        Ok(NodeReport {
            node: node.clone(),
            shards: table.shards,
            rows: table.len(),
            groups,
            documents,
        })
    }

    fn discard_documents(&self, node: &Node, documents: &[PathBuf]) {
        for path in documents {
            if let Err(e) = self.sink.discard(path) {
                warn!(node = %node, path = %path.display(), error = %e, "could not discard document");
            }
        }
    }

    /// Process nodes with at most `node_concurrency` in flight.
    ///
    /// A failing node aborts the run unless `continue_on_error` is set, in which case it is
    /// recorded in the report. On abort no further node is started; nodes already running
    /// are awaited before the error is returned.
    pub async fn process_nodes(
        &self,
        nodes: Vec<Node>,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunReport> {
        let mut pending = nodes.into_iter();
        let mut join_set = JoinSet::new();
        let mut report = RunReport::default();
        let mut abort: Option<ProcessingError> = None;

        loop {
            while abort.is_none() && join_set.len() < self.node_concurrency {
                let Some(node) = pending.next() else {
                    break;
                };
                let pipeline = self.clone();

                join_set.spawn_blocking(move || {
                    let result = pipeline.process_node(&node);
                    (node, result)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (node, result) = joined?;
            if let Some(p) = progress {
                p.increment(1);
                p.set_message(&format!("Finished {}", node));
            }

            match result {
                Ok(node_report) => report.processed.push(node_report),
                Err(e) if self.continue_on_error => {
                    error!(node = %node, error = %e, "node failed");
                    report.failed.push(NodeFailure { node, error: e });
                }
                Err(e) => {
                    error!(node = %node, error = %e, "node failed, aborting run");
                    abort.get_or_insert(e);
                }
            }
        }

        if let Some(e) = abort {
            return Err(e);
        }

        report.processed.sort_by(|a, b| a.node.cmp(&b.node));
        report.failed.sort_by(|a, b| a.node.cmp(&b.node));
        Ok(report)
    }
}
