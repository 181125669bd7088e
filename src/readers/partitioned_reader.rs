use crate::error::{ProcessingError, Result};
use crate::models::{Reading, ReadingTable};
use crate::readers::Node;
use crate::store::ObjectStore;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::debug;

/// Reads every shard of a node on the worker pool and concatenates the rows.
pub struct PartitionedReader {
    store: Arc<dyn ObjectStore>,
    pool: Arc<ThreadPool>,
}

impl PartitionedReader {
    pub fn new(store: Arc<dyn ObjectStore>, pool: Arc<ThreadPool>) -> Self {
        Self { store, pool }
    }

    /// Shard keys of a node, in key order
    pub fn shards(&self, node: &Node) -> Result<Vec<String>> {
        let keys = self.store.list(&node.listing_prefix())?;
        Ok(keys.into_iter().filter(|key| node.contains(key)).collect())
    }

    /// Read all shards of a node; a node without shards yields an empty table
    pub fn read_node(&self, node: &Node) -> Result<ReadingTable> {
        let shards = self.shards(node)?;
        if shards.is_empty() {
            debug!(node = %node, "node has no shards");
            return Ok(ReadingTable::default());
        }

        let per_shard: Vec<Vec<Reading>> = self.pool.install(|| {
            shards
                .par_iter()
                .map(|shard| self.read_shard(shard))
                .collect::<Result<Vec<_>>>()
        })?;

        let readings: Vec<Reading> = per_shard.into_iter().flatten().collect();
        debug!(node = %node, shards = shards.len(), rows = readings.len(), "read node");

        Ok(ReadingTable::new(readings, shards.len()))
    }

    /// Read one CSV shard with at least `sequence_id`, `date` and `measure` columns
    pub fn read_shard(&self, shard: &str) -> Result<Vec<Reading>> {
        let source = self.store.open(shard)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        reader
            .deserialize::<Reading>()
            .map(|row| {
                row.map_err(|e| ProcessingError::ReadSchema {
                    shard: shard.to_string(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalObjectStore;
    use std::fs;
    use tempfile::TempDir;

    fn reader_over(dir: &TempDir) -> PartitionedReader {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        PartitionedReader::new(
            Arc::new(LocalObjectStore::new(dir.path())),
            Arc::new(pool),
        )
    }

    fn write(dir: &TempDir, key: &str, content: &str) {
        let path = dir.path().join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_node_concatenates_shards() -> Result<()> {
        let dir = TempDir::new()?;
        write(
            &dir,
            "station_1/part-0.csv",
            "sequence_id,date,measure,timestamp\n1,2023-01-01,10.0,1672531200\n1,2023-01-01,20.5,1672534800\n",
        );
        write(
            &dir,
            "station_1/part-1.csv",
            "sequence_id,date,measure,timestamp\n1,2023-01-02, 30.25 ,1672617600\n",
        );
        write(&dir, "station_1/nested/part-9.csv", "sequence_id,date,measure\n9,2023-01-01,1\n");

        let reader = reader_over(&dir);
        let table = reader.read_node(&Node::new("station_1", ".csv"))?;

        assert_eq!(table.shards, 2);
        assert_eq!(table.len(), 3);

        let mut measures: Vec<f64> = table.readings.iter().map(|r| r.measure).collect();
        measures.sort_by(f64::total_cmp);
        assert_eq!(measures, vec![10.0, 20.5, 30.25]);
        assert!(table.readings.iter().all(|r| r.sequence_id == 1));

        Ok(())
    }

    #[test]
    fn test_node_without_shards_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("station_2"))?;
        write(&dir, "station_2/readme.txt", "no data yet");

        let table = reader_over(&dir).read_node(&Node::new("station_2", ".csv"))?;

        assert!(table.is_empty());
        assert_eq!(table.shards, 0);
        Ok(())
    }

    #[test]
    fn test_schema_violation_names_shard() -> Result<()> {
        let dir = TempDir::new()?;
        write(
            &dir,
            "station_3/part-0.csv",
            "sequence_id,date,measure\n1,2023-01-01,not-a-number\n",
        );
        write(&dir, "station_3/part-1.csv", "sequence_id,date\n1,2023-01-01\n");

        let reader = reader_over(&dir);

        match reader.read_shard("station_3/part-0.csv") {
            Err(ProcessingError::ReadSchema { shard, .. }) => {
                assert_eq!(shard, "station_3/part-0.csv")
            }
            other => panic!("expected a schema error, got {:?}", other),
        }
        assert!(matches!(
            reader.read_shard("station_3/part-1.csv"),
            Err(ProcessingError::ReadSchema { .. })
        ));
        assert!(reader.read_node(&Node::new("station_3", ".csv")).is_err());

        Ok(())
    }

    #[test]
    fn test_textual_nan_is_a_measure() -> Result<()> {
        let dir = TempDir::new()?;
        write(&dir, "station_4/part-0.csv", "sequence_id,date,measure\n4,2023-01-01,NaN\n");

        let readings = reader_over(&dir).read_shard("station_4/part-0.csv")?;
        assert_eq!(readings.len(), 1);
        assert!(readings[0].measure.is_nan());
        Ok(())
    }
}
