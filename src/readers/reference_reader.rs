use crate::error::{ProcessingError, Result};
use crate::models::ReferenceAttributes;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use validator::Validate;

/// Reads the reference attributes table, validating each record on the way in.
pub struct ReferenceReader;

impl ReferenceReader {
    pub fn new() -> Self {
        Self
    }

    /// Read reference attributes from a CSV file
    pub fn read_references(&self, path: &Path) -> Result<Vec<ReferenceAttributes>> {
        let file = File::open(path)?;
        self.read_from(file)
    }

    /// Read reference attributes from any CSV source with a header row
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<ReferenceAttributes>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut references = Vec::new();
        for (row, record) in reader.deserialize::<ReferenceAttributes>().enumerate() {
            let reference = record?;
            reference.validate().map_err(|e| {
                ProcessingError::InvalidFormat(format!(
                    "Reference row {} (sequence {}) is invalid: {}",
                    row + 1,
                    reference.sequence_id,
                    e
                ))
            })?;
            references.push(reference);
        }

        Ok(references)
    }
}

impl Default for ReferenceReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_references_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "sequence_id,station_id,pollutant_id,station_name,pollutant_name,unit_of_measure,latitude,longitude"
        )?;
        writeln!(temp_file, "1,1017,6,Winetavern Street,PM2.5,µg/m³,53.3434,-6.2713")?;
        writeln!(temp_file, "2,1017,7,Winetavern Street,PM10,µg/m³,53.3434,-6.2713")?;
        writeln!(temp_file, "3,1020,6,,,,,")?;

        let references = ReferenceReader::new().read_references(temp_file.path())?;

        assert_eq!(references.len(), 3);
        assert_eq!(references[0].sequence_id, 1);
        assert_eq!(references[0].station_name.as_deref(), Some("Winetavern Street"));
        assert_eq!(references[1].pollutant_id, 7);
        assert_eq!(references[2].station_id, 1020);
        assert_eq!(references[2].station_name, None);
        assert_eq!(references[2].latitude, None);

        Ok(())
    }

    #[test]
    fn test_minimal_columns() -> Result<()> {
        let csv = "sequence_id,station_id,pollutant_id\n5,2001,9\n";
        let references = ReferenceReader::new().read_from(csv.as_bytes())?;

        assert_eq!(references, vec![ReferenceAttributes::new(5, 2001, 9)]);
        Ok(())
    }

    #[test]
    fn test_invalid_reference_rejected() {
        let csv = "sequence_id,station_id,pollutant_id,latitude,longitude\n5,2001,9,123.0,0.0\n";
        assert!(matches!(
            ReferenceReader::new().read_from(csv.as_bytes()),
            Err(ProcessingError::InvalidFormat(_))
        ));

        let csv = "sequence_id,station_id\n5,2001\n";
        assert!(ReferenceReader::new().read_from(csv.as_bytes()).is_err());
    }
}
