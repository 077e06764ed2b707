//! CSV reader for shelter outcome exports.
//!
//! Typed text columns are kept verbatim, typed numeric columns are parsed
//! (empty cells leave the field absent), every other column is inferred with
//! `Scalar::infer`. An unnamed leading index column is stored as `rec_num`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use shelterdash_core::prelude::{AnimalRecord, Changes, Scalar};
use shelterdash_core::record::fields;

use crate::error::{Error, Result};

pub struct CsvRecordReader<R: Read> {
    rdr: ::csv::Reader<R>,
}

impl CsvRecordReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::open(path)?;
        Ok(Self::from_reader(f))
    }
}

impl<R: Read> CsvRecordReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        Self { rdr }
    }

    /// Read every row. Fails on the first malformed row, naming its line.
    pub fn read_all(&mut self) -> Result<Vec<AnimalRecord>> {
        let headers: Vec<String> = self
            .rdr
            .headers()?
            .iter()
            .map(|h| {
                let h = h.trim();
                if h.is_empty() {
                    "rec_num".to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut out = Vec::new();
        for (idx, row) in self.rdr.records().enumerate() {
            let row = row?;
            let line = idx + 2;
            let mut changes = Changes::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                changes.insert(header.clone(), cell_value(header, cell));
            }
            let (record, _) = AnimalRecord::default()
                .with_changes(&changes)
                .map_err(|e| Error::InvalidInput(format!("line {line}: {e}")))?;
            out.push(record);
        }
        tracing::debug!(rows = out.len(), "csv import parsed");
        Ok(out)
    }
}

fn cell_value(header: &str, cell: &str) -> Scalar {
    match header {
        fields::NAME | fields::ANIMAL_TYPE | fields::BREED | fields::SEX_UPON_OUTCOME => {
            Scalar::Str(cell.to_string())
        }
        fields::AGE_UPON_OUTCOME_IN_WEEKS | fields::LOCATION_LAT | fields::LOCATION_LONG
            if cell.trim().is_empty() =>
        {
            Scalar::Null
        }
        fields::ID => Scalar::Null,
        _ => Scalar::infer(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
,age_upon_outcome,animal_id,animal_type,breed,name,sex_upon_outcome,location_lat,location_long,age_upon_outcome_in_weeks
1,3 years,A746874,Cat,Domestic Shorthair Mix,,Neutered Male,30.5066,-97.3408,156.0
2,1 year,A725717,Dog,Labrador Retriever Mix,*Lucy,Intact Female,30.6525,-97.7419,52.142857
";

    #[test]
    fn reads_typed_and_extra_columns() {
        let rows = CsvRecordReader::from_reader(SAMPLE.as_bytes()).read_all().unwrap();
        assert_eq!(rows.len(), 2);
        let lucy = &rows[1];
        assert_eq!(lucy.name.as_deref(), Some("*Lucy"));
        assert_eq!(lucy.breed.as_deref(), Some("Labrador Retriever Mix"));
        assert_eq!(lucy.age_upon_outcome_in_weeks, Some(52.142857));
        assert_eq!(lucy.extra.get("rec_num"), Some(&Scalar::Int(2)));
        assert_eq!(lucy.extra.get("age_upon_outcome"), Some(&Scalar::from("1 year")));
        assert_eq!(rows[0].name.as_deref(), Some(""));
    }

    #[test]
    fn bad_numeric_cell_names_its_line() {
        let data = "name,location_lat\nRex,north\n";
        let err = CsvRecordReader::from_reader(data.as_bytes()).read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_numeric_cells_are_absent() {
        let data = "name,location_lat\nRex,\n";
        let rows = CsvRecordReader::from_reader(data.as_bytes()).read_all().unwrap();
        assert_eq!(rows[0].location_lat, None);
    }
}
