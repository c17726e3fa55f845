use std::{fs::File, io::Read, path::Path};

use log::{debug, info};
use rand::{Rng, seq::SliceRandom};

use crate::{
    error::{PricingErr, Result},
    record::FeatureRecord,
    schema::{self, FeatureKind, TARGET_COLUMN},
};

/// An in-memory labeled dataset: one feature record and one target value per row.
///
/// Records are keyed by canonical feature names, so the preprocessing code sees exactly the
/// same shape at training time as it does when serving.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<FeatureRecord>,
    targets: Vec<f64>,
}

impl Dataset {
    /// Creates a new dataset from owned buffers.
    ///
    /// # Errors
    /// Returns `SizeMismatch` if the buffers differ in length and `EmptyDataset` if they're empty.
    pub fn new(records: Vec<FeatureRecord>, targets: Vec<f64>) -> Result<Self> {
        if records.len() != targets.len() {
            return Err(PricingErr::SizeMismatch {
                a: "records",
                b: "targets",
                got: records.len(),
                expected: targets.len(),
            });
        }

        if records.is_empty() {
            return Err(PricingErr::EmptyDataset);
        }

        Ok(Self { records, targets })
    }

    /// Loads a dataset from a CSV file with a header row.
    ///
    /// # Arguments
    /// * `path` - The location of the CSV file.
    ///
    /// # Errors
    /// Fails if the file can't be read, a required column is missing or a numeric cell doesn't parse.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Loads a dataset from any CSV source with a header row.
    ///
    /// Dataset headers are translated to canonical feature names; columns outside the schema are
    /// ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();

        let position = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(PricingErr::MissingColumn { column })
        };

        let target_idx = position(TARGET_COLUMN)?;
        let columns = schema::features()
            .map(|f| position(f.column).map(|idx| (f, idx)))
            .collect::<Result<Vec<_>>>()?;

        let mut records = Vec::new();
        let mut targets = Vec::new();

        for (i, row) in reader.records().enumerate() {
            let row = row?;
            // header is line 1
            let line = i + 2;

            let mut record = FeatureRecord::new();
            for &(feature, idx) in &columns {
                let cell = row.get(idx).unwrap_or_default();
                match feature.kind {
                    FeatureKind::Numeric => {
                        record.insert(feature.name, parse_number(cell, line, feature.column)?)
                    }
                    FeatureKind::Categorical => record.insert(feature.name, cell),
                }
            }

            let target = parse_number(row.get(target_idx).unwrap_or_default(), line, TARGET_COLUMN)?;
            records.push(record);
            targets.push(target);
        }

        debug!(rows = records.len(); "parsed dataset");
        Self::new(records, targets)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Shuffles the rows and splits them into a training and a holdout part.
    ///
    /// # Arguments
    /// * `holdout` - The fraction of rows that go into the holdout part, in `(0, 1)`.
    /// * `rng` - A random number generator.
    ///
    /// # Errors
    /// Returns `InvalidFraction` if `holdout` is outside `(0, 1)` and `EmptyDataset` if either
    /// side would end up with no rows.
    pub fn split<R: Rng>(&self, holdout: f64, rng: &mut R) -> Result<(Self, Self)> {
        if !(holdout > 0.0 && holdout < 1.0) {
            return Err(PricingErr::InvalidFraction(holdout));
        }

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        let n_holdout = (self.len() as f64 * holdout).round() as usize;
        let (holdout_idx, train_idx) = order.split_at(n_holdout);

        let pick = |idx: &[usize]| {
            let records = idx.iter().map(|&i| self.records[i].clone()).collect();
            let targets = idx.iter().map(|&i| self.targets[i]).collect();
            Self::new(records, targets)
        };

        Ok((pick(train_idx)?, pick(holdout_idx)?))
    }
}

fn parse_number(cell: &str, row: usize, column: &'static str) -> Result<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| PricingErr::InvalidNumber {
            row,
            column,
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const CSV: &str = "\
Category,Brand,Age Group,Size (cm),Weight (kg),Material,Condition,Estimated Value (Frw),Notes
Action Figure,Hasbro,5+,10,0.2,Plastic,New,15000,boxed
Doll,Mattel,3+,30,0.5,Plastic,Used,8000,
Puzzle,Ravensburger,8+,40,1.1,Cardboard,New,12000,
\"Board Game, Deluxe\",Hasbro,12+,45,2.0,Cardboard,Like New,25000,
";

    #[test]
    fn loads_and_renames_columns() {
        let ds = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.targets(), &[15000.0, 8000.0, 12000.0, 25000.0]);

        let first = &ds.records()[0];
        assert_eq!(first.category("AgeGroup").unwrap(), "5+");
        assert_eq!(first.numeric("Size").unwrap(), 10.0);
        assert_eq!(first.numeric("Weight").unwrap(), 0.2);
        assert!(first.missing_features().is_empty());
        assert!(!first.contains("Notes"));

        assert_eq!(ds.records()[3].category("Category").unwrap(), "Board Game, Deluxe");
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Category,Brand,Size (cm),Weight (kg),Material,Condition,Estimated Value (Frw)\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PricingErr::MissingColumn { column: "Age Group" }));
    }

    #[test]
    fn bad_number_reports_its_line() {
        let csv = "\
Category,Brand,Age Group,Size (cm),Weight (kg),Material,Condition,Estimated Value (Frw)
Doll,Mattel,3+,30,0.5,Plastic,Used,8000
Doll,Mattel,3+,huge,0.5,Plastic,Used,8000
";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        match err {
            PricingErr::InvalidNumber { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Size (cm)");
                assert_eq!(value, "huge");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "Category,Brand,Age Group,Size (cm),Weight (kg),Material,Condition,Estimated Value (Frw)\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PricingErr::EmptyDataset));
    }

    #[test]
    fn split_partitions_every_row() {
        let ds = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (train, holdout) = ds.split(0.25, &mut rng).unwrap();

        assert_eq!(train.len(), 3);
        assert_eq!(holdout.len(), 1);

        let mut all: Vec<f64> = train.targets().iter().chain(holdout.targets()).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, vec![8000.0, 12000.0, 15000.0, 25000.0]);
    }

    #[test]
    fn split_rejects_fractions_out_of_range() {
        let ds = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for holdout in [0.0, 1.0, 1.5, -0.25, f64::NAN] {
            let err = ds.split(holdout, &mut rng).unwrap_err();
            assert!(matches!(err, PricingErr::InvalidFraction(_)), "holdout = {holdout}");
        }
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let err = Dataset::new(vec![FeatureRecord::new()], vec![]).unwrap_err();
        assert!(matches!(err, PricingErr::SizeMismatch { .. }));
    }
}
