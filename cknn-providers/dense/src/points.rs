use std::{fs::File, path::Path};

use arrow_array::{Array, FixedSizeListArray, RecordBatchReader};
use cknn_core::{DataSource, DataSourceError, PointSet};
use parquet::{
    arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder},
    file::reader::ChunkReader,
};
use tracing::{debug, instrument};

use crate::{
    errors::DenseError,
    ingest::{append_rows, list_width},
};

/// A named, validated point cloud measured with the Euclidean metric.
///
/// Use [`DensePoints::rows`] to build a graph under another metric.
#[derive(Debug, Clone)]
pub struct DensePoints {
    name: String,
    points: PointSet,
}

impl DensePoints {
    fn new(name: impl Into<String>, rows: Vec<Vec<f64>>) -> Result<Self, DenseError> {
        Ok(Self {
            name: name.into(),
            points: PointSet::euclidean(rows)?,
        })
    }

    /// Loads the points held by an in-memory list array.
    ///
    /// # Errors
    /// Returns a [`DenseError`] for null rows or coordinates, non-float
    /// elements, or rows rejected by [`PointSet`].
    pub fn from_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
    ) -> Result<Self, DenseError> {
        let mut rows = Vec::new();
        append_rows(array, None, 0, &mut rows)?;
        Self::new(name, rows)
    }

    /// Opens `path` and loads `column` with [`Self::from_parquet_reader`].
    ///
    /// # Errors
    /// Returns [`DenseError::Io`] when the file cannot be opened.
    pub fn from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
    ) -> Result<Self, DenseError> {
        Self::from_parquet_reader(name, File::open(path)?, column)
    }

    /// Reads `column` from every record batch of a Parquet file.
    ///
    /// # Errors
    /// Returns a [`DenseError`] when the column is missing, not a
    /// non-nullable float list, changes width between batches, or holds
    /// nulls or non-finite values.
    #[instrument(name = "dense.load", err, skip(name, reader))]
    pub fn from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
    ) -> Result<Self, DenseError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let batches = builder.with_projection(mask).build()?;
        let schema = batches.schema();
        let index = schema
            .index_of(column)
            .map_err(|_| DenseError::MissingColumn {
                column: column.to_owned(),
            })?;
        let width = list_width(schema.field(index), column)?;

        let mut rows = Vec::new();
        for batch in batches {
            let batch = batch?;
            let array = batch.column(index);
            let list = array
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| DenseError::NotAFloatList {
                    column: column.to_owned(),
                    actual: array.data_type().clone(),
                })?;
            append_rows(list, Some(width), rows.len(), &mut rows)?;
        }
        debug!(rows = rows.len(), width, "loaded dense points");
        Self::new(name, rows)
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn dimension(&self) -> usize { self.points.dimension() }

    /// Loaded coordinates, one row per point.
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] { self.points.rows() }
}

impl DataSource for DensePoints {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
        self.points.distance(i, j)
    }
}
