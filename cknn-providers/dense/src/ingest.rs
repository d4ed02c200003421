//! Conversion of Arrow fixed-size lists into `f64` rows.

use arrow_array::{
    Array, FixedSizeListArray, PrimitiveArray,
    types::{ArrowPrimitiveType, Float32Type, Float64Type},
};
use arrow_schema::{DataType, Field};

use crate::errors::DenseError;

/// Checks a schema field and returns the list width.
pub(crate) fn list_width(field: &Field, column: &str) -> Result<usize, DenseError> {
    let DataType::FixedSizeList(element, width) = field.data_type() else {
        return Err(DenseError::NotAFloatList {
            column: column.to_owned(),
            actual: field.data_type().clone(),
        });
    };
    if field.is_nullable() || element.is_nullable() {
        return Err(DenseError::Nullable {
            column: column.to_owned(),
            nullable_child: element.is_nullable(),
        });
    }
    element_width(element.data_type(), *width)
}

fn element_width(element: &DataType, width: i32) -> Result<usize, DenseError> {
    if !matches!(element, DataType::Float32 | DataType::Float64) {
        return Err(DenseError::UnsupportedElement {
            actual: element.clone(),
        });
    }
    usize::try_from(width).map_err(|_| DenseError::NegativeWidth { width })
}

/// Appends every list entry of `array` to `rows` as one `f64` row.
///
/// `first_row` offsets the row numbers reported in errors so that
/// multi-batch reads point at the absolute row.
pub(crate) fn append_rows(
    array: &FixedSizeListArray,
    expected_width: Option<usize>,
    first_row: usize,
    rows: &mut Vec<Vec<f64>>,
) -> Result<usize, DenseError> {
    let width = element_width(&array.value_type(), array.value_length())?;
    if let Some(expected) = expected_width.filter(|expected| *expected != width) {
        return Err(DenseError::WidthMismatch {
            expected,
            actual: width,
        });
    }
    rows.reserve(array.len());
    for index in 0..array.len() {
        let row = first_row + index;
        if array.is_null(index) {
            return Err(DenseError::NullRow { row });
        }
        let values = array.value(index);
        let any = values.as_any();
        let widened = if let Some(floats) = any.downcast_ref::<PrimitiveArray<Float32Type>>() {
            widen(floats, row)?
        } else if let Some(doubles) = any.downcast_ref::<PrimitiveArray<Float64Type>>() {
            widen(doubles, row)?
        } else {
            return Err(DenseError::UnsupportedElement {
                actual: values.data_type().clone(),
            });
        };
        rows.push(widened);
    }
    Ok(width)
}

fn widen<T>(values: &PrimitiveArray<T>, row: usize) -> Result<Vec<f64>, DenseError>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    if let Some(coordinate) = (0..values.len()).find(|&index| values.is_null(index)) {
        return Err(DenseError::NullValue { row, coordinate });
    }
    Ok(values.values().iter().map(|&value| value.into()).collect())
}
