//! Column value extraction helpers
//!
//! The pipeline works row-wise in a few places (label masks, one-hot
//! encoding, duplicate detection), so these helpers flatten polars columns
//! into plain vectors regardless of the underlying dtype.

use anyhow::Result;
use polars::prelude::*;

/// Convert a column to a Vec of Option<String> for comparison
pub fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // For other types, try to cast to string
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Convert a column to a Vec of Option<f64>, nulls preserved
pub fn column_to_f64_vec(col: &Column) -> Result<Vec<Option<f64>>> {
    let cast = col.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_column_roundtrip() {
        let df = df! {
            "grade" => [Some("A"), None, Some("C")],
        }
        .unwrap();

        let values = column_to_string_vec(df.column("grade").unwrap()).unwrap();
        assert_eq!(
            values,
            vec![Some("A".to_string()), None, Some("C".to_string())]
        );
    }

    #[test]
    fn test_numeric_column_to_f64() {
        let df = df! {
            "amount" => [Some(1000i64), Some(2500), None],
        }
        .unwrap();

        let values = column_to_f64_vec(df.column("amount").unwrap()).unwrap();
        assert_eq!(values, vec![Some(1000.0), Some(2500.0), None]);
    }

    #[test]
    fn test_integer_column_to_string() {
        let df = df! {
            "term" => [36i32, 60],
        }
        .unwrap();

        let values = column_to_string_vec(df.column("term").unwrap()).unwrap();
        assert_eq!(values, vec![Some("36".to_string()), Some("60".to_string())]);
    }
}
