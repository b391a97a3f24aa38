//! Read/write bare model records as JSON.
//!
//! The JSON export is the portable form of a single model: just the record
//! (`ematrix`, `inverse_flag`, `offset`), without tag or extension. JSON has
//! no NaN or infinity, so models with non-finite values are refused on write.

use std::fs::File;
use std::path::Path;

use log::debug;

use crate::domain::{DispersionRecord, FIELD_EMATRIX, FIELD_OFFSET};
use crate::error::{DispersionError, Result};
use crate::models::DispersionModel;
use crate::persist::{DispersionConverter, Tree};

/// Write a model record JSON file.
pub fn write_model_json(path: &Path, model: &DispersionModel) -> Result<()> {
    let record = DispersionConverter.encode(model);
    ensure_finite(&record)?;

    let file = File::create(path).map_err(|e| DispersionError::io("create", path, e))?;
    serde_json::to_writer_pretty(file, &record)?;
    debug!("wrote dispersion model JSON to {}", path.display());
    Ok(())
}

/// Read a model record JSON file.
pub fn read_model_json(path: &Path) -> Result<DispersionModel> {
    let file = File::open(path).map_err(|e| DispersionError::io("open", path, e))?;
    let tree: Tree = serde_json::from_reader(file)?;
    DispersionConverter.decode(&tree)
}

fn ensure_finite(record: &DispersionRecord) -> Result<()> {
    if !record.ematrix.iter().flatten().all(|v| v.is_finite()) {
        return Err(DispersionError::InvalidField {
            field: FIELD_EMATRIX,
            expected: "finite numbers for JSON",
        });
    }
    if !record.offset.is_finite() {
        return Err(DispersionError::InvalidField {
            field: FIELD_OFFSET,
            expected: "a finite number for JSON",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::models::CoefficientMatrix;

    #[test]
    fn json_round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let m = CoefficientMatrix::from_row_slice(&[
            0.1, 0.2, 0.30000000000000004, 1.0 / 3.0, 2.0 / 3.0, 1e-300, //
            -7.0, 6.02214076e23, 9.1093837015e-31, 0.0, -0.0, 5.0,
        ]);
        let model = DispersionModel::new(m, 1.0 / 7.0, false);

        write_model_json(&path, &model).unwrap();
        let back = read_model_json(&path).unwrap();

        for (a, b) in back.matrix().iter().zip(model.matrix().iter()) {
            assert_eq!(a.to_bits(), b.to_bits(), "{a} vs {b}");
        }
        assert_eq!(back.offset().to_bits(), model.offset().to_bits());
        assert_eq!(back.is_inverse(), model.is_inverse());
    }

    #[test]
    fn json_uses_contract_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_model_json(&path, &DispersionModel::forward(CoefficientMatrix::zeros(), 2.0)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["inverse_flag"], serde_json::Value::Bool(false));
        assert_eq!(obj["offset"].as_f64(), Some(2.0));
        assert_eq!(obj["ematrix"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn missing_field_in_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(
            &path,
            r#"{"ematrix": [[1,0,0,0,0,0],[0,0,0,0,0,1]], "offset": 0.0}"#,
        )
        .unwrap();

        assert!(matches!(
            read_model_json(&path),
            Err(DispersionError::MissingField {
                field: "inverse_flag"
            })
        ));
    }

    #[test]
    fn non_finite_values_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = CoefficientMatrix::zeros();
        m[(1, 3)] = f64::NAN;
        let err = write_model_json(&dir.path().join("nan.json"), &DispersionModel::forward(m, 0.0))
            .unwrap_err();
        assert!(matches!(err, DispersionError::InvalidField { field: "ematrix", .. }));
        assert!(!dir.path().join("nan.json").exists());
    }
}
