//! Sample metadata and sample definition files.
//!
//! Samples are declared either relative to the attached holder (a side and a
//! rectangular extent) or as absolute manipulator coordinates. Definitions
//! can be loaded from CSV spreadsheets or YAML maps; both produce a
//! [`SampleMap`] keyed by sample id.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::affine::Frame;
use super::error::SampleFileError;

/// Whether a sample position is interpreted through the holder geometry or
/// as raw manipulator coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleOrigin {
    #[default]
    Holder,
    Absolute,
}

/// Declared position of a sample, before the holder resolves it to a frame.
///
/// For holder-relative samples the coordinates are the rectangle
/// `(x1, y1, x2, y2)` on the given side; for absolute samples they are raw
/// manipulator coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplePosition {
    #[serde(default)]
    pub side: Option<usize>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
    #[serde(default)]
    pub thickness: Option<f64>,
}

/// A sample definition as loaded from a file or passed to `add_sample`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: SamplePosition,
    #[serde(default)]
    pub origin: SampleOrigin,
    /// Arbitrary extra tag fields carried through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A registered sample, with its id and defaulted description filled in.
#[derive(Debug, Clone)]
pub struct Sample {
    pub sample_id: String,
    pub name: String,
    pub description: String,
    pub position: SamplePosition,
    pub origin: SampleOrigin,
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Sample {
    pub fn from_spec(sample_id: &str, spec: SampleSpec) -> Self {
        let description = spec.description.unwrap_or_else(|| spec.name.clone());
        Sample {
            sample_id: sample_id.to_string(),
            name: spec.name,
            description,
            position: spec.position,
            origin: spec.origin,
            extra: spec.extra,
        }
    }
}

/// A resolved sample location: either a frame in the manipulator tree, or
/// raw coordinates to be added to the pseudo position.
#[derive(Debug, Clone)]
pub enum SampleFrame {
    Resolved(Arc<Frame>),
    Absolute(Vec<f64>),
}

pub type SampleMap = FxHashMap<String, SampleSpec>;

/// Load sample definitions from a CSV spreadsheet.
pub fn read_sample_csv(path: &Path) -> Result<SampleMap, SampleFileError> {
    if !path.exists() {
        return Err(SampleFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    parse_sample_csv(&contents)
}

/// Parse CSV sample definitions.
///
/// The first column is the sample id. The header must name at least
/// `x1,y1,x2,y2`; `thickness`, `side`, `sample_name` (or `name`), and
/// `description` are optional, and any other nonempty cell is carried as an
/// extra tag field. Empty header cells are skipped, and empty data cells are
/// treated as absent.
pub fn parse_sample_csv(contents: &str) -> Result<SampleMap, SampleFileError> {
    let mut lines = contents.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(SampleFileError::MissingColumn("sample_id")),
        }
    };

    // (column index, name) for every nonempty header cell
    let columns: Vec<(usize, &str)> = header
        .split_terminator(',')
        .enumerate()
        .map(|(idx, cell)| (idx, cell.trim()))
        .filter(|(_, cell)| !cell.is_empty())
        .collect();
    let (id_column, _) = *columns
        .first()
        .ok_or(SampleFileError::MissingColumn("sample_id"))?;
    let find_column = |name: &str| -> Option<usize> {
        columns
            .iter()
            .find(|&&(idx, cell)| idx != id_column && cell == name)
            .map(|&(idx, _)| idx)
    };
    let coord_columns: [usize; 4] = [
        find_column("x1").ok_or(SampleFileError::MissingColumn("x1"))?,
        find_column("y1").ok_or(SampleFileError::MissingColumn("y1"))?,
        find_column("x2").ok_or(SampleFileError::MissingColumn("x2"))?,
        find_column("y2").ok_or(SampleFileError::MissingColumn("y2"))?,
    ];
    let thickness_column = find_column("thickness");
    let side_column = find_column("side");
    let name_column = find_column("sample_name").or_else(|| find_column("name"));
    let description_column = find_column("description");

    const COORD_NAMES: [&str; 4] = ["x1", "y1", "x2", "y2"];

    let mut samples = SampleMap::default();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |column: usize| -> Option<&str> {
            cells.get(column).copied().filter(|c| !c.is_empty())
        };

        let sample_id = cell(id_column).ok_or(SampleFileError::MissingValue {
            line: idx + 1,
            column: "sample_id",
        })?;

        let mut coordinates = Vec::with_capacity(4);
        for (column, name) in coord_columns.iter().zip(COORD_NAMES) {
            let value = cell(*column).ok_or(SampleFileError::MissingValue {
                line: idx + 1,
                column: name,
            })?;
            coordinates.push(value.parse::<f64>()?);
        }
        let thickness = match thickness_column.and_then(&cell) {
            Some(value) => Some(value.parse::<f64>()?),
            None => None,
        };
        let side = match side_column.and_then(&cell) {
            Some(value) => Some(value.parse::<usize>()?),
            None => None,
        };

        let name = name_column
            .and_then(&cell)
            .unwrap_or(sample_id)
            .to_string();
        let description = description_column.and_then(&cell).map(str::to_string);

        let mut extra = BTreeMap::new();
        for &(column, header_name) in &columns {
            let known = column == id_column
                || coord_columns.contains(&column)
                || Some(column) == thickness_column
                || Some(column) == side_column
                || Some(column) == name_column
                || Some(column) == description_column;
            if known {
                continue;
            }
            if let Some(value) = cell(column) {
                extra.insert(
                    header_name.to_string(),
                    serde_yaml::Value::String(value.to_string()),
                );
            }
        }

        samples.insert(
            sample_id.to_string(),
            SampleSpec {
                name,
                description,
                position: SamplePosition {
                    side,
                    coordinates,
                    thickness,
                },
                origin: SampleOrigin::Holder,
                extra,
            },
        );
    }
    Ok(samples)
}

/// Load sample definitions from a YAML map of sample id to spec.
pub fn read_sample_yaml(path: &Path) -> Result<SampleMap, SampleFileError> {
    if !path.exists() {
        return Err(SampleFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    parse_sample_yaml(&contents)
}

pub fn parse_sample_yaml(contents: &str) -> Result<SampleMap, SampleFileError> {
    Ok(serde_yaml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
sample_id,sample_name,side,x1,y1,x2,y2,thickness,owner
s1,First Sample,1,0.0,10.0,5.0,20.0,1.0,alice
s2,,2,1.0,2.0,3.0,4.0,,
";

    #[test]
    fn test_parse_sample_csv() {
        let samples = parse_sample_csv(CSV).unwrap();
        assert_eq!(samples.len(), 2);

        let s1 = &samples["s1"];
        assert_eq!(s1.name, "First Sample");
        assert_eq!(s1.position.side, Some(1));
        assert_eq!(s1.position.coordinates, vec![0.0, 10.0, 5.0, 20.0]);
        assert_eq!(s1.position.thickness, Some(1.0));
        assert_eq!(s1.origin, SampleOrigin::Holder);
        assert_eq!(
            s1.extra.get("owner"),
            Some(&serde_yaml::Value::String("alice".to_string()))
        );

        // Empty cells are absent; the name falls back to the id
        let s2 = &samples["s2"];
        assert_eq!(s2.name, "s2");
        assert_eq!(s2.position.thickness, None);
        assert!(s2.extra.is_empty());
    }

    #[test]
    fn test_parse_sample_csv_missing_column() {
        let result = parse_sample_csv("sample_id,x1,y1,x2\ns1,0,0,1\n");
        assert!(matches!(
            result,
            Err(SampleFileError::MissingColumn("y2"))
        ));
    }

    #[test]
    fn test_parse_sample_csv_missing_value() {
        let result = parse_sample_csv("sample_id,x1,y1,x2,y2\ns1,0,,1,1\n");
        assert!(matches!(
            result,
            Err(SampleFileError::MissingValue {
                line: 2,
                column: "y1"
            })
        ));
    }

    #[test]
    fn test_parse_sample_csv_bad_number() {
        let result = parse_sample_csv("sample_id,x1,y1,x2,y2\ns1,zero,0,1,1\n");
        assert!(matches!(result, Err(SampleFileError::ParsingError(_))));
    }

    #[test]
    fn test_parse_sample_yaml() {
        let yaml = "\
s1:
  name: First Sample
  position:
    side: 1
    coordinates: [0.0, 10.0, 5.0, 20.0]
    thickness: 1.0
s2:
  name: Loose Sample
  origin: absolute
  position:
    coordinates: [10.0, 0.0, 250.0, 45.0]
  owner: alice
";
        let samples = parse_sample_yaml(yaml).unwrap();
        let s1 = &samples["s1"];
        assert_eq!(s1.origin, SampleOrigin::Holder);
        assert_eq!(s1.position.side, Some(1));

        let s2 = &samples["s2"];
        assert_eq!(s2.origin, SampleOrigin::Absolute);
        assert_eq!(s2.position.coordinates.len(), 4);
        assert_eq!(
            s2.extra.get("owner"),
            Some(&serde_yaml::Value::String("alice".to_string()))
        );
    }

    #[test]
    fn test_sample_from_spec_defaults_description() {
        let spec = SampleSpec {
            name: "First Sample".to_string(),
            ..SampleSpec::default()
        };
        let sample = Sample::from_spec("s1", spec);
        assert_eq!(sample.description, "First Sample");
    }
}
