use crate::gklib::{KmError, Point, Result};
use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

type FileHandler = io::Result<io::Lines<io::BufReader<File>>>;

fn read_lines<P>(filename: P) -> FileHandler
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

/// What to do with a coordinate field that doesn't parse as a float
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Stop loading with `KmError::BadCoordinate`
    #[default]
    Strict,
    /// Substitute 0.0 and warn
    Zero,
}

/// Labeled points. The position of a point is its identity everywhere downstream.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    names: Vec<String>,
    points: Vec<Point>,
}

impl Dataset {
    pub fn new(names: Vec<String>, points: Vec<Point>) -> Result<Self> {
        if names.len() != points.len() {
            return Err(KmError::LabelMismatch {
                names: names.len(),
                points: points.len(),
            });
        }
        Ok(Self { names, points })
    }

    /// Unlabeled points get `p0`, `p1`, ...
    pub fn from_points(points: Vec<Point>) -> Self {
        let names = (0..points.len()).map(|i| format!("p{}", i)).collect();
        Self { names, points }
    }

    /// Load a `label\tx\ty` file
    pub fn from_path(path: &Path, policy: ParsePolicy) -> Result<Self> {
        let lines = read_lines(path).map_err(|source| KmError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_lines(lines, policy)
    }

    pub fn from_reader<R: BufRead>(reader: R, policy: ParsePolicy) -> Result<Self> {
        Self::from_lines(reader.lines(), policy)
    }

    fn from_lines<I>(lines: I, policy: ParsePolicy) -> Result<Self>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut names = vec![];
        let mut points = vec![];
        let mut malformed = 0;

        for (idx, line) in lines.enumerate() {
            let line = line?;
            let lineno = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let collection: Vec<&str> = line.split('\t').collect();
            if collection.len() != 3 {
                debug!("skipping malformed line {}: {}", lineno, line);
                malformed += 1;
                continue;
            }
            let x = parse_coord(collection[1], lineno, "x", policy)?;
            let y = parse_coord(collection[2], lineno, "y", policy)?;
            names.push(collection[0].to_string());
            points.push(Point::new(x, y));
        }

        if malformed > 0 {
            warn!("skipped {} lines without exactly 3 fields", malformed);
        }

        Ok(Self { names, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }
}

fn parse_coord(value: &str, line: usize, field: &'static str, policy: ParsePolicy) -> Result<f64> {
    // NaN and inf parse as floats but can't be clustered
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => match policy {
            ParsePolicy::Strict => Err(KmError::BadCoordinate {
                line,
                field,
                value: value.to_string(),
            }),
            ParsePolicy::Zero => {
                warn!("line {}: {} coordinate `{}` read as 0", line, field, value);
                Ok(0.0)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_three_fields() {
        let text = "tokyo\t35.68\t139.76\nosaka\t34.69\t135.50\n";
        let data = Dataset::from_reader(Cursor::new(text), ParsePolicy::Strict).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.name(1), "osaka");
        assert_eq!(data.points()[0], Point::new(35.68, 139.76));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "a\t1\t2\nonly\t3\n\nb\t4\t5\textra\nc\t6\t7\n";
        let data = Dataset::from_reader(Cursor::new(text), ParsePolicy::Strict).unwrap();
        assert_eq!(data.names(), &["a".to_string(), "c".to_string()]);
        assert_eq!(data.points()[1], Point::new(6.0, 7.0));
    }

    #[test]
    fn test_bad_coordinate_strict() {
        let text = "a\t1\t2\nb\tnorth\t5\n";
        let err = Dataset::from_reader(Cursor::new(text), ParsePolicy::Strict).unwrap_err();
        match err {
            KmError::BadCoordinate { line, field, value } => {
                assert_eq!(line, 2);
                assert_eq!(field, "x");
                assert_eq!(value, "north");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_bad_coordinate_zero() {
        let text = "a\t1\t??\n";
        let data = Dataset::from_reader(Cursor::new(text), ParsePolicy::Zero).unwrap();
        assert_eq!(data.points()[0], Point::new(1.0, 0.0));
    }

    #[test]
    fn test_non_finite_coordinate() {
        for bad in ["NaN", "inf", "-infinity"] {
            let text = format!("a\t1\t2\nb\t{}\t1\n", bad);
            let err = Dataset::from_reader(Cursor::new(text.clone()), ParsePolicy::Strict)
                .unwrap_err();
            assert!(matches!(err, KmError::BadCoordinate { line: 2, field: "x", .. }));

            let data = Dataset::from_reader(Cursor::new(text), ParsePolicy::Zero).unwrap();
            assert_eq!(data.points()[1], Point::new(0.0, 1.0));
        }
    }

    #[test]
    fn test_label_count_mismatch() {
        let err = Dataset::new(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(err, KmError::LabelMismatch { names: 1, points: 0 }));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_path(Path::new("/nonexistent/points.tsv"), ParsePolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, KmError::Read { .. }));
    }

    #[test]
    fn test_from_points_labels() {
        let data = Dataset::from_points(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(data.name(1), "p1");
    }
}
