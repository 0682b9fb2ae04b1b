use std::str::FromStr;

/// Plane used when viewing a volume laid out as (rows, cols, depth).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Fixed depth index, yields a (rows, cols) plane.
    Axial,
    /// Fixed row index, yields a (depth, cols) plane.
    Coronal,
    /// Fixed column index, yields a (depth, rows) plane.
    Sagittal,
}

/// Attribute used to order slices before stacking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    InstanceNumber,
    /// z of Image Position (Patient), highest first
    ImagePositionPatient,
    TablePosition,
    /// Keep enumeration order
    None,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instance-number" => Ok(SortBy::InstanceNumber),
            "image-position-patient" => Ok(SortBy::ImagePositionPatient),
            "table-position" => Ok(SortBy::TablePosition),
            "none" => Ok(SortBy::None),
            other => Err(format!(
                "unknown sort attribute '{other}', expected one of: \
                 instance-number, image-position-patient, table-position, none"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SortBy;

    #[test]
    fn test_sort_by_from_str() {
        assert_eq!("instance-number".parse(), Ok(SortBy::InstanceNumber));
        assert_eq!("Table-Position".parse(), Ok(SortBy::TablePosition));
        assert_eq!("none".parse(), Ok(SortBy::None));
        assert!("slice-location".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_sort_by_default_is_instance_number() {
        assert_eq!(SortBy::default(), SortBy::InstanceNumber);
    }
}
