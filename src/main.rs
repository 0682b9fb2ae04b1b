use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info, warn};
use simple_logger::SimpleLogger;

use dicom_contour::{
    ContourError, Orientation, Point2, SegmentationSession, SessionError, SortBy, VolumeLoader,
    VolumeLoaderError,
};

/// Load a DICOM folder as a volume and keep only the region inside a contour
/// drawn on its first slice.
#[derive(Parser, Debug)]
#[command(author, about, version, long_about)]
struct Args {
    /// Folder containing the .dcm slices
    directory: PathBuf,

    /// Contour point as ROW,COL in pixel coordinates, repeat for each pick
    #[arg(short, long = "point", value_parser = parse_point)]
    points: Vec<Point2>,

    /// Attribute used to order slices:
    ///     instance-number, image-position-patient, table-position or none
    #[arg(short, long, default_value = "instance-number")]
    sort_by: SortBy,

    /// Write the displayed active slice as a grayscale PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log every picked point
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(s: &str) -> Result<Point2, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(Point2::new(parse(row)?, parse(col)?))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    info!("Selected folder: {}", args.directory.display());
    let volume = match VolumeLoader::load_from_directory(&args.directory, args.sort_by) {
        Ok(volume) => volume,
        Err(VolumeLoaderError::EmptyInput) => {
            warn!("No DICOM files found in {}", args.directory.display());
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("loading {}", args.directory.display()));
        }
    };
    info!("Volume shape {:?}, spacing {:?}", volume.dim(), volume.spacing());

    let mut session = SegmentationSession::new(volume);
    for point in &args.points {
        if let Some((from, to)) = session.pick(*point)? {
            info!(
                "Segment ({}, {}) -> ({}, {})",
                from.row, from.col, to.row, to.col
            );
        }
    }

    match session.finish() {
        Ok(ring) => info!("Contour finished, polygon closed over {} points", ring.len()),
        Err(SessionError::Contour(ContourError::TooSmall { .. })) => {
            warn!("Contour too small, give at least three distinct --point values");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    if let Some(path) = &args.snapshot {
        let image = session
            .displayed()
            .get_image_from_axis(session.active_slice(), Orientation::Axial)
            .ok_or_else(|| anyhow!("active slice {} is not displayable", session.active_slice()))?;
        image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Snapshot written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("2,6.5"), Ok(Point2::new(2.0, 6.5)));
        assert_eq!(parse_point(" 3 , 4 "), Ok(Point2::new(3.0, 4.0)));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,4").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "dicom-contour",
            "scans",
            "-p",
            "1,1",
            "--point",
            "1,5",
            "--sort-by",
            "table-position",
        ])
        .unwrap();
        assert_eq!(args.directory, PathBuf::from("scans"));
        assert_eq!(args.points.len(), 2);
        assert_eq!(args.sort_by, SortBy::TablePosition);
        assert!(args.snapshot.is_none());
    }
}
