//! Sheetwire CLI - cell label and coordinate conversion

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetwire::{coordinate_to_label, label_to_coordinate, RangeName};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetwire")]
#[command(author, version, about = "Convert between cell labels and grid coordinates")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 0-based `row col` of each label
    Coord {
        /// Labels such as A1 or ab12
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Print the label of a 0-based coordinate
    Label {
        #[arg(allow_negative_numbers = true)]
        row: i64,
        #[arg(allow_negative_numbers = true)]
        col: i64,
    },

    /// Print the 0-based, end-exclusive grid indices of a range as JSON
    Range {
        /// A1:C5 or Sheet1!A1:C5
        range: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Coord { labels } => {
            for label in &labels {
                println!("{}", coord(label)?);
            }
        }
        Commands::Label { row, col } => println!("{}", label(row, col)?),
        Commands::Range { range } => {
            println!("{}", serde_json::to_string_pretty(&range_indices(&range)?)?)
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn coord(label: &str) -> Result<String> {
    tracing::debug!(%label, "converting label");
    let (row, col) =
        label_to_coordinate(label).with_context(|| format!("Failed to convert '{label}'"))?;
    Ok(format!("{row} {col}"))
}

fn label(row: i64, col: i64) -> Result<String> {
    coordinate_to_label(row, col).with_context(|| format!("Failed to convert ({row}, {col})"))
}

fn range_indices(range: &str) -> Result<serde_json::Value> {
    let name = RangeName::parse(range).with_context(|| format!("Failed to parse '{range}'"))?;
    let indices = name.range.to_grid_indices();

    Ok(serde_json::json!({
        "sheet": name.sheet,
        "startRowIndex": indices.start_row,
        "endRowIndex": indices.end_row,
        "startColumnIndex": indices.start_col,
        "endColumnIndex": indices.end_col,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetwire::CellError;

    #[test]
    fn test_coord() {
        assert_eq!(coord("A1").unwrap(), "0 0");
        assert_eq!(coord("ab12").unwrap(), "11 27");
        assert!(coord("1A").is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(label(0, 26).unwrap(), "AA1");
        assert_eq!(label(11, 1).unwrap(), "B12");
    }

    #[test]
    fn test_label_rejects_negative() {
        let err = label(-1, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CellError>(),
            Some(CellError::IncorrectCellLabel(_))
        ));
    }

    #[test]
    fn test_negative_arguments_reach_label() {
        let cli = Cli::try_parse_from(["sheetwire", "label", "-1", "0"]).unwrap();
        match cli.command {
            Commands::Label { row, col } => assert_eq!((row, col), (-1, 0)),
            _ => panic!("expected the label subcommand"),
        }

        let cli = Cli::try_parse_from(["sheetwire", "-v", "label", "3", "-2"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Label { row: 3, col: -2 }));
    }

    #[test]
    fn test_range_indices() {
        let value = range_indices("'Q1 Data'!B2:C5").unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sheet": "Q1 Data",
                "startRowIndex": 1,
                "endRowIndex": 5,
                "startColumnIndex": 1,
                "endColumnIndex": 3,
            })
        );
        assert!(range_indices("A1:B2:C3").is_err());
    }
}
