use std::path::PathBuf;

use clap::Parser;

use crate::{core::types::SessionOptions, view::PageSize};

#[derive(Parser, Debug, Clone)]
#[command(name = "duckdb-helper", version, about = "Browse and query a DuckDB file")]
pub struct Args {
    /// Database file to open as a session.
    pub path: PathBuf,

    /// Browse interactively in the terminal instead of serving the view protocol on stdio.
    #[arg(long)]
    pub browse: bool,

    /// Open the database read-only.
    #[arg(long)]
    pub read_only: bool,

    /// Rows per page in the browser (10, 25, 50 or 100).
    #[arg(long, default_value = "25", value_parser = parse_page_size)]
    pub page_size: PageSize,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            read_only: self.read_only,
        }
    }
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    PageSize::try_from(n).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["duckdb-helper", "data.duckdb"]).unwrap();
        assert_eq!(args.path, PathBuf::from("data.duckdb"));
        assert!(!args.browse);
        assert!(!args.session_options().read_only);
        assert_eq!(args.page_size, PageSize::TwentyFive);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn browse_flags() {
        let args = Args::try_parse_from([
            "duckdb-helper",
            "data.duckdb",
            "--browse",
            "--read-only",
            "--page-size",
            "100",
        ])
        .unwrap();
        assert!(args.browse);
        assert!(args.session_options().read_only);
        assert_eq!(args.page_size, PageSize::Hundred);
    }

    #[test]
    fn rejects_unsupported_page_size() {
        assert!(Args::try_parse_from(["duckdb-helper", "x.duckdb", "--page-size", "30"]).is_err());
        assert!(Args::try_parse_from(["duckdb-helper"]).is_err());
    }
}
