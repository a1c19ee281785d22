use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ibs-to-sg5302")]
#[command(about = "Converts an IBS report (one intercept, JSON) into an SG5302 report")]
pub struct CliConfig {
    /// IBS report file that will be converted
    pub ibs_file: PathBuf,

    /// Directory where SG5302 report will be written to (default: current working directory)
    #[arg(short, long)]
    pub output_directory: Option<PathBuf>,

    /// Optional TOML file with report parameters and field labels
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_ibs_file_and_defaults() {
        let config = CliConfig::try_parse_from(["ibs-to-sg5302", "report.json"]).unwrap();

        assert_eq!(config.ibs_file, PathBuf::from("report.json"));
        assert!(config.output_directory.is_none());
        assert!(config.config.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_output_directory_flag() {
        let config =
            CliConfig::try_parse_from(["ibs-to-sg5302", "-o", "/tmp/out", "report.json"]).unwrap();
        assert_eq!(config.output_directory, Some(PathBuf::from("/tmp/out")));

        let config = CliConfig::try_parse_from([
            "ibs-to-sg5302",
            "--output-directory",
            "/tmp/out",
            "report.json",
        ])
        .unwrap();
        assert_eq!(config.output_directory, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_ibs_file_is_required() {
        assert!(CliConfig::try_parse_from(["ibs-to-sg5302"]).is_err());
        assert!(CliConfig::try_parse_from(["ibs-to-sg5302", "-i", "report.json"]).is_err());
    }
}
