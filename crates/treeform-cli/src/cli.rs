//! Command-line interface for the treeform utility
//!
//! Provides a CLI to turn class diagram markup into a nested XML config
//! document and a JSON metadata document.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use treeform::core::logging::init_logging;
use treeform::model::{AggregationEdge, BuiltModel, ClassEntity, Orchestrator};
use treeform::{ModelError, TransformConfig, DEFAULT_INDENT};

const DEFAULT_CONFIG_OUTPUT: &str = "config.xml";
const DEFAULT_METADATA_OUTPUT: &str = "metadata.json";

/// Treeform - Turn aggregation class diagrams into nested config and metadata
#[derive(Parser)]
#[command(name = "treeform")]
#[command(about = "Turn UML-like class diagrams into a nested XML config and JSON metadata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a class diagram into the config and metadata documents
    Convert {
        /// Input file containing the class diagram (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the nested XML config (use - for stdout)
        #[arg(long, default_value = DEFAULT_CONFIG_OUTPUT)]
        config_output: PathBuf,

        /// Output file for the JSON metadata (use - for stdout)
        #[arg(long, default_value = DEFAULT_METADATA_OUTPUT)]
        metadata_output: PathBuf,

        /// Root class to use when no class is marked isRoot
        #[arg(short, long)]
        root_class: Option<String>,

        /// Spaces per nesting level in the config document
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,

        /// Reject duplicate parents and parentless non-root classes
        #[arg(long)]
        strict: bool,
    },

    /// Check that a class diagram converts cleanly without writing anything
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Root class to use when no class is marked isRoot
        #[arg(short, long)]
        root_class: Option<String>,

        /// Reject duplicate parents and parentless non-root classes
        #[arg(long)]
        strict: bool,
    },

    /// Show the parsed classes and aggregations
    Inspect {
        /// Input file to inspect (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// JSON view printed by `inspect --json`
#[derive(Serialize)]
struct InspectReport<'a> {
    classes: Vec<&'a ClassEntity>,
    aggregations: &'a [AggregationEdge],
}

/// Main CLI application
pub struct TreeformApp {
    config: TransformConfig,
}

impl TreeformApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(TransformConfig::default())
    }

    /// Create a new application instance with a transform config
    pub fn with_config(config: TransformConfig) -> Self {
        Self { config }
    }

    fn build_config(&self, root_class: Option<String>, indent: usize, strict: bool) -> TransformConfig {
        let mut config = self.config.clone().with_indent(indent).with_strict(strict);
        config.root_class = root_class.or_else(|| self.config.root_class.clone());
        config
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("TREEFORM_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("TREEFORM_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Treeform v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                config_output,
                metadata_output,
                root_class,
                indent,
                strict,
            } => {
                let config = self.build_config(root_class, indent, strict);
                self.convert_command(input, config_output, metadata_output, config, cli.verbose)
            }
            Commands::Validate {
                input,
                root_class,
                strict,
            } => {
                let config = self.build_config(root_class, self.config.indent, strict);
                self.validate_command(input, config, cli.verbose)
            }
            Commands::Inspect { input, json } => self.inspect_command(input, json, cli.verbose),
        }
    }

    /// Handle the convert command
    ///
    /// Both documents are rendered before either file is written.
    fn convert_command(
        &self,
        input: PathBuf,
        config_output: PathBuf,
        metadata_output: PathBuf,
        config: TransformConfig,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(Some(input))?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let output = Orchestrator::with_config(config).process(&content)?;

        self.write_output(Some(config_output.clone()), &output.config)?;
        self.write_output(Some(metadata_output.clone()), &output.metadata)?;
        info!(
            config_output = %config_output.display(),
            metadata_output = %metadata_output.display(),
            "Documents written"
        );

        if verbose {
            eprintln!(
                "Wrote config to {} and metadata to {}",
                config_output.display(),
                metadata_output.display()
            );
        }
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: PathBuf, config: TransformConfig, verbose: bool) -> Result<()> {
        let content = self.read_input(Some(input))?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match Self::check_model(&content, config) {
            Ok((class_count, aggregation_count)) => {
                println!(
                    "✓ Valid model ({} classes, {} aggregations)",
                    class_count, aggregation_count
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid model: {}", e);
                Err(e)
            }
        }
    }

    /// Run every pipeline stage and return the class and aggregation counts
    fn check_model(content: &str, config: TransformConfig) -> Result<(usize, usize)> {
        let orchestrator = Orchestrator::with_config(config);
        let built = orchestrator.process_model(content)?;
        let counts = (
            built.database.class_count(),
            built.database.aggregation_count(),
        );

        orchestrator.render(built)?;

        debug!(
            class_count = counts.0,
            aggregation_count = counts.1,
            "Model validated"
        );
        Ok(counts)
    }

    /// Handle the inspect command
    fn inspect_command(&self, input: PathBuf, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(Some(input))?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let built = Orchestrator::with_config(self.config.clone()).process_model(&content)?;
        println!("{}", Self::inspect_report(&built, json)?);
        Ok(())
    }

    /// Describe the built model as JSON or as an indented listing
    fn inspect_report(built: &BuiltModel, json: bool) -> Result<String> {
        let database = &built.database;

        if json {
            let report = InspectReport {
                classes: database.classes().collect(),
                aggregations: database.aggregations(),
            };
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let mut lines = vec![format!("Classes ({}):", database.class_count())];
        for class in database.classes() {
            let marker = if class.is_root { " (root)" } else { "" };
            lines.push(format!("  {}{}", class.name, marker));
            for attribute in &class.attributes {
                lines.push(format!("    {}: {}", attribute.name, attribute.type_name));
            }
            if !class.children.is_empty() {
                lines.push(format!("    children: {}", class.children.join(", ")));
            }
        }

        lines.push(format!("Aggregations ({}):", database.aggregation_count()));
        for edge in database.aggregations() {
            lines.push(format!(
                "  {} -> {} [{} / {}]",
                edge.source, edge.target, edge.source_multiplicity, edge.target_multiplicity
            ));
        }
        Ok(lines.join("\n"))
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(ModelError::from)
                .with_context(|| format!("Failed to read input file '{}'", path.display())),
            _ => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(ModelError::from)
                    .context("Failed to read standard input")?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .map_err(ModelError::from)
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
            _ => Self::write_stdout(content)
                .map_err(ModelError::from)
                .context("Failed to write standard output")?,
        }
        Ok(())
    }

    fn write_stdout(content: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.is_empty() && !content.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()
    }
}

/// One-line failure report: the full error chain, then the error category
/// when the failure came from the model pipeline
pub fn error_report(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ModelError>() {
        Some(model_error) => format!("Error: {:#} [{}]", error, model_error.category()),
        None => format!("Error: {:#}", error),
    }
}

impl Default for TreeformApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const BTS_MODEL: &str = r#"<Model>
        <Class name="BTS" isRoot="true"/>
        <Class name="Antenna"><Attribute name="height" type="Integer"/></Class>
        <Aggregation source="Antenna" target="BTS" sourceMultiplicity="1..10" targetMultiplicity="1"/>
    </Model>"#;

    #[test]
    fn test_cli_parsing_convert_command() {
        let args = vec![
            "treeform",
            "convert",
            "--input",
            "model.xml",
            "--config-output",
            "out.xml",
            "-r",
            "BTS",
            "--strict",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Convert {
                input,
                config_output,
                metadata_output,
                root_class,
                indent,
                strict,
            } => {
                assert_eq!(input.to_string_lossy(), "model.xml");
                assert_eq!(config_output.to_string_lossy(), "out.xml");
                assert_eq!(metadata_output.to_string_lossy(), "metadata.json"); // default
                assert_eq!(root_class.as_deref(), Some("BTS"));
                assert_eq!(indent, 4); // default
                assert!(strict);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_parsing_requires_input() {
        let args = vec!["treeform", "convert"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_validate_command() {
        let args = vec!["treeform", "validate", "-i", "-"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Validate { input, root_class, strict } => {
                assert_eq!(input.to_string_lossy(), "-");
                assert!(root_class.is_none());
                assert!(!strict);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let args = vec!["treeform", "inspect", "-i", "model.xml", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { json, .. } => assert!(json),
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parsing_log_defaults() {
        let cli = Cli::try_parse_from(vec!["treeform", "inspect", "-i", "m.xml"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_verbose_flag() {
        let args = vec!["treeform", "--verbose", "validate", "-i", "m.xml"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
    }

    #[test]
    fn test_build_config_keeps_app_root_when_flag_absent() {
        let app = TreeformApp::with_config(TransformConfig::new().with_root_class("BTS"));
        let config = app.build_config(None, 2, true);
        assert_eq!(config.root_class.as_deref(), Some("BTS"));
        assert_eq!(config.indent, 2);
        assert!(config.strict);

        let overridden = app.build_config(Some("Other".to_string()), 4, false);
        assert_eq!(overridden.root_class.as_deref(), Some("Other"));
    }

    #[test]
    fn test_read_input_from_file() {
        let app = TreeformApp::new();

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("model.xml");
        fs::write(&file_path, BTS_MODEL).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, BTS_MODEL);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = TreeformApp::new();
        let dir = tempdir().unwrap();
        let err = app.read_input(Some(dir.path().join("absent.xml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::Io { .. })
        ));
        assert!(error_report(&err).ends_with("[Io]"));
    }

    #[test]
    fn test_write_output_to_missing_directory() {
        let app = TreeformApp::new();
        let dir = tempdir().unwrap();
        let err = app
            .write_output(Some(dir.path().join("absent").join("config.xml")), "<A>\n</A>")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write output file"));
        assert_eq!(
            err.downcast_ref::<ModelError>().map(ModelError::category),
            Some("Io")
        );
    }

    #[test]
    fn test_error_report_names_category() {
        let err = TreeformApp::check_model(
            r#"<Model><Interface name="X"/></Model>"#,
            TransformConfig::default(),
        )
        .unwrap_err();
        let report = error_report(&err);
        assert!(report.starts_with("Error: Unrecognized entity"));
        assert!(report.ends_with("[UnrecognizedEntity]"));

        let plain = anyhow::anyhow!("something else");
        assert_eq!(error_report(&plain), "Error: something else");
    }

    #[test]
    fn test_write_output_to_file() {
        let app = TreeformApp::new();
        let output = "<BTS>\n</BTS>";

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.xml");

        app.write_output(Some(file_path.clone()), output).unwrap();

        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, output);
    }

    #[test]
    fn test_convert_command_writes_both_documents() {
        let app = TreeformApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("model.xml");
        let config_output = dir.path().join("config.xml");
        let metadata_output = dir.path().join("metadata.json");
        fs::write(&input, BTS_MODEL).unwrap();

        app.convert_command(
            input,
            config_output.clone(),
            metadata_output.clone(),
            TransformConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&config_output).unwrap(),
            "<BTS>\n    <Antenna>\n        <height>Integer</height>\n    </Antenna>\n</BTS>"
        );
        let metadata: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&metadata_output).unwrap()).unwrap();
        assert_eq!(metadata[1]["max"], "10");
    }

    #[test]
    fn test_convert_command_writes_nothing_on_error() {
        let app = TreeformApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("model.xml");
        let config_output = dir.path().join("config.xml");
        let metadata_output = dir.path().join("metadata.json");
        fs::write(&input, r#"<Model><Class name="A"/><Class name="B"/></Model>"#).unwrap();

        let result = app.convert_command(
            input,
            config_output.clone(),
            metadata_output.clone(),
            TransformConfig::default(),
            false,
        );

        assert!(result.is_err());
        assert!(!config_output.exists());
        assert!(!metadata_output.exists());
    }

    #[test]
    fn test_check_model_counts() {
        let counts = TreeformApp::check_model(BTS_MODEL, TransformConfig::default()).unwrap();
        assert_eq!(counts, (2, 1));
    }

    #[test]
    fn test_check_model_strict_orphan() {
        let input = r#"<Model><Class name="R" isRoot="true"/><Class name="Orphan"/></Model>"#;
        assert!(TreeformApp::check_model(input, TransformConfig::default()).is_ok());
        assert!(TreeformApp::check_model(input, TransformConfig::new().with_strict(true)).is_err());
    }

    #[test]
    fn test_inspect_report_json() {
        let built = treeform::build(BTS_MODEL, &TransformConfig::default()).unwrap();
        let report = TreeformApp::inspect_report(&built, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["classes"][0]["name"], "BTS");
        assert_eq!(value["classes"][0]["children"][0], "Antenna");
        assert_eq!(value["aggregations"][0]["sourceMultiplicity"], "1..10");
    }

    #[test]
    fn test_inspect_report_text() {
        let built = treeform::build(BTS_MODEL, &TransformConfig::default()).unwrap();
        let report = TreeformApp::inspect_report(&built, false).unwrap();

        assert!(report.starts_with("Classes (2):"));
        assert!(report.contains("  BTS (root)"));
        assert!(report.contains("    height: Integer"));
        assert!(report.contains("  Antenna -> BTS [1..10 / 1]"));
    }
}
