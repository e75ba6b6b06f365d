//! Command-line arguments for the `preview-gate-app` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "preview-gate-app",
    version = crate::APP_VERSION,
    about = "Log in, preview a local file, and run it through image processing"
)]
pub struct CliArgs {
    /// Identifier typed into the gate
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,
    /// Secret typed into the gate
    #[arg(value_name = "SECRET")]
    pub secret: String,
    /// File to select, standing in for the browser file picker
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Declared media type; empty when omitted, as a picker reports for
    /// unrecognized files
    #[arg(value_name = "MEDIA_TYPE", default_value = "")]
    pub media_type: String,
    /// Print the final view as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

impl CliArgs {
    /// File name shown as the picked file's name.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing.

    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn parses_positionals_and_json_flag() {
        let parsed = CliArgs::try_parse_from([
            "preview-gate-app",
            "demo",
            "password",
            "/tmp/cat.png",
            "image/png",
            "--json",
        ])
        .expect("arguments should parse");
        assert_eq!(parsed.identifier, "demo");
        assert_eq!(parsed.media_type, "image/png");
        assert_eq!(parsed.file_name(), "cat.png");
        assert!(parsed.json);
    }

    #[test]
    fn media_type_defaults_to_empty() {
        let parsed = CliArgs::try_parse_from(["preview-gate-app", "demo", "password", "notes"])
            .expect("arguments should parse");
        assert_eq!(parsed.media_type, "");
        assert!(!parsed.json);
    }

    #[test]
    fn rejects_wrong_arity_and_unknown_flags() {
        assert!(CliArgs::try_parse_from(["preview-gate-app", "demo", "password"]).is_err());
        assert!(CliArgs::try_parse_from(["preview-gate-app", "a", "b", "c", "d", "e"]).is_err());
        let error = CliArgs::try_parse_from(["preview-gate-app", "a", "b", "c", "--verbose"])
            .expect_err("unknown flag should be rejected");
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_is_available() {
        let error = CliArgs::try_parse_from(["preview-gate-app", "--help"])
            .expect_err("help exits through the error path");
        assert_eq!(error.kind(), ErrorKind::DisplayHelp);
    }
}
