//! Miette diagnostics for configuration failures.

use std::path::Path;

use miette::{Diagnostic, Report, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError, Error};

/// A TOML syntax error, rendered against the file content.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(fleetline::config::syntax))]
pub struct ConfigSyntaxError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

/// A config value that parsed but is not acceptable.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(fleetline::config::invalid))]
pub struct ConfigInvalid {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

/// Turn a configuration failure into a rich report. Other errors yield `None`.
#[must_use]
pub fn config_report(path: &Path, err: &Error) -> Option<Report> {
    let Error::Config(config_err) = err else {
        return None;
    };

    let report = match config_err {
        ConfigError::Parse(parse) => {
            let src = std::fs::read_to_string(path).unwrap_or_default();
            let span = parse.span().unwrap_or(0..0);
            Report::new(ConfigSyntaxError {
                message: parse.message().to_string(),
                src,
                span: (span.start, span.end - span.start).into(),
                help: Some(format!("fix the syntax in {}", path.display())),
            })
        }
        ConfigError::ReadFile(io) => Report::new(ConfigInvalid {
            message: format!("cannot read {}: {io}", path.display()),
            help: Some("pass --config with the path to fleetline.toml".into()),
        }),
        other => Report::new(ConfigInvalid {
            message: other.to_string(),
            help: Some("run `fleetline config show` to see the effective values".into()),
        }),
    };
    Some(report)
}
