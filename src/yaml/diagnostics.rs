//! Diagnostics for hand-edited YAML files (reference catalog, config)

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {file}: {message}")]
#[diagnostic(code(pdk::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    file: String,

    message: String,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| line_col_to_offset(source, loc.line(), loc.column()))
            .unwrap_or(0);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: suggest(&message),
            file: filename.to_string(),
            message,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    #[diagnostic(code(pdk::yaml::io))]
    Io(#[from] std::io::Error),
}

/// Byte offset of a 1-based line/column pair, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("missing field `value`") {
        return Some("Every reference entry needs a `value:` (or `type:`) key".to_string());
    }
    if msg.contains("unknown variant") {
        return Some(
            "Check spelling: sections use kind family/fixed/list, drawers small/large/tall/medium"
                .to_string(),
        );
    }
    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs".to_string());
    }
    if msg.contains("found unexpected ':'") || msg.contains("mapping values are not allowed") {
        return Some("Quote values containing ':' such as \"LEDs 3mm: Red\"".to_string());
    }
    if msg.contains("did not find expected") {
        return Some("Check that brackets and quotes are closed".to_string());
    }

    None
}
