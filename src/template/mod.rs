//! Variable substitution for text files
//!
//! Variables come from a `name = value` settings file; `#` starts a comment
//! and blank lines are ignored. Every `{{ name }}` occurrence in the input
//! (inner whitespace optional) is replaced with the value.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use tracing::warn;

/// Parse the variables file. Lines without `=` are skipped with a warning;
/// a later definition of the same name wins.
pub fn parse_variables(content: &str) -> Vec<(String, String)> {
    let mut variables: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            warn!("skipping invalid line: {line}");
            continue;
        };
        let name = name.trim().to_string();
        let value = value.trim().to_string();
        if let Some(existing) = variables.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            variables.push((name, value));
        }
    }
    variables
}

/// Replace every `{{ name }}` placeholder in `content`.
pub fn substitute(content: &str, variables: &[(String, String)]) -> Result<String> {
    let mut result = content.to_string();
    for (name, value) in variables {
        let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name));
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::Template(format!("bad placeholder pattern for {name}: {e}")))?;
        result = regex
            .replace_all(&result, regex::NoExpand(value.as_str()))
            .into_owned();
    }
    Ok(result)
}

/// Apply the variables file to the input file and write the result.
pub fn render_file(variables_path: &Path, input: &Path, output: &Path) -> Result<()> {
    let variables = parse_variables(&std::fs::read_to_string(variables_path).map_err(|e| {
        Error::Input(format!("{}: {}", variables_path.display(), e))
    })?);
    let content = std::fs::read_to_string(input)
        .map_err(|e| Error::Input(format!("{}: {}", input.display(), e)))?;
    let rendered = substitute(&content, &variables)?;
    std::fs::write(output, rendered)?;
    Ok(())
}
