//! Fluent translation lists (`.ftl`).
//!
//! Messages map to entries keyed by identifier; message attributes flatten to
//! `message.attribute` keys. Patterns are rendered back to their source-like
//! text, with select expressions reduced to their default variant. Terms are
//! runtime-only and skipped.

use std::{io::Write, path::Path};

use fluent_syntax::ast;

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "fluent"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ftl"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let resource = fluent_syntax::parser::parse(content).map_err(|(_, errors)| {
            Error::data_mismatch(format!(
                "invalid fluent resource: {}",
                errors
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string())
            ))
        })?;

        let mut entries = Vec::new();
        for item in &resource.body {
            let ast::Entry::Message(message) = item else {
                continue;
            };
            let comment = message
                .comment
                .as_ref()
                .map(|c| c.content.join("\n"))
                .filter(|c| !c.is_empty());

            if let Some(pattern) = &message.value {
                entries.push(LocalizationEntry {
                    key: message.id.name.to_string(),
                    value: Some(pattern_to_string(pattern)),
                    comment: comment.clone(),
                    source: None,
                });
            }
            for attribute in &message.attributes {
                entries.push(LocalizationEntry {
                    key: format!("{}.{}", message.id.name, attribute.id.name),
                    value: Some(pattern_to_string(&attribute.value)),
                    comment: None,
                    source: None,
                });
            }
        }

        Ok(LocalizationFile::new(
            path,
            culture_from_path(path),
            self.format_id(),
            entries,
        ))
    }

    fn write(
        &self,
        file: &LocalizationFile,
        writer: &mut dyn Write,
    ) -> Result<Vec<String>, Error> {
        let mut warnings = Vec::new();

        for (i, entry) in file.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n").map_err(Error::Io)?;
            }
            if let Some(comment) = &entry.comment {
                for line in comment.lines() {
                    writeln!(writer, "# {}", line).map_err(Error::Io)?;
                }
            }

            let key = sanitize_identifier(&entry.key);
            if key != entry.key {
                warnings.push(format!(
                    "key '{}' is not a valid fluent identifier, wrote '{}'",
                    entry.key, key
                ));
            }

            let value = entry.value_str();
            if value.is_empty() {
                // A bare `key =` would not parse back.
                warnings.push(format!(
                    "key '{}' has an empty value, wrote a quoted placeable",
                    entry.key
                ));
                writeln!(writer, "{} = {{ \"\" }}", key).map_err(Error::Io)?;
            } else if value.contains('\n') {
                writeln!(writer, "{} =", key).map_err(Error::Io)?;
                for line in value.lines() {
                    writeln!(writer, "    {}", line).map_err(Error::Io)?;
                }
            } else {
                writeln!(writer, "{} = {}", key, value).map_err(Error::Io)?;
            }
        }

        Ok(warnings)
    }
}

fn pattern_to_string(pattern: &ast::Pattern<&str>) -> String {
    let mut out = String::new();
    for element in &pattern.elements {
        match element {
            ast::PatternElement::TextElement { value } => out.push_str(value),
            ast::PatternElement::Placeable { expression } => {
                expression_to_string(expression, &mut out)
            }
        }
    }
    out
}

fn expression_to_string(expression: &ast::Expression<&str>, out: &mut String) {
    match expression {
        ast::Expression::Inline(inline) => inline_to_string(inline, out),
        ast::Expression::Select { variants, .. } => {
            // Reduce to the default variant's text.
            if let Some(variant) = variants
                .iter()
                .find(|v| v.default)
                .or_else(|| variants.first())
            {
                out.push_str(&pattern_to_string(&variant.value));
            }
        }
    }
}

fn inline_to_string(inline: &ast::InlineExpression<&str>, out: &mut String) {
    match inline {
        ast::InlineExpression::StringLiteral { value } => {
            out.push_str("{ \"");
            out.push_str(value);
            out.push_str("\" }");
        }
        ast::InlineExpression::NumberLiteral { value } => {
            out.push_str("{ ");
            out.push_str(value);
            out.push_str(" }");
        }
        ast::InlineExpression::VariableReference { id } => {
            out.push_str("{ $");
            out.push_str(id.name);
            out.push_str(" }");
        }
        ast::InlineExpression::MessageReference { id, attribute } => {
            out.push_str("{ ");
            out.push_str(id.name);
            if let Some(attribute) = attribute {
                out.push('.');
                out.push_str(attribute.name);
            }
            out.push_str(" }");
        }
        ast::InlineExpression::TermReference { id, .. } => {
            out.push_str("{ -");
            out.push_str(id.name);
            out.push_str(" }");
        }
        ast::InlineExpression::FunctionReference { id, .. } => {
            out.push_str("{ ");
            out.push_str(id.name);
            out.push_str("() }");
        }
        ast::InlineExpression::Placeable { expression } => {
            expression_to_string(expression, out)
        }
    }
}

/// Fluent identifiers are `[a-zA-Z][a-zA-Z0-9_-]*`. Attribute-style dotted
/// keys from other formats get their dots replaced so the file stays valid.
fn sanitize_identifier(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        let valid = if i == 0 {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '-'
        };
        out.push(if valid { c } else { '-' });
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        # Shown on startup
        greeting = Hello, { $name }!

        login-button = Sign in
            .tooltip = Click to sign in

        emails = { $count ->
            [one] One email
           *[other] { $count } emails
        }
    "};

    #[test]
    fn test_parse_messages_and_attributes() {
        let file = Handler.parse(SAMPLE, Path::new("app.en.ftl")).unwrap();
        assert_eq!(file.culture.as_deref(), Some("en"));

        let greeting = file.entry("greeting").unwrap();
        assert_eq!(greeting.value_str(), "Hello, { $name }!");
        assert_eq!(greeting.comment.as_deref(), Some("Shown on startup"));

        assert_eq!(file.entry("login-button").unwrap().value_str(), "Sign in");
        assert_eq!(
            file.entry("login-button.tooltip").unwrap().value_str(),
            "Click to sign in"
        );
    }

    #[test]
    fn test_select_reduces_to_default_variant() {
        let file = Handler.parse(SAMPLE, Path::new("x.ftl")).unwrap();
        assert_eq!(file.entry("emails").unwrap().value_str(), "{ $count } emails");
    }

    #[test]
    fn test_invalid_resource_is_rejected() {
        assert!(Handler.parse("= no identifier", Path::new("x.ftl")).is_err());
    }

    #[test]
    fn test_write_round_trip() {
        let file = Handler.parse(SAMPLE, Path::new("x.ftl")).unwrap();
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        // "login-button.tooltip" needs sanitizing on the way back out.
        assert_eq!(warnings.len(), 1);

        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("x.ftl"))
            .unwrap();
        assert_eq!(
            reparsed.entry("greeting").unwrap().value_str(),
            "Hello, { $name }!"
        );
        assert_eq!(
            reparsed.entry("login-button-tooltip").unwrap().value_str(),
            "Click to sign in"
        );
    }

    #[test]
    fn test_write_empty_value() {
        let file = LocalizationFile::new(
            "x.ftl",
            None,
            "fluent",
            vec![LocalizationEntry::new("empty", "")],
        );
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert_eq!(warnings.len(), 1);

        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("x.ftl"))
            .unwrap();
        assert!(reparsed.contains_key("empty"));
    }
}
