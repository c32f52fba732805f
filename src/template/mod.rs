use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::filesystem::{self, FilesystemError, WriteOptions};

/// Lines containing this marker are dropped by [`render_lenient`].
pub const REMOVE_LINE_MARKER: &str = "!remove_line!";

/// Errors produced while rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template names a placeholder the context does not define.
    #[error("No value for placeholder `{0}`")]
    MissingPlaceholder(String),
    /// The template has brace syntax that is not a placeholder or an escaped brace.
    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

#[derive(Clone, Copy)]
enum OnMissing {
    Fail,
    Keep,
}

/// Substitutes every `{name}` in `template` with its value from `context`.
///
/// `{{` and `}}` produce literal braces. Keys in `context` that the template
/// never mentions are ignored.
///
/// # Errors
///
/// * `MissingPlaceholder` if a placeholder has no value in `context`.
/// * `Malformed` for empty placeholders, unmatched braces or a `{` inside a placeholder.
pub fn render(template: &str, context: &HashMap<String, String>) -> Result<String, TemplateError> {
    substitute(template, context, OnMissing::Fail)
}

/// Renders a template the forgiving way used for listing pages.
///
/// Unknown placeholders are left in the output untouched, and every line that
/// contains [`REMOVE_LINE_MARKER`] after substitution is dropped. Lines are
/// rejoined with `\n`, without a trailing newline.
///
/// # Errors
///
/// Returns `Malformed` for broken brace syntax; missing keys are never an error.
pub fn render_lenient(template: &str, context: &HashMap<String, String>) -> Result<String, TemplateError> {
    let rendered = substitute(template, context, OnMissing::Keep)?;
    Ok(rendered
        .lines()
        .filter(|line| !line.contains(REMOVE_LINE_MARKER))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Reads `template_path`, renders it with [`render`] and writes the result to `output_path`.
///
/// The output is only touched once rendering has succeeded, and an existing file is replaced.
///
/// # Errors
///
/// Returns an error if either file cannot be accessed or if rendering fails.
pub fn render_template_file<P: AsRef<Path>, Q: AsRef<Path>>(
    template_path: P,
    output_path: Q,
    context: &HashMap<String, String>,
) -> Result<(), TemplateError> {
    let template_path = filesystem::resolve(template_path)?;
    let output_path = filesystem::resolve(output_path)?;

    let template = filesystem::read_file(&template_path)?;
    let rendered = render(&template, context)?;
    filesystem::write_file(&output_path, &rendered, WriteOptions::default())?;

    tracing::debug!(
        template = %template_path.display(),
        output = %output_path.display(),
        "rendered template"
    );
    Ok(())
}

fn substitute(
    template: &str,
    context: &HashMap<String, String>,
    on_missing: OnMissing,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }

                let end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some((_, '{')) => {
                            return Err(TemplateError::Malformed {
                                position: pos,
                                reason: "'{' inside a placeholder",
                            });
                        }
                        Some(_) => {}
                        None => {
                            return Err(TemplateError::Malformed {
                                position: pos,
                                reason: "unmatched '{'",
                            });
                        }
                    }
                };

                let name = &template[pos + 1..end];
                if name.is_empty() {
                    return Err(TemplateError::Malformed {
                        position: pos,
                        reason: "empty placeholder",
                    });
                }

                let value = match (context.get(name), on_missing) {
                    (Some(value), _) => value.as_str(),
                    (None, OnMissing::Keep) => &template[pos..=end],
                    (None, OnMissing::Fail) => {
                        return Err(TemplateError::MissingPlaceholder(name.to_string()));
                    }
                };
                out.push_str(value);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TemplateError::Malformed {
                        position: pos,
                        reason: "single '}' outside a placeholder",
                    });
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
