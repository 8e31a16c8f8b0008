// Terminal rendering for lint messages
//
// Layout per message: severity banner, message lines, optional standalone example,
// then `Location:` with numbered source lines (capped, with a dimmed ellipsis tail).

use super::messages::{CodeSnippet, SnippetPlacement};
use super::{LintingMessage, Severity};
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

const MAX_CODE_LINES: usize = 10;
const DEFAULT_WIDTH: usize = 80;

pub(super) fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

fn banner(severity: Severity, width: usize) -> ColoredString {
    let text = format!("[{}]", severity.label());
    let padded = format!("{:<width$}", text, width = width.max(text.len()));
    match severity {
        Severity::Error => padded.white().on_red().bold(),
        Severity::Warning => padded.black().on_yellow().bold(),
        Severity::Info => padded.white().on_blue().bold(),
    }
}

pub(super) fn render_message<W: Write>(
    out: &mut W,
    message: &LintingMessage,
    width: usize,
) -> io::Result<()> {
    writeln!(out, "{}", banner(message.severity, width))?;

    for line in message.text_lines() {
        writeln!(out, " {}", line)?;
    }

    let example = message.example();

    if let Some(example) = example {
        if !example.include_code_snippet {
            writeln!(out)?;
            writeln!(out, "{}", example.example_text.underline())?;
            write_code_lines(out, &format!("\n{}\n", example.content), 0, MAX_CODE_LINES)?;
            writeln!(out)?;
        }
    }

    if let Some(snippet) = &message.code_snippet {
        writeln!(out)?;
        writeln!(out, "{}", "Location:".underline())?;
        writeln!(out, "{}", snippet.location.dimmed())?;
        writeln!(out)?;

        let inline_example = example.filter(|e| e.can_include_code_snippet());

        if let Some(example) = inline_example {
            if example.placement == Some(SnippetPlacement::After) {
                write_example_as_comment(out, example)?;
            }
        }

        write_code_lines(out, &snippet.code, snippet.start_line, MAX_CODE_LINES)?;

        if let Some(example) = inline_example {
            if example.placement == Some(SnippetPlacement::Before) {
                writeln!(out)?;
                write_example_as_comment(out, example)?;
            }
        }

        writeln!(out)?;
    }

    Ok(())
}

/// Numbered source lines starting at `start_line` (0-based); returns lines written
fn write_code_lines<W: Write>(
    out: &mut W,
    code: &str,
    start_line: usize,
    max_lines: usize,
) -> io::Result<usize> {
    let lines: Vec<&str> = code.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if i >= max_lines {
            for j in 0..3 {
                let number = format!("{:>3}", start_line + i + j + 1);
                writeln!(
                    out,
                    "{} | {}",
                    number.dimmed(),
                    ".".repeat(3 - j).dimmed()
                )?;
            }
            return Ok(max_lines);
        }

        let number = format!("{:>3}", start_line + i + 1);
        writeln!(out, "{} | {}", number.dimmed(), line)?;
    }

    Ok(lines.len())
}

/// An example printed alongside real code, its heading rendered as a comment
fn write_example_as_comment<W: Write>(out: &mut W, example: &CodeSnippet) -> io::Result<()> {
    for line in example.example_text.split('\n') {
        writeln!(out, "    | {}", format!("// {}", line).dimmed().underline())?;
    }
    for line in example.content.split('\n') {
        writeln!(out, "    | {}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linting::messages::{state_getter, store};
    use crate::linting::SourceSnippet;

    fn render(message: &LintingMessage) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        render_message(&mut buffer, message, 40).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_banner_is_padded_to_width() {
        colored::control::set_override(false);
        let text = banner(Severity::Error, 20).to_string();
        assert_eq!(text, "[ERROR]             ");
        assert_eq!(text.len(), 20);
    }

    #[test]
    fn test_standalone_example_rendered_before_location() {
        let message = LintingMessage {
            severity: Severity::Error,
            parts: state_getter::must_be_getter(),
            span: None,
            code_snippet: Some(SourceSnippet {
                code: "state = {}".into(),
                start_line: 4,
                location: "/app/A.ts:5:3".into(),
            }),
        };

        let output = render(&message);
        let example_at = output.find("Example:").unwrap();
        let location_at = output.find("Location:").unwrap();
        assert!(example_at < location_at);
        assert!(output.contains(" The 'state' property must be a JS/TS getter."));
        assert!(output.contains("  5 | state = {}"));
        assert!(output.contains("/app/A.ts:5:3"));
    }

    #[test]
    fn test_included_example_follows_real_code() {
        let message = LintingMessage {
            severity: Severity::Error,
            parts: store::missing_export("UserStore"),
            span: None,
            code_snippet: Some(SourceSnippet {
                code: "class UserStore {}".into(),
                start_line: 0,
                location: "/app/UserStore.ts:1:1".into(),
            }),
        };

        let output = render(&message);
        let code_at = output.find("  1 | class UserStore {}").unwrap();
        let example_at = output.find("export const userStore = new UserStore();").unwrap();
        assert!(code_at < example_at);
        assert!(output.contains("// For example, add this to the end of your module:"));
        assert!(!output.contains("Example:"));
    }

    #[test]
    fn test_long_code_is_cut_off_with_ellipsis() {
        colored::control::set_override(false);
        let code: Vec<String> = (0..15).map(|i| format!("line{}", i)).collect();
        let mut buffer = Vec::new();
        let printed = write_code_lines(&mut buffer, &code.join("\n"), 0, MAX_CODE_LINES).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(printed, MAX_CODE_LINES);
        assert!(output.contains(" 10 | line9"));
        assert!(!output.contains("line10"));
        assert!(output.contains(" 11 | ..."));
        assert!(output.contains(" 13 | ."));
        assert_eq!(output.lines().count(), MAX_CODE_LINES + 3);
    }
}
