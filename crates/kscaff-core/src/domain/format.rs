//! Go source normalization applied to every rendered `.go` file.
//!
//! This is a small, line-oriented subset of `goimports`: the first
//! parenthesized import block is de-duplicated and regrouped into standard
//! library, third-party and project-local sections (each sorted by path),
//! trailing whitespace is stripped and runs of blank lines are collapsed.
//! Comment lines inside the import block (such as scaffold markers) are kept
//! at the end of the block so insertion keeps working; trailing comments stay
//! on their import.  Raw string literals are never touched.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected 'package' clause")]
    MissingPackageClause,

    #[error("import block opened on line {line} is never closed")]
    UnterminatedImportBlock { line: usize },

    #[error("malformed import on line {line}: {text}")]
    MalformedImport { line: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ImportSpec {
    path: String,
    alias: String,
    comment: String,
}

impl ImportSpec {
    fn render(&self) -> String {
        let mut line = if self.alias.is_empty() {
            format!("\t\"{}\"", self.path)
        } else {
            format!("\t{} \"{}\"", self.alias, self.path)
        };
        if !self.comment.is_empty() {
            line.push(' ');
            line.push_str(&self.comment);
        }
        line
    }
}

/// An output line; verbatim lines belong to a raw string literal.
type Line = (String, bool);

/// Normalize `source`, treating imports under `local_prefix` as project-local.
pub fn format_go_source(source: &str, local_prefix: &str) -> Result<String, FormatError> {
    let raw: Vec<&str> = source.lines().collect();
    let verbatim = raw_string_lines(&raw);
    let lines: Vec<&str> = raw
        .iter()
        .zip(&verbatim)
        .map(|(line, &keep)| if keep { *line } else { line.trim_end() })
        .collect();

    if !has_package_clause(&lines) {
        return Err(FormatError::MissingPackageClause);
    }

    let copy = |range: std::ops::Range<usize>| {
        range
            .map(|i| (lines[i].to_string(), verbatim[i]))
            .collect::<Vec<Line>>()
    };

    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    let import_start = (0..lines.len()).find(|&i| !verbatim[i] && lines[i].trim() == "import (");
    match import_start {
        Some(start) => {
            let end = lines[start + 1..]
                .iter()
                .position(|l| l.trim() == ")")
                .map(|offset| start + 1 + offset)
                .ok_or(FormatError::UnterminatedImportBlock { line: start + 1 })?;

            out.extend(copy(0..start));
            out.extend(
                format_import_block(&lines[start + 1..end], start + 2, local_prefix)?
                    .into_iter()
                    .map(|line| (line, false)),
            );
            out.extend(copy(end + 1..lines.len()));
        }
        None => out.extend(copy(0..lines.len())),
    }

    Ok(collapse_blank_lines(&out))
}

/// Flags every line that starts or ends inside a raw string literal.
fn raw_string_lines(lines: &[&str]) -> Vec<bool> {
    let mut in_raw = false;
    let mut in_block_comment = false;

    lines
        .iter()
        .map(|line| {
            let starts_inside = in_raw;
            let mut quote: Option<char> = None;
            let mut chars = line.chars().peekable();
            while let Some(c) = chars.next() {
                if in_raw {
                    if c == '`' {
                        in_raw = false;
                    }
                    continue;
                }
                if in_block_comment {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        in_block_comment = false;
                    }
                    continue;
                }
                if let Some(q) = quote {
                    if c == '\\' {
                        chars.next();
                    } else if c == q {
                        quote = None;
                    }
                    continue;
                }
                match c {
                    '`' => in_raw = true,
                    '"' | '\'' => quote = Some(c),
                    '/' if chars.peek() == Some(&'/') => break,
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        in_block_comment = true;
                    }
                    _ => {}
                }
            }
            starts_inside || in_raw
        })
        .collect()
}

fn has_package_clause(lines: &[&str]) -> bool {
    let mut in_block_comment = false;
    for line in lines {
        let line = line.trim();
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if line.starts_with("/*") {
            in_block_comment = !line.contains("*/");
            continue;
        }
        return line.starts_with("package ");
    }
    false
}

fn format_import_block(
    body: &[&str],
    first_line_number: usize,
    local_prefix: &str,
) -> Result<Vec<String>, FormatError> {
    let mut std_imports = BTreeSet::new();
    let mut third_party = BTreeSet::new();
    let mut local = BTreeSet::new();
    let mut comments = Vec::new();

    for (offset, raw) in body.iter().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        if text.starts_with("//") {
            comments.push(format!("\t{text}"));
            continue;
        }

        let spec = parse_import(text).ok_or_else(|| FormatError::MalformedImport {
            line: first_line_number + offset,
            text: text.to_string(),
        })?;

        let is_local = !local_prefix.is_empty()
            && (spec.path == local_prefix
                || spec.path.starts_with(&format!("{local_prefix}/")));
        let first_segment = spec.path.split('/').next().unwrap_or_default();

        if is_local {
            local.insert(spec);
        } else if first_segment.contains('.') {
            third_party.insert(spec);
        } else {
            std_imports.insert(spec);
        }
    }

    let mut block = vec!["import (".to_string()];
    for group in [std_imports, third_party, local] {
        if group.is_empty() {
            continue;
        }
        if block.len() > 1 {
            block.push(String::new());
        }
        block.extend(group.iter().map(ImportSpec::render));
    }
    block.extend(comments);
    block.push(")".to_string());
    Ok(block)
}

fn parse_import(text: &str) -> Option<ImportSpec> {
    let open = text.find('"')?;
    let close = open + 1 + text[open + 1..].find('"')?;
    if close == open + 1 {
        return None;
    }

    let comment = text[close + 1..].trim();
    if !comment.is_empty() && !comment.starts_with("//") && !comment.starts_with("/*") {
        return None;
    }

    let alias = text[..open].trim();
    if alias.contains(char::is_whitespace) {
        return None;
    }
    let path = &text[open + 1..close];
    if path.contains(char::is_whitespace) {
        return None;
    }

    Some(ImportSpec {
        path: path.to_string(),
        alias: alias.to_string(),
        comment: comment.to_string(),
    })
}

fn collapse_blank_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    let mut previous_blank = true;
    for (line, verbatim) in lines {
        if *verbatim {
            out.push_str(line);
            out.push('\n');
            previous_blank = false;
            continue;
        }
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = "example.com/m";

    #[test]
    fn groups_and_sorts_imports() {
        let source = "package main\n\nimport (\n\t\"os\"\n\tctrl \"sigs.k8s.io/controller-runtime\"\n\t\"example.com/m/controllers\"\n\t\"flag\"\n\tshipv1 \"example.com/m/api/v1\"\n\t// +kubebuilder:scaffold:imports\n)\n\nfunc main() {}\n";

        let formatted = format_go_source(source, LOCAL).unwrap();

        assert_eq!(
            formatted,
            "package main\n\nimport (\n\t\"flag\"\n\t\"os\"\n\n\tctrl \"sigs.k8s.io/controller-runtime\"\n\n\tshipv1 \"example.com/m/api/v1\"\n\t\"example.com/m/controllers\"\n\t// +kubebuilder:scaffold:imports\n)\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn removes_duplicate_imports() {
        let source = "package main\n\nimport (\n\t\"os\"\n\t\"os\"\n)\n";
        assert_eq!(
            format_go_source(source, LOCAL).unwrap(),
            "package main\n\nimport (\n\t\"os\"\n)\n"
        );
    }

    #[test]
    fn collapses_blank_lines_and_trailing_space() {
        let source = "\n\npackage v1   \n\n\n\ntype A struct{}\n\n\n";
        assert_eq!(
            format_go_source(source, LOCAL).unwrap(),
            "package v1\n\ntype A struct{}\n"
        );
    }

    #[test]
    fn skips_license_block_before_package() {
        let source = "/*\nCopyright 2026.\n*/\n\npackage v1\n";
        assert!(format_go_source(source, LOCAL).is_ok());
    }

    #[test]
    fn missing_package_is_an_error() {
        assert_eq!(
            format_go_source("/* header */\nfunc main() {}\n", LOCAL),
            Err(FormatError::MissingPackageClause)
        );
    }

    #[test]
    fn unterminated_import_block_is_an_error() {
        let err = format_go_source("package main\n\nimport (\n\t\"os\"\n", LOCAL).unwrap_err();
        assert_eq!(err, FormatError::UnterminatedImportBlock { line: 3 });
    }

    #[test]
    fn malformed_import_is_reported_with_line() {
        let err = format_go_source("package main\nimport (\n\tos\n)\n", LOCAL).unwrap_err();
        assert_eq!(
            err,
            FormatError::MalformedImport {
                line: 3,
                text: "os".into()
            }
        );
    }

    #[test]
    fn trailing_import_comment_is_kept() {
        let source = "package main\n\nimport (\n\t\"os\" // exit codes\n\t\"flag\"\n\t// +kubebuilder:scaffold:imports\n)\n";
        assert_eq!(
            format_go_source(source, LOCAL).unwrap(),
            "package main\n\nimport (\n\t\"flag\"\n\t\"os\" // exit codes\n\t// +kubebuilder:scaffold:imports\n)\n"
        );
    }

    #[test]
    fn text_after_import_path_is_malformed() {
        let err = format_go_source("package main\nimport (\n\t\"os\" extra\n)\n", LOCAL).unwrap_err();
        assert!(matches!(err, FormatError::MalformedImport { line: 3, .. }));
    }

    #[test]
    fn raw_strings_are_left_alone() {
        let source = "package main\n\nconst banner = `line one   \n\n\nline four`\n\n\nvar x = \"`\"\n\n\nfunc main() {}\n";
        assert_eq!(
            format_go_source(source, LOCAL).unwrap(),
            "package main\n\nconst banner = `line one   \n\n\nline four`\n\nvar x = \"`\"\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn backticks_in_comments_do_not_open_raw_strings() {
        let source = "package main\n\n// uses `go`\n\n\nfunc main() {}\n";
        assert_eq!(
            format_go_source(source, LOCAL).unwrap(),
            "package main\n\n// uses `go`\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn formatting_is_stable() {
        let source = "package main\n\nimport (\n\t\"b.io/x\"\n\t\"fmt\"\n)\n";
        let once = format_go_source(source, LOCAL).unwrap();
        assert_eq!(format_go_source(&once, LOCAL).unwrap(), once);
    }
}
