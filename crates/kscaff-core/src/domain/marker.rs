//! Scaffold markers and the line-oriented fragment insertion built on them.
//!
//! A marker is a comment line such as `// +kubebuilder:scaffold:imports`
//! left in generated files. Later runs find the line again and splice new
//! code immediately above it, so the marker always stays last in its region.

use std::{collections::BTreeMap, fmt};

const MARKER_NAMESPACE: &str = "+kubebuilder:scaffold:";

/// Insertion point identified by comment syntax and a logical name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker {
    comment: &'static str,
    name: String,
}

impl Marker {
    /// Marker for a file, choosing the comment prefix from its extension.
    pub fn for_path(path: &str, name: impl Into<String>) -> Self {
        let comment = if path.ends_with(".go") { "//" } else { "#" };
        Self {
            comment,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.comment, MARKER_NAMESPACE, self.name)
    }
}

/// Fragments to insert, keyed by the marker they go above.
pub type CodeFragmentsMap = BTreeMap<Marker, Vec<String>>;

/// Insert each marker's fragments directly before every line matching it.
///
/// Fragment lines are indented with the marker line's leading whitespace;
/// blank fragment lines stay blank. Markers absent from `content` are ignored.
pub fn insert_fragments(content: &str, fragments: &CodeFragmentsMap) -> String {
    let rendered: Vec<(String, &Vec<String>)> = fragments
        .iter()
        .filter(|(_, code)| !code.is_empty())
        .map(|(marker, code)| (marker.to_string(), code))
        .collect();

    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some((_, code)) = rendered.iter().find(|(marker, _)| marker == trimmed) {
            let indent = &line[..line.len() - line.trim_start().len()];
            for fragment in code.iter() {
                for fragment_line in fragment.lines() {
                    if fragment_line.trim().is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(indent);
                        out.push_str(fragment_line);
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str(line);
    }
    out
}

/// Drop fragments whose code is already present in `content`.
///
/// Lines are compared trimmed and blank lines are ignored, so a multi-line
/// fragment only counts as present when all its lines appear contiguously.
/// Duplicates within one marker's list are collapsed to the first entry.
pub fn filter_existing(content: &str, fragments: CodeFragmentsMap) -> CodeFragmentsMap {
    let existing: Vec<&str> = significant_lines(content).collect();

    fragments
        .into_iter()
        .map(|(marker, code)| {
            let mut kept: Vec<String> = Vec::with_capacity(code.len());
            for fragment in code {
                let needle: Vec<&str> = significant_lines(&fragment).collect();
                let present = needle.is_empty()
                    || existing.windows(needle.len()).any(|window| window == needle.as_slice());
                let repeated = kept.iter().any(|k| k.trim() == fragment.trim());
                if !present && !repeated {
                    kept.push(fragment);
                }
            }
            (marker, kept)
        })
        .filter(|(_, code)| !code.is_empty())
        .collect()
}

fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(marker: &Marker, code: &[&str]) -> CodeFragmentsMap {
        let mut map = CodeFragmentsMap::new();
        map.insert(marker.clone(), code.iter().map(|c| c.to_string()).collect());
        map
    }

    #[test]
    fn comment_prefix_follows_extension() {
        assert_eq!(
            Marker::for_path("main.go", "imports").to_string(),
            "// +kubebuilder:scaffold:imports"
        );
        assert_eq!(
            Marker::for_path("config/crd/kustomization.yaml", "crdkustomizeresource").to_string(),
            "# +kubebuilder:scaffold:crdkustomizeresource"
        );
    }

    #[test]
    fn markers_compare_structurally() {
        assert_eq!(
            Marker::for_path("a.go", "scheme"),
            Marker::for_path("b/c.go", "scheme")
        );
        assert_ne!(
            Marker::for_path("a.go", "scheme"),
            Marker::for_path("a.yaml", "scheme")
        );
    }

    #[test]
    fn fragments_land_before_marker_in_order() {
        let marker = Marker::for_path("kustomization.yaml", "bases");
        let original = format!("{marker}\n");

        let out = insert_fragments(&original, &fragments(&marker, &["- ../crd\n", "- ../rbac"]));

        assert_eq!(out, format!("- ../crd\n- ../rbac\n{original}"));
        assert_eq!(out.matches(&marker.to_string()).count(), 1);
    }

    #[test]
    fn fragments_take_marker_indentation() {
        let marker = Marker::for_path("main.go", "scheme");
        let original = format!("func init() {{\n\t{marker}\n}}\n");
        let code = "if err != nil {\n\treturn\n}\n";

        let out = insert_fragments(&original, &fragments(&marker, &[code]));

        assert_eq!(
            out,
            format!("func init() {{\n\tif err != nil {{\n\t\treturn\n\t}}\n\t{marker}\n}}\n")
        );
    }

    #[test]
    fn absent_marker_leaves_content_untouched() {
        let marker = Marker::for_path("main.go", "builder");
        let original = "package main\n";
        assert_eq!(insert_fragments(original, &fragments(&marker, &["x\n"])), original);
    }

    #[test]
    fn markers_are_independent() {
        let imports = Marker::for_path("main.go", "imports");
        let scheme = Marker::for_path("main.go", "scheme");
        let original = format!("import (\n\t{imports}\n)\n\nfunc init() {{\n\t{scheme}\n}}\n");

        let mut map = fragments(&imports, &["\"a\"\n"]);
        map.insert(scheme.clone(), vec!["b()\n".into()]);

        let out = insert_fragments(&original, &map);
        assert_eq!(
            out,
            format!("import (\n\t\"a\"\n\t{imports}\n)\n\nfunc init() {{\n\tb()\n\t{scheme}\n}}\n")
        );
    }

    #[test]
    fn existing_fragments_are_filtered() {
        let marker = Marker::for_path("main.go", "imports");
        let content = format!("\tshipv1 \"example.com/m/api/v1\"\n\t{marker}\n");

        let filtered = filter_existing(
            &content,
            fragments(
                &marker,
                &[
                    "shipv1 \"example.com/m/api/v1\"\n",
                    "\"example.com/m/controllers\"\n",
                    "\"example.com/m/controllers\"\n",
                ],
            ),
        );

        assert_eq!(
            filtered.get(&marker).unwrap(),
            &vec!["\"example.com/m/controllers\"\n".to_string()]
        );
    }

    #[test]
    fn multiline_fragment_must_match_contiguously() {
        let marker = Marker::for_path("main.go", "builder");
        let block = "if err = setup(); err != nil {\n\tos.Exit(1)\n}\n";
        let content = format!("if err = setup(); err != nil {{\n\tpanic(1)\n}}\n{marker}\n");

        let filtered = filter_existing(&content, fragments(&marker, &[block]));
        assert_eq!(filtered.get(&marker).map(Vec::len), Some(1));

        let content = format!("{block}{marker}\n");
        let filtered = filter_existing(&content, fragments(&marker, &[block]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn reinsertion_after_filter_is_idempotent() {
        let marker = Marker::for_path("kustomization.yaml", "bases");
        let map = fragments(&marker, &["- ../crd\n"]);
        let once = insert_fragments(&format!("{marker}\n"), &map);

        let twice = insert_fragments(&once, &filter_existing(&once, map));
        assert_eq!(once, twice);
    }
}
