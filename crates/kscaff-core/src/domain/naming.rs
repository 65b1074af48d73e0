//! String helpers used by resources and exposed to templates.

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("person", "people"),
    ("quiz", "quizzes"),
];

const UNCOUNTABLE: &[&str] = &["data", "equipment", "information", "metadata", "series", "species"];

/// Lower-case every character.
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

/// Upper-case the first letter of every word, leaving the rest untouched.
///
/// Word boundaries are any character that is not alphanumeric or `_`, so
/// `"my-app"` becomes `"My-App"` and `"firstMate"` becomes `"FirstMate"`.
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for c in s.chars() {
        if at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// Strip characters that are not allowed in a Go package identifier.
pub fn safe_import(s: &str) -> String {
    s.chars().filter(|c| *c != '-' && *c != '.').collect()
}

/// English plural of a lower-cased kind, e.g. `frigate` -> `frigates`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR_PLURALS {
        if let Some(stem) = word.strip_suffix(singular) {
            return format!("{stem}{plural}");
        }
    }

    let sibilant = ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix));
    if sibilant {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before_y = stem.chars().last();
        if before_y.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }

    format!("{word}s")
}

/// 32-bit FNV-1a digest rendered as lowercase hex.
///
/// Used to derive a stable leader-election ID from the repository path.
pub fn fnv32a(s: &str) -> String {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let digest = s.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    });
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_follows_word_boundaries() {
        assert_eq!(title("frigate"), "Frigate");
        assert_eq!(title("firstMate"), "FirstMate");
        assert_eq!(title("my-app name"), "My-App Name");
        assert_eq!(title("snake_case"), "Snake_case");
    }

    #[test]
    fn safe_import_strips_separators() {
        assert_eq!(safe_import("crew.example-io"), "crewexampleio");
        assert_eq!(safe_import("shipv1beta1"), "shipv1beta1");
    }

    #[test]
    fn pluralize_regular_and_irregular() {
        assert_eq!(pluralize("frigate"), "frigates");
        assert_eq!(pluralize("firstmate"), "firstmates");
        assert_eq!(pluralize("policy"), "policies");
        assert_eq!(pluralize("gateway"), "gateways");
        assert_eq!(pluralize("ingress"), "ingresses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("metadata"), "metadata");
    }

    #[test]
    fn fnv32a_matches_reference_vectors() {
        assert_eq!(fnv32a(""), "811c9dc5");
        assert_eq!(fnv32a("a"), "e40c292c");
        assert_eq!(fnv32a("foobar"), "bf9cf968");
    }
}
