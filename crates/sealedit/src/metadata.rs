//! Metadata extraction from YAML buffers
//!
//! Scrapes `namespace:` and `name:` out of the `metadata:` block of the
//! active buffer so the user does not have to retype values that are
//! already on screen. This is a line-anchored heuristic, not a YAML
//! parser: a line starting with an alphabetic character is taken as the
//! end of the block, indentation depth is not compared.

use regex::Regex;

/// Namespace and secret name identifying a sealed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub namespace: String,
    pub name: String,
}

/// Extract `(namespace, name)` from buffer text.
///
/// Returns `Some` only when both fields were found inside a `metadata:`
/// block. Last match wins; uniqueness is not enforced.
pub fn extract(text: &str) -> Option<Metadata> {
    let block_start = Regex::new(r"^\s*metadata:\s*$").unwrap();
    let namespace_re = Regex::new(r"^\s*namespace:\s*(\S+)").unwrap();
    let name_re = Regex::new(r"^\s*name:\s*(\S+)").unwrap();

    let mut namespace: Option<String> = None;
    let mut name: Option<String> = None;
    let mut in_metadata = false;

    for line in text.lines() {
        if block_start.is_match(line) {
            in_metadata = true;
            continue;
        }

        // A new top-level key (no leading whitespace) ends the block
        if in_metadata && line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            in_metadata = false;
        }

        if in_metadata {
            if let Some(caps) = namespace_re.captures(line) {
                namespace = Some(caps[1].to_string());
            }
            if let Some(caps) = name_re.captures(line) {
                name = Some(caps[1].to_string());
            }
        }
    }

    match (namespace, name) {
        (Some(namespace), Some(name)) => Some(Metadata { namespace, name }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_both_fields() {
        let text = "\
apiVersion: v1
kind: Secret
metadata:
  name: mysecret
  namespace: production
type: Opaque
";
        let meta = extract(text).unwrap();
        assert_eq!(meta.namespace, "production");
        assert_eq!(meta.name, "mysecret");
    }

    #[test]
    fn test_no_metadata_block() {
        let text = "just: some\nother: yaml\n";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_missing_namespace() {
        let text = "metadata:\n  name: mysecret\n";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_top_level_key_ends_block() {
        // name/namespace after the block ends must not be picked up
        let text = "\
metadata:
  name: mysecret
spec:
  namespace: wrong
";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_last_match_wins() {
        let text = "\
metadata:
  name: first
  name: second
  namespace: ns
";
        let meta = extract(text).unwrap();
        assert_eq!(meta.name, "second");
    }

    #[test]
    fn test_indented_metadata_block() {
        let text = "\
template:
  metadata:
    name: nested
    namespace: default
";
        let meta = extract(text).unwrap();
        assert_eq!(meta.namespace, "default");
        assert_eq!(meta.name, "nested");
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_value_required_after_key() {
        // Bare "namespace:" with no value captures nothing
        let text = "metadata:\n  namespace:\n  name: x\n";
        assert_eq!(extract(text), None);
    }
}
