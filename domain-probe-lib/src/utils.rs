//! Input validation and name classification.
//!
//! Everything here is pure: no lookups happen until a line of input has been
//! turned into a [`QueryTarget`].

use crate::error::ProbeError;
use crate::types::Classification;

/// What the read loop should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// A name that passed validation and is ready for lookup.
    Lookup(QueryTarget),
    /// The user asked to leave (`exit`, any case).
    Exit,
}

/// A validated name for one workflow iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
    raw: String,
    name: String,
}

impl QueryTarget {
    /// Input exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed name used for lookups.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of `.`-separated labels, empty labels included.
    pub fn label_count(&self) -> usize {
        label_count(&self.name)
    }

    pub fn classification(&self) -> Classification {
        classify(&self.name)
    }
}

/// Parse one line of user input.
///
/// # Errors
///
/// Returns `ProbeError::InvalidDomain` when the line is empty or whitespace,
/// or when it has no `.` (missing TLD).
pub fn parse_input(line: &str) -> Result<InputCommand, ProbeError> {
    let name = line.trim();

    if name.is_empty() {
        return Err(ProbeError::invalid_domain(
            name,
            "You did not enter a valid domain name.",
        ));
    }

    if name.eq_ignore_ascii_case("exit") {
        return Ok(InputCommand::Exit);
    }

    if !name.contains('.') {
        return Err(ProbeError::invalid_domain(
            name,
            "Missing domain extension (e.g. .com). Please enter a full domain name.",
        ));
    }

    Ok(InputCommand::Lookup(QueryTarget {
        raw: line.to_string(),
        name: name.to_string(),
    }))
}

/// Count `.`-separated labels. `"a..b"` has three labels.
pub fn label_count(name: &str) -> usize {
    name.split('.').count()
}

/// Classify a name by label count alone.
///
/// More than two labels is a subdomain, anything else is treated as a
/// registrable domain. This is not public-suffix aware: `example.co.uk`
/// comes back as `Subdomain`.
pub fn classify(name: &str) -> Classification {
    if label_count(name) > 2 {
        Classification::Subdomain
    } else {
        Classification::RegistrableDomain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_label_count() {
        assert_eq!(classify("example.com"), Classification::RegistrableDomain);
        assert_eq!(classify("www.example.com"), Classification::Subdomain);
        assert_eq!(classify("a.b.c.d.example.org"), Classification::Subdomain);
        assert_eq!(classify("localhost."), Classification::RegistrableDomain);
    }

    #[test]
    fn test_classify_multi_label_suffix_limitation() {
        // Known limitation: public suffixes with two labels look like subdomains.
        assert_eq!(classify("example.co.uk"), Classification::Subdomain);
    }

    #[test]
    fn test_label_count_keeps_empty_labels() {
        assert_eq!(label_count("example.com"), 2);
        assert_eq!(label_count("a..b"), 3);
        assert_eq!(label_count(".com"), 2);
    }

    #[test]
    fn test_parse_input_rejections() {
        assert!(matches!(
            parse_input(""),
            Err(ProbeError::InvalidDomain { .. })
        ));
        assert!(matches!(
            parse_input("   \t"),
            Err(ProbeError::InvalidDomain { .. })
        ));

        match parse_input("example") {
            Err(ProbeError::InvalidDomain { reason, .. }) => {
                assert!(reason.contains("Missing domain extension"))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_input_exit_any_case() {
        assert_eq!(parse_input("exit").unwrap(), InputCommand::Exit);
        assert_eq!(parse_input("EXIT").unwrap(), InputCommand::Exit);
        assert_eq!(parse_input("  ExIt \n").unwrap(), InputCommand::Exit);
    }

    #[test]
    fn test_parse_input_trims_target() {
        let InputCommand::Lookup(target) = parse_input("  www.example.com\n").unwrap() else {
            panic!("expected a lookup");
        };
        assert_eq!(target.raw(), "  www.example.com\n");
        assert_eq!(target.name(), "www.example.com");
        assert_eq!(target.label_count(), 3);
        assert_eq!(target.classification(), Classification::Subdomain);
    }
}
