//! Candidate blob classification.
//!
//! Decides, from the file name alone, what a candidate blob means to the
//! patcher. Pure; no I/O is performed here, which is what keeps skipped
//! names from ever being loaded.

/// The distinguished replacement blob name. Exact, case-sensitive match
/// only --- `DSDT.aml2` or `dsdt.aml` are not replacements.
const DSDT_NAME: &str = "DSDT.aml";

/// The extension marker for appendable tables. Matched by **substring**
/// containment anywhere in the name, not as a suffix: `foo.aml.bak` still
/// classifies as appendable. Kept loose for compatibility with existing
/// blob collections and pinned by a test.
const AML_MARKER: &str = ".aml";

/// What the patcher should do with a candidate blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Never load: hidden/disabled naming convention, or not a table blob.
    Skip,
    /// Substitute the DSDT references in the FADT with this blob.
    ReplaceDsdt,
    /// Append a pointer to this blob to the XSDT.
    Append,
}

/// Classify a candidate blob by name.
///
/// Names beginning with `.` or `_` are skipped (platform convention for
/// hidden or disabled files). The exact name `DSDT.aml` replaces the DSDT.
/// Any other name containing `.aml` is appended. Everything else is skipped.
#[must_use]
pub fn classify(name: &str) -> Classification {
    if name.starts_with('.') || name.starts_with('_') {
        return Classification::Skip;
    }
    if name == DSDT_NAME {
        return Classification::ReplaceDsdt;
    }
    if name.contains(AML_MARKER) {
        return Classification::Append;
    }
    Classification::Skip
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn hidden_and_disabled_names_are_skipped() {
        assert_eq!(classify(".hidden.aml"), Classification::Skip);
        assert_eq!(classify("_backup.aml"), Classification::Skip);
        assert_eq!(classify("."), Classification::Skip);
        assert_eq!(classify("_DSDT.aml"), Classification::Skip);
    }

    #[test]
    fn exact_dsdt_name_replaces() {
        assert_eq!(classify("DSDT.aml"), Classification::ReplaceDsdt);
        // Exact match only: prefixes, case variants, and extensions of the
        // name fall through to the appendable-substring rule.
        assert_eq!(classify("dsdt.aml"), Classification::Append);
        assert_eq!(classify("DSDT.aml2"), Classification::Append);
        assert_eq!(classify("DSDT.am"), Classification::Skip);
    }

    #[test]
    fn aml_names_are_appended() {
        assert_eq!(classify("SSDT1.aml"), Classification::Append);
        assert_eq!(classify("SSDT-10-CpuPm.aml"), Classification::Append);
    }

    #[test]
    fn aml_match_is_substring_not_suffix() {
        // The marker may appear anywhere in the name, not just as a suffix.
        assert_eq!(classify("foo.aml.bak"), Classification::Append);
    }

    #[test]
    fn other_names_are_skipped() {
        assert_eq!(classify("README.txt"), Classification::Skip);
        assert_eq!(classify("SSDT1.AML"), Classification::Skip);
        assert_eq!(classify(""), Classification::Skip);
    }
}
