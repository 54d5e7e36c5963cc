//! Search-term canonicalization for accent- and plural-tolerant matching.
//!
//! Catalog text is Spanish and inconsistently accented on both sides (user
//! input and stored rows), so a single substring test is not enough: every
//! term expands to the spellings it is known to appear under.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Known garment stems and the alternate spellings each one expands to.
/// Stems are matched against the normalized (unaccented, lowercased) input.
const VARIANT_TABLE: &[(&str, &[&str])] = &[
    ("pantalon", &["pantalon", "pantalón", "pantalones"]),
    ("camiseta", &["camiseta", "camisetas"]),
    ("zapato", &["zapato", "zapatos"]),
    ("blusa", &["blusa", "blusas"]),
    ("vestido", &["vestido", "vestidos"]),
    ("chaqueta", &["chaqueta", "chaquetas"]),
    ("falda", &["falda", "faldas"]),
    ("sudader", &["sudadera", "sudaderas"]),
    ("accesorio", &["accesorio", "accesorios"]),
];

/// Canonical form: NFD decompose, drop combining marks, lowercase, trim.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// The normalized form plus its dictionary expansion, deduplicated in
/// insertion order. Accented alternates are kept because stored rows may
/// carry them even though the normalized input never does.
pub fn variants(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut out = vec![normalized.clone()];

    for (stem, alternates) in VARIANT_TABLE {
        if normalized.contains(stem) {
            for alt in *alternates {
                if !out.iter().any(|v| v == alt) {
                    out.push((*alt).to_string());
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize("  Pantalón "), "pantalon");
        assert_eq!(normalize("CAMISETA Ñoña"), "camiseta nona");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["Pantalón", "camisetas AZULES", "  üñî  ", ""] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn variants_cover_accented_and_plural_forms() {
        let v = variants("pantalón");
        assert!(v.contains(&"pantalon".to_string()));
        assert!(v.contains(&"pantalón".to_string()));
        assert!(v.contains(&"pantalones".to_string()));
    }

    #[test]
    fn variants_expand_on_substring_stems() {
        // "sudader" stem matches both singular and plural inputs.
        let v = variants("Sudaderas");
        assert!(v.contains(&"sudadera".to_string()));
        assert!(v.contains(&"sudaderas".to_string()));
    }

    #[test]
    fn unknown_terms_pass_through_unexpanded() {
        assert_eq!(variants("gorra"), vec!["gorra".to_string()]);
    }

    #[test]
    fn empty_input_yields_single_empty_variant() {
        assert_eq!(variants(""), vec![String::new()]);
    }

    #[test]
    fn variants_are_deduplicated() {
        let v = variants("camiseta");
        let unique: std::collections::HashSet<_> = v.iter().collect();
        assert_eq!(unique.len(), v.len());
    }
}
