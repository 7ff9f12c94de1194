//! Composite identity shared by baseline and optimization records.
//!
//! The scheduling service computes the same key on its side when it returns
//! optimization results. Both derivations must agree byte for byte, otherwise
//! reconciliation silently finds no matches.

/// Literal placed between carrier and vessel name.
pub const MERGE_KEY_SEPARATOR: char = '_';

/// Whitespace as the service's regular expressions see it: Unicode
/// `White_Space` plus the ASCII information separators U+001C..=U+001F.
fn is_key_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Build the merge key for a carrier/vessel pair.
///
/// All whitespace is stripped from the vessel name; the carrier is kept as is.
/// Empty inputs still produce a key. Two calls under one carrier with the same
/// vessel name collide.
pub fn derive_merge_key(carrier: &str, vessel_name: &str) -> String {
    let mut key = String::with_capacity(carrier.len() + 1 + vessel_name.len());
    key.push_str(carrier);
    key.push(MERGE_KEY_SEPARATOR);
    key.extend(vessel_name.chars().filter(|c| !is_key_whitespace(*c)));
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_vessel_whitespace() {
        assert_eq!(derive_merge_key("COIS", "GLORY SHIP"), "COIS_GLORYSHIP");
        assert_eq!(derive_merge_key("HMM", " HMM \tALGECIRAS\n"), "HMM_HMMALGECIRAS");
    }

    #[test]
    fn test_keeps_carrier_whitespace() {
        assert_eq!(derive_merge_key("SM LINE", "SM BUSAN"), "SM LINE_SMBUSAN");
    }

    #[test]
    fn test_empty_inputs_are_degenerate_but_stable() {
        assert_eq!(derive_merge_key("", ""), "_");
        assert_eq!(derive_merge_key("COIS", ""), "COIS_");
        assert_eq!(derive_merge_key("", "GLORY"), "_GLORY");
    }

    #[test]
    fn test_unicode_whitespace_is_removed() {
        // U+3000 ideographic space
        assert_eq!(derive_merge_key("흥아", "흥아\u{3000}부산"), "흥아_흥아부산");
    }

    #[test]
    fn test_information_separators_are_removed() {
        assert_eq!(
            derive_merge_key("COIS", "GLORY\u{1c}SHIP\u{1f}"),
            "COIS_GLORYSHIP"
        );
        assert_eq!(derive_merge_key("COIS", "A\u{1b}B"), "COIS_A\u{1b}B");
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(carrier in ".*", vessel in ".*") {
            prop_assert_eq!(derive_merge_key(&carrier, &vessel), derive_merge_key(&carrier, &vessel));
        }

        #[test]
        fn prop_vessel_part_has_no_whitespace(carrier in "[A-Z ]{0,8}", vessel in "[A-Z \t]{0,16}") {
            let key = derive_merge_key(&carrier, &vessel);
            let vessel_part = &key[carrier.len() + 1..];
            let prefix = format!("{}_", carrier);
            prop_assert!(!vessel_part.chars().any(char::is_whitespace));
            prop_assert!(key.starts_with(&prefix));
        }

        #[test]
        fn prop_vessel_spacing_does_not_matter(carrier in "[A-Z]{1,6}", words in prop::collection::vec("[A-Z]{1,6}", 1..4)) {
            let spaced = words.join(" ");
            let packed = words.concat();
            prop_assert_eq!(derive_merge_key(&carrier, &spaced), derive_merge_key(&carrier, &packed));
        }
    }
}
