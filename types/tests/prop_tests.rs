use proptest::prelude::*;

use turing_types::{rank, RankingEntry, TokenAmount, U256};

proptest! {
    /// Any amount rendered for display parses back to the same base units.
    #[test]
    fn decimal_rendering_is_lossless(raw in any::<u128>()) {
        let amount = TokenAmount::from_base_units(U256::from(raw));
        let parsed = TokenAmount::parse_decimal(&amount.to_decimal_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Whole-token strings parse to whole * 10^18.
    #[test]
    fn whole_tokens_scale_by_decimals(whole in any::<u64>()) {
        let parsed = TokenAmount::parse_decimal(&whole.to_string()).unwrap();
        prop_assert_eq!(parsed, TokenAmount::from_tokens(whole));
    }

    /// Strings containing a non-digit (other than one dot) never parse.
    #[test]
    fn letters_never_parse(s in "[0-9]{0,4}[a-zA-Z_,-][0-9]{0,4}") {
        prop_assert!(TokenAmount::parse_decimal(&s).is_err());
    }

    /// Ranking is descending by balance, and equal balances keep input order.
    #[test]
    fn ranking_is_sorted_and_stable(balances in prop::collection::vec(0u64..5, 0..20)) {
        let entries: Vec<RankingEntry> = balances
            .iter()
            .enumerate()
            .map(|(i, b)| RankingEntry::new(format!("p{i:02}"), TokenAmount::from_tokens(*b)))
            .collect();

        let ranked = rank(entries.clone());
        prop_assert_eq!(ranked.len(), entries.len());

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].balance >= pair[1].balance);
            if pair[0].balance == pair[1].balance {
                prop_assert!(pair[0].name < pair[1].name);
            }
        }
    }
}
