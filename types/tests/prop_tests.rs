use proptest::prelude::*;

use party_types::{Experience, MemberClass, Timestamp};

proptest! {
    /// A bonus never lowers the amount.
    #[test]
    fn bonus_never_decreases(points in 0u64..u64::MAX, bps in 0u32..50_000) {
        let base = Experience::new(points);
        prop_assert!(base.with_bonus_bps(bps) >= base);
    }

    /// The 10% bonus matches integer floor(points * 11 / 10).
    #[test]
    fn ten_percent_bonus_matches_floor(points in 0u64..1_000_000_000) {
        let boosted = Experience::new(points).with_bonus_bps(1000);
        prop_assert_eq!(boosted.points(), points * 11 / 10);
    }

    /// Elapsed time is never negative, even for timestamps in the future.
    #[test]
    fn elapsed_saturates(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let elapsed = Timestamp::new(a).elapsed_since(Timestamp::new(b));
        prop_assert_eq!(elapsed, b.saturating_sub(a));
    }

    /// Every class parses back from its display name.
    #[test]
    fn class_names_parse(idx in 0usize..MemberClass::ALL.len()) {
        let class = MemberClass::ALL[idx];
        prop_assert_eq!(class.to_string().parse::<MemberClass>().unwrap(), class);
    }
}
