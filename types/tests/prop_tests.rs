use proptest::prelude::*;

use cohort_types::{GroupPath, Timestamp, VerificationToken};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(base + offset)), offset);
        prop_assert_eq!(Timestamp::new(base + offset).elapsed_since(t), 0);
    }

    /// is_older_than agrees with strict "more than window" arithmetic.
    #[test]
    fn older_than_is_strict(
        base in 0u64..1_000_000,
        window in 0u64..10_000,
        offset in 0u64..20_000,
    ) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.is_older_than(window, now), offset > window);
    }

    /// remaining_in_window is zero exactly when the window has passed, and
    /// advancing by the remainder always clears the window.
    #[test]
    fn remaining_in_window_clears_window(
        base in 0u64..1_000_000,
        window in 0u64..10_000,
        offset in 0u64..20_000,
    ) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        let remaining = t.remaining_in_window(window, now);
        prop_assert_eq!(remaining == 0, t.is_older_than(window, now));
        prop_assert!(t.is_older_than(window, Timestamp::new(now.as_secs() + remaining)));
    }

    /// Any string built only from allowed characters with a valid length parses.
    #[test]
    fn generated_paths_are_valid(raw in "[a-z0-9_-]{2,20}") {
        prop_assert!(GroupPath::parse(raw.clone()).is_some());
        let parsed = GroupPath::parse(raw.clone()).unwrap();
        prop_assert_eq!(parsed.as_str(), raw.as_str());
    }

    /// Paths containing an uppercase letter never parse.
    #[test]
    fn uppercase_paths_are_rejected(
        prefix in "[a-z]{1,9}",
        upper in "[A-Z]",
        suffix in "[a-z]{0,9}",
    ) {
        let raw = format!("{prefix}{upper}{suffix}");
        prop_assert!(GroupPath::parse(raw).is_none());
    }

    /// A token only matches its exact text.
    #[test]
    fn token_matches_only_itself(a in "[0-9a-f]{32}", b in "[0-9a-zA-Z]{0,40}") {
        let token = VerificationToken::new(a.clone());
        prop_assert!(token.matches(&a));
        prop_assert_eq!(token.matches(&b), a == b);
    }
}
