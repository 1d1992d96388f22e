use std::sync::Arc;

use proptest::prelude::*;

use cohort_nullables::{NullClock, NullTokenSource};
use cohort_types::{CohortParams, Identity, NewIdentity};
use cohort_verification::TokenIssuer;

fn identity() -> Identity {
    NewIdentity {
        email: "ann@example.com".into(),
        nickname: "ann".into(),
        password_hash: "hash".into(),
    }
    .into_identity()
}

proptest! {
    /// A presented string verifies iff it is byte-identical to the issued token.
    #[test]
    fn verify_is_exact_equality(issued in "[0-9a-zA-Z]{1,40}", presented in "[0-9a-zA-Z]{0,40}") {
        let issuer = TokenIssuer::new(
            Arc::new(NullClock::new(0)),
            Arc::new(NullTokenSource::scripted(vec![issued.clone()])),
            &CohortParams::default(),
        );
        let mut id = identity();
        issuer.issue(&mut id).unwrap();
        prop_assert!(issuer.verify(&id, &issued));
        prop_assert_eq!(issuer.verify(&id, &presented), presented == issued);
    }

    /// can_reissue flips exactly once the cool-down has strictly elapsed.
    #[test]
    fn can_reissue_after_cooldown(
        start in 0u64..1_000_000_000,
        cooldown in 1u64..10_000,
        wait in 0u64..20_000,
    ) {
        let clock = Arc::new(NullClock::new(start));
        let params = CohortParams {
            token_resend_cooldown_secs: cooldown,
            ..CohortParams::default()
        };
        let issuer = TokenIssuer::new(clock.clone(), Arc::new(NullTokenSource::new()), &params);
        let mut id = identity();
        issuer.issue(&mut id).unwrap();
        prop_assert!(!issuer.can_reissue(&id));

        clock.advance(wait);
        prop_assert_eq!(issuer.can_reissue(&id), wait > cooldown);
        prop_assert_eq!(issuer.retry_after(&id) == 0, wait > cooldown);
    }
}
