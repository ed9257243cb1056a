//! Property tests for the parser gate.

use proptest::prelude::*;

use labelgate::gate;
use labelgate::{
    Category, CategorySet, MlsLevel, MlsRange, SecurityContext, SelinuxRole, SelinuxType,
    SelinuxUser, SensitivityLevel,
};

fn arb_stem() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,24}"
}

fn arb_categories() -> impl Strategy<Value = CategorySet> {
    proptest::collection::vec(0u32..1024, 0..48).prop_map(|ids| {
        ids.into_iter()
            .map(|id| Category::new(id).expect("id below 1024"))
            .collect()
    })
}

fn arb_level() -> impl Strategy<Value = MlsLevel> {
    (0u32..=15, arb_categories()).prop_map(|(rank, cats)| {
        MlsLevel::new(SensitivityLevel::new(rank).expect("rank below 16"), cats)
    })
}

fn arb_context() -> impl Strategy<Value = SecurityContext> {
    (
        arb_stem(),
        arb_stem(),
        arb_stem(),
        arb_level(),
        proptest::option::of(arb_level()),
    )
        .prop_map(|(user, role, kind, low, widen)| {
            let range = match widen {
                Some(other) => {
                    let high = low.lub(&other);
                    MlsRange::new(low, high).expect("lub dominates low")
                }
                None => MlsRange::single(low),
            };
            SecurityContext::with_range(
                SelinuxUser::new(&format!("{user}_u")).expect("valid user"),
                SelinuxRole::new(&format!("{role}_r")).expect("valid role"),
                SelinuxType::new(&format!("{kind}_t")).expect("valid type"),
                range,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Serializing then parsing yields the same context.
    #[test]
    fn prop_context_round_trips(ctx in arb_context()) {
        let text = ctx.to_string();
        let parsed = gate::parse_context(text.as_bytes());
        prop_assert_eq!(parsed, Ok(ctx));
    }

    /// Serialization is a fixed point after one round.
    #[test]
    fn prop_serialization_is_deterministic(ctx in arb_context()) {
        let once = ctx.to_string();
        let reparsed = gate::parse_context(once.as_bytes()).expect("canonical form parses");
        prop_assert_eq!(reparsed.to_string(), once);
    }

    /// Listing the same categories in any order gives the same set.
    #[test]
    fn prop_category_order_is_irrelevant(
        ids in proptest::collection::btree_set(0u32..1024, 1..32)
    ) {
        let ascending: Vec<String> = ids.iter().map(|id| format!("c{id}")).collect();
        let descending: Vec<String> = ids.iter().rev().map(|id| format!("c{id}")).collect();
        let a = gate::parse_categories(ascending.join(",").as_bytes());
        let b = gate::parse_categories(descending.join(",").as_bytes());
        prop_assert!(a.is_ok());
        prop_assert_eq!(a, b);
    }

    /// The two parsers never disagree on level-shaped noise.
    #[test]
    fn prop_parsers_agree_on_noise(raw in "[sc0-9:,. \t-]{0,24}") {
        if let Err(err) = gate::parse_range(raw.as_bytes()) {
            prop_assert!(!err.is_integrity_mismatch(), "{:?}: {}", raw, err);
        }
    }

    /// The two parsers never disagree on context-shaped noise.
    #[test]
    fn prop_parsers_agree_on_context_noise(
        prefix in "[a-z_:]{0,16}",
        level in "[sc0-9:,.-]{0,16}",
    ) {
        let raw = format!("{prefix}:{level}");
        if let Err(err) = gate::parse_context(raw.as_bytes()) {
            prop_assert!(!err.is_integrity_mismatch(), "{:?}: {}", raw, err);
        }
    }
}
