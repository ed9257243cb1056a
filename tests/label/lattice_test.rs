//! Dominance over parsed levels and contexts.

use labelgate::{MlsLevel, MlsRange, SecurityContext};

fn level(raw: &str) -> MlsLevel {
    match raw.parse() {
        Ok(level) => level,
        Err(err) => panic!("{raw:?} should parse: {err}"),
    }
}

fn context(raw: &str) -> SecurityContext {
    match raw.parse() {
        Ok(ctx) => ctx,
        Err(err) => panic!("{raw:?} should parse: {err}"),
    }
}

#[test]
fn higher_sensitivity_and_superset_dominates() {
    let a = level("s2:c1,c2");
    let b = level("s1:c1");
    assert!(a.dominates(&b));
    assert!(!b.dominates(&a));
}

#[test]
fn missing_category_blocks_dominance() {
    let a = level("s5:c1");
    let b = level("s1:c1,c2");
    assert!(!a.dominates(&b));
    assert!(!b.dominates(&a));
    assert!(a.is_incomparable(&b));
}

#[test]
fn equal_levels_dominate_each_other() {
    let a = level("s3:c0.c9");
    let b = level("s3:c9,c8,c7,c6,c5,c4,c3,c2,c1,c0");
    assert!(a.dominates(&b));
    assert!(b.dominates(&a));
    assert!(!a.is_incomparable(&b));
}

#[test]
fn lub_and_glb_bracket_both_inputs() {
    let a = level("s1:c0,c700");
    let b = level("s4:c700,c1000");
    let lub = a.lub(&b);
    let glb = a.glb(&b);
    assert_eq!(lub, level("s4:c0,c700,c1000"));
    assert_eq!(glb, level("s1:c700"));
    for x in [&a, &b] {
        assert!(lub.dominates(x));
        assert!(glb.dominated_by(x));
    }
}

#[test]
fn range_membership() {
    let range: MlsRange = match "s0-s2:c0.c3".parse() {
        Ok(range) => range,
        Err(err) => panic!("range should parse: {err}"),
    };
    assert!(range.contains(&level("s1:c2")));
    assert!(range.contains(&level("s0")));
    assert!(!range.contains(&level("s3")));
    assert!(!range.contains(&level("s1:c4")));
}

#[test]
fn context_dominance_uses_effective_levels() {
    let subject = context("staff_u:staff_r:staff_t:s2:c1,c2");
    let object = context("system_u:object_r:etc_t:s1:c1");
    assert!(subject.dominates(&object));
    assert!(!object.dominates(&subject));

    // Clearance does not widen what the subject currently dominates.
    let cleared = context("staff_u:staff_r:staff_t:s0-s15:c0.c1023");
    assert!(!cleared.dominates(&object));
}
