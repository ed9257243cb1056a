//! Gate behaviour through the public entry points.

use labelgate::gate;
use labelgate::{LabelError, SecurityContext};

#[test]
fn agrees_on_full_category_context() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = gate::parse_context(b"unconfined_u:unconfined_r:unconfined_t:s0:c0.c1023")?;
    assert_eq!(ctx.level().categories().len(), 1024);
    assert_eq!(
        ctx.to_string(),
        "unconfined_u:unconfined_r:unconfined_t:s0:c0.c1023"
    );
    Ok(())
}

#[test]
fn from_str_goes_through_gate() -> Result<(), Box<dyn std::error::Error>> {
    let via_str: SecurityContext = "system_u:object_r:etc_t:s0:c1,c2".parse()?;
    let via_gate = gate::parse_context(b"system_u:object_r:etc_t:s0:c1,c2")?;
    assert_eq!(via_str, via_gate);
    Ok(())
}

#[test]
fn embedded_nul_is_not_a_terminator() {
    for raw in [
        &b"system_u:object_r:etc_t:s0\0"[..],
        b"system_u:object_r:etc_t:s0\0:c5",
        b"system_u\0:object_r:etc_t:s0",
        b"system_u:object_r:etc_t:s0:c1\0,c2",
    ] {
        let result = gate::parse_context(raw);
        assert!(result.is_err(), "{} accepted", raw.escape_ascii());
    }
}

#[test]
fn rejects_non_utf8_bytes() {
    let result = gate::parse_context(b"system_u:object_r:etc_t:s0:c\xff");
    assert!(matches!(result, Err(LabelError::MalformedContext { .. })));
}

#[test]
fn level_and_range_entry_points() -> Result<(), Box<dyn std::error::Error>> {
    let level = gate::parse_level(b"s3:c2,c1")?;
    assert_eq!(level.to_string(), "s3:c1,c2");

    let range = gate::parse_range(b"s0-s3:c1,c2")?;
    assert!(range.contains(&level));
    assert!(!range.is_single());

    assert!(gate::parse_level(b"s0-s3").is_err());
    Ok(())
}

#[test]
fn rejection_is_never_an_integrity_mismatch_for_plain_garbage() {
    for raw in [
        &b""[..],
        b":::",
        b"a_u:b_r:c_t:",
        b"a_u:b_r:c_t:x0",
        b"a_u:b_r:c_t:s0::c1",
        b"a_u:b_r:c_t:s0:c1,",
        b"a_u:b_r:c_t:s0-",
        b"a_u:b_r:c_t:s0:c2.c1",
    ] {
        match gate::parse_context(raw) {
            Ok(ctx) => panic!("{} accepted as {ctx}", raw.escape_ascii()),
            Err(err) => assert!(
                !err.is_integrity_mismatch(),
                "{} caused mismatch: {err}",
                raw.escape_ascii()
            ),
        }
    }
}
