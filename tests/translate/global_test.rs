//! Process-wide table. The singleton is initialised once per test binary, so
//! everything that touches it lives in this one test.

use labelgate::config::TranslationConfig;
use labelgate::translate;
use labelgate::MlsLevel;

#[test]
fn unreadable_file_degrades_to_raw_only() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = TranslationConfig {
        path: dir.path().join("missing-setrans.conf"),
        strict: true,
    };

    let table = translate::init_global(&config);
    assert!(table.is_raw_only());
    assert!(table.load_failure().is_some());
    assert!(table.is_empty());

    let level: MlsLevel = "s0:c1023".parse()?;
    assert_eq!(table.render(&level), "s0:c1023");

    // Later calls hand back the same table.
    let again = translate::global();
    assert!(std::ptr::eq(table, again));
    Ok(())
}
