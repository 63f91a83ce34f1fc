#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use budget_forge_lib::{StateStore, StorageHandle};
use tracing_subscriber::{fmt, EnvFilter};

#[test]
fn rejected_import_is_logged_without_payload() {
    let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
    let writer = buf.clone();
    let _ = fmt()
        .with_env_filter(EnvFilter::new("budget_forge=debug"))
        .with_writer(move || Capture(writer.clone()))
        .json()
        .try_init();

    let store = StateStore::new(StorageHandle::in_memory());
    let secret = "{\"householdName\": \"Secret Household\", oops";
    store.import_state(secret).unwrap_err();
    store.import_state("42").unwrap_err();

    let s = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    assert!(s.contains("\"event\":\"state_import_rejected\""));
    assert!(s.contains("\"reason\":\"parse\""));
    assert!(s.contains("\"reason\":\"not_object\""));
    assert!(!s.contains("Secret Household"), "log leaked import payload");
}

struct Capture(Arc<Mutex<Vec<u8>>>);
impl std::io::Write for Capture {
    fn write(&mut self, b: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(b);
        Ok(b.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
