// Fuzz target feeding arbitrary JSON query documents through validation and
// normalization.
#![no_main]

use libfuzzer_sys::fuzz_target;
use statquery_protocol::normalize::{keys, Normalizer};
use statquery_protocol::report::Query;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let Ok(query) = serde_json::from_slice::<Query>(data) else {
        return;
    };

    let params = Normalizer::new().normalize(&query);
    assert!(params.contains_key(keys::SELECT));
    assert!(params.contains_key(keys::TIME_RANGE));
    assert!(params.contains_key(keys::TS_ASCENDING));
    assert_eq!(
        params.get_str(keys::SELECT).map(|s| s.split(',').count()),
        Some(query.metrics().len())
    );
});
