#![no_main]

use arbol::node::NodeId;
use arbol::parser::CallTreeParser;
use arbol::record::CallRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding and parsing arbitrary records must never panic
    if let Ok(record) = serde_json::from_slice::<CallRecord>(data) {
        let root = NodeId::root(1);
        let _ = CallTreeParser::parse_record(&record, root.clone());
        if let Some(children) = record.children() {
            let _ = CallTreeParser::parse_children(&root, children);
        }
    }
});
