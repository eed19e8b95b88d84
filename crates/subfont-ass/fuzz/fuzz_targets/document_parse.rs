//! Fuzzing target for the document parser

#![no_main]
use libfuzzer_sys::fuzz_target;

use subfont_ass::Document;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 10000 { &data[..10000] } else { data };

    if let Ok(doc) = Document::from_bytes(data) {
        // Serialized output must parse back to the same records
        let out = doc.to_string_crlf();
        let again = Document::parse(&out).expect("serialized document must reparse");
        assert_eq!(doc.styles().count(), again.styles().count());
        assert_eq!(doc.events().count(), again.events().count());
    }
});
