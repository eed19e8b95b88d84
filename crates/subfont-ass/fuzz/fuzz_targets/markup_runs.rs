//! Fuzzing target for the override-block tokenizer

#![no_main]
use libfuzzer_sys::fuzz_target;

use subfont_ass::{plain_text, rewrite_font_overrides, runs};

fuzz_target!(|data: &[u8]| {
    // Limit input size to prevent timeouts
    let data = if data.len() > 10000 { &data[..10000] } else { data };
    let text = String::from_utf8_lossy(data);

    let plain = plain_text(&text);
    let joined: String = runs(&text).into_iter().map(|r| r.text).collect();
    assert_eq!(plain, joined, "runs must cover exactly the rendered text");

    // Renaming fonts never changes what is rendered
    let rewritten = rewrite_font_overrides(&text, |name| name.to_string());
    assert_eq!(plain_text(&rewritten), plain);
});
