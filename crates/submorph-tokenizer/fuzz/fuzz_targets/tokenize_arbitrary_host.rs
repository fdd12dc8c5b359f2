#![no_main]

use libfuzzer_sys::fuzz_target;

// Tokenization must never panic on arbitrary (possibly non-UTF8-ish,
// possibly malformed) input; it should only ever return `Ok` or an
// `InvalidDomain` error.
fuzz_target!(|data: &str| {
    let _ = submorph_tokenizer::tokenize(data);
});
