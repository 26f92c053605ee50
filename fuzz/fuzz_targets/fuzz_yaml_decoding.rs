#![no_main]

use configurer::decoder::{Decoder, YamlDecoder};
use configurer::{Configure, Loader};
use libfuzzer_sys::fuzz_target;
use serde::Deserialize;

#[derive(Configure, Deserialize, Default, Debug)]
#[serde(default)]
struct Inner {
    #[config("required")]
    name: String,

    #[config("default=1")]
    weight: Option<u32>,
}

#[derive(Configure, Deserialize, Default, Debug)]
#[serde(default)]
struct Fuzzed {
    #[config("default=8080")]
    port: u16,

    #[config("required")]
    tags: Vec<String>,

    inner: Inner,
    items: Vec<Inner>,
}

fuzz_target!(|data: &[u8]| {
    // === Decoding never panics, on any bytes ===
    let _ = YamlDecoder.decode("fuzz.yaml", data);

    // === Literal decoding never panics ===
    let text = String::from_utf8_lossy(data);
    let _ = YamlDecoder.decode_literal(&text);

    // === Full load never panics; errors are fine ===
    let _ = Loader::new().load::<Fuzzed, _>(data, &YamlDecoder);
});
