use std::borrow::Cow;
use std::ffi::OsString;
use std::net::SocketAddrV4;
use std::num::{NonZeroU16, NonZeroUsize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use configurer::Configure;
use serde::Deserialize;

#[derive(Configure, Deserialize)]
struct Config {
    #[config("default=5")]
    timeout: Duration,
    started: Option<SystemTime>,
    retries: NonZeroU16,
    workers: NonZeroUsize,
    #[config("required")]
    name: Arc<str>,
    zone: Box<str>,
    label: Cow<'static, str>,
    home: OsString,
    bind: SocketAddrV4,
    // No FieldValue impl anywhere: bound as plain deserializable leaves.
    score: serde_json::Number,
    pair: (String, u16),
    nested: Option<(u8, u8)>,
    #[config("required")]
    window: [u32; 4],
}

fn main() {
    assert_eq!(<Config as Configure>::descriptor().fields.len(), 13);
}
