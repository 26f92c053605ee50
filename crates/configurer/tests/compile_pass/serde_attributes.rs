use configurer::Configure;
use serde::Deserialize;

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Tls {
    #[config("default=cert.pem")]
    cert: String,
}

#[derive(Configure, Deserialize, Default)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
struct Config {
    #[config("required")]
    bind_address: String,

    #[serde(rename(deserialize = "timeout", serialize = "timeout_secs"))]
    timeout_secs: u64,

    #[serde(skip)]
    cache: Vec<u8>,

    #[serde(flatten)]
    tls: Tls,

    #[serde(alias = "kind", default)]
    r#type: String,
}

fn main() {
    let fields = <Config as Configure>::descriptor().fields;
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].key, "BIND_ADDRESS");
    assert_eq!(fields[1].key, "timeout");
    assert!(fields[2].flatten);
    assert_eq!(fields[3].name, "type");
    assert_eq!(fields[3].key, "TYPE");
}
