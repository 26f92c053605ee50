use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use configurer::Configure;
use serde::Deserialize;

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Mode {
    #[default]
    Fast,
    Safe,
}

configurer::leaf_field!(Mode);

#[derive(Configure, Deserialize)]
struct Config {
    #[config("default=fast")]
    mode: Mode,
    ip: IpAddr,
    addr: SocketAddr,
    path: PathBuf,
    labels: HashMap<String, String>,
    weights: BTreeMap<String, f64>,
    tags: HashSet<String>,
    ordered: BTreeSet<u32>,
    raw: serde_json::Value,
    ch: char,
    big: u128,
}

fn main() {
    assert_eq!(<Config as Configure>::descriptor().fields.len(), 11);
    let _ = Mode::Safe;
}
