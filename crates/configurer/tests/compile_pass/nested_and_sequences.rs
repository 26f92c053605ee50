use std::collections::VecDeque;

use configurer::Configure;
use serde::Deserialize;

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Listener {
    #[config("required")]
    host: String,
}

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Server {
    primary: Listener,
    backup: Option<Listener>,
    boxed: Box<Listener>,
    #[config("required")]
    listeners: Vec<Listener>,
    queue: VecDeque<Listener>,
}

fn main() {
    assert_eq!(<Server as Configure>::descriptor().fields.len(), 5);
}
