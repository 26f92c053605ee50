use configurer::Configure;
use serde::Deserialize;

#[derive(Configure, Deserialize, Default)]
#[serde(default)]
struct Config {
    #[config("required")]
    name: String,

    #[config("default=8080,env=APP_PORT")]
    port: u16,

    #[config = "default=false"]
    verbose: bool,

    untouched: Option<String>,
}

fn main() {
    let descriptor = <Config as Configure>::descriptor();
    assert_eq!(descriptor.name, "Config");
    assert_eq!(descriptor.fields.len(), 4);
    assert_eq!(descriptor.fields[1].directive, "default=8080,env=APP_PORT");
    assert_eq!(descriptor.fields[3].directive, "");
}
