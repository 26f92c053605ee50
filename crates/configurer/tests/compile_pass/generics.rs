use configurer::Configure;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Configure, Deserialize)]
struct Envelope<T>
where
    T: Clone,
{
    #[config("required")]
    payload: Option<T>,
    version: u32,
}

fn describe<T: Configure>() -> &'static str {
    T::descriptor().name
}

fn requires_owned<T: DeserializeOwned>() {}

fn main() {
    requires_owned::<Envelope<String>>();
    assert_eq!(describe::<Envelope<String>>(), "Envelope");
}
