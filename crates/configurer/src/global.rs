//! The process-wide default loader (feature `global`).
//!
//! Created on first use with [`Loader::with_defaults`]. Loads take a read
//! lock, registrations a write lock, so registering while loads are running
//! blocks until they finish.

use std::io::Read;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::decoder::Decoder;
use crate::error::Error;
use crate::field::Configure;
use crate::loader::Loader;
use crate::source::Source;

static DEFAULT_LOADER: OnceLock<RwLock<Loader>> = OnceLock::new();

fn loader() -> &'static RwLock<Loader> {
    DEFAULT_LOADER.get_or_init(|| RwLock::new(Loader::with_defaults()))
}

/// [`Loader::load_url`] on the default loader.
///
/// # Errors
///
/// As [`Loader::load_url`].
#[allow(clippy::result_large_err)]
pub fn load_url<T: Configure>(url: &str) -> Result<T, Error> {
    loader().read().load_url(url)
}

/// [`Loader::load`] on the default loader.
///
/// # Errors
///
/// As [`Loader::load`].
#[allow(clippy::result_large_err)]
pub fn load<T: Configure, R: Read>(reader: R, decoder: &dyn Decoder) -> Result<T, Error> {
    loader().read().load(reader, decoder)
}

/// [`Loader::load_json`] on the default loader.
///
/// # Errors
///
/// As [`Loader::load_json`].
#[allow(clippy::result_large_err)]
pub fn load_json<T: Configure, R: Read>(reader: R) -> Result<T, Error> {
    loader().read().load_json(reader)
}

/// [`Loader::load_toml`] on the default loader.
///
/// # Errors
///
/// As [`Loader::load_toml`].
#[allow(clippy::result_large_err)]
pub fn load_toml<T: Configure, R: Read>(reader: R) -> Result<T, Error> {
    loader().read().load_toml(reader)
}

/// [`Loader::load_yaml`] on the default loader.
///
/// # Errors
///
/// As [`Loader::load_yaml`].
#[allow(clippy::result_large_err)]
pub fn load_yaml<T: Configure, R: Read>(reader: R) -> Result<T, Error> {
    loader().read().load_yaml(reader)
}

/// [`Loader::register_source`] on the default loader.
///
/// # Errors
///
/// As [`Loader::register_source`].
#[allow(clippy::result_large_err)]
pub fn register_source<S: Source + 'static>(source: S) -> Result<(), Error> {
    loader().write().register_source(source)
}

/// [`Loader::register_decoder`] on the default loader.
///
/// # Errors
///
/// As [`Loader::register_decoder`].
#[allow(clippy::result_large_err)]
pub fn register_decoder<D: Decoder + 'static>(decoder: D) -> Result<(), Error> {
    loader().write().register_decoder(decoder)
}
