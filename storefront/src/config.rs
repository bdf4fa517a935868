use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::warn;

pub const DEFAULT_CART_PATH: &str = "petal_cart.json";

pub struct Config {
    pub cart_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            cart_path: try_load("PETAL_CART_PATH", DEFAULT_CART_PATH),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|()| default.to_string())
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
