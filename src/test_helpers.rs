//! Shared test utilities for serialising environment mutation.

use std::env;

use tokio::sync::{Mutex, MutexGuard};

/// Lock held while a test mutates process environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::const_new(());

/// Guard that holds the env mutex and cleans up variables on drop.
pub struct EnvGuard {
    keys: Vec<String>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets environment variables while holding a global mutex.
    pub async fn set_vars(vars: &[(&str, &str)]) -> Self {
        let guard = ENV_LOCK.lock().await;
        for (key, value) in vars {
            unsafe { env::set_var(key, value) };
        }
        Self {
            keys: vars.iter().map(|(key, _)| (*key).to_owned()).collect(),
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            unsafe { env::remove_var(key) };
        }
    }
}
