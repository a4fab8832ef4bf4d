// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./voxbook.toml` > `~/.config/voxbook/voxbook.toml` >
//! `/etc/voxbook/voxbook.toml`, with `VOXBOOK_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VoxbookConfig;

/// Config sections recognised in `VOXBOOK_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["server", "storage", "voice", "booking", "events", "venues"];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/voxbook/voxbook.toml`
/// 3. `~/.config/voxbook/voxbook.toml`
/// 4. `./voxbook.toml`
/// 5. `VOXBOOK_*` environment variables
pub fn load_config() -> Result<VoxbookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<VoxbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxbookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VoxbookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxbookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VoxbookConfig::default()))
        .merge(Toml::file("/etc/voxbook/voxbook.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("voxbook/voxbook.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("voxbook.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `VOXBOOK_VOICE_PRIVATE_KEY` to
/// `voice.private_key`.
///
/// Only the first underscore after a known section name becomes a dot; key
/// names keep their own underscores.
fn env_provider() -> Env {
    Env::prefixed("VOXBOOK_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
