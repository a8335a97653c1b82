use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::providers::{Data, Format, Json, Toml, Yaml};
use figment::{Metadata, Profile, Provider, value::Map, value::Dict};
use std::path::{Path, PathBuf};

/// Configuration files are looked up as `tvsync.{toml,yaml,yml,json}`.
pub const CONFIG_FILE_STEM: &str = "tvsync";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Locate the configuration file to load.
///
/// An explicit path must exist. Otherwise the working directory is searched
/// first, then the platform configuration directory. `Ok(None)` means no file
/// was found, which is not an error: defaults and environment still apply.
pub fn discover(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(project) = ProjectDirs::from("", "", CONFIG_FILE_STEM) {
        dirs.push(project.config_dir().to_path_buf());
    }
    Ok(search(&dirs))
}

fn search(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| EXTENSIONS.iter().map(move |ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}"))))
        .find(|candidate| candidate.is_file())
}

/// A file provider whose format is picked from the file extension.
pub(crate) enum FileProvider {
    Toml(Data<Toml>),
    Yaml(Data<Yaml>),
    Json(Data<Json>),
}

pub(crate) fn provider(path: &Path) -> Result<FileProvider> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => FileProvider::Toml(Toml::file(path)),
        Some("yaml" | "yml") => FileProvider::Yaml(Yaml::file(path)),
        Some("json") => FileProvider::Json(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

impl Provider for FileProvider {
    fn metadata(&self) -> Metadata {
        match self {
            Self::Toml(data) => data.metadata(),
            Self::Yaml(data) => data.metadata(),
            Self::Json(data) => data.metadata(),
        }
    }

    fn data(&self) -> figment::Result<Map<Profile, Dict>> {
        match self {
            Self::Toml(data) => data.data(),
            Self::Yaml(data) => data.data(),
            Self::Json(data) => data.data(),
        }
    }
}
