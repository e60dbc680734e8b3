use std::path::{Path, PathBuf};
use log::info;

pub const DEFAULT_WORKDIR_NAME: &str = ".mediakeep";

#[derive(Debug)]
pub struct AppConfig {
    pub workdir: PathBuf,
}

impl AppConfig {
    pub fn new(workdir: Option<&str>) -> anyhow::Result<Self> {
        let workdir = match workdir {
            Some(dir) => PathBuf::from(dir),
            None => default_workdir()?,
        };
        let workdir = get_or_create_workdir(&workdir)?;
        Ok(Self { workdir })
    }
}

fn default_workdir() -> anyhow::Result<PathBuf> {
    let home = home::home_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
    Ok(home.join(DEFAULT_WORKDIR_NAME))
}

fn get_or_create_workdir(workdir: &Path) -> anyhow::Result<PathBuf> {
    if !workdir.exists() {
        std::fs::create_dir_all(workdir)?;
    }
    if !workdir.is_dir() {
        anyhow::bail!("workdir is not a directory");
    }
    let workdir = workdir.canonicalize()?;
    info!("workdir: {}", workdir.display());
    Ok(workdir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("workdir");
        let config = AppConfig::new(Some(target.to_str().unwrap())).unwrap();
        assert!(config.workdir.is_dir());
    }
}
