use std::{env, io, path::PathBuf};

use anyhow::{anyhow, Result};

const APPLICATION_NAME: &str = "pushstats";

/// Directory holding the push log and the log files. Created when missing.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
            path.push(APPLICATION_NAME);
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
            path.push(APPLICATION_NAME);
            path
        }
    };

    ensure_dir(path)
}

pub fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::ensure_dir;

    #[test]
    fn ensure_dir_creates_nested_dirs() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b");
        assert_eq!(ensure_dir(nested.clone())?, nested);
        assert!(nested.is_dir());
        // Second call is a no-op
        assert_eq!(ensure_dir(nested.clone())?, nested);
        Ok(())
    }
}
