use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub config_path: PathBuf,
    /// Overrides `world.chunk_radius` from the config file.
    pub radius: Option<i32>,
    pub dump_path: Option<PathBuf>,
    pub uv: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            radius: None,
            dump_path: None,
            uv: false,
        }
    }
}

impl RunConfig {
    pub fn from_env_args() -> Result<Self> {
        Self::from_iter(std::env::args_os().skip(1))
    }

    fn from_iter<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg_str = arg.to_string_lossy();
            match arg_str.as_ref() {
                "--config" => {
                    let Some(value) = iter.next() else {
                        return Err(anyhow!("--config requires a value"));
                    };
                    config.config_path = PathBuf::from(value);
                }
                "--dump" => {
                    let Some(value) = iter.next() else {
                        return Err(anyhow!("--dump requires a value"));
                    };
                    config.dump_path = Some(PathBuf::from(value));
                }
                "--radius" => {
                    let Some(value) = iter.next() else {
                        return Err(anyhow!("--radius requires a value"));
                    };
                    let radius: i32 = value
                        .to_string_lossy()
                        .parse()
                        .map_err(|e| anyhow!("invalid --radius value: {e}"))?;
                    if radius < 0 {
                        return Err(anyhow!("--radius must not be negative"));
                    }
                    config.radius = Some(radius);
                }
                "--uv" => config.uv = true,
                other => log::warn!("ignoring unknown argument {other:?}"),
            }
        }

        Ok(config)
    }
}
