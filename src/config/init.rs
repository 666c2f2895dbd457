// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates faasup.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;

    Ok(())
}

fn template_yaml() -> &'static str {
    r#"# faasup project settings. Command-line flags take precedence.
build:
  dockerfile: Dockerfile
  build_path: .
  # platform: linux/amd64
  # progress: plain
  # build_script: ./scripts/build.sh
  # docker_config: ~/.docker
  # image_tags:
  #   - my-app:latest
  build_args: {}

timeouts:
  image_ready: 30s
  function_active: 30s
"#
}
