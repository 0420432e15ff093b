use crate::config::Config;
use crate::project::ProjectStore;
use anyhow::Result;

pub fn init_command(config: &Config, name: &str) -> Result<()> {
    let store = ProjectStore::open(&config.articles_dir)?;
    let project_dir = store.init_project(name)?;

    println!("✓ Project '{}' initialized", name);
    println!("  {}", project_dir.display());
    println!("  Edit outline.md, then run 'quill expand {}' to draft.", name);

    Ok(())
}
