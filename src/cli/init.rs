//! Init command - write an example settings file

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::config::Settings;

pub fn run(path: &Path) -> Result<()> {
    let settings_path = Settings::project_path(path);

    match Settings::write_example(&settings_path) {
        Ok(()) => {
            println!(
                "\n  {} Wrote {}",
                style("[OK]").green(),
                style(settings_path.display()).cyan()
            );
            println!(
                "      Edit {} and breakpoints, then run {}\n",
                style("folder_path").cyan(),
                style("draftmeter watch").cyan()
            );
        }
        Err(e) => {
            println!("\n  {} {}\n", style("[--]").dim(), e);
        }
    }
    Ok(())
}
