use console::style;
use lrules_lib::data::{read_tab, standardize, stratified_split, write_tab};
use lrules_lib::{Config, Result};
use std::path::{Path, PathBuf};

pub fn handle_split_command(
    tabfile: &Path,
    dataset: &str,
    data_home: Option<PathBuf>,
    prefix: Option<String>,
    scale: bool,
    folds: usize,
    quiet: bool,
) -> Result<()> {
    let config = Config::new(data_home)?;
    config.ensure_data_home()?;
    let prefix = prefix.unwrap_or_else(|| dataset.to_string());

    let mut data = read_tab(tabfile)?;
    if scale {
        data = standardize(&data);
    }
    let split = stratified_split(&data, folds, folds.saturating_sub(1))?;

    let outputs = [
        ("train", &split.train),
        ("test", &split.test),
        ("all", &data),
    ];
    for (part, part_data) in outputs {
        let path = config.data_file(&format!("{}-{}.tab", prefix, part));
        write_tab(&path, part_data)?;
        if !quiet {
            println!(
                "  {}: {} ({} examples)",
                style("✓").green(),
                path.display(),
                part_data.n_examples()
            );
        }
    }

    if !quiet {
        println!("\n{} Split {} into {} folds", style("✓").green(), dataset, folds);
    }
    Ok(())
}
