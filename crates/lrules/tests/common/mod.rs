#![allow(dead_code)]

use lrules_lib::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DATASET: &str = "toy";

pub const TRAIN_TAB: &str = "2 2 0 4 8 -1
0 5
1 6
2 5
3 7

10 1
11 2
12 1
13 3

";

pub const TEST_TAB: &str = "2 2 0 2 4 -1
1.5 5.5
2.5 6

10.5 2
12.5 1.5

";

pub fn report_header(features: usize, classes: usize) -> String {
    format!(
        "<html><body><h2>Пространство</h2>\
         <table>\
         <tr><td>Признаков</td><td>{}</td></tr>\
         <tr><td>Классов</td><td>{}</td></tr>\
         </table>",
        features, classes
    )
}

/// Report with one rules table; `rows` are `(class, rule text)`.
pub fn rules_report(features: usize, classes: usize, rows: &[(usize, &str)]) -> String {
    let mut markup = report_header(features, classes);
    markup.push_str("<h2>Найденные закономерности</h2><table>");
    markup.push_str(&format!("<tr><td>Всего правил</td><td>{}</td></tr>", rows.len()));
    for (i, (class, rule)) in rows.iter().enumerate() {
        markup.push_str(&format!(
            "<tr><td>Правило {} (класс {})</td><td>{}</td></tr>",
            i + 1,
            class,
            rule
        ));
    }
    markup.push_str("</table></body></html>");
    markup
}

/// Rules that separate the classes of [`TRAIN_TAB`] and [`TEST_TAB`].
pub fn toy_report() -> String {
    rules_report(
        2,
        2,
        &[
            (1, "X1 &lt;= 3"),
            (1, "0 &lt;= X1 &lt;= 2 X2 &lt;= 6"),
            (1, "5 &lt;= X2"),
            (2, "10 &lt;= X1"),
            (2, "X1 &lt;= 13 X2 &lt;= 3"),
        ],
    )
}

pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Data home holding the toy report and train/test files.
    pub fn with_experiment_files() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write(&format!("{}-lrules.html", DATASET), toy_report().as_bytes())?;
        fixture.write(&format!("{}-train.tab", DATASET), TRAIN_TAB.as_bytes())?;
        fixture.write(&format!("{}-test.tab", DATASET), TEST_TAB.as_bytes())?;
        Ok(fixture)
    }

    pub fn data_home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
