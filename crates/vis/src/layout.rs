//! Writes the dashboard to disk.

pub(crate) mod data;
mod writer;

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::layout::data::DataEngine;
use crate::template::Context;
use crate::template::TemplateEngine;

/// The dashboard directory is structured as follows:
///
/// ./dashboard/index.html
/// ./dashboard/story.html
///
/// ./dashboard/assets/dashboard.js
/// ./dashboard/assets/style.css
///
/// ./dashboard/data/series1.js
/// ./dashboard/data/series2.js
/// ./dashboard/data/...
/// ./dashboard/data/seriesN.js
///
/// The __index__ file is the dashboard and the __story__ file the
/// storyteller. The __data__ directory contains one file per chart series and
/// is emptied every time the dashboard is generated.
pub struct VisLayout {
    root_path: PathBuf,
    index_file_path: PathBuf,
    story_file_path: PathBuf,
    assets_path: PathBuf,
    data_path: PathBuf,
}

impl VisLayout {
    const MAIN_DIR_NAME: &str = "dashboard";
    const DATA_DIR_NAME: &str = "data";
    const ASSETS_DIR_NAME: &str = "assets";
    const INDEX_FILE_NAME: &str = "index.html";
    const STORY_FILE_NAME: &str = "story.html";

    const ASSETS: [(&str, &str); 2] = [
        ("dashboard.js", include_str!("./assets/dashboard.js")),
        ("style.css", include_str!("./assets/style.css")),
    ];

    /// Creates the dashboard directory under `path`, reusing it if it exists.
    pub fn init(path: &Path) -> Result<VisLayout> {
        let root_path = path.join(Self::MAIN_DIR_NAME);
        let index_file_path = root_path.join(Self::INDEX_FILE_NAME);
        let story_file_path = root_path.join(Self::STORY_FILE_NAME);
        let assets_path = root_path.join(Self::ASSETS_DIR_NAME);
        let data_path = root_path.join(Self::DATA_DIR_NAME);

        if data_path.exists() {
            fs::remove_dir_all(&data_path)?;
        }

        fs::create_dir_all(&data_path)?;
        fs::create_dir_all(&assets_path)?;

        Ok(Self {
            root_path,
            index_file_path,
            story_file_path,
            assets_path,
            data_path,
        })
    }

    /// Returns the path of the dashboard directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Returns the path of the dashboard entry page.
    pub fn index_file_path(&self) -> &Path {
        &self.index_file_path
    }

    /// Writes the data files, the pages and the assets of `dashboard`.
    pub fn generate(&self, dashboard: &Dashboard) -> Result<()> {
        let data_engine = DataEngine::new(&self.data_path, Self::DATA_DIR_NAME);
        let charts = data_engine.render(&dashboard.charts)?;

        let template = TemplateEngine::new(&self.index_file_path, &self.story_file_path);
        template.render(&Context::new(dashboard, charts))?;

        for (name, content) in Self::ASSETS {
            fs::write(self.assets_path.join(name), content)?;
        }

        info!(path = %self.root_path.display(), charts = dashboard.charts.len(), "dashboard generated");

        Ok(())
    }
}
