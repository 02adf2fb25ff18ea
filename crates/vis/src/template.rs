use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::dashboard::Dashboard;
use crate::dashboard::Kpi;
use crate::error::Result;
use crate::layout::data::ChartView;
use crate::story::Slide;

const INDEX_TEMPLATE: &str = "index";
const STORY_TEMPLATE: &str = "story";

pub struct TemplateEngine<'a> {
    index_file_path: &'a Path,
    story_file_path: &'a Path,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(index_file_path: &'a Path, story_file_path: &'a Path) -> TemplateEngine<'a> {
        Self {
            index_file_path,
            story_file_path,
        }
    }

    pub fn render(&self, context: &Context<'_>) -> Result<()> {
        let mut template = TinyTemplate::new();
        template.add_template(INDEX_TEMPLATE, include_str!("./template/index.html.tt"))?;
        template.add_template(STORY_TEMPLATE, include_str!("./template/story.html.tt"))?;

        for (name, path) in [
            (INDEX_TEMPLATE, self.index_file_path),
            (STORY_TEMPLATE, self.story_file_path),
        ] {
            let text = template.render(name, context)?;
            let mut file = BufWriter::new(File::create(path)?);

            file.write_all(text.as_bytes())?;
            file.flush()?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
pub struct Context<'a> {
    title: &'a str,
    subtitle: &'a str,
    link: Option<&'a str>,
    generated: String,
    kpis: &'a [Kpi],
    charts: Vec<ChartView>,
    slides: &'a [Slide],
    notices: &'a [String],
}

impl<'a> Context<'a> {
    pub fn new(dashboard: &'a Dashboard, charts: Vec<ChartView>) -> Context<'a> {
        Self {
            title: &dashboard.title,
            subtitle: &dashboard.subtitle,
            link: dashboard.link.as_deref(),
            generated: dashboard.generated.format("%Y-%m-%d %H:%M UTC").to_string(),
            kpis: &dashboard.kpis,
            charts,
            slides: &dashboard.slides,
            notices: &dashboard.notices,
        }
    }
}
