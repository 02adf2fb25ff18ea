use std::path::Path;
use std::thread;

use eurobal_balance::Scope;
use eurobal_balance::codes::flow;
use eurobal_jsonstat::FallbackPolicy;
use eurobal_vis::Dashboard;
use eurobal_vis::Panels;
use eurobal_vis::VisLayout;
use tracing::info;

use crate::cli::DashboardArgs;
use crate::cli::PathExt;
use crate::error::CliError;
use crate::fetch;
use crate::fetch::Abortable;
use crate::fetch::DatasetSource;
use crate::panel;
use crate::panel::PanelSlot;
use crate::session::Session;

/// How many years back the trend panel reaches.
const TREND_YEARS: i32 = 15;

pub(crate) fn dashboard(config: Option<&Path>, args: DashboardArgs) -> Result<(), CliError> {
    let mut session = Session::open(config, &args.source)?;
    let selection = session.selection(&args.selection)?;
    let scope = session.scope(&selection);

    let output_path = args
        .output_path
        .or_else(|| session.config().output_path.clone())
        .or_current_dir()?;

    println!(
        "eurobal fetches the {} energy balance of {} and generates a dashboard in: `{}`",
        scope.year,
        scope.countries.join(", "),
        output_path.display()
    );

    let panels = fetch_panels(session.source(), &scope, &session.policy());
    let link = format!("index.html?{}", selection.to_query());
    let dashboard = Dashboard::build(&scope, &panels).with_link(link);

    let vis = VisLayout::init(&output_path)?;
    vis.generate(&dashboard)?;

    info!(path = %vis.index_file_path().display(), "dashboard generated");
    println!("{}", vis.index_file_path().display());

    Ok(())
}

/// Fetches every panel concurrently. A panel whose fetch fails is left empty.
pub(crate) fn fetch_panels<S>(source: &S, scope: &Scope, policy: &FallbackPolicy) -> Panels
where
    S: DatasetSource + Sync + ?Sized,
{
    let overview = PanelSlot::new("energy overview");
    let fuel_mix = PanelSlot::new("fuel mix");
    let sectors = PanelSlot::new("sector consumption");
    let transformation = PanelSlot::new("transformation");
    let trends = PanelSlot::new("trends");

    thread::scope(|s| {
        s.spawn(|| {
            panel::run(&overview, |abort| {
                fetch::fetch_energy_data(&Abortable::new(source, abort), scope, policy)
            })
        });
        s.spawn(|| {
            panel::run(&fuel_mix, |abort| {
                fetch::fetch_fuel_mix(&Abortable::new(source, abort), scope, policy)
            })
        });
        s.spawn(|| {
            panel::run(&sectors, |abort| {
                fetch::fetch_sector_data(&Abortable::new(source, abort), scope, policy)
            })
        });
        s.spawn(|| {
            panel::run(&transformation, |abort| {
                fetch::fetch_transformation(&Abortable::new(source, abort), scope, policy)
            })
        });
        s.spawn(|| {
            panel::run(&trends, |abort| {
                let since = Some(scope.year - TREND_YEARS);
                fetch::fetch_time_series(&Abortable::new(source, abort), scope, flow::IMPORTS, since, policy)
            })
        });
    });

    Panels {
        overview: overview.into_inner().unwrap_or_default(),
        fuel_mix: fuel_mix.into_inner().unwrap_or_default(),
        sectors: sectors.into_inner().unwrap_or_default(),
        transformation: transformation.into_inner().unwrap_or_default(),
        trends: trends.into_inner().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use eurobal_balance::codes::field;

    use super::*;
    use crate::fetch::tests::StubSource;
    use crate::fetch::tests::overview_payload;
    use crate::fetch::tests::scope;

    #[test]
    fn panels_are_fetched_independently() {
        let source = StubSource::default().with(flow::PRODUCTION, overview_payload());

        let panels = fetch_panels(&source, &scope(), &FallbackPolicy::default());

        assert_eq!(panels.overview["DE"].get(field::IMPORTS), Some(300.0));
        assert!(panels.fuel_mix.is_empty());
        assert!(panels.sectors.is_empty());
        assert!(panels.transformation.is_empty());
        assert!(panels.trends.is_empty());
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 5);
    }

    #[test]
    fn dashboard_is_generated_from_partial_data() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = StubSource::default().with(flow::PRODUCTION, overview_payload());
        let scope = scope();

        let panels = fetch_panels(&source, &scope, &FallbackPolicy::default());
        let dashboard = Dashboard::build(&scope, &panels).with_link("index.html?geo=DE&year=2023");

        let vis = VisLayout::init(dir.path())?;
        vis.generate(&dashboard)?;

        let index = fs::read_to_string(vis.index_file_path())?;
        assert!(index.contains("EU energy balance 2023"));
        assert!(index.contains("index.html?geo=DE&amp;year=2023"));

        Ok(())
    }
}
