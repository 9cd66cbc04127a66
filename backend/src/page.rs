//! Page shell: builds the wave overview once at startup and hands it to the map.

use std::str::FromStr;
use std::sync::Arc;

use log::{info, warn};

use crate::models::WaveOverview;
use crate::services::areas::AreaSource;
use crate::services::error::ServiceResult;
use crate::services::overview::OverviewSource;
use crate::widget::{MapProps, MapWidget};

pub const PAGE_TITLE: &str = "BMKG MARITIME MAP";
pub const PAGE_DESCRIPTION: &str = "Maritime Map of BMKG";

/// What to do when the overview feed cannot be fetched at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverviewFallback {
    /// Continue with an empty overview; every area renders as unknown.
    #[default]
    Empty,
    /// Propagate the error and abort the build.
    FailBuild,
}

impl FromStr for OverviewFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" => Ok(OverviewFallback::Empty),
            "fail" | "fail_build" => Ok(OverviewFallback::FailBuild),
            other => Err(format!(
                "Unknown overview fallback '{}'. Use empty or fail.",
                other
            )),
        }
    }
}

/// Page data built once. Never refreshed while the server runs.
#[derive(Debug, Clone)]
pub struct PageProps {
    pub title: &'static str,
    pub description: &'static str,
    pub wave_overview: Arc<WaveOverview>,
}

#[derive(Debug, Clone)]
pub struct PageShell {
    props: PageProps,
    map_props: MapProps,
}

impl PageShell {
    /// Fetches the overview once and builds the page props.
    pub async fn build(
        source: &dyn OverviewSource,
        fallback: OverviewFallback,
        map_props: MapProps,
    ) -> ServiceResult<Self> {
        let wave_overview = match source.fetch_overview().await {
            Ok(overview) => overview,
            Err(e) => match fallback {
                OverviewFallback::FailBuild => return Err(e),
                OverviewFallback::Empty => {
                    warn!("Wave overview unavailable, continuing with an empty overview: {}", e);
                    WaveOverview::new()
                }
            },
        };
        info!("Page built with {} wave overview entries", wave_overview.len());

        Ok(Self {
            props: PageProps {
                title: PAGE_TITLE,
                description: PAGE_DESCRIPTION,
                wave_overview: Arc::new(wave_overview),
            },
            map_props,
        })
    }

    pub fn props(&self) -> &PageProps {
        &self.props
    }

    pub fn wave_overview(&self) -> Arc<WaveOverview> {
        Arc::clone(&self.props.wave_overview)
    }

    /// Widget props carrying the built overview.
    pub fn map_props(&self) -> MapProps {
        MapProps {
            wave_overview: self.wave_overview(),
            ..self.map_props.clone()
        }
    }

    /// Mounts a map widget fed with the built overview.
    pub fn mount_map(&self, source: Arc<dyn AreaSource>) -> MapWidget {
        MapWidget::mount(self.map_props(), source)
    }
}
