//! Profile statistics dashboard.
//!
//! Four independent fetches feed three metric cards, a line chart of daily
//! views and a pie chart of the contact timeline. Each fetch degrades to "no
//! data" on its own; the screen only reports an error when all four fail.
//! Fetched data is cached so a language switch re-renders without a request.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    api::{ApiError, DirectoryApiClient},
    format::{format_evolution, format_number, format_share, full_date, is_growth, short_date},
    i18n::{Language, Text, localize},
    models::{ContactTimeline, ContactTotal, ProfileViewTotal, ViewPoint},
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, resolve_account},
    traits::Clock,
};

/// Shown in the "last update" card when the company has no timestamp.
pub const NO_DATE: &str = "--/--/----";

/// Placeholder axis label of an empty series.
pub const EMPTY_LABEL: &str = "--";

/// Cached results of the statistics endpoints, `None` meaning "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsData {
    pub profile_views: Option<ProfileViewTotal>,
    pub contacts: Option<ContactTotal>,
    pub views: Option<Vec<ViewPoint>>,
    pub timeline: Option<ContactTimeline>,
    /// Company `updatedAt`; not one of the four counted fetches.
    pub updated_at: Option<String>,
}

impl StatsData {
    /// Counted fetches that came back with data.
    pub fn available(&self) -> usize {
        [
            self.profile_views.is_some(),
            self.contacts.is_some(),
            self.views.is_some(),
            self.timeline.is_some(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }

    pub fn all_failed(&self) -> bool {
        self.available() == 0
    }
}

fn settle<T>(name: &'static str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(endpoint = name, error = %e, "statistic unavailable");
            None
        }
    }
}

/// Issue all statistics requests concurrently. Never fails: every error
/// becomes a `None` and is logged.
pub async fn load_all(api: &DirectoryApiClient, company_id: i64, member_id: i64) -> StatsData {
    info!(company_id, member_id, "loading statistics");
    let (profile_views, contacts, views, timeline, company) = tokio::join!(
        api.profile_views(company_id),
        api.contact_total(company_id),
        api.weekly_daily_views(company_id),
        api.contact_timeline(company_id),
        api.company(company_id),
    );
    StatsData {
        profile_views: settle("profile-views", profile_views),
        contacts: settle("contact-total", contacts),
        views: settle("weekly-daily-views", views),
        timeline: settle("contact-timeline", timeline),
        updated_at: settle("company", company)
            .and_then(|c| c.updated_at)
            .filter(|s| !s.is_empty()),
    }
}

// ==================== View models ====================

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub growth: String,
    pub positive: bool,
    pub period: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartModel {
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Tooltip title per point: the full date.
    pub titles: Vec<String>,
    unit: &'static str,
}

impl LineChartModel {
    pub fn build(lang: Language, views: &[ViewPoint]) -> Self {
        let series_label = localize(lang, Text::ProfileViews);
        let unit = localize(lang, Text::ViewsLabel);
        if views.is_empty() {
            return Self {
                series_label,
                labels: vec![EMPTY_LABEL.to_string()],
                values: vec![0.0],
                titles: vec![EMPTY_LABEL.to_string()],
                unit,
            };
        }
        Self {
            series_label,
            labels: views.iter().map(|p| short_date(lang, &p.date)).collect(),
            values: views.iter().map(|p| p.count as f64).collect(),
            titles: views.iter().map(|p| full_date(lang, &p.date)).collect(),
            unit,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Tooltip body: `12 views`.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.values
            .get(index)
            .map(|v| format!("{} {}", v, self.unit))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartModel {
    pub slices: Vec<PieSlice>,
    unit: &'static str,
}

impl PieChartModel {
    /// Four buckets in a fixed order, zeros when the timeline is missing.
    pub fn build(lang: Language, timeline: Option<&ContactTimeline>) -> Self {
        let t = timeline.cloned().unwrap_or(ContactTimeline {
            today: 0,
            last_week: 0,
            last_month: 0,
            current_year: 0,
        });
        let slice = |key, value| PieSlice {
            label: localize(lang, key),
            value,
        };
        Self {
            slices: vec![
                slice(Text::Today, t.today),
                slice(Text::ThisWeek, t.last_week),
                slice(Text::ThisMonth, t.last_month),
                slice(Text::ThisYear, t.current_year),
            ],
            unit: localize(lang, Text::ContactsLabel),
        }
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Tooltip text: `3 contacts (25.0%)`.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let slice = self.slices.get(index)?;
        Some(format!(
            "{} {} ({}%)",
            slice.value,
            self.unit,
            format_share(slice.value, self.total())
        ))
    }
}

// ==================== Controller ====================

#[derive(Debug, Clone, Serialize)]
struct ViewRow<'a> {
    date: &'a str,
    count: u64,
}

pub struct StatisticsScreen {
    lang: Language,
    lifecycle: Lifecycle,
    pub loading: bool,
    pub error: Option<ScreenError>,
    data: StatsData,
    loaded: bool,
    line: LineChartModel,
    pie: PieChartModel,
    company_id: Option<i64>,
}

impl StatisticsScreen {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            lifecycle: Lifecycle::new(),
            loading: true,
            error: None,
            data: StatsData::default(),
            loaded: false,
            line: LineChartModel::build(lang, &[]),
            pie: PieChartModel::build(lang, None),
            company_id: None,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Resolve the account, then run [`load_all`].
    pub async fn fetch(ctx: ScreenContext) -> Result<(i64, StatsData), ScreenError> {
        let user = resolve_account(&ctx).await?;
        let company_id = user.company_id.ok_or(ScreenError::NoCompany)?;
        let member_id = user.id.ok_or(ScreenError::NoMember)?;
        let data = load_all(&ctx.api, company_id, member_id).await;
        Ok((company_id, data))
    }

    pub fn apply(
        &mut self,
        result: Result<(i64, StatsData), ScreenError>,
        ctx: &ScreenContext,
    ) -> Option<Effect> {
        self.loading = false;
        match result {
            Ok((company_id, data)) => {
                self.company_id = Some(company_id);
                if data.all_failed() {
                    warn!(company_id, "every statistic failed to load");
                    self.error = Some(ScreenError::Unavailable(Text::StatsLoadError));
                } else {
                    info!(company_id, available = data.available(), "statistics loaded");
                    self.error = None;
                }
                self.data = data;
                self.loaded = true;
                self.rebuild_charts();
                None
            }
            Err(err) => {
                warn!(error = %err, "statistics screen unavailable");
                let effect = err.redirects_to_login().then(|| Effect::RedirectToLogin {
                    after: ctx.login_redirect_delay(),
                });
                self.error = Some(err);
                effect
            }
        }
    }

    /// Fetch and apply, unless the screen is torn down meanwhile.
    pub async fn load(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        self.loading = true;
        self.error = None;
        let result = self.lifecycle.guard(Self::fetch(ctx.clone())).await?;
        self.apply(result, ctx)
    }

    /// Drop every cached result before a reload.
    pub fn refresh(&mut self) {
        self.data = StatsData::default();
        self.loaded = false;
        self.loading = true;
        self.error = None;
        self.rebuild_charts();
    }

    /// Re-render from the cache; never hits the network.
    pub fn set_language(&mut self, lang: Language) {
        self.lang = lang;
        if self.loaded {
            self.rebuild_charts();
        }
    }

    fn rebuild_charts(&mut self) {
        self.line = LineChartModel::build(self.lang, self.data.views.as_deref().unwrap_or(&[]));
        self.pie = PieChartModel::build(self.lang, self.data.timeline.as_ref());
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn data(&self) -> &StatsData {
        &self.data
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn line_chart(&self) -> &LineChartModel {
        &self.line
    }

    pub fn pie_chart(&self) -> &PieChartModel {
        &self.pie
    }

    /// Delay before charts are redrawn after a layout or language change.
    pub fn redraw_delay(ctx: &ScreenContext) -> Duration {
        Duration::from_millis(ctx.timing.chart_redraw_ms)
    }

    /// Profile views, contacts received, last update.
    pub fn metrics(&self) -> [MetricCard; 3] {
        let lang = self.lang;
        let evolution = |e: Option<f64>| {
            let e = e.unwrap_or(0.0);
            (format_evolution(e), is_growth(e))
        };
        let count = |n: Option<u64>| match n {
            Some(n) if n > 0 => format_number(lang, n),
            _ => "0".to_string(),
        };

        let views_evolution = self.data.profile_views.as_ref().map(|v| v.weekly_evolution);
        let (views_growth, views_positive) = evolution(views_evolution);
        let (contacts_growth, contacts_positive) =
            evolution(self.data.contacts.as_ref().map(|c| c.weekly_evolution));

        [
            MetricCard {
                title: localize(lang, Text::ProfileViews),
                value: count(self.data.profile_views.as_ref().map(|v| v.total)),
                growth: views_growth.clone(),
                positive: views_positive,
                period: localize(lang, Text::SinceLastWeek),
            },
            MetricCard {
                title: localize(lang, Text::ContactsReceived),
                value: count(self.data.contacts.as_ref().map(|c| c.total)),
                growth: contacts_growth,
                positive: contacts_positive,
                period: localize(lang, Text::SinceLastWeek),
            },
            MetricCard {
                title: localize(lang, Text::LastUpdate),
                value: self
                    .data
                    .updated_at
                    .as_deref()
                    .map(|d| full_date(lang, d))
                    .unwrap_or_else(|| NO_DATE.to_string()),
                growth: views_growth,
                positive: views_positive,
                period: localize(lang, Text::SinceLastMonth),
            },
        ]
    }

    /// Write the daily views series as CSV into `output_dir`.
    pub async fn export_csv(&self, output_dir: &Path, clock: &dyn Clock) -> Result<PathBuf> {
        export_views(
            self.data.views.clone().unwrap_or_default(),
            self.company_id.unwrap_or_default(),
            output_dir.to_path_buf(),
            clock.now_utc(),
        )
        .await
    }

    /// Owned inputs for an export that outlives the screen borrow.
    pub fn export_job(&self) -> (Vec<ViewPoint>, i64) {
        (
            self.data.views.clone().unwrap_or_default(),
            self.company_id.unwrap_or_default(),
        )
    }

    /// `~/Downloads`, or the working directory when there is none.
    pub fn default_export_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// `profile_views_{company}_{timestamp}.csv` with a `date,count` header.
pub async fn export_views(
    views: Vec<ViewPoint>,
    company_id: i64,
    output_dir: PathBuf,
    export_time: DateTime<Utc>,
) -> Result<PathBuf> {
    let filename = format!(
        "profile_views_{}_{}.csv",
        company_id,
        export_time.format("%Y%m%d_%H%M%S")
    );
    let output_path = output_dir.join(filename);

    let path = output_path.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut wtr = csv::Writer::from_path(&path).context("Failed to create CSV writer")?;
        for point in &views {
            wtr.serialize(ViewRow {
                date: &point.date,
                count: point.count,
            })
            .context("Failed to serialize view row")?;
        }
        wtr.flush().context("Failed to flush CSV writer")?;
        Ok(())
    })
    .await
    .context("CSV export task failed")??;

    info!(path = %output_path.display(), "views exported");
    Ok(output_path)
}
