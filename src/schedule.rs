use chrono::{Datelike, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::{
    api::ApiError,
    i18n::{Language, Text},
    models::{Company, CompanySchedule, DayOfWeek},
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus, resolve_company_id},
    validation::{FieldErrors, Rule},
};

pub const DEFAULT_OPENING: &str = "09:00";
pub const DEFAULT_CLOSING: &str = "18:00";

const OPEN_DAY_RULES: [Rule; 2] = [Rule::Required, Rule::Time];

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Whether the company is open at `at` according to its published schedule.
///
/// Opening is inclusive, closing exclusive. A closing time earlier than the
/// opening time runs past midnight.
pub fn is_open_at(schedule: &[CompanySchedule], at: NaiveDateTime) -> bool {
    let day = DayOfWeek::from_chrono(at.weekday());
    let Some(entry) = schedule.iter().find(|s| s.day_of_week == day) else {
        return false;
    };
    if entry.closed {
        return false;
    }
    let (Some(open), Some(close)) = (
        entry.opening_time.as_deref().and_then(parse_time),
        entry.closing_time.as_deref().and_then(parse_time),
    ) else {
        return false;
    };
    let now = at.time();
    if open <= close {
        (open..close).contains(&now)
    } else {
        now >= open || now < close
    }
}

/// One row of the weekly hours form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHours {
    pub day: DayOfWeek,
    pub open: bool,
    pub opening: String,
    pub closing: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeField {
    Opening,
    Closing,
}

/// The fixed seven-day form, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyHours {
    days: [DayHours; 7],
}

impl Default for WeeklyHours {
    /// Monday to Friday 09:00-18:00, weekend closed.
    fn default() -> Self {
        Self {
            days: DayOfWeek::ALL.map(|day| {
                let open = day.index() < 5;
                DayHours {
                    day,
                    open,
                    opening: if open { DEFAULT_OPENING.into() } else { String::new() },
                    closing: if open { DEFAULT_CLOSING.into() } else { String::new() },
                }
            }),
        }
    }
}

impl WeeklyHours {
    pub fn days(&self) -> &[DayHours; 7] {
        &self.days
    }

    pub fn day(&self, day: DayOfWeek) -> &DayHours {
        &self.days[day.index()]
    }

    fn day_mut(&mut self, day: DayOfWeek) -> &mut DayHours {
        &mut self.days[day.index()]
    }

    /// Overlay the stored schedule; days without an entry keep their values.
    pub fn apply_schedule(&mut self, schedule: &[CompanySchedule]) {
        for entry in schedule {
            let row = self.day_mut(entry.day_of_week);
            row.open = !entry.closed;
            if entry.closed {
                row.opening.clear();
                row.closing.clear();
                continue;
            }
            if let Some(opening) = &entry.opening_time {
                row.opening = opening.clone();
            }
            if let Some(closing) = &entry.closing_time {
                row.closing = closing.clone();
            }
        }
    }

    /// Flip a day. Opening resets the default times, closing clears them.
    pub fn toggle(&mut self, day: DayOfWeek) {
        let row = self.day_mut(day);
        row.open = !row.open;
        if row.open {
            row.opening = DEFAULT_OPENING.into();
            row.closing = DEFAULT_CLOSING.into();
        } else {
            row.opening.clear();
            row.closing.clear();
        }
    }

    pub fn set_time(&mut self, day: DayOfWeek, field: TimeField, value: impl Into<String>) {
        let row = self.day_mut(day);
        match field {
            TimeField::Opening => row.opening = value.into(),
            TimeField::Closing => row.closing = value.into(),
        }
    }

    /// Rules currently attached to a day's time fields: none while closed.
    pub fn rules(&self, day: DayOfWeek) -> &'static [Rule] {
        if self.day(day).open {
            &OPEN_DAY_RULES
        } else {
            &[]
        }
    }

    pub fn validate(&self) -> FieldErrors<(DayOfWeek, TimeField)> {
        let mut errors = FieldErrors::default();
        for row in &self.days {
            let rules = self.rules(row.day);
            errors.check((row.day, TimeField::Opening), &row.opening, rules);
            errors.check((row.day, TimeField::Closing), &row.closing, rules);
        }
        errors
    }

    /// All seven days, `null` times for closed ones.
    pub fn to_payload(&self) -> Vec<CompanySchedule> {
        self.days
            .iter()
            .map(|row| CompanySchedule {
                day_of_week: row.day,
                opening_time: row.open.then(|| row.opening.clone()),
                closing_time: row.open.then(|| row.closing.clone()),
                closed: !row.open,
            })
            .collect()
    }
}

/// Opening-hours editor.
pub struct HoursScreen {
    pub lang: Language,
    lifecycle: Lifecycle,
    pub status: ScreenStatus,
    company: Option<Company>,
    form: WeeklyHours,
    errors: FieldErrors<(DayOfWeek, TimeField)>,
}

impl HoursScreen {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            lifecycle: Lifecycle::new(),
            status: ScreenStatus {
                loading: true,
                ..Default::default()
            },
            company: None,
            form: WeeklyHours::default(),
            errors: FieldErrors::default(),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn form(&self) -> &WeeklyHours {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors<(DayOfWeek, TimeField)> {
        &self.errors
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub async fn fetch(ctx: ScreenContext) -> Result<(Company, Vec<CompanySchedule>), ScreenError> {
        let company_id = resolve_company_id(&ctx).await?;
        let company = ctx
            .api
            .company(company_id)
            .await
            .map_err(|e| ScreenError::from_load(Text::HoursCompanyLoadError, e))?;
        let schedule = ctx
            .api
            .schedule(company_id)
            .await
            .map_err(|e| ScreenError::from_load(Text::HoursLoadError, e))?;
        Ok((company, schedule))
    }

    pub fn apply(
        &mut self,
        result: Result<(Company, Vec<CompanySchedule>), ScreenError>,
        ctx: &ScreenContext,
    ) -> Option<Effect> {
        match result {
            Ok((company, schedule)) => {
                info!(company_id = company.id, entries = schedule.len(), "hours loaded");
                self.form = WeeklyHours::default();
                self.form.apply_schedule(&schedule);
                self.errors = self.form.validate();
                self.company = Some(company);
                self.status.loaded();
                None
            }
            Err(err) => self.status.fail(err, ctx),
        }
    }

    pub async fn load(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        self.status.begin_load();
        let result = self.lifecycle.guard(Self::fetch(ctx.clone())).await?;
        self.apply(result, ctx)
    }

    pub fn toggle(&mut self, day: DayOfWeek) {
        self.form.toggle(day);
        self.errors = self.form.validate();
    }

    pub fn set_time(&mut self, day: DayOfWeek, field: TimeField, value: impl Into<String>) {
        self.form.set_time(day, field, value);
        self.errors = self.form.validate();
    }

    /// Validate and build the request. Leaves the form untouched on failure.
    pub fn prepare_save(&mut self) -> Result<(i64, Vec<CompanySchedule>), ScreenError> {
        self.status.success = None;
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            self.status.error = Some(ScreenError::Invalid);
            return Err(ScreenError::Invalid);
        }
        let Some(company_id) = self.company.as_ref().map(|c| c.id).filter(|id| *id > 0) else {
            self.status.error = Some(ScreenError::MissingCompanyId);
            return Err(ScreenError::MissingCompanyId);
        };
        self.status.begin_save();
        Ok((company_id, self.form.to_payload()))
    }

    pub async fn save(
        ctx: ScreenContext,
        company_id: i64,
        payload: Vec<CompanySchedule>,
    ) -> Result<(), ScreenError> {
        ctx.api
            .update_schedule(company_id, &payload)
            .await
            .map_err(|e: ApiError| ScreenError::from_save(Text::HoursSaveError, e))
    }

    pub fn apply_saved(
        &mut self,
        result: Result<(), ScreenError>,
        ctx: &ScreenContext,
    ) -> Option<Effect> {
        match result {
            Ok(()) => {
                info!("hours saved");
                Some(self.status.saved(Text::HoursSaveSuccess, ctx))
            }
            Err(err) => self.status.fail(err, ctx),
        }
    }

    /// Validate, save and apply. A second call while saving is ignored.
    pub async fn submit(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        if self.status.saving {
            return None;
        }
        let (company_id, payload) = self.prepare_save().ok()?;
        let result = self
            .lifecycle
            .guard(Self::save(ctx.clone(), company_id, payload))
            .await?;
        self.apply_saved(result, ctx)
    }

    /// The success notice timed out; the caller reloads next.
    pub fn clear_notice(&mut self) {
        self.status.clear_notice();
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}
