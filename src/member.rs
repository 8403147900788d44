//! Public member page: company card, hours, ratings carousel and review form.

use tracing::{debug, info, warn};

use crate::{
    api::ApiError,
    carousel::{Carousel, CarouselEffect},
    config::CarouselConfig,
    i18n::{Language, Text, localize},
    media::to_embed_url,
    models::{Company, CompanySchedule, CreateRatingRequest, DayOfWeek, Rating},
    schedule::is_open_at,
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus, resolve_company_id},
    traits::Clock,
};

/// Similar members shown under the profile.
pub const MAX_SIMILAR: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MemberData {
    pub company: Company,
    pub schedule: Vec<CompanySchedule>,
    /// As returned by the backend; empty when none or the call failed.
    pub ratings: Vec<Rating>,
    pub similar: Vec<Company>,
}

/// Mean score rounded to one decimal, 0 without ratings.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|r| u32::from(r.score)).sum();
    let avg = f64::from(sum) / ratings.len() as f64;
    (avg * 10.0).round() / 10.0
}

/// `"3 reviews"`, `"1 review"`.
pub fn review_count_label(lang: Language, count: usize) -> String {
    let word = if count <= 1 {
        Text::ReviewSingular
    } else {
        Text::ReviewPlural
    };
    format!("{} {}", count, localize(lang, word))
}

/// Prefix `https://` unless the link already carries a scheme.
pub fn normalize_website(link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

pub fn map_embed_url(lat: f64, lon: f64, lang: Language) -> String {
    format!(
        "https://www.google.com/maps?q={},{}&hl={}&z=15&output=embed",
        lat,
        lon,
        lang.code()
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub first_name: String,
    pub last_name: String,
    /// 0 until a star is picked.
    pub score: u8,
    pub comment: String,
}

impl ReviewForm {
    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && self.score > 0
            && self.comment.trim().chars().count() >= 2
    }

    pub fn to_request(&self, company_id: i64) -> CreateRatingRequest {
        CreateRatingRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            score: self.score,
            comment: self.comment.trim().to_string(),
            company_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Closed,
    Editing,
    Submitting,
    /// Thank-you modal; closes with the next [`MemberScreen::clear_notice`].
    Sent,
}

pub struct MemberScreen {
    pub lang: Language,
    /// `None` until the operator's own company is resolved.
    company_id: Option<i64>,
    lifecycle: Lifecycle,
    pub status: ScreenStatus,
    company: Option<Company>,
    schedule: Vec<CompanySchedule>,
    ratings: Vec<Rating>,
    similar: Vec<Company>,
    carousel: Carousel<Rating>,
    review: ReviewForm,
    review_stage: ReviewStage,
    review_error: Option<Text>,
}

impl MemberScreen {
    /// `company_id: None` shows the operator's own company.
    pub fn new(
        lang: Language,
        company_id: Option<i64>,
        carousel: &CarouselConfig,
        viewport_width: f32,
    ) -> Self {
        Self {
            lang,
            company_id,
            lifecycle: Lifecycle::new(),
            status: ScreenStatus {
                loading: true,
                ..Default::default()
            },
            company: None,
            schedule: Vec::new(),
            ratings: Vec::new(),
            similar: Vec::new(),
            carousel: Carousel::new(carousel, viewport_width),
            review: ReviewForm::default(),
            review_stage: ReviewStage::Closed,
            review_error: None,
        }
    }

    /// Only the company itself is required; the other parts degrade to empty.
    pub async fn fetch(ctx: ScreenContext, company_id: Option<i64>) -> Result<MemberData, ScreenError> {
        let company_id = match company_id {
            Some(id) => id,
            None => resolve_company_id(&ctx).await?,
        };
        let api = &ctx.api;
        let (company, schedule, ratings, similar) = tokio::join!(
            api.company(company_id),
            api.schedule(company_id),
            api.ratings(company_id),
            api.similar(company_id),
        );

        let company = company.map_err(|e| match e {
            ApiError::Status { status: 404, .. } => ScreenError::NotFound,
            e => ScreenError::from_load(Text::MemberNotFound, e),
        })?;
        let schedule = schedule.unwrap_or_else(|e| {
            warn!(company_id, error = %e, "schedule unavailable");
            Vec::new()
        });
        let ratings = ratings.unwrap_or_else(|e| {
            warn!(company_id, error = %e, "ratings unavailable");
            Vec::new()
        });
        let similar = similar
            .unwrap_or_else(|e| {
                warn!(company_id, error = %e, "similar members unavailable");
                Vec::new()
            })
            .into_iter()
            .filter(|c| c.id != company_id)
            .take(MAX_SIMILAR)
            .collect();

        Ok(MemberData {
            company,
            schedule,
            ratings,
            similar,
        })
    }

    pub fn apply(&mut self, result: Result<MemberData, ScreenError>, ctx: &ScreenContext) -> Option<Effect> {
        match result {
            Ok(data) => {
                info!(
                    company_id = data.company.id,
                    ratings = data.ratings.len(),
                    similar = data.similar.len(),
                    "member loaded"
                );
                let slides = if data.ratings.is_empty() {
                    vec![Rating::placeholder()]
                } else {
                    data.ratings.clone()
                };
                self.carousel.set_items(slides);
                self.company_id = Some(data.company.id);
                self.company = Some(data.company);
                self.schedule = data.schedule;
                self.ratings = data.ratings;
                self.similar = data.similar;
                self.status.loaded();
                None
            }
            Err(err) => self.status.fail(err, ctx),
        }
    }

    pub async fn load(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        self.status.begin_load();
        let result = self
            .lifecycle
            .guard(Self::fetch(ctx.clone(), self.company_id))
            .await?;
        self.apply(result, ctx)
    }

    /// Show another member on the same screen.
    pub fn navigate(&mut self, company_id: i64) {
        self.company_id = Some(company_id);
        self.company = None;
        self.status.begin_load();
    }

    // ==================== Carousel ====================

    pub fn carousel(&self) -> &Carousel<Rating> {
        &self.carousel
    }

    pub fn tick(&mut self) -> Option<CarouselEffect> {
        self.carousel.tick()
    }

    pub fn next_rating(&mut self) -> Option<CarouselEffect> {
        self.carousel.next()
    }

    pub fn snap_back(&mut self) -> Option<CarouselEffect> {
        self.carousel.snap_back()
    }

    pub fn restore_transition(&mut self) {
        self.carousel.restore_transition();
    }

    pub fn resize(&mut self, viewport_width: f32) -> bool {
        self.carousel.resize(viewport_width)
    }

    // ==================== Review form ====================

    pub fn open_review(&mut self) {
        self.review = ReviewForm::default();
        self.review_error = None;
        self.review_stage = ReviewStage::Editing;
    }

    pub fn close_review(&mut self) {
        self.review = ReviewForm::default();
        self.review_error = None;
        self.review_stage = ReviewStage::Closed;
    }

    pub fn review(&self) -> &ReviewForm {
        &self.review
    }

    pub fn review_mut(&mut self) -> &mut ReviewForm {
        &mut self.review
    }

    pub fn set_score(&mut self, score: u8) {
        self.review.score = score.min(5);
    }

    pub fn review_stage(&self) -> ReviewStage {
        self.review_stage
    }

    pub fn review_error(&self) -> Option<&'static str> {
        self.review_error.map(|key| localize(self.lang, key))
    }

    pub fn prepare_review(&mut self) -> Result<CreateRatingRequest, Text> {
        let company_id = match &self.company {
            Some(company) if self.review.is_valid() => company.id,
            _ => {
                self.review_error = Some(Text::ReviewRequiredFields);
                return Err(Text::ReviewRequiredFields);
            }
        };
        self.review_error = None;
        self.review_stage = ReviewStage::Submitting;
        Ok(self.review.to_request(company_id))
    }

    pub async fn send_review(ctx: ScreenContext, request: CreateRatingRequest) -> Result<(), ApiError> {
        ctx.api.create_rating(&request).await
    }

    /// On success the thank-you modal opens; the host clears it after the
    /// returned delay and reloads.
    pub fn apply_review(&mut self, result: Result<(), ApiError>, ctx: &ScreenContext) -> Option<Effect> {
        match result {
            Ok(()) => {
                info!(company_id = ?self.company_id, "review sent");
                self.review = ReviewForm::default();
                self.review_stage = ReviewStage::Sent;
                Some(Effect::ClearNotice {
                    after: ctx.notice_clear_delay(),
                })
            }
            Err(e) => {
                warn!(error = %e, "review rejected");
                self.review_stage = ReviewStage::Editing;
                self.review_error = Some(Text::ReviewSubmitError);
                None
            }
        }
    }

    pub async fn submit_review(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        if self.review_stage == ReviewStage::Submitting {
            return None;
        }
        let request = self.prepare_review().ok()?;
        let result = self.lifecycle.guard(Self::send_review(ctx.clone(), request)).await?;
        self.apply_review(result, ctx)
    }

    /// Close the thank-you modal; the caller reloads next.
    pub fn clear_notice(&mut self) {
        if self.review_stage == ReviewStage::Sent {
            self.review_stage = ReviewStage::Closed;
        }
        self.status.clear_notice();
    }

    pub fn teardown(&mut self) {
        debug!(company_id = ?self.company_id, "member screen teardown");
        self.carousel.teardown();
        self.lifecycle.teardown();
    }

    // ==================== View state ====================

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn company_id(&self) -> Option<i64> {
        self.company_id
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn similar(&self) -> &[Company] {
        &self.similar
    }

    pub fn average_rating(&self) -> f64 {
        average_rating(&self.ratings)
    }

    pub fn review_count_label(&self) -> String {
        review_count_label(self.lang, self.ratings.len())
    }

    /// One line per day, Monday first. Days without an entry show as closed.
    pub fn formatted_hours(&self) -> Vec<(&'static str, String)> {
        DayOfWeek::ALL
            .iter()
            .map(|day| {
                let hours = self
                    .schedule
                    .iter()
                    .find(|s| s.day_of_week == *day)
                    .map(|s| s.display(self.lang))
                    .unwrap_or_else(|| localize(self.lang, Text::Closed).to_string());
                (day.localized(self.lang), hours)
            })
            .collect()
    }

    pub fn is_open_now(&self, clock: &dyn Clock) -> bool {
        is_open_at(&self.schedule, clock.now_local().naive_local())
    }

    /// Embedded map, only when both coordinates are set and non-zero.
    pub fn map_url(&self) -> Option<String> {
        let company = self.company.as_ref()?;
        match (company.lat, company.lon) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => {
                Some(map_embed_url(lat, lon, self.lang))
            }
            _ => None,
        }
    }

    pub fn website_url(&self) -> Option<String> {
        self.company
            .as_ref()?
            .web_link
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(normalize_website)
    }

    pub fn video_embed_url(&self) -> Option<String> {
        self.company
            .as_ref()?
            .video_link
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(to_embed_url)
    }

    /// Address, city and country joined with commas, blanks skipped.
    pub fn full_address(&self) -> String {
        let Some(company) = &self.company else {
            return String::new();
        };
        [&company.address, &company.city, &company.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn initial(&self) -> Option<char> {
        self.company
            .as_ref()?
            .name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }
}

impl Drop for MemberScreen {
    fn drop(&mut self) {
        self.carousel.teardown();
    }
}
