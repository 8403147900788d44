use std::{fmt, future::Future, path::PathBuf, sync::Arc};

use amcham_directory::{
    api::ApiError,
    carousel::CarouselEffect,
    config::AppConfig,
    i18n::{Language, Text, localize, localize_with},
    media::{MediaScreen, Photo},
    member::{MemberData, MemberScreen, ReviewStage},
    models::{Company, CompanySchedule, DayOfWeek, Rating},
    profile::{LogoPreview, ProfileData, ProfileField, ProfileScreen},
    schedule::{HoursScreen, TimeField},
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus},
    statistics::{StatisticsScreen, StatsData, export_views},
    style,
    traits::Clock,
    upload::{Upload, UploadError},
    widgets::{line_chart::LineChart, pie_chart::PieChart},
};
use iced::{
    Alignment, Border, Color, Element, Length, Shadow, Subscription, Task, Theme, Vector,
    widget::{
        Space, button,
        canvas::{Cache, Canvas},
        checkbox, column, container, pick_list, row, scrollable, stack, text, text_input,
    },
    window,
};
use tracing::{debug, error, info, warn};

// --- STATE STRUCTS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Profile,
    Hours,
    Media,
    Member,
    Statistics,
}

impl ViewMode {
    const ALL: [ViewMode; 5] = [
        ViewMode::Profile,
        ViewMode::Hours,
        ViewMode::Media,
        ViewMode::Member,
        ViewMode::Statistics,
    ];

    fn nav_label(self) -> Text {
        match self {
            ViewMode::Profile => Text::NavProfile,
            ViewMode::Hours => Text::NavHours,
            ViewMode::Media => Text::NavMedia,
            ViewMode::Member => Text::NavMember,
            ViewMode::Statistics => Text::NavStatistics,
        }
    }
}

/// Pick-list entry for sectors and countries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// The controller behind the current view. Replacing it tears the old one down.
enum Screen {
    Profile(ProfileScreen),
    Hours(HoursScreen),
    Media(MediaScreen),
    Member(MemberScreen),
    Statistics(StatisticsScreen),
}

impl Screen {
    fn lifecycle(&self) -> &Lifecycle {
        match self {
            Screen::Profile(s) => s.lifecycle(),
            Screen::Hours(s) => s.lifecycle(),
            Screen::Media(s) => s.lifecycle(),
            Screen::Member(s) => s.lifecycle(),
            Screen::Statistics(s) => s.lifecycle(),
        }
    }

    fn teardown(&mut self) {
        match self {
            Screen::Profile(s) => s.teardown(),
            Screen::Hours(s) => s.teardown(),
            Screen::Media(s) => s.teardown(),
            Screen::Member(s) => s.teardown(),
            Screen::Statistics(s) => s.teardown(),
        }
    }

    fn set_language(&mut self, lang: Language) {
        match self {
            Screen::Profile(s) => s.lang = lang,
            Screen::Hours(s) => s.lang = lang,
            Screen::Media(s) => s.lang = lang,
            Screen::Member(s) => s.lang = lang,
            Screen::Statistics(s) => s.set_language(lang),
        }
    }

    fn begin_load(&mut self) {
        match self {
            Screen::Profile(s) => s.status.begin_load(),
            Screen::Hours(s) => s.status.begin_load(),
            Screen::Media(s) => s.status.begin_load(),
            Screen::Member(s) => s.status.begin_load(),
            Screen::Statistics(s) => s.refresh(),
        }
    }

    fn status(&self) -> Option<&ScreenStatus> {
        match self {
            Screen::Profile(s) => Some(&s.status),
            Screen::Hours(s) => Some(&s.status),
            Screen::Media(s) => Some(&s.status),
            Screen::Member(s) => Some(&s.status),
            Screen::Statistics(_) => None,
        }
    }

    fn is_loading(&self) -> bool {
        match self {
            Screen::Statistics(s) => s.loading,
            other => other.status().is_some_and(|s| s.loading || s.saving),
        }
    }

    fn error(&self) -> Option<&ScreenError> {
        match self {
            Screen::Statistics(s) => s.error.as_ref(),
            other => other.status().and_then(|s| s.error.as_ref()),
        }
    }

    fn notice(&self) -> Option<Text> {
        match self {
            Screen::Member(s) if s.review_stage() == ReviewStage::Sent => {
                Some(Text::ReviewSubmitSuccess)
            }
            other => other.status().and_then(|s| s.success),
        }
    }
}

#[derive(Default)]
struct UiState {
    line_cache: Cache,
    pie_cache: Cache,
    logo_path: String,
    photo_path: String,
    upload_error: Option<String>,
    export_status: Option<String>,
    is_exporting: bool,
    login_required: bool,
}

// --- MESSAGES ---

#[derive(Debug, Clone)]
pub enum Message {
    SwitchView(ViewMode),
    ToggleLanguage,
    Retry,
    /// A guarded future resolved after its screen was torn down.
    Cancelled,
    LoginRedirect,
    NoticeExpired,
    WindowResized(f32),
    ChartInteraction,
    ChartsRedraw,

    // Profile
    ProfileLoaded(Result<ProfileData, ScreenError>),
    ProfileText(ProfileField, String),
    ProfileSector(Choice),
    ProfileCountry(Choice),
    LogoPathChanged(String),
    PickLogo,
    LogoPicked(Result<Upload, UploadError>),
    DeleteLogo,
    ResetProfile,
    SubmitProfile,
    ProfileSaved(Result<(), ScreenError>),

    // Opening hours
    HoursLoaded(Result<(Company, Vec<CompanySchedule>), ScreenError>),
    ToggleDay(DayOfWeek),
    TimeChanged(DayOfWeek, TimeField, String),
    SubmitHours,
    HoursSaved(Result<(), ScreenError>),

    // Media
    MediaLoaded(Result<Company, ScreenError>),
    PhotoPathChanged(String),
    PickPhoto,
    PhotoPicked(Result<Upload, UploadError>),
    RemovePhoto(usize),
    VideoUrlChanged(String),
    ClearVideo,
    SubmitMedia,
    MediaSaved(Result<(), ScreenError>),

    // Member page
    MemberLoaded(Result<MemberData, ScreenError>),
    OpenMember(i64),
    CarouselTick,
    NextRating,
    CarouselSnap,
    CarouselRestore,
    OpenReview,
    CloseReview,
    ReviewFirstName(String),
    ReviewLastName(String),
    ReviewScore(u8),
    ReviewComment(String),
    SubmitReview,
    ReviewSent(Result<(), ApiError>),

    // Statistics
    StatsLoaded(Result<(i64, StatsData), ScreenError>),
    RefreshStats,
    ExportCsv,
    ExportCompleted(Result<PathBuf, String>),
    ClearExportStatus,
}

// --- APP ---

pub struct DirectoryApp {
    ctx: ScreenContext,
    config: Arc<AppConfig>,
    lang: Language,
    current_view: ViewMode,
    screen: Screen,
    /// Content width, window minus sidebar.
    viewport_width: f32,
    ui: UiState,
}

impl DirectoryApp {
    pub fn new(ctx: ScreenContext, config: Arc<AppConfig>, lang: Language) -> (Self, Task<Message>) {
        let viewport_width = (config.window.width - config.window.sidebar_width).max(0.0);
        let app = Self {
            ctx,
            config,
            lang,
            current_view: ViewMode::default(),
            screen: Screen::Profile(ProfileScreen::new(lang)),
            viewport_width,
            ui: UiState::default(),
        };
        let task = app.load_task();
        (app, task)
    }

    fn open(&mut self, view: ViewMode) -> Task<Message> {
        self.screen.teardown();
        self.current_view = view;
        self.ui.logo_path.clear();
        self.ui.photo_path.clear();
        self.ui.upload_error = None;
        self.screen = match view {
            ViewMode::Profile => Screen::Profile(ProfileScreen::new(self.lang)),
            ViewMode::Hours => Screen::Hours(HoursScreen::new(self.lang)),
            ViewMode::Media => Screen::Media(MediaScreen::new(self.lang)),
            ViewMode::Member => Screen::Member(MemberScreen::new(
                self.lang,
                None,
                &self.config.carousel,
                self.viewport_width,
            )),
            ViewMode::Statistics => {
                self.ui.line_cache.clear();
                self.ui.pie_cache.clear();
                Screen::Statistics(StatisticsScreen::new(self.lang))
            }
        };
        self.load_task()
    }

    fn load_task(&self) -> Task<Message> {
        let ctx = self.ctx.clone();
        match &self.screen {
            Screen::Profile(s) => guarded(s.lifecycle(), ProfileScreen::fetch(ctx), Message::ProfileLoaded),
            Screen::Hours(s) => guarded(s.lifecycle(), HoursScreen::fetch(ctx), Message::HoursLoaded),
            Screen::Media(s) => guarded(s.lifecycle(), MediaScreen::fetch(ctx), Message::MediaLoaded),
            Screen::Member(s) => guarded(
                s.lifecycle(),
                MemberScreen::fetch(ctx, s.company_id()),
                Message::MemberLoaded,
            ),
            Screen::Statistics(s) => {
                guarded(s.lifecycle(), StatisticsScreen::fetch(ctx), Message::StatsLoaded)
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SwitchView(view) => {
                self.ui.login_required = false;
                self.open(view)
            }
            Message::ToggleLanguage => {
                self.lang = self.lang.toggled();
                self.screen.set_language(self.lang);
                info!(lang = %self.lang, "language switched");
                match &self.screen {
                    Screen::Statistics(s) => guarded(
                        s.lifecycle(),
                        tokio::time::sleep(StatisticsScreen::redraw_delay(&self.ctx)),
                        |_| Message::ChartsRedraw,
                    ),
                    _ => Task::none(),
                }
            }
            Message::Retry => {
                self.screen.begin_load();
                self.load_task()
            }
            Message::Cancelled => Task::none(),
            Message::LoginRedirect => {
                warn!("session rejected, login required");
                self.screen.teardown();
                self.ui.login_required = true;
                Task::none()
            }
            Message::NoticeExpired => {
                match &mut self.screen {
                    Screen::Profile(s) => s.clear_notice(),
                    Screen::Hours(s) => s.clear_notice(),
                    Screen::Media(s) => s.clear_notice(),
                    Screen::Member(s) => s.clear_notice(),
                    Screen::Statistics(_) => return Task::none(),
                }
                self.screen.begin_load();
                self.load_task()
            }
            Message::WindowResized(width) => {
                self.viewport_width = (width - self.config.window.sidebar_width).max(0.0);
                if let Screen::Member(s) = &mut self.screen {
                    if s.resize(self.viewport_width) {
                        debug!(width = self.viewport_width, "carousel layout changed");
                    }
                }
                self.ui.line_cache.clear();
                self.ui.pie_cache.clear();
                Task::none()
            }
            Message::ChartInteraction => Task::none(),
            Message::ChartsRedraw => {
                self.ui.line_cache.clear();
                self.ui.pie_cache.clear();
                Task::none()
            }

            // --- Profile ---
            Message::ProfileLoaded(result) => {
                let Screen::Profile(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }
            Message::ProfileText(field, value) => {
                if let Screen::Profile(s) = &mut self.screen {
                    s.set_text(field, value);
                }
                Task::none()
            }
            Message::ProfileSector(choice) => {
                if let Screen::Profile(s) = &mut self.screen {
                    s.select_sector(Some(choice.id));
                }
                Task::none()
            }
            Message::ProfileCountry(choice) => {
                if let Screen::Profile(s) = &mut self.screen {
                    s.select_country(Some(choice.id));
                }
                Task::none()
            }
            Message::LogoPathChanged(path) => {
                self.ui.logo_path = path;
                Task::none()
            }
            Message::PickLogo => pick_file(&self.ui.logo_path, Message::LogoPicked),
            Message::LogoPicked(upload) => {
                let Screen::Profile(s) = &mut self.screen else {
                    return Task::none();
                };
                match s.select_logo(upload) {
                    Ok(()) => {
                        self.ui.logo_path.clear();
                        self.ui.upload_error = None;
                    }
                    Err(e) => self.ui.upload_error = Some(e.localized(self.lang)),
                }
                Task::none()
            }
            Message::DeleteLogo => {
                if let Screen::Profile(s) = &mut self.screen {
                    s.delete_logo();
                }
                Task::none()
            }
            Message::ResetProfile => {
                if let Screen::Profile(s) = &mut self.screen {
                    s.reset();
                }
                self.ui.upload_error = None;
                Task::none()
            }
            Message::SubmitProfile => {
                let Screen::Profile(s) = &mut self.screen else {
                    return Task::none();
                };
                if s.status.saving {
                    return Task::none();
                }
                match s.prepare_save() {
                    Ok((id, update)) => guarded(
                        s.lifecycle(),
                        ProfileScreen::save(self.ctx.clone(), id, update),
                        Message::ProfileSaved,
                    ),
                    Err(err) => {
                        debug!(error = %err, "profile not submitted");
                        Task::none()
                    }
                }
            }
            Message::ProfileSaved(result) => {
                let Screen::Profile(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply_saved(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }

            // --- Opening hours ---
            Message::HoursLoaded(result) => {
                let Screen::Hours(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }
            Message::ToggleDay(day) => {
                if let Screen::Hours(s) = &mut self.screen {
                    s.toggle(day);
                }
                Task::none()
            }
            Message::TimeChanged(day, field, value) => {
                if let Screen::Hours(s) = &mut self.screen {
                    s.set_time(day, field, value);
                }
                Task::none()
            }
            Message::SubmitHours => {
                let Screen::Hours(s) = &mut self.screen else {
                    return Task::none();
                };
                if s.status.saving {
                    return Task::none();
                }
                match s.prepare_save() {
                    Ok((id, payload)) => guarded(
                        s.lifecycle(),
                        HoursScreen::save(self.ctx.clone(), id, payload),
                        Message::HoursSaved,
                    ),
                    Err(err) => {
                        debug!(error = %err, "hours not submitted");
                        Task::none()
                    }
                }
            }
            Message::HoursSaved(result) => {
                let Screen::Hours(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply_saved(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }

            // --- Media ---
            Message::MediaLoaded(result) => {
                let Screen::Media(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }
            Message::PhotoPathChanged(path) => {
                self.ui.photo_path = path;
                Task::none()
            }
            Message::PickPhoto => pick_file(&self.ui.photo_path, Message::PhotoPicked),
            Message::PhotoPicked(upload) => {
                if let Screen::Media(s) = &mut self.screen {
                    let accepted = upload.is_ok();
                    s.add_photo(upload);
                    if accepted {
                        self.ui.photo_path.clear();
                    }
                }
                Task::none()
            }
            Message::RemovePhoto(index) => {
                if let Screen::Media(s) = &mut self.screen {
                    s.remove_photo(index);
                }
                Task::none()
            }
            Message::VideoUrlChanged(url) => {
                if let Screen::Media(s) = &mut self.screen {
                    s.set_video_url(url);
                }
                Task::none()
            }
            Message::ClearVideo => {
                if let Screen::Media(s) = &mut self.screen {
                    s.clear_video();
                }
                Task::none()
            }
            Message::SubmitMedia => {
                let Screen::Media(s) = &mut self.screen else {
                    return Task::none();
                };
                if s.status.saving {
                    return Task::none();
                }
                match s.prepare_save() {
                    Ok((id, update)) => guarded(
                        s.lifecycle(),
                        MediaScreen::save(self.ctx.clone(), id, update),
                        Message::MediaSaved,
                    ),
                    Err(err) => {
                        debug!(error = %err, "media not submitted");
                        Task::none()
                    }
                }
            }
            Message::MediaSaved(result) => {
                let Screen::Media(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply_saved(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }

            // --- Member page ---
            Message::MemberLoaded(result) => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }
            Message::OpenMember(company_id) => {
                // A fresh controller drops responses still in flight for the previous member.
                self.screen.teardown();
                self.current_view = ViewMode::Member;
                self.screen = Screen::Member(MemberScreen::new(
                    self.lang,
                    Some(company_id),
                    &self.config.carousel,
                    self.viewport_width,
                ));
                self.load_task()
            }
            Message::CarouselTick => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.tick();
                carousel_task(s.lifecycle(), effect)
            }
            Message::NextRating => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.next_rating();
                carousel_task(s.lifecycle(), effect)
            }
            Message::CarouselSnap => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.snap_back();
                carousel_task(s.lifecycle(), effect)
            }
            Message::CarouselRestore => {
                if let Screen::Member(s) = &mut self.screen {
                    s.restore_transition();
                }
                Task::none()
            }
            Message::OpenReview => {
                if let Screen::Member(s) = &mut self.screen {
                    s.open_review();
                }
                Task::none()
            }
            Message::CloseReview => {
                if let Screen::Member(s) = &mut self.screen {
                    s.close_review();
                }
                Task::none()
            }
            Message::ReviewFirstName(value) => {
                if let Screen::Member(s) = &mut self.screen {
                    s.review_mut().first_name = value;
                }
                Task::none()
            }
            Message::ReviewLastName(value) => {
                if let Screen::Member(s) = &mut self.screen {
                    s.review_mut().last_name = value;
                }
                Task::none()
            }
            Message::ReviewScore(score) => {
                if let Screen::Member(s) = &mut self.screen {
                    s.set_score(score);
                }
                Task::none()
            }
            Message::ReviewComment(value) => {
                if let Screen::Member(s) = &mut self.screen {
                    s.review_mut().comment = value;
                }
                Task::none()
            }
            Message::SubmitReview => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                if s.review_stage() == ReviewStage::Submitting {
                    return Task::none();
                }
                match s.prepare_review() {
                    Ok(request) => guarded(
                        s.lifecycle(),
                        MemberScreen::send_review(self.ctx.clone(), request),
                        Message::ReviewSent,
                    ),
                    Err(_) => Task::none(),
                }
            }
            Message::ReviewSent(result) => {
                let Screen::Member(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply_review(result, &self.ctx);
                effect_task(s.lifecycle(), effect)
            }

            // --- Statistics ---
            Message::StatsLoaded(result) => {
                let Screen::Statistics(s) = &mut self.screen else {
                    return Task::none();
                };
                let effect = s.apply(result, &self.ctx);
                self.ui.line_cache.clear();
                self.ui.pie_cache.clear();
                effect_task(s.lifecycle(), effect)
            }
            Message::RefreshStats => {
                self.screen.begin_load();
                self.ui.line_cache.clear();
                self.ui.pie_cache.clear();
                self.load_task()
            }
            Message::ExportCsv => {
                let Screen::Statistics(s) = &self.screen else {
                    return Task::none();
                };
                if self.ui.is_exporting {
                    return Task::none();
                }
                self.ui.is_exporting = true;

                let (views, company_id) = s.export_job();
                let output_dir = StatisticsScreen::default_export_dir();
                let export_time = self.ctx.clock.now_utc();
                Task::perform(
                    async move {
                        export_views(views, company_id, output_dir, export_time)
                            .await
                            .map_err(|e| format!("{e:#}"))
                    },
                    Message::ExportCompleted,
                )
            }
            Message::ExportCompleted(result) => {
                self.ui.is_exporting = false;
                self.ui.export_status = Some(match result {
                    Ok(path) => {
                        localize_with(self.lang, Text::ExportSaved, "path", path.display())
                    }
                    Err(e) => {
                        error!(error = %e, "CSV export failed");
                        format!("{}: {}", localize(self.lang, Text::ExportFailed), e)
                    }
                });
                Task::perform(
                    tokio::time::sleep(self.ctx.notice_clear_delay()),
                    |_| Message::ClearExportStatus,
                )
            }
            Message::ClearExportStatus => {
                self.ui.export_status = None;
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let sidebar = self.view_sidebar();
        let content = if self.ui.login_required {
            self.view_login_required()
        } else {
            match &self.screen {
                Screen::Profile(s) => self.view_profile(s),
                Screen::Hours(s) => self.view_hours(s),
                Screen::Media(s) => self.view_media(s),
                Screen::Member(s) => self.view_member(s),
                Screen::Statistics(s) => self.view_statistics(s),
            }
        };

        let main_area = container(column![
            self.view_header(),
            Space::new().height(20),
            scrollable(content).height(Length::Fill)
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(30)
        .style(|_| container::Style {
            background: Some(style::BG_PAGE.into()),
            ..Default::default()
        });

        let app_layout = row![sidebar, main_area]
            .width(Length::Fill)
            .height(Length::Fill);

        let toast_message = self
            .ui
            .export_status
            .clone()
            .or_else(|| self.screen.notice().map(|t| localize(self.lang, t).to_string()));

        if let Some(msg) = toast_message {
            let toast = container(text(msg).size(14).color(style::TEXT_DARK))
                .padding([12, 24])
                .style(|_| container::Style {
                    background: Some(style::BG_CARD.into()),
                    border: Border {
                        radius: 20.0.into(),
                        width: 1.0,
                        color: style::POSITIVE,
                    },
                    shadow: Shadow {
                        color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
                        offset: Vector::new(0.0, 4.0),
                        blur_radius: 10.0,
                    },
                    ..Default::default()
                });
            stack![
                app_layout,
                container(toast)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Alignment::Center)
                    .padding(30)
            ]
            .into()
        } else {
            app_layout.into()
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![iced::event::listen_with(|event, _status, _window_id| {
            if let iced::Event::Window(window::Event::Resized(size)) = event {
                Some(Message::WindowResized(size.width))
            } else {
                None
            }
        })];
        if let Screen::Member(s) = &self.screen {
            let carousel = s.carousel();
            if carousel.is_armed() && !s.status.loading {
                subs.push(iced::time::every(carousel.tick_interval()).map(|_| Message::CarouselTick));
            }
        }
        Subscription::batch(subs)
    }

    pub fn theme(&self) -> Theme {
        Theme::Light
    }

    // --- VIEW COMPONENTS ---

    fn view_sidebar(&self) -> Element<'_, Message> {
        let sidebar_width = self.config.window.sidebar_width;

        let brand = column![
            text("AMCHAM")
                .size(30)
                .font(iced::font::Font::MONOSPACE)
                .color(style::TEXT_ON_BRAND),
            text("DIRECTORY").size(14).color(style::STROKE_DIM),
        ];

        let nav_btn = |mode: ViewMode| {
            let is_active = self.current_view == mode;
            let bg = if is_active {
                style::BRAND_RED
            } else {
                Color::TRANSPARENT
            };
            let txt = if is_active {
                style::TEXT_ON_BRAND
            } else {
                style::STROKE_DIM
            };
            button(text(localize(self.lang, mode.nav_label())).color(txt).size(16))
                .on_press(Message::SwitchView(mode))
                .style(move |_, _| button::Style {
                    background: Some(bg.into()),
                    border: Border {
                        radius: 8.0.into(),
                        ..Default::default()
                    },
                    text_color: txt,
                    ..Default::default()
                })
                .width(Length::Fill)
                .padding(12)
        };

        let mut nav = column![].spacing(10);
        for mode in ViewMode::ALL {
            nav = nav.push(nav_btn(mode));
        }

        container(column![brand, Space::new().height(40), nav])
            .width(Length::Fixed(sidebar_width))
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(style::BG_SIDEBAR.into()),
                ..Default::default()
            })
            .padding(20)
            .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let lang = self.lang;
        let title = match (&self.screen, self.current_view) {
            (Screen::Member(s), _) => s
                .company()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| localize(lang, Text::NavMember).to_string()),
            (_, ViewMode::Profile) => localize(lang, Text::ProfileTitle).to_string(),
            (_, ViewMode::Hours) => localize(lang, Text::HoursTitle).to_string(),
            (_, ViewMode::Media) => localize(lang, Text::GalleryTitle).to_string(),
            (_, ViewMode::Member) => localize(lang, Text::NavMember).to_string(),
            (_, ViewMode::Statistics) => localize(lang, Text::StatsTitle).to_string(),
        };

        let saving = self.screen.status().is_some_and(|s| s.saving);
        let status: Element<'_, Message> = if self.screen.is_loading() {
            let label = if saving { Text::Saving } else { Text::Loading };
            text(localize(lang, label))
                .size(14)
                .color(style::TEXT_MUTED)
                .into()
        } else if let Some(err) = self.screen.error() {
            let mut status = row![
                container(text("!").size(12).color(style::TEXT_ON_BRAND))
                    .padding([2, 6])
                    .style(|_| container::Style {
                        background: Some(style::NEGATIVE.into()),
                        border: Border {
                            radius: 10.0.into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    }),
                text(err.localized(lang)).size(14).color(style::NEGATIVE)
            ]
            .spacing(8)
            .align_y(Alignment::Center);
            if err.is_retryable() {
                status = status.push(
                    button(text(localize(lang, Text::Retry)).size(13))
                        .on_press(Message::Retry)
                        .padding([6, 12])
                        .style(secondary_btn_style),
                );
            }
            status.into()
        } else {
            Space::new().into()
        };

        row![
            text(title).size(28).color(style::TEXT_DARK),
            Space::new().width(Length::Fill),
            status,
            Space::new().width(10),
            button(text(lang.toggled().code().to_uppercase()).size(14))
                .on_press(Message::ToggleLanguage)
                .padding(10)
                .style(secondary_btn_style)
        ]
        .align_y(Alignment::Center)
        .into()
    }

    fn view_login_required(&self) -> Element<'_, Message> {
        card_container(
            column![
                text(localize(self.lang, Text::SessionExpired))
                    .size(20)
                    .color(style::TEXT_DARK),
                text(localize(self.lang, Text::SessionExpiredRedirect))
                    .size(14)
                    .color(style::TEXT_MUTED),
            ]
            .spacing(10),
        )
        .width(Length::Fill)
        .into()
    }

    fn view_profile<'a>(&'a self, s: &'a ProfileScreen) -> Element<'a, Message> {
        let lang = self.lang;
        let form = s.form();

        let mut fields = column![].spacing(16);
        for field in ProfileField::TEXT_FIELDS {
            let label = localize(lang, field.label());
            let input = styled_input(label, form.text(field), move |v| {
                Message::ProfileText(field, v)
            });
            fields = fields.push(labeled(label, input, s.field_error(field)));
        }

        let sectors: Vec<Choice> = s
            .sectors()
            .iter()
            .map(|sector| Choice {
                id: sector.id,
                label: sector.name(lang).to_string(),
            })
            .collect();
        let selected_sector = form.sector_id.map(|id| Choice {
            id,
            label: s.sector_name(id).to_string(),
        });
        let country_label = |id: i64| format!("{} {}", s.country_icon(id), s.country_name(id));
        let countries: Vec<Choice> = s
            .countries()
            .iter()
            .map(|country| Choice {
                id: country.id,
                label: country_label(country.id),
            })
            .collect();
        let selected_country = form.country_id.map(|id| Choice {
            id,
            label: country_label(id),
        });

        let sector_pick = pick_list(sectors, selected_sector, Message::ProfileSector)
            .placeholder(localize(lang, Text::Sector))
            .width(Length::Fill);
        let country_pick = pick_list(countries, selected_country, Message::ProfileCountry)
            .placeholder(localize(lang, Text::Country))
            .width(Length::Fill);

        let pickers = row![
            labeled(
                localize(lang, Text::Sector),
                sector_pick.into(),
                s.field_error(ProfileField::Sector)
            ),
            labeled(
                localize(lang, Text::Country),
                country_pick.into(),
                s.field_error(ProfileField::Country)
            ),
        ]
        .spacing(20);

        let preview = match s.logo_preview() {
            Some(LogoPreview::Remote(url)) => url.clone(),
            Some(LogoPreview::Pending(name)) => name.clone(),
            None => localize(lang, Text::NoData).to_string(),
        };
        let mut logo = column![
            text(localize(lang, Text::ChangeLogo))
                .size(13)
                .color(style::TEXT_MUTED),
            text(preview).size(14).color(style::TEXT_DARK),
            row![
                styled_input(
                    localize(lang, Text::ImagePath),
                    &self.ui.logo_path,
                    Message::LogoPathChanged
                ),
                button(text(localize(lang, Text::ChangeLogo)).size(13))
                    .on_press(Message::PickLogo)
                    .padding([8, 14])
                    .style(secondary_btn_style),
                button(text(localize(lang, Text::DeleteLogo)).size(13))
                    .on_press_maybe(s.logo_preview().map(|_| Message::DeleteLogo))
                    .padding([8, 14])
                    .style(danger_btn_style),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        ]
        .spacing(8);
        if let Some(err) = &self.ui.upload_error {
            logo = logo.push(text(err.clone()).size(12).color(style::NEGATIVE));
        }

        let saving = s.status.saving;
        let actions = row![
            Space::new().width(Length::Fill),
            button(text(localize(lang, Text::Reset)).size(14))
                .on_press_maybe((!saving).then_some(Message::ResetProfile))
                .padding([10, 20])
                .style(secondary_btn_style),
            button(text(localize(lang, save_label(saving))).size(14))
                .on_press_maybe((!saving && s.company().is_some()).then_some(Message::SubmitProfile))
                .padding([10, 20])
                .style(primary_btn_style),
        ]
        .spacing(10);

        column![
            card_container(logo).width(Length::Fill),
            card_container(column![fields, pickers].spacing(16)).width(Length::Fill),
            actions,
        ]
        .spacing(20)
        .into()
    }

    fn view_hours<'a>(&'a self, s: &'a HoursScreen) -> Element<'a, Message> {
        let lang = self.lang;
        let mut rows = column![].spacing(12);

        for hours in s.form().days() {
            let day = hours.day;
            let toggle = checkbox(hours.open).on_toggle(move |_| Message::ToggleDay(day));
            let name = text(day.localized(lang))
                .size(15)
                .color(style::TEXT_DARK)
                .width(Length::Fixed(120.0));

            let times: Element<'_, Message> = if hours.open {
                let time_field = |field: TimeField, label: Text, value: &str| {
                    let input = time_input(value, move |v| Message::TimeChanged(day, field, v));
                    let error = s.errors().get((day, field)).map(|e| e.localized(lang));
                    labeled(localize(lang, label), input, error)
                };
                row![
                    time_field(TimeField::Opening, Text::Opening, &hours.opening),
                    time_field(TimeField::Closing, Text::Closing, &hours.closing),
                ]
                .spacing(16)
                .into()
            } else {
                text(localize(lang, Text::Closed))
                    .size(14)
                    .color(style::TEXT_MUTED)
                    .into()
            };

            rows = rows.push(
                row![toggle, name, times]
                    .spacing(12)
                    .align_y(Alignment::Center),
            );
        }

        let saving = s.status.saving;
        column![
            card_container(rows).width(Length::Fill),
            row![
                Space::new().width(Length::Fill),
                button(text(localize(lang, save_label(saving))).size(14))
                    .on_press_maybe((!saving && s.company().is_some()).then_some(Message::SubmitHours))
                    .padding([10, 20])
                    .style(primary_btn_style),
            ],
        ]
        .spacing(20)
        .into()
    }

    fn view_media<'a>(&'a self, s: &'a MediaScreen) -> Element<'a, Message> {
        let lang = self.lang;

        let mut gallery = column![
            text(localize(lang, Text::GalleryTitle))
                .size(18)
                .color(style::TEXT_DARK)
        ]
        .spacing(10);
        if s.photos().is_empty() {
            gallery = gallery.push(
                text(localize(lang, Text::NoPhotos))
                    .size(14)
                    .color(style::TEXT_MUTED),
            );
        }
        for (index, photo) in s.photos().iter().enumerate() {
            let color = match photo {
                Photo::Pending(_) => style::BRAND_BLUE,
                Photo::Stored(_) => style::TEXT_DARK,
            };
            gallery = gallery.push(
                row![
                    text(photo.label().to_string()).size(14).color(color),
                    Space::new().width(Length::Fill),
                    button(text(localize(lang, Text::DeletePhoto)).size(12))
                        .on_press(Message::RemovePhoto(index))
                        .padding([6, 12])
                        .style(danger_btn_style),
                ]
                .align_y(Alignment::Center),
            );
        }
        gallery = gallery.push(
            row![
                styled_input(
                    localize(lang, Text::ImagePath),
                    &self.ui.photo_path,
                    Message::PhotoPathChanged
                ),
                button(text(localize(lang, Text::AddPhoto)).size(13))
                    .on_press(Message::PickPhoto)
                    .padding([8, 14])
                    .style(secondary_btn_style),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
        if let Some(err) = s.upload_error() {
            gallery = gallery.push(text(err).size(12).color(style::NEGATIVE));
        }

        let video_input = row![
            styled_input(
                localize(lang, Text::VideoUrlLabel),
                s.video_url(),
                Message::VideoUrlChanged
            ),
            button(text("✕").size(13))
                .on_press(Message::ClearVideo)
                .padding([8, 12])
                .style(secondary_btn_style),
        ]
        .spacing(10)
        .align_y(Alignment::Center);
        let mut video = column![
            text(localize(lang, Text::VideoTitle))
                .size(18)
                .color(style::TEXT_DARK),
            labeled(
                localize(lang, Text::VideoUrlLabel),
                video_input.into(),
                s.video_error().map(|e| e.localized(lang))
            ),
        ]
        .spacing(10);
        if let Some(embed) = s.embed_url() {
            video = video.push(text(embed).size(12).color(style::TEXT_MUTED));
        }

        let saving = s.status.saving;
        column![
            card_container(gallery).width(Length::Fill),
            card_container(video).width(Length::Fill),
            row![
                Space::new().width(Length::Fill),
                button(text(localize(lang, save_label(saving))).size(14))
                    .on_press_maybe((!saving && s.company().is_some()).then_some(Message::SubmitMedia))
                    .padding([10, 20])
                    .style(primary_btn_style),
            ],
        ]
        .spacing(20)
        .into()
    }

    fn view_member<'a>(&'a self, s: &'a MemberScreen) -> Element<'a, Message> {
        let lang = self.lang;
        let Some(company) = s.company() else {
            if let Some(ScreenError::NotFound) = &s.status.error {
                return card_container(
                    column![
                        text(localize(lang, Text::MemberNotFound))
                            .size(20)
                            .color(style::TEXT_DARK),
                        text(localize(lang, Text::MemberNotFoundDesc))
                            .size(14)
                            .color(style::TEXT_MUTED),
                    ]
                    .spacing(10),
                )
                .width(Length::Fill)
                .into();
            }
            return Space::new().into();
        };

        // Identity card
        let initial = s.initial().map(String::from).unwrap_or_default();
        let badge = container(text(initial).size(28).color(style::TEXT_ON_BRAND))
            .padding([12, 20])
            .style(|_| container::Style {
                background: Some(style::BRAND_BLUE.into()),
                border: Border {
                    radius: 12.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            });
        let (open_text, open_color) = if s.is_open_now(self.ctx.clock.as_ref()) {
            (Text::OpenNow, style::POSITIVE)
        } else {
            (Text::ClosedNow, style::NEGATIVE)
        };
        let mut details = column![
            text(company.name.clone()).size(22).color(style::TEXT_DARK),
            text(company.sector.clone().unwrap_or_default())
                .size(14)
                .color(style::TEXT_MUTED),
            text(localize(lang, open_text)).size(13).color(open_color),
        ]
        .spacing(6);
        let address = s.full_address();
        if !address.is_empty() {
            details = details.push(text(address).size(14).color(style::TEXT_DARK));
        }
        for line in [company.email.clone(), company.telephone.clone(), s.website_url()]
            .into_iter()
            .flatten()
        {
            details = details.push(text(line).size(14).color(style::BRAND_BLUE));
        }
        if let Some(description) = &company.description {
            details = details.push(text(description.clone()).size(14).color(style::TEXT_DARK));
        }
        for link in [s.map_url(), s.video_embed_url()].into_iter().flatten() {
            details = details.push(text(link).size(12).color(style::TEXT_MUTED));
        }
        let identity = card_container(row![badge, details].spacing(20)).width(Length::Fill);

        // Opening hours
        let mut hours = column![
            text(localize(lang, Text::OpeningHours))
                .size(18)
                .color(style::TEXT_DARK)
        ]
        .spacing(8);
        for (day, line) in s.formatted_hours() {
            hours = hours.push(row![
                text(day).size(14).color(style::TEXT_MUTED).width(Length::Fixed(120.0)),
                text(line).size(14).color(style::TEXT_DARK),
            ]);
        }

        // Ratings carousel
        let summary = row![
            text(format!("{:.1}", s.average_rating()))
                .size(28)
                .color(style::TEXT_DARK),
            stars(s.average_rating().round() as u8),
            text(s.review_count_label()).size(14).color(style::TEXT_MUTED),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let carousel = s.carousel();
        let mut slides = row![].spacing(16);
        for rating in carousel.visible() {
            slides = slides.push(rating_card(rating));
        }
        let mut dots = row![].spacing(6);
        for i in 0..carousel.dot_count() {
            let color = if i == carousel.active_dot() {
                style::BRAND_RED
            } else {
                style::STROKE_DIM
            };
            dots = dots.push(container(Space::new().width(8).height(8)).style(move |_| {
                container::Style {
                    background: Some(color.into()),
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            }));
        }

        let mut reviews = column![
            row![
                text(localize(lang, Text::Reviews))
                    .size(18)
                    .color(style::TEXT_DARK),
                Space::new().width(Length::Fill),
                button(text(localize(lang, Text::GiveReview)).size(13))
                    .on_press(Message::OpenReview)
                    .padding([8, 14])
                    .style(primary_btn_style),
            ]
            .align_y(Alignment::Center),
            summary,
            slides,
            row![
                dots,
                Space::new().width(Length::Fill),
                button(text("›").size(18))
                    .on_press(Message::NextRating)
                    .padding([4, 12])
                    .style(secondary_btn_style),
            ]
            .align_y(Alignment::Center),
        ]
        .spacing(14);
        if matches!(s.review_stage(), ReviewStage::Editing | ReviewStage::Submitting) {
            reviews = reviews.push(self.view_review_form(s));
        }

        // Similar members
        let mut similar = column![
            text(localize(lang, Text::SimilarMembers))
                .size(18)
                .color(style::TEXT_DARK)
        ]
        .spacing(8);
        for other in s.similar() {
            similar = similar.push(
                button(text(other.name.clone()).size(14))
                    .on_press(Message::OpenMember(other.id))
                    .padding([8, 14])
                    .width(Length::Fill)
                    .style(secondary_btn_style),
            );
        }

        column![
            identity,
            row![
                card_container(hours).width(Length::FillPortion(1)),
                card_container(similar).width(Length::FillPortion(1)),
            ]
            .spacing(20),
            card_container(reviews).width(Length::Fill),
        ]
        .spacing(20)
        .into()
    }

    fn view_review_form<'a>(&'a self, s: &'a MemberScreen) -> Element<'a, Message> {
        let lang = self.lang;
        let form = s.review();
        let submitting = s.review_stage() == ReviewStage::Submitting;

        let mut score = row![].spacing(4);
        for i in 0..5u8 {
            let glyph = if i < form.score { "★" } else { "☆" };
            score = score.push(
                button(text(glyph).size(22).color(style::STAR))
                    .on_press(Message::ReviewScore(i + 1))
                    .padding(2)
                    .style(|_, _| button::Style::default()),
            );
        }

        let mut form_col = column![
            row![
                styled_input(
                    localize(lang, Text::FirstName),
                    &form.first_name,
                    Message::ReviewFirstName
                ),
                styled_input(
                    localize(lang, Text::LastName),
                    &form.last_name,
                    Message::ReviewLastName
                ),
            ]
            .spacing(10),
            score,
            styled_input(
                localize(lang, Text::Comment),
                &form.comment,
                Message::ReviewComment
            ),
        ]
        .spacing(10);
        if let Some(err) = s.review_error() {
            form_col = form_col.push(text(err).size(12).color(style::NEGATIVE));
        }
        let send_label = if submitting { Text::Saving } else { Text::Send };
        form_col = form_col.push(
            row![
                Space::new().width(Length::Fill),
                button(text(localize(lang, Text::Cancel)).size(13))
                    .on_press_maybe((!submitting).then_some(Message::CloseReview))
                    .padding([8, 14])
                    .style(secondary_btn_style),
                button(text(localize(lang, send_label)).size(13))
                    .on_press_maybe((!submitting).then_some(Message::SubmitReview))
                    .padding([8, 14])
                    .style(primary_btn_style),
            ]
            .spacing(10),
        );

        container(form_col)
            .padding(16)
            .style(|_| container::Style {
                background: Some(style::BG_PAGE.into()),
                border: Border {
                    color: style::STROKE_DIM,
                    width: 1.0,
                    radius: 12.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn view_statistics<'a>(&'a self, s: &'a StatisticsScreen) -> Element<'a, Message> {
        let lang = self.lang;

        let mut metrics = row![].spacing(20);
        for card in s.metrics() {
            let growth_color = if card.positive {
                style::POSITIVE
            } else {
                style::NEGATIVE
            };
            metrics = metrics.push(
                card_container(
                    column![
                        text(card.title).size(13).color(style::TEXT_MUTED),
                        text(card.value).size(26).color(style::TEXT_DARK),
                        row![
                            text(card.growth).size(13).color(growth_color),
                            text(card.period).size(13).color(style::TEXT_MUTED),
                        ]
                        .spacing(6),
                    ]
                    .spacing(8),
                )
                .width(Length::FillPortion(1)),
            );
        }

        let line = Canvas::new(LineChart {
            model: s.line_chart(),
            cache: &self.ui.line_cache,
        })
        .width(Length::Fill)
        .height(Length::Fixed(260.0));

        let pie_model = s.pie_chart();
        let pie = Canvas::new(PieChart {
            model: pie_model,
            center_label: localize(lang, Text::ContactsLabel).to_string(),
            cache: &self.ui.pie_cache,
        })
        .width(Length::Fill)
        .height(Length::Fixed(220.0));

        let mut legend = column![].spacing(6);
        for (i, slice) in pie_model.slices.iter().enumerate() {
            let color = style::PIE_COLORS[i % style::PIE_COLORS.len()];
            legend = legend.push(
                row![
                    container(Space::new().width(10).height(10)).style(move |_| container::Style {
                        background: Some(color.into()),
                        border: Border {
                            radius: 5.0.into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    }),
                    text(slice.label).size(13).color(style::TEXT_DARK),
                    Space::new().width(Length::Fill),
                    text(slice.value.to_string()).size(13).color(style::TEXT_MUTED),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            );
        }

        let export_label = if self.ui.is_exporting {
            "..."
        } else {
            localize(lang, Text::ExportCsv)
        };
        let toolbar = row![
            Space::new().width(Length::Fill),
            button(text(localize(lang, Text::Refresh)).size(13))
                .on_press_maybe((!s.loading).then_some(Message::RefreshStats))
                .padding([8, 14])
                .style(secondary_btn_style),
            button(text(export_label).size(13))
                .on_press_maybe((s.is_loaded() && !self.ui.is_exporting).then_some(Message::ExportCsv))
                .padding([8, 14])
                .style(primary_btn_style),
        ]
        .spacing(10);

        let line_card = card_container(
            column![
                text(localize(lang, Text::ProfileViews))
                    .size(16)
                    .color(style::TEXT_DARK),
                Element::from(line).map(|_| Message::ChartInteraction),
            ]
            .spacing(12),
        )
        .width(Length::FillPortion(3));
        let pie_card = card_container(
            column![
                text(localize(lang, Text::ContactsReceived))
                    .size(16)
                    .color(style::TEXT_DARK),
                Element::from(pie).map(|_| Message::ChartInteraction),
                legend,
            ]
            .spacing(12),
        )
        .width(Length::FillPortion(2));

        column![toolbar, metrics, row![line_card, pie_card].spacing(20)]
            .spacing(20)
            .into()
    }
}

/// Run `fut` under the screen's lifecycle; a torn-down screen yields [`Message::Cancelled`].
fn guarded<T>(
    lifecycle: &Lifecycle,
    fut: impl Future<Output = T> + Send + 'static,
    on_done: impl FnOnce(T) -> Message + Send + 'static,
) -> Task<Message>
where
    T: Send + 'static,
{
    Task::perform(lifecycle.guard(fut), move |out| match out {
        Some(value) => on_done(value),
        None => Message::Cancelled,
    })
}

fn effect_task(lifecycle: &Lifecycle, effect: Option<Effect>) -> Task<Message> {
    match effect {
        Some(Effect::RedirectToLogin { after }) => {
            guarded(lifecycle, tokio::time::sleep(after), |_| Message::LoginRedirect)
        }
        Some(Effect::ClearNotice { after }) => {
            guarded(lifecycle, tokio::time::sleep(after), |_| Message::NoticeExpired)
        }
        None => Task::none(),
    }
}

fn carousel_task(lifecycle: &Lifecycle, effect: Option<CarouselEffect>) -> Task<Message> {
    match effect {
        Some(CarouselEffect::Snap { after }) => {
            guarded(lifecycle, tokio::time::sleep(after), |_| Message::CarouselSnap)
        }
        Some(CarouselEffect::RestoreTransition { after }) => {
            guarded(lifecycle, tokio::time::sleep(after), |_| Message::CarouselRestore)
        }
        None => Task::none(),
    }
}

fn pick_file(
    path: &str,
    on_picked: fn(Result<Upload, UploadError>) -> Message,
) -> Task<Message> {
    let path = path.trim();
    if path.is_empty() {
        return Task::none();
    }
    Task::perform(Upload::from_path(PathBuf::from(path)), on_picked)
}

fn save_label(saving: bool) -> Text {
    if saving { Text::Saving } else { Text::Save }
}

// --- HELPER FUNCTIONS ---
fn card_container<'a>(
    content: impl Into<Element<'a, Message>>,
) -> container::Container<'a, Message> {
    container(content).padding(24).style(|_| container::Style {
        background: Some(style::BG_CARD.into()),
        border: Border {
            color: style::STROKE_DIM,
            width: 1.0,
            radius: 16.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
            offset: Vector::new(0.0, 4.0),
            blur_radius: 10.0,
        },
        ..Default::default()
    })
}

fn labeled<'a>(
    label: &str,
    input: Element<'a, Message>,
    error: Option<String>,
) -> Element<'a, Message> {
    let mut col = column![text(label.to_string()).size(13).color(style::TEXT_MUTED), input].spacing(6);
    if let Some(error) = error {
        col = col.push(text(error).size(12).color(style::NEGATIVE));
    }
    col.into()
}

fn input_style(_: &Theme, status: text_input::Status) -> text_input::Style {
    let border_color = if matches!(status, text_input::Status::Focused { .. }) {
        style::BRAND_BLUE
    } else {
        style::STROKE_DIM
    };
    text_input::Style {
        background: style::BG_CARD.into(),
        border: Border {
            color: border_color,
            width: 1.0,
            radius: 6.0.into(),
        },
        icon: style::TEXT_MUTED,
        placeholder: style::TEXT_MUTED,
        value: style::TEXT_DARK,
        selection: style::STROKE_DIM,
    }
}

fn styled_input<'a>(
    placeholder: &str,
    val: &str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    text_input(placeholder, val)
        .on_input(on_change)
        .padding(10)
        .width(Length::Fill)
        .size(14)
        .style(input_style)
        .into()
}

fn time_input<'a>(val: &str, on_change: impl Fn(String) -> Message + 'a) -> Element<'a, Message> {
    text_input("HH:MM", val)
        .on_input(on_change)
        .padding(8)
        .width(Length::Fixed(90.0))
        .size(13)
        .style(input_style)
        .into()
}

fn stars<'a>(score: u8) -> Element<'a, Message> {
    let line: String = (0..5).map(|i| if i < score { '★' } else { '☆' }).collect();
    text(line).size(16).color(style::STAR).into()
}

fn rating_card<'a>(rating: &Rating) -> Element<'a, Message> {
    let name = format!("{} {}", rating.first_name, rating.last_name);
    let initial = rating.initial().map(String::from).unwrap_or_default();
    container(
        column![
            row![
                container(text(initial).size(14).color(style::TEXT_ON_BRAND))
                    .padding([4, 10])
                    .style(|_| container::Style {
                        background: Some(style::BRAND_RED.into()),
                        border: Border {
                            radius: 12.0.into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    }),
                text(name.trim().to_string()).size(14).color(style::TEXT_DARK),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            stars(rating.score),
            text(rating.comment.clone()).size(13).color(style::TEXT_MUTED),
        ]
        .spacing(8),
    )
    .padding(16)
    .width(Length::FillPortion(1))
    .style(|_| container::Style {
        background: Some(style::BG_PAGE.into()),
        border: Border {
            radius: 12.0.into(),
            ..Default::default()
        },
        ..Default::default()
    })
    .into()
}

fn primary_btn_style(_: &Theme, _: button::Status) -> button::Style {
    button::Style {
        background: Some(style::BRAND_BLUE.into()),
        text_color: style::TEXT_ON_BRAND,
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn secondary_btn_style(_: &Theme, _: button::Status) -> button::Style {
    button::Style {
        background: Some(style::BG_CARD.into()),
        text_color: style::TEXT_DARK,
        border: Border {
            radius: 6.0.into(),
            color: style::STROKE_DIM,
            width: 1.0,
        },
        ..Default::default()
    }
}

fn danger_btn_style(_: &Theme, _: button::Status) -> button::Style {
    button::Style {
        background: Some(style::BG_CARD.into()),
        text_color: style::BRAND_RED,
        border: Border {
            radius: 6.0.into(),
            color: style::BRAND_RED,
            width: 1.0,
        },
        ..Default::default()
    }
}
