//! AmCham Directory Library
//!
//! Screen controllers of the member console (profile, opening hours, media,
//! public member page, statistics) and the REST client they share. The
//! desktop front end lives behind the `gui` feature.

pub mod api;
pub mod carousel;
pub mod config;
pub mod format;
pub mod i18n;
pub mod media;
pub mod member;
pub mod models;
pub mod profile;
pub mod schedule;
pub mod screen;
pub mod statistics;
pub mod traits;
pub mod upload;
pub mod validation;

// GUI-only modules
#[cfg(feature = "gui")]
pub mod style;
#[cfg(feature = "gui")]
pub mod widgets;

// Re-export commonly used types
pub use api::{ApiError, CompanyUpdate, DirectoryApiClient, LogoUpdate, PictureUpdate};
pub use carousel::{Carousel, CarouselEffect, CarouselMode, items_per_view};
pub use config::AppConfig;
pub use i18n::{Language, Text, localize};
pub use media::{MediaScreen, Photo, is_valid_video_url, to_embed_url};
pub use member::{MemberScreen, ReviewForm, ReviewStage};
pub use models::{
    Company, CompanySchedule, ContactTimeline, ContactTotal, Country, CurrentUser, DayOfWeek,
    ProfileViewTotal, Rating, Sector, ViewPoint,
};
pub use profile::{ProfileField, ProfileScreen};
pub use schedule::{HoursScreen, WeeklyHours, is_open_at};
pub use screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus, Session};
pub use statistics::{StatisticsScreen, StatsData, load_all};
pub use traits::{Clock, MockClock, SystemClock};
pub use upload::{Upload, UploadError};
pub use validation::{FieldErrors, Rule, ValidationError};
