//! Photo gallery and presentation video.

use tracing::{debug, info};

use crate::{
    api::{CompanyUpdate, PictureUpdate},
    i18n::{Language, Text},
    models::Company,
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus, resolve_company_id},
    upload::{Upload, UploadError},
    validation::ValidationError,
};

/// One tile of the gallery.
#[derive(Debug, Clone, PartialEq)]
pub enum Photo {
    /// Already on the server.
    Stored(String),
    /// Picked locally, uploaded with the next save.
    Pending(Upload),
}

impl Photo {
    pub fn is_pending(&self) -> bool {
        matches!(self, Photo::Pending(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Photo::Stored(url) => url,
            Photo::Pending(upload) => &upload.file_name,
        }
    }
}

/// Accepts YouTube, Vimeo and generic embed links.
pub fn is_valid_video_url(url: &str) -> bool {
    !url.is_empty()
        && (url.contains("youtube.com")
            || url.contains("youtu.be")
            || url.contains("vimeo.com")
            || url.contains("embed"))
}

/// Player URL for a watch or share link; other URLs are returned unchanged.
pub fn to_embed_url(url: &str) -> String {
    let id_after = |marker: &str, stops: &[char]| -> Option<String> {
        let (_, rest) = url.split_once(marker)?;
        let id = rest.split(stops).next().unwrap_or_default();
        (!id.is_empty()).then(|| id.to_string())
    };

    if url.contains("youtube.com/watch") {
        if let Some(id) = id_after("v=", &['&', '#']) {
            return format!("https://www.youtube.com/embed/{id}");
        }
    } else if url.contains("youtu.be/") {
        if let Some(id) = id_after("youtu.be/", &['?', '&', '#']) {
            return format!("https://www.youtube.com/embed/{id}");
        }
    } else if url.contains("vimeo.com/") && !url.contains("player.vimeo.com") {
        if let Some(id) = id_after("vimeo.com/", &['?', '#', '/']) {
            return format!("https://player.vimeo.com/video/{id}");
        }
    }
    url.to_string()
}

pub struct MediaScreen {
    pub lang: Language,
    lifecycle: Lifecycle,
    pub status: ScreenStatus,
    company: Option<Company>,
    photos: Vec<Photo>,
    video_url: String,
    /// Last rejected file, shown until the next pick.
    upload_error: Option<UploadError>,
}

impl MediaScreen {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            lifecycle: Lifecycle::new(),
            status: ScreenStatus {
                loading: true,
                ..Default::default()
            },
            company: None,
            photos: Vec::new(),
            video_url: String::new(),
            upload_error: None,
        }
    }

    pub async fn fetch(ctx: ScreenContext) -> Result<Company, ScreenError> {
        let company_id = resolve_company_id(&ctx).await?;
        ctx.api
            .company(company_id)
            .await
            .map_err(|e| ScreenError::from_load(Text::MediaLoadError, e))
    }

    pub fn apply(&mut self, result: Result<Company, ScreenError>, ctx: &ScreenContext) -> Option<Effect> {
        match result {
            Ok(company) => {
                info!(company_id = company.id, photos = company.pictures.len(), "media loaded");
                self.photos = company.pictures.iter().cloned().map(Photo::Stored).collect();
                self.video_url = company.video_link.clone().unwrap_or_default();
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

    /// Queue a picked file. Rejected files leave the gallery unchanged.
    pub fn add_photo(&mut self, upload: Result<Upload, UploadError>) {
        match upload {
            Ok(upload) => {
                debug!(file = %upload.file_name, size = upload.len(), "photo queued");
                self.upload_error = None;
                self.photos.push(Photo::Pending(upload));
            }
            Err(err) => {
                debug!(error = %err, "photo rejected");
                self.upload_error = Some(err);
            }
        }
    }

    /// Remove a tile; a pending file goes with it.
    pub fn remove_photo(&mut self, index: usize) -> Option<Photo> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn set_video_url(&mut self, url: impl Into<String>) {
        self.video_url = url.into();
    }

    pub fn clear_video(&mut self) {
        self.video_url.clear();
    }

    pub fn video_error(&self) -> Option<ValidationError> {
        let url = self.video_url.trim();
        (!url.is_empty() && !is_valid_video_url(url)).then_some(ValidationError::VideoUrl)
    }

    pub fn prepare_save(&mut self) -> Result<(i64, CompanyUpdate), ScreenError> {
        self.status.success = None;
        self.status.error = None;
        if self.video_error().is_some() {
            self.status.error = Some(ScreenError::Invalid);
            return Err(ScreenError::Invalid);
        }
        let Some(company) = self.company.as_ref().filter(|c| c.id > 0) else {
            self.status.error = Some(ScreenError::MissingCompanyId);
            return Err(ScreenError::MissingCompanyId);
        };

        let pending: Vec<Upload> = self
            .photos
            .iter()
            .filter_map(|p| match p {
                Photo::Pending(upload) => Some(upload.clone()),
                Photo::Stored(_) => None,
            })
            .collect();
        let update = CompanyUpdate {
            video_link: self.video_url.trim().to_string(),
            pictures: if pending.is_empty() {
                PictureUpdate::Keep
            } else {
                PictureUpdate::Append(pending)
            },
            ..CompanyUpdate::from_company(company)
        };
        let id = company.id;
        self.status.begin_save();
        Ok((id, update))
    }

    pub async fn save(ctx: ScreenContext, id: i64, update: CompanyUpdate) -> Result<(), ScreenError> {
        ctx.api
            .update_company(id, &update)
            .await
            .map_err(|e| ScreenError::from_save(Text::MediaSaveError, e))
    }

    pub fn apply_saved(&mut self, result: Result<(), ScreenError>, ctx: &ScreenContext) -> Option<Effect> {
        match result {
            Ok(()) => {
                info!("media saved");
                Some(self.status.saved(Text::MediaSaveSuccess, ctx))
            }
            Err(err) => self.status.fail(err, ctx),
        }
    }

    pub async fn submit(&mut self, ctx: &ScreenContext) -> Option<Effect> {
        if self.status.saving {
            return None;
        }
        let (id, update) = self.prepare_save().ok()?;
        let result = self.lifecycle.guard(Self::save(ctx.clone(), id, update)).await?;
        self.apply_saved(result, ctx)
    }

    pub fn clear_notice(&mut self) {
        self.status.clear_notice();
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn pending_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_pending()).count()
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    /// Player URL for the preview, when the link is usable.
    pub fn embed_url(&self) -> Option<String> {
        let url = self.video_url.trim();
        is_valid_video_url(url).then(|| to_embed_url(url))
    }

    pub fn upload_error(&self) -> Option<String> {
        self.upload_error.as_ref().map(|e| e.localized(self.lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_screen() -> MediaScreen {
        let mut screen = MediaScreen::new(Language::En);
        let company = Company {
            id: 7,
            name: "Acme".into(),
            pictures: vec!["a.jpg".into(), "b.jpg".into()],
            video_link: Some("https://youtu.be/abc123".into()),
            ..Default::default()
        };
        screen.photos = company.pictures.iter().cloned().map(Photo::Stored).collect();
        screen.video_url = company.video_link.clone().unwrap_or_default();
        screen.company = Some(company);
        screen.status.loaded();
        screen
    }

    fn png(name: &str) -> Result<Upload, UploadError> {
        Upload::new(name, vec![0x89, 0x50])
    }

    #[test]
    fn test_embed_conversion() {
        assert_eq!(
            to_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            to_embed_url("https://youtu.be/dQw4w9WgXcQ?si=x"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            to_embed_url("https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            to_embed_url("https://player.vimeo.com/video/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
        assert_eq!(
            to_embed_url("https://www.youtube.com/embed/xyz"),
            "https://www.youtube.com/embed/xyz"
        );
    }

    #[test]
    fn test_video_url_acceptance() {
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=1"));
        assert!(is_valid_video_url("https://vimeo.com/1"));
        assert!(is_valid_video_url("https://example.com/embed/1"));
        assert!(!is_valid_video_url("https://example.com/video.mp4"));
        assert!(!is_valid_video_url(""));
    }

    #[test]
    fn test_payload_appends_only_new_files() {
        let mut screen = loaded_screen();
        screen.add_photo(png("new.png"));
        let (id, update) = screen.prepare_save().unwrap();
        assert_eq!(id, 7);
        match update.pictures {
            PictureUpdate::Append(files) => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].file_name, "new.png");
            }
            PictureUpdate::Keep => panic!("expected appended pictures"),
        }
        assert_eq!(update.video_link, "https://youtu.be/abc123");
        assert_eq!(update.logo, crate::api::LogoUpdate::Keep);
    }

    #[test]
    fn test_no_new_files_keeps_pictures() {
        let mut screen = loaded_screen();
        let (_, update) = screen.prepare_save().unwrap();
        assert_eq!(update.pictures, PictureUpdate::Keep);
        assert!(!update.has_files());
    }

    #[test]
    fn test_removing_pending_photo_drops_its_file() {
        let mut screen = loaded_screen();
        screen.add_photo(png("one.png"));
        screen.add_photo(png("two.png"));
        assert_eq!(screen.pending_count(), 2);

        let removed = screen.remove_photo(2).unwrap();
        assert_eq!(removed.label(), "one.png");
        assert_eq!(screen.pending_count(), 1);
        assert_eq!(screen.photos().len(), 3);

        screen.remove_photo(0);
        let (_, update) = screen.prepare_save().unwrap();
        match update.pictures {
            PictureUpdate::Append(files) => assert_eq!(files[0].file_name, "two.png"),
            PictureUpdate::Keep => panic!("expected appended pictures"),
        }
        assert!(screen.remove_photo(10).is_none());
    }

    #[test]
    fn test_rejected_upload_is_reported() {
        let mut screen = loaded_screen();
        screen.add_photo(Upload::new("doc.pdf", vec![1]));
        assert_eq!(screen.photos().len(), 2);
        assert!(screen.upload_error().is_some());
        screen.add_photo(png("ok.png"));
        assert!(screen.upload_error().is_none());
    }

    #[test]
    fn test_invalid_video_blocks_save() {
        let mut screen = loaded_screen();
        screen.set_video_url("https://example.com/clip.mp4");
        assert_eq!(screen.video_error(), Some(ValidationError::VideoUrl));
        assert_eq!(screen.prepare_save().unwrap_err(), ScreenError::Invalid);
        assert!(!screen.status.saving);

        screen.clear_video();
        assert_eq!(screen.video_error(), None);
        let (_, update) = screen.prepare_save().unwrap();
        assert_eq!(update.video_link, "");
    }

    #[test]
    fn test_embed_preview() {
        let screen = loaded_screen();
        assert_eq!(
            screen.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }
}
