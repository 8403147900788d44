use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{
    RequestBuilder,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::NetworkConfig,
    i18n::{Language, Text, localize, localize_with},
    models::{
        Company, CompanySchedule, ContactTimeline, ContactTotal, Country, CreateRatingRequest,
        CurrentUser, ProfileViewTotal, Rating, Sector, ViewPoint,
    },
    upload::Upload,
};

/// Failure of a single backend call.
///
/// Transport failures carry status 0 so every error maps through
/// [`ApiError::localized`] with the same table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}")]
    Status {
        status: u16,
        /// `message` field of the JSON error body, when present.
        message: Option<String>,
    },
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Transport(_) => 0,
            ApiError::Status { status, .. } => *status,
            ApiError::Decode(_) => 200,
        }
    }

    /// 401 and 403 end the session.
    pub fn is_auth(&self) -> bool {
        matches!(self.status(), 401 | 403)
    }

    pub fn localized(&self, lang: Language) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => return message.clone(),
            ApiError::Decode(_) => return localize(lang, Text::ApiDecode).to_string(),
            _ => {}
        }
        let key = match self.status() {
            0 => Text::ApiUnreachable,
            400 => Text::ApiBadRequest,
            401 => Text::ApiUnauthorized,
            403 => Text::ApiForbidden,
            404 => Text::ApiNotFound,
            500 => Text::ApiServerError,
            503 => Text::ApiUnavailable,
            other => return localize_with(lang, Text::ApiOther, "status", other),
        };
        localize(lang, key).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// New logo for a company update.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoUpdate {
    Keep,
    Replace(Upload),
}

/// Gallery pictures for a company update. The backend appends, never replaces.
#[derive(Debug, Clone, PartialEq)]
pub enum PictureUpdate {
    Keep,
    Append(Vec<Upload>),
}

/// Body of `PUT /companies/{id}`.
///
/// Build it with [`CompanyUpdate::from_company`] so fields a screen does not
/// edit are sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: String,
    pub sector_id: Option<i64>,
    pub description: String,
    #[serde(rename = "country")]
    pub country_id: Option<i64>,
    pub address: String,
    pub email: String,
    pub telephone: String,
    pub web_link: String,
    pub country_amcham_id: i64,
    pub video_link: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip)]
    pub logo: LogoUpdate,
    #[serde(skip)]
    pub pictures: PictureUpdate,
}

impl CompanyUpdate {
    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            sector_id: company.sector_id,
            description: company.description.clone().unwrap_or_default(),
            country_id: company.country_id,
            address: company.address.clone().unwrap_or_default(),
            email: company.email.clone().unwrap_or_default(),
            telephone: company.telephone.clone().unwrap_or_default(),
            web_link: company.web_link.clone().unwrap_or_default(),
            country_amcham_id: company.country_amcham_id.unwrap_or(0),
            video_link: company.video_link.clone().unwrap_or_default(),
            lat: company.lat.unwrap_or(0.0),
            lon: company.lon.unwrap_or(0.0),
            logo: LogoUpdate::Keep,
            pictures: PictureUpdate::Keep,
        }
    }

    pub fn has_files(&self) -> bool {
        matches!(self.logo, LogoUpdate::Replace(_))
            || matches!(&self.pictures, PictureUpdate::Append(files) if !files.is_empty())
    }

    /// Multipart form with one text part per field plus the attached files.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let opt = |v: Option<i64>| v.map(|id| id.to_string()).unwrap_or_default();
        let mut form = Form::new()
            .text("name", self.name.clone())
            .text("sectorId", opt(self.sector_id))
            .text("description", self.description.clone())
            .text("country", opt(self.country_id))
            .text("address", self.address.clone())
            .text("email", self.email.clone())
            .text("telephone", self.telephone.clone())
            .text("webLink", self.web_link.clone())
            .text("countryAmchamId", self.country_amcham_id.to_string())
            .text("videoLink", self.video_link.clone())
            .text("lat", self.lat.to_string())
            .text("lon", self.lon.to_string());

        if let LogoUpdate::Replace(upload) = &self.logo {
            form = form.part("logoFile", file_part(upload)?);
        }
        if let PictureUpdate::Append(files) = &self.pictures {
            for upload in files {
                form = form.part("pictures", file_part(upload)?);
            }
        }
        Ok(form)
    }
}

fn file_part(upload: &Upload) -> Result<Part, ApiError> {
    Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(upload.image_type.mime())
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// Client for the directory REST backend.
#[derive(Clone, Debug)]
pub struct DirectoryApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DirectoryApiClient {
    /// Create a new API client with configurable timeouts.
    pub fn new(base_url: impl Into<String>, network_config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.execute(self.client.get(self.url(path))).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ==================== Account ====================

    /// Who am I: the account behind the bearer token.
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get("/auth/me").await
    }

    // ==================== Companies ====================

    pub async fn company(&self, id: i64) -> Result<Company, ApiError> {
        self.get(&format!("/companies/{}", id)).await
    }

    /// Multipart when files are attached, JSON otherwise.
    pub async fn update_company(&self, id: i64, update: &CompanyUpdate) -> Result<(), ApiError> {
        let path = format!("/companies/{}", id);
        debug!(path, multipart = update.has_files(), "PUT");
        let request = self.client.put(self.url(&path));
        let request = if update.has_files() {
            request.multipart(update.to_form()?)
        } else {
            request.json(update)
        };
        self.execute(request).await?;
        Ok(())
    }

    pub async fn schedule(&self, company_id: i64) -> Result<Vec<CompanySchedule>, ApiError> {
        self.get(&format!("/companies/{}/schedule", company_id))
            .await
    }

    pub async fn update_schedule(
        &self,
        company_id: i64,
        schedule: &[CompanySchedule],
    ) -> Result<(), ApiError> {
        let path = format!("/companies/{}/schedule", company_id);
        debug!(path, days = schedule.len(), "PUT");
        self.execute(self.client.put(self.url(&path)).json(schedule))
            .await?;
        Ok(())
    }

    pub async fn ratings(&self, company_id: i64) -> Result<Vec<Rating>, ApiError> {
        self.get(&format!("/companies/{}/ratings", company_id))
            .await
    }

    pub async fn create_rating(&self, rating: &CreateRatingRequest) -> Result<(), ApiError> {
        debug!(company_id = rating.company_id, "POST /ratings");
        self.execute(self.client.post(self.url("/ratings")).json(rating))
            .await?;
        Ok(())
    }

    pub async fn similar(&self, company_id: i64) -> Result<Vec<Company>, ApiError> {
        self.get(&format!("/companies/{}/similar", company_id))
            .await
    }

    // ==================== Reference data ====================

    pub async fn sectors(&self) -> Result<Vec<Sector>, ApiError> {
        self.get("/sectors").await
    }

    pub async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        self.get("/countries").await
    }

    // ==================== Statistics ====================

    pub async fn profile_views(&self, company_id: i64) -> Result<ProfileViewTotal, ApiError> {
        self.get(&format!("/companies/views/company/{}", company_id))
            .await
    }

    pub async fn weekly_daily_views(&self, company_id: i64) -> Result<Vec<ViewPoint>, ApiError> {
        self.get(&format!(
            "/companies/views/company/{}/weekly-daily",
            company_id
        ))
        .await
    }

    pub async fn contact_total(&self, company_id: i64) -> Result<ContactTotal, ApiError> {
        self.get(&format!("/companies/contacts/total/{}", company_id))
            .await
    }

    pub async fn contact_timeline(&self, company_id: i64) -> Result<ContactTimeline, ApiError> {
        self.get(&format!(
            "/companies/contacts/{}/circular-stats",
            company_id
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error mapping ====================

    fn status(status: u16) -> ApiError {
        ApiError::Status {
            status,
            message: None,
        }
    }

    #[test]
    fn test_transport_error_is_status_zero() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.status(), 0);
        assert_eq!(
            err.localized(Language::En),
            "Unable to reach the server. Check your internet connection."
        );
    }

    #[test]
    fn test_known_statuses_map_to_messages() {
        assert_eq!(status(400).localized(Language::En), "Invalid request data");
        assert_eq!(status(404).localized(Language::En), "Resource not found");
        assert_eq!(status(500).localized(Language::En), "Internal server error");
        assert_eq!(
            status(503).localized(Language::En),
            "Service temporarily unavailable"
        );
    }

    #[test]
    fn test_unknown_status_includes_code() {
        assert_eq!(status(418).localized(Language::En), "Connection error (418)");
    }

    #[test]
    fn test_server_message_wins() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Email already used".into()),
        };
        assert_eq!(err.localized(Language::Fr), "Email already used");
    }

    #[test]
    fn test_blank_server_message_is_ignored() {
        let err = ApiError::Status {
            status: 404,
            message: Some("  ".into()),
        };
        assert_eq!(err.localized(Language::En), "Resource not found");
    }

    #[test]
    fn test_auth_statuses() {
        assert!(status(401).is_auth());
        assert!(status(403).is_auth());
        assert!(!status(404).is_auth());
        assert!(!ApiError::Transport(String::new()).is_auth());
    }

    // ==================== Update payload ====================

    fn company() -> Company {
        Company {
            id: 3,
            name: "Acme".into(),
            sector_id: Some(2),
            country_id: Some(5),
            country_amcham_id: Some(9),
            video_link: Some("https://www.youtube.com/embed/abc".into()),
            lat: Some(14.7),
            lon: Some(-17.4),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_preserves_untouched_fields() {
        let update = CompanyUpdate::from_company(&company());
        assert_eq!(update.country_amcham_id, 9);
        assert_eq!(update.video_link, "https://www.youtube.com/embed/abc");
        assert_eq!(update.lat, 14.7);
        assert_eq!(update.logo, LogoUpdate::Keep);
        assert!(!update.has_files());
    }

    #[test]
    fn test_update_defaults_missing_fields() {
        let update = CompanyUpdate::from_company(&Company::default());
        assert_eq!(update.country_amcham_id, 0);
        assert_eq!(update.lat, 0.0);
        assert_eq!(update.video_link, "");
    }

    #[test]
    fn test_update_json_uses_backend_field_names() {
        let json = serde_json::to_value(CompanyUpdate::from_company(&company())).unwrap();
        assert_eq!(json["country"], 5);
        assert_eq!(json["sectorId"], 2);
        assert_eq!(json["countryAmchamId"], 9);
        assert!(json.get("logo").is_none());
        assert!(json.get("pictures").is_none());
    }

    #[test]
    fn test_empty_picture_append_has_no_files() {
        let mut update = CompanyUpdate::from_company(&company());
        update.pictures = PictureUpdate::Append(Vec::new());
        assert!(!update.has_files());

        update.pictures =
            PictureUpdate::Append(vec![Upload::new("a.png", vec![1]).unwrap()]);
        assert!(update.has_files());
        assert!(update.to_form().is_ok());
    }

    // ==================== Client construction ====================

    #[test]
    fn test_api_client_creation_trims_trailing_slash() {
        let config = NetworkConfig {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        };
        let client = DirectoryApiClient::new("https://example.com/api/", &config).unwrap();
        assert_eq!(client.base_url(), "https://example.com/api");
    }
}
