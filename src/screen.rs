//! Pieces every screen controller shares: the session check, account
//! resolution, the error taxonomy and cancellation of in-flight work.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::{
    api::{ApiError, DirectoryApiClient},
    config::{SessionConfig, TimingConfig},
    i18n::{Language, Text, localize},
    models::CurrentUser,
    traits::Clock,
};

/// Bearer token handed over by the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_config(config: &SessionConfig) -> Option<Self> {
        let token = config.token.as_deref()?.trim();
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            expires_at: config.expires_at,
        })
    }

    pub fn is_active(&self, clock: &dyn Clock) -> bool {
        self.expires_at.is_none_or(|at| clock.now_utc() < at)
    }
}

/// Everything a controller needs to talk to the backend. Cheap to clone,
/// so fetch futures can own it.
#[derive(Clone)]
pub struct ScreenContext {
    pub api: DirectoryApiClient,
    pub session: Option<Session>,
    pub clock: Arc<dyn Clock>,
    pub timing: TimingConfig,
}

impl ScreenContext {
    pub fn new(
        api: DirectoryApiClient,
        session: Option<Session>,
        clock: Arc<dyn Clock>,
        timing: TimingConfig,
    ) -> Self {
        let api = match &session {
            Some(session) => api.with_token(session.token.clone()),
            None => api,
        };
        Self {
            api,
            session,
            clock,
            timing,
        }
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.timing.login_redirect_ms)
    }

    pub fn notice_clear_delay(&self) -> Duration {
        Duration::from_millis(self.timing.notice_clear_ms)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScreenError {
    /// No token, or the token is past its expiry.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The backend rejected the token (401/403).
    #[error("session expired")]
    SessionExpired,
    #[error("could not load the current user: {0}")]
    UserLoad(#[source] ApiError),
    #[error("no company associated with the account")]
    NoCompany,
    #[error("no member associated with the account")]
    NoMember,
    #[error("company not found")]
    NotFound,
    #[error("company id missing")]
    MissingCompanyId,
    #[error("reference data failed to load: {0}")]
    ReferenceData(#[source] ApiError),
    #[error("load failed: {source}")]
    Load {
        message: Text,
        #[source]
        source: ApiError,
    },
    #[error("{0:?}")]
    Unavailable(Text),
    #[error("save failed: {source}")]
    Save {
        message: Text,
        #[source]
        source: ApiError,
    },
    #[error("form has invalid fields")]
    Invalid,
}

impl ScreenError {
    /// Auth failures send the user back to the login page.
    pub fn redirects_to_login(&self) -> bool {
        matches!(self, ScreenError::NotAuthenticated | ScreenError::SessionExpired)
    }

    /// Missing associations: nothing the user can retry.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScreenError::NoCompany | ScreenError::NoMember | ScreenError::NotFound
        )
    }

    /// Read failures offer a manual retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScreenError::UserLoad(_)
                | ScreenError::ReferenceData(_)
                | ScreenError::Load { .. }
                | ScreenError::Unavailable(_)
        )
    }

    pub fn localized(&self, lang: Language) -> String {
        let text = |key| localize(lang, key).to_string();
        match self {
            ScreenError::NotAuthenticated => text(Text::SessionExpired),
            ScreenError::SessionExpired => text(Text::SessionExpiredRedirect),
            ScreenError::UserLoad(_) => text(Text::UserLoadError),
            ScreenError::NoCompany => text(Text::NoCompany),
            ScreenError::NoMember => text(Text::NoMember),
            ScreenError::NotFound => text(Text::MemberNotFound),
            ScreenError::MissingCompanyId => text(Text::CompanyIdMissing),
            ScreenError::ReferenceData(_) => text(Text::ReferenceDataError),
            ScreenError::Load { message, source } | ScreenError::Save { message, source } => {
                describe(lang, *message, source)
            }
            ScreenError::Unavailable(message) => text(*message),
            ScreenError::Invalid => text(Text::FormErrors),
        }
    }

    /// Turn a failed call into a screen error, promoting auth statuses.
    pub fn from_load(message: Text, source: ApiError) -> Self {
        if source.is_auth() {
            ScreenError::SessionExpired
        } else {
            ScreenError::Load { message, source }
        }
    }

    pub fn from_save(message: Text, source: ApiError) -> Self {
        if source.is_auth() {
            ScreenError::SessionExpired
        } else {
            ScreenError::Save { message, source }
        }
    }
}

/// A server-supplied message is shown as is, otherwise the screen's own
/// message followed by the mapped status.
fn describe(lang: Language, message: Text, source: &ApiError) -> String {
    if let ApiError::Status {
        message: Some(server),
        ..
    } = source
    {
        if !server.trim().is_empty() {
            return server.clone();
        }
    }
    format!("{} ({})", localize(lang, message), source.localized(lang))
}

/// Deferred work a controller asks its host to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RedirectToLogin { after: Duration },
    /// Clear the success notice, then reload the screen.
    ClearNotice { after: Duration },
}

/// Load/save status and messages of a form screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenStatus {
    pub loading: bool,
    pub saving: bool,
    pub error: Option<ScreenError>,
    pub success: Option<Text>,
}

impl ScreenStatus {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn begin_save(&mut self) {
        self.saving = true;
        self.error = None;
        self.success = None;
    }

    /// Record a failure and return the follow-up it needs, if any.
    pub fn fail(&mut self, err: ScreenError, ctx: &ScreenContext) -> Option<Effect> {
        self.loading = false;
        self.saving = false;
        if err.is_terminal() || err.redirects_to_login() {
            warn!(error = %err, "screen unavailable");
        } else {
            error!(error = %err, "screen operation failed");
        }
        let effect = err.redirects_to_login().then(|| Effect::RedirectToLogin {
            after: ctx.login_redirect_delay(),
        });
        self.error = Some(err);
        effect
    }

    pub fn loaded(&mut self) {
        self.loading = false;
    }

    pub fn saved(&mut self, message: Text, ctx: &ScreenContext) -> Effect {
        self.saving = false;
        self.success = Some(message);
        Effect::ClearNotice {
            after: ctx.notice_clear_delay(),
        }
    }

    pub fn clear_notice(&mut self) {
        self.success = None;
    }

    pub fn error_message(&self, lang: Language) -> Option<String> {
        self.error.as_ref().map(|e| e.localized(lang))
    }
}

/// Confirm the session and fetch the account behind it.
pub async fn resolve_account(ctx: &ScreenContext) -> Result<CurrentUser, ScreenError> {
    match &ctx.session {
        Some(session) if session.is_active(ctx.clock.as_ref()) => {}
        _ => return Err(ScreenError::NotAuthenticated),
    }
    match ctx.api.current_user().await {
        Ok(user) => {
            debug!(user_id = ?user.id, company_id = ?user.company_id, "account resolved");
            Ok(user)
        }
        Err(e) if e.is_auth() => Err(ScreenError::SessionExpired),
        Err(e) => Err(ScreenError::UserLoad(e)),
    }
}

/// [`resolve_account`] narrowed to the company id.
pub async fn resolve_company_id(ctx: &ScreenContext) -> Result<i64, ScreenError> {
    resolve_account(ctx)
        .await?
        .company_id
        .ok_or(ScreenError::NoCompany)
}

/// Owner of a screen's in-flight futures and timers.
///
/// Every future spawned on behalf of a screen goes through [`Lifecycle::guard`];
/// [`Lifecycle::teardown`] (or dropping the lifecycle) resolves all of them to
/// `None` without running their continuation.
#[derive(Debug)]
pub struct Lifecycle {
    cancel: watch::Sender<bool>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { cancel }
    }

    pub fn guard<F>(&self, fut: F) -> impl Future<Output = Option<F::Output>> + Send + 'static
    where
        F: Future + Send + 'static,
        F::Output: Send,
    {
        let rx = self.cancel.subscribe();
        async move {
            tokio::select! {
                biased;
                _ = cancelled(rx) => None,
                out = fut => Some(out),
            }
        }
    }

    /// Sleep that resolves to `None` if the screen is torn down first.
    pub fn delay(&self, duration: Duration) -> impl Future<Output = Option<()>> + Send + 'static {
        self.guard(tokio::time::sleep(duration))
    }

    /// Guarded futures and timers not yet resolved.
    pub fn pending(&self) -> usize {
        self.cancel.receiver_count()
    }

    pub fn is_torn_down(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn teardown(&self) {
        let pending = self.pending();
        if !self.cancel.send_replace(true) {
            debug!(pending, "screen torn down");
        }
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Resolves once cancellation is signalled or the sender is gone.
async fn cancelled(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|cancelled| *cancelled).await;
}
