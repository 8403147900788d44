//! Company profile form ("about" screen).

use tracing::{debug, info};

use crate::{
    api::{CompanyUpdate, LogoUpdate},
    i18n::{Language, Text},
    models::{Company, Country, Sector},
    screen::{Effect, Lifecycle, ScreenContext, ScreenError, ScreenStatus, resolve_company_id},
    upload::{Upload, UploadError},
    validation::{FieldErrors, Rule, ValidationError},
};

pub const DEFAULT_COUNTRY_ICON: &str = "🌍";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    CompanyName,
    Sector,
    Description,
    Country,
    Address,
    Email,
    Phone,
    Website,
}

impl ProfileField {
    pub const TEXT_FIELDS: [ProfileField; 6] = [
        ProfileField::CompanyName,
        ProfileField::Description,
        ProfileField::Address,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Website,
    ];

    pub fn rules(&self) -> &'static [Rule] {
        match self {
            ProfileField::CompanyName => &[Rule::Required, Rule::MinLength(2)],
            ProfileField::Description => &[Rule::Required, Rule::MinLength(50), Rule::MaxLength(500)],
            ProfileField::Address => &[Rule::Required, Rule::MinLength(10)],
            ProfileField::Email => &[Rule::Required, Rule::Email],
            ProfileField::Phone => &[Rule::Required, Rule::Phone],
            ProfileField::Website => &[Rule::Required, Rule::Url],
            ProfileField::Sector | ProfileField::Country => &[Rule::Required],
        }
    }

    pub fn label(&self) -> Text {
        match self {
            ProfileField::CompanyName => Text::CompanyName,
            ProfileField::Sector => Text::Sector,
            ProfileField::Description => Text::Description,
            ProfileField::Country => Text::Country,
            ProfileField::Address => Text::Address,
            ProfileField::Email => Text::Email,
            ProfileField::Phone => Text::Phone,
            ProfileField::Website => Text::Website,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub company_name: String,
    pub sector_id: Option<i64>,
    pub description: String,
    pub country_id: Option<i64>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

impl ProfileForm {
    /// Bind a company, joining sector and country by name.
    pub fn from_company(company: &Company, sectors: &[Sector], countries: &[Country]) -> Self {
        let sector_id = company
            .sector
            .as_deref()
            .and_then(|name| sectors.iter().find(|s| s.name_fr == name || s.name_en == name))
            .map(|s| s.id);
        let country_id = company
            .country
            .as_deref()
            .and_then(|name| countries.iter().find(|c| c.name == name))
            .map(|c| c.id);
        Self {
            company_name: company.name.clone(),
            sector_id,
            description: company.description.clone().unwrap_or_default(),
            country_id,
            address: company.address.clone().unwrap_or_default(),
            email: company.email.clone().unwrap_or_default(),
            phone: company.telephone.clone().unwrap_or_default(),
            website: company.web_link.clone().unwrap_or_default(),
        }
    }

    pub fn text(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::CompanyName => &self.company_name,
            ProfileField::Description => &self.description,
            ProfileField::Address => &self.address,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::Website => &self.website,
            ProfileField::Sector | ProfileField::Country => "",
        }
    }

    fn text_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::CompanyName => Some(&mut self.company_name),
            ProfileField::Description => Some(&mut self.description),
            ProfileField::Address => Some(&mut self.address),
            ProfileField::Email => Some(&mut self.email),
            ProfileField::Phone => Some(&mut self.phone),
            ProfileField::Website => Some(&mut self.website),
            ProfileField::Sector | ProfileField::Country => None,
        }
    }

    pub fn validate(&self) -> FieldErrors<ProfileField> {
        let mut errors = FieldErrors::default();
        for field in ProfileField::TEXT_FIELDS {
            errors.check(field, self.text(field), field.rules());
        }
        if self.sector_id.is_none() {
            errors.insert(ProfileField::Sector, ValidationError::Required);
        }
        if self.country_id.is_none() {
            errors.insert(ProfileField::Country, ValidationError::Required);
        }
        errors
    }

    /// Merge the edited fields into the stored company.
    pub fn to_update(&self, company: &Company, logo: Option<&Upload>) -> CompanyUpdate {
        CompanyUpdate {
            name: self.company_name.clone(),
            sector_id: self.sector_id,
            description: self.description.clone(),
            country_id: self.country_id,
            address: self.address.clone(),
            email: self.email.clone(),
            telephone: self.phone.clone(),
            web_link: self.website.clone(),
            logo: match logo {
                Some(upload) => LogoUpdate::Replace(upload.clone()),
                None => LogoUpdate::Keep,
            },
            ..CompanyUpdate::from_company(company)
        }
    }
}

/// What the logo slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoPreview {
    /// Stored image URL.
    Remote(String),
    /// A file picked but not uploaded yet.
    Pending(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub sectors: Vec<Sector>,
    pub countries: Vec<Country>,
    pub company: Company,
}

pub struct ProfileScreen {
    pub lang: Language,
    lifecycle: Lifecycle,
    pub status: ScreenStatus,
    sectors: Vec<Sector>,
    countries: Vec<Country>,
    company: Option<Company>,
    form: ProfileForm,
    errors: FieldErrors<ProfileField>,
    logo_file: Option<Upload>,
    logo_preview: Option<LogoPreview>,
    /// Fields shown as invalid: edited ones, or all after a submit attempt.
    touched: bool,
}

impl ProfileScreen {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            lifecycle: Lifecycle::new(),
            status: ScreenStatus {
                loading: true,
                ..Default::default()
            },
            sectors: Vec::new(),
            countries: Vec::new(),
            company: None,
            form: ProfileForm::default(),
            errors: FieldErrors::default(),
            logo_file: None,
            logo_preview: None,
            touched: false,
        }
    }

    /// Reference data first, then the account and its company.
    pub async fn fetch(ctx: ScreenContext) -> Result<ProfileData, ScreenError> {
        let (sectors, countries) = tokio::try_join!(ctx.api.sectors(), ctx.api.countries())
            .map_err(ScreenError::ReferenceData)?;
        debug!(sectors = sectors.len(), countries = countries.len(), "reference data loaded");

        let company_id = resolve_company_id(&ctx).await?;
        let company = ctx
            .api
            .company(company_id)
            .await
            .map_err(|e| ScreenError::from_load(Text::ProfileLoadError, e))?;
        Ok(ProfileData {
            sectors,
            countries,
            company,
        })
    }

    pub fn apply(
        &mut self,
        result: Result<ProfileData, ScreenError>,
        ctx: &ScreenContext,
    ) -> Option<Effect> {
        match result {
            Ok(data) => {
                info!(company_id = data.company.id, "profile loaded");
                self.sectors = data.sectors;
                self.countries = data.countries;
                self.company = Some(data.company);
                self.bind_company();
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

    fn bind_company(&mut self) {
        let Some(company) = &self.company else {
            return;
        };
        self.form = ProfileForm::from_company(company, &self.sectors, &self.countries);
        self.logo_file = None;
        self.logo_preview = company
            .logo
            .clone()
            .filter(|l| !l.is_empty())
            .or_else(|| company.pictures.first().cloned())
            .map(LogoPreview::Remote);
        self.errors = self.form.validate();
        self.touched = false;
    }

    /// Restore the values as loaded and clear messages.
    pub fn reset(&mut self) {
        self.bind_company();
        self.status.error = None;
        self.status.success = None;
    }

    pub fn set_text(&mut self, field: ProfileField, value: impl Into<String>) {
        if let Some(slot) = self.form.text_mut(field) {
            *slot = value.into();
            self.errors = self.form.validate();
        }
    }

    pub fn select_sector(&mut self, id: Option<i64>) {
        self.form.sector_id = id;
        self.errors = self.form.validate();
    }

    pub fn select_country(&mut self, id: Option<i64>) {
        self.form.country_id = id;
        self.errors = self.form.validate();
    }

    /// Keep a validated logo for the next save.
    pub fn select_logo(&mut self, upload: Result<Upload, UploadError>) -> Result<(), UploadError> {
        let upload = upload?;
        self.logo_preview = Some(LogoPreview::Pending(upload.file_name.clone()));
        self.logo_file = Some(upload);
        Ok(())
    }

    pub fn delete_logo(&mut self) {
        self.logo_file = None;
        self.logo_preview = None;
    }

    pub fn prepare_save(&mut self) -> Result<(i64, CompanyUpdate), ScreenError> {
        self.status.success = None;
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            self.touched = true;
            self.status.error = Some(ScreenError::Invalid);
            return Err(ScreenError::Invalid);
        }
        let Some(company) = self.company.as_ref().filter(|c| c.id > 0) else {
            self.status.error = Some(ScreenError::MissingCompanyId);
            return Err(ScreenError::MissingCompanyId);
        };
        let update = self.form.to_update(company, self.logo_file.as_ref());
        let id = company.id;
        self.status.begin_save();
        Ok((id, update))
    }

    pub async fn save(ctx: ScreenContext, id: i64, update: CompanyUpdate) -> Result<(), ScreenError> {
        ctx.api
            .update_company(id, &update)
            .await
            .map_err(|e| ScreenError::from_save(Text::ProfileSaveError, e))
    }

    pub fn apply_saved(&mut self, result: Result<(), ScreenError>, ctx: &ScreenContext) -> Option<Effect> {
        match result {
            Ok(()) => {
                info!("profile saved");
                self.logo_file = None;
                Some(self.status.saved(Text::ProfileSaveSuccess, ctx))
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

    // ==================== View state ====================

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn logo_preview(&self) -> Option<&LogoPreview> {
        self.logo_preview.as_ref()
    }

    pub fn pending_logo(&self) -> Option<&Upload> {
        self.logo_file.as_ref()
    }

    /// Error to show under a field, once the form has been submitted.
    pub fn field_error(&self, field: ProfileField) -> Option<String> {
        if !self.touched {
            return None;
        }
        self.errors.get(field).map(|e| e.localized(self.lang))
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn sector_name(&self, id: i64) -> &str {
        self.sectors
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name(self.lang))
            .unwrap_or_default()
    }

    pub fn country_name(&self, id: i64) -> &str {
        self.countries
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or_default()
    }

    pub fn country_icon(&self, id: i64) -> &str {
        self.countries
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.icon.as_deref())
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_COUNTRY_ICON)
    }
}
