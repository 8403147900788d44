//! Bilingual UI strings.
//!
//! Every user-visible string goes through [`localize`]. Screens never hold a
//! "current language" of their own beyond the value handed to them by the
//! last language-changed event.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// The other language, used by the header toggle.
    pub fn toggled(&self) -> Self {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Fr => "Français",
            Language::En => "English",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Language::Fr),
            "en" | "en-us" | "en-gb" => Ok(Language::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Keys of the fixed string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    // Session and account
    SessionExpired,
    SessionExpiredRedirect,
    UserLoadError,
    NoCompany,
    NoMember,
    CompanyIdMissing,
    ReferenceDataError,
    Loading,
    Saving,
    Retry,
    Save,

    // Field validation
    RequiredField,
    InvalidField,
    InvalidEmail,
    MinLength,
    MaxLength,
    InvalidPhone,
    InvalidUrl,
    InvalidTimeFormat,
    FormErrors,
    FileTypeError,
    FileSizeError,

    // Profile screen
    ProfileTitle,
    CompanyName,
    Sector,
    Description,
    Country,
    Address,
    Email,
    Phone,
    Website,
    ChangeLogo,
    DeleteLogo,
    ProfileLoadError,
    ProfileSaveError,
    ProfileSaveSuccess,

    // Opening hours screen
    HoursTitle,
    Open,
    Closed,
    Opening,
    Closing,
    HoursLoadError,
    HoursCompanyLoadError,
    HoursSaveError,
    HoursSaveSuccess,

    // Media screen
    GalleryTitle,
    AddPhoto,
    DeletePhoto,
    NoPhotos,
    VideoTitle,
    VideoUrlLabel,
    InvalidVideoUrl,
    MediaLoadError,
    MediaSaveError,
    MediaSaveSuccess,

    // Member detail screen
    OpeningHours,
    Reviews,
    ReviewSingular,
    ReviewPlural,
    GiveReview,
    ReviewRequiredFields,
    ReviewSubmitError,
    ReviewSubmitSuccess,
    SimilarMembers,
    MemberNotFound,
    MemberNotFoundDesc,
    OpenNow,
    ClosedNow,

    // Statistics screen
    StatsTitle,
    ProfileViews,
    ContactsReceived,
    LastUpdate,
    SinceLastWeek,
    SinceLastMonth,
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    ViewsLabel,
    ContactsLabel,
    NoData,
    StatsLoadError,
    ExportCsv,

    // Backend error mapper
    ApiUnreachable,
    ApiBadRequest,
    ApiUnauthorized,
    ApiForbidden,
    ApiNotFound,
    ApiServerError,
    ApiUnavailable,
    ApiOther,
    ApiDecode,

    // Navigation
    NavProfile,
    NavHours,
    NavMedia,
    NavMember,
    NavStatistics,

    // Shared controls
    Reset,
    Cancel,
    Send,
    Refresh,
    FirstName,
    LastName,
    Comment,
    ImagePath,
    ExportSaved,
    ExportFailed,
}

/// Resolve a UI string. Templates use `{length}`, `{status}` or `{path}` placeholders,
/// see [`localize_with`].
pub fn localize(lang: Language, key: Text) -> &'static str {
    match lang {
        Language::Fr => fr(key),
        Language::En => en(key),
    }
}

/// Resolve a template string and substitute a single `{name}` placeholder.
pub fn localize_with(lang: Language, key: Text, name: &str, value: impl fmt::Display) -> String {
    localize(lang, key).replace(&format!("{{{}}}", name), &value.to_string())
}

fn fr(key: Text) -> &'static str {
    match key {
        Text::SessionExpired => "Session expirée. Veuillez vous reconnecter.",
        Text::SessionExpiredRedirect => {
            "Session expirée. Redirection vers la page de connexion..."
        }
        Text::UserLoadError => "Erreur lors de la récupération de vos informations utilisateur",
        Text::NoCompany => "Aucune entreprise associée à votre compte",
        Text::NoMember => "Aucun membre associé à votre compte",
        Text::CompanyIdMissing => "Impossible de sauvegarder : ID de l'entreprise manquant",
        Text::ReferenceDataError => "Erreur lors du chargement des données de référence",
        Text::Loading => "Chargement...",
        Text::Saving => "Enregistrement en cours...",
        Text::Retry => "Réessayer",
        Text::Save => "Enregistrer les modifications",

        Text::RequiredField => "Ce champ est obligatoire.",
        Text::InvalidField => "Champ invalide.",
        Text::InvalidEmail => "Veuillez saisir une adresse email valide.",
        Text::MinLength => "Minimum {length} caractères requis.",
        Text::MaxLength => "Maximum {length} caractères autorisés.",
        Text::InvalidPhone => "Format de téléphone invalide.",
        Text::InvalidUrl => "Veuillez saisir une URL valide.",
        Text::InvalidTimeFormat => "Format horaire invalide (HH:MM).",
        Text::FormErrors => "Veuillez corriger les erreurs dans le formulaire.",
        Text::FileTypeError => "Seuls les fichiers PNG et JPG sont autorisés.",
        Text::FileSizeError => "La taille du fichier ne doit pas dépasser 2MB.",

        Text::ProfileTitle => "Informations de l'entreprise",
        Text::CompanyName => "Nom de l'entreprise",
        Text::Sector => "Secteur d'activité",
        Text::Description => "Description de l'entreprise",
        Text::Country => "Pays",
        Text::Address => "Adresse complète",
        Text::Email => "Email",
        Text::Phone => "Téléphone",
        Text::Website => "Site web",
        Text::ChangeLogo => "Changer de logo",
        Text::DeleteLogo => "Supprimer",
        Text::ProfileLoadError => {
            "Erreur lors du chargement des informations de l'entreprise"
        }
        Text::ProfileSaveError => "Erreur lors de l'enregistrement des modifications",
        Text::ProfileSaveSuccess => {
            "Les informations de l'entreprise ont été sauvegardées avec succès !"
        }

        Text::HoursTitle => "Horaires d'ouverture",
        Text::Open => "Ouvert",
        Text::Closed => "Fermé",
        Text::Opening => "Ouverture",
        Text::Closing => "Fermeture",
        Text::HoursLoadError => "Erreur lors du chargement des horaires",
        Text::HoursCompanyLoadError => {
            "Erreur lors du chargement des informations de l'entreprise"
        }
        Text::HoursSaveError => "Erreur lors de l'enregistrement des horaires",
        Text::HoursSaveSuccess => "Les horaires ont été sauvegardés avec succès !",

        Text::GalleryTitle => "Galerie photos",
        Text::AddPhoto => "Ajouter une photo",
        Text::DeletePhoto => "Supprimer la photo",
        Text::NoPhotos => "Aucune photo ajoutée",
        Text::VideoTitle => "Vidéo de présentation",
        Text::VideoUrlLabel => "URL Vidéo (YouTube, Vimeo, etc.)",
        Text::InvalidVideoUrl => "URL de vidéo non valide. Veuillez vérifier le lien.",
        Text::MediaLoadError => "Erreur lors du chargement des médias",
        Text::MediaSaveError => "Erreur lors de l'enregistrement des modifications",
        Text::MediaSaveSuccess => "Les médias ont été enregistrés avec succès !",

        Text::OpeningHours => "Horaires d'ouverture",
        Text::Reviews => "Avis & notes",
        Text::ReviewSingular => "avis",
        Text::ReviewPlural => "avis",
        Text::GiveReview => "Donner un avis",
        Text::ReviewRequiredFields => "Veuillez remplir tous les champs obligatoires",
        Text::ReviewSubmitError => {
            "Une erreur s'est produite lors de l'envoi de votre avis. Veuillez réessayer."
        }
        Text::ReviewSubmitSuccess => "Merci ! Votre avis a bien été envoyé.",
        Text::SimilarMembers => "Membres similaires",
        Text::MemberNotFound => "Membre non trouvé",
        Text::MemberNotFoundDesc => {
            "Le membre que vous cherchez n'existe pas ou a été supprimé."
        }
        Text::OpenNow => "Ouvert maintenant",
        Text::ClosedNow => "Fermé actuellement",

        Text::StatsTitle => "Statistiques de votre profil",
        Text::ProfileViews => "Vues du profil",
        Text::ContactsReceived => "Contacts reçus",
        Text::LastUpdate => "Dernière mise à jour",
        Text::SinceLastWeek => "depuis la semaine dernière",
        Text::SinceLastMonth => "depuis le mois dernier",
        Text::Today => "Aujourd'hui",
        Text::ThisWeek => "Cette semaine",
        Text::ThisMonth => "Ce mois",
        Text::ThisYear => "Cette année",
        Text::ViewsLabel => "vues",
        Text::ContactsLabel => "contacts",
        Text::NoData => "Aucune donnée disponible",
        Text::StatsLoadError => "Erreur lors du chargement des statistiques",
        Text::ExportCsv => "Exporter en CSV",

        Text::ApiUnreachable => {
            "Impossible de contacter le serveur. Vérifiez votre connexion internet."
        }
        Text::ApiBadRequest => "Données invalides pour la requête",
        Text::ApiUnauthorized => "Non autorisé",
        Text::ApiForbidden => "Accès interdit",
        Text::ApiNotFound => "Ressource non trouvée",
        Text::ApiServerError => "Erreur interne du serveur",
        Text::ApiUnavailable => "Service temporairement indisponible",
        Text::ApiOther => "Erreur de connexion ({status})",
        Text::ApiDecode => "Réponse du serveur illisible",

        Text::NavProfile => "À propos",
        Text::NavHours => "Horaires",
        Text::NavMedia => "Médias",
        Text::NavMember => "Profil public",
        Text::NavStatistics => "Statistiques",
        Text::Reset => "Réinitialiser",
        Text::Cancel => "Annuler",
        Text::Send => "Envoyer",
        Text::Refresh => "Actualiser",
        Text::FirstName => "Prénom",
        Text::LastName => "Nom",
        Text::Comment => "Commentaire",
        Text::ImagePath => "Chemin de l'image (PNG, JPG, max. 2MB)",
        Text::ExportSaved => "Enregistré dans {path}",
        Text::ExportFailed => "Échec de l'export",
    }
}

fn en(key: Text) -> &'static str {
    match key {
        Text::SessionExpired => "Session expired. Please log in again.",
        Text::SessionExpiredRedirect => "Session expired. Redirecting to login page...",
        Text::UserLoadError => "Error retrieving your user information",
        Text::NoCompany => "No company associated with your account",
        Text::NoMember => "No member associated with your account",
        Text::CompanyIdMissing => "Cannot save: Company ID missing",
        Text::ReferenceDataError => "Error loading reference data",
        Text::Loading => "Loading...",
        Text::Saving => "Saving...",
        Text::Retry => "Retry",
        Text::Save => "Save changes",

        Text::RequiredField => "This field is required.",
        Text::InvalidField => "Invalid field.",
        Text::InvalidEmail => "Please enter a valid email address.",
        Text::MinLength => "Minimum {length} characters required.",
        Text::MaxLength => "Maximum {length} characters allowed.",
        Text::InvalidPhone => "Invalid phone format.",
        Text::InvalidUrl => "Please enter a valid URL.",
        Text::InvalidTimeFormat => "Invalid time format (HH:MM).",
        Text::FormErrors => "Please correct the errors in the form.",
        Text::FileTypeError => "Only PNG and JPG files are allowed.",
        Text::FileSizeError => "File size must not exceed 2MB.",

        Text::ProfileTitle => "Company Information",
        Text::CompanyName => "Company Name",
        Text::Sector => "Business Sector",
        Text::Description => "Company Description",
        Text::Country => "Country",
        Text::Address => "Full Address",
        Text::Email => "Email",
        Text::Phone => "Phone",
        Text::Website => "Website",
        Text::ChangeLogo => "Change logo",
        Text::DeleteLogo => "Delete",
        Text::ProfileLoadError => "Error loading company information",
        Text::ProfileSaveError => "Error saving changes",
        Text::ProfileSaveSuccess => "Company information has been successfully saved!",

        Text::HoursTitle => "Opening Hours",
        Text::Open => "Open",
        Text::Closed => "Closed",
        Text::Opening => "Opening",
        Text::Closing => "Closing",
        Text::HoursLoadError => "Error loading schedules",
        Text::HoursCompanyLoadError => "Error loading company information",
        Text::HoursSaveError => "Error saving schedules",
        Text::HoursSaveSuccess => "Opening hours have been saved successfully!",

        Text::GalleryTitle => "Photo Gallery",
        Text::AddPhoto => "Add photo",
        Text::DeletePhoto => "Delete photo",
        Text::NoPhotos => "No photos added",
        Text::VideoTitle => "Presentation Video",
        Text::VideoUrlLabel => "Video URL (YouTube, Vimeo, etc.)",
        Text::InvalidVideoUrl => "Invalid video URL. Please check the link.",
        Text::MediaLoadError => "Error loading media",
        Text::MediaSaveError => "Error saving changes",
        Text::MediaSaveSuccess => "Media has been saved successfully!",

        Text::OpeningHours => "Opening Hours",
        Text::Reviews => "Reviews & Ratings",
        Text::ReviewSingular => "review",
        Text::ReviewPlural => "reviews",
        Text::GiveReview => "Give review",
        Text::ReviewRequiredFields => "Please fill in all required fields",
        Text::ReviewSubmitError => {
            "An error occurred while submitting your review. Please try again."
        }
        Text::ReviewSubmitSuccess => "Thank you! Your review has been sent.",
        Text::SimilarMembers => "Similar Members",
        Text::MemberNotFound => "Member not found",
        Text::MemberNotFoundDesc => {
            "The member you are looking for does not exist or has been deleted."
        }
        Text::OpenNow => "Open now",
        Text::ClosedNow => "Currently closed",

        Text::StatsTitle => "Your Profile Statistics",
        Text::ProfileViews => "Profile Views",
        Text::ContactsReceived => "Contacts Received",
        Text::LastUpdate => "Last Update",
        Text::SinceLastWeek => "since last week",
        Text::SinceLastMonth => "since last month",
        Text::Today => "Today",
        Text::ThisWeek => "This week",
        Text::ThisMonth => "This month",
        Text::ThisYear => "This year",
        Text::ViewsLabel => "views",
        Text::ContactsLabel => "contacts",
        Text::NoData => "No data available",
        Text::StatsLoadError => "Error loading statistics",
        Text::ExportCsv => "Export CSV",

        Text::ApiUnreachable => "Unable to reach the server. Check your internet connection.",
        Text::ApiBadRequest => "Invalid request data",
        Text::ApiUnauthorized => "Not authorized",
        Text::ApiForbidden => "Access forbidden",
        Text::ApiNotFound => "Resource not found",
        Text::ApiServerError => "Internal server error",
        Text::ApiUnavailable => "Service temporarily unavailable",
        Text::ApiOther => "Connection error ({status})",
        Text::ApiDecode => "Unreadable server response",

        Text::NavProfile => "About",
        Text::NavHours => "Opening hours",
        Text::NavMedia => "Media",
        Text::NavMember => "Public profile",
        Text::NavStatistics => "Statistics",
        Text::Reset => "Reset",
        Text::Cancel => "Cancel",
        Text::Send => "Send",
        Text::Refresh => "Refresh",
        Text::FirstName => "First name",
        Text::LastName => "Last name",
        Text::Comment => "Comment",
        Text::ImagePath => "Image path (PNG, JPG, max. 2MB)",
        Text::ExportSaved => "Saved to {path}",
        Text::ExportFailed => "Export failed",
    }
}
