//! Wire types exchanged with the directory backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{Language, Text, localize};

/// Company profile as returned by `GET /companies/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: i64,
    pub name: String,
    /// Sector display name; the id is not always populated by the backend.
    pub sector: Option<String>,
    pub sector_id: Option<i64>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_id: Option<i64>,
    pub country_amcham: Option<String>,
    pub country_amcham_id: Option<i64>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub web_link: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub logo: Option<String>,
    pub pictures: Vec<String>,
    pub video_link: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// 0 for Monday through 6 for Sunday.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }

    pub fn localized(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Fr, DayOfWeek::Monday) => "Lundi",
            (Language::Fr, DayOfWeek::Tuesday) => "Mardi",
            (Language::Fr, DayOfWeek::Wednesday) => "Mercredi",
            (Language::Fr, DayOfWeek::Thursday) => "Jeudi",
            (Language::Fr, DayOfWeek::Friday) => "Vendredi",
            (Language::Fr, DayOfWeek::Saturday) => "Samedi",
            (Language::Fr, DayOfWeek::Sunday) => "Dimanche",
            (Language::En, DayOfWeek::Monday) => "Monday",
            (Language::En, DayOfWeek::Tuesday) => "Tuesday",
            (Language::En, DayOfWeek::Wednesday) => "Wednesday",
            (Language::En, DayOfWeek::Thursday) => "Thursday",
            (Language::En, DayOfWeek::Friday) => "Friday",
            (Language::En, DayOfWeek::Saturday) => "Saturday",
            (Language::En, DayOfWeek::Sunday) => "Sunday",
        }
    }

    /// Reverse lookup of a localized day name, case-insensitive.
    pub fn from_localized(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|day| {
            [Language::Fr, Language::En]
                .iter()
                .any(|lang| day.localized(*lang).eq_ignore_ascii_case(name))
        })
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.localized(Language::En))
    }
}

/// One entry of `GET/PUT /companies/{id}/schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySchedule {
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

impl CompanySchedule {
    /// Display text for the public profile: `09:00 - 18:00` or the localized "closed".
    pub fn display(&self, lang: Language) -> String {
        match (&self.opening_time, &self.closing_time) {
            (Some(open), Some(close)) if !self.closed => format!("{} - {}", open, close),
            _ => localize(lang, Text::Closed).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub score: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Rating {
    /// Stand-in shown when a company has no ratings or they failed to load.
    pub fn placeholder() -> Self {
        Self {
            first_name: "Anonymous".to_string(),
            last_name: String::new(),
            score: 5,
            comment: "No reviews yet.".to_string(),
            company_id: None,
            company_name: None,
        }
    }

    /// Five entries, `true` for each filled star.
    pub fn stars(&self) -> [bool; 5] {
        std::array::from_fn(|i| i < self.score as usize)
    }

    pub fn initial(&self) -> Option<char> {
        self.first_name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Body of `POST /ratings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub first_name: String,
    pub last_name: String,
    pub score: u8,
    pub comment: String,
    pub company_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: i64,
    pub name_fr: String,
    pub name_en: String,
}

impl Sector {
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.name_fr,
            Language::En => &self.name_en,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Account record returned by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Member id; absent for accounts without a member record.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

// ==================== Statistics ====================

/// `GET /companies/views/company/{id}/weekly-daily`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPoint {
    pub date: String,
    pub count: u64,
}

/// `GET /companies/views/company/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewTotal {
    pub total: u64,
    #[serde(default)]
    pub this_week: u64,
    #[serde(default)]
    pub last_week: u64,
    pub weekly_evolution: f64,
}

/// `GET /companies/contacts/total/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactTotal {
    pub total: u64,
    pub weekly_evolution: f64,
}

/// `GET /companies/contacts/{id}/circular-stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactTimeline {
    pub today: u64,
    pub last_week: u64,
    pub last_month: u64,
    pub current_year: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_tolerates_sparse_payload() {
        let company: Company = serde_json::from_str(r#"{"id": 7, "name": "Acme"}"#).unwrap();
        assert_eq!(company.id, 7);
        assert!(company.pictures.is_empty());
        assert!(company.video_link.is_none());
    }

    #[test]
    fn test_company_reads_camel_case_fields() {
        let company: Company = serde_json::from_str(
            r#"{"id": 1, "name": "Acme", "sectorId": 4, "webLink": "acme.com",
                "countryAmchamId": 2, "videoLink": "https://youtu.be/x", "pictures": ["a.png"]}"#,
        )
        .unwrap();
        assert_eq!(company.sector_id, Some(4));
        assert_eq!(company.web_link.as_deref(), Some("acme.com"));
        assert_eq!(company.country_amcham_id, Some(2));
        assert_eq!(company.pictures, vec!["a.png".to_string()]);
    }

    #[test]
    fn test_day_of_week_wire_format() {
        let entry: CompanySchedule = serde_json::from_str(
            r#"{"dayOfWeek": "WEDNESDAY", "openingTime": "08:30", "closingTime": "17:00", "closed": false}"#,
        )
        .unwrap();
        assert_eq!(entry.day_of_week, DayOfWeek::Wednesday);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["dayOfWeek"], "WEDNESDAY");
    }

    #[test]
    fn test_day_names_map_between_locales() {
        assert_eq!(DayOfWeek::Monday.localized(Language::Fr), "Lundi");
        assert_eq!(DayOfWeek::Sunday.localized(Language::En), "Sunday");
        assert_eq!(DayOfWeek::from_localized("mercredi"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::from_localized("Friday"), Some(DayOfWeek::Friday));
        assert_eq!(DayOfWeek::from_localized("Montag"), None);
    }

    #[test]
    fn test_day_from_chrono() {
        assert_eq!(DayOfWeek::from_chrono(chrono::Weekday::Mon), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from_chrono(chrono::Weekday::Sun), DayOfWeek::Sunday);
    }

    #[test]
    fn test_schedule_display_ignores_times_when_closed() {
        let entry = CompanySchedule {
            day_of_week: DayOfWeek::Sunday,
            opening_time: Some("09:00".into()),
            closing_time: Some("12:00".into()),
            closed: true,
        };
        assert_eq!(entry.display(Language::Fr), "Fermé");

        let open = CompanySchedule {
            closed: false,
            ..entry
        };
        assert_eq!(open.display(Language::En), "09:00 - 12:00");
    }

    #[test]
    fn test_schedule_display_missing_time_is_closed() {
        let entry = CompanySchedule {
            day_of_week: DayOfWeek::Monday,
            opening_time: Some("09:00".into()),
            closing_time: None,
            closed: false,
        };
        assert_eq!(entry.display(Language::En), "Closed");
    }

    #[test]
    fn test_placeholder_rating() {
        let rating = Rating::placeholder();
        assert_eq!(rating.first_name, "Anonymous");
        assert_eq!(rating.score, 5);
        assert_eq!(rating.comment, "No reviews yet.");
        assert_eq!(rating.stars(), [true; 5]);
    }

    #[test]
    fn test_rating_stars_and_initial() {
        let rating = Rating {
            first_name: "émile".into(),
            score: 3,
            ..Rating::placeholder()
        };
        assert_eq!(rating.stars(), [true, true, true, false, false]);
        assert_eq!(rating.initial(), Some('é'));
    }

    #[test]
    fn test_create_rating_request_serializes_camel_case() {
        let body = CreateRatingRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            score: 4,
            comment: "Great".into(),
            company_id: 12,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["companyId"], 12);
    }
}
