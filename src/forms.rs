//! Submitted form payloads and their validation.
//!
//! Every form field arrives as an `Option<String>` so that an edit can tell a
//! field that was left out of the request apart from one that was cleared.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use url::Url;

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Swing",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-?\d{3}-?\d{4}$").expect("phone pattern is valid"));

/// Genres are stored as a single comma-delimited column.
pub fn join_genres(genres: &[String]) -> String {
    genres.join(",")
}

pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,
    #[error("Invalid URL.")]
    InvalidUrl,
    #[error("Invalid phone number, expected XXX-XXX-XXXX.")]
    InvalidPhone,
    #[error("'{0}' is not a valid choice for this field.")]
    InvalidChoice(String),
    #[error("Not a valid integer value.")]
    InvalidInteger,
    #[error("Not a valid datetime value.")]
    InvalidDateTime,
}

/// Field name to the errors raised for it, in field-name order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<FieldError>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.0.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

type Check = fn(&str) -> Result<String, FieldError>;

fn any_text(value: &str) -> Result<String, FieldError> {
    Ok(value.to_string())
}

fn http_url(value: &str) -> Result<String, FieldError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(value.to_string())
        }
        _ => Err(FieldError::InvalidUrl),
    }
}

fn phone(value: &str) -> Result<String, FieldError> {
    if PHONE_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(FieldError::InvalidPhone)
    }
}

fn state(value: &str) -> Result<String, FieldError> {
    let upper = value.to_ascii_uppercase();
    if STATE_CHOICES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(FieldError::InvalidChoice(value.to_string()))
    }
}

/// Trimmed, non-empty submitted value. `None` when absent or blank.
fn submitted(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(errors: &mut FormErrors, field: &'static str, raw: &Option<String>, check: Check) -> String {
    match submitted(raw) {
        Some(value) => check(value).unwrap_or_else(|e| {
            errors.add(field, e);
            String::new()
        }),
        None => {
            errors.add(field, FieldError::Required);
            String::new()
        }
    }
}

fn optional(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
    check: Check,
) -> Option<String> {
    let value = submitted(raw)?;
    match check(value) {
        Ok(v) => Some(v),
        Err(e) => {
            errors.add(field, e);
            None
        }
    }
}

/// A required field on an edit: absent means unchanged, blank is an error.
fn changed_required(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
    check: Check,
) -> Option<String> {
    raw.as_ref()?;
    Some(required(errors, field, raw, check))
}

/// An optional field on an edit: absent means unchanged, blank clears it.
fn changed_optional(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
    check: Check,
) -> Option<Option<String>> {
    raw.as_ref()?;
    Some(optional(errors, field, raw, check))
}

fn genres(errors: &mut FormErrors, raw: &[String]) -> Vec<String> {
    let selected: Vec<String> = raw
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();

    if selected.is_empty() {
        errors.add("genres", FieldError::Required);
    }
    for genre in &selected {
        if !GENRE_CHOICES.contains(&genre.as_str()) {
            errors.add("genres", FieldError::InvalidChoice(genre.clone()));
        }
    }

    selected
}

fn yes_no(raw: &Option<String>) -> Option<bool> {
    raw.as_deref()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "true" | "on"))
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct VenueForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Fields to overwrite on an existing venue; `None` leaves a column as is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VenueChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub image_link: Option<Option<String>>,
    pub facebook_link: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<NewVenue, FormErrors> {
        let mut errors = FormErrors::default();
        let venue = NewVenue {
            name: required(&mut errors, "name", &self.name, any_text),
            city: required(&mut errors, "city", &self.city, any_text),
            state: required(&mut errors, "state", &self.state, state),
            address: required(&mut errors, "address", &self.address, any_text),
            phone: optional(&mut errors, "phone", &self.phone, phone),
            website: optional(&mut errors, "website", &self.website, http_url),
            image_link: optional(&mut errors, "image_link", &self.image_link, http_url),
            facebook_link: optional(&mut errors, "facebook_link", &self.facebook_link, http_url),
            genres: genres(&mut errors, &self.genres),
            seeking_talent: yes_no(&self.seeking_talent).unwrap_or(false),
            seeking_description: optional(
                &mut errors,
                "seeking_description",
                &self.seeking_description,
                any_text,
            ),
        };
        errors.into_result(venue)
    }

    pub fn validate_changes(&self) -> Result<VenueChanges, FormErrors> {
        let mut errors = FormErrors::default();
        let changes = VenueChanges {
            name: changed_required(&mut errors, "name", &self.name, any_text),
            city: changed_required(&mut errors, "city", &self.city, any_text),
            state: changed_required(&mut errors, "state", &self.state, state),
            address: changed_required(&mut errors, "address", &self.address, any_text),
            phone: changed_optional(&mut errors, "phone", &self.phone, phone),
            website: changed_optional(&mut errors, "website", &self.website, http_url),
            image_link: changed_optional(&mut errors, "image_link", &self.image_link, http_url),
            facebook_link: changed_optional(&mut errors, "facebook_link", &self.facebook_link, http_url),
            genres: (!self.genres.is_empty()).then(|| genres(&mut errors, &self.genres)),
            seeking_talent: yes_no(&self.seeking_talent),
            seeking_description: changed_optional(
                &mut errors,
                "seeking_description",
                &self.seeking_description,
                any_text,
            ),
        };
        errors.into_result(changes)
    }

    pub fn from_model(venue: &crate::entities::venue::Model) -> Self {
        Self {
            name: Some(venue.name.clone()),
            city: Some(venue.city.clone()),
            state: Some(venue.state.clone()),
            address: Some(venue.address.clone()),
            phone: venue.phone.clone(),
            website: venue.website.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            genres: split_genres(&venue.genres),
            seeking_talent: Some(if venue.seeking_talent { "y" } else { "n" }.to_string()),
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArtistForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub image_link: Option<Option<String>>,
    pub facebook_link: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<NewArtist, FormErrors> {
        let mut errors = FormErrors::default();
        let artist = NewArtist {
            name: required(&mut errors, "name", &self.name, any_text),
            city: required(&mut errors, "city", &self.city, any_text),
            state: required(&mut errors, "state", &self.state, state),
            phone: optional(&mut errors, "phone", &self.phone, phone),
            website: optional(&mut errors, "website", &self.website, http_url),
            image_link: optional(&mut errors, "image_link", &self.image_link, http_url),
            facebook_link: optional(&mut errors, "facebook_link", &self.facebook_link, http_url),
            genres: genres(&mut errors, &self.genres),
            seeking_venue: yes_no(&self.seeking_venue).unwrap_or(false),
            seeking_description: optional(
                &mut errors,
                "seeking_description",
                &self.seeking_description,
                any_text,
            ),
        };
        errors.into_result(artist)
    }

    pub fn validate_changes(&self) -> Result<ArtistChanges, FormErrors> {
        let mut errors = FormErrors::default();
        let changes = ArtistChanges {
            name: changed_required(&mut errors, "name", &self.name, any_text),
            city: changed_required(&mut errors, "city", &self.city, any_text),
            state: changed_required(&mut errors, "state", &self.state, state),
            phone: changed_optional(&mut errors, "phone", &self.phone, phone),
            website: changed_optional(&mut errors, "website", &self.website, http_url),
            image_link: changed_optional(&mut errors, "image_link", &self.image_link, http_url),
            facebook_link: changed_optional(&mut errors, "facebook_link", &self.facebook_link, http_url),
            genres: (!self.genres.is_empty()).then(|| genres(&mut errors, &self.genres)),
            seeking_venue: yes_no(&self.seeking_venue),
            seeking_description: changed_optional(
                &mut errors,
                "seeking_description",
                &self.seeking_description,
                any_text,
            ),
        };
        errors.into_result(changes)
    }

    pub fn from_model(artist: &crate::entities::artist::Model) -> Self {
        Self {
            name: Some(artist.name.clone()),
            city: Some(artist.city.clone()),
            state: Some(artist.state.clone()),
            phone: artist.phone.clone(),
            website: artist.website.clone(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            genres: split_genres(&artist.genres),
            seeking_venue: Some(if artist.seeking_venue { "y" } else { "n" }.to_string()),
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ShowForm {
    pub artist_id: Option<String>,
    pub venue_id: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .map(|naive| naive.and_utc())
}

impl ShowForm {
    pub fn validate(&self) -> Result<NewShow, FormErrors> {
        let mut errors = FormErrors::default();

        let mut id_field = |field: &'static str, raw: &Option<String>| match submitted(raw) {
            Some(value) => value.parse::<i64>().unwrap_or_else(|_| {
                errors.add(field, FieldError::InvalidInteger);
                0
            }),
            None => {
                errors.add(field, FieldError::Required);
                0
            }
        };
        let artist_id = id_field("artist_id", &self.artist_id);
        let venue_id = id_field("venue_id", &self.venue_id);

        let start_time = match submitted(&self.start_time) {
            Some(value) => parse_start_time(value).unwrap_or_else(|| {
                errors.add("start_time", FieldError::InvalidDateTime);
                DateTime::<Utc>::MIN_UTC
            }),
            None => {
                errors.add("start_time", FieldError::Required);
                DateTime::<Utc>::MIN_UTC
            }
        };

        errors.into_result(NewShow {
            artist_id,
            venue_id,
            start_time,
        })
    }
}
