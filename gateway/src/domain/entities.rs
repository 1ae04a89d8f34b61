use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// The serde derives in this layer are a dependency leak, but the backend speaks JSON
// and these records are pure pass-through, so the pragmatic choice wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    MissingPerson,
    LostItem,
    FoundPerson,
    FoundItem,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::MissingPerson => "MISSING_PERSON",
            ReportType::LostItem => "LOST_ITEM",
            ReportType::FoundPerson => "FOUND_PERSON",
            ReportType::FoundItem => "FOUND_ITEM",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Active,
    Resolved,
    Cancelled,
    Expired,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Active => "ACTIVE",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Cancelled => "CANCELLED",
            ReportStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    Authority,
}

// Account record as the backend returns it, both in sign-in payloads and as a
// report's reporter. Doubles as the cached profile in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Location {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            address: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    // Centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    // Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinguishing_marks: Option<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub item_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
}

// Stored report as returned by the backend. Fields the gateway does not know
// about (e.g. analysis results) are dropped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_details: Option<PersonDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_details: Option<ItemDetails>,
    pub last_seen_location: Location,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_amount: Option<f64>,
    // Jackson strips the `is` prefix off boolean getters, so both spellings occur.
    #[serde(default = "default_public", alias = "public")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date_time: Option<NaiveDateTime>,
}

// Payload for creating a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_details: Option<PersonDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_details: Option<ItemDetails>,
    pub last_seen_location: Location,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_amount: Option<f64>,
    // The backend binds this flag through `setPublic`, so it only reads `public`.
    #[serde(rename = "public", alias = "isPublic", default = "default_public")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date_time: Option<NaiveDateTime>,
}

impl ReportDraft {
    pub fn new(
        report_type: ReportType,
        title: impl Into<String>,
        description: impl Into<String>,
        last_seen_location: Location,
    ) -> Self {
        Self {
            report_type,
            title: title.into(),
            description: description.into(),
            person_details: None,
            item_details: None,
            last_seen_location,
            image_urls: Vec::new(),
            contact_phone: None,
            contact_email: None,
            reward_amount: None,
            is_public: true,
            incident_date_time: None,
        }
    }
}

fn default_public() -> bool {
    true
}

// One page of the public report listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub content: Vec<Report>,
    pub total_elements: u64,
    pub total_pages: u32,
    // Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

// Sign-in response: the bearer token plus the profile fields of the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl SessionPayload {
    pub fn profile(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: None,
            roles: self.roles.clone(),
        }
    }
}

// Plain confirmation body used by signup and status updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// Persisted client session: token and cached profile always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    // New York City, used whenever the device position cannot be resolved.
    pub const FALLBACK: Coordinate = Coordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
