//! # Content Documents
//!
//! Everything the site renders or the admin dashboard edits.
//!
//! Every document carries `_id`, `createdAt` and `updatedAt`. Field names are camelCase
//! on the wire and in the store, matching what the frontend already reads.
//!
//! Inputs are separate structs with every field optional. Creation requires the
//! required fields, updates merge whatever was sent and re-validate the result.
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    store::{CAROUSEL, CONTACTS, Document, FOOTER, PROJECTS, TEAM},
    utils::{Direction, is_present, neighbour, new_id, now, present},
};

fn require(fields: &[(&'static str, bool)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn merge(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

/// Sent but blank clears the field, absent leaves it untouched.
fn merge_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = present(&Some(value)).map(str::to_string);
    }
}

fn trimmed(value: &Option<String>) -> String {
    present(value).unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarouselItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub order: Option<i64>,
}

impl CarouselItem {
    pub fn create(input: CarouselInput) -> Result<Self, AppError> {
        let timestamp = now();
        let mut item = Self {
            id: new_id(),
            title: String::new(),
            description: String::new(),
            image: String::new(),
            order: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };

        item.apply(input)?;
        item.updated_at = item.created_at;

        Ok(item)
    }

    pub fn apply(&mut self, input: CarouselInput) -> Result<(), AppError> {
        merge(&mut self.title, input.title);
        merge(&mut self.description, input.description);
        merge(&mut self.image, input.image);

        if let Some(order) = input.order {
            self.order = order;
        }

        self.validate()?;
        self.updated_at = now();

        Ok(())
    }

    fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("title", !self.title.is_empty()),
            ("description", !self.description.is_empty()),
            ("image", !self.image.is_empty()),
        ])
    }
}

impl Document for CarouselItem {
    const COLLECTION: &'static str = CAROUSEL;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Slides in display order: `order` ascending, oldest first on ties.
pub fn sort_slides(items: &mut [CarouselItem]) {
    items.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Moves the slide at `index` past its neighbour in sorted `items`, returning the positions
/// whose `order` changed. Distinct orders are swapped. Equal orders keep the first slot's
/// value and push later slides up by one until they are strictly increasing again.
pub fn move_slide(items: &mut [CarouselItem], index: usize, direction: Direction) -> Vec<usize> {
    let Some(other) = neighbour(index, items.len(), direction) else {
        return Vec::new();
    };

    if items[index].order != items[other].order {
        let order = items[index].order;
        items[index].order = items[other].order;
        items[other].order = order;
        items.swap(index, other);

        return vec![index, other];
    }

    items.swap(index, other);

    let mut changed = Vec::new();
    for position in index.min(other) + 1..items.len() {
        if items[position].order > items[position - 1].order {
            break;
        }

        items[position].order = items[position - 1].order + 1;
        changed.push(position);
    }

    changed
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Single-image field from before galleries existed. Read, never written.
    #[serde(default, skip_serializing)]
    pub image: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub client: Option<String>,
    pub results: Option<String>,
    pub date: Option<String>,
}

impl ProjectInput {
    /// `images` wins when it has entries, otherwise a lone `image` becomes a one-item gallery.
    fn resolve_images(&self) -> Result<Vec<String>, AppError> {
        let images: Vec<String> = self
            .images
            .iter()
            .flatten()
            .map(|image| image.trim())
            .filter(|image| !image.is_empty())
            .map(str::to_string)
            .collect();

        if !images.is_empty() {
            return Ok(images);
        }

        present(&self.image)
            .map(|image| vec![image.to_string()])
            .ok_or_else(|| AppError::bad_request("At least one image is required"))
    }
}

fn valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

impl Project {
    pub fn create(input: ProjectInput) -> Result<Self, AppError> {
        let timestamp = now();
        let mut project = Self {
            id: new_id(),
            title: String::new(),
            category: String::new(),
            images: Vec::new(),
            image: None,
            description: String::new(),
            client: None,
            results: None,
            date: None,
            created_at: timestamp,
            updated_at: timestamp,
        };

        project.apply(input)?;
        project.updated_at = project.created_at;

        Ok(project)
    }

    pub fn apply(&mut self, input: ProjectInput) -> Result<(), AppError> {
        self.images = input.resolve_images()?;
        self.image = None;

        merge(&mut self.title, input.title);
        merge(&mut self.category, input.category);
        merge(&mut self.description, input.description);
        merge_optional(&mut self.client, input.client);
        merge_optional(&mut self.results, input.results);
        merge_optional(&mut self.date, input.date);

        self.validate()?;
        self.updated_at = now();

        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }

    fn validate(&self) -> Result<(), AppError> {
        require(&[
            ("title", !self.title.is_empty()),
            ("category", !self.category.is_empty()),
            ("description", !self.description.is_empty()),
        ])?;

        if let Some(date) = &self.date {
            if !valid_date(date) {
                return Err(AppError::bad_request(format!("Invalid date '{date}'")));
            }
        }

        Ok(())
    }
}

impl Document for Project {
    const COLLECTION: &'static str = PROJECTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(&mut self) {
        match self.image.take() {
            Some(image) if self.images.is_empty() && !image.trim().is_empty() => {
                self.images = vec![image];
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub position: String,
    pub image: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberInput {
    pub name: Option<String>,
    pub position: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
}

impl TeamMember {
    pub fn create(input: TeamMemberInput) -> Result<Self, AppError> {
        let timestamp = now();
        let mut member = Self {
            id: new_id(),
            name: String::new(),
            position: String::new(),
            image: String::new(),
            bio: String::new(),
            created_at: timestamp,
            updated_at: timestamp,
        };

        member.apply(input)?;
        member.updated_at = member.created_at;

        Ok(member)
    }

    pub fn apply(&mut self, input: TeamMemberInput) -> Result<(), AppError> {
        merge(&mut self.name, input.name);
        merge(&mut self.position, input.position);
        merge(&mut self.image, input.image);
        merge(&mut self.bio, input.bio);

        require(&[
            ("name", !self.name.is_empty()),
            ("position", !self.position.is_empty()),
            ("image", !self.image.is_empty()),
            ("bio", !self.bio.is_empty()),
        ])?;
        self.updated_at = now();

        Ok(())
    }
}

impl Document for TeamMember {
    const COLLECTION: &'static str = TEAM;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FooterInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub subtitle: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterInput {
    pub subtitle: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub social_links: Option<Vec<SocialLink>>,
}

impl FooterInfo {
    /// The footer is a singleton stored under a fixed id.
    pub const SINGLETON_ID: &'static str = "site";

    fn empty() -> Self {
        let timestamp = now();
        Self {
            id: Self::SINGLETON_ID.to_string(),
            subtitle: String::new(),
            location: String::new(),
            email: String::new(),
            phone: String::new(),
            social_links: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Content served before an admin has ever saved the footer.
    pub fn default_content() -> Self {
        Self {
            subtitle: "Potenciamos tu presencia digital con estrategias creativas y efectivas."
                .to_string(),
            location: "Buenos Aires, Argentina".to_string(),
            email: "info@emiliasocialmedia.com".to_string(),
            phone: "+54 11 1234 5678".to_string(),
            social_links: [
                ("instagram", "https://instagram.com"),
                ("facebook", "https://facebook.com"),
                ("twitter", "https://twitter.com"),
                ("linkedin", "https://linkedin.com"),
            ]
            .into_iter()
            .map(|(platform, url)| SocialLink {
                platform: platform.to_string(),
                url: url.to_string(),
            })
            .collect(),
            ..Self::empty()
        }
    }

    pub fn create(input: FooterInput) -> Result<Self, AppError> {
        let mut footer = Self::empty();
        footer.apply(input)?;
        footer.updated_at = footer.created_at;

        Ok(footer)
    }

    pub fn apply(&mut self, input: FooterInput) -> Result<(), AppError> {
        merge(&mut self.subtitle, input.subtitle);
        merge(&mut self.location, input.location);
        merge(&mut self.email, input.email);
        merge(&mut self.phone, input.phone);

        if let Some(links) = input.social_links {
            self.social_links = links
                .into_iter()
                .map(|link| SocialLink {
                    platform: link.platform.trim().to_string(),
                    url: link.url.trim().to_string(),
                })
                .collect();
        }

        require(&[
            ("subtitle", !self.subtitle.is_empty()),
            ("location", !self.location.is_empty()),
            ("email", !self.email.is_empty()),
            ("phone", !self.phone.is_empty()),
        ])?;

        if self
            .social_links
            .iter()
            .any(|link| link.platform.is_empty() || link.url.is_empty())
        {
            return Err(AppError::bad_request(
                "Social links require both platform and url",
            ));
        }

        self.updated_at = now();

        Ok(())
    }
}

impl Document for FooterInfo {
    const COLLECTION: &'static str = FOOTER;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Client,
    Career,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Client => "client",
            ContactKind::Career => "career",
        }
    }
}

impl FromStr for ContactKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "client" => Ok(ContactKind::Client),
            "career" => Ok(ContactKind::Career),
            other => Err(AppError::bad_request(format!(
                "Invalid contact type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "archived" => Ok(ContactStatus::Archived),
            other => Err(AppError::bad_request(format!("Invalid status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
    pub position: Option<String>,
    pub experience: Option<String>,
    pub portfolio: Option<String>,
}

impl Contact {
    /// Builds a new message from a public submission. Status always starts at `new`.
    pub fn submit(input: ContactInput) -> Result<Self, AppError> {
        if !is_present(&input.name) || !is_present(&input.email) || !is_present(&input.kind) {
            return Err(AppError::bad_request("Missing required fields"));
        }

        let kind: ContactKind = trimmed(&input.kind).parse()?;

        match kind {
            ContactKind::Client if !is_present(&input.service) || !is_present(&input.message) => {
                return Err(AppError::bad_request("Missing required client fields"));
            }
            ContactKind::Career
                if !is_present(&input.position) || !is_present(&input.experience) =>
            {
                return Err(AppError::bad_request("Missing required career fields"));
            }
            _ => {}
        }

        let optional = |value: &Option<String>| present(value).map(str::to_string);
        let timestamp = now();

        Ok(Self {
            id: new_id(),
            name: trimmed(&input.name),
            email: trimmed(&input.email),
            kind,
            service: optional(&input.service),
            message: optional(&input.message),
            position: optional(&input.position),
            experience: optional(&input.experience),
            portfolio: optional(&input.portfolio),
            status: ContactStatus::New,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    pub fn set_status(&mut self, status: ContactStatus) {
        self.status = status;
        self.updated_at = now();
    }
}

impl Document for Contact {
    const COLLECTION: &'static str = CONTACTS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Response shape of the form actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ActionResult {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            url: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            url: None,
        }
    }
}
