//! # Content Seeding
//!
//! Loads a starting set of site content into the store.
//!
//! ## Bundle
//!
//! One JSON document, read from a local path or fetched over http(s):
//! ```json
//! { "carousel": [..], "projects": [..], "team": [..], "footer": {..} }
//! ```
//! Every section is optional. Entries use the same fields the admin API accepts and go
//! through the same validation, so a bundle can never store something the API would reject.
//!
//! ## Steps
//! 1. Fetch or read the bundle and parse it.
//! 2. Validate every entry, failing before anything is written.
//! 3. With `--replace`, clear the seeded collections.
//! 4. Write documents one by one behind a progress bar.
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use server::{
    models::{
        CarouselInput, CarouselItem, FooterInfo, FooterInput, Project, ProjectInput, TeamMember,
        TeamMemberInput,
    },
    store::{CAROUSEL, Document, FOOTER, PROJECTS, Store, TEAM},
};
use tokio::fs;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Bundle {
    pub carousel: Vec<CarouselInput>,
    pub projects: Vec<ProjectInput>,
    pub team: Vec<TeamMemberInput>,
    pub footer: Option<FooterInput>,
}

/// A validated document ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDocument {
    pub collection: &'static str,
    pub id: String,
    pub body: Value,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub carousel: usize,
    pub projects: usize,
    pub team: usize,
    pub footer: bool,
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub async fn load_bundle(source: &str) -> Result<Bundle> {
    let bytes = if is_remote(source) {
        reqwest::get(source)
            .await
            .with_context(|| format!("Failed to fetch {source}"))?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    } else {
        fs::read(source)
            .await
            .with_context(|| format!("Failed to read {source}"))?
    };

    parse_bundle(&bytes)
}

pub fn parse_bundle(bytes: &[u8]) -> Result<Bundle> {
    serde_json::from_slice(bytes).context("Invalid seed bundle")
}

fn document<T: Document>(doc: &T) -> Result<SeedDocument> {
    Ok(SeedDocument {
        collection: T::COLLECTION,
        id: doc.id().to_string(),
        body: serde_json::to_value(doc)?,
    })
}

/// Validates every entry of the bundle. Errors name the section and position of the bad entry.
pub fn build_documents(bundle: Bundle) -> Result<(Vec<SeedDocument>, SeedReport)> {
    let mut documents = Vec::new();
    let mut report = SeedReport::default();

    for (index, input) in bundle.carousel.into_iter().enumerate() {
        let item = CarouselItem::create(input)
            .with_context(|| format!("carousel entry {index}"))?;
        documents.push(document(&item)?);
        report.carousel += 1;
    }

    for (index, input) in bundle.projects.into_iter().enumerate() {
        let project =
            Project::create(input).with_context(|| format!("projects entry {index}"))?;
        documents.push(document(&project)?);
        report.projects += 1;
    }

    for (index, input) in bundle.team.into_iter().enumerate() {
        let member =
            TeamMember::create(input).with_context(|| format!("team entry {index}"))?;
        documents.push(document(&member)?);
        report.team += 1;
    }

    if let Some(input) = bundle.footer {
        let footer = FooterInfo::create(input).context("footer")?;
        documents.push(document(&footer)?);
        report.footer = true;
    }

    Ok((documents, report))
}

fn collections(report: &SeedReport) -> Vec<&'static str> {
    [
        (CAROUSEL, report.carousel > 0),
        (PROJECTS, report.projects > 0),
        (TEAM, report.team > 0),
        (FOOTER, report.footer),
    ]
    .into_iter()
    .filter(|(_, seeded)| *seeded)
    .map(|(collection, _)| collection)
    .collect()
}

pub async fn seed(store: &dyn Store, bundle: Bundle, replace: bool) -> Result<SeedReport> {
    let (documents, report) = build_documents(bundle)?;

    if replace {
        for collection in collections(&report) {
            store
                .clear(collection)
                .await
                .with_context(|| format!("Failed to clear {collection}"))?;
            info!("Cleared {collection}");
        }
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for doc in &documents {
        pb.set_message(format!("{} {}", doc.collection, doc.id));

        store
            .put(doc.collection, &doc.id, &doc.body)
            .await
            .with_context(|| format!("Failed to write {} {}", doc.collection, doc.id))?;

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use server::store::{MemoryStore, Repository};

    use super::*;

    const BUNDLE: &str = r#"{
        "carousel": [
            { "title": "Community", "description": "Redes", "image": "/uploads/c.png", "order": 1 },
            { "title": "Web", "description": "Sitios", "image": "/uploads/w.png", "order": 0 }
        ],
        "projects": [
            { "title": "Sesión", "category": "Fotografía", "image": "/uploads/p.png", "description": "Fotos" }
        ],
        "footer": {
            "subtitle": "Agencia",
            "location": "Rosario, Argentina",
            "email": "hola@example.com",
            "phone": "+54 341 000 0000"
        }
    }"#;

    #[test]
    fn test_parse_bundle_sections_optional() {
        let bundle = parse_bundle(b"{}").unwrap();

        assert!(bundle.carousel.is_empty());
        assert!(bundle.footer.is_none());
        assert!(parse_bundle(b"[]").is_err());
    }

    #[test]
    fn test_build_documents_validates() {
        let bundle = parse_bundle(BUNDLE.as_bytes()).unwrap();
        let (documents, report) = build_documents(bundle).unwrap();

        assert_eq!(documents.len(), 4);
        assert_eq!(
            report,
            SeedReport {
                carousel: 2,
                projects: 1,
                team: 0,
                footer: true
            }
        );
        assert_eq!(documents[2].body["images"][0], "/uploads/p.png");
        assert_eq!(documents[3].id, FooterInfo::SINGLETON_ID);
    }

    #[test]
    fn test_build_documents_names_bad_entry() {
        let bundle = parse_bundle(br#"{ "team": [ { "name": "Ana" } ] }"#).unwrap();
        let error = build_documents(bundle).unwrap_err();

        assert_eq!(error.to_string(), "team entry 0");
        assert!(format!("{error:#}").contains("Missing required fields"));
    }

    #[tokio::test]
    async fn test_seed_replaces_collections() {
        let store = MemoryStore::new();
        store
            .put(CAROUSEL, "old", &serde_json::json!({ "_id": "old" }))
            .await
            .unwrap();
        store
            .put(TEAM, "kept", &serde_json::json!({ "_id": "kept" }))
            .await
            .unwrap();

        let report = seed(&store, parse_bundle(BUNDLE.as_bytes()).unwrap(), true)
            .await
            .unwrap();
        assert_eq!(report.carousel, 2);

        let slides = Repository::<CarouselItem>::new(&store).list().await.unwrap();
        assert_eq!(slides.len(), 2);
        assert!(store.get(CAROUSEL, "old").await.unwrap().is_none());
        assert!(store.get(TEAM, "kept").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_bundle_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, BUNDLE).unwrap();

        let bundle = load_bundle(path.to_str().unwrap()).await.unwrap();

        assert_eq!(bundle.carousel.len(), 2);
        assert!(load_bundle("/does/not/exist.json").await.is_err());
    }
}
