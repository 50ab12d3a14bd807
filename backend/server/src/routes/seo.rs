//! # Search Engine Metadata
//!
//! - `sitemap.xml`: static pages, then one entry per project and team member
//! - JSON-LD: schema.org `LocalBusiness` built from the footer info and carousel images
use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use super::repo;
use crate::{
    error::{AppError, StoreContext},
    models::{CarouselItem, FooterInfo, Project, TeamMember, sort_slides},
    state::AppState,
};

pub const BUSINESS_NAME: &str = "Emilia Social Media";
pub const BUSINESS_DESCRIPTION: &str = "Agencia especializada en Community Management, Fotografía, Video y Desarrollo Web. Potenciamos tu presencia digital con estrategias creativas y efectivas.";
pub const SERVICES: [&str; 4] = [
    "Community Management",
    "Fotografía y Video",
    "Desarrollo Web",
    "Marketing Digital",
];

const SERVICE_PAGES: [&str; 3] = [
    "/servicios/community-management",
    "/servicios/fotografia-video",
    "/servicios/desarrollo-web",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

fn iso(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn sitemap_urls(
    site_url: &str,
    projects: &[Project],
    team: &[TeamMember],
    now: DateTime<Utc>,
) -> Vec<SitemapUrl> {
    let mut urls = vec![SitemapUrl {
        loc: site_url.to_string(),
        lastmod: iso(&now),
        changefreq: "weekly",
        priority: "1.0",
    }];

    urls.extend(SERVICE_PAGES.iter().map(|page| SitemapUrl {
        loc: format!("{site_url}{page}"),
        lastmod: iso(&now),
        changefreq: "monthly",
        priority: "0.8",
    }));

    urls.extend(projects.iter().map(|project| SitemapUrl {
        loc: format!("{site_url}/proyectos/{}", project.id),
        lastmod: iso(&project.updated_at),
        changefreq: "monthly",
        priority: "0.7",
    }));

    urls.extend(team.iter().map(|member| SitemapUrl {
        loc: format!("{site_url}/equipo/{}", member.id),
        lastmod: iso(&member.updated_at),
        changefreq: "monthly",
        priority: "0.6",
    }));

    urls
}

pub fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let entries: String = urls
        .iter()
        .map(|url| {
            format!(
                "\n  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>",
                escape_xml(&url.loc),
                url.lastmod,
                url.changefreq,
                url.priority
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{entries}\n</urlset>"
    )
}

pub async fn sitemap_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let mut projects = repo::<Project>(&state)
        .list()
        .await
        .context("Failed to generate sitemap")?;
    let mut team = repo::<TeamMember>(&state)
        .list()
        .await
        .context("Failed to generate sitemap")?;

    projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    team.sort_by(|a, b| a.name.cmp(&b.name));

    let urls = sitemap_urls(&state.config.site_url, &projects, &team, Utc::now());

    Ok(([(CONTENT_TYPE, "application/xml")], render_sitemap(&urls)))
}

fn absolute(site_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{site_url}{path}")
    } else {
        path.to_string()
    }
}

pub fn local_business(site_url: &str, footer: &FooterInfo, slides: &[CarouselItem]) -> Value {
    let images: Vec<String> = slides
        .iter()
        .map(|slide| absolute(site_url, &slide.image))
        .collect();
    let same_as: Vec<&str> = footer
        .social_links
        .iter()
        .map(|link| link.url.as_str())
        .collect();
    let offers: Vec<Value> = SERVICES
        .iter()
        .enumerate()
        .map(|(index, service)| {
            json!({
                "@type": "Offer",
                "itemOffered": { "@type": "Service", "name": service },
                "position": index + 1,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "@id": site_url,
        "name": BUSINESS_NAME,
        "description": BUSINESS_DESCRIPTION,
        "url": site_url,
        "logo": format!("{site_url}/logo.png"),
        "image": images,
        "address": {
            "@type": "PostalAddress",
            "addressLocality": footer.location,
        },
        "telephone": footer.phone,
        "email": footer.email,
        "priceRange": "$$",
        "sameAs": same_as,
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": "Servicios",
            "itemListElement": offers,
        },
    })
}

/// Does not persist the default footer, reads here stay side-effect free.
pub async fn json_ld_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let footer = repo::<FooterInfo>(&state)
        .find(FooterInfo::SINGLETON_ID)
        .await
        .context("Failed to generate structured data")?
        .unwrap_or_else(FooterInfo::default_content);

    let mut slides = repo::<CarouselItem>(&state)
        .list()
        .await
        .context("Failed to generate structured data")?;
    sort_slides(&mut slides);

    Ok(Json(local_business(&state.config.site_url, &footer, &slides)))
}
