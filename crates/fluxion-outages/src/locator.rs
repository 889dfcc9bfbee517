// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Finding the schedule image on the operator's page

use crate::error::{OutageError, Result};
use crate::http;
use crate::schedule::ScheduleDate;
use regex::Regex;
use reqwest::{Client, Url};
use std::sync::LazyLock;
use tracing::{debug, warn};

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img pattern"));

/// Any quoted attribute, so names like `data-src` are taken whole and
/// values are never rescanned for attributes
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\s([a-z_:][-\w:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attr pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedImage {
    pub image_url: Url,
    /// `None` when the alt text carries no usable date
    pub date: Option<ScheduleDate>,
}

#[derive(Debug, Clone)]
pub struct ScheduleImageLocator {
    client: Client,
    page_url: Url,
    marker: String,
}

impl ScheduleImageLocator {
    pub fn new(client: Client, page_url: Url, marker: impl Into<String>) -> Self {
        Self {
            client,
            page_url,
            marker: marker.into(),
        }
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub async fn locate(&self) -> Result<LocatedImage> {
        let html = http::get_text(&self.client, &self.page_url).await?;
        find_schedule_image(&html, &self.page_url, &self.marker)
    }
}

#[derive(Debug, Default)]
struct ImgAttributes {
    alt: Option<String>,
    src: Option<String>,
}

fn parse_img_tag(tag: &str) -> ImgAttributes {
    let mut attrs = ImgAttributes::default();
    for caps in ATTRIBUTE.captures_iter(tag) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_owned());
        let name = &caps[1];
        if name.eq_ignore_ascii_case("alt") {
            attrs.alt = attrs.alt.or(value);
        } else if name.eq_ignore_ascii_case("src") {
            attrs.src = attrs.src.or(value);
        }
    }
    attrs
}

/// Minimal entity decoding for attribute values
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&").replace("&quot;", "\"")
}

/// Pick the first `<img>` whose alt text contains `marker` and resolve its
/// `src` against `page_url`.
pub fn find_schedule_image(html: &str, page_url: &Url, marker: &str) -> Result<LocatedImage> {
    let marker_lower = marker.to_lowercase();

    for tag in IMG_TAG.find_iter(html) {
        let attrs = parse_img_tag(tag.as_str());
        let (Some(alt), Some(src)) = (attrs.alt, attrs.src) else {
            continue;
        };
        if !alt.to_lowercase().contains(&marker_lower) {
            continue;
        }

        let src = decode_entities(src.trim());
        let image_url = page_url.join(&src).map_err(|e| {
            OutageError::SourceUnavailable(format!("Unusable image src {src:?}: {e}"))
        })?;

        let date = match ScheduleDate::from_alt_text(&alt) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Schedule image found but date is unknown: {e}");
                None
            }
        };

        debug!("Schedule image {image_url} (alt {alt:?})");
        return Ok(LocatedImage { image_url, date });
    }

    Err(OutageError::ScheduleImageNotFound {
        marker: marker.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceSettings;
    use mockito::Server;

    fn page() -> Url {
        Url::parse("https://hoe.com.ua/page/pogodinni-vidkljuchennja").unwrap()
    }

    #[test]
    fn test_finds_first_matching_image() {
        let html = r#"
            <img src="/logo.png" alt="Logo">
            <img alt="ГПВ на 17.10.25" src="/Content/Uploads/2025/10/file.png" class="x">
            <img alt="ГПВ на 18.10.25" src="/Content/Uploads/2025/10/other.png">
        "#;
        let located = find_schedule_image(html, &page(), "ГПВ").unwrap();
        assert_eq!(
            located.image_url.as_str(),
            "https://hoe.com.ua/Content/Uploads/2025/10/file.png"
        );
        assert_eq!(located.date.unwrap().to_string(), "17.10");
    }

    #[test]
    fn test_attribute_order_and_quotes() {
        let html = concat!(
            "<IMG class='big' SRC='https://cdn.example.com/s.jpg?a=1&amp;b=2' ",
            "ALT='графік гпв 05.11.2025'>"
        );
        let located = find_schedule_image(html, &page(), "ГПВ").unwrap();
        assert_eq!(located.image_url.as_str(), "https://cdn.example.com/s.jpg?a=1&b=2");
        assert_eq!(located.date.unwrap().to_string(), "05.11");
    }

    #[test]
    fn test_prefixed_attributes_are_ignored() {
        let html = concat!(
            r#"<img data-src="/lazy.png" data-alt="Logo" "#,
            r#"src="/real.png" alt="ГПВ 17.10.25">"#
        );
        let located = find_schedule_image(html, &page(), "ГПВ").unwrap();
        assert_eq!(located.image_url.as_str(), "https://hoe.com.ua/real.png");

        // attribute-like text inside another value is not an attribute
        let html = r#"<img title='see src="/wrong.png"' src="/right.png" alt="ГПВ">"#;
        let located = find_schedule_image(html, &page(), "ГПВ").unwrap();
        assert_eq!(located.image_url.path(), "/right.png");

        let html = r#"<img data-src="/lazy.png" alt="ГПВ">"#;
        assert!(find_schedule_image(html, &page(), "ГПВ").is_err());
    }

    #[test]
    fn test_missing_date_is_not_fatal() {
        let html = r#"<img alt="ГПВ" src="uploads/gpv.png">"#;
        let located = find_schedule_image(html, &page(), "ГПВ").unwrap();
        assert!(located.date.is_none());
        assert_eq!(located.image_url.as_str(), "https://hoe.com.ua/page/uploads/gpv.png");
    }

    #[test]
    fn test_no_matching_image() {
        let html = r#"<img alt="Logo" src="/logo.png"><img alt="ГПВ без src">"#;
        let result = find_schedule_image(html, &page(), "ГПВ");
        assert!(matches!(result, Err(OutageError::ScheduleImageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_locate_over_http() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page/pogodinni-vidkljuchennja")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(r#"<p><img alt="ГПВ на 17.10.25" src="/img/gpv.png"></p>"#)
            .create_async()
            .await;

        let page_url =
            Url::parse(&format!("{}/page/pogodinni-vidkljuchennja", server.url())).unwrap();
        let client = http::build_client(&SourceSettings::default()).unwrap();
        let locator = ScheduleImageLocator::new(client, page_url, "ГПВ");

        let located = locator.locate().await.unwrap();
        assert_eq!(located.image_url.path(), "/img/gpv.png");
        assert_eq!(located.date.unwrap().to_string(), "17.10");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_locate_page_down() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(503)
            .create_async()
            .await;

        let page_url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let client = http::build_client(&SourceSettings::default()).unwrap();
        let locator = ScheduleImageLocator::new(client, page_url, "ГПВ");

        assert!(matches!(
            locator.locate().await,
            Err(OutageError::SourceUnavailable(_))
        ));

        mock.assert_async().await;
    }
}
