//! Microsoft Graph client for the 4DX workbooks.
//!
//! Resolves the SharePoint site, then the document library's drive,
//! then reads each worksheet's used range. Uses reqwest with Bearer
//! token auth; acquiring the token is the caller's business.

use super::{rows_from_grid, DataSource, RawFeeds};
use crate::{
    config::{SharePointConfig, SheetLocation},
    error::{DashError, DashResult},
    metric::MetricKind,
    types::RawRow,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Deserialize)]
struct SiteResponse {
    id: String,
}

#[derive(Deserialize)]
struct DrivesResponse {
    value: Vec<DriveEntry>,
}

#[derive(Deserialize)]
struct DriveEntry {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct UsedRangeResponse {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

/// `/sites/{host}:/sites/{path}` for a site URL such as
/// `https://contoso.sharepoint.com/sites/FourDX`.
pub fn site_lookup_path(site_url: &str) -> DashResult<String> {
    let url = reqwest::Url::parse(site_url)
        .map_err(|e| DashError::InvalidSiteUrl(format!("{site_url}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| DashError::InvalidSiteUrl(site_url.to_string()))?;
    let path = url.path();
    let site_path = path
        .strip_prefix("/sites/")
        .unwrap_or_else(|| path.trim_start_matches('/'))
        .trim_end_matches('/');
    Ok(format!("/sites/{host}:/sites/{site_path}"))
}

/// Endpoint for a worksheet's used range inside a drive.
pub fn used_range_path(site_id: &str, drive_id: &str, location: &SheetLocation) -> String {
    format!(
        "/sites/{site_id}/drives/{drive_id}/root:/{}:/workbook/worksheets('{}')/usedRange",
        location.file, location.sheet
    )
}

pub struct GraphDataSource {
    client: Client,
    config: SharePointConfig,
    token: Option<String>,
}

impl GraphDataSource {
    pub fn new(config: SharePointConfig) -> DashResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Attach a bearer token; the source reports connected from here on.
    pub fn sign_in(&mut self, access_token: impl Into<String>) {
        self.token = Some(access_token.into());
        log::info!("graph source connected to {}", self.config.site_url);
    }

    fn location(&self, kind: MetricKind) -> &SheetLocation {
        match kind {
            MetricKind::Lag => &self.config.lag_measures,
            MetricKind::Lead => &self.config.lead_measures,
            MetricKind::Wig => &self.config.wig_metrics,
            MetricKind::Activity => &self.config.activity_data,
        }
    }

    fn call<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> DashResult<T> {
        let token = self.token.as_deref().ok_or_else(|| DashError::NotConnected {
            name: self.name().to_string(),
        })?;
        let url = format!("{}{endpoint}", self.config.graph_base_url);
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().unwrap_or_default();
            return Err(DashError::GraphApi {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    message
                },
            });
        }
        Ok(resp.json()?)
    }

    fn site_id(&self) -> DashResult<String> {
        let site: SiteResponse = self.call(&site_lookup_path(&self.config.site_url)?)?;
        Ok(site.id)
    }

    fn drive_id(&self, site_id: &str) -> DashResult<String> {
        let drives: DrivesResponse = self.call(&format!("/sites/{site_id}/drives"))?;
        drives
            .value
            .into_iter()
            .find(|d| d.name == self.config.library_name)
            .map(|d| d.id)
            .ok_or_else(|| DashError::LibraryNotFound {
                name: self.config.library_name.clone(),
            })
    }

    fn used_range(
        &self,
        site_id: &str,
        drive_id: &str,
        location: &SheetLocation,
    ) -> DashResult<Vec<RawRow>> {
        let range: UsedRangeResponse = self.call(&used_range_path(site_id, drive_id, location))?;
        let rows = range.values.as_deref().map(rows_from_grid).unwrap_or_default();
        log::debug!(
            "{}/{}: {} row(s)",
            location.file,
            location.sheet,
            rows.len()
        );
        Ok(rows)
    }
}

impl DataSource for GraphDataSource {
    fn name(&self) -> &'static str {
        "sharepoint"
    }

    fn is_connected(&self) -> bool {
        self.token.is_some()
    }

    fn disconnect(&mut self) {
        self.token = None;
    }

    fn fetch_sheet(&mut self, kind: MetricKind) -> DashResult<Vec<RawRow>> {
        let site_id = self.site_id()?;
        let drive_id = self.drive_id(&site_id)?;
        self.used_range(&site_id, &drive_id, self.location(kind))
    }

    /// Resolve the site and drive once, then read all four sheets.
    fn fetch_all(&mut self) -> DashResult<RawFeeds> {
        let site_id = self.site_id()?;
        let drive_id = self.drive_id(&site_id)?;
        let mut feeds = RawFeeds::default();
        for kind in MetricKind::ALL {
            *feeds.rows_mut(kind) = self.used_range(&site_id, &drive_id, self.location(kind))?;
        }
        Ok(feeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_path_splits_host_and_site() {
        let p = site_lookup_path("https://contoso.sharepoint.com/sites/FourDX").unwrap();
        assert_eq!(p, "/sites/contoso.sharepoint.com:/sites/FourDX");
    }

    #[test]
    fn site_path_rejects_garbage() {
        assert!(site_lookup_path("not a url").is_err());
    }

    #[test]
    fn used_range_path_quotes_sheet() {
        let loc = SheetLocation {
            file: "LAG_Measures.xlsx".into(),
            sheet: "LAG Data".into(),
        };
        assert_eq!(
            used_range_path("s1", "d1", &loc),
            "/sites/s1/drives/d1/root:/LAG_Measures.xlsx:/workbook/worksheets('LAG Data')/usedRange"
        );
    }
}
