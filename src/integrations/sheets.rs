use crate::error::ImportError;
use regex::Regex;
use reqwest::Url;
use reqwest::blocking::Client;
use std::sync::OnceLock;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

const SHEETS_HOST: &str = "docs.google.com";

fn fragment_gid() -> &'static Regex {
    static GID: OnceLock<Regex> = OnceLock::new();
    GID.get_or_init(|| Regex::new(r"gid=(\d+)").expect("Valid regex pattern"))
}

/// Turns a Google Sheets share/edit link into its CSV export URL.
///
/// The sheet tab comes from a `gid` query parameter, then a `gid=` match in
/// the fragment, then tab `0`.
pub fn build_export_url(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    if url.host_str() != Some(SHEETS_HOST) {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let d_index = segments.iter().position(|segment| *segment == "d")?;
    let id = segments.get(d_index + 1).filter(|id| !id.is_empty())?;

    let gid = url
        .query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.into_owned())
        .or_else(|| {
            url.fragment()
                .and_then(|fragment| fragment_gid().captures(fragment))
                .map(|caps| caps[1].to_string())
        })
        .unwrap_or_else(|| "0".to_string());

    Some(format!(
        "https://{SHEETS_HOST}/spreadsheets/d/{id}/export?format=csv&id={id}&gid={gid}"
    ))
}

/// Downloads the sheet on a background thread. The receiver yields exactly
/// one result.
pub fn spawn_fetch(link: String, timeout_seconds: u64) -> Receiver<Result<String, ImportError>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let result = fetch_sheet(&link, timeout_seconds);
        let _ = sender.send(result);
    });
    receiver
}

pub fn fetch_sheet(link: &str, timeout_seconds: u64) -> Result<String, ImportError> {
    let export_url = build_export_url(link).ok_or(ImportError::InvalidLink)?;
    tracing::info!(url = %export_url, "fetching sheet");

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.max(5)))
        .build()
        .map_err(|err| ImportError::Fetch(format!("failed to create HTTP client: {err}")))?;

    let response = client
        .get(&export_url)
        .send()
        .map_err(|err| ImportError::Fetch(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImportError::Fetch(format!("HTTP {status}")));
    }
    response
        .text()
        .map_err(|err| ImportError::Fetch(err.to_string()))
}
