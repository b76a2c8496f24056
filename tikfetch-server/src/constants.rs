/* This file is part of the TikFetch project
*
*  Copyright (C) 2026 TikFetch contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use reqwest::Url;

pub const CONFIG_PATH: &str = "config.toml";

// some providers and CDNs reject requests without a browser user agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const METADATA_TIMEOUT: Duration = Duration::from_secs(15);
pub const MEDIA_TIMEOUT: Duration = Duration::from_secs(60);

pub static PROVIDER_URL: LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.tikwm.com/api/").expect("Should be able to parse the PROVIDER_URL"));
pub static MEDIA_REFERER: LazyLock<Url> = LazyLock::new(|| Url::parse("https://www.tiktok.com/").expect("Should be able to parse the MEDIA_REFERER"));
pub static SOURCE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)tiktok\.com|vm\.tiktok\.com|vt\.tiktok\.com").expect("Should be able to parse the source URL regex"));

pub const FALLBACK_TITLE: &str = "TikTok Video";
pub const FALLBACK_AUTHOR_NAME: &str = "Unknown";
pub const FALLBACK_FILENAME: &str = "tiktok_video";

// client-facing error messages
pub const MISSING_SOURCE_URL: &str = "Please provide a TikTok URL";
pub const INVALID_SOURCE_URL: &str = "Please enter a valid TikTok URL";
pub const PROVIDER_FAILED: &str = "Could not fetch video info. Please check the URL and try again.";
pub const INFO_FAILED: &str = "Failed to fetch video information. Please try again.";
pub const MISSING_MEDIA_URL: &str = "No video URL provided";
pub const INVALID_MEDIA_URL: &str = "Invalid video URL";
pub const DOWNLOAD_FAILED: &str = "Failed to download video. Please try again.";
pub const MALFORMED_REQUEST: &str = "Malformed request";
