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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod format;

pub const FILENAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Normalized video information, as returned by `POST /api/info`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub author: Author,
    pub stats: Stats,
    /// in seconds
    pub duration: u64,
    pub thumbnail_url: String,
    pub music_url: String,
    pub music_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd_url: Option<String>,
    pub is_high_definition: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Stats {
    pub plays: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// A quality rendition of a video
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Variant {
    Hd,
    Sd,
}

impl VideoMetadata {
    pub fn variant_url(&self, variant: Variant) -> Option<&str> {
        match variant {
            Variant::Hd => self.hd_url.as_deref(),
            Variant::Sd => self.sd_url.as_deref(),
        }
    }

    /// Filename (without extension) to pass to `/api/download`.
    /// The server sanitizes it again, so this is only a suggestion.
    pub fn suggested_filename(&self, at: NaiveDateTime) -> String {
        let username = if self.author.username.is_empty() { "unknown" } else { &self.author.username };
        format!("{username}_{}_tiksave", at.format(FILENAME_TIME_FORMAT))
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default)]
pub struct InfoRequest {
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct InfoResponse {
    pub success: bool,
    pub data: VideoMetadata,
}

impl From<VideoMetadata> for InfoResponse {
    fn from(data: VideoMetadata) -> Self {
        InfoResponse { success: true, data }
    }
}

/// Query parameters of `GET /api/download`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default)]
pub struct DownloadParams {
    pub url: Option<String>,
    pub filename: Option<String>,
}

/// Body of every non-streaming error response
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusResponse {
    pub server_version: Option<String>,
    pub server_git_hash: Option<String>,
    pub server_git_dirty: Option<bool>,
    pub server_build_timestamp: Option<i64>,
    pub server_startup_timestamp: Option<i64>,
}
