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
//! Client for the tikwm.com metadata API

use std::time::Duration;

use cloneable_errors::{ErrorContext, ResContext};
use log::warn;
use reqwest::{header::ACCEPT, Client, Url};

/// Ask the provider about `source_url`.
///
/// Only transport-level problems are errors here, the envelope's `code`
/// is left for the caller to inspect. A 2xx body that isn't an envelope at all
/// (challenge pages and the like) comes back as an empty envelope.
pub async fn fetch_video(client: &Client, endpoint: &Url, source_url: &str, timeout: Duration) -> Result<pv::Envelope, ErrorContext> {
    let input = pv::Input {
        url: source_url,
        hd: 1,
    };
    let resp = client.post(endpoint.clone())
        .query(&input)
        .header(ACCEPT, "application/json")
        .timeout(timeout)
        .send().await.context("Failed to send provider request")?;
    let resp = resp.error_for_status().context("Provider request failed")?;
    let body = resp.bytes().await.context("Failed to read provider response")?;
    Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
        warn!("Provider sent an undecodable body for {source_url}: {err}");
        pv::Envelope::default()
    }))
}

/// Provider wire types. Everything is optional, and a field of the wrong
/// type is treated as if it was missing.
pub mod pv {
    use std::fmt::Display;

    use serde::{Deserialize, Serialize};
    use serde_with::{serde_as, DefaultOnError};

    #[derive(Serialize, Clone)]
    pub struct Input<'a> {
        pub url: &'a str,
        /// request the HD rendition if one exists
        pub hd: u8,
    }

    #[serde_as]
    #[derive(Deserialize, Clone, Default, Debug)]
    #[serde(default)]
    pub struct Envelope {
        /// 0 on success
        #[serde_as(as = "DefaultOnError")]
        pub code: Option<i64>,
        #[serde_as(as = "DefaultOnError")]
        pub msg: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub data: Option<VideoData>,
    }

    #[serde_as]
    #[derive(Deserialize, Clone, Default, Debug)]
    #[serde(default)]
    pub struct VideoData {
        #[serde_as(as = "DefaultOnError")]
        pub id: Option<VideoId>,
        #[serde_as(as = "DefaultOnError")]
        pub title: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub author: Option<Author>,
        #[serde_as(as = "DefaultOnError")]
        pub play_count: Option<u64>,
        #[serde_as(as = "DefaultOnError")]
        pub digg_count: Option<u64>,
        #[serde_as(as = "DefaultOnError")]
        pub comment_count: Option<u64>,
        #[serde_as(as = "DefaultOnError")]
        pub share_count: Option<u64>,
        #[serde_as(as = "DefaultOnError")]
        pub duration: Option<u64>,
        #[serde_as(as = "DefaultOnError")]
        pub cover: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub origin_cover: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub music: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub music_info: Option<MusicInfo>,
        /// watermark-free SD rendition
        #[serde_as(as = "DefaultOnError")]
        pub play: Option<String>,
        /// watermarked SD rendition
        #[serde_as(as = "DefaultOnError")]
        pub wmplay: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub hdplay: Option<String>,
    }

    #[serde_as]
    #[derive(Deserialize, Clone, Default, Debug)]
    #[serde(default)]
    pub struct Author {
        #[serde_as(as = "DefaultOnError")]
        pub nickname: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub unique_id: Option<String>,
        #[serde_as(as = "DefaultOnError")]
        pub avatar: Option<String>,
    }

    #[serde_as]
    #[derive(Deserialize, Clone, Default, Debug)]
    #[serde(default)]
    pub struct MusicInfo {
        #[serde_as(as = "DefaultOnError")]
        pub title: Option<String>,
    }

    /// ids are strings, but nothing stops the provider from sending a number
    #[derive(Deserialize, Clone, Debug)]
    #[serde(untagged)]
    pub enum VideoId {
        String(String),
        Number(u64),
    }

    impl Display for VideoId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                VideoId::String(s) => write!(f, "{s}"),
                VideoId::Number(n) => write!(f, "{n}"),
            }
        }
    }

}
